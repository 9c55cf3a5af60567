//! Default `HttpTransport` backed by a blocking `ureq` agent.
//!
//! Status codes are returned as data rather than errors so that the client
//! can read the error envelope on 5xx responses.

use crate::config::TransportConfig;
use crate::http::{HttpResponse, HttpTransport, TransportError};

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: String,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl HttpTransport for UreqTransport {
    fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        let mut response = self
            .agent
            .post(url)
            .header("user-agent", self.user_agent.as_str())
            .send_form(form.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .map_err(TransportError::from_source)?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(TransportError::from_source)?;

        Ok(HttpResponse { status, body })
    }
}
