use crate::error::CompareError;
use crate::release::USER_AGENT;
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use std::io::Read;

/// Status, redirect target and a streaming body of one GET request.
pub struct HttpResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Drain the body as (lossy) UTF-8 text.
    pub fn body_text(&mut self) -> Result<String, CompareError> {
        let mut bytes = Vec::new();
        self.body
            .read_to_end(&mut bytes)
            .map_err(|e| CompareError::io("Error reading response body", e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// The one network operation the tooling needs. Redirects are not followed
/// by implementations; callers decide what to do with a 3xx.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse, CompareError>;
}

/// Blocking reqwest client with automatic redirects turned off.
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, CompareError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()?;
        Ok(ReqwestClient { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, CompareError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Ok(HttpResponse {
            status,
            location,
            body: Box::new(response),
        })
    }
}
