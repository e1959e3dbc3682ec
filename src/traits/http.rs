use anyhow::{Context, Result, bail};
use std::time::Duration;
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Mutex;

/// HTTP client trait for testing
pub trait HttpClient: Send + Sync {
    /// GET a URL and return the response body as text
    fn get(&self, url: &str) -> Result<String>;
}

/// Real HTTP client using reqwest
pub struct ReqwestClient {
    timeout: Duration,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let response = client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch URL: {}", url))?;

        if !response.status().is_success() {
            bail!("HTTP request failed with status {}", response.status());
        }

        response
            .text()
            .with_context(|| format!("Failed to read response body from: {}", url))
    }
}

/// Mock HTTP client serving canned responses
#[cfg(test)]
pub struct MockHttpClient {
    responses: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl HttpClient for MockHttpClient {
    fn get(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.responses.get(url) {
            Some(body) => Ok(body.clone()),
            None => bail!("HTTP request failed with status 404 Not Found"),
        }
    }
}
