//! Transport abstraction for the fetch hook.
//!
//! [`Fetcher`] stands in for the host's fetch capability. [`ReqwestFetcher`]
//! is the default implementation and works both natively and in the browser,
//! where reqwest delegates to `window.fetch`.

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::FetchError;

/// Method, headers and body applied to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Send cookies with cross-origin requests. Only meaningful in the
    /// browser.
    pub credentials_include: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            credentials_include: false,
        }
    }

    pub fn post(body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            body: Some(body.into()),
            ..Self::get()
        }
    }

    pub fn header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_credentials(mut self) -> Self {
        self.credentials_include = true;
        self
    }
}

/// A fully received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize a successful response into the desired type, or return
    /// the appropriate error.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        if !self.is_success() {
            return Err(FetchError::from_status(self.status));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// The host's fetch capability.
#[async_trait(?Send)]
pub trait Fetcher {
    async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<FetchResponse, FetchError>;
}

/// [`Fetcher`] backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    /// Base that relative URLs are resolved against. The browser build of
    /// reqwest only accepts absolute URLs, so the ui sets this to the page
    /// origin.
    pub address: Option<String>,
    pub inner_client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            inner_client: reqwest::Client::new(),
        }
    }

    /// Resolve `url` against `address` the way a browser resolves a link.
    /// Without a usable address the URL is sent as given.
    fn format_url(&self, url: &str) -> String {
        let Some(address) = &self.address else {
            return url.to_string();
        };
        match Url::parse(address).and_then(|base| base.join(url)) {
            Ok(resolved) => resolved.into(),
            Err(e) => {
                tracing::warn!(address, url, "Could not resolve URL: {e}");
                url.to_string()
            }
        }
    }

    fn build_request(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> reqwest::RequestBuilder {
        let mut request = self
            .inner_client
            .request(options.method.clone(), self.format_url(url));

        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        #[cfg(target_arch = "wasm32")]
        let request = if options.credentials_include {
            request.fetch_credentials_include()
        } else {
            request
        };

        request
    }
}

#[async_trait(?Send)]
impl Fetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<FetchResponse, FetchError> {
        let response = self.build_request(url, options).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(FetchResponse::new(status, body.to_vec()))
    }
}
