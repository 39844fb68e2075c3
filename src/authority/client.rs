//! HTTP client for the Authority's synchronous submit/acknowledge service.

use std::time::Duration;

use tracing::{debug, warn};

use super::protocol::{AuthorityResponse, InvoiceRequest, ItemRequest};
use crate::core::FiscalError;

const SALES_PATH: &str = "/sales";
const ITEMS_PATH: &str = "/items";

/// One synchronous request/acknowledge call per invoice and per catalog
/// item. Implemented over HTTP in production and by programmable fakes in
/// tests — the engine is generic over this trait.
#[allow(async_fn_in_trait)]
pub trait AuthorityClient {
    async fn submit_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<AuthorityResponse, FiscalError>;

    async fn register_item(&self, request: &ItemRequest) -> Result<AuthorityResponse, FiscalError>;
}

/// Production client against the Authority's HTTP endpoint.
///
/// Every failure to obtain a parsed response envelope — connection errors,
/// timeouts, non-2xx statuses, unparseable bodies — is a
/// [`FiscalError::Transport`]. Business rejections live inside a parsed
/// envelope and are not this client's concern.
pub struct HttpAuthorityClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthorityClient {
    /// Build a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FiscalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FiscalError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<AuthorityResponse, FiscalError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "submitting to authority");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| FiscalError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FiscalError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(%url, %status, "authority endpoint returned an error status");
            return Err(FiscalError::Transport(format!("HTTP {status}: {text}")));
        }

        serde_json::from_str(&text).map_err(|e: serde_json::Error| {
            FiscalError::Transport(format!("unparseable authority response: {e}"))
        })
    }
}

impl AuthorityClient for HttpAuthorityClient {
    async fn submit_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<AuthorityResponse, FiscalError> {
        self.post(SALES_PATH, request).await
    }

    async fn register_item(&self, request: &ItemRequest) -> Result<AuthorityResponse, FiscalError> {
        self.post(ITEMS_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let client = HttpAuthorityClient::new("https://authority.example/api/").unwrap();
        assert_eq!(client.base_url, "https://authority.example/api");
    }
}
