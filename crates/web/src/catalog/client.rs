use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use tracing::instrument;

use cafe_catalog_core::CafeId;

use super::CatalogError;
use crate::config::CatalogConfig;
use crate::models::{Cafe, NewCafe, cafe::CafeList};

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "s";

/// Longest upstream error body kept in `CatalogError::Upstream`.
const MAX_ERROR_BODY: usize = 512;

/// Cafe catalog API client.
///
/// Cheap to clone; the inner `reqwest::Client` pools connections.
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();

        let mut key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| CatalogError::InvalidApiKey(e.to_string()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch every cafe.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Upstream` on a non-success status and
    /// `CatalogError::Parse` if the body is not a cafe list.
    #[instrument(skip(self))]
    pub async fn list_cafes(&self) -> Result<Vec<Cafe>, CatalogError> {
        let response = send(self.client.get(self.url("/all"))).await?;
        let body = response.text().await?;

        let cafes = serde_json::from_str::<CafeList>(&body)?.into_vec();
        tracing::debug!(count = cafes.len(), "fetched cafes");
        Ok(cafes)
    }

    /// Create a cafe.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Upstream` if the API rejects the record.
    #[instrument(skip(self, cafe), fields(name = %cafe.name))]
    pub async fn add_cafe(&self, cafe: &NewCafe) -> Result<(), CatalogError> {
        send(self.client.post(self.url("/add")).form(cafe)).await?;
        tracing::info!("cafe added");
        Ok(())
    }

    /// Change the coffee price of one cafe.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Upstream` if the API rejects the update
    /// (including an unknown id).
    #[instrument(skip(self))]
    pub async fn update_price(&self, id: CafeId, new_price: &str) -> Result<(), CatalogError> {
        let path = format!("/patch/{id}/{}", urlencoding::encode(new_price));
        send(self.client.patch(self.url(&path))).await?;
        tracing::info!("cafe price updated");
        Ok(())
    }

    /// Delete one cafe.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Upstream` if the API refuses (wrong key,
    /// unknown id, ...).
    #[instrument(skip(self))]
    pub async fn delete_cafe(&self, id: CafeId) -> Result<(), CatalogError> {
        send(self.client.delete(self.url(&format!("/delete/{id}")))).await?;
        tracing::info!("cafe deleted");
        Ok(())
    }
}

/// Send a request and turn any non-2xx status into `CatalogError::Upstream`.
async fn send(request: RequestBuilder) -> Result<Response, CatalogError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| message.is_char_boundary(i))
            .unwrap_or(0);
        message.truncate(cut);
    }

    tracing::warn!(status = status.as_u16(), "catalog API returned an error");
    Err(CatalogError::Upstream {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn config(base: &str, key: &str) -> CatalogConfig {
        CatalogConfig {
            base_url: Url::parse(base).unwrap(),
            api_key: SecretString::from(key),
        }
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = CatalogClient::new(&config("https://cafes.example.org/", "k")).unwrap();
        assert_eq!(client.url("/all"), "https://cafes.example.org/all");
    }

    #[test]
    fn test_url_keeps_path_prefix() {
        let client = CatalogClient::new(&config("https://example.org/api/v1", "k")).unwrap();
        assert_eq!(client.url("/delete/7"), "https://example.org/api/v1/delete/7");
    }

    #[test]
    fn test_rejects_unsendable_key() {
        let result = CatalogClient::new(&config("https://example.org", "bad\nkey"));
        assert!(matches!(result, Err(CatalogError::InvalidApiKey(_))));
    }

    #[test]
    fn test_error_status() {
        let err = CatalogError::Upstream {
            status: 403,
            message: "nope".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "API error: 403 - nope");
    }
}
