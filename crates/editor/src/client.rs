//! Access to the component properties API.
//!
//! [`PropertiesBackend`] is the seam the editor session talks to;
//! [`HttpPropertiesClient`] implements it over HTTP using [`reqwest`].

use async_trait::async_trait;
use prism_core::spacing::SpacingProperties;
use reqwest::Url;
use serde::Deserialize;

/// Errors from talking to the properties API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The base URL cannot carry a path.
    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),

    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Properties API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API answered 2xx but did not acknowledge the save.
    #[error("Properties API did not acknowledge the save")]
    NotAcknowledged,
}

/// Read and replace the saved margin / padding of a component.
#[async_trait]
pub trait PropertiesBackend: Send + Sync {
    /// Saved properties, or all-`"auto"` for a component never saved.
    async fn get_properties(&self, component_id: &str) -> Result<SpacingProperties, ClientError>;

    /// Replace both margin and padding of a component.
    async fn set_properties(
        &self,
        component_id: &str,
        properties: &SpacingProperties,
    ) -> Result<(), ClientError>;
}

/// Body of a successful `POST /api/properties/{id}`.
#[derive(Debug, Deserialize)]
struct SaveResponse {
    success: bool,
}

/// HTTP client for the properties API.
#[derive(Debug, Clone)]
pub struct HttpPropertiesClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpPropertiesClient {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// `{base}/api/properties/{component_id}`, with the id percent-encoded.
    fn properties_url(&self, component_id: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "properties", component_id]);
        Ok(url)
    }

    /// Turn a non-2xx response into [`ClientError::ApiError`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::ApiError {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PropertiesBackend for HttpPropertiesClient {
    async fn get_properties(&self, component_id: &str) -> Result<SpacingProperties, ClientError> {
        let response = self
            .client
            .get(self.properties_url(component_id)?)
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn set_properties(
        &self,
        component_id: &str,
        properties: &SpacingProperties,
    ) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.properties_url(component_id)?)
            .json(properties)
            .send()
            .await?;

        let ack: SaveResponse = Self::check_status(response).await?.json().await?;
        if ack.success {
            Ok(())
        } else {
            Err(ClientError::NotAcknowledged)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use prism_core::spacing::{Length, Side, Spacing};

    use super::*;

    type Store = Arc<Mutex<HashMap<String, SpacingProperties>>>;

    /// Minimal in-process stand-in for the properties API.
    async fn spawn_mock_api() -> (String, Store) {
        let store: Store = Arc::default();

        async fn get_props(
            State(store): State<Store>,
            Path(id): Path<String>,
        ) -> Json<SpacingProperties> {
            let stored = store.lock().unwrap().get(&id).cloned();
            Json(stored.unwrap_or_default())
        }

        async fn set_props(
            State(store): State<Store>,
            Path(id): Path<String>,
            Json(props): Json<SpacingProperties>,
        ) -> Result<Json<serde_json::Value>, StatusCode> {
            if id == "readonly" {
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
            store.lock().unwrap().insert(id, props);
            Ok(Json(serde_json::json!({"success": true})))
        }

        let app = Router::new()
            .route("/api/properties/{id}", get(get_props).post(set_props))
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), store)
    }

    #[test]
    fn component_id_is_percent_encoded() {
        let client = HttpPropertiesClient::new("http://localhost:3000/").unwrap();
        let url = client.properties_url("hero banner/1").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/properties/hero%20banner%2F1"
        );
    }

    #[test]
    fn non_base_url_is_rejected() {
        assert_matches!(
            HttpPropertiesClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl(_))
        );
        assert_matches!(
            HttpPropertiesClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        );
    }

    #[tokio::test]
    async fn set_then_get_over_http() {
        let (base, store) = spawn_mock_api().await;
        let client = HttpPropertiesClient::new(&base).unwrap();

        let mut margin = Spacing::auto();
        margin.set(Side::Top, Length::px(8.0).unwrap().into());
        let props = SpacingProperties {
            margin,
            padding: Spacing::auto(),
        };

        client.set_properties("button", &props).await.unwrap();
        assert_eq!(store.lock().unwrap().get("button"), Some(&props));

        let fetched = client.get_properties("button").await.unwrap();
        assert_eq!(fetched, props);
    }

    #[tokio::test]
    async fn unknown_component_reads_as_default() {
        let (base, _store) = spawn_mock_api().await;
        let client = HttpPropertiesClient::new(&base).unwrap();

        let fetched = client.get_properties("fresh").await.unwrap();
        assert_eq!(fetched, SpacingProperties::default());
    }

    #[tokio::test]
    async fn server_error_surfaces_status() {
        let (base, _store) = spawn_mock_api().await;
        let client = HttpPropertiesClient::new(&base).unwrap();

        let result = client
            .set_properties("readonly", &SpacingProperties::default())
            .await;
        assert_matches!(result, Err(ClientError::ApiError { status: 500, .. }));
    }
}
