//! Places text search client.

use std::time::Duration;

use futures_util::future::join_all;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::config::PlacesConfig;
use crate::places::thumbnail::ThumbnailFetcher;
use crate::places::types::{ApiPlace, Place, SearchTextRequest, SearchTextResponse, FIELD_MASK};

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    #[error("places API key is not configured")]
    MissingApiKey,
    #[error("invalid places endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("places request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The search endpoint answered with something other than 200.
    #[error("places API returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("unexpected places response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Searches places by free text and enriches them with preview images.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: Option<SecretString>,
    page_size: u32,
    thumbnails: ThumbnailFetcher,
}

impl PlacesClient {
    pub fn new(config: &PlacesConfig, api_key: Option<SecretString>) -> Result<Self, PlacesError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let endpoint = Url::parse(&config.endpoint)?;

        Ok(Self {
            thumbnails: ThumbnailFetcher::new(http.clone(), config.user_agent.clone()),
            http,
            endpoint,
            api_key,
            page_size: config.page_size,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run a text search and return at most `page_size` places.
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, PlacesError> {
        let places = self.search_text(query).await?;
        tracing::debug!(query = %query, results = places.len(), "Places search completed");

        let places = join_all(places.into_iter().map(|place| self.enrich(place))).await;
        Ok(places)
    }

    async fn search_text(&self, query: &str) -> Result<Vec<ApiPlace>, PlacesError> {
        let api_key = self.api_key.as_ref().ok_or(PlacesError::MissingApiKey)?;

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, api_key.expose_secret())
            .header(FIELD_MASK_HEADER, FIELD_MASK)
            .json(&SearchTextRequest {
                text_query: query,
                page_size: self.page_size,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            tracing::warn!(status = %status, "Places API call failed");
            return Err(PlacesError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchTextResponse = serde_json::from_str(&body)?;
        Ok(parsed.places)
    }

    async fn enrich(&self, place: ApiPlace) -> Place {
        let page = &place.google_maps_links.place_uri;
        let image = match self.thumbnails.fetch(page).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(url = %page, error = %e, "Thumbnail lookup failed");
                None
            }
        };

        Place {
            address: place.formatted_address,
            name: place.display_name.text,
            link: place.google_maps_links.directions_uri,
            image,
        }
    }
}
