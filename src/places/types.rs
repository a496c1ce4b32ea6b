//! Places API wire types and the tool's output record.

use serde::{Deserialize, Serialize};

/// Fields requested from the text search endpoint.
pub const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.googleMapsLinks";

/// One place as returned by the `find_on_map` tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Place {
    pub address: String,
    pub name: String,
    /// Directions link.
    pub link: String,
    /// Preview image scraped from the place page, when one was found.
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextRequest<'a> {
    pub text_query: &'a str,
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchTextResponse {
    /// Omitted by the API when nothing matched.
    #[serde(default)]
    pub places: Vec<ApiPlace>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlace {
    pub display_name: LocalizedText,
    pub formatted_address: String,
    pub google_maps_links: MapsLinks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedText {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapsLinks {
    pub place_uri: String,
    pub directions_uri: String,
}
