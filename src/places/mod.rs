//! Places search collaborator.
//!
//! # Data Flow
//! ```text
//! tools/call find_on_map {query}
//!     → client.rs (POST searchText with API key and field mask)
//!     → thumbnail.rs (GET each place page, read og:image)
//!     → types.rs Place {address, name, link, image}
//!     → JSON array as tool text
//! ```
//!
//! # Design Decisions
//! - Thumbnail pages are fetched concurrently
//! - A failed thumbnail lookup degrades to `image: null`
//! - A non-200 search answer is reported to the caller as tool text

pub mod client;
pub mod thumbnail;
pub mod tool;
pub mod types;

pub use client::{PlacesClient, PlacesError};
pub use tool::FindOnMapTool;
pub use types::Place;
