//! Versioned response envelope with hypermedia links
//!
//! Links are plain strings built by the handler from the resource base
//! path; nothing is derived from the router.

use serde::Serialize;

/// Version tag written into every envelope
pub const API_VERSION: &str = "v2";

/// Links attached to a single resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
    pub collection: String,
    /// Target for POST requests creating a sibling resource
    pub create: String,
}

impl Links {
    /// Links for member `id` of the collection at `base` (e.g. `/v2/pacientes`).
    pub fn for_member(base: &str, id: i64) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            self_link: format!("{}/{}", base, id),
            collection: base.to_owned(),
            create: base.to_owned(),
        }
    }
}

/// Envelope wrapping one resource
#[derive(Debug, Clone, Serialize)]
pub struct Resource<T> {
    pub version: &'static str,
    pub data: T,
    pub links: Links,
}

impl<T> Resource<T> {
    pub fn new(data: T, links: Links) -> Self {
        Self {
            version: API_VERSION,
            data,
            links,
        }
    }
}
