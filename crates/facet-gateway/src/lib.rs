//! facet-gateway
//!
//! HTTP implementations of the facet catalog interfaces:
//! - [`client::CatalogClient`]: read-only catalog lookups behind
//!   `facet_core::gateway::CatalogGateway`
//! - [`actions::ActionClient`]: wishlist / compare / cart toggles and
//!   share-by-email, keyed by product id and an explicit client context
//! - [`wire`]: storefront wire DTOs tolerant of loose JSON
//!
//! Transport failures map to `FacetError::Gateway`, undecodable bodies to
//! `FacetError::Malformed`; the resolver in `facet-core` decides how far
//! those degrade.

pub mod actions;
pub mod client;
pub mod wire;

pub use actions::{ActionClient, ActionKind, ShareRequest};
pub use client::CatalogClient;
