//! PostNL Models - Wire entities and typed response collections.
//!
//! This crate maps the carrier's semi-structured JSON payloads onto
//! strongly-typed domain objects:
//! - The [`ResultEntity`] contract every decoded record satisfies
//! - [`ResponseCollection`], the paginated, position-keyed wrapper every
//!   query response reuses
//! - Concrete entity models per response category

pub mod collection;
pub mod entity;
pub mod models;

// Re-export key types
pub use collection::ResponseCollection;
pub use entity::ResultEntity;
pub use models::business_check::{BusinessCheckResponse, BusinessCheckResult};
