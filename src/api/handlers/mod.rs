//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod collect;
pub mod health;
pub mod mirrors;
pub mod resolve;

pub use collect::{collect_all_handler, collect_batch_handler};
pub use health::health_handler;
pub use mirrors::list_mirrors_handler;
pub use resolve::{collect_interactive_handler, resolve_url_batch_handler, resolve_url_handler};
