//! Business logic services for the application layer.

pub mod collector_service;
pub mod interactive_service;
pub mod mirror_service;

pub use collector_service::{
    CollectorService, DEFAULT_ALL_LIMIT, DEFAULT_BATCH_LIMIT, KeywordOutcome, MerchantOutcome,
    Resolvers,
};
pub use interactive_service::{InteractiveSearch, InteractiveService, MerchantResolution};
pub use mirror_service::MirrorService;
