// MyBookmarks services
// Services compose the managers into request-level operations: validation, reordering, configuration.

pub mod bookmark_service;
pub mod reorder_engine;
pub mod settings_engine;
pub mod validation_coordinator;
