// MyBookmarks shared type definitions
// Each submodule defines types used across the store, managers and services.

pub mod bookmark;
pub mod category;
pub mod errors;
pub mod outcome;
pub mod settings;
pub mod user;
