/// Neutral entity definitions shared by all store backends.
pub mod models;
/// Backend-agnostic storage error types.
pub mod storage;
/// Remote store abstraction and its backends.
pub mod store;
