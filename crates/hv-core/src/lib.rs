//! Core abstractions shared by the query-tool state machines
//!
//! This crate provides the reducer seam, the serialized dispatch store and
//! the action decoding used by the date picker and query tab reducers.

pub mod action;
pub mod reducer;
pub mod store;

// Re-export commonly used types
pub use action::{decode_action, ActionDecodeError, ActionType};
pub use reducer::{reduce_all, Reducer};
pub use store::{Store, StoreSubscriber};
