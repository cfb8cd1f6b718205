//! Common types used across the workspace.

pub mod actor;
pub mod id;
pub mod money;
pub mod pagination;

pub use actor::Actor;
pub use id::*;
pub use pagination::{PageMeta, PageRequest, PageResponse};
