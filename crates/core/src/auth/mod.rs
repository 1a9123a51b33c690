//! Authentication module
//!
//! Mock login/session handling backed by local storage.

mod model;
mod store;

pub use model::*;
pub use store::AuthStore;
