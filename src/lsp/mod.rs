//! LSP Protocol Implementation
//!
//! Thin editor adapter: keeps open documents and publishes their validation
//! diagnostics.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;
