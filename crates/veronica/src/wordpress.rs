//! Read-only access to the WordPress content API: a thin fetch client that
//! degrades to empty results on any failure, and pure processors that turn
//! raw records into the compact summaries fed to the model.
pub mod client;
pub mod processor;

pub use client::{Params, WordPressClient};
