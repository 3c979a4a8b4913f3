//! HTTP surface for the share-link resolution engine.
//!
//! Thin plumbing around the `resolver` crate: an axum application with
//! `/getlink`, `/stream`, and `/health`, environment configuration,
//! and a standalone CLI binary.

pub mod config;
pub mod server;

pub use config::Config;
pub use server::app::{build_app, build_resolver, AppState};
