//! Shelf application library
//!
//! Hosts the application modules and the bootstrap used by the server binary
//! and the CLI.

pub mod app;
pub mod modules;

pub use app::{migrate, registry, router, serve, Storage};
