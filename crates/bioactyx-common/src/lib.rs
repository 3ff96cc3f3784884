//! bioactyx-common — Shared error type and the allowlisted HTTP client used across all bioactyx crates.

pub mod error;
pub mod sandbox;

pub use error::{BioactyxError, Result};
pub use sandbox::SandboxClient;
