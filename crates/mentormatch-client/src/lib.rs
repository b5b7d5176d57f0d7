//! Typed HTTP client for the MentorMatch API.
//!
//! Talks only through the documented HTTP contract; presentation layers sit
//! on top of this crate.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ClientError;
