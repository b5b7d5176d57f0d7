//! Common domain types shared by the MentorMatch services.

pub mod types;

pub use types::*;
