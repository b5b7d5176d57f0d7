//! Mentor directory domain module.

mod handler;
mod request;

pub use handler::*;
pub use request::*;
