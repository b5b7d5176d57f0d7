//! Domain modules containing business logic and handlers.

pub mod auth;
pub mod authorization;
pub mod health;
pub mod matching;
pub mod mentors;
pub mod profile;
