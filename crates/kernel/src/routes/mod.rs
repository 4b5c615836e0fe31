//! HTTP route handlers.

pub mod admin;
pub mod health;
pub mod helpers;
pub mod newsletter;
pub mod posts;
pub mod tags;
pub mod tokens;
