//! Core types, store traits and business rules for the Spark dating backend.
//!
//! This crate is free of HTTP and SQL dependencies. Storage backends implement
//! the traits in [`store`]; the HTTP layer drives [`engine::SwipeEngine`] and
//! [`account::AccountService`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod clock;
pub mod engine;
pub mod error;
pub mod memory;
pub mod password;
pub mod store;
pub mod swipe;
pub mod user;

pub use error::{Error, Result};
