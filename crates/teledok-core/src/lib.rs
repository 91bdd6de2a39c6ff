//! Core types and trait definitions for the Teledok registry.
//!
//! This crate is free of HTTP and database dependencies. The store, API and
//! client crates all depend on it.

// Native `async fn` in traits; the store trait spells out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod command;
pub mod entity;
pub mod error;
pub mod naming;
pub mod store;
pub mod validate;
pub mod view;

pub use error::{Entity, Error, FieldError, Result};
