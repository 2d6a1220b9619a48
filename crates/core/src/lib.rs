//! Cafe Spot Core - Shared types and validators.
//!
//! This crate provides the types used across all Cafe Spot components:
//! - `app` - Persistence store, domain models and services
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails and user types
//! - [`validation`] - Input predicates and the CNPJ mask

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
