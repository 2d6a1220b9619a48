//! Cafe Spot application library.
//!
//! A directory of artisanal cafes kept in local JSON storage. Clients browse
//! and like listings; administrators create, edit, deactivate and remove
//! them.
//!
//! Front ends build an [`AppContext`](state::AppContext), call
//! [`bootstrap`](state::AppContext::bootstrap) once, then go through the
//! [`auth`](state::AppContext::auth) and [`cafes`](state::AppContext::cafes)
//! services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use error::{AppError, ErrorKind};
pub use state::AppContext;
