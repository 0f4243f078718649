//! Session-bound client for the fitness-tracking REST backend.
//!
//! Every call to the backend goes through one [`Client`], which owns the
//! bearer token and the current user record and applies the same
//! expired-session policy everywhere.
//!
//! # Architecture
//!
//! - **Client**: builds authenticated requests and intercepts 401s
//! - **Session**: injected key/value store plus an explicit session state
//! - **Navigator**: seam for expiry notices and redirects
//! - **API**: typed wrappers for auth, exercises, routines, workouts, users
//!   and admin stats
//!
//! # Modules
//!
//! - [`client`]: the session-bound HTTP client
//! - [`session`]: session storage and lifecycle
//! - [`navigator`]: notice and redirect sink
//! - [`api`]: endpoint wrappers
//! - [`views`]: routine view fan-out and dashboard aggregates
//! - [`validation`]: checks run before dispatch
//! - [`config`]: layered configuration for the CLI

#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cast_precision_loss)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod navigator;
pub mod session;
pub mod types;
pub mod validation;
pub mod views;

pub use client::{Client, ClientBuilder, RequestOptions, Routes};
pub use error::{Error, Result};
pub use navigator::{LogNavigator, Navigator, RecordingNavigator};
pub use session::{FileSessionStore, MemorySessionStore, SessionState, SessionStore, UserRecord};
