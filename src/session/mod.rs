//! Client-side session storage and lifecycle.
//!
//! The session lives in an injected [`SessionStore`] under three keys:
//! `access_token`, `refresh_token` and `user` (JSON-encoded). At most one
//! session is active per store; no stored token means unauthenticated.
//!
//! # Architecture
//!
//! - [`SessionStore`]: key/value storage seam (`get`/`set`/`remove`/`clear`)
//! - [`MemorySessionStore`]: in-memory store, shared between clones
//! - [`FileSessionStore`]: the same contract persisted to a JSON file
//! - [`SessionState`]: explicit `LoggedOut` / `LoggedIn` state machine
//!
//! # Example
//!
//! ```rust
//! use fitness_client::session::{MemorySessionStore, SessionState};
//!
//! let store = MemorySessionStore::new();
//! let state = SessionState::load(&store).unwrap();
//! assert!(!state.is_logged_in());
//! ```

mod state;
mod store;

pub use state::{Session, SessionEvent, SessionState, UserRecord};
pub use store::{
    ACCESS_TOKEN_KEY, FileSessionStore, MemorySessionStore, REFRESH_TOKEN_KEY, SessionStore,
    USER_KEY,
};
