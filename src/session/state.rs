//! Session record and the logged-out / logged-in state machine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionStore, USER_KEY};
use crate::error::Result;

/// The authenticated principal as echoed by the backend.
///
/// Treated as an opaque bag of fields. Only the id and role are consulted
/// for control flow, and the backend is inconsistent about their casing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);

impl UserRecord {
    /// Wrap a JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// User id (`ID` or `id`).
    pub fn id(&self) -> Option<&str> {
        self.str_field(&["ID", "id"])
    }

    /// User role (`role` or `Role`).
    pub fn role(&self) -> Option<&str> {
        self.str_field(&["role", "Role"])
    }

    /// Whether the record carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role() == Some("admin")
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overwrite one field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Borrow the underlying JSON object.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn str_field(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|k| self.0.get(*k).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
    }
}

/// An active client-side session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserRecord,
}

/// Something that moves the session between states.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Successful login.
    LoggedIn(Session),
    /// Profile edit changed user-visible fields.
    ProfileUpdated(UserRecord),
    /// A new access token was issued for the same session.
    TokenRefreshed(String),
    /// Explicit logout.
    LoggedOut,
    /// Server rejected the token.
    Expired,
}

/// Explicit session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(Session),
}

impl SessionState {
    /// Apply a transition.
    ///
    /// `LoggedOut` only leaves on `LoggedIn`; profile and token updates
    /// against a logged-out state are dropped.
    #[must_use]
    pub fn apply(self, event: SessionEvent) -> Self {
        match (self, event) {
            (_, SessionEvent::LoggedIn(session)) => Self::LoggedIn(session),
            (_, SessionEvent::LoggedOut | SessionEvent::Expired) => Self::LoggedOut,
            (Self::LoggedIn(mut session), SessionEvent::ProfileUpdated(user)) => {
                session.user = user;
                Self::LoggedIn(session)
            }
            (Self::LoggedIn(mut session), SessionEvent::TokenRefreshed(token)) => {
                session.access_token = token;
                Self::LoggedIn(session)
            }
            (Self::LoggedOut, _) => Self::LoggedOut,
        }
    }

    /// Whether a session is active.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::LoggedIn(session) => Some(session),
            Self::LoggedOut => None,
        }
    }

    /// Read the state from a store.
    ///
    /// A stored token without a user record (or the reverse) counts as
    /// logged out. A missing refresh token is tolerated.
    pub fn load(store: &dyn SessionStore) -> Result<Self> {
        let Some(access_token) = store.get(ACCESS_TOKEN_KEY)? else {
            return Ok(Self::LoggedOut);
        };
        let Some(raw_user) = store.get(USER_KEY)? else {
            return Ok(Self::LoggedOut);
        };
        let user: UserRecord = serde_json::from_str(&raw_user)?;
        let refresh_token = store.get(REFRESH_TOKEN_KEY)?.unwrap_or_default();
        Ok(Self::LoggedIn(Session {
            access_token,
            refresh_token,
            user,
        }))
    }

    /// Write the state to a store. `LoggedOut` removes all three keys.
    pub fn save(&self, store: &dyn SessionStore) -> Result<()> {
        match self {
            Self::LoggedIn(session) => {
                store.set(ACCESS_TOKEN_KEY, &session.access_token)?;
                store.set(REFRESH_TOKEN_KEY, &session.refresh_token)?;
                store.set(USER_KEY, &serde_json::to_string(&session.user)?)?;
            }
            Self::LoggedOut => {
                store.remove(ACCESS_TOKEN_KEY)?;
                store.remove(REFRESH_TOKEN_KEY)?;
                store.remove(USER_KEY)?;
            }
        }
        Ok(())
    }
}
