//! Typed wrappers over the backend endpoints.
//!
//! Each accessor borrows the [`crate::Client`] and routes protected calls
//! through [`crate::Client::request`], so the session policy is applied
//! uniformly. Login, registration and token refresh are the only public
//! calls.

mod admin;
mod auth;
mod exercises;
mod routines;
mod users;
mod workouts;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use exercises::ExercisesApi;
pub use routines::RoutinesApi;
pub use users::UsersApi;
pub use workouts::WorkoutsApi;
