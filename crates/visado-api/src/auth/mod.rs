//! Session authentication: JWT issuing/verification, password hashing, and
//! the middleware that turns a bearer token into an [`AuthContext`].
//!
//! [`AuthContext`]: models::AuthContext

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
