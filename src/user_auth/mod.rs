//! User registration, login and bearer-token authentication
//!
//! Passwords are stored as argon2 PHC strings; access tokens are HS256 JWTs
//! whose subject is the user id.

pub mod handlers;
pub mod middleware;
pub mod service;

pub use middleware::{AuthUser, jwt_auth_middleware};
pub use service::{AuthError, AuthResponse, Claims, Credentials, UserAuthService};
