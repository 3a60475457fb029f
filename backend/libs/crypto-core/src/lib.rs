//! Credential and session-token primitives shared by the board backend.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, TokenError, TokenService};
pub use password::{hash_password, verify_password, PasswordError};
