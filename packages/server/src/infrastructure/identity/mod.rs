//! Identity gate implementations.

pub mod jwt;

pub use jwt::{JwtClaims, JwtIdentityGate};
