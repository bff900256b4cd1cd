//! Infrastructure Layer
//!
//! Database implementations and concrete collaborators.

pub mod argon2;
pub mod postgres;

pub use argon2::Argon2Verifier;
pub use postgres::PgAuthRepository;
