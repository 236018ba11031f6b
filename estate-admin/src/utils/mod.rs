pub mod jwt;

pub use jwt::{decode_claims, TokenClaims};
