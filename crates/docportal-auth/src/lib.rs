//! # docportal-auth
//!
//! Verification of the session tokens issued by the identity provider.
//! DocPortal never authenticates users itself; it only checks that a request
//! carries a valid HS256 token signed with the shared secret.
//!
//! ## Modules
//!
//! - `jwt`: claims, token validation, and development token minting

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
