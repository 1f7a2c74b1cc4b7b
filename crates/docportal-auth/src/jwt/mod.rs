//! JWT session token encoding, decoding, and claims.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
