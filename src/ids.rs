//! Opaque row identifiers: 10 bytes from the OS random source, hex encoded.

use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Bytes of entropy per identifier; the encoded form is twice as long.
pub const ID_BYTES: usize = 10;

#[derive(Debug, Error)]
pub enum IdError {
    #[error("random source unavailable: {0}")]
    Entropy(#[from] rand::Error),
}

/// Generate a 20-character lowercase hex identifier.
pub fn generate() -> Result<String, IdError> {
    generate_with(&mut OsRng)
}

pub fn generate_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<String, IdError> {
    let mut bytes = [0u8; ID_BYTES];
    rng.try_fill_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}
