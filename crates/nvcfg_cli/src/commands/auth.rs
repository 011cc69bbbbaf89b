//! Password subcommand implementations.
//!
//! The store holds a 32-byte binary hash, never the plaintext:
//! `set-password` digests the given text with SHA-256 before writing.

use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;

/// Prints the stored password hash as hex.
pub fn read_password(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = super::open_store(path)?;
    let hash = store.read_password()?;
    println!("{}", super::to_hex(&hash));
    Ok(())
}

/// Hashes `password` with SHA-256 and stores the digest.
pub fn set_password(path: &Path, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let digest: [u8; 32] = Sha256::digest(password.as_bytes()).into();

    let mut store = super::open_store(path)?;
    store.write_password(&digest)?;
    info!("password hash updated");
    Ok(())
}
