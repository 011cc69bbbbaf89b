//! Verify command implementation.

use nvcfg_core::StoreError;
use std::path::Path;

/// Runs the verify command: exercises both read paths and reports store
/// health. Reads may self-heal the image as a side effect; that is the
/// store's normal behavior, not a verification special case.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying image at {}", path.display());
    println!();

    let mut store = super::open_store(path)?;
    let mut failures = 0;

    match store.read_password() {
        Ok(_) => println!("password  OK"),
        Err(error) => {
            failures += 1;
            print_failure("password", &error);
        }
    }

    match store.load_config() {
        Ok(text) => println!("config    OK ({} data bytes)", text.len()),
        Err(error) => {
            failures += 1;
            print_failure("config", &error);
        }
    }

    println!();
    if failures == 0 {
        println!("Store is healthy");
        Ok(())
    } else {
        Err(format!("{failures} section(s) failed verification").into())
    }
}

fn print_failure(section: &str, error: &StoreError) {
    match error {
        StoreError::ChecksumVote { .. } => println!("{section}  FAILED (CRC16 vote): {error}"),
        StoreError::Unrecoverable { .. } => println!("{section}  FAILED (unrecoverable): {error}"),
        _ => println!("{section}  FAILED: {error}"),
    }
}
