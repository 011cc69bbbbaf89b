//! Power-cut sweep: a commit interrupted at every write boundary must
//! leave a store that reads the old value, the new value, or fails loudly.
//! Silently wrong bytes are the one forbidden outcome.

use nvcfg_core::{ConfigStore, Geometry, StoreError};
use nvcfg_device::MemoryDevice;
use nvcfg_testkit::fixtures::{image_of, reopen, seeded_store, SAMPLE_HASH, OTHER_HASH};
use nvcfg_testkit::FaultDevice;

const OLD_CONFIG: &str = "mode=old;relay=3";
const NEW_CONFIG: &str = "mode=new;relay=3;input=7;debounce=50";

/// Upper bound on block writes a single commit performs: empty-config
/// marker, section data, backup, tables, CRC triple.
const MAX_COMMIT_WRITES: usize = 6;

/// Replays `commit` against a committed base image with power cut after
/// `cut` writes, and returns the post-crash image.
fn crash_during_save(base_image: Vec<u8>, cut: usize) -> Vec<u8> {
    let device = FaultDevice::new(MemoryDevice::with_image(base_image), cut);
    let mut store = ConfigStore::new(device, Geometry::default()).unwrap();

    // With writes dropped, the commit usually dies on read-back
    // verification; either way the image below is what survives.
    let _ = store.save_config(NEW_CONFIG);
    store.into_device().into_inner().image()
}

#[test]
fn power_cut_at_every_boundary_never_yields_wrong_config() {
    let base_image = image_of(seeded_store(OLD_CONFIG));

    for cut in 0..=MAX_COMMIT_WRITES {
        let image = crash_during_save(base_image.clone(), cut);
        let mut store = reopen(image);

        match store.load_config() {
            Ok(text) => assert!(
                text == OLD_CONFIG || text == NEW_CONFIG,
                "cut after {cut} writes returned wrong bytes: {text:?}"
            ),
            Err(
                StoreError::Unrecoverable { .. }
                | StoreError::ChecksumVote { .. }
                | StoreError::WriteVerify { .. },
            ) => {}
            Err(other) => panic!("cut after {cut} writes: unexpected error {other}"),
        }
    }
}

#[test]
fn power_cut_before_any_write_preserves_old_state() {
    let base_image = image_of(seeded_store(OLD_CONFIG));
    let image = crash_during_save(base_image, 0);
    let mut store = reopen(image);

    assert_eq!(store.load_config().unwrap(), OLD_CONFIG);
    assert_eq!(store.read_password().unwrap(), SAMPLE_HASH);
}

#[test]
fn completed_commit_survives_reopen() {
    let base_image = image_of(seeded_store(OLD_CONFIG));
    let image = crash_during_save(base_image, MAX_COMMIT_WRITES);
    let mut store = reopen(image);

    assert_eq!(store.load_config().unwrap(), NEW_CONFIG);
    assert_eq!(store.read_password().unwrap(), SAMPLE_HASH);
}

#[test]
fn interrupted_commit_reports_write_verify_failure() {
    let base_image = image_of(seeded_store(OLD_CONFIG));
    let device = FaultDevice::new(MemoryDevice::with_image(base_image), 0);
    let mut store = ConfigStore::new(device, Geometry::default()).unwrap();

    let result = store.save_config(NEW_CONFIG);
    assert!(matches!(result, Err(StoreError::WriteVerify { .. })));
}

#[test]
fn power_cut_during_password_change_never_mixes_hashes() {
    let base_image = image_of(seeded_store(OLD_CONFIG));

    for cut in 0..=MAX_COMMIT_WRITES {
        let device = FaultDevice::new(MemoryDevice::with_image(base_image.clone()), cut);
        let mut store = ConfigStore::new(device, Geometry::default()).unwrap();
        let _ = store.write_password(&OTHER_HASH);
        let image = store.into_device().into_inner().image();

        let mut store = reopen(image);
        match store.read_password() {
            Ok(hash) => assert!(
                hash == SAMPLE_HASH || hash == OTHER_HASH,
                "cut after {cut} writes returned a mixed hash"
            ),
            Err(
                StoreError::Unrecoverable { .. } | StoreError::ChecksumVote { .. },
            ) => {}
            Err(other) => panic!("cut after {cut} writes: unexpected error {other}"),
        }
    }
}
