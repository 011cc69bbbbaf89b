//! End-to-end properties of the store, exercised through the public API
//! against seeded device images.

use nvcfg_core::{ConfigStore, Geometry, StoreError, CONFIG_MAX_LEN, PASSWORD_LEN};
use nvcfg_device::MemoryDevice;
use nvcfg_testkit::fixtures::{
    fresh_store, image_of, reopen, seeded_store, OTHER_HASH, SAMPLE_CONFIG, SAMPLE_HASH,
};

#[test]
fn round_trip_password_and_config() {
    let mut store = seeded_store(SAMPLE_CONFIG);
    assert_eq!(store.read_password().unwrap(), SAMPLE_HASH);
    assert_eq!(store.load_config().unwrap(), SAMPLE_CONFIG);
    assert_eq!(
        store.get_config_size().unwrap(),
        SAMPLE_CONFIG.len() as u16
    );
}

#[test]
fn state_survives_reopen() {
    let image = image_of(seeded_store(SAMPLE_CONFIG));
    let mut store = reopen(image);
    assert_eq!(store.read_password().unwrap(), SAMPLE_HASH);
    assert_eq!(store.load_config().unwrap(), SAMPLE_CONFIG);
}

#[test]
fn oversize_config_leaves_prior_state_unchanged() {
    let mut store = seeded_store(SAMPLE_CONFIG);
    let before = image_of(store);

    let mut store = reopen(before.clone());
    let oversize = "q".repeat(CONFIG_MAX_LEN);
    assert!(matches!(
        store.save_config(&oversize),
        Err(StoreError::ConfigTooLarge { .. })
    ));

    assert_eq!(image_of(store), before);
}

#[test]
fn password_and_config_writes_are_independent() {
    let mut store = seeded_store(SAMPLE_CONFIG);

    store.write_password(&OTHER_HASH).unwrap();
    assert_eq!(store.load_config().unwrap(), SAMPLE_CONFIG);

    store.save_config("replaced").unwrap();
    assert_eq!(store.read_password().unwrap(), OTHER_HASH);
}

#[test]
fn repeated_commits_are_byte_identical() {
    let mut store = seeded_store(SAMPLE_CONFIG);
    store.save_config(SAMPLE_CONFIG).unwrap();
    let first = image_of(store);

    let mut store = reopen(first.clone());
    store.write_password(&SAMPLE_HASH).unwrap();
    store.save_config(SAMPLE_CONFIG).unwrap();
    assert_eq!(image_of(store), first);
}

#[test]
fn empty_config_round_trips() {
    let mut store = fresh_store();
    store.write_password(&SAMPLE_HASH).unwrap();
    store.save_config("").unwrap();

    assert_eq!(store.load_config().unwrap(), "");
    assert_eq!(store.get_config_size().unwrap(), 0);
    assert_eq!(store.read_password().unwrap(), SAMPLE_HASH);
}

#[test]
fn single_bit_rot_anywhere_in_the_region_is_survivable() {
    // Full backup coverage: every primary region byte is restorable.
    let total_size = PASSWORD_LEN + SAMPLE_CONFIG.len() + 1;
    let geometry = Geometry::default();
    assert_eq!(geometry.backup_size(total_size), total_size);

    // The terminator byte is the one exception: without it the config
    // scans as absent rather than corrupt, so the sweep skips it.
    for offset in (0..total_size).filter(|&o| o != total_size - 1) {
        let mut device = MemoryDevice::with_image(image_of(seeded_store(SAMPLE_CONFIG)));
        device.corrupt(geometry.region_addr(offset), 0x04);
        let mut store = ConfigStore::new(device, geometry).unwrap();

        assert_eq!(
            store.read_password().unwrap(),
            SAMPLE_HASH,
            "bit rot at region offset {offset} broke the password"
        );
        assert_eq!(
            store.load_config().unwrap(),
            SAMPLE_CONFIG,
            "bit rot at region offset {offset} broke the config"
        );
    }
}
