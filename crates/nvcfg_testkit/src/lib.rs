//! # nvcfg Testkit
//!
//! Test utilities for the nvcfg store.
//!
//! The store's one hazard is asynchronous power loss: the device may stop
//! persisting between any two block writes. This crate provides the
//! machinery to reproduce that hazard deterministically:
//!
//! - [`FaultDevice`] - wraps any device and drops all writes after a
//!   configurable count, yielding the exact image a power cut at that
//!   write boundary would leave behind
//! - [`fixtures`] - seeded stores and sample secrets shared by the
//!   integration tests
//!
//! The adversarial integration tests live in this crate's `tests/`
//! directory: a power-cut sweep across every write boundary of a commit,
//! and the end-to-end corruption/recovery properties.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fault;
pub mod fixtures;

pub use fault::FaultDevice;
