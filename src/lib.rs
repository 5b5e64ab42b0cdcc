#![forbid(unsafe_code)]
//! Testyard: scaffold and run unit tests for UI component projects.
//!
//! The interesting part lives in [`engine`]: a transactional write engine
//! that applies a batch of queued file creations and appends as a single
//! all-or-nothing operation. Every pre-existing file is backed up before its
//! first mutation; on any failure, including a catchable termination signal
//! arriving mid-batch, the engine restores the pre-batch state byte-for-byte
//! and removes everything it created. The commands in [`commands`] are plan
//! builders around that engine: they decide what to queue and never perform
//! project-file I/O themselves.

pub mod commands;
pub mod constants;
pub mod engine;
pub mod logging;
pub mod project;
pub mod types;

pub use engine::WriteEngine;
