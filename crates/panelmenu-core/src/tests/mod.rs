//! Test module for panelmenu-core
//!
//! Cross-module tests for:
//! - Hover corridor prediction and the leave timer
//! - Drag reorder sessions on the pinned grid
//! - Single-open coordination across surfaces
//! - Settings routing and handler idempotence
//! - Pinned-list persistence format
//! - Engine composition and config reloads

// Test modules use exact float comparisons and test-specific casts
#![allow(clippy::float_cmp, clippy::cast_precision_loss)]

mod engine_tests;
mod navigation_tests;
mod surface_tests;
