//! # End-to-end tests
//!
//! Scenario tests that cross module boundaries: a full fixture render through
//! to BMP bytes, and the provider client against a mock HTTP server. Unit tests
//! live next to the code they cover.

mod render_tests;
mod source_tests;
