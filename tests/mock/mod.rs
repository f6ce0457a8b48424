//! Mock-based tests.
//!
//! These tests use wiremock to simulate the RevueCrafters service without
//! hitting the real deployment.

pub mod api;
