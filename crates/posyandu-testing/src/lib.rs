//! Test utilities for Posyandu services.
//!
//! Provides `MockAuth` for gateway identity headers.
//! Import in `#[cfg(test)]` blocks and `tests/` only, never in production code.

pub mod auth;
