//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - A scripted in-process backend
//! - Store fixtures for local-only, online and offline setups
//! - Custom assertion macros

#![allow(dead_code)]

#[macro_use]
pub mod assertions;
pub mod fixtures;
pub mod mock_backend;

pub use fixtures::*;
pub use mock_backend::*;
