//! Test utilities for unit and HTTP-level testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - An in-memory repository implementation for mocking persistence
//! - `TestAppStateBuilder` for wiring routes against the in-memory repository

mod app_state_builder;
mod factories;
mod subscription_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use subscription_mocks::*;
