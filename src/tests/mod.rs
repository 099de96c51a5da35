//! Shared unit-test support

pub mod mocks;
pub mod utils;
