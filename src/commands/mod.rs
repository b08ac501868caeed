//! Command implementations.
//!
//! - **generate**: find interfaces under a directory and write a mock for
//!   each one selected by the name filter

pub mod generate;

pub use generate::{destination_for, generate_mocks, generate_mocks_with};
