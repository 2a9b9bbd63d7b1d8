//! cmake-executor - locate, validate, and invoke CMake for native and cross builds
//!
//! This crate finds a usable CMake once per machine role, runs it with
//! memoized output capture, and can stage build directories so CMake skips
//! its slow compiler detection.

pub mod cmake;
pub mod core;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock process launcher and fake programs.
#[cfg(test)]
pub mod test_support;

pub use crate::cmake::{CMakeExecutor, CMakeRegistry, DiscoveryRecord};
pub use crate::core::{Environment, MachineChoice};
pub use crate::util::CallOutput;
