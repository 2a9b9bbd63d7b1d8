//! Shared utilities

pub mod config;
pub mod fs;
pub mod process;

pub use config::{BinaryEntry, MachineFile};
pub use process::{CallOutput, Launcher, ProcessBuilder, SystemLauncher};
