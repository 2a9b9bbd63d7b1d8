//! Core types: machine roles, the build environment, program handles and versions.

pub mod environment;
pub mod machine;
pub mod program;
pub mod version;

pub use environment::{Environment, MachineEnvironment};
pub use machine::{MachineChoice, PerMachine};
pub use program::{EntryProgram, ExternalProgram, PathProgram};
