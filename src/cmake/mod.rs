//! CMake discovery and invocation.
//!
//! CMake is searched for once per machine role and remembered in a
//! [`CMakeRegistry`]; [`CMakeExecutor`] runs it with memoized results and can
//! pre-seed build directories so CMake skips compiler detection.

pub mod executor;
pub mod fake_build;
pub mod probe;
pub mod registry;
pub mod search;

pub use executor::{CMakeExecutor, ExecutorError};
pub use probe::ProbeError;
pub use registry::{CMakeRegistry, DiscoveryRecord, InvocationKey};
pub use search::CandidateSearch;
