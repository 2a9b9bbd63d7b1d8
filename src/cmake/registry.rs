//! Process-lifetime CMake state: discovery results and memoized invocations.
//!
//! A [`CMakeRegistry`] is created once by the caller and shared by reference
//! with every [`CMakeExecutor`](super::CMakeExecutor). Discovery runs at most
//! once per machine role and its outcome is final. Invocation results are
//! stored once per key and replayed verbatim, including failures.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cmake::probe::check_cmake;
use crate::cmake::search::CandidateSearch;
use crate::core::environment::MachineEnvironment;
use crate::core::machine::{MachineChoice, PerMachine};
use crate::core::program::ExternalProgram;
use crate::core::version::version_compare;
use crate::util::process::{CallOutput, Launcher, SystemLauncher};

/// Outcome of CMake discovery for one machine role.
#[derive(Debug, Clone, Default)]
pub enum DiscoveryRecord {
    /// Discovery has not run yet.
    #[default]
    Unresolved,
    /// A working CMake was found.
    Resolved {
        program: Arc<dyn ExternalProgram>,
        version: String,
    },
    /// Discovery ran and nothing usable was found.
    Absent,
}

impl DiscoveryRecord {
    pub fn is_resolved(&self) -> bool {
        matches!(self, DiscoveryRecord::Resolved { .. })
    }
}

/// Exact-match key for a memoized invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvocationKey {
    /// Full CMake command, identifying the binary.
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub build_dir: PathBuf,
    /// Environment the process sees, sorted so order never matters. Kept as
    /// raw OS strings so non-UTF-8 values never collapse into one key.
    pub env: BTreeMap<OsString, OsString>,
}

/// Shared discovery and invocation caches.
pub struct CMakeRegistry {
    launcher: Arc<dyn Launcher>,
    discovery: Mutex<PerMachine<DiscoveryRecord>>,
    invocations: Mutex<HashMap<InvocationKey, CallOutput>>,
}

impl fmt::Debug for CMakeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CMakeRegistry")
            .field("discovery", &*lock(&self.discovery))
            .field("invocations", &lock(&self.invocations).len())
            .finish()
    }
}

impl Default for CMakeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Every write is a single insert, so a poisoned lock still holds consistent state.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CMakeRegistry {
    /// Create a registry that launches real processes.
    pub fn new() -> Self {
        Self::with_launcher(Arc::new(SystemLauncher))
    }

    /// Create a registry with a custom process launcher.
    pub fn with_launcher(launcher: Arc<dyn Launcher>) -> Self {
        CMakeRegistry {
            launcher,
            discovery: Mutex::new(PerMachine::default()),
            invocations: Mutex::new(HashMap::new()),
        }
    }

    pub fn launcher(&self) -> &dyn Launcher {
        self.launcher.as_ref()
    }

    /// Current discovery record for `machine`, without triggering discovery.
    pub fn record(&self, machine: MachineChoice) -> DiscoveryRecord {
        lock(&self.discovery).get(machine).clone()
    }

    /// Find CMake for `machine`, running the search only the first time.
    ///
    /// `min_version` only gates candidates during that first search; later
    /// callers get the stored record whatever they require.
    pub fn discover(
        &self,
        env: &dyn MachineEnvironment,
        machine: MachineChoice,
        min_version: &str,
        silent: bool,
    ) -> DiscoveryRecord {
        // Held for the whole search so a role is never probed twice
        let mut slots = lock(&self.discovery);

        match slots.get(machine) {
            DiscoveryRecord::Absent => {
                tracing::debug!("CMake binary for {} is cached as not found", machine);
                return DiscoveryRecord::Absent;
            }
            record @ DiscoveryRecord::Resolved { .. } => {
                tracing::debug!("CMake binary for {} is cached", machine);
                return record.clone();
            }
            DiscoveryRecord::Unresolved => {
                tracing::debug!("CMake binary for {} is not cached", machine);
            }
        }

        let record = self.search(env, machine, min_version, silent);
        *slots.get_mut(machine) = record.clone();
        record
    }

    fn search(
        &self,
        env: &dyn MachineEnvironment,
        machine: MachineChoice,
        min_version: &str,
        silent: bool,
    ) -> DiscoveryRecord {
        for candidate in CandidateSearch::new(env, machine) {
            tracing::debug!(
                "Trying CMake binary {} for {} at {:?}",
                candidate.name(),
                machine,
                candidate.get_command()
            );

            let version = match check_cmake(self.launcher(), candidate.as_ref()) {
                Ok(version) => version,
                Err(e) if e.is_warning() => {
                    match e.hint() {
                        Some(hint) => tracing::warn!("{}\n\n{}", e, hint),
                        None => tracing::warn!("{}", e),
                    }
                    continue;
                }
                Err(e) => {
                    tracing::info!("{}", e);
                    continue;
                }
            };

            if !version_compare(&version, min_version) {
                tracing::warn!(
                    "The version of CMake {} is {} but version {} is required",
                    candidate.get_command().join(" "),
                    version,
                    min_version
                );
                continue;
            }

            if !silent {
                let path = candidate
                    .get_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| candidate.name().to_string());
                tracing::info!("Found CMake: {} ({})", path, version);
            }

            return DiscoveryRecord::Resolved {
                program: candidate,
                version,
            };
        }

        if !silent {
            tracing::info!("Found CMake: NO");
        }
        DiscoveryRecord::Absent
    }

    /// Look up a memoized invocation.
    pub fn cached(&self, key: &InvocationKey) -> Option<CallOutput> {
        lock(&self.invocations).get(key).cloned()
    }

    /// Store an invocation result. An existing entry is never replaced;
    /// the stored value is returned either way.
    pub fn store(&self, key: InvocationKey, output: CallOutput) -> CallOutput {
        lock(&self.invocations)
            .entry(key)
            .or_insert(output)
            .clone()
    }

    /// Number of memoized invocations.
    pub fn cached_invocations(&self) -> usize {
        lock(&self.invocations).len()
    }
}
