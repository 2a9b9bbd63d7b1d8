//! Ordered, lazily evaluated CMake candidates for one machine role.

use std::sync::Arc;

use crate::core::environment::MachineEnvironment;
use crate::core::machine::MachineChoice;
use crate::core::program::{EntryProgram, ExternalProgram, PathProgram};

/// Name used for CMake in machine files and program handles.
pub const CMAKE_TOOL: &str = "cmake";

#[derive(Debug, Clone, Copy)]
enum SearchState {
    Start,
    Defaults(usize),
    Done,
}

/// Iterator over CMake candidates.
///
/// A configured entry is authoritative: it is the only candidate, whether
/// or not it works. Defaults are only tried for the machine running the
/// build; a cross machine without configuration yields nothing.
pub struct CandidateSearch<'a> {
    env: &'a dyn MachineEnvironment,
    machine: MachineChoice,
    state: SearchState,
}

impl<'a> CandidateSearch<'a> {
    pub fn new(env: &'a dyn MachineEnvironment, machine: MachineChoice) -> Self {
        CandidateSearch {
            env,
            machine,
            state: SearchState::Start,
        }
    }
}

impl Iterator for CandidateSearch<'_> {
    type Item = Arc<dyn ExternalProgram>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                SearchState::Start => {
                    if let Some(entry) = self.env.lookup_entry(CMAKE_TOOL, self.machine) {
                        tracing::debug!(
                            "CMake binary for {} specified from machine file or env var as {}",
                            self.machine,
                            entry
                        );
                        // Never fall back if the user-specified binary is no good
                        self.state = SearchState::Done;
                        return Some(Arc::new(EntryProgram::from_entry(CMAKE_TOOL, &entry)));
                    }

                    tracing::debug!("CMake binary missing from machine files and env vars");
                    self.state = if self.env.matches_build_machine(self.machine) {
                        SearchState::Defaults(0)
                    } else {
                        SearchState::Done
                    };
                }
                SearchState::Defaults(idx) => {
                    let Some(path) = self.env.default_cmake().get(idx) else {
                        self.state = SearchState::Done;
                        continue;
                    };
                    self.state = SearchState::Defaults(idx + 1);
                    tracing::debug!("Trying a default CMake fallback at {}", path);
                    return Some(Arc::new(PathProgram::new(CMAKE_TOOL, path.as_str())));
                }
                SearchState::Done => return None,
            }
        }
    }
}
