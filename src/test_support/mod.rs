//! Test utilities and mocks for unit tests.
//!
//! Provides a mock process launcher that records every launch and replies
//! with canned output, plus small helpers for fake CMake binaries.
//!
//! # Example
//!
//! ```rust,ignore
//! use cmake_executor::test_support::MockLauncher;
//!
//! let launcher = Arc::new(MockLauncher::new());
//! launcher.respond_version(&cmake_path, "3.27.1");
//! let registry = CMakeRegistry::with_launcher(launcher.clone());
//! // ...
//! assert_eq!(launcher.launch_count(), 1);
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::program::ExternalProgram;
use crate::util::process::{CallOutput, Launcher, ProcessBuilder};

/// Pattern for matching commands in MockLauncher.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

#[derive(Debug, Clone)]
enum MockResponse {
    Output(CallOutput),
    Error(io::ErrorKind),
}

/// One recorded launch.
#[derive(Debug, Clone)]
pub struct LaunchRecord {
    /// Program and arguments joined by spaces.
    pub command: String,
    pub env: Option<BTreeMap<String, String>>,
    pub cwd: Option<PathBuf>,
}

/// Mock process launcher.
///
/// Unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct MockLauncher {
    expectations: Mutex<Vec<(CommandPattern, MockResponse)>>,
    launches: Mutex<Vec<LaunchRecord>>,
}

impl MockLauncher {
    pub fn new() -> Self {
        MockLauncher::default()
    }

    fn push(&self, pattern: CommandPattern, response: MockResponse) {
        self.expectations.lock().unwrap().push((pattern, response));
    }

    /// Reply to an exact command with `output`.
    pub fn respond(&self, cmd: &str, output: CallOutput) {
        self.push(CommandPattern::Exact(cmd.to_string()), MockResponse::Output(output));
    }

    /// Reply to any command containing `substring` with `output`.
    pub fn respond_contains(&self, substring: &str, output: CallOutput) {
        self.push(
            CommandPattern::Contains(substring.to_string()),
            MockResponse::Output(output),
        );
    }

    /// Make `<cmake> --version` report `version`.
    pub fn respond_version(&self, cmake: &Path, version: &str) {
        self.respond(
            &format!("{} --version", cmake.display()),
            CallOutput::new(
                0,
                format!(
                    "cmake version {}\n\nCMake suite maintained and supported by Kitware (kitware.com/cmake).\n",
                    version
                ),
                "",
            ),
        );
    }

    /// Fail an exact command with an I/O error of `kind`.
    pub fn fail(&self, cmd: &str, kind: io::ErrorKind) {
        self.push(CommandPattern::Exact(cmd.to_string()), MockResponse::Error(kind));
    }

    /// Number of launches so far.
    pub fn launch_count(&self) -> usize {
        self.launches.lock().unwrap().len()
    }

    /// All launches so far.
    pub fn launches(&self) -> Vec<LaunchRecord> {
        self.launches.lock().unwrap().clone()
    }

    /// The most recent launch.
    pub fn last_launch(&self) -> Option<LaunchRecord> {
        self.launches.lock().unwrap().last().cloned()
    }
}

impl Launcher for MockLauncher {
    fn launch(&self, process: &ProcessBuilder) -> io::Result<CallOutput> {
        let command = process.display_command();
        self.launches.lock().unwrap().push(LaunchRecord {
            command: command.clone(),
            env: process.get_env().cloned(),
            cwd: process.get_cwd().map(Path::to_path_buf),
        });

        let expectations = self.expectations.lock().unwrap();
        match expectations.iter().find(|(p, _)| p.matches(&command)) {
            Some((_, MockResponse::Output(out))) => Ok(out.clone()),
            Some((_, MockResponse::Error(kind))) => Err(io::Error::from(*kind)),
            None => Ok(CallOutput::new(0, "", "")),
        }
    }
}

/// A program handle with a fixed path and found flag.
#[derive(Debug, Clone)]
pub struct FakeProgram {
    path: PathBuf,
    found: bool,
}

impl FakeProgram {
    pub fn found(path: impl Into<PathBuf>) -> Self {
        FakeProgram {
            path: path.into(),
            found: true,
        }
    }

    pub fn missing(path: impl Into<PathBuf>) -> Self {
        FakeProgram {
            path: path.into(),
            found: false,
        }
    }
}

impl ExternalProgram for FakeProgram {
    fn name(&self) -> &str {
        "cmake"
    }

    fn found(&self) -> bool {
        self.found
    }

    fn get_command(&self) -> Vec<String> {
        vec![self.path.to_string_lossy().into_owned()]
    }

    fn get_path(&self) -> Option<PathBuf> {
        self.found.then(|| self.path.clone())
    }
}

/// Create an executable shell script named `name` in `dir`.
pub fn executable_script(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    path
}
