//! Machine roles for cross builds.
//!
//! A cross build involves two machines: the *build* machine running the
//! compilation and the *host* machine the output will run on. For a native
//! build both roles refer to the same physical machine.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Which machine a tool instance targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineChoice {
    /// The machine performing the build.
    Build,
    /// The machine the build output runs on.
    Host,
}

impl MachineChoice {
    /// Short lowercase name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineChoice::Build => "build",
            MachineChoice::Host => "host",
        }
    }
}

impl fmt::Display for MachineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} machine", self.as_str())
    }
}

impl FromStr for MachineChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "build" => Ok(MachineChoice::Build),
            "host" => Ok(MachineChoice::Host),
            other => bail!("unknown machine `{}` (expected `build` or `host`)", other),
        }
    }
}

/// One value per machine role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerMachine<T> {
    build: T,
    host: T,
}

impl<T> PerMachine<T> {
    pub fn new(build: T, host: T) -> Self {
        PerMachine { build, host }
    }

    pub fn get(&self, machine: MachineChoice) -> &T {
        match machine {
            MachineChoice::Build => &self.build,
            MachineChoice::Host => &self.host,
        }
    }

    pub fn get_mut(&mut self, machine: MachineChoice) -> &mut T {
        match machine {
            MachineChoice::Build => &mut self.build,
            MachineChoice::Host => &mut self.host,
        }
    }
}
