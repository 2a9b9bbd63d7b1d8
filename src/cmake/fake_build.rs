//! Pre-seeding a CMake build directory.
//!
//! On its first run in a fresh build directory CMake probes every enabled
//! compiler, which is slow and always gives the same answer here. Writing a
//! platform marker into `CMakeCache.txt` and compiler descriptor files under
//! `CMakeFiles/<version>/` makes CMake believe the probing already happened.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::util::fs::{ensure_dir, write_string_if_absent};

/// Cache file CMake reads platform state from.
pub const CACHE_FILE: &str = "CMakeCache.txt";

/// Marker telling CMake platform detection already ran.
pub const PLATFORM_MARKER: &str = "CMAKE_PLATFORM_INFO_INITIALIZED:INTERNAL=1\n";

/// A language whose compiler detection is faked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubLanguage {
    C,
    Cxx,
}

impl StubLanguage {
    pub const ALL: [StubLanguage; 2] = [StubLanguage::C, StubLanguage::Cxx];

    /// CMake's name for the language.
    pub fn cmake_name(&self) -> &'static str {
        match self {
            StubLanguage::C => "C",
            StubLanguage::Cxx => "CXX",
        }
    }

    /// Suffix of `CMAKE_COMPILER_IS_GNU*` for the language.
    fn gnu_suffix(&self) -> &'static str {
        match self {
            StubLanguage::C => "CC",
            StubLanguage::Cxx => "CXX",
        }
    }

    /// File name of the descriptor, e.g. `CMakeCCompiler.cmake`.
    pub fn file_name(&self) -> String {
        format!("CMake{}Compiler.cmake", self.cmake_name())
    }

    /// Descriptor contents pointing at `compiler`.
    pub fn descriptor(&self, compiler: &Path, pointer_size: usize) -> String {
        let lang = self.cmake_name();
        format!(
            "# Fake CMake file to skip the boring and slow stuff\n\
             set(CMAKE_{lang}_COMPILER \"{compiler}\") # Just give CMake a valid full path to any file\n\
             set(CMAKE_{lang}_COMPILER_ID \"GNU\") # Pretend we have found GCC\n\
             set(CMAKE_COMPILER_IS_GNU{gnu} 1)\n\
             set(CMAKE_{lang}_COMPILER_LOADED 1)\n\
             set(CMAKE_{lang}_COMPILER_WORKS TRUE)\n\
             set(CMAKE_{lang}_ABI_COMPILED TRUE)\n\
             set(CMAKE_SIZEOF_VOID_P \"{pointer_size}\")\n",
            lang = lang,
            compiler = compiler.display().to_string().replace('\\', "/"),
            gnu = self.gnu_suffix(),
            pointer_size = pointer_size,
        )
    }
}

/// Size of a pointer in the running process, in bytes.
pub fn native_pointer_size() -> usize {
    std::mem::size_of::<usize>()
}

/// Pick an existing executable to name as the compiler.
///
/// CMake only checks that the file exists; it is never run as a compiler.
pub fn stub_compiler_path(fallback: Option<&Path>) -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.canonicalize().ok())
        .filter(|p| p.is_file())
        .or_else(|| fallback.map(Path::to_path_buf))
}

fn is_plain_component(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
}

/// Stage the marker and compiler descriptors in `build_dir`.
///
/// Existing files are left untouched, so repeated staging is a no-op.
/// `cmake_version` names a directory and must be a single plain component.
pub fn stage_fake_build(build_dir: &Path, cmake_version: &str, compiler: &Path) -> Result<()> {
    if !is_plain_component(cmake_version) {
        bail!(
            "refusing to stage fake build for CMake version `{}`",
            cmake_version
        );
    }

    ensure_dir(build_dir)?;

    if write_string_if_absent(&build_dir.join(CACHE_FILE), PLATFORM_MARKER)? {
        tracing::debug!("Wrote platform marker in {}", build_dir.display());
    }

    let comp_dir = build_dir.join("CMakeFiles").join(cmake_version);
    ensure_dir(&comp_dir)?;

    let pointer_size = native_pointer_size();
    for lang in StubLanguage::ALL {
        let path = comp_dir.join(lang.file_name());
        if write_string_if_absent(&path, &lang.descriptor(compiler, pointer_size))? {
            tracing::debug!("Wrote fake {} compiler file {}", lang.cmake_name(), path.display());
        }
    }

    Ok(())
}
