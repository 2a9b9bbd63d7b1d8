//! CLI integration tests for cmake-executor.
//!
//! These tests drive the binary against a fake `cmake` shell script, so they
//! only run on Unix-like systems.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const FAKE_CMAKE: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "cmake version 3.27.1"
    echo
    echo "CMake suite maintained and supported by Kitware (kitware.com/cmake)."
    exit 0
fi
if [ "$1" = "fail" ]; then
    echo "CMake Error: requested failure" >&2
    exit 3
fi
echo "args: $*"
exit 0
"#;

/// Write an executable fake cmake into `dir`.
fn fake_cmake(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, FAKE_CMAKE).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write a machine file whose `cmake` entry is `cmake`.
fn machine_file(dir: &Path, name: &str, cmake: &Path) -> PathBuf {
    let path = dir.join(name);
    fs::write(
        &path,
        format!("[binaries]\ncmake = \"{}\"\n", cmake.display()),
    )
    .unwrap();
    path
}

/// Get the cmake-executor command, isolated from the user's setup.
fn cmake_executor(home: &Path, path_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cmake-executor").unwrap();
    cmd.env("HOME", home)
        .env("PATH", path_dir)
        .env_remove("CMAKE")
        .env_remove("CMAKE_FOR_BUILD");
    cmd
}

// ============================================================================
// cmake-executor find
// ============================================================================

#[test]
fn test_find_uses_native_file() {
    let tmp = TempDir::new().unwrap();
    let cmake = fake_cmake(tmp.path(), "my-cmake");
    let native = machine_file(tmp.path(), "native.toml", &cmake);

    cmake_executor(tmp.path(), tmp.path())
        .arg("--native-file")
        .arg(&native)
        .arg("find")
        .assert()
        .success()
        .stdout(predicate::str::contains("my-cmake"))
        .stdout(predicate::str::contains("(3.27.1)"));
}

#[test]
fn test_find_falls_back_to_path() {
    let tmp = TempDir::new().unwrap();
    let bin = tmp.path().join("bin");
    fs::create_dir(&bin).unwrap();
    fake_cmake(&bin, "cmake");

    cmake_executor(tmp.path(), &bin)
        .arg("find")
        .assert()
        .success()
        .stdout(predicate::str::contains("3.27.1"));
}

#[test]
fn test_find_rejects_old_version() {
    let tmp = TempDir::new().unwrap();
    let cmake = fake_cmake(tmp.path(), "cmake");
    let native = machine_file(tmp.path(), "native.toml", &cmake);

    cmake_executor(tmp.path(), tmp.path())
        .arg("--native-file")
        .arg(&native)
        .args(["find", "--min-version", "99.0"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn test_find_explicit_missing_entry_does_not_fall_back() {
    let tmp = TempDir::new().unwrap();
    let bin = tmp.path().join("bin");
    fs::create_dir(&bin).unwrap();
    fake_cmake(&bin, "cmake");
    let native = machine_file(tmp.path(), "native.toml", &tmp.path().join("missing"));

    cmake_executor(tmp.path(), &bin)
        .arg("--native-file")
        .arg(&native)
        .arg("find")
        .assert()
        .failure()
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn test_find_cross_host_requires_entry() {
    let tmp = TempDir::new().unwrap();
    let bin = tmp.path().join("bin");
    fs::create_dir(&bin).unwrap();
    fake_cmake(&bin, "cmake");
    let cross = tmp.path().join("cross.toml");
    fs::write(&cross, "[binaries]\n").unwrap();

    cmake_executor(tmp.path(), &bin)
        .arg("--cross-file")
        .arg(&cross)
        .args(["find", "--machine", "host"])
        .assert()
        .failure();

    cmake_executor(tmp.path(), &bin)
        .arg("--cross-file")
        .arg(&cross)
        .args(["find", "--machine", "build"])
        .assert()
        .success();
}

#[test]
fn test_find_json() {
    let tmp = TempDir::new().unwrap();
    let cmake = fake_cmake(tmp.path(), "cmake");
    let native = machine_file(tmp.path(), "native.toml", &cmake);

    let output = cmake_executor(tmp.path(), tmp.path())
        .arg("--native-file")
        .arg(&native)
        .args(["find", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["found"], true);
    assert_eq!(report["machine"], "build");
    assert_eq!(report["version"], "3.27.1");
}

// ============================================================================
// cmake-executor run
// ============================================================================

#[test]
fn test_run_passes_arguments() {
    let tmp = TempDir::new().unwrap();
    let cmake = fake_cmake(tmp.path(), "cmake");
    let native = machine_file(tmp.path(), "native.toml", &cmake);
    let build_dir = tmp.path().join("build");

    cmake_executor(tmp.path(), tmp.path())
        .arg("--native-file")
        .arg(&native)
        .arg("run")
        .arg("--build-dir")
        .arg(&build_dir)
        .args(["--", "-S", "src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("args: -S src"));

    assert!(build_dir.is_dir());
}

#[test]
fn test_run_forwards_exit_code() {
    let tmp = TempDir::new().unwrap();
    let cmake = fake_cmake(tmp.path(), "cmake");
    let native = machine_file(tmp.path(), "native.toml", &cmake);

    cmake_executor(tmp.path(), tmp.path())
        .arg("--native-file")
        .arg(&native)
        .arg("run")
        .arg("--build-dir")
        .arg(tmp.path().join("build"))
        .args(["--", "fail"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("requested failure"));
}

#[test]
fn test_run_fake_build_stages_files() {
    let tmp = TempDir::new().unwrap();
    let cmake = fake_cmake(tmp.path(), "cmake");
    let native = machine_file(tmp.path(), "native.toml", &cmake);
    let build_dir = tmp.path().join("b2");

    for _ in 0..2 {
        cmake_executor(tmp.path(), tmp.path())
            .arg("--native-file")
            .arg(&native)
            .arg("run")
            .arg("--fake-build")
            .arg("--build-dir")
            .arg(&build_dir)
            .args(["--", "--version"])
            .assert()
            .success();
    }

    assert_eq!(
        fs::read_to_string(build_dir.join("CMakeCache.txt")).unwrap(),
        "CMAKE_PLATFORM_INFO_INITIALIZED:INTERNAL=1\n"
    );
    let c = fs::read_to_string(build_dir.join("CMakeFiles/3.27.1/CMakeCCompiler.cmake")).unwrap();
    assert!(c.contains("set(CMAKE_C_COMPILER_ID \"GNU\")"));
    assert!(build_dir
        .join("CMakeFiles/3.27.1/CMakeCXXCompiler.cmake")
        .exists());
}

#[test]
fn test_run_without_cmake_fails() {
    let tmp = TempDir::new().unwrap();
    let empty = tmp.path().join("empty");
    fs::create_dir(&empty).unwrap();

    cmake_executor(tmp.path(), &empty)
        .args(["run", "--", "--version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
