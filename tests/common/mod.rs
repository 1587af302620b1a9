//! Shared testing utilities for pulpconf CLI tests.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Testing harness providing an isolated staging root for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a staging root with the target directories pre-created.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        root.child("stage/etc/default").create_dir_all().expect("Failed to create etc/default");
        root.child("stage/etc/pulp/server/plugins.conf.d")
            .create_dir_all()
            .expect("Failed to create plugins.conf.d");
        Self { root }
    }

    /// Directory passed as `--root` to `apply`.
    pub fn stage(&self) -> PathBuf {
        self.root.path().join("stage")
    }

    /// On-disk location of an absolute target path inside the stage.
    pub fn staged(&self, target: &str) -> PathBuf {
        self.stage().join(target.trim_start_matches('/'))
    }

    pub fn read_staged(&self, target: &str) -> String {
        fs::read_to_string(self.staged(target)).expect("Failed to read staged artifact")
    }

    /// Write a parameter file and return its path.
    pub fn write_params(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).expect("Failed to write parameter file");
        path
    }

    /// Build a command for invoking the compiled `pulpconf` binary.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("pulpconf").expect("Failed to locate pulpconf binary");
        cmd.current_dir(self.root.path()).env_remove("PULPCONF_LOG");
        cmd
    }

    /// `apply` into the stage without ownership changes.
    pub fn apply(&self, params: &Path) -> Command {
        let mut cmd = self.cli();
        cmd.arg("apply")
            .arg("--config")
            .arg(params)
            .arg("--root")
            .arg(self.stage())
            .arg("--skip-ownership");
        cmd
    }
}
