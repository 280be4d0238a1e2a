//! Shared fixtures for the runbook integration tests.
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use runbook::environment::Environment;
use runbook::runbook::{HostEntry, Runbook, Step};

/// A runbook covering every step kind, a localhost entry and a host override.
pub const FULL_RUNBOOK: &str = r#"
name = "deploy web"
description = "Roll out the web tier"

[env]
user = "root"
ssh_key = "~/.ssh/id_ed25519"
python = "/usr/bin/python3"
become = true

[[hosts]]
addr = "localhost"

[[hosts]]
addr = "10.0.0.5"

[hosts.env]
user = "deploy"

[[steps]]
name = "ping"
command = "echo pong"

[[steps]]
name = "load schema"
command = "psql -d app"
stdin = "select 1;"
become = false

[[steps]]
name = "greet"
msg = "hello"
"#;

/// Scenario runbook: one localhost host, one shell step.
pub fn ping_runbook() -> Runbook {
    Runbook::new(
        "ping",
        Environment::new()
            .with_python("/usr/bin/python3")
            .with_become(true),
        vec![HostEntry::new("localhost")],
        vec![Step::shell("ping", "echo pong")],
    )
    .unwrap()
}

/// Environment with every field set.
pub fn full_env() -> Environment {
    Environment::new()
        .with_user("root")
        .with_ssh_key("~/.ssh/id_ed25519")
        .with_python("/usr/bin/python3")
        .with_become(true)
}

/// Writes `content` to `name` inside `dir` and returns the path.
pub fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
