//! The `setup` command: environment preconditions, plan builders, one
//! transactional flush, then the runner install.
//!
//! The plan builders only ever enqueue requests; the single `flush` call is
//! the only step that mutates project files, so a failure anywhere in it
//! leaves the project untouched and the command can simply be re-run.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use semver::Version;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::constants::{
    IGNORE_ENTRY, IGNORE_FILE, IGNORE_PATTERN, MIN_NODE_VERSION, RUNNER_CONFIG_TEMPLATE,
    RUNNER_PKG, TEST_SCRIPTS,
};
use crate::engine::WriteEngine;
use crate::logging::{AuditSink, FactsEmitter};
use crate::project::Project;
use crate::types::request::WriteOptions;

use super::error::CommandError;

#[derive(Clone, Debug, Default)]
pub struct SetupOptions {
    /// Skip the final package-manager install step.
    pub skip_install: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct SetupResult {
    pub message: String,
    pub appended: Vec<PathBuf>,
    pub written: Vec<PathBuf>,
    pub created: Vec<PathBuf>,
}

pub fn run<E: FactsEmitter, A: AuditSink>(
    project: &Project,
    engine: &mut WriteEngine<E, A>,
    options: &SetupOptions,
) -> Result<SetupResult, CommandError> {
    check_node()?;
    check_npm()?;
    if !project.manifest_path().is_file() {
        return Err(CommandError::ManifestMissing {
            path: project.manifest_path(),
        });
    }

    ensure_test_scripts(project, engine)?;
    ensure_runner_config(project, engine)?;
    ensure_ignore_entry(project, engine)?;

    log::info!("applying queued file updates");
    let report = engine.flush()?;
    log::info!("file updates complete");

    if options.skip_install {
        log::info!("skipping {RUNNER_PKG} install as requested");
    } else {
        // Last step on purpose: a half-finished install is package-manager
        // state the engine cannot revert.
        install_runner(project)?;
    }

    Ok(SetupResult {
        message: "test setup complete".to_string(),
        appended: report.appended,
        written: report.written,
        created: report.created,
    })
}

/// Queue a manifest rewrite unless the test scripts are already wired up.
pub fn ensure_test_scripts<E: FactsEmitter, A: AuditSink>(
    project: &Project,
    engine: &mut WriteEngine<E, A>,
) -> Result<(), CommandError> {
    let path = project.manifest_path();
    let mut manifest = read_manifest(&path)?;
    let obj = manifest
        .as_object_mut()
        .ok_or_else(|| CommandError::ManifestNotAnObject { path: path.clone() })?;

    if let Some(scripts) = obj.get("scripts").and_then(Value::as_object) {
        if TEST_SCRIPTS.iter().any(|(name, _)| scripts.contains_key(*name)) {
            log::info!("one or more test scripts already exist in package.json; leaving them alone");
            return Ok(());
        }
    }

    let scripts = obj
        .entry("scripts")
        .or_insert_with(|| Value::Object(Map::new()));
    if !scripts.is_object() {
        *scripts = Value::Object(Map::new());
    }
    if let Some(map) = scripts.as_object_mut() {
        for (name, command) in TEST_SCRIPTS {
            map.insert((*name).to_string(), json!(command));
        }
    }

    log::info!("queueing test scripts for package.json");
    let content = serialize_manifest(&path, &manifest)?;
    engine.queue_write(project.rooted(&path)?, content, WriteOptions::default());
    Ok(())
}

/// Queue creation of `jest.config.js` unless a runner config already
/// exists somewhere the runner would find it.
pub fn ensure_runner_config<E: FactsEmitter, A: AuditSink>(
    project: &Project,
    engine: &mut WriteEngine<E, A>,
) -> Result<(), CommandError> {
    let manifest = read_manifest(&project.manifest_path())?;
    if manifest.get("jest").is_some() {
        log::info!("jest configuration found in package.json; skipping jest.config.js");
        return Ok(());
    }
    let path = project.runner_config_path();
    if path.exists() {
        log::info!("existing jest.config.js found; leaving it in place");
        return Ok(());
    }
    log::info!("queueing creation of jest.config.js");
    engine.queue_write(
        project.rooted(&path)?,
        RUNNER_CONFIG_TEMPLATE,
        WriteOptions::default(),
    );
    Ok(())
}

/// Queue the ignore-list entry for scaffolded test directories. Checking
/// for the pattern first is what makes repeated setup runs append the
/// block exactly once.
pub fn ensure_ignore_entry<E: FactsEmitter, A: AuditSink>(
    project: &Project,
    engine: &mut WriteEngine<E, A>,
) -> Result<(), CommandError> {
    let path = project.ignore_path();
    if !path.exists() {
        log::info!("queueing creation of {IGNORE_FILE}");
        engine.queue_write(project.rooted(&path)?, IGNORE_ENTRY, WriteOptions::default());
        return Ok(());
    }
    let current = fs::read_to_string(&path).map_err(|source| CommandError::io("read", &path, source))?;
    if current.contains(IGNORE_PATTERN) {
        log::info!("{IGNORE_FILE} already ignores {IGNORE_PATTERN}");
        return Ok(());
    }
    log::info!("queueing {IGNORE_PATTERN} entry for {IGNORE_FILE}");
    engine.queue_append(project.rooted(&path)?, IGNORE_ENTRY, WriteOptions::default());
    Ok(())
}

fn read_manifest(path: &Path) -> Result<Value, CommandError> {
    let raw = fs::read_to_string(path).map_err(|source| CommandError::io("read", path, source))?;
    serde_json::from_str(&raw).map_err(|source| CommandError::ManifestInvalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-printed with sorted keys, so a rewrite of the same logical
/// manifest is always byte-identical.
fn serialize_manifest(path: &Path, manifest: &Value) -> Result<String, CommandError> {
    let mut content =
        serde_json::to_string_pretty(manifest).map_err(|source| CommandError::ManifestInvalid {
            path: path.to_path_buf(),
            source,
        })?;
    content.push('\n');
    Ok(content)
}

fn check_node() -> Result<(), CommandError> {
    let output = Command::new("node")
        .arg("--version")
        .output()
        .map_err(|_| CommandError::NodeNotFound)?;
    if !output.status.success() {
        return Err(CommandError::NodeNotFound);
    }
    let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
    // `node --version` prints e.g. `v18.17.0`.
    let found = Version::parse(raw.trim_start_matches('v'))
        .map_err(|_| CommandError::NodeVersionUnparsable { raw: raw.clone() })?;
    let (major, minor, patch) = MIN_NODE_VERSION;
    let min = Version::new(major, minor, patch);
    if found < min {
        return Err(CommandError::NodeTooOld { found, min });
    }
    Ok(())
}

fn check_npm() -> Result<(), CommandError> {
    let ok = Command::new("npm")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(CommandError::NpmNotFound)
    }
}

fn install_runner(project: &Project) -> Result<(), CommandError> {
    let use_yarn = project.root().join("yarn.lock").exists();
    let (tool, args): (&str, &[&str]) = if use_yarn {
        log::info!("yarn.lock detected; installing {RUNNER_PKG} with yarn");
        ("yarn", &["add", "--dev", RUNNER_PKG])
    } else {
        log::info!("installing {RUNNER_PKG} with npm");
        ("npm", &["install", "--save-dev", RUNNER_PKG])
    };
    let status = Command::new(tool)
        .args(args)
        .current_dir(project.root())
        .status()
        .map_err(|_| CommandError::InstallFailed { pkg: RUNNER_PKG })?;
    if !status.success() {
        return Err(CommandError::InstallFailed { pkg: RUNNER_PKG });
    }
    Ok(())
}
