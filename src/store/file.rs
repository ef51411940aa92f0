use super::{ConfigStore, Section, describe};
use crate::error::FleetError;
use log::{debug, trace};
use serde_yaml::Mapping;
use std::env::VarError;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV_VAR: &str = "FLEET_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "fleet.yaml";

/// YAML document on disk. Every call to `section` re-reads the file, so edits
/// are visible immediately; wrap the provider in a `CachedProvider` to avoid that.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_env() -> Result<Self, FleetError> {
        let path = match std::env::var(CONFIG_PATH_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
            Ok(_) | Err(VarError::NotPresent) => PathBuf::from(DEFAULT_CONFIG_PATH),
            Err(VarError::NotUnicode(_)) => {
                return Err(FleetError::Failure {
                    action: format!("reading {} environment variable", CONFIG_PATH_ENV_VAR),
                    details: Some("non-unicode value".to_string()),
                });
            }
        };
        debug!("using config file {}", path.display());
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Mapping, FleetError> {
        trace!("reading config file {}", self.path.display());
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| FleetError::Failure {
                action: format!("reading config file {}", self.path.display()),
                details: Some(e.to_string()),
            })?;

        let document: Section = serde_yaml::from_str(&contents)
            .map_err(|e| FleetError::invalid("config document", e.to_string()))?;
        match document {
            Section::Mapping(mapping) => Ok(mapping),
            // An empty file parses as null
            Section::Null => Ok(Mapping::new()),
            other => Err(FleetError::invalid(
                "config document",
                format!("expected a mapping at the root, got {}", describe(&other)),
            )),
        }
    }
}

impl ConfigStore for FileStore {
    fn section(&self, name: &str) -> Result<Option<Section>, FleetError> {
        let mut document = self.load()?;
        let section = document.remove(name);
        debug!(
            "section {:?} {} in {}",
            name,
            if section.is_some() { "found" } else { "not found" },
            self.path.display()
        );
        Ok(section)
    }
}

#[cfg(test)]
fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("fleet.yaml");
    std::fs::write(&path, contents).expect("failed to write config file");
    path
}

#[test]
fn test_section() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = write_config(
        &dir,
        "trafficCode:\n  speedLimits:\n    - country: Poland\n      limit: 90\n      unit: kmh\n",
    );
    let store = FileStore::new(path);

    let section = store
        .section("trafficCode")
        .expect("failed to read section")
        .expect("section should exist");
    let speed_limits = section
        .get("speedLimits")
        .and_then(|v| v.as_sequence())
        .expect("speedLimits should be a sequence");
    assert_eq!(speed_limits.len(), 1);

    let missing = store.section("fuelPolicy").expect("failed to read section");
    assert!(missing.is_none());

    // section names are case-sensitive
    let missing = store.section("trafficcode").expect("failed to read section");
    assert!(missing.is_none());
}

#[test]
fn test_rereads_on_every_call() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = write_config(&dir, "other: 1\n");
    let store = FileStore::new(path);
    assert!(store.section("trafficCode").unwrap().is_none());

    write_config(&dir, "trafficCode:\n  speedLimits: []\n");
    assert!(store.section("trafficCode").unwrap().is_some());
}

#[test]
fn test_empty_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = write_config(&dir, "");
    let store = FileStore::new(path);
    assert_eq!(store.section("trafficCode"), Ok(None));
}

#[test]
fn test_unreadable_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = FileStore::new(dir.path().join("does-not-exist.yaml"));
    let err = store.section("trafficCode").expect_err("should fail");
    assert!(matches!(err, FleetError::Failure { .. }));
}

#[test]
fn test_malformed_document() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let path = write_config(&dir, "trafficCode: [unclosed\n");
    let err = FileStore::new(path).section("trafficCode").expect_err("should fail");
    assert!(matches!(err, FleetError::InvalidConfiguration { .. }));

    let path = write_config(&dir, "- just\n- a\n- list\n");
    let err = FileStore::new(path).section("trafficCode").expect_err("should fail");
    assert_eq!(
        err,
        FleetError::invalid(
            "config document",
            "expected a mapping at the root, got a sequence"
        )
    );
}

#[test]
fn test_from_env() {
    unsafe {
        std::env::set_var(CONFIG_PATH_ENV_VAR, " /etc/fleet/traffic.yaml ");
    }
    let store = FileStore::from_env().unwrap();
    assert_eq!(store.path(), Path::new("/etc/fleet/traffic.yaml"));

    unsafe {
        std::env::set_var(CONFIG_PATH_ENV_VAR, "  ");
    }
    let store = FileStore::from_env().unwrap();
    assert_eq!(store.path(), Path::new(DEFAULT_CONFIG_PATH));

    unsafe {
        std::env::remove_var(CONFIG_PATH_ENV_VAR);
    }
    let store = FileStore::from_env().unwrap();
    assert_eq!(store.path(), Path::new(DEFAULT_CONFIG_PATH));
}
