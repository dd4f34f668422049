//! Default snapshot- and filesystem-backed port implementations.

use crate::ports::WritePort;
use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use policydrift_domain::{AccessReviewer, FetchError, PolicyObjectSource, ResourceAttributes};
use policydrift_types::policy::PolicyObject;
use policydrift_types::snapshot::{AccessGrant, BaselineFile, ClusterSnapshot};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SnapshotLoadError {
    #[error("read {path}: {message}")]
    Io { path: String, message: String },

    #[error("parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("{path}: duplicate object {name:?}")]
    DuplicateObject { path: String, name: String },
}

fn load_document<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, SnapshotLoadError> {
    let contents = fs::read_to_string(path).map_err(|e| SnapshotLoadError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    debug!(path = %path, yaml = is_yaml, "loading document");
    let parsed = if is_yaml {
        serde_yaml::from_str(&contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| SnapshotLoadError::Parse {
        path: path.to_string(),
        message,
    })
}

fn ensure_unique(path: &Utf8Path, objects: &[PolicyObject]) -> Result<(), SnapshotLoadError> {
    let mut names = HashSet::new();
    for obj in objects {
        if !names.insert(obj.name.as_str()) {
            return Err(SnapshotLoadError::DuplicateObject {
                path: path.to_string(),
                name: obj.name.clone(),
            });
        }
    }
    Ok(())
}

/// Load a recorded cluster snapshot (JSON, or YAML by `.yaml`/`.yml` extension).
pub fn load_snapshot(path: &Utf8Path) -> Result<ClusterSnapshot, SnapshotLoadError> {
    let snapshot: ClusterSnapshot = load_document(path)?;
    ensure_unique(path, &snapshot.objects)?;
    Ok(snapshot)
}

/// Load a baseline file replacing the built-in objects.
pub fn load_baseline(path: &Utf8Path) -> Result<Vec<PolicyObject>, SnapshotLoadError> {
    let baseline: BaselineFile = load_document(path)?;
    ensure_unique(path, &baseline.objects)?;
    Ok(baseline.objects)
}

/// Serves live objects and access reviews from a [`ClusterSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotCluster {
    objects: BTreeMap<String, PolicyObject>,
    fetch_errors: BTreeMap<String, String>,
    access: Option<Vec<AccessGrant>>,
}

impl SnapshotCluster {
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self {
            objects: snapshot
                .objects
                .into_iter()
                .map(|o| (o.name.clone(), o))
                .collect(),
            fetch_errors: snapshot.fetch_errors,
            access: snapshot.access,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl PolicyObjectSource for SnapshotCluster {
    fn get(&self, name: &str) -> Result<PolicyObject, FetchError> {
        if let Some(message) = self.fetch_errors.get(name) {
            return Err(FetchError::Other(anyhow::anyhow!("{message}")));
        }
        self.objects
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::not_found(name))
    }
}

impl AccessReviewer for SnapshotCluster {
    fn user_can(&self, attrs: &ResourceAttributes) -> anyhow::Result<bool> {
        let Some(grants) = &self.access else {
            return Ok(true);
        };
        Ok(grants
            .iter()
            .any(|g| g.allows(&attrs.verb, &attrs.group, &attrs.resource)))
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}
