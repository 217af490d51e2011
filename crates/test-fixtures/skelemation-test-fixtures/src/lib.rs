//! Shared JSON fixtures for skelemation tests, benches and examples.
//!
//! Everything is resolved through `fixtures/manifest.json` at the
//! workspace root.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    skeletons: HashMap<String, SkeletonEntry>,
    sessions: HashMap<String, String>,
}

/// A skeleton file, optionally listing the encoded address of every bone.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SkeletonEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        addresses: Vec<String>,
    },
}

impl SkeletonEntry {
    fn as_path(&self) -> &str {
        match self {
            SkeletonEntry::Path(path) => path,
            SkeletonEntry::Detailed { path, .. } => path,
        }
    }

    fn addresses(&self) -> &[String] {
        match self {
            SkeletonEntry::Path(_) => &[],
            SkeletonEntry::Detailed { addresses, .. } => addresses,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Seed trees in the `{ id, vector, rotationFormula, children }` schema.
pub mod skeletons {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.skeletons.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.skeletons, "skeleton", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.skeletons, "skeleton", name)?;
        super::load_json(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.skeletons, "skeleton", name)?;
        Ok(resolve_path(entry.as_path()))
    }

    /// Encoded addresses of every bone in pre-order, when the manifest lists them.
    pub fn addresses(name: &str) -> Result<Vec<String>> {
        let entry = lookup(&MANIFEST.skeletons, "skeleton", name)?;
        Ok(entry.addresses().to_vec())
    }
}

/// Scripted event lists, one JSON array per session.
pub mod sessions {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.sessions.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.sessions, "session", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.sessions, "session", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.sessions, "session", name)?;
        Ok(resolve_path(rel))
    }
}
