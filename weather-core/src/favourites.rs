//! Favourites persisted as a JSON object mapping label to raw payload.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{
    model::Favourite,
    sort::{SortMode, sort_favourites},
};

/// Read favourites from `path`. A missing file yields an empty list; entries
/// whose value is not a string are skipped.
pub fn load_favourites(path: &Path) -> Result<Vec<Favourite>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read favourites file: {}", path.display()));
        }
    };

    let map: Map<String, Value> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse favourites file: {}", path.display()))?;

    let entries = map
        .into_iter()
        .filter_map(|(label, value)| match value {
            Value::String(payload) => Some(Favourite { label, payload }),
            other => {
                let kind = value_kind(&other);
                warn!(label, kind, "skipping favourite with non-string payload");
                None
            }
        })
        .collect();

    Ok(entries)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Atomically replace `path` with the full favourites mapping.
pub fn save_favourites(path: &Path, entries: &[Favourite]) -> Result<()> {
    let mut map = Map::new();
    for fav in entries {
        map.insert(fav.label.clone(), Value::String(fav.payload.clone()));
    }

    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(
        &mut buf,
        serde_json::ser::PrettyFormatter::with_indent(b"    "),
    );
    map.serialize(&mut ser).context("Failed to serialize favourites")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(&buf).context("Failed to write favourites")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace favourites file: {}", path.display()))?;

    Ok(())
}

/// In-memory favourites list bound to its backing file.
///
/// Every mutation is written through immediately. Persistence failures are
/// logged and otherwise ignored.
#[derive(Debug)]
pub struct FavouritesStore {
    path: PathBuf,
    entries: Vec<Favourite>,
}

impl FavouritesStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match load_favourites(&path) {
            Ok(entries) => {
                debug!(count = entries.len(), path = %path.display(), "favourites loaded");
                entries
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "ignoring unreadable favourites file");
                Vec::new()
            }
        };

        Self { path, entries }
    }

    pub fn entries(&self) -> &[Favourite] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, label: impl Into<String>, payload: impl Into<String>) {
        self.entries.push(Favourite::new(label, payload));
        self.persist();
    }

    /// Remove the first entry labelled `label`.
    pub fn remove(&mut self, label: &str) -> bool {
        let Some(idx) = self.entries.iter().position(|f| f.label == label) else {
            return false;
        };

        self.entries.remove(idx);
        self.persist();
        true
    }

    /// Reorders in memory only; the file keeps its previous order until the
    /// next mutation.
    pub fn sort(&mut self, mode: SortMode) {
        sort_favourites(&mut self.entries, mode);
    }

    pub fn save(&self) -> Result<()> {
        save_favourites(&self.path, &self.entries)
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            warn!(
                path = %self.path.display(),
                error = %format!("{err:#}"),
                "favourites not saved"
            );
        }
    }
}
