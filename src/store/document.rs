//! JSON-backed Document Store.
//!
//! One file holds a tree of nested mappings; leaves are any
//! JSON-representable value. Values are addressed by dotted paths
//! (`"2001.jobName"`, `"木鱼竿.quantity"`), and partial updates auto-create
//! intermediate mapping nodes. Unlike the Record Store, construction
//! creates the file (and any missing parent directories) so catalogs can be
//! opened before they are first populated.

use crate::config::StorageConfig;
use crate::error::StoreError;
use crate::store::atomic::{atomic_write, FileLock};
use crate::validation::secure_data_path;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// The JSON value kinds, used for validated updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

/// Nested JSON document addressed by dotted paths.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    lock_timeout: Duration,
    data: Map<String, Value>,
}

impl DocumentStore {
    /// Open a store over `root/subdir/file`. If the file does not exist
    /// yet, its parent directories are created and an empty `{}` document
    /// is written; this is the only store that mkdirs as a construction
    /// side effect.
    pub async fn open(
        root: impl AsRef<Path>,
        subdir: &str,
        file: &str,
    ) -> Result<Self, StoreError> {
        let path = secure_data_path(root, subdir, file)?;
        let data = Self::load_data(&path).await?;
        Ok(DocumentStore {
            path,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            data,
        })
    }

    /// Open using a [`StorageConfig`] for the data root and lock timeout.
    pub async fn with_config(
        config: &StorageConfig,
        subdir: &str,
        file: &str,
    ) -> Result<Self, StoreError> {
        let mut store = Self::open(&config.data_dir, subdir, file).await?;
        store.lock_timeout = config.lock_timeout();
        Ok(store)
    }

    async fn load_data(path: &Path) -> Result<Map<String, Value>, StoreError> {
        if !fs::try_exists(path).await? {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(path, b"{}").await?;
            debug!("created empty document at {}", path.display());
            return Ok(Map::new());
        }
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::load(path, e))?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| StoreError::load(path, e))?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::load(
                path,
                format!("document root must be an object, got {}", ValueKind::of(&other).name()),
            )),
        }
    }

    /// Discard in-memory state and re-read the file.
    pub async fn reload(&mut self) -> Result<(), StoreError> {
        self.data = Self::load_data(&self.path).await?;
        Ok(())
    }

    /// Navigate a dotted path. Missing keys (or descent through a
    /// non-mapping) yield `None` rather than an error.
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        let mut segments = dotted.split('.');
        let first = segments.next()?;
        let mut current = self.data.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Set the value at a dotted path, creating intermediate mapping nodes
    /// as needed. Fails with [`StoreError::PathConflict`] when an existing
    /// intermediate node is not a mapping; in that case the in-memory state
    /// is unchanged.
    pub fn update(&mut self, dotted: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        let segments = Self::split_path(dotted)?;

        // Validate before touching anything so a conflict never leaves
        // half-created intermediate nodes behind.
        self.check_writable(dotted, &segments)?;

        let Some((last, parents)) = segments.split_last() else {
            return Err(StoreError::EmptyPath);
        };
        let mut current = &mut self.data;
        for segment in parents {
            let node = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match node.as_object_mut() {
                Some(map) => map,
                // check_writable already rejected this; kept as a guard.
                None => {
                    return Err(StoreError::PathConflict {
                        path: dotted.to_string(),
                        segment: segment.to_string(),
                    })
                }
            };
        }
        current.insert(last.to_string(), value.into());
        Ok(())
    }

    /// Like [`update`](Self::update), but first checks that the value is of
    /// the expected kind, failing with [`StoreError::TypeMismatch`].
    pub fn update_checked(
        &mut self,
        dotted: &str,
        value: impl Into<Value>,
        expected: ValueKind,
    ) -> Result<(), StoreError> {
        let value = value.into();
        let found = ValueKind::of(&value);
        if found != expected {
            return Err(StoreError::TypeMismatch {
                path: dotted.to_string(),
                expected: expected.name(),
                found: found.name(),
            });
        }
        self.update(dotted, value)
    }

    fn split_path(dotted: &str) -> Result<Vec<&str>, StoreError> {
        if dotted.is_empty() {
            return Err(StoreError::EmptyPath);
        }
        let segments: Vec<&str> = dotted.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(StoreError::EmptyPath);
        }
        Ok(segments)
    }

    fn check_writable(&self, dotted: &str, segments: &[&str]) -> Result<(), StoreError> {
        let mut current: Option<&Value> = None;
        for (i, segment) in segments[..segments.len() - 1].iter().enumerate() {
            let next = match current {
                None => self.data.get(*segment),
                Some(value) => match value.as_object() {
                    Some(map) => map.get(*segment),
                    // Unreachable: a non-mapping is rejected the round before.
                    None => None,
                },
            };
            match next {
                Some(v) if !v.is_object() => {
                    return Err(StoreError::PathConflict {
                        path: dotted.to_string(),
                        segment: segments[..=i].join("."),
                    });
                }
                Some(v) => current = Some(v),
                // Missing from here on; the write phase creates mappings.
                None => return Ok(()),
            }
        }
        Ok(())
    }

    /// The root mapping (read-only).
    pub fn root(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The root mapping, mutable. Catalog views use this for bulk edits
    /// that do not fit the dotted-path shape (e.g. list surgery).
    pub fn root_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Persist the document: serialize pretty-printed (4-space indent,
    /// non-ASCII kept literal), take the `.lock` file, write atomically.
    pub async fn save(&self) -> Result<(), StoreError> {
        let content = to_pretty_json(&Value::Object(self.data.clone()))?;
        let _guard = FileLock::acquire(&self.path, self.lock_timeout).await?;
        atomic_write(&self.path, &content)
    }

    /// Full path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Pretty-print with a 4-space indent. serde_json leaves non-ASCII
/// characters literal, which keeps stored natural-language text readable.
fn to_pretty_json(value: &Value) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}
