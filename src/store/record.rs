//! INI-backed Record Store.
//!
//! One file holds a table of `[section]` records (sections are typically
//! account identifiers), each a flat mapping of field name to scalar value.
//! Values live on disk as text and are coerced back through
//! [`Scalar::sniff`] on read. All mutation is in-memory until an explicit
//! [`RecordStore::save`].

use crate::config::StorageConfig;
use crate::error::StoreError;
use crate::store::atomic::{atomic_write, FileLock};
use crate::store::value::Scalar;
use crate::validation::secure_data_path;
use log::debug;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Section/key table backed by a classic INI file.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    lock_timeout: Duration,
    // Raw strings on the inside; coercion happens at the read border.
    table: BTreeMap<String, BTreeMap<String, String>>,
}

impl RecordStore {
    /// Open a store over `root/subdir/file`, loading the whole file into
    /// memory. A missing file yields an empty table; the file itself is not
    /// created until the first `save()`.
    pub async fn open(
        root: impl AsRef<Path>,
        subdir: &str,
        file: &str,
    ) -> Result<Self, StoreError> {
        let path = secure_data_path(root, subdir, file)?;
        let table = Self::load_table(&path).await?;
        Ok(RecordStore {
            path,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            table,
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

    async fn load_table(
        path: &Path,
    ) -> Result<BTreeMap<String, BTreeMap<String, String>>, StoreError> {
        match fs::read_to_string(path).await {
            Ok(content) => Self::parse_ini(path, &content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StoreError::load(path, e)),
        }
    }

    fn parse_ini(
        path: &Path,
        content: &str,
    ) -> Result<BTreeMap<String, BTreeMap<String, String>>, StoreError> {
        let mut table: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (lineno, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') {
                let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) else {
                    return Err(StoreError::load(
                        path,
                        format!("malformed section header at line {}", lineno + 1),
                    ));
                };
                let name = name.trim();
                if name.is_empty() {
                    return Err(StoreError::load(
                        path,
                        format!("empty section name at line {}", lineno + 1),
                    ));
                }
                table.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(StoreError::load(
                    path,
                    format!("expected 'key = value' at line {}", lineno + 1),
                ));
            };
            let Some(section) = &current else {
                return Err(StoreError::load(
                    path,
                    format!("key before any [section] at line {}", lineno + 1),
                ));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(StoreError::load(
                    path,
                    format!("empty key at line {}", lineno + 1),
                ));
            }
            table
                .entry(section.clone())
                .or_default()
                .insert(key.to_string(), value.trim().to_string());
        }

        debug!("loaded {} sections from {}", table.len(), path.display());
        Ok(table)
    }

    fn serialize_ini(&self) -> Result<String, StoreError> {
        let mut out = String::new();
        for (section, fields) in &self.table {
            // Update borders already check fields; sections can also be
            // materialized through read_section, so re-check them here.
            check_section_name(section)?;
            out.push('[');
            out.push_str(section);
            out.push_str("]\n");
            for (key, value) in fields {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(value);
                out.push('\n');
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Discard in-memory state and re-read the file.
    pub async fn reload(&mut self) -> Result<(), StoreError> {
        self.table = Self::load_table(&self.path).await?;
        Ok(())
    }

    /// Full snapshot of every section, fully coerced.
    pub fn read_all(&self) -> BTreeMap<String, BTreeMap<String, Scalar>> {
        self.table
            .iter()
            .map(|(section, fields)| (section.clone(), coerce_fields(fields)))
            .collect()
    }

    /// Read one section's fields. A missing section yields an empty mapping
    /// and never errors; with `create_if_missing` an empty section is
    /// materialized in memory (on disk only after `save()`, which rejects
    /// section names that would not survive the INI round trip).
    pub fn read_section(
        &mut self,
        section: &str,
        create_if_missing: bool,
    ) -> BTreeMap<String, Scalar> {
        match self.table.get(section) {
            Some(fields) => coerce_fields(fields),
            None => {
                if create_if_missing {
                    self.table.insert(section.to_string(), BTreeMap::new());
                }
                BTreeMap::new()
            }
        }
    }

    /// Whether a section currently exists in memory.
    pub fn has_section(&self, section: &str) -> bool {
        self.table.contains_key(section)
    }

    /// Read one field, coerced. Returns `default` when the section or key
    /// is absent; with no default an absent key is a `KeyNotFound` error,
    /// so callers must always pass a default for optional fields.
    pub fn read_key(
        &self,
        section: &str,
        key: &str,
        default: Option<Scalar>,
    ) -> Result<Scalar, StoreError> {
        match self.table.get(section).and_then(|fields| fields.get(key)) {
            Some(raw) => Ok(Scalar::sniff(raw)),
            None => default.ok_or_else(|| StoreError::KeyNotFound {
                section: section.to_string(),
                key: key.to_string(),
            }),
        }
    }

    /// Set one field in memory, creating the section if absent.
    ///
    /// Names and values must survive the INI round trip, so anything that
    /// would be re-parsed as file structure is rejected with
    /// [`StoreError::InvalidValue`]: line breaks anywhere, `=` in the key,
    /// a key opening like a section header or comment, or surrounding
    /// whitespace (which the parser trims away on load).
    pub fn update_key(
        &mut self,
        section: &str,
        key: &str,
        value: impl Into<Scalar>,
    ) -> Result<(), StoreError> {
        check_section_name(section)?;
        check_field_key(key)?;
        let rendered = value.into().to_ini_string();
        check_field_value(&rendered)?;
        self.table
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), rendered);
        Ok(())
    }

    /// Batch form of [`update_key`](Self::update_key): applies every given
    /// field to one section. Fields not mentioned are left alone. Rejected
    /// fields leave earlier fields of the same batch applied.
    pub fn update_section_keys(
        &mut self,
        section: &str,
        data: impl IntoIterator<Item = (String, Scalar)>,
    ) -> Result<(), StoreError> {
        check_section_name(section)?;
        let fields = self.table.entry(section.to_string()).or_default();
        for (key, value) in data {
            check_field_key(&key)?;
            let rendered = value.to_ini_string();
            check_field_value(&rendered)?;
            fields.insert(key, rendered);
        }
        Ok(())
    }

    /// Persist the full in-memory table: serialize, take the `.lock` file,
    /// write atomically. Nothing else flushes to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let content = self.serialize_ini()?;
        let _guard = FileLock::acquire(&self.path, self.lock_timeout).await?;
        atomic_write(&self.path, content.as_bytes())
    }

    /// Full path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn check_section_name(section: &str) -> Result<(), StoreError> {
    if section.is_empty() || section != section.trim() || section.contains(['\n', '\r']) {
        return Err(StoreError::InvalidValue(format!(
            "section name {:?} would not survive an INI round trip",
            section
        )));
    }
    Ok(())
}

fn check_field_key(key: &str) -> Result<(), StoreError> {
    let reparses_as_structure =
        key.contains('=') || key.starts_with(['[', '#', ';']) || key.contains(['\n', '\r']);
    if key.is_empty() || key != key.trim() || reparses_as_structure {
        return Err(StoreError::InvalidValue(format!(
            "key {:?} would not survive an INI round trip",
            key
        )));
    }
    Ok(())
}

fn check_field_value(value: &str) -> Result<(), StoreError> {
    if value.contains(['\n', '\r']) {
        return Err(StoreError::InvalidValue(format!(
            "value {:?} contains a line break",
            value
        )));
    }
    Ok(())
}

fn coerce_fields(fields: &BTreeMap<String, String>) -> BTreeMap<String, Scalar> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), Scalar::sniff(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> BTreeMap<String, BTreeMap<String, String>> {
        RecordStore::parse_ini(Path::new("test.ini"), content).unwrap()
    }

    #[test]
    fn parses_sections_and_comments() {
        let table = parse("# ledger\n[10001]\ncoins = 250\n; trailing note\n\n[10002]\n");
        assert_eq!(table["10001"]["coins"], "250");
        assert!(table["10002"].is_empty());
    }

    #[test]
    fn rejects_key_outside_section() {
        let err = RecordStore::parse_ini(Path::new("test.ini"), "coins = 250\n").unwrap_err();
        assert!(matches!(err, StoreError::Load { .. }));
    }

    #[test]
    fn rejects_garbage_line() {
        let err =
            RecordStore::parse_ini(Path::new("test.ini"), "[a]\nnot a pair\n").unwrap_err();
        assert!(matches!(err, StoreError::Load { .. }));
    }

    #[test]
    fn value_may_contain_equals() {
        let table = parse("[a]\nmotto = work = life\n");
        assert_eq!(table["a"]["motto"], "work = life");
    }

    #[test]
    fn update_rejects_structural_characters() {
        let mut store = RecordStore {
            path: PathBuf::from("test.ini"),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            table: BTreeMap::new(),
        };
        assert!(store.update_key("a", "k=v", Scalar::Int(1)).is_err());
        assert!(store.update_key("a", "#k", Scalar::Int(1)).is_err());
        assert!(store.update_key("a", " padded ", Scalar::Int(1)).is_err());
        assert!(store.update_key("a\nb", "k", Scalar::Int(1)).is_err());
        assert!(store
            .update_key("a", "k", Scalar::from("two\nlines"))
            .is_err());
        assert!(store.table.is_empty());

        assert!(store.update_key("a", "k]v", Scalar::Int(1)).is_ok());
        assert!(store.update_key("a", "motto", Scalar::from("work = life")).is_ok());
    }
}
