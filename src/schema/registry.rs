//! Schema registry
//!
//! Schemas are read from `<schema_dir>/*.json` at startup, one schema
//! version per file. Every loaded schema has its structure checked; a
//! malformed file aborts loading with an error naming the file.
//!
//! Registered schemas are immutable: an (id, version) pair can be registered
//! once and is shared behind `Arc` from then on.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// In-memory registry keyed by (schema_id, schema_version)
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schema_dir: Option<PathBuf>,
    schemas: BTreeMap<(String, String), Arc<Schema>>,
}

impl SchemaRegistry {
    /// Registry backed by a schema directory
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: Some(schema_dir.into()),
            schemas: BTreeMap::new(),
        }
    }

    /// Registry with no backing directory; schemas are registered in code
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn schema_dir(&self) -> Option<&Path> {
        self.schema_dir.as_deref()
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// A missing directory is created and yields an empty registry. Files are
    /// loaded in name order so duplicate detection is deterministic.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        let Some(dir) = self.schema_dir.clone() else {
            return Ok(0);
        };

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                SchemaError::malformed(
                    dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
            return Ok(0);
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            SchemaError::malformed(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in &paths {
            let schema = Self::read_schema_file(path)?;
            self.register(schema)?;
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Reads and checks a single schema file
    pub fn read_schema_file(path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let schema: Schema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed(path.display().to_string(), e.to_string()))?;

        Ok(schema)
    }

    /// Registers a schema directly.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<Arc<Schema>> {
        schema.validate_structure()?;

        let key = (schema.schema_id.clone(), schema.schema_version.clone());
        if self.schemas.contains_key(&key) {
            return Err(SchemaError::immutable(&schema.schema_id, &schema.schema_version));
        }

        let schema = Arc::new(schema);
        self.schemas.insert(key, Arc::clone(&schema));
        Ok(schema)
    }

    /// Gets a schema by ID and version.
    pub fn get(&self, schema_id: &str, schema_version: &str) -> Option<Arc<Schema>> {
        self.schemas
            .get(&(schema_id.to_string(), schema_version.to_string()))
            .cloned()
    }

    /// Latest version of a schema.
    ///
    /// Versions compare segment by segment on `.`; numeric segments compare
    /// as integers, anything else as text.
    pub fn latest(&self, schema_id: &str) -> Option<Arc<Schema>> {
        self.schemas
            .iter()
            .filter(|((id, _), _)| id == schema_id)
            .max_by(|((_, a), _), ((_, b), _)| compare_versions(a, b))
            .map(|(_, schema)| Arc::clone(schema))
    }

    pub fn exists(&self, schema_id: &str, schema_version: &str) -> bool {
        self.get(schema_id, schema_version).is_some()
    }

    pub fn schema_id_exists(&self, schema_id: &str) -> bool {
        self.schemas.keys().any(|(id, _)| id == schema_id)
    }

    /// All schemas ordered by (id, version)
    pub fn list(&self) -> Vec<Arc<Schema>> {
        self.schemas.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Orders version strings like `2 < 10` and `1.9 < 1.10`
pub(crate) fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use tempfile::TempDir;

    fn sample_schema(version: &str) -> Schema {
        Schema::builder("users", version)
            .field(FieldSpec::string("email").email())
            .field(FieldSpec::string("name").min_length(2))
            .build()
            .unwrap()
    }

    fn write_schema(dir: &Path, file: &str, schema: &Schema) {
        let path = dir.join(file);
        fs::write(path, serde_json::to_string_pretty(schema).unwrap()).unwrap();
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::in_memory();
        registry.register(sample_schema("1")).unwrap();

        assert!(registry.exists("users", "1"));
        assert!(!registry.exists("users", "2"));
        assert!(registry.schema_id_exists("users"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = SchemaRegistry::in_memory();
        registry.register(sample_schema("1")).unwrap();

        let err = registry.register(sample_schema("1")).unwrap_err();
        assert_eq!(err.code(), "INTAKE_SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_latest_version() {
        let mut registry = SchemaRegistry::in_memory();
        registry.register(sample_schema("1")).unwrap();
        registry.register(sample_schema("3")).unwrap();
        registry.register(sample_schema("2")).unwrap();

        assert_eq!(registry.latest("users").unwrap().schema_version, "3");
        assert!(registry.latest("orders").is_none());

        registry.register(sample_schema("9")).unwrap();
        registry.register(sample_schema("10")).unwrap();
        assert_eq!(registry.latest("users").unwrap().schema_version, "10");
    }

    #[test]
    fn test_version_ordering() {
        assert_eq!(compare_versions("9", "10"), Ordering::Less);
        assert_eq!(compare_versions("1.9", "1.10"), Ordering::Less);
        assert_eq!(compare_versions("1.0", "1.0.1"), Ordering::Less);
        assert_eq!(compare_versions("2", "beta"), Ordering::Less);
        assert_eq!(compare_versions("v1", "v2"), Ordering::Less);
        assert_eq!(compare_versions("01", "1"), Ordering::Less);
    }

    #[test]
    fn test_load_all_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        write_schema(temp_dir.path(), "users_1.json", &sample_schema("1"));
        write_schema(temp_dir.path(), "users_2.json", &sample_schema("2"));
        fs::write(temp_dir.path().join("README.txt"), "not a schema").unwrap();

        let mut registry = SchemaRegistry::new(temp_dir.path());
        let loaded = registry.load_all().unwrap();

        assert_eq!(loaded, 2);
        assert!(registry.exists("users", "2"));
    }

    #[test]
    fn test_missing_directory_created() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("schemas");

        let mut registry = SchemaRegistry::new(&dir);
        assert_eq!(registry.load_all().unwrap(), 0);
        assert!(dir.exists());
    }

    #[test]
    fn test_malformed_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();

        let mut registry = SchemaRegistry::new(temp_dir.path());
        let err = registry.load_all().unwrap_err();

        assert_eq!(err.code(), "INTAKE_SCHEMA_MALFORMED");
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_structurally_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("dupes.json"),
            r#"{"schema_id":"d","schema_version":"1","fields":[
                {"name":"a","type":"string"},{"name":"a","type":"string"}]}"#,
        )
        .unwrap();

        let mut registry = SchemaRegistry::new(temp_dir.path());
        assert!(registry.load_all().is_err());
    }
}
