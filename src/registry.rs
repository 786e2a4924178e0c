/// In-memory dataset registry with atomic replace-all semantics.
///
/// A `Registry<T>` owns the current contents of one dataset as an
/// `Arc<Vec<T>>`. Loading builds the complete new vector first and only then
/// swaps the pointer under a write lock held for the swap alone, so a
/// concurrent `snapshot()` sees either the old or the new contents in full.
/// Snapshots are cheap clones of the `Arc` and stay valid after a reload.
///
/// The registry never reports load failures to its callers: a dataset that
/// cannot be opened or whose header is missing a required column is logged
/// and replaced by an empty one.

use std::io::Read;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use log::{info, warn};

use crate::ingest::schema::Schema;
use crate::ingest::{self, DatasetRecord, LoadReport};
use crate::model::{ClassifiedReading, LoadError};

/// Registry of classified monitor readings.
pub type ReadingRegistry = Registry<ClassifiedReading>;

pub struct Registry<T> {
    schema: Schema,
    records: RwLock<Arc<Vec<T>>>,
}

impl<T: DatasetRecord> Registry<T> {
    /// Empty registry using the record type's declared schema.
    pub fn new() -> Self {
        Self::with_schema(T::schema())
    }

    /// Empty registry using a schema with extra aliases merged in.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            records: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Replaces the whole dataset with the contents of `path`.
    pub fn load(&self, path: &Path) -> LoadReport {
        let result = ingest::load_path(path, &self.schema);
        self.apply(result)
    }

    /// Replaces the whole dataset with the contents of an open source.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> LoadReport {
        let result = ingest::load_reader(reader, &self.schema);
        self.apply(result)
    }

    fn apply(&self, result: Result<ingest::Loaded<T>, LoadError>) -> LoadReport {
        match result {
            Ok(loaded) => {
                info!(
                    "Loaded {} {} records ({} rows rejected)",
                    loaded.report.admitted, self.schema.dataset, loaded.report.rejected
                );
                self.replace_all(loaded.records);
                loaded.report
            }
            Err(e) => {
                warn!("{}; {} dataset is empty", e, self.schema.dataset);
                self.replace_all(Vec::new());
                LoadReport::empty(self.schema.dataset)
            }
        }
    }

    /// Atomically swaps in new contents.
    pub fn replace_all(&self, records: Vec<T>) {
        let fresh = Arc::new(records);
        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);
        *guard = fresh;
    }

    /// The current contents, in source row order.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        let guard = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: DatasetRecord> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use crate::model::FacilityRecord;
    use std::thread;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ReadingRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_load_from_reader_replaces_contents() {
        let registry = ReadingRegistry::new();
        let report = registry.load_from_reader(fixture_monitors_csv().as_bytes());
        assert_eq!(report.admitted, 4);
        assert_eq!(registry.len(), 4);

        let report = registry.load_from_reader(fixture_monitors_with_bad_rows_csv().as_bytes());
        assert_eq!(report.admitted, 2);
        assert_eq!(registry.len(), 2, "reload must replace, not append");
    }

    #[test]
    fn test_reload_of_unchanged_source_is_identical() {
        let registry = ReadingRegistry::new();
        registry.load_from_reader(fixture_monitors_csv().as_bytes());
        let first = registry.snapshot();

        registry.load_from_reader(fixture_monitors_csv().as_bytes());
        let second = registry.snapshot();

        assert_eq!(*first, *second);
        assert!(!Arc::ptr_eq(&first, &second), "reload should swap in a new vector");
    }

    #[test]
    fn test_failed_load_empties_registry() {
        let registry = ReadingRegistry::new();
        registry.load_from_reader(fixture_monitors_csv().as_bytes());
        assert_eq!(registry.len(), 4);

        let report = registry.load_from_reader(fixture_monitors_missing_column_csv().as_bytes());
        assert_eq!(report, LoadReport::empty("monitors"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_registry() {
        let registry: Registry<FacilityRecord> = Registry::new();
        let report = registry.load(Path::new("/nonexistent/aqmon/facilities.csv"));
        assert_eq!(report.admitted, 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_held_snapshot_survives_reload() {
        let registry = ReadingRegistry::new();
        registry.load_from_reader(fixture_monitors_csv().as_bytes());
        let held = registry.snapshot();

        registry.replace_all(Vec::new());
        assert_eq!(held.len(), 4);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_contents() {
        let registry = Arc::new(ReadingRegistry::new());
        registry.load_from_reader(fixture_monitors_csv().as_bytes());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let len = registry.snapshot().len();
                        assert!(len == 4 || len == 2, "observed partial registry of {}", len);
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let source = if i % 2 == 0 {
                fixture_monitors_with_bad_rows_csv()
            } else {
                fixture_monitors_csv()
            };
            registry.load_from_reader(source.as_bytes());
        }

        for reader in readers {
            reader.join().expect("reader thread panicked");
        }
    }
}
