//! Deduplicated, persisted vacancy storage
//!
//! The store keeps vacancies in insertion order together with an index of
//! their ids, and rewrites the whole JSON document after every mutation.
//!
//! The in-memory state always wins: when a write fails the mutation is kept,
//! the failure is logged and returned, and memory and disk disagree until
//! the next successful write. There is no file locking, so two processes
//! sharing one data file can lose each other's writes.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{error, info, warn};
use serde_json::Value;

use crate::data::Vacancy;
use crate::error::{Result, VacancyError};

/// Vacancies persisted as a JSON array on disk
#[derive(Debug)]
pub struct Store {
    /// Location of the JSON document
    path: PathBuf,
    /// Records in insertion order
    vacancies: Vec<Vacancy>,
    /// Ids present in `vacancies`
    ids: HashSet<String>,
}

impl Store {
    /// Opens the store at `path`, loading whatever the file holds
    ///
    /// A missing or unreadable file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            vacancies: Vec::new(),
            ids: HashSet::new(),
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reloads state from disk and returns a copy of it
    ///
    /// * Missing file: empty store.
    /// * Invalid JSON or a document that isn't an array: logged, empty store.
    ///   The old contents are overwritten on the next save.
    /// * Elements that don't map to a vacancy are logged and skipped.
    pub fn load(&mut self) -> Vec<Vacancy> {
        self.vacancies.clear();
        self.ids.clear();

        if !self.path.exists() {
            info!("Data file {} does not exist, starting empty", self.path.display());
            return Vec::new();
        }

        let started = Instant::now();
        let items = match read_document(&self.path) {
            Ok(items) => items,
            Err(e) => {
                error!("Data file {} is unusable, starting empty: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        for item in &items {
            match Vacancy::from_mapping(item) {
                Ok(vacancy) => {
                    if self.ids.insert(vacancy.id.clone()) {
                        self.vacancies.push(vacancy);
                    } else {
                        warn!("Duplicate vacancy {} in data file, keeping the first", vacancy.id);
                    }
                }
                Err(e) => warn!("Skipping stored vacancy: {}", e),
            }
        }

        info!(
            "Loaded {} vacancies from {} in {:.2?}",
            self.vacancies.len(),
            self.path.display(),
            started.elapsed()
        );
        self.vacancies.clone()
    }

    /// Writes the full current state to disk
    ///
    /// The document goes to a temp file first and is then renamed over the
    /// data file, so a crash never leaves a half-written array behind.
    pub fn save(&self) -> Result<()> {
        let started = Instant::now();
        let mapped: Vec<Value> = self.vacancies.iter().map(Vacancy::to_mapping).collect();
        let json = serde_json::to_string_pretty(&mapped)?;

        write_atomically(&self.path, json.as_bytes())
            .map_err(|e| VacancyError::storage(&self.path, e))?;

        info!(
            "Saved {} vacancies to {} in {:.2?}",
            self.vacancies.len(),
            self.path.display(),
            started.elapsed()
        );
        Ok(())
    }

    /// Adds every record whose id isn't stored yet and persists
    ///
    /// Duplicates, including repeats within `records`, are ignored.
    ///
    /// # Returns
    /// * `Ok(n)` - Number of newly added records
    /// * `Err(VacancyError::Storage)` - Records were added in memory but the write failed
    pub fn add_many<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Vacancy>,
    {
        let mut added = 0;
        for vacancy in records {
            if self.ids.contains(&vacancy.id) {
                info!("Vacancy {} already stored", vacancy.id);
                continue;
            }
            self.ids.insert(vacancy.id.clone());
            self.vacancies.push(vacancy);
            added += 1;
        }

        self.persist()?;
        Ok(added)
    }

    /// Removes the record with the given id
    ///
    /// # Returns
    /// * `Ok(true)` - A record was removed and the state persisted
    /// * `Ok(false)` - No such id; nothing changed
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if !self.ids.remove(id) {
            return Ok(false);
        }
        self.vacancies.retain(|v| v.id != id);
        info!("Deleted vacancy {}", id);

        self.persist()?;
        Ok(true)
    }

    /// Empties the store and removes the data file itself
    pub fn clear_all(&mut self) -> Result<()> {
        self.vacancies.clear();
        self.ids.clear();

        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Removed data file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove data file {}: {}", self.path.display(), e);
                Err(VacancyError::storage(&self.path, e))
            }
        }
    }

    /// Returns an owned copy of all records in insertion order
    pub fn get_all(&self) -> Vec<Vacancy> {
        self.vacancies.clone()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Vacancy> {
        self.vacancies.iter().find(|v| v.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.vacancies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vacancies.is_empty()
    }

    fn persist(&self) -> Result<()> {
        self.save().inspect_err(|e| error!("Failed to save vacancies: {}", e))
    }
}

fn read_document(path: &Path) -> Result<Vec<Value>> {
    let contents = fs::read_to_string(path).map_err(|e| VacancyError::storage(path, e))?;
    match serde_json::from_str(&contents)? {
        Value::Array(items) => Ok(items),
        _ => Err(VacancyError::InvalidInput(
            "data file is not a JSON array".to_string(),
        )),
    }
}

/// Writes `bytes` to a sibling temp file and renames it over `path`
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    let result = fs::File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp_path, path));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
