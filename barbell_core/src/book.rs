//! Athlete book persistence.
//!
//! The athlete book is a single JSON file holding every imported athlete
//! and the shared exercise catalog. Saves are atomic: the book is written
//! to a temp file in the same directory and renamed over the original.

use crate::import::{CatalogExercise, ImportBatch};
use crate::records::AthleteRecord;
use crate::weights::RoundingStep;
use crate::{Error, ImportedAthleteData, Result, Vocabulary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// File name of the athlete book inside the data directory
pub const BOOK_FILE: &str = "athletes.json";

/// All athletes and the exercise catalog
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AthleteBook {
    #[serde(default)]
    pub athletes: Vec<AthleteRecord>,
    #[serde(default)]
    pub exercises: Vec<CatalogExercise>,
}

/// What an import did to the book
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub athlete_name: String,
    pub created: bool,
    pub plans_added: usize,
    pub exercises_added: usize,
}

impl AthleteBook {
    /// Load the book from a file
    ///
    /// Returns an empty book if the file doesn't exist. A file that exists
    /// but cannot be read or parsed is an error, so the next save never
    /// replaces athletes that failed to load.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No athlete book at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let book: AthleteBook = serde_json::from_str(&contents).map_err(|source| {
            tracing::error!("Failed to parse athlete book {:?}: {}", path, source);
            Error::CorruptedBook {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::debug!("Loaded {} athletes from {:?}", book.athletes.len(), path);
        Ok(book)
    }

    /// Save the book atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("Book path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved athlete book to {:?}", path);
        Ok(())
    }

    /// Load, modify and save the book
    ///
    /// Nothing is written when loading or `f` fails.
    pub fn update<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut AthleteBook) -> Result<T>,
    {
        let mut book = Self::load(path)?;
        let value = f(&mut book)?;
        book.save(path)?;
        Ok(value)
    }

    /// Find an athlete by name, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&AthleteRecord> {
        let wanted = name.trim().to_uppercase();
        self.athletes
            .iter()
            .find(|athlete| athlete.name.to_uppercase() == wanted)
    }

    fn find_by_name_mut(&mut self, name: &str) -> Option<&mut AthleteRecord> {
        let wanted = name.trim().to_uppercase();
        self.athletes
            .iter_mut()
            .find(|athlete| athlete.name.to_uppercase() == wanted)
    }

    /// Athlete by name, or [`Error::AthleteNotFound`]
    pub fn athlete(&self, name: &str) -> Result<&AthleteRecord> {
        self.find_by_name(name)
            .ok_or_else(|| Error::AthleteNotFound(name.to_string()))
    }

    /// Store a scanned document
    ///
    /// Creates the athlete when the name is new, otherwise merges PMs and
    /// appends the plans. Missing catalog entries are added.
    pub fn upsert_import(
        &mut self,
        data: &ImportedAthleteData,
        vocab: &Vocabulary,
        rounding_step: RoundingStep,
        today: NaiveDate,
    ) -> UpsertOutcome {
        let batch = ImportBatch::from_imported(data, vocab);

        let mut exercises_added = 0;
        for exercise in batch.exercises {
            if !self.exercises.iter().any(|e| e.lift == exercise.lift) {
                self.exercises.push(exercise);
                exercises_added += 1;
            }
        }

        let created = match self.find_by_name_mut(&data.athlete_name) {
            Some(athlete) => {
                athlete.apply_import(data, today);
                false
            }
            None => {
                self.athletes
                    .push(AthleteRecord::from_import(data, rounding_step));
                true
            }
        };

        tracing::info!(
            "{} athlete {} with {} plans",
            if created { "Created" } else { "Updated" },
            data.athlete_name,
            data.plans.len()
        );

        UpsertOutcome {
            athlete_name: data.athlete_name.clone(),
            created,
            plans_added: batch.plans.len(),
            exercises_added,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::import_plan_text;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn imported(text: &str) -> ImportedAthleteData {
        import_plan_text(text, &Vocabulary::default(), today())
            .unwrap()
            .data
    }

    fn upsert(book: &mut AthleteBook, text: &str) -> UpsertOutcome {
        book.upsert_import(
            &imported(text),
            &Vocabulary::default(),
            RoundingStep::default(),
            today(),
        )
    }

    const FIRST: &str =
        "Имя: Иван\nПМ (01.01.2024):\nПрисед: 100 кг\nНеделя 1\nТренировка 1\nПрисед: 50кг×6";
    const SECOND: &str = "Имя: иван\nЖим: 80 кг\nНеделя 2\nТренировка 1\nЖим: 60кг×5×5";

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(BOOK_FILE);

        let mut book = AthleteBook::default();
        upsert(&mut book, FIRST);
        book.save(&path).unwrap();

        let loaded = AthleteBook::load(&path).unwrap();
        assert_eq!(loaded, book);
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let book = AthleteBook::load(&temp_dir.path().join("missing.json")).unwrap();
        assert!(book.athletes.is_empty());
    }

    #[test]
    fn test_corrupted_book_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(BOOK_FILE);
        std::fs::write(&path, "{ invalid json }").unwrap();

        let result = AthleteBook::load(&path);
        assert!(matches!(result, Err(Error::CorruptedBook { .. })));
    }

    #[test]
    fn test_update_leaves_corrupted_book_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(BOOK_FILE);

        let mut book = AthleteBook::default();
        upsert(&mut book, FIRST);
        book.save(&path).unwrap();

        // A hand edit leaves a trailing comma behind
        let saved = std::fs::read_to_string(&path).unwrap();
        let broken = format!("{},\n}}", saved.trim_end().trim_end_matches('}').trim_end());
        std::fs::write(&path, &broken).unwrap();

        let result = AthleteBook::update(&path, |book| {
            Ok(upsert(book, SECOND))
        });
        assert!(matches!(result, Err(Error::CorruptedBook { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_upsert_creates_then_merges() {
        let mut book = AthleteBook::default();

        let first = upsert(&mut book, FIRST);
        assert!(first.created);
        assert_eq!(first.plans_added, 1);
        assert_eq!(first.exercises_added, 1);

        let second = upsert(&mut book, SECOND);
        assert!(!second.created);
        assert_eq!(second.exercises_added, 1);
        assert_eq!(book.athletes.len(), 1);
        assert_eq!(book.exercises.len(), 2);

        let athlete = book.athlete("Иван").unwrap();
        assert_eq!(athlete.squat_pm, Some(100.0));
        assert_eq!(athlete.bench_pm, Some(80.0));
        assert_eq!(athlete.plans.len(), 2);
        assert_eq!(athlete.pm_history.len(), 2);
        assert_eq!(athlete.pm_history[1].date, today());
    }

    #[test]
    fn test_unknown_athlete() {
        let book = AthleteBook::default();
        assert!(matches!(book.athlete("Никто"), Err(Error::AthleteNotFound(_))));
    }

    #[test]
    fn test_update_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join(BOOK_FILE);

        let outcome = AthleteBook::update(&path, |book| {
            Ok(upsert(book, FIRST))
        })
        .unwrap();
        assert!(outcome.created);

        let loaded = AthleteBook::load(&path).unwrap();
        assert_eq!(loaded.athletes.len(), 1);

        // No stray temp files next to the book
        let extras: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != BOOK_FILE)
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }
}
