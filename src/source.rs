use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::records::{self, SectionRecord, StopRecord};

/// Where section and train data comes from.
///
/// Injected into the loading pipeline so tests and embedded callers can hand
/// records over directly instead of going through the filesystem.
pub trait TimetableSource: Send + Sync {
    /// The section definition with its stations and service list.
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` when the section data cannot be read or parsed.
    fn section(&self) -> Result<SectionRecord, LoadError>;

    /// The stop records for one train, in travel order.
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` when the train's data cannot be read or parsed.
    fn stops(&self, train_number: &str) -> Result<Vec<StopRecord>, LoadError>;
}

/// Data source reading the XML file layout: one section file plus one
/// `<number>.xml` timetable file per train, all in a single directory.
#[derive(Debug, Clone)]
pub struct XmlTimetableSource {
    data_dir: PathBuf,
    section_file: String,
}

impl XmlTimetableSource {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, section_file: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            section_file: section_file.into(),
        }
    }

    fn read(path: &Path) -> Result<String, LoadError> {
        fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl TimetableSource for XmlTimetableSource {
    fn section(&self) -> Result<SectionRecord, LoadError> {
        let path = self.data_dir.join(&self.section_file);
        let xml = Self::read(&path)?;
        records::parse_section(&xml).map_err(|source| LoadError::Xml { path, source })
    }

    fn stops(&self, train_number: &str) -> Result<Vec<StopRecord>, LoadError> {
        let path = self.data_dir.join(format!("{train_number}.xml"));
        let xml = Self::read(&path)?;
        let record =
            records::parse_timetable(&xml).map_err(|source| LoadError::Xml { path, source })?;
        Ok(record.stops)
    }
}

/// Source serving records held in memory.
#[derive(Debug)]
pub struct InMemorySource {
    section: SectionRecord,
    timetables: HashMap<String, Vec<StopRecord>>,
}

impl InMemorySource {
    #[must_use]
    pub fn new(section: SectionRecord) -> Self {
        Self {
            section,
            timetables: HashMap::new(),
        }
    }

    /// Add the stop list for one train, replacing any previous one.
    #[must_use]
    pub fn with_stops(mut self, train_number: impl Into<String>, stops: Vec<StopRecord>) -> Self {
        self.timetables.insert(train_number.into(), stops);
        self
    }
}

impl TimetableSource for InMemorySource {
    fn section(&self) -> Result<SectionRecord, LoadError> {
        Ok(self.section.clone())
    }

    fn stops(&self, train_number: &str) -> Result<Vec<StopRecord>, LoadError> {
        self.timetables
            .get(train_number)
            .cloned()
            .ok_or_else(|| LoadError::NoStops(train_number.to_string()))
    }
}
