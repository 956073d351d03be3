//! File-backed store for instrument records.
//!
//! One JSON document per symbol under the output directory. Writes go to a
//! temporary file first and are renamed into place, so readers never observe a
//! half-written record.

use crate::error::StoreError;
use crate::types::{InstrumentRecord, RecordSummary};
use dashmap::DashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const ESCAPED: [char; 11] = ['~', '/', '\\', ':', '*', '?', '"', '<', '>', '|', '%'];

/// Persisted records keyed by symbol, with an in-memory read cache.
pub struct RecordStore {
    dir: PathBuf,
    cache: DashMap<String, InstrumentRecord>,
}

impl RecordStore {
    /// Open (and create if needed) the store directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            cache: DashMap::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name stem for a symbol.
    ///
    /// Characters that are unsafe in file names (and `~` itself) become `~XX`
    /// hex escapes, so distinct symbols never share a file.
    pub fn file_stem(symbol: &str) -> String {
        let mut stem = String::with_capacity(symbol.len());
        for c in symbol.chars() {
            if ESCAPED.contains(&c) {
                stem.push_str(&format!("~{:02X}", c as u32));
            } else {
                stem.push(c);
            }
        }
        stem
    }

    /// Symbol encoded by a file name stem, or None if the stem is malformed.
    pub fn symbol_from_stem(stem: &str) -> Option<String> {
        let mut symbol = String::with_capacity(stem.len());
        let mut chars = stem.chars();
        while let Some(c) = chars.next() {
            if c != '~' {
                symbol.push(c);
                continue;
            }
            let hex: String = chars.by_ref().take(2).collect();
            let code = u8::from_str_radix(&hex, 16).ok()?;
            let decoded = char::from(code);
            if hex.len() != 2 || !ESCAPED.contains(&decoded) {
                return None;
            }
            symbol.push(decoded);
        }
        Some(symbol)
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::file_stem(symbol)))
    }

    /// Write a record atomically, replacing any previous one.
    pub fn save(&self, symbol: &str, record: &InstrumentRecord) -> Result<(), StoreError> {
        let path = self.path_for(symbol);
        let tmp = path.with_extension("json.tmp");

        let content = serde_json::to_string(record)?;
        if let Err(e) = fs::write(&tmp, content) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        fs::rename(&tmp, &path)?;

        self.cache.insert(symbol.to_string(), record.clone());
        debug!("Saved {} ({} points) to {:?}", symbol, record.len(), path);
        Ok(())
    }

    /// Load a record, serving repeated reads from memory.
    pub fn load(&self, symbol: &str) -> Result<InstrumentRecord, StoreError> {
        if let Some(record) = self.cache.get(symbol) {
            return Ok(record.clone());
        }

        let path = self.path_for(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(symbol.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let record: InstrumentRecord = serde_json::from_str(&content)?;
        self.cache.insert(symbol.to_string(), record.clone());
        Ok(record)
    }

    /// Symbols with a persisted record, sorted.
    pub fn symbols(&self) -> Result<Vec<String>, StoreError> {
        let mut symbols: Vec<String> = fs::read_dir(&self.dir)?
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension()? != "json" {
                    return None;
                }
                Self::symbol_from_stem(path.file_stem()?.to_str()?)
            })
            .collect();
        symbols.sort();
        Ok(symbols)
    }

    /// Every readable record, sorted by symbol. Unreadable files are skipped.
    pub fn load_all(&self) -> Result<Vec<(String, InstrumentRecord)>, StoreError> {
        let mut out = Vec::new();
        for symbol in self.symbols()? {
            match self.load(&symbol) {
                Ok(record) => out.push((symbol, record)),
                Err(e) => warn!("Skipping unreadable record {}: {}", symbol, e),
            }
        }
        Ok(out)
    }

    /// Listing of every readable record.
    pub fn summaries(&self) -> Result<Vec<RecordSummary>, StoreError> {
        Ok(self
            .load_all()?
            .into_iter()
            .map(|(symbol, record)| RecordSummary {
                points: record.len(),
                name: record.name,
                symbol,
            })
            .collect())
    }

    /// Drop the in-memory copies so the next read goes to disk.
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}
