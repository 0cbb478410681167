use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::parser::{self, kind_of, EntryError};
use crate::record::Movie;

/// Default data file name inside an asset location.
pub const DEFAULT_DATA_FILE: &str = "movies.json";

const BUNDLED_MOVIES: &str = include_str!("../assets/movies.json");

/// Load-level failure. Any of these aborts the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read movie data file {name}: file not found")]
    NotFound { name: String },

    #[error("Cannot read movie data file {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("JSON format error: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("JSON format error: expected an array at top level, found {found}")]
    NotAnArray { found: &'static str },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }

    /// True for the two payload-shape failures.
    pub fn is_format_error(&self) -> bool {
        matches!(self, LoadError::Malformed(_) | LoadError::NotAnArray { .. })
    }
}

/// Somewhere named assets can be read from.
pub trait AssetSource {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Assets stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for AssetDir {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(self.root.join(name))?))
    }
}

/// The data set compiled into this library.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledAssets;

impl AssetSource for BundledAssets {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        if name == DEFAULT_DATA_FILE {
            Ok(Box::new(BUNDLED_MOVIES.as_bytes()))
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no bundled asset named {}", name),
            ))
        }
    }
}

/// Entry counts of one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Array elements seen
    pub total: usize,
    /// Elements that became a [`Movie`]
    pub loaded: usize,
    /// Elements skipped as empty or not an object
    pub skipped: usize,
}

/// Movies of one load together with its counts.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub movies: Vec<Movie>,
    pub report: LoadReport,
}

/// Read an asset into a single line-less string.
///
/// Lines are concatenated with their terminators dropped. This is fine for
/// JSON whose string values contain no raw line breaks; such breaks are lost.
pub fn read_asset(source: &dyn AssetSource, name: &str) -> Result<String, LoadError> {
    let io_err = |e: io::Error| {
        if e.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound {
                name: name.to_string(),
            }
        } else {
            LoadError::Io {
                name: name.to_string(),
                source: e,
            }
        }
    };

    let mut bytes = Vec::new();
    {
        let mut reader = source.open(name).map_err(io_err)?;
        reader.read_to_end(&mut bytes).map_err(io_err)?;
    }

    let (text, _, had_errors) = UTF_8.decode(&bytes);
    if had_errors {
        error!("{} contains invalid UTF-8; replaced with U+FFFD", name);
    }
    Ok(join_lines(&text))
}

fn join_lines(text: &str) -> String {
    text.split(&['\r', '\n'][..]).collect()
}

/// Parse a payload into movies. Per-entry problems skip that entry only.
pub fn parse_catalog(payload: &str) -> Result<Catalog, LoadError> {
    let root: Value = serde_json::from_str(payload)?;
    let entries = match root {
        Value::Array(entries) => entries,
        other => {
            return Err(LoadError::NotAnArray {
                found: kind_of(&other),
            })
        }
    };

    let mut movies = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for (i, entry) in entries.iter().enumerate() {
        match parser::parse_entry(entry) {
            Ok(movie) => movies.push(movie),
            Err(EntryError::EmptyObject) => {
                error!("Movie #{} is an empty object", i + 1);
                skipped += 1;
            }
            Err(e) => {
                error!("Error parsing movie #{}: {}", i + 1, e);
                skipped += 1;
            }
        }
    }

    let report = LoadReport {
        total: entries.len(),
        loaded: movies.len(),
        skipped,
    };
    info!(
        "Movie data loading complete: total {}, successful {}, skipped {}",
        report.total, report.loaded, report.skipped
    );

    Ok(Catalog { movies, report })
}

/// Read and parse a named asset, keeping the counts.
pub fn load_catalog(source: &dyn AssetSource, name: &str) -> Result<Catalog, LoadError> {
    let payload = read_asset(source, name).map_err(|e| {
        error!("{}", e);
        e
    })?;
    parse_catalog(&payload).map_err(|e| {
        error!("{}", e);
        e
    })
}

/// Read and parse a named asset into its movies, in source order.
pub fn load_movies(source: &dyn AssetSource, name: &str) -> Result<Vec<Movie>, LoadError> {
    load_catalog(source, name).map(|catalog| catalog.movies)
}
