pub mod display;
pub mod loader;
pub mod messages;
pub mod parser;
pub mod poster;
pub mod record;
pub mod summary;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use display::{Card, Line, PosterArt, Tone};
pub use loader::{
    load_catalog, load_movies, AssetDir, AssetSource, BundledAssets, Catalog, LoadError,
    LoadReport, DEFAULT_DATA_FILE,
};
pub use parser::{parse_entry, parse_movie, EntryError};
pub use poster::{
    DirectoryNamespace, PosterLookup, PosterResolver, ResourceNamespace, Stage, StaticNamespace,
    PLACEHOLDER_POSTER,
};
pub use record::{Defects, Movie, YearDefect, UNKNOWN_GENRE};
pub use summary::{DefectSummary, Notice};

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

/// Where to read movie data and poster images from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptions {
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Asset directory holding `data_file`; the bundled data set when unset
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
    /// Directory of poster images; the bundled poster names when unset
    #[serde(default)]
    pub posters_dir: Option<PathBuf>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            assets_dir: None,
            posters_dir: None,
        }
    }
}

/// Poster resolver over whichever namespace [`LoadOptions`] selected.
pub type DynResolver = PosterResolver<Box<dyn ResourceNamespace>>;

/// A loaded collection plus the resolver the shell draws posters with.
pub struct Shelf {
    pub catalog: Catalog,
    pub resolver: DynResolver,
}

impl Shelf {
    pub fn movies(&self) -> &[Movie] {
        &self.catalog.movies
    }

    pub fn notice(&self) -> Notice {
        Notice::for_movies(&self.catalog.movies)
    }

    pub fn cards(&self) -> Vec<Card> {
        self.catalog
            .movies
            .iter()
            .map(|m| Card::render(m, &self.resolver))
            .collect()
    }
}

/// Build the poster resolver selected by `options`.
pub fn open_resolver(options: &LoadOptions) -> std::io::Result<DynResolver> {
    let namespace: Box<dyn ResourceNamespace> = match &options.posters_dir {
        Some(dir) => Box::new(DirectoryNamespace::open(dir)?),
        None => Box::new(StaticNamespace::bundled()),
    };
    Ok(PosterResolver::new(namespace))
}

/// Load the catalog selected by `options`.
pub fn open_catalog(options: &LoadOptions) -> Result<Catalog, LoadError> {
    match &options.assets_dir {
        Some(dir) => load_catalog(&AssetDir::new(dir), &options.data_file),
        None => load_catalog(&BundledAssets, &options.data_file),
    }
}

/// Load the catalog and open the poster namespace in one go.
pub fn open_shelf(options: &LoadOptions) -> Result<Shelf, LoadError> {
    let catalog = open_catalog(options)?;
    let resolver = open_resolver(options).map_err(|source| LoadError::Io {
        name: options
            .posters_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        source,
    })?;
    Ok(Shelf { catalog, resolver })
}
