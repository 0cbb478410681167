//! Poster identifier resolution.
//!
//! Data files name posters symbolically (`"matrix_poster"`), while the shipped
//! images use whatever name the artwork was saved under (`thematrix.png`).
//! [`PosterResolver`] bridges the two by trying a fixed chain of candidate
//! names against a [`ResourceNamespace`] and returning the first that exists.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

/// Resource shown when a record has no usable poster.
pub const PLACEHOLDER_POSTER: &str = "placeholder_poster";

/// Identifiers whose artwork does not follow the generic naming rules.
const DIRECT_MAPPINGS: &[(&str, &str)] = &[
    ("interstellar_poster", "interstellar"),
    ("matrix_poster", "thematrix"),
    ("inception_poster", "inception"),
    ("dark_knight_poster", "dark_knight"),
    ("pulp_fiction_poster", "pulpfiction"),
    ("avatar_poster", "avatar"),
    ("titanic_poster", "titanic"),
    ("godfather_poster", "thegodfather"),
];

/// Poster resources shipped with the bundled data set.
const BUNDLED_POSTERS: &[&str] = &[
    "interstellar",
    "thematrix",
    "inception",
    "dark_knight",
    "pulpfiction",
    "avatar",
    "titanic",
    "thegodfather",
    PLACEHOLDER_POSTER,
];

const POSTER_SUFFIX: &str = "_poster";

/// A set of concrete resource names that can be probed for existence.
pub trait ResourceNamespace {
    fn contains(&self, name: &str) -> io::Result<bool>;
}

impl<N: ResourceNamespace + ?Sized> ResourceNamespace for Box<N> {
    fn contains(&self, name: &str) -> io::Result<bool> {
        (**self).contains(name)
    }
}

/// Fixed in-memory name set.
#[derive(Debug, Clone, Default)]
pub struct StaticNamespace {
    names: HashSet<String>,
}

impl StaticNamespace {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Names of the posters that ship with the bundled data set.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_POSTERS.iter().copied())
    }
}

impl ResourceNamespace for StaticNamespace {
    fn contains(&self, name: &str) -> io::Result<bool> {
        Ok(self.names.contains(name))
    }
}

/// Image files of one directory, keyed by file stem.
#[derive(Debug, Clone)]
pub struct DirectoryNamespace {
    root: PathBuf,
    images: HashMap<String, PathBuf>,
}

impl DirectoryNamespace {
    /// Index every image file directly under `root`. Non-image files and
    /// subdirectories are ignored.
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut images = HashMap::new();

        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let is_image = mime_guess::from_path(&path)
                .first()
                .map_or(false, |mime| mime.type_() == mime_guess::mime::IMAGE);
            if !is_image {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // macOS hands out NFD file names
            let stem: String = stem.nfc().collect();
            images.entry(stem).or_insert(path);
        }

        debug!("Indexed {} poster images in {}", images.len(), root.display());
        Ok(Self { root, images })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// File backing a resource name, if indexed.
    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.images.get(name).map(PathBuf::as_path)
    }
}

impl ResourceNamespace for DirectoryNamespace {
    fn contains(&self, name: &str) -> io::Result<bool> {
        Ok(self.images.contains_key(name))
    }
}

/// Which step of the chain produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DirectMapping,
    Verbatim,
    SuffixStripped,
    CleanName,
    ThePrefixed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::DirectMapping => "direct mapping",
            Stage::Verbatim => "verbatim",
            Stage::SuffixStripped => "suffix stripped",
            Stage::CleanName => "clean name",
            Stage::ThePrefixed => "\"the\" prefix",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterLookup {
    Found { name: String, stage: Stage },
    NotFound,
}

impl PosterLookup {
    pub fn name(&self) -> Option<&str> {
        match self {
            PosterLookup::Found { name, .. } => Some(name),
            PosterLookup::NotFound => None,
        }
    }

    /// Resolved name, or [`PLACEHOLDER_POSTER`] when nothing matched.
    pub fn or_placeholder(&self) -> &str {
        self.name().unwrap_or(PLACEHOLDER_POSTER)
    }
}

fn strip_poster_suffix(identifier: &str) -> Option<String> {
    identifier
        .strip_suffix(POSTER_SUFFIX)
        .map(|rest| rest.to_lowercase())
}

fn clean_name(identifier: &str) -> String {
    identifier
        .replace(POSTER_SUFFIX, "")
        .replace(".png", "")
        .replace(".jpg", "")
}

/// Generic candidate names in the order they are tried.
fn generic_candidates(identifier: &str) -> Vec<(Stage, String)> {
    let mut candidates = vec![(Stage::Verbatim, identifier.to_string())];
    if let Some(stripped) = strip_poster_suffix(identifier) {
        candidates.push((Stage::SuffixStripped, stripped));
    }
    let clean = clean_name(identifier);
    let prefixed = format!("the{}", clean);
    candidates.push((Stage::CleanName, clean));
    candidates.push((Stage::ThePrefixed, prefixed));
    candidates
}

/// Maps poster identifiers to concrete resource names in a namespace.
pub struct PosterResolver<N> {
    namespace: N,
}

impl<N: ResourceNamespace> PosterResolver<N> {
    pub fn new(namespace: N) -> Self {
        Self { namespace }
    }

    pub fn namespace(&self) -> &N {
        &self.namespace
    }

    /// Resolve a poster identifier. The identifier must come from a record
    /// without a poster defect; defective records go straight to the placeholder.
    pub fn resolve(&self, identifier: &str) -> PosterLookup {
        match self.try_resolve(identifier) {
            Ok(Some((stage, name))) => {
                debug!("Resolved poster {} to {} ({})", identifier, name, stage);
                PosterLookup::Found { name, stage }
            }
            Ok(None) => {
                warn!("Cannot find poster resource for {}", identifier);
                PosterLookup::NotFound
            }
            Err(e) => {
                warn!("Failed to probe poster resource for {}: {}", identifier, e);
                PosterLookup::NotFound
            }
        }
    }

    fn try_resolve(&self, identifier: &str) -> io::Result<Option<(Stage, String)>> {
        if let Some((_, mapped)) = DIRECT_MAPPINGS.iter().find(|(key, _)| *key == identifier) {
            if self.probe(Stage::DirectMapping, mapped)? {
                return Ok(Some((Stage::DirectMapping, mapped.to_string())));
            }
        }

        for (stage, candidate) in generic_candidates(identifier) {
            if self.probe(stage, &candidate)? {
                return Ok(Some((stage, candidate)));
            }
        }

        Ok(None)
    }

    fn probe(&self, stage: Stage, candidate: &str) -> io::Result<bool> {
        let found = self.namespace.contains(candidate)?;
        debug!(
            "Poster probe ({}): {} -> {}",
            stage,
            candidate,
            if found { "success" } else { "failure" }
        );
        Ok(found)
    }
}

impl PosterResolver<StaticNamespace> {
    /// Resolver over the posters bundled with the data set.
    pub fn bundled() -> Self {
        Self::new(StaticNamespace::bundled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn resolver(names: &[&str]) -> PosterResolver<StaticNamespace> {
        PosterResolver::new(StaticNamespace::new(names.iter().copied()))
    }

    #[test]
    fn test_direct_mapping_wins() {
        let r = resolver(&["thematrix", "matrix", "matrix_poster"]);
        assert_eq!(
            r.resolve("matrix_poster"),
            PosterLookup::Found {
                name: "thematrix".to_string(),
                stage: Stage::DirectMapping
            }
        );
    }

    #[test]
    fn test_direct_mapping_falls_through_when_missing() {
        let r = resolver(&["godfather"]);
        assert_eq!(
            r.resolve("godfather_poster"),
            PosterLookup::Found {
                name: "godfather".to_string(),
                stage: Stage::SuffixStripped
            }
        );
    }

    #[test]
    fn test_generic_stages_in_order() {
        let r = resolver(&["heat_poster", "heat"]);
        assert_eq!(r.resolve("heat_poster").name(), Some("heat_poster"));

        let r = resolver(&["heat"]);
        let hit = r.resolve("Heat_poster");
        assert_eq!(hit.name(), Some("heat"));

        let r = resolver(&["alien"]);
        assert_eq!(
            r.resolve("alien.png"),
            PosterLookup::Found {
                name: "alien".to_string(),
                stage: Stage::CleanName
            }
        );

        let r = resolver(&["theshining"]);
        assert_eq!(
            r.resolve("shining_poster.jpg"),
            PosterLookup::Found {
                name: "theshining".to_string(),
                stage: Stage::ThePrefixed
            }
        );
    }

    #[test]
    fn test_candidate_order() {
        let stages: Vec<Stage> = generic_candidates("x_poster").into_iter().map(|(s, _)| s).collect();
        assert_eq!(
            stages,
            vec![Stage::Verbatim, Stage::SuffixStripped, Stage::CleanName, Stage::ThePrefixed]
        );
        let stages: Vec<Stage> = generic_candidates("x.png").into_iter().map(|(s, _)| s).collect();
        assert_eq!(stages, vec![Stage::Verbatim, Stage::CleanName, Stage::ThePrefixed]);
    }

    #[test]
    fn test_not_found_and_idempotent() {
        let r = PosterResolver::bundled();
        assert_eq!(r.resolve("unknown_xyz_poster"), PosterLookup::NotFound);
        assert_eq!(r.resolve("unknown_xyz_poster").or_placeholder(), PLACEHOLDER_POSTER);
        assert_eq!(r.resolve("matrix_poster"), r.resolve("matrix_poster"));
        assert_eq!(r.resolve("matrix_poster").name(), Some("thematrix"));
    }

    struct BrokenNamespace;

    impl ResourceNamespace for BrokenNamespace {
        fn contains(&self, _name: &str) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::Other, "namespace unavailable"))
        }
    }

    #[test]
    fn test_probe_failure_is_not_found() {
        let r = PosterResolver::new(BrokenNamespace);
        assert_eq!(r.resolve("matrix_poster"), PosterLookup::NotFound);
    }

    #[test]
    fn test_directory_namespace() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("thematrix.png")).unwrap();
        File::create(dir.path().join("avatar.jpg")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        fs::create_dir(dir.path().join("titanic.png")).unwrap();

        let ns = DirectoryNamespace::open(dir.path()).unwrap();
        assert_eq!(ns.len(), 2);
        assert!(ns.contains("thematrix").unwrap());
        assert!(!ns.contains("notes").unwrap());
        assert!(!ns.contains("titanic").unwrap());
        assert_eq!(ns.path_of("avatar"), Some(dir.path().join("avatar.jpg").as_path()));

        let r = PosterResolver::new(ns);
        assert_eq!(r.resolve("matrix_poster").name(), Some("thematrix"));
        assert_eq!(r.resolve("avatar_poster").name(), Some("avatar"));
        assert_eq!(r.resolve("titanic_poster"), PosterLookup::NotFound);
    }

    #[test]
    fn test_directory_namespace_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(DirectoryNamespace::open(dir.path().join("absent")).is_err());
    }
}
