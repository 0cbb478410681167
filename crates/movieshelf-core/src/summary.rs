use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::loader::LoadError;
use crate::messages;
use crate::record::Movie;

/// Defect counts over a loaded collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DefectSummary {
    pub title: usize,
    pub year: usize,
    pub genre: usize,
    pub poster: usize,
}

impl DefectSummary {
    pub fn scan(movies: &[Movie]) -> Self {
        movies.iter().fold(Self::default(), |mut acc, m| {
            acc.title += m.has_title_error() as usize;
            acc.year += m.has_year_error() as usize;
            acc.genre += m.has_genre_error() as usize;
            acc.poster += m.has_poster_error() as usize;
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.title + self.year + self.genre + self.poster
    }
}

/// What the shell tells the user after a load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoData,
    Loaded {
        count: usize,
    },
    LoadedWithDefects {
        count: usize,
        defects: usize,
        title_defects: usize,
    },
    FileNotFound,
    LoadingError {
        detail: String,
    },
}

impl Notice {
    pub fn for_movies(movies: &[Movie]) -> Self {
        if movies.is_empty() {
            return Notice::NoData;
        }

        let summary = DefectSummary::scan(movies);
        if summary.total() == 0 {
            return Notice::Loaded {
                count: movies.len(),
            };
        }

        info!(
            "Detected errors: title {}, year {}, genre {}, poster {}",
            summary.title, summary.year, summary.genre, summary.poster
        );
        Notice::LoadedWithDefects {
            count: movies.len(),
            defects: summary.total(),
            title_defects: summary.title,
        }
    }

    pub fn for_error(err: &LoadError) -> Self {
        if err.is_not_found() {
            Notice::FileNotFound
        } else {
            Notice::LoadingError {
                detail: err.to_string(),
            }
        }
    }

    pub fn for_result(result: &Result<Vec<Movie>, LoadError>) -> Self {
        match result {
            Ok(movies) => Self::for_movies(movies),
            Err(e) => Self::for_error(e),
        }
    }

    /// Failures and empty loads; the shell must not render a list for these.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::NoData | Notice::FileNotFound | Notice::LoadingError { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoData => f.write_str(messages::lookup("no_movies_available")),
            Notice::Loaded { count } => {
                f.write_str(&messages::format("movies_loaded", &[count]))
            }
            Notice::LoadedWithDefects {
                count,
                defects,
                title_defects,
            } => {
                f.write_str(&messages::format(
                    "movies_loaded_with_errors",
                    &[count, defects],
                ))?;
                if *title_defects > 0 {
                    write!(
                        f,
                        "\n{}",
                        messages::format("title_inferred_count", &[title_defects])
                    )?;
                }
                Ok(())
            }
            Notice::FileNotFound => f.write_str(messages::lookup("error_file_not_found")),
            Notice::LoadingError { detail } => {
                write!(f, "{}: {}", messages::lookup("error_loading_data"), detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(title: &str) -> Movie {
        Movie::new(
            Some(title.to_string()),
            Some(2001),
            Some("Drama".to_string()),
            Some(format!("{}_poster", title)),
        )
    }

    #[test]
    fn test_scan_counts_each_kind() {
        let movies = vec![
            clean("a"),
            Movie::new(None, None, Some("Drama".into()), Some("p".into())),
            Movie::new(Some("c".into()), Some(1), None, None),
        ];
        let s = DefectSummary::scan(&movies);
        assert_eq!(
            s,
            DefectSummary {
                title: 1,
                year: 1,
                genre: 1,
                poster: 1
            }
        );
        assert_eq!(s.total(), 4);
    }

    #[test]
    fn test_notice_variants() {
        assert_eq!(Notice::for_movies(&[]), Notice::NoData);
        assert!(Notice::NoData.is_error());

        let n = Notice::for_movies(&[clean("a"), clean("b")]);
        assert_eq!(n, Notice::Loaded { count: 2 });
        assert_eq!(n.to_string(), "Loaded 2 movies");

        let n = Notice::for_movies(&[clean("a"), Movie::new(None, Some(1990), None, None)]);
        assert_eq!(
            n,
            Notice::LoadedWithDefects {
                count: 2,
                defects: 3,
                title_defects: 1
            }
        );
        assert_eq!(
            n.to_string(),
            "Loaded 2 movies, 3 data problems detected\n1 movies are missing a title"
        );
        assert!(!n.is_error());
    }

    #[test]
    fn test_notice_for_errors() {
        let not_found = LoadError::NotFound {
            name: "movies.json".into(),
        };
        assert_eq!(Notice::for_error(&not_found), Notice::FileNotFound);
        assert_eq!(
            Notice::for_error(&not_found).to_string(),
            "Movie data file not found"
        );

        let malformed = LoadError::NotAnArray { found: "object" };
        let n = Notice::for_result(&Err(malformed));
        assert!(n.is_error());
        assert!(n.to_string().starts_with("Error loading movie data: "));
    }
}
