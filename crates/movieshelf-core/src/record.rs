use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Genre stored when the source entry has none.
pub const UNKNOWN_GENRE: &str = "Unknown Genre";

/// Why a year value was flagged. The derived value (if any) lives on the [`Movie`].
#[derive(Debug, Clone, PartialEq)]
pub enum YearDefect {
    /// No `year` key at all
    Missing,
    /// String that does not parse as a 32-bit integer
    NotANumber(String),
    /// Zero or negative, from either a string or an integer
    NonPositive(i32),
    /// Floating-point value; the integer part is kept for display
    Decimal(f64),
    /// Any other value that cannot be turned into an integer
    Unreadable(String),
}

impl fmt::Display for YearDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearDefect::Missing => write!(f, "Year field is missing"),
            YearDefect::NotANumber(raw) => write!(f, "Year is not a valid number: {}", raw),
            YearDefect::NonPositive(year) => write!(f, "Year is negative: {}", year),
            YearDefect::Decimal(raw) => write!(f, "Year is a decimal: {:?}", raw),
            YearDefect::Unreadable(detail) => write!(f, "Error parsing year: {}", detail),
        }
    }
}

/// Per-field validation outcome of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defects {
    pub title: bool,
    pub year: Option<YearDefect>,
    pub genre: bool,
    pub poster: bool,
}

impl Defects {
    pub fn is_clean(&self) -> bool {
        !self.title && self.year.is_none() && !self.genre && !self.poster
    }

    /// Number of flagged fields (0..=4).
    pub fn count(&self) -> usize {
        [self.title, self.year.is_some(), self.genre, self.poster]
            .iter()
            .filter(|flag| **flag)
            .count()
    }
}

impl Serialize for Defects {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Defects", 5)?;
        s.serialize_field("title_error", &self.title)?;
        s.serialize_field("year_error", &self.year.is_some())?;
        s.serialize_field(
            "year_error_message",
            &self.year.as_ref().map(|d| d.to_string()).unwrap_or_default(),
        )?;
        s.serialize_field("genre_error", &self.genre)?;
        s.serialize_field("poster_error", &self.poster)?;
        s.end()
    }
}

/// One movie entry after validation. Always constructible, whatever its defects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    title: Option<String>,
    year: Option<i32>,
    genre: String,
    poster: Option<String>,
    defects: Defects,
}

fn blank(text: Option<&str>) -> bool {
    text.map_or(true, |t| t.trim().is_empty())
}

impl Movie {
    /// Build a record from values alone, deriving defects the simple way:
    /// blank title, absent year, absent genre and absent poster are flagged.
    pub fn new(
        title: Option<String>,
        year: Option<i32>,
        genre: Option<String>,
        poster: Option<String>,
    ) -> Self {
        let defects = Defects {
            title: blank(title.as_deref()),
            year: year.is_none().then_some(YearDefect::Missing),
            genre: genre.is_none(),
            poster: poster.is_none(),
        };
        Self::with_defects(title, year, genre, poster, defects)
    }

    /// Build a record whose defects were determined by the caller.
    /// A missing genre is still replaced by [`UNKNOWN_GENRE`].
    pub fn with_defects(
        title: Option<String>,
        year: Option<i32>,
        genre: Option<String>,
        poster: Option<String>,
        defects: Defects,
    ) -> Self {
        Self {
            title,
            year,
            genre: genre.unwrap_or_else(|| UNKNOWN_GENRE.to_string()),
            poster,
            defects,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn poster(&self) -> Option<&str> {
        self.poster.as_deref()
    }

    pub fn defects(&self) -> &Defects {
        &self.defects
    }

    pub fn has_title_error(&self) -> bool {
        self.defects.title
    }

    pub fn has_year_error(&self) -> bool {
        self.defects.year.is_some()
    }

    /// Empty when the year is fine.
    pub fn year_error_message(&self) -> String {
        self.defects
            .year
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default()
    }

    pub fn has_genre_error(&self) -> bool {
        self.defects.genre
    }

    pub fn has_poster_error(&self) -> bool {
        self.defects.poster
    }

    /// Replace the title and recompute its flag.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.defects.title = blank(title.as_deref());
        self.title = title;
        self
    }

    /// Replace the genre and recompute its flag; `None` falls back to [`UNKNOWN_GENRE`].
    pub fn with_genre(mut self, genre: Option<String>) -> Self {
        self.defects.genre = genre.is_none();
        self.genre = genre.unwrap_or_else(|| UNKNOWN_GENRE.to_string());
        self
    }

    /// Replace the year. Flags are left as they were.
    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    /// Replace the poster identifier. Flags are left as they were.
    pub fn with_poster(mut self, poster: Option<String>) -> Self {
        self.poster = poster;
        self
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) [{}]",
            self.title.as_deref().unwrap_or("[No title]"),
            self.year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string()),
            self.genre
        )
    }
}
