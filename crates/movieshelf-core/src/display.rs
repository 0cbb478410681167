use std::fmt;

use serde::Serialize;

use crate::messages;
use crate::poster::{PosterLookup, PosterResolver, ResourceNamespace, PLACEHOLDER_POSTER};
use crate::record::Movie;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Normal,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Normal,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tone {
            Tone::Normal => write!(f, "  {}", self.text),
            Tone::Error => write!(f, "! {}", self.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum PosterArt {
    Resource(String),
    Placeholder,
}

impl PosterArt {
    pub fn resource_name(&self) -> &str {
        match self {
            PosterArt::Resource(name) => name,
            PosterArt::Placeholder => PLACEHOLDER_POSTER,
        }
    }
}

/// Everything the shell needs to draw one list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: Line,
    pub year: Line,
    pub genre: Line,
    pub poster: PosterArt,
}

impl Card {
    pub fn render<N: ResourceNamespace>(movie: &Movie, resolver: &PosterResolver<N>) -> Self {
        Self {
            title: title_line(movie),
            year: year_line(movie),
            genre: genre_line(movie),
            poster: poster_art(movie, resolver),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.year)?;
        writeln!(f, "{}", self.genre)?;
        match &self.poster {
            PosterArt::Resource(name) => write!(f, "  Poster: {}", name),
            PosterArt::Placeholder => write!(f, "  Poster: {} (placeholder)", PLACEHOLDER_POSTER),
        }
    }
}

fn title_line(movie: &Movie) -> Line {
    match movie.title() {
        Some(title) if !movie.has_title_error() => Line::normal(title),
        _ => Line::error(messages::lookup("title_placeholder")),
    }
}

fn year_line(movie: &Movie) -> Line {
    match (movie.has_year_error(), movie.year()) {
        (true, Some(year)) => Line::error(messages::format("year_error_format", &[&year])),
        (true, None) => Line::error(messages::lookup("year_error")),
        (false, Some(year)) => Line::normal(messages::format("year_label", &[&year])),
        (false, None) => Line::error(messages::lookup("year_placeholder")),
    }
}

fn genre_line(movie: &Movie) -> Line {
    if movie.has_genre_error() {
        Line::error(messages::lookup("genre_error"))
    } else {
        Line::normal(messages::format("genre_label", &[&movie.genre()]))
    }
}

fn poster_art<N: ResourceNamespace>(movie: &Movie, resolver: &PosterResolver<N>) -> PosterArt {
    let poster = match movie.poster() {
        Some(poster) if !movie.has_poster_error() => poster,
        _ => return PosterArt::Placeholder,
    };
    match resolver.resolve(poster) {
        PosterLookup::Found { name, .. } => PosterArt::Resource(name),
        PosterLookup::NotFound => PosterArt::Placeholder,
    }
}
