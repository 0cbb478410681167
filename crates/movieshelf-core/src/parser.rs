use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

use crate::record::{Defects, Movie, YearDefect};

/// Why an array element was skipped instead of becoming a [`Movie`].
#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("entry is an empty object")]
    EmptyObject,
    #[error("entry is {found}, not an object")]
    NotAnObject { found: &'static str },
}

/// JSON type name used in skip and year messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate one array element. Only structural problems (not an object, no keys)
/// are errors; field problems end up in [`Movie::defects`].
pub fn parse_entry(value: &Value) -> Result<Movie, EntryError> {
    match value {
        Value::Object(map) if map.is_empty() => Err(EntryError::EmptyObject),
        Value::Object(map) => Ok(parse_movie(map)),
        other => Err(EntryError::NotAnObject {
            found: kind_of(other),
        }),
    }
}

/// Evaluate all four fields independently and build the record.
pub fn parse_movie(obj: &Map<String, Value>) -> Movie {
    let (title, title_error) = parse_title(obj.get("title"));
    let (year, year_defect) = parse_year(obj.get("year"));
    let (genre, genre_error) = parse_genre(obj.get("genre"));
    let (poster, poster_error) = parse_poster(obj.get("poster"));

    if let Some(defect) = &year_defect {
        error!("{}", defect);
    }

    let defects = Defects {
        title: title_error,
        year: year_defect,
        genre: genre_error,
        poster: poster_error,
    };
    Movie::with_defects(title, year, genre, poster, defects)
}

/// Non-null field as text. Non-string values are rendered as compact JSON.
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_title(value: Option<&Value>) -> (Option<String>, bool) {
    match text_of(value) {
        Some(title) if title.trim().is_empty() => {
            error!("Title is an empty string");
            (Some(title), true)
        }
        Some(title) => (Some(title), false),
        None => {
            error!("Movie title is null or missing");
            (None, true)
        }
    }
}

fn parse_year(value: Option<&Value>) -> (Option<i32>, Option<YearDefect>) {
    let Some(value) = value else {
        return (None, Some(YearDefect::Missing));
    };

    match value {
        Value::String(raw) => match raw.parse::<i32>() {
            Ok(year) if year <= 0 => (Some(year), Some(YearDefect::NonPositive(year))),
            Ok(year) => (Some(year), None),
            Err(_) => (None, Some(YearDefect::NotANumber(raw.clone()))),
        },
        Value::Number(n) if n.is_f64() => {
            let raw = n.as_f64().unwrap_or_default();
            // Integer part only; `as` saturates out-of-range values.
            (Some(raw.trunc() as i32), Some(YearDefect::Decimal(raw)))
        }
        Value::Number(n) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(year) if year <= 0 => (Some(year), Some(YearDefect::NonPositive(year))),
            Some(year) => (Some(year), None),
            None => (None, Some(unreadable_year(value))),
        },
        other => (None, Some(unreadable_year(other))),
    }
}

fn unreadable_year(value: &Value) -> YearDefect {
    YearDefect::Unreadable(format!(
        "Value {} at year of type {} cannot be converted to int",
        value,
        kind_of(value)
    ))
}

fn parse_genre(value: Option<&Value>) -> (Option<String>, bool) {
    // Empty strings are accepted here, unlike title and poster.
    match text_of(value) {
        Some(genre) => (Some(genre), false),
        None => {
            error!("Movie genre is missing");
            (None, true)
        }
    }
}

fn parse_poster(value: Option<&Value>) -> (Option<String>, bool) {
    match text_of(value) {
        Some(poster) if poster.trim().is_empty() => {
            error!("Poster resource is an empty string");
            (None, true)
        }
        Some(poster) => (Some(poster), false),
        None => {
            error!("Poster resource is missing or null");
            (None, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UNKNOWN_GENRE;
    use serde_json::json;

    fn parse(value: Value) -> Movie {
        parse_entry(&value).unwrap()
    }

    #[test]
    fn test_clean_record() {
        let m = parse(json!({
            "title": "Inception",
            "year": 2010,
            "genre": "Sci-Fi",
            "poster": "inception_poster"
        }));
        assert!(m.defects().is_clean());
        assert_eq!(m.title(), Some("Inception"));
        assert_eq!(m.year(), Some(2010));
        assert_eq!(m.genre(), "Sci-Fi");
        assert_eq!(m.poster(), Some("inception_poster"));
    }

    #[test]
    fn test_year_decimal_keeps_integer_part() {
        let m = parse(json!({"title": "Inception", "year": 2010.7}));
        assert!(m.has_year_error());
        assert_eq!(m.year(), Some(2010));
        assert!(m.year_error_message().contains("2010.7"));

        let m = parse(json!({"year": -1999.9}));
        assert_eq!(m.year(), Some(-1999));
    }

    #[test]
    fn test_year_string_branch() {
        let m = parse(json!({"year": "-5"}));
        assert!(m.has_year_error());
        assert_eq!(m.year(), Some(-5));
        assert!(m.year_error_message().contains("-5"));

        let m = parse(json!({"year": "1994"}));
        assert!(!m.has_year_error());
        assert_eq!(m.year(), Some(1994));

        let m = parse(json!({"year": "nineteen"}));
        assert!(m.has_year_error());
        assert_eq!(m.year(), None);
        assert_eq!(m.year_error_message(), "Year is not a valid number: nineteen");

        let m = parse(json!({"year": "2010.5"}));
        assert_eq!(m.year(), None);
        assert_eq!(m.year_error_message(), "Year is not a valid number: 2010.5");
    }

    #[test]
    fn test_year_integer_branch() {
        let m = parse(json!({"year": 0}));
        assert!(m.has_year_error());
        assert_eq!(m.year(), Some(0));
        assert_eq!(m.year_error_message(), "Year is negative: 0");

        let m = parse(json!({"year": 5_000_000_000_i64}));
        assert!(m.has_year_error());
        assert_eq!(m.year(), None);
        assert!(m.year_error_message().starts_with("Error parsing year: "));
    }

    #[test]
    fn test_year_missing_and_unreadable() {
        let m = parse(json!({"title": "Solaris"}));
        assert!(m.has_year_error());
        assert_eq!(m.year(), None);
        assert_eq!(m.year_error_message(), "Year field is missing");

        let m = parse(json!({"year": null}));
        assert_eq!(m.year(), None);
        assert_eq!(
            m.year_error_message(),
            "Error parsing year: Value null at year of type null cannot be converted to int"
        );

        let m = parse(json!({"year": true}));
        assert!(m.year_error_message().contains("boolean"));
    }

    #[test]
    fn test_title_rules() {
        let m = parse(json!({"title": "  "}));
        assert!(m.has_title_error());
        assert_eq!(m.title(), Some("  "));

        let m = parse(json!({"title": null}));
        assert!(m.has_title_error());
        assert_eq!(m.title(), None);

        let m = parse(json!({"title": 1917}));
        assert!(!m.has_title_error());
        assert_eq!(m.title(), Some("1917"));
    }

    #[test]
    fn test_genre_rules() {
        let m = parse(json!({"title": "x"}));
        assert!(m.has_genre_error());
        assert_eq!(m.genre(), UNKNOWN_GENRE);

        let m = parse(json!({"genre": null}));
        assert!(m.has_genre_error());
        assert_eq!(m.genre(), UNKNOWN_GENRE);

        let m = parse(json!({"genre": ""}));
        assert!(!m.has_genre_error());
        assert_eq!(m.genre(), "");
    }

    #[test]
    fn test_poster_rules() {
        let m = parse(json!({"poster": " \t"}));
        assert!(m.has_poster_error());
        assert_eq!(m.poster(), None);

        let m = parse(json!({"poster": null}));
        assert!(m.has_poster_error());

        let m = parse(json!({"title": "x"}));
        assert!(m.has_poster_error());
    }

    #[test]
    fn test_all_four_defects_at_once() {
        let m = parse(json!({"title": "", "year": 12.5, "poster": ""}));
        assert_eq!(m.defects().count(), 4);
    }

    #[test]
    fn test_structural_skips() {
        assert_eq!(parse_entry(&json!({})), Err(EntryError::EmptyObject));
        assert_eq!(
            parse_entry(&json!("Heat")),
            Err(EntryError::NotAnObject { found: "string" })
        );
        assert_eq!(
            parse_entry(&json!(null)),
            Err(EntryError::NotAnObject { found: "null" })
        );
        assert!(parse_entry(&json!({"unrelated": 1})).is_ok());
    }
}
