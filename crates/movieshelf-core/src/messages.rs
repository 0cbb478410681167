use std::fmt::Display;

/// User-facing texts, looked up by key. `{}` marks a positional argument.
const MESSAGES: &[(&str, &str)] = &[
    ("title_placeholder", "Untitled movie"),
    ("year_label", "Year: {}"),
    ("year_placeholder", "Year unknown"),
    ("year_error", "Invalid year"),
    ("year_error_format", "Invalid year ({})"),
    ("genre_label", "Genre: {}"),
    ("genre_error", "Genre unavailable"),
    ("movies_loaded", "Loaded {} movies"),
    ("movies_loaded_with_errors", "Loaded {} movies, {} data problems detected"),
    ("title_inferred_count", "{} movies are missing a title"),
    ("no_movies_available", "No movie data available"),
    ("error_file_not_found", "Movie data file not found"),
    ("error_loading_data", "Error loading movie data"),
];

/// Template for `key`, or the key itself when unknown.
pub fn lookup(key: &str) -> &str {
    MESSAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
        .unwrap_or(key)
}

/// Look up `key` and fill its `{}` slots in order. Missing arguments leave the
/// slot as is; extra arguments are ignored.
pub fn format(key: &str, args: &[&dyn Display]) -> String {
    let template = lookup(key);
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(&arg.to_string()),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
