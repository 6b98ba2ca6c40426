//! Parsers for values read out of the rendered feed.
//!
//! The feed renders counters for humans ("1.2K", "3,410") and exposes the
//! author only through a profile link. These helpers turn those strings into
//! typed values. They never fail loudly: anything unrecognized becomes `None`
//! or an empty string.

/// Parse a rendered engagement counter
///
/// Accepted forms:
/// - plain integers: `"42"`
/// - thousands separators: `"1,234"`, `"1 234"`
/// - compact suffixes: `"1.2K"`, `"3M"`, `"2,5k"`, `"1B"`
///
/// Returns `None` for empty or unrecognized text.
pub fn parse_count(raw: &str) -> Option<u64> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if compact.is_empty() {
        return None;
    }

    let last = compact.chars().last()?;
    let multiplier = match last.to_ascii_lowercase() {
        'k' => Some(1_000.0),
        'm' => Some(1_000_000.0),
        'b' => Some(1_000_000_000.0),
        _ => None,
    };

    match multiplier {
        Some(multiplier) => {
            // Suffixed counts use a decimal separator, which may be a comma
            let number = &compact[..compact.len() - last.len_utf8()];
            let value: f64 = number.replace(',', ".").parse().ok()?;
            if !value.is_finite() || value < 0.0 {
                return None;
            }
            Some((value * multiplier).round() as u64)
        }
        None => {
            let digits: String = compact.chars().filter(|c| *c != ',' && *c != '.').collect();
            digits.parse().ok()
        }
    }
}

/// Extract the author handle from a profile link
///
/// `"https://bsky.app/profile/afpfr.bsky.social"` becomes `"afpfr.bsky.social"`.
/// Query strings, fragments and trailing slashes are ignored.
pub fn handle_from_href(href: &str) -> String {
    let path = href.split(['?', '#']).next().unwrap_or("");
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
        .to_string()
}
