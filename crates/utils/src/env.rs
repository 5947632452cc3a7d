//! Helpers for reading values out of the process environment.

use strip_ansi_escapes::strip;

/// Parses a port number, tolerating ANSI escape codes and surrounding
/// whitespace that some launchers leak into the environment.
pub fn parse_port(raw: &str) -> Option<u16> {
    let cleaned = String::from_utf8(strip(raw.as_bytes())).ok()?;
    cleaned.trim().parse::<u16>().ok()
}

/// Splits a comma separated list, dropping empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
