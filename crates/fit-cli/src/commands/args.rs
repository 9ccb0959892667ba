//! Marker-style argument extraction for the slash-command surface,
//! e.g. `n/Leg Day d/22/10/25 t/0900`.

use anyhow::{Result, anyhow, bail};
use chrono::{NaiveDate, NaiveTime};

/// Marker characters used across the command surface. A marker only counts
/// at the start of the string or after whitespace, so slashes inside values
/// (dates, names) don't split them.
const MARKERS: &[char] = &['n', 'd', 't', 'r', 'w', 'm', 'k', 'g', 'i'];

/// Extract the value following `<marker>/`, up to the next marker.
#[must_use]
pub fn value(args: &str, marker: char) -> Option<&str> {
    let start = marker_position(args, marker)? + 2;
    let rest = &args[start..];
    let end = MARKERS
        .iter()
        .filter_map(|m| marker_position(rest, *m))
        .min()
        .unwrap_or(rest.len());
    let value = rest[..end].trim();
    (!value.is_empty()).then_some(value)
}

fn marker_position(args: &str, marker: char) -> Option<usize> {
    let bytes = args.as_bytes();
    args.char_indices().find_map(|(index, c)| {
        (c == marker
            && bytes.get(index + 1) == Some(&b'/')
            && (index == 0 || args[..index].ends_with(char::is_whitespace)))
        .then_some(index)
    })
}

/// # Errors
///
/// Usage error for anything that is not a `dd/MM/yy` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%d/%m/%y")
        .map_err(|_| anyhow!("Invalid date format. Use dd/MM/yy (e.g. 22/10/25)"))
}

/// # Errors
///
/// Usage error for anything that is not an `HHmm` time.
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H%M")
        .map_err(|_| anyhow!("Invalid time format. Use HHmm (e.g. 0830)"))
}

/// # Errors
///
/// Usage error unless the input is a positive integer.
pub fn parse_reps(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(reps) if reps > 0 => Ok(reps),
        _ => bail!("Reps must be a positive integer"),
    }
}

/// # Errors
///
/// Usage error unless the input is a positive integer.
pub fn parse_display_id(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(id) if id > 0 => Ok(id),
        _ => bail!("Workout number must be a positive integer"),
    }
}

/// # Errors
///
/// Usage error unless the input is a number.
pub fn parse_weight(raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| anyhow!("Invalid weight. Please enter a number"))
}
