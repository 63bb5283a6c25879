use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::models::Transcript;

/// Message returned when no transcript text was supplied
pub const EMPTY_TRANSCRIPT_MESSAGE: &str =
    "No transcript provided (paste text or upload a .txt file).";

/// Read a transcript file as UTF-8, falling back to Latin-1
pub fn read_transcript_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(decode_text(bytes).trim().to_string())
}

/// Decode bytes as UTF-8, or as Latin-1 when they are not valid UTF-8
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// Parse a user-entered duration in seconds.
///
/// Blank, unparsable, non-finite and non-positive values mean "no duration".
pub fn parse_duration(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Build a transcript from either a file or inline text plus an optional raw
/// duration, rejecting empty input
pub fn load_transcript(
    input: Option<&Path>,
    text: Option<&str>,
    duration: Option<&str>,
) -> Result<Transcript> {
    let text = match (input, text) {
        (Some(path), _) => read_transcript_file(path)?,
        (None, Some(text)) => text.trim().to_string(),
        (None, None) => String::new(),
    };

    if text.is_empty() {
        bail!(EMPTY_TRANSCRIPT_MESSAGE);
    }

    Ok(Transcript::new(text, duration.and_then(parse_duration)))
}
