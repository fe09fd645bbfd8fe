//! Video ID extraction from downloaded file names.

use std::sync::LazyLock;

use regex::Regex;

/// Trailing digits after the last `_` or `-` of a stem.
static TRAILING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_-](\d+)$").unwrap());

/// Digits at the very end of a stem.
static BARE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)$").unwrap());

/// Pull the numeric video ID out of a file name such as `creator_7301234.mp4`.
///
/// Only `.mp4` files (any case) carry an ID. The stem's trailing
/// `_<digits>` / `-<digits>` is preferred; otherwise the digits directly
/// before the extension are used. Returns `None` when neither form is
/// present.
pub fn extract_video_id(file_name: &str) -> Option<String> {
    let split = file_name.len().checked_sub(".mp4".len())?;
    let (stem, extension) = (file_name.get(..split)?, file_name.get(split..)?);
    if !extension.eq_ignore_ascii_case(".mp4") {
        return None;
    }

    TRAILING_ID
        .captures(stem)
        .or_else(|| BARE_ID.captures(stem))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
