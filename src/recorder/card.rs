//! SD card identification from recording paths.

use crate::error::{Error, Result};
use std::path::Path;

/// Extract the card name from a recording path.
///
/// Surveys lay recordings out as `<...>/<card>/<recording>.WAV`, so the card
/// is the immediate parent directory. Paths with no parent component are
/// malformed: a bare filename cannot be attributed to a card.
pub fn card_from_path(file: &str) -> Result<String> {
    let path = Path::new(file);
    path.parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| Error::MalformedInput {
            path: path.to_path_buf(),
            message: "expected a '<card>/<recording>' path with a parent directory".to_string(),
        })
}
