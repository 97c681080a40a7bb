//! File name and URL helpers.

use std::fmt;

use serde::Serialize;

use crate::config::{AUDIO_EXTENSIONS, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};

/// Broad media category of a file, judged by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Img,
    Video,
    Audio,
    Unknown,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Img => write!(f, "img"),
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Text after the last `.`; the whole name when there is none.
pub fn get_extension(filename: &str) -> &str {
    filename.rsplit('.').next().unwrap_or(filename)
}

/// Name without its last `.`-suffix; empty when there is no `.`.
pub fn remove_extension(filename: &str) -> &str {
    filename.rsplit_once('.').map_or("", |(stem, _)| stem)
}

/// Last `sep`-separated segment of a URL or path.
pub fn url_get_last<'a>(url: &'a str, sep: &str) -> &'a str {
    url.rsplit(sep).next().unwrap_or(url)
}

/// Whether the extension of `filename` is one of `types`.
///
/// Types may be bare (`png`) or globs (`*.png`); the file's extension is
/// compared case-insensitively.
pub fn is_file_type<S: AsRef<str>>(filename: &str, types: &[S]) -> bool {
    let ext = get_extension(filename).to_lowercase();
    types.iter().any(|t| {
        let t = t.as_ref();
        let t = t.split_once("*.").map_or(t, |(_, rest)| rest);
        ext == t
    })
}

/// Media category of the resource a URL points at.
pub fn get_media_type(url: &str) -> MediaType {
    let file = url_get_last(url, "/");
    if is_file_type(file, IMAGE_EXTENSIONS) {
        MediaType::Img
    } else if is_file_type(file, VIDEO_EXTENSIONS) {
        MediaType::Video
    } else if is_file_type(file, AUDIO_EXTENSIONS) {
        MediaType::Audio
    } else {
        MediaType::Unknown
    }
}
