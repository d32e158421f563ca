//! Resolved badge model.

use std::path::{Path, PathBuf};

/// A badge that has been resolved to a cached SVG on disk.
///
/// Produced by the resolver once the payload is cached and measured;
/// consumed by the registrar (which needs `path` and `basename`) and the
/// markup renderer (which needs everything else).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shield {
    /// Intrinsic width in pixels, 0 when the payload declares none.
    pub width: u32,
    /// Intrinsic height in pixels, 0 when the payload declares none.
    pub height: u32,
    /// Absolute path of the cached SVG file.
    pub path: PathBuf,
    /// File name component of `path` (`<md5-hex>.svg`).
    pub basename: String,
    /// Link target copied from the request.
    pub href: Option<String>,
    /// Alt text copied from the request.
    pub alt: Option<String>,
    /// CSS class copied from the request.
    pub class: Option<String>,
}

impl Shield {
    /// Build a shield, deriving `basename` from the cache path.
    #[must_use]
    pub fn new(
        width: u32,
        height: u32,
        path: PathBuf,
        href: Option<String>,
        alt: Option<String>,
        class: Option<String>,
    ) -> Self {
        let basename = basename_of(&path);
        Self {
            width,
            height,
            path,
            basename,
            href,
            alt,
            class,
        }
    }
}

fn basename_of(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}
