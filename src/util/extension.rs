//! Extension allow-lists for pack content.

use std::path::Path;

/// Predicate admitting only files whose extension is on a fixed list.
///
/// Matching is exact and case-sensitive: `model.JSON` is not a `json` file.
/// Files without an extension never pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionFilter {
    allowed: &'static [&'static str],
}

impl ExtensionFilter {
    /// Create a filter over the given extensions (without leading dot).
    #[must_use]
    pub const fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    /// Check whether `path` has one of the allowed extensions.
    #[must_use]
    pub fn is_allowed(&self, path: &Path) -> bool {
        file_extension(path).is_some_and(|ext| self.allowed.iter().any(|allowed| *allowed == ext))
    }
}

/// Get the part of the file name after its final `.`.
///
/// Unlike [`Path::extension`] this also reports `json` for a file named
/// `.json`. Names that are not valid UTF-8 have no extension.
#[must_use]
pub fn file_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILTER: ExtensionFilter = ExtensionFilter::new(&["mcfunction", "json", "mcmeta"]);

    #[test]
    fn test_allowed_extensions_pass() {
        assert!(FILTER.is_allowed(Path::new("data/ns/function/tick.mcfunction")));
        assert!(FILTER.is_allowed(Path::new("tags/load.json")));
        assert!(FILTER.is_allowed(Path::new("pack.mcmeta")));
    }

    #[test]
    fn test_other_extensions_are_rejected() {
        assert!(!FILTER.is_allowed(Path::new("notes.txt")));
        assert!(!FILTER.is_allowed(Path::new("archive.json.bak")));
        assert!(!FILTER.is_allowed(Path::new("README")));
        assert!(!FILTER.is_allowed(Path::new("trailing.")));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!FILTER.is_allowed(Path::new("loud.JSON")));
        assert!(!FILTER.is_allowed(Path::new("loud.McFunction")));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension(Path::new("LICENSE")), None);
        assert_eq!(file_extension(Path::new("README.md")), Some("md"));
        assert_eq!(file_extension(Path::new("dir.d/LICENSE")), None);
        assert_eq!(file_extension(Path::new("a.tar.gz")), Some("gz"));
        assert_eq!(file_extension(Path::new(".json")), Some("json"));
    }
}
