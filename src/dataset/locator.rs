//! Where a dataset lives.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// A local file or a remote http(s) resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum DatasetLocator {
    Path(PathBuf),
    Url(Url),
}

impl DatasetLocator {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => DatasetLocator::Url(url),
            _ => DatasetLocator::Path(PathBuf::from(s)),
        }
    }

    /// Gzip-compressed content, judged by a `.gz` suffix
    pub fn is_gzip(&self) -> bool {
        match self {
            DatasetLocator::Path(path) => path.extension().map_or(false, |e| e == "gz"),
            DatasetLocator::Url(url) => url.path().ends_with(".gz"),
        }
    }

    /// Anchor a relative path at `base`; URLs and absolute paths are unchanged.
    pub fn relative_to(self, base: &Path) -> Self {
        match self {
            DatasetLocator::Path(path) if path.is_relative() => {
                DatasetLocator::Path(base.join(path))
            }
            other => other,
        }
    }
}

impl From<String> for DatasetLocator {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for DatasetLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetLocator::Path(path) => write!(f, "{}", path.display()),
            DatasetLocator::Url(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert!(matches!(
            DatasetLocator::parse("https://example.com/addresses.csv?dl=1"),
            DatasetLocator::Url(_)
        ));
        assert_eq!(
            DatasetLocator::parse("data/schools.csv"),
            DatasetLocator::Path(PathBuf::from("data/schools.csv"))
        );
        // Windows drive letters parse as a URL scheme but are paths.
        assert!(matches!(
            DatasetLocator::parse("C:\\data\\schools.csv"),
            DatasetLocator::Path(_)
        ));
    }

    #[test]
    fn test_is_gzip() {
        assert!(DatasetLocator::parse("north.csv.gz").is_gzip());
        assert!(DatasetLocator::parse("https://example.com/north.csv.gz").is_gzip());
        assert!(!DatasetLocator::parse("north.csv").is_gzip());
    }

    #[test]
    fn test_relative_to() {
        let base = Path::new("/etc/radius");
        assert_eq!(
            DatasetLocator::parse("schools.csv").relative_to(base),
            DatasetLocator::Path(PathBuf::from("/etc/radius/schools.csv"))
        );
        assert_eq!(
            DatasetLocator::parse("/data/schools.csv").relative_to(base),
            DatasetLocator::Path(PathBuf::from("/data/schools.csv"))
        );
    }
}
