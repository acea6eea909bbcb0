//! Input File Classification
//!
//! Uploaded files arrive with arbitrary names; classify them by name first and
//! fall back to peeking at the first record of `.obl` files.

use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Records with more fields than this on the first line are vertical profiles
const HORIZONTAL_MAX_FIELDS: usize = 5;

/// Role of an input file in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Horizontal resistivity profile (roH)
    HorizontalProfile,
    /// Vertical resistivity profile (roV)
    VerticalProfile,
    /// Requested output depths (z)
    Depth,
    /// Not recognised
    Unknown,
}

impl InputKind {
    /// Classify a file by name, then by content for `.obl` files
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let kind = if name.contains("roh") {
            InputKind::HorizontalProfile
        } else if name.contains("rov") {
            InputKind::VerticalProfile
        } else if name.contains('z') || name.ends_with(".ini") {
            InputKind::Depth
        } else if name.ends_with(".obl") {
            Self::detect_by_content(path)
        } else {
            InputKind::Unknown
        };

        debug!("Classified {} as {}", path.display(), kind.as_str());
        kind
    }

    fn detect_by_content(path: &Path) -> Self {
        let Ok(file) = std::fs::File::open(path) else {
            return InputKind::Unknown;
        };
        let mut first_line = String::new();
        if BufReader::new(file).read_line(&mut first_line).is_err() {
            return InputKind::Unknown;
        }

        if first_line.split_whitespace().count() > HORIZONTAL_MAX_FIELDS {
            InputKind::VerticalProfile
        } else {
            InputKind::HorizontalProfile
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::HorizontalProfile => "roh",
            InputKind::VerticalProfile => "rov",
            InputKind::Depth => "z",
            InputKind::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_by_name() {
        assert_eq!(InputKind::detect(Path::new("well_roH.obl")), InputKind::HorizontalProfile);
        assert_eq!(InputKind::detect(Path::new("ROV.obl")), InputKind::VerticalProfile);
        assert_eq!(InputKind::detect(Path::new("z.ini")), InputKind::Depth);
        assert_eq!(InputKind::detect(Path::new("depths.ini")), InputKind::Depth);
        assert_eq!(InputKind::detect(Path::new("notes.txt")), InputKind::Unknown);
    }

    #[test]
    fn test_detect_by_content() {
        let dir = tempfile::tempdir().unwrap();

        let wide = dir.path().join("well1.obl");
        let mut f = std::fs::File::create(&wide).unwrap();
        writeln!(f, "0 10 1 2 3 4 5").unwrap();
        assert_eq!(InputKind::detect(&wide), InputKind::VerticalProfile);

        let narrow = dir.path().join("well2.obl");
        let mut f = std::fs::File::create(&narrow).unwrap();
        writeln!(f, "0 10 1 2").unwrap();
        assert_eq!(InputKind::detect(&narrow), InputKind::HorizontalProfile);
    }

    #[test]
    fn test_unreadable_obl() {
        assert_eq!(InputKind::detect(Path::new("/nonexistent/well.obl")), InputKind::Unknown);
    }
}
