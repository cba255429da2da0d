//! Output path derivation.
//!
//! The two output names derive deterministically from the input file name:
//! the name is truncated at the *first* dot, then suffixed. A multi-dot
//! input like `foo.bar.exr` therefore produces `foo_ld.jpg` and
//! `foo_cdm.png`, not `foo.bar_ld.jpg`.

use std::path::{Path, PathBuf};

/// Suffix appended to the LDR half of the pair.
const LDR_SUFFIX: &str = "_ld.jpg";

/// Suffix appended to the CDM half of the pair.
const CDM_SUFFIX: &str = "_cdm.png";

/// The derived output locations for one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Path of the viewable LDR JPEG.
    pub ldr: PathBuf,
    /// Path of the lossless CDM PNG.
    pub cdm: PathBuf,
}

impl OutputPaths {
    /// Derives the output paths for an input file.
    ///
    /// The parent directory is preserved; only the file name component is
    /// truncated and suffixed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webhdr_io::OutputPaths;
    /// use std::path::Path;
    ///
    /// let paths = OutputPaths::for_input(Path::new("renders/foo.bar.exr"));
    /// assert_eq!(paths.ldr, Path::new("renders/foo_ld.jpg"));
    /// assert_eq!(paths.cdm, Path::new("renders/foo_cdm.png"));
    /// ```
    pub fn for_input(input: &Path) -> Self {
        let name = input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let base = match name.find('.') {
            Some(idx) => &name[..idx],
            None => name,
        };

        let parent = input.parent().unwrap_or_else(|| Path::new(""));
        Self {
            ldr: parent.join(format!("{base}{LDR_SUFFIX}")),
            cdm: parent.join(format!("{base}{CDM_SUFFIX}")),
        }
    }
}
