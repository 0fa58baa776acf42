// src/io/file.rs
//
// Plot file sources. The content is opaque HPGL and is forwarded verbatim.

use std::path::{Path, PathBuf};

/// Bytes loaded from a file source plus whatever metadata came with them
#[derive(Clone, Debug, Default)]
pub struct FileContents {
    pub bytes: Vec<u8>,
    /// Entity tag identifying this revision of the content, if known
    pub etag: Option<String>,
}

/// Something the user picked to plot
pub trait FileSource {
    /// Name used in logs and error messages
    fn describe(&self) -> String;

    /// Load the full content
    fn load_contents(&self) -> std::io::Result<FileContents>;
}

/// A plot file on the local filesystem
#[derive(Clone, Debug)]
pub struct PathFileSource {
    path: PathBuf,
}

impl PathFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSource for PathFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_contents(&self) -> std::io::Result<FileContents> {
        let bytes = std::fs::read(&self.path)?;
        // mtime + length stands in for an etag
        let etag = std::fs::metadata(&self.path)
            .ok()
            .and_then(|m| m.modified().ok().map(|t| (t, m.len())))
            .map(|(modified, len)| {
                let stamp: chrono::DateTime<chrono::Utc> = modified.into();
                format!("{}-{}", stamp.timestamp_millis(), len)
            });
        Ok(FileContents { bytes, etag })
    }
}
