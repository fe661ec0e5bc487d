//! Where codex documents come from

use crate::{document::Document, error::Error};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Marker that starts every law in a codex file
pub const LAW_MARKER: &str = "LAW ";

/// Anything able to produce the document set to commit to
pub trait DocumentSource {
    fn load_documents(&self) -> Result<Vec<Document>, Error>;
}

/// A codex text file holding one law per `LAW ` marker
#[derive(Debug, Clone)]
pub struct CodexFile {
    path: PathBuf,
}

impl CodexFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the codex, also used to name it in errors
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for CodexFile {
    fn load_documents(&self) -> Result<Vec<Document>, Error> {
        let source_ref = self.path().display().to_string();
        let bytes = std::fs::read(self.path()).map_err(|e| Error::SourceUnavailable {
            source_ref: source_ref.clone(),
            reason: e.to_string(),
        })?;
        let content = Document::from_utf8(bytes, &source_ref)?;
        let laws = split_laws(content.text());
        debug!(source = %source_ref, laws = laws.len(), "loaded codex");
        Ok(laws)
    }
}

/// Split codex text into laws.
///
/// Text before the first marker is dropped, the marker itself is not part of
/// the law, and each law is trimmed. Blank laws are skipped.
pub fn split_laws(content: &str) -> Vec<Document> {
    content
        .split(LAW_MARKER)
        .skip(1)
        .map(str::trim)
        .filter(|law| !law.is_empty())
        .map(Document::from)
        .collect()
}

/// Documents held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticDocuments(pub Vec<Document>);

impl DocumentSource for StaticDocuments {
    fn load_documents(&self) -> Result<Vec<Document>, Error> {
        Ok(self.0.clone())
    }
}
