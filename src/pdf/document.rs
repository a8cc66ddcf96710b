use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A read-only handle over an opened source PDF's page collection.
///
/// Owned by the operation that opened it and dropped once all needed pages
/// have been copied out; never shared across operations.
pub struct SourceDocument {
    doc: Document,
    pages: Vec<ObjectId>,
    path: PathBuf,
}

impl SourceDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = Document::load(&path).map_err(|source| Error::SourceUnreadable {
            path: path.clone(),
            source,
        })?;

        let mut numbered: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
        numbered.sort_by_key(|(number, _)| *number);
        let pages = numbered.into_iter().map(|(_, id)| id).collect();

        Ok(SourceDocument { doc, pages, path })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Page object id for a 0-based index.
    pub(crate) fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.pages.get(index).copied().ok_or(Error::PageOutOfRange {
            page: index + 1,
            total: self.pages.len(),
        })
    }

    pub(crate) fn raw(&self) -> &Document {
        &self.doc
    }
}
