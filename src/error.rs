use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds of the extraction/merge core.
///
/// Parsing and resolution failures happen before any write I/O; write
/// failures leave no partial output behind (outputs are placed atomically).
#[derive(Debug, Error)]
pub enum Error {
    /// A token of a page-range expression that is neither `N` nor `N-M`.
    #[error("malformed page range '{0}': expected a page number or start-end")]
    MalformedRange(String),

    #[error("cannot read {}: {}", .path.display(), .source)]
    SourceUnreadable {
        path: PathBuf,
        source: lopdf::Error,
    },

    #[error("cannot write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("page {page} is out of range (document has {total} page(s))")]
    PageOutOfRange { page: usize, total: usize },

    /// Every requested selection resolved to zero pages.
    #[error("no pages matched the requested selection in {}", .path.display())]
    NoPagesExtracted { path: PathBuf },

    #[error("nothing to merge: no input documents given")]
    NothingToMerge,

    #[error("failed to serialize assembled document: {0}")]
    Serialize(#[source] lopdf::Error),
}
