//! The extraction and merge operations behind every front end.
//!
//! These compose the range parser, page selector, assembler and namer; they
//! write output files as a side effect and do no console output of their own.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::naming;
use crate::page_range::{self, Selection};
use crate::pdf::{AssembledDocument, SourceDocument};

/// Outcome of an extraction: where the result went, how many pages it has,
/// and which selections were skipped because they resolved to zero pages.
/// Skipped selections are not errors, but the boundary is expected to voice
/// them; they are never silently dropped.
#[derive(Debug)]
pub struct Extraction {
    pub output: PathBuf,
    pub pages: usize,
    pub skipped: Vec<Selection>,
}

/// Extract one page into a sibling file named after it.
pub fn extract_single<P: AsRef<Path>>(path: P, page: i64) -> Result<Extraction> {
    extract_range(path, page, page)
}

/// Extract one range, walked in the direction given (`end < start` extracts
/// in reverse order).
pub fn extract_range<P: AsRef<Path>>(path: P, start: i64, end: i64) -> Result<Extraction> {
    let path = path.as_ref();
    let source = SourceDocument::open(path)?;

    let indices = Selection::range(start, end).resolve(source.page_count());
    let Some(marker) = naming::marker(&indices) else {
        return Err(Error::NoPagesExtracted {
            path: path.to_path_buf(),
        });
    };

    let mut out = AssembledDocument::new();
    out.append(&source, &indices)?;
    drop(source);

    let output = naming::extraction_name(path, &[marker]);
    out.write_to(&output)?;

    Ok(Extraction {
        output,
        pages: indices.len(),
        skipped: Vec::new(),
    })
}

/// Extract a multi-selection set like `1-5, 8, 18-16`.
///
/// Each selection becomes one intermediate document in a per-run scratch
/// directory; the intermediates are then merged in selection order. A
/// request that parsed to a single selection finalizes directly instead.
pub fn extract_set<P: AsRef<Path>>(path: P, expression: &str) -> Result<Extraction> {
    let path = path.as_ref();
    // parse before any I/O
    let selections = page_range::parse_ranges(expression)?;

    let source = SourceDocument::open(path)?;

    let mut resolved: Vec<(String, Vec<usize>)> = Vec::new();
    let mut skipped = Vec::new();
    for selection in selections {
        let indices = selection.resolve(source.page_count());
        match naming::marker(&indices) {
            Some(marker) => resolved.push((marker, indices)),
            None => skipped.push(selection),
        }
    }

    if resolved.is_empty() {
        return Err(Error::NoPagesExtracted {
            path: path.to_path_buf(),
        });
    }

    if resolved.len() == 1 && skipped.is_empty() {
        let (marker, indices) = &resolved[0];
        let mut out = AssembledDocument::new();
        out.append(&source, indices)?;
        drop(source);

        let output = naming::extraction_name(path, std::slice::from_ref(marker));
        out.write_to(&output)?;
        return Ok(Extraction {
            output,
            pages: indices.len(),
            skipped,
        });
    }

    // Removed on every exit path by its Drop impl.
    let scratch = ScratchDir::create()?;

    let mut parts: Vec<PathBuf> = Vec::new();
    for (ordinal, (marker, indices)) in resolved.iter().enumerate() {
        let mut part = AssembledDocument::new();
        part.append(&source, indices)?;

        let part_path = scratch
            .path()
            .join(format!("{:03}_{}.pdf", ordinal, marker));
        part.write_to(&part_path)?;
        parts.push(part_path);
    }
    drop(source);

    let mut merged = AssembledDocument::new();
    for part_path in &parts {
        let part = SourceDocument::open(part_path)?;
        let all: Vec<usize> = (0..part.page_count()).collect();
        merged.append(&part, &all)?;
    }

    let markers: Vec<String> = resolved.into_iter().map(|(marker, _)| marker).collect();
    let output = naming::extraction_name(path, &markers);
    let pages = merged.page_count();
    merged.write_to(&output)?;

    Ok(Extraction {
        output,
        pages,
        skipped,
    })
}

/// Concatenate `inputs` in order into one document named `output` (plus the
/// name tag). Listing the same file more than once is legal and duplicates
/// its pages.
pub fn merge_documents<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<PathBuf> {
    if inputs.is_empty() {
        return Err(Error::NothingToMerge);
    }
    let inputs: Vec<PathBuf> = inputs.iter().map(|p| p.as_ref().to_path_buf()).collect();

    let output = naming::merge_name(&naming::resolve_merge_output(&inputs, output));

    let mut merged = AssembledDocument::new();
    for input in &inputs {
        let source = SourceDocument::open(input)?;
        let all: Vec<usize> = (0..source.page_count()).collect();
        merged.append(&source, &all)?;
    }

    merged.write_to(&output)?;
    Ok(output)
}

/// Per-run scratch directory for multi-selection intermediates, removed on
/// drop whether the run succeeded or failed.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn create() -> Result<Self> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("outpdf-{}-{}", std::process::id(), nanos));
        fs::create_dir_all(&dir).map_err(|source| Error::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(ScratchDir(dir))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testutil::{page_tags, sample_pdf};
    use tempfile::TempDir;

    fn write_sample(dir: &TempDir, name: &str, num_pages: u32) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, sample_pdf(num_pages)).unwrap();
        path
    }

    #[test]
    fn test_extract_single_page() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(&dir, "doc.pdf", 20);

        let extraction = extract_single(&input, 8).unwrap();

        assert_eq!(extraction.output, dir.path().join("doc_8 [outpdf].pdf"));
        assert_eq!(extraction.pages, 1);
        assert!(extraction.skipped.is_empty());
        assert_eq!(page_tags(&fs::read(&extraction.output).unwrap()), vec![8]);
    }

    #[test]
    fn test_extract_single_past_last_page() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(&dir, "doc.pdf", 20);

        let err = extract_single(&input, 25).unwrap_err();
        assert!(matches!(err, Error::NoPagesExtracted { .. }));
        // nothing written
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_extract_range_reversed() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(&dir, "doc.pdf", 20);

        let extraction = extract_range(&input, 18, 16).unwrap();

        assert_eq!(extraction.output, dir.path().join("doc_16-18 [outpdf].pdf"));
        assert_eq!(
            page_tags(&fs::read(&extraction.output).unwrap()),
            vec![18, 17, 16]
        );
    }

    #[test]
    fn test_extract_range_clamps_to_document() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(&dir, "doc.pdf", 20);

        let extraction = extract_range(&input, 18, 99).unwrap();

        assert_eq!(extraction.output, dir.path().join("doc_18-20 [outpdf].pdf"));
        assert_eq!(
            page_tags(&fs::read(&extraction.output).unwrap()),
            vec![18, 19, 20]
        );
    }

    #[test]
    fn test_extract_set_with_reverse_and_merge() {
        // spec scenario: 20 pages, "1-5, 8, 18-16" -> pages 1,2,3,4,5,8,18,17,16
        let dir = TempDir::new().unwrap();
        let input = write_sample(&dir, "doc.pdf", 20);

        let extraction = extract_set(&input, "1-5, 8, 18-16").unwrap();

        assert_eq!(
            extraction.output,
            dir.path().join("doc_1-5,8,16-18 [outpdf].pdf")
        );
        assert_eq!(extraction.pages, 9);
        assert!(extraction.skipped.is_empty());
        assert_eq!(
            page_tags(&fs::read(&extraction.output).unwrap()),
            vec![1, 2, 3, 4, 5, 8, 18, 17, 16]
        );
    }

    #[test]
    fn test_extract_set_duplicates() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(&dir, "doc.pdf", 5);

        let extraction = extract_set(&input, "1, 1, 3-5, 4, 1").unwrap();

        assert_eq!(
            extraction.output,
            dir.path().join("doc_1,1,3-5,4,1 [outpdf].pdf")
        );
        assert_eq!(
            page_tags(&fs::read(&extraction.output).unwrap()),
            vec![1, 1, 3, 4, 5, 4, 1]
        );
    }

    #[test]
    fn test_extract_set_skips_empty_selections() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(&dir, "doc.pdf", 10);

        let extraction = extract_set(&input, "2-4, 25, 9").unwrap();

        assert_eq!(extraction.skipped, vec![Selection::page(25)]);
        assert_eq!(
            extraction.output,
            dir.path().join("doc_2-4,9 [outpdf].pdf")
        );
        assert_eq!(
            page_tags(&fs::read(&extraction.output).unwrap()),
            vec![2, 3, 4, 9]
        );
    }

    #[test]
    fn test_extract_set_all_selections_empty() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(&dir, "doc.pdf", 10);

        let err = extract_set(&input, "25, 30-40").unwrap_err();
        assert!(matches!(err, Error::NoPagesExtracted { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_extract_set_malformed_expression_before_io() {
        let dir = TempDir::new().unwrap();
        // source deliberately missing: the parse must fail first
        let input = dir.path().join("missing.pdf");

        let err = extract_set(&input, "1-2-3").unwrap_err();
        assert!(matches!(err, Error::MalformedRange(_)));
    }

    #[test]
    fn test_extract_set_single_selection_short_circuits() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(&dir, "doc.pdf", 10);

        let extraction = extract_set(&input, "4-6").unwrap();

        assert_eq!(extraction.output, dir.path().join("doc_4-6 [outpdf].pdf"));
        assert_eq!(
            page_tags(&fs::read(&extraction.output).unwrap()),
            vec![4, 5, 6]
        );
    }

    #[test]
    fn test_extract_unreadable_source() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("missing.pdf");

        let err = extract_single(&input, 1).unwrap_err();
        assert!(matches!(err, Error::SourceUnreadable { .. }));
    }

    #[test]
    fn test_merge_documents_order() {
        let dir = TempDir::new().unwrap();
        let a = write_sample(&dir, "a.pdf", 2);
        let b = write_sample(&dir, "b.pdf", 3);

        let output = merge_documents(&[&a, &b], &dir.path().join("combined.pdf")).unwrap();

        assert_eq!(output, dir.path().join("combined [outpdf].pdf"));
        assert_eq!(
            page_tags(&fs::read(&output).unwrap()),
            vec![1, 2, 1, 2, 3]
        );
    }

    #[test]
    fn test_merge_documents_self_merge() {
        let dir = TempDir::new().unwrap();
        let a = write_sample(&dir, "a.pdf", 2);

        let output = merge_documents(&[&a, &a], &dir.path().join("twice.pdf")).unwrap();

        assert_eq!(page_tags(&fs::read(&output).unwrap()), vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_merge_documents_bare_output_lands_with_inputs() {
        let dir = TempDir::new().unwrap();
        let a = write_sample(&dir, "a.pdf", 1);
        let b = write_sample(&dir, "b.pdf", 1);

        let output = merge_documents(&[&a, &b], Path::new("combined.pdf")).unwrap();

        assert_eq!(output, dir.path().join("combined [outpdf].pdf"));
        assert!(output.exists());
    }

    #[test]
    fn test_merge_documents_no_inputs() {
        let err =
            merge_documents::<&Path>(&[], Path::new("out.pdf")).unwrap_err();
        assert!(matches!(err, Error::NothingToMerge));
    }
}
