use crate::ops::{self, Extraction};
use anyhow::Result;
use std::path::Path;

pub fn set<P: AsRef<Path>>(path: P, pages: &str) -> Result<()> {
    let extraction = ops::extract_set(&path, pages)?;
    report(&extraction);
    Ok(())
}

pub fn range<P: AsRef<Path>>(path: P, start: i64, end: i64) -> Result<()> {
    let extraction = ops::extract_range(&path, start, end)?;
    report(&extraction);
    Ok(())
}

pub fn page<P: AsRef<Path>>(path: P, page: i64) -> Result<()> {
    let extraction = ops::extract_single(&path, page)?;
    report(&extraction);
    Ok(())
}

pub(crate) fn report(extraction: &Extraction) {
    for selection in &extraction.skipped {
        eprintln!("warning: selection {} matched no pages, skipped", selection);
    }
    println!(
        "Extracted {} page(s) to {}",
        extraction.pages,
        extraction.output.display()
    );
}
