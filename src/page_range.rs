use std::fmt;

use crate::error::{Error, Result};

/// A requested page or page range, 1-based and inclusive on both ends.
///
/// Direction is significant: `Selection { start: 5, end: 1 }` asks for pages
/// five down to one, in that order. A bare page `N` is represented as
/// `start == end == N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: i64,
    pub end: i64,
}

impl Selection {
    pub fn page(n: i64) -> Self {
        Selection { start: n, end: n }
    }

    pub fn range(start: i64, end: i64) -> Self {
        Selection { start, end }
    }

    /// Parse one comma-separated token: `N` or `N-M`.
    ///
    /// `M < N` is kept as given (reverse extraction), never reordered.
    fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        let malformed = || Error::MalformedRange(token.to_string());

        if let Some((start, end)) = token.split_once('-') {
            if end.contains('-') {
                return Err(malformed());
            }
            let start = parse_page_number(start).ok_or_else(malformed)?;
            let end = parse_page_number(end).ok_or_else(malformed)?;
            Ok(Selection { start, end })
        } else {
            let page = parse_page_number(token).ok_or_else(malformed)?;
            Ok(Selection::page(page))
        }
    }

    /// Resolve against a document's page count into 0-based page indices.
    ///
    /// The run is walked in the selection's direction; bounds are clamped to
    /// what the document actually has, so an overlong range is truncated
    /// rather than failed. A start past the last page, or a run whose clamped
    /// bounds cross, resolves to an empty sequence.
    pub fn resolve(&self, page_count: usize) -> Vec<usize> {
        let last = page_count as i64;
        if self.start > last {
            return Vec::new();
        }

        if self.start <= self.end {
            let lo = self.start.max(1);
            let hi = self.end.min(last);
            if hi < lo {
                return Vec::new();
            }
            (lo..=hi).map(|page| (page - 1) as usize).collect()
        } else {
            let lo = self.end.max(1);
            let hi = self.start;
            if hi < lo {
                return Vec::new();
            }
            (lo..=hi).rev().map(|page| (page - 1) as usize).collect()
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

fn parse_page_number(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a comma-separated expression like `1-5, 8, 11-13`.
///
/// Token order is preserved (it defines output and merge order), and so are
/// duplicate tokens: `1, 1, 3-5, 4, 1` is a legitimate request.
pub fn parse_ranges(expression: &str) -> Result<Vec<Selection>> {
    expression.split(',').map(Selection::parse).collect()
}
