use std::path::{Path, PathBuf};

/// Tag appended to every file this tool writes.
pub const NAME_TAG: &str = " [outpdf].pdf";

/// Human-readable page marker for a resolved run, or `None` for an empty run.
///
/// The marker reports the post-clamp actual bounds as an ascending 1-based
/// range, so a reversed run over pages 18..16 is marked `16-18`; a run
/// covering a single page collapses to that page number.
pub fn marker(indices: &[usize]) -> Option<String> {
    let (&first, &last) = (indices.first()?, indices.last()?);
    let (lo, hi) = if first <= last {
        (first, last)
    } else {
        (last, first)
    };
    if lo == hi {
        Some(format!("{}", lo + 1))
    } else {
        Some(format!("{}-{}", lo + 1, hi + 1))
    }
}

/// Output path for an extraction: `<base>_<markers, comma-joined> [outpdf].pdf`
/// next to the input. The marker list keeps selection order, duplicates
/// included, so the name is an audit trail of what was requested.
pub fn extraction_name(input: &Path, markers: &[String]) -> PathBuf {
    let base = base_name(input);
    input.with_file_name(format!("{}_{}{}", base, markers.join(","), NAME_TAG))
}

/// Output path for a merge: the caller-supplied name with the tag appended.
pub fn merge_name(output: &Path) -> PathBuf {
    let base = base_name(output);
    output.with_file_name(format!("{}{}", base, NAME_TAG))
}

/// A merge output given as a bare file name lands next to the inputs when
/// they all share a parent directory; otherwise it is taken as given.
pub fn resolve_merge_output(inputs: &[PathBuf], output: &Path) -> PathBuf {
    let is_bare = output
        .parent()
        .map(|p| p.as_os_str().is_empty())
        .unwrap_or(true);
    if is_bare {
        if let Some(parent) = inputs.first().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty()
                && inputs.iter().all(|p| p.parent() == Some(parent))
            {
                return parent.join(output);
            }
        }
    }
    output.to_path_buf()
}

fn base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".pdf") {
        Some(base) => base.to_string(),
        None => name,
    }
}
