use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pdf::SourceDocument;

/// An in-progress, write-only output document.
///
/// Pages are copied in by [`append`](Self::append) in caller order. That
/// order is load-bearing: it defines both the page order of an extraction
/// and the concatenation order of a merge. The page tree is rebuilt at
/// finalize time rather than copied from any source.
pub struct AssembledDocument {
    doc: Document,
    page_ids: Vec<ObjectId>,
    used: HashSet<ObjectId>,
}

impl AssembledDocument {
    pub fn new() -> Self {
        AssembledDocument {
            doc: Document::with_version("1.5"),
            page_ids: Vec::new(),
            used: HashSet::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Copy the pages at `indices` (0-based, in exactly that order) out of
    /// `source` into this document. Sources are never mutated; repeatable
    /// across any number of sources.
    pub fn append(&mut self, source: &SourceDocument, indices: &[usize]) -> Result<()> {
        let unreadable = |source_err| Error::SourceUnreadable {
            path: source.path().to_path_buf(),
            source: source_err,
        };

        // Object closure of the requested pages: contents, resources,
        // annotations. Parent edges are cut; the tree is rebuilt, and
        // following them would drag in every page of the source.
        let mut needed: HashSet<ObjectId> = HashSet::new();
        for &index in indices {
            let page_id = source.page_id(index)?;
            collect_closure(source.raw(), page_id, &mut needed).map_err(unreadable)?;
        }

        let mut id_map: HashMap<ObjectId, ObjectId> = HashMap::with_capacity(needed.len());
        for &old_id in &needed {
            self.doc.max_id += 1;
            id_map.insert(old_id, (self.doc.max_id, 0));
        }

        for &old_id in &needed {
            let object = source.raw().get_object(old_id).map_err(unreadable)?.clone();
            self.doc
                .objects
                .insert(id_map[&old_id], remap_object(object, &id_map));
        }

        // Stale Parent refs from the source's numbering space must not leak
        // into the rebuilt tree; finalize re-parents every page.
        for &index in indices {
            let mapped = id_map[&source.page_id(index)?];
            if let Ok(page) = self.doc.get_dictionary_mut(mapped) {
                page.remove(b"Parent");
            }
        }

        // Register the pages in request order. A page requested more than
        // once gets its own page node (sharing contents and resources) so
        // the rebuilt tree stays a tree.
        for &index in indices {
            let mapped = id_map[&source.page_id(index)?];
            let page_id = if self.used.insert(mapped) {
                mapped
            } else {
                let duplicate = self
                    .doc
                    .objects
                    .get(&mapped)
                    .cloned()
                    .ok_or(Error::PageOutOfRange {
                        page: index + 1,
                        total: source.page_count(),
                    })?;
                self.doc.add_object(duplicate)
            };
            self.page_ids.push(page_id);
        }

        Ok(())
    }

    /// Serialize into a complete, standalone PDF.
    ///
    /// Works on a clone of the assembled state, so calling it again
    /// reproduces byte-identical output for the same state.
    pub fn finalize(&self) -> Result<Vec<u8>> {
        let mut doc = self.doc.clone();

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|id| Object::Reference(*id))
            .collect();
        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(self.page_ids.len() as i64));
        pages.set("Kids", Object::Array(kids));
        let pages_id = doc.add_object(pages);

        for &page_id in &self.page_ids {
            if let Ok(page) = doc.get_dictionary_mut(page_id) {
                page.set("Parent", Object::Reference(pages_id));
            }
        }

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);

        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Size", Object::Integer(doc.max_id as i64 + 1));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| Error::Serialize(e.into()))?;
        Ok(bytes)
    }

    /// Finalize and place the result at `path`, going through a scratch
    /// sibling so a failure never leaves a half-written output behind.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = self.finalize()?;
        write_atomic(path, &bytes)
    }
}

impl Default for AssembledDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `bytes` to a scratch sibling of `path` and rename it into place.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let scratch = scratch_path(path);
    fs::write(&scratch, bytes).map_err(write_err)?;
    if let Err(source) = fs::rename(&scratch, path) {
        let _ = fs::remove_file(&scratch);
        return Err(write_err(source));
    }
    Ok(())
}

fn scratch_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "output.pdf".into());
    name.push(".part");
    path.with_file_name(name)
}

fn collect_closure(
    doc: &Document,
    id: ObjectId,
    visited: &mut HashSet<ObjectId>,
) -> std::result::Result<(), lopdf::Error> {
    if !visited.insert(id) {
        return Ok(());
    }
    collect_from(doc, doc.get_object(id)?, visited)
}

fn collect_from(
    doc: &Document,
    object: &Object,
    visited: &mut HashSet<ObjectId>,
) -> std::result::Result<(), lopdf::Error> {
    match object {
        Object::Reference(id) => collect_closure(doc, *id, visited)?,
        Object::Array(items) => {
            for item in items {
                collect_from(doc, item, visited)?;
            }
        }
        Object::Dictionary(dict) => {
            for (key, value) in dict.iter() {
                if key.as_slice() != b"Parent" {
                    collect_from(doc, value, visited)?;
                }
            }
        }
        Object::Stream(stream) => {
            for (key, value) in stream.dict.iter() {
                if key.as_slice() != b"Parent" {
                    collect_from(doc, value, visited)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn remap_object(object: Object, map: &HashMap<ObjectId, ObjectId>) -> Object {
    match object {
        Object::Reference(id) => Object::Reference(*map.get(&id).unwrap_or(&id)),
        Object::Array(items) => {
            Object::Array(items.into_iter().map(|o| remap_object(o, map)).collect())
        }
        Object::Dictionary(dict) => Object::Dictionary(remap_dict(dict, map)),
        Object::Stream(mut stream) => {
            stream.dict = remap_dict(stream.dict, map);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dict(dict: Dictionary, map: &HashMap<ObjectId, ObjectId>) -> Dictionary {
    let mut out = Dictionary::new();
    for (key, value) in dict.iter() {
        out.set(key.clone(), remap_object(value.clone(), map));
    }
    out
}
