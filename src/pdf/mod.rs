pub mod assemble;
pub mod document;

pub use assemble::AssembledDocument;
pub use document::SourceDocument;

#[cfg(test)]
pub(crate) mod testutil {
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

    /// Build a PDF where page `i` (1-based) carries the text `(Pg i)`, so
    /// tests can read page identity and order back out of an output file.
    pub fn sample_pdf(num_pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for i in 1..=num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                    ),
                    Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("Pg {}", i).into_bytes(),
                            lopdf::StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ]),
                ),
                ("Contents", Object::Reference(content_id)),
            ]);
            page_ids.push(doc.add_object(page));
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// Read back the `(Pg i)` tags of a serialized PDF, in page order.
    pub fn page_tags(bytes: &[u8]) -> Vec<u32> {
        let doc = Document::load_mem(bytes).unwrap();
        let mut pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(number, _)| *number);

        pages
            .into_iter()
            .map(|(_, page_id)| {
                let page = doc.get_dictionary(page_id).unwrap();
                let contents_id = match page.get(b"Contents").unwrap() {
                    Object::Reference(id) => *id,
                    other => panic!("unexpected Contents object: {:?}", other),
                };
                let stream = doc.get_object(contents_id).unwrap().as_stream().unwrap();
                let text = String::from_utf8_lossy(&stream.content).into_owned();
                let start = text.find("(Pg ").unwrap() + 4;
                let len = text[start..].find(')').unwrap();
                text[start..start + len].trim().parse().unwrap()
            })
            .collect()
    }
}
