//! lopdf-backed page access.
//!
//! [`LopdfDocument`] opens a PDF with [`lopdf`] and hands out, per page, the
//! decoded content stream bytes and a [`LopdfResources`] collaborator built
//! from the page's (possibly inherited) `/Resources` dictionary.

use std::collections::HashSet;

use smol_str::SmolStr;

use crate::color_space::ColorSpace;
use crate::error::{ContentError, Result};
use crate::operand::{Dictionary, Operand};
use crate::resources::{ResourceDictionary, Resources};

/// Indirect references are followed at most this deep when converting
/// resources; anything below becomes `null`.
const MAX_RESOURCE_DEPTH: usize = 8;

/// A loaded PDF document.
#[derive(Debug)]
pub struct LopdfDocument {
    inner: lopdf::Document,
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Parse a PDF from memory.
    ///
    /// # Errors
    ///
    /// [`ContentError::Document`] if the bytes are not a PDF or the document
    /// is encrypted.
    pub fn load_mem(bytes: &[u8]) -> Result<Self> {
        let inner = lopdf::Document::load_mem(bytes)?;
        if inner.is_encrypted() {
            return Err(ContentError::Document(
                "encrypted documents are not supported".to_string(),
            ));
        }
        // get_pages is keyed by 1-based page number, already in order.
        let page_ids = inner.get_pages().into_values().collect();
        Ok(Self { inner, page_ids })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_id(&self, index: usize) -> Result<lopdf::ObjectId> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            ContentError::Document(format!(
                "page index {index} out of range (0..{})",
                self.page_ids.len()
            ))
        })
    }

    fn page_dict(&self, index: usize) -> Result<&lopdf::Dictionary> {
        Ok(self.inner.get_object(self.page_id(index)?)?.as_dict()?)
    }

    /// Decoded content stream bytes of page `index` (0-based). Multiple
    /// `/Contents` streams are joined with a single space.
    pub fn page_content(&self, index: usize) -> Result<Vec<u8>> {
        let page = self.page_dict(index)?;
        let Ok(contents) = page.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match self.resolve(contents) {
            lopdf::Object::Array(parts) => {
                let mut content = Vec::new();
                for part in parts {
                    let bytes = decode_stream(self.resolve(part).as_stream()?)?;
                    if !content.is_empty() {
                        content.push(b' ');
                    }
                    content.extend_from_slice(&bytes);
                }
                Ok(content)
            }
            other => decode_stream(other.as_stream()?),
        }
    }

    /// Resources of page `index` (0-based), inherited through `/Parent`
    /// when the page has none of its own.
    pub fn page_resources(&self, index: usize) -> Result<LopdfResources> {
        let page_id = self.page_id(index)?;
        let mut node = self.page_dict(index)?;
        let mut visited = HashSet::from([page_id]);
        let resources = loop {
            if let Ok(resources) = node.get(b"Resources") {
                break Some(resources);
            }
            match node.get(b"Parent") {
                Ok(parent) => {
                    if let lopdf::Object::Reference(id) = parent {
                        if !visited.insert(*id) {
                            return Err(ContentError::Document(format!(
                                "cyclic /Parent chain at object {} {}",
                                id.0, id.1
                            )));
                        }
                    }
                    node = self.resolve(parent).as_dict()?;
                }
                Err(_) => break None,
            }
        };

        let categories = match resources.map(|r| self.resolve(r)) {
            Some(lopdf::Object::Dictionary(dict)) => self.convert_dict(dict, 0),
            Some(_) => {
                return Err(ContentError::Document(
                    "/Resources is not a dictionary".to_string(),
                ));
            }
            None => Dictionary::new(),
        };
        Ok(LopdfResources {
            inner: ResourceDictionary::new(categories),
        })
    }

    fn resolve<'a>(&'a self, obj: &'a lopdf::Object) -> &'a lopdf::Object {
        match obj {
            lopdf::Object::Reference(id) => self.inner.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    fn convert_dict(&self, dict: &lopdf::Dictionary, depth: usize) -> Dictionary {
        dict.iter()
            .filter_map(|(key, value)| match std::str::from_utf8(key) {
                Ok(key) => Some((SmolStr::new(key), self.convert(value, depth + 1))),
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(key = ?key, "skipping resource entry with non-UTF-8 key");
                    None
                }
            })
            .collect()
    }

    /// Convert a lopdf object to an operand, following references. Streams
    /// become their dictionaries.
    fn convert(&self, obj: &lopdf::Object, depth: usize) -> Operand {
        if depth > MAX_RESOURCE_DEPTH {
            return Operand::Null;
        }
        match obj {
            lopdf::Object::Null => Operand::Null,
            lopdf::Object::Boolean(b) => Operand::Boolean(*b),
            lopdf::Object::Integer(i) => Operand::Integer(*i),
            lopdf::Object::Real(r) => Operand::Real(f64::from(*r)),
            lopdf::Object::Name(name) => match std::str::from_utf8(name) {
                Ok(name) => Operand::Name(SmolStr::new(name)),
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(name = ?name, "non-UTF-8 resource name read as null");
                    Operand::Null
                }
            },
            lopdf::Object::String(bytes, lopdf::StringFormat::Hexadecimal) => {
                Operand::HexString(bytes.clone())
            }
            lopdf::Object::String(bytes, _) => Operand::String(bytes.clone()),
            lopdf::Object::Array(items) => {
                Operand::Array(items.iter().map(|item| self.convert(item, depth + 1)).collect())
            }
            lopdf::Object::Dictionary(dict) => Operand::Dictionary(self.convert_dict(dict, depth)),
            lopdf::Object::Stream(stream) => Operand::Dictionary(self.convert_dict(&stream.dict, depth)),
            lopdf::Object::Reference(id) => match self.inner.get_object(*id) {
                Ok(target) => self.convert(target, depth + 1),
                Err(_) => Operand::Null,
            },
        }
    }
}

fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_ok() {
        Ok(stream.decompressed_content()?)
    } else {
        Ok(stream.content.clone())
    }
}

/// Page resources read from a lopdf document.
#[derive(Debug, Clone, PartialEq)]
pub struct LopdfResources {
    inner: ResourceDictionary,
}

impl LopdfResources {
    pub fn categories(&self) -> &Dictionary {
        self.inner.categories()
    }
}

impl Resources for LopdfResources {
    fn color_space(&self, name: &str) -> Result<ColorSpace> {
        self.inner.color_space(name)
    }

    fn ext_gstate(&self, name: &str) -> Result<Dictionary> {
        self.inner.ext_gstate(name)
    }
}

/// Build a single-page PDF whose page has `content` and `resources`.
#[cfg(test)]
pub(crate) fn create_test_pdf(content: &[u8], resources: lopdf::Dictionary) -> Vec<u8> {
    use lopdf::{Document, Object, ObjectId, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => resources,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}
