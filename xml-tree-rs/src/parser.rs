use crate::error::{XmlTreeError, XmlTreeResult};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use itertools::Itertools;
use lazy_static::lazy_static;
use log::debug;
use regex::bytes::Regex;
use roxmltree::{Document, Node, NodeId, ParsingOptions};
use std::{borrow::Cow, collections::HashMap, fs::read, path::Path};

lazy_static! {
    static ref DECLARED_ENCODING: Regex =
        Regex::new(r#"^\s*<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z0-9._:\-]+)["']"#).unwrap();
}

/// The element hierarchy of an XML document, flattened into node identifiers and
/// (parent, child) edges.
///
/// Elements are numbered in document order, the root being `0`. A node identifier
/// reads `"<index>: <tag>"`, so repeated tag names stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlTree {
    node_names: Vec<String>,
    edge_names: Vec<(String, String)>,
}

impl XmlTree {
    /// Read and parse the XML file at `xml_file`.
    pub fn build<P: AsRef<Path>>(xml_file: P) -> XmlTreeResult<Self> {
        let bytes = read(xml_file)?;
        Self::parse_bytes(&bytes)
    }

    /// Parse raw document bytes, decoded according to their byte order mark or their
    /// `encoding` declaration. UTF-8 is assumed when neither is present.
    pub fn parse_bytes(bytes: &[u8]) -> XmlTreeResult<Self> {
        let xml = decode(bytes)?;
        Self::parse(&xml)
    }

    /// Parse an XML document held in memory.
    pub fn parse(xml: &str) -> XmlTreeResult<Self> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(xml, options)?;

        // `descendants` walks in document order and includes the root element itself
        let elements: Vec<Node> = doc.root_element().descendants().filter(Node::is_element).collect();
        let order: HashMap<NodeId, usize> = elements
            .iter()
            .enumerate()
            .map(|(idx, element)| (element.id(), idx))
            .collect();

        let node_names: Vec<String> = elements
            .iter()
            .enumerate()
            .map(|(idx, element)| format!("{}: {}", idx, tag_name(element)))
            .collect();

        let edge_names = elements
            .iter()
            .flat_map(|parent| {
                parent
                    .children()
                    .filter(Node::is_element)
                    .map(move |child| (parent.id(), child.id()))
            })
            .filter_map(|(parent, child)| Some((order.get(&parent)?, order.get(&child)?)))
            .map(|(&parent, &child)| (node_names[parent].clone(), node_names[child].clone()))
            .collect_vec();

        debug!(
            "extracted {} elements and {} edges from XML document",
            node_names.len(),
            edge_names.len()
        );

        Ok(XmlTree { node_names, edge_names })
    }

    pub fn node_names(&self) -> &[String] {
        &self.node_names
    }

    pub fn edge_names(&self) -> &[(String, String)] {
        &self.edge_names
    }

    /// Identifier of the document's root element, always `"0: <tag>"`.
    pub fn root_name(&self) -> Option<&str> {
        self.node_names.first().map(String::as_str)
    }
}

/// Namespaced tags are reported in Clark notation, `{uri}local`.
fn tag_name(element: &Node) -> String {
    let tag = element.tag_name();
    // `xmlns=""` undeclares the default namespace
    match tag.namespace().filter(|namespace| !namespace.is_empty()) {
        Some(namespace) => format!("{{{}}}{}", namespace, tag.name()),
        None => tag.name().to_string(),
    }
}

fn decode(bytes: &[u8]) -> XmlTreeResult<Cow<str>> {
    let encoding = match Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None => sniff_encoding(bytes)?,
    };
    debug!("decoding XML document as {}", encoding.name());

    // a byte order mark is stripped here
    let (xml, used, malformed) = encoding.decode(bytes);
    if malformed {
        return Err(XmlTreeError::Encoding(format!("document is not valid {}", used.name())));
    }
    Ok(xml)
}

/// Encoding of a document without a byte order mark.
fn sniff_encoding(bytes: &[u8]) -> XmlTreeResult<&'static Encoding> {
    match bytes {
        [0x3C, 0x00, 0x3F, 0x00, ..] => Ok(UTF_16LE),
        [0x00, 0x3C, 0x00, 0x3F, ..] => Ok(UTF_16BE),
        _ => match DECLARED_ENCODING.captures(bytes).and_then(|captures| captures.get(1)) {
            Some(label) => Encoding::for_label(label.as_bytes())
                // a declaration readable as ASCII can not be in a 16-bit encoding
                .map(|encoding| if encoding.is_ascii_compatible() { encoding } else { UTF_8 })
                .ok_or_else(|| {
                    XmlTreeError::Encoding(format!(
                        "unknown encoding {}",
                        String::from_utf8_lossy(label.as_bytes())
                    ))
                }),
            None => Ok(UTF_8),
        },
    }
}
