use derive_more::{Display, Error, From};

#[derive(Debug, Display, Error, From)]
pub enum XmlTreeError {
    Io {
        source: std::io::Error,
    },
    #[display(fmt = "Invalid XML: {}", source)]
    Xml {
        source: roxmltree::Error,
    },
    #[display(fmt = "Undecodable XML document: {}", _0)]
    #[from(ignore)]
    Encoding(#[error(not(source))] String),
    #[display(fmt = "nesting depth cannot be negative")]
    #[from(ignore)]
    InvalidDepth(#[error(not(source))] i64),
    #[display(fmt = "The XML document has no elements")]
    #[from(ignore)]
    EmptyTree,
    #[display(fmt = "Edge refers to unknown node: {}", _0)]
    #[from(ignore)]
    UnknownNode(#[error(not(source))] String),
    #[display(fmt = "Graphviz failed: {}", _0)]
    #[from(ignore)]
    Graphviz(#[error(not(source))] String),
}

pub type XmlTreeResult<T> = Result<T, XmlTreeError>;
