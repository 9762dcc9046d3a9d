//! Draw the element hierarchy of an XML document as a radial tree, using the "twopi"
//! binary from the ["graphviz"](https://graphviz.org/download/) toolset.
//!
//! Every element becomes a node named after its position in document order and its tag,
//! e.g. `"0: article"`, and every parent/child relation becomes an edge. The tree can be
//! pruned to the elements within a number of steps from the root.

mod error;
mod model;
mod parser;
mod render;

pub use error::{XmlTreeError, XmlTreeResult};
pub use model::graph::ElementGraph;
pub use parser::XmlTree;
pub use render::{Figure, RenderOptions};

/// Extract, prune and lay out an XML file in one go.
/// Usage:
/// ```rust,no_run
/// use xml_tree_rs::{figure_from_file, RenderOptions};
///
/// let figure = figure_from_file("article.xml", 3, &RenderOptions::default()).expect("invalid XML");
/// figure.save("article.png").expect("can not render image");
/// ```
pub fn figure_from_file(xml_file: &str, depth: i64, options: &RenderOptions) -> XmlTreeResult<Figure> {
    let tree = XmlTree::build(xml_file)?;
    let graph = ElementGraph::construct(&tree, depth)?;
    Ok(Figure::new(&graph, options))
}
