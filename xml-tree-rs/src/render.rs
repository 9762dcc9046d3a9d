use crate::error::{XmlTreeError, XmlTreeResult};
use crate::model::{
    dot::{Dot, DotElement, DotShape, RadialDotFile, Style},
    graph::ElementGraph,
};
use log::info;
use std::{
    io::{self, Write},
    path::Path,
    process::{Command, Stdio},
    thread,
};

/// Graphviz engine producing the radial layout.
const LAYOUT_PROGRAM: &str = "twopi";
/// Graphviz output device for an interactive window.
const WINDOW_FORMAT: &str = "xlib";
const DEFAULT_FORMAT: &str = "png";

const NODE_COLOR: &str = "#0000ff80";
const ROOT_COLOR: &str = "#ff0000";
const EDGE_COLOR: &str = "#00000080";
const NODE_SIZE: f32 = 0.1;
const ROOT_SIZE: f32 = 0.2;
const FONT_SIZE: i32 = 12;

pub struct RenderOptions {
    /// Figure size in inches.
    pub size: (f32, f32),
    /// Show each node's identifier next to it.
    pub labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            size: (8.0, 8.0),
            labels: true,
        }
    }
}

/// A drawing of one element graph, ready to be written to a file or shown in a window.
///
/// Owns everything needed to render, so nothing is shared between figures. Saving or
/// showing consumes the figure.
pub struct Figure {
    dot: RadialDotFile,
}

impl Figure {
    pub fn new(graph: &ElementGraph, options: &RenderOptions) -> Self {
        let root = graph.root_name();
        let label = |name: &str| if options.labels { name.to_string() } else { String::new() };

        let nodes = graph
            .node_names()
            .filter(|&name| name != root)
            .map(|name| DotElement::new(name, node_dot(label(name), NODE_SIZE, NODE_COLOR)));

        let edges = graph.edge_names().map(|(parent, child)| {
            DotElement::new_edge(
                parent,
                child,
                Dot {
                    color: Some(EDGE_COLOR.to_string()),
                    dir: Some("none".to_string()),
                    ..Dot::default()
                },
            )
        });

        // declared last so it is drawn over everything else
        let root_node = DotElement::new(root, node_dot(label(root), ROOT_SIZE, ROOT_COLOR));

        let dots = nodes.chain(edges).chain(std::iter::once(root_node)).collect();
        Figure {
            dot: RadialDotFile::new(dots, root, options.size),
        }
    }

    /// The figure as a Graphviz DOT document.
    pub fn dot(&self) -> String {
        self.dot.to_string()
    }

    /// Write the figure to `path`, in the image format named by its extension.
    pub fn save<P: AsRef<Path>>(self, path: P) -> XmlTreeResult<()> {
        let path = path.as_ref();
        let format = output_format(path);
        info!("rendering {} image to {}", format, path.display());
        run_layout(&self.dot(), &format, Some(path))
    }

    /// Open the figure in an interactive window, blocking until it is closed.
    pub fn show(self) -> XmlTreeResult<()> {
        info!("opening {} window", WINDOW_FORMAT);
        run_layout(&self.dot(), WINDOW_FORMAT, None)
    }
}

fn node_dot(label: String, size: f32, color: &str) -> Dot {
    Dot {
        shape: Some(DotShape::Circle),
        width: Some(size),
        height: Some(size),
        fixedsize: true,
        label: Some(label),
        fontsize: Some(FONT_SIZE),
        style: vec![Style::Filled],
        color: Some(color.to_string()),
        fillcolor: Some(color.to_string()),
        ..Dot::default()
    }
}

/// Graphviz output format for a file name, `png` when it has no extension.
fn output_format(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| DEFAULT_FORMAT.to_string())
}

/// Pipe `dot` through the layout program, e.g. `twopi -Tpng -o tree.png`.
fn run_layout(dot: &str, format: &str, output: Option<&Path>) -> XmlTreeResult<()> {
    let mut command = Command::new(LAYOUT_PROGRAM);
    command.arg(format!("-T{}", format));
    if let Some(output) = output {
        command.arg("-o").arg(output);
    }
    pipe_through(&mut command, dot)
}

/// Feed `input` to `command` and wait for it, failing when it exits unsuccessfully.
fn pipe_through(command: &mut Command, input: &str) -> XmlTreeResult<()> {
    let mut process = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    // stdin is fed from its own thread while stderr is drained, and closed once written
    let stdin = process.stdin.take();
    let input = input.to_string();
    let writer = thread::spawn(move || match stdin {
        Some(mut stdin) => stdin.write_all(input.as_bytes()),
        None => Ok(()),
    });

    let result = process.wait_with_output()?;
    let written = writer
        .join()
        .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked")));

    if !result.status.success() {
        let message = String::from_utf8_lossy(&result.stderr).trim().to_string();
        return Err(XmlTreeError::Graphviz(format!(
            "{} exited with {}: {}",
            command.get_program().to_string_lossy(),
            result.status,
            message
        )));
    }

    written?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::XmlTree;

    fn simple_graph(depth: i64) -> ElementGraph {
        let tree = XmlTree::parse(include_str!("../test/simple.xml")).expect("can not parse simple.xml");
        ElementGraph::construct(&tree, depth).expect("can not construct graph")
    }

    #[test]
    fn test_simple_figure() {
        let expected = include_str!("../test/simple.dot");
        let figure = Figure::new(&simple_graph(0), &RenderOptions::default());
        assert_eq!(figure.dot(), expected);
    }

    #[test]
    fn test_figure_without_labels() {
        let options = RenderOptions {
            labels: false,
            ..RenderOptions::default()
        };
        let dot = Figure::new(&simple_graph(0), &options).dot();

        assert_eq!(dot.matches(r#"label="""#).count(), 4);
        assert!(!dot.contains(r#"label="1: b""#));
    }

    #[test]
    fn test_root_drawn_last() {
        let dot = Figure::new(&simple_graph(0), &RenderOptions::default()).dot();
        let statements: Vec<&str> = dot.lines().filter(|line| line.starts_with("    ")).collect();

        assert_eq!(statements.len(), 4 + 3);
        let last = statements.last().expect("figure has no statements");
        assert!(last.starts_with(r#"    "0: a" ["#));
        assert!(last.contains(ROOT_COLOR));
        assert_eq!(dot.matches(ROOT_COLOR).count(), 2);
    }

    #[test]
    fn test_pruned_figure() {
        let dot = Figure::new(&simple_graph(1), &RenderOptions::default()).dot();

        assert!(dot.contains(r#"root="0: a""#));
        assert!(!dot.contains("3: d"));
        assert_eq!(dot.matches(" -> ").count(), 2);
    }

    #[test]
    fn test_figure_size() {
        let options = RenderOptions {
            size: (4.5, 3.0),
            ..RenderOptions::default()
        };
        let dot = Figure::new(&simple_graph(0), &options).dot();
        assert!(dot.contains(r#"size="4.5,3""#));
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_with_chatty_stderr() {
        // fills the stderr pipe before reading any input
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg("head -c 262144 /dev/zero | tr '\\0' x >&2; cat > /dev/null");
        let input = "digraph G {}\n".repeat(65536);

        pipe_through(&mut command, &input).expect("pipe must not block");
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_reports_failure() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("cat > /dev/null; echo 'Format: \"bogus\" not recognized' >&2; exit 3");

        let err = pipe_through(&mut command, "digraph G {}").expect_err("failing command must fail");
        match err {
            XmlTreeError::Graphviz(message) => {
                assert!(message.starts_with("sh exited with"));
                assert!(message.contains(r#"Format: "bogus" not recognized"#));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_output_format() {
        assert_eq!(output_format(Path::new("tree.png")), "png");
        assert_eq!(output_format(Path::new("out/Tree.SVG")), "svg");
        assert_eq!(output_format(Path::new("tree.v1.pdf")), "pdf");
        assert_eq!(output_format(Path::new("tree")), "png");
        assert_eq!(output_format(Path::new("tree.")), "png");
    }
}
