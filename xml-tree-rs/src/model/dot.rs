use itertools::Itertools;
use std::fmt::{Display, Formatter, Write};

#[derive(PartialEq, Clone, Copy)]
pub enum DotShape {
    Circle,
}

impl Display for DotShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DotShape::Circle => f.write_str("circle"),
        }
    }
}

#[derive(PartialEq, Clone, Copy)]
pub enum Style {
    Filled,
}

impl Display for Style {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Style::Filled => f.write_str("filled"),
        }
    }
}

/// Attribute list of a node or an edge statement.
#[derive(Default)]
pub struct Dot {
    pub shape: Option<DotShape>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fixedsize: bool,
    pub label: Option<String>,
    pub fontsize: Option<i32>,
    pub style: Vec<Style>,
    pub color: Option<String>,
    pub fillcolor: Option<String>,
    pub dir: Option<String>,
}

impl Display for Dot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;

        // strings
        if let Some(shape) = &self.shape {
            f.write_fmt(format_args!(r#"shape="{}" , "#, shape))?;
        }
        if let Some(label) = &self.label {
            f.write_fmt(format_args!(r#"label="{}" , "#, escape(label)))?;
        }
        if !self.style.is_empty() {
            f.write_fmt(format_args!(
                r#"style="{}" , "#,
                self.style.iter().map(Style::to_string).join(",")
            ))?;
        }
        if let Some(color) = &self.color {
            f.write_fmt(format_args!(r#"color="{}" , "#, color))?;
        }
        if let Some(fillcolor) = &self.fillcolor {
            f.write_fmt(format_args!(r#"fillcolor="{}" , "#, fillcolor))?;
        }
        if let Some(dir) = &self.dir {
            f.write_fmt(format_args!(r#"dir="{}" , "#, dir))?;
        }

        // non-strings
        if let Some(width) = &self.width {
            f.write_fmt(format_args!("width={} , ", width))?;
        }
        if let Some(height) = &self.height {
            f.write_fmt(format_args!("height={} , ", height))?;
        }
        if self.fixedsize {
            f.write_str("fixedsize=true , ")?;
        }
        if let Some(fontsize) = &self.fontsize {
            f.write_fmt(format_args!("fontsize={} , ", fontsize))?;
        }

        f.write_str("]")
    }
}

/// A node statement, or an edge statement when `uid2` is set.
pub struct DotElement {
    pub uid: String,
    pub uid2: Option<String>,
    pub dot: Dot,
}

impl DotElement {
    pub fn new(uid: &str, dot: Dot) -> Self {
        DotElement {
            uid: uid.to_string(),
            uid2: None,
            dot,
        }
    }

    pub fn new_edge(uid: &str, uid2: &str, dot: Dot) -> Self {
        DotElement {
            uid: uid.to_string(),
            uid2: Some(uid2.to_string()),
            dot,
        }
    }
}

impl Display for DotElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(uid2) = &self.uid2 {
            f.write_fmt(format_args!(
                r#"    "{}" -> "{}" {}"#,
                escape(&self.uid),
                escape(uid2),
                self.dot
            ))
        } else {
            f.write_fmt(format_args!(r#"    "{}" {}"#, escape(&self.uid), self.dot))
        }
    }
}

/// A complete `digraph` laid out radially around `root` by the `twopi` engine.
pub struct RadialDotFile {
    dots: Vec<DotElement>,
    root: String,
    size: (f32, f32),
}

impl RadialDotFile {
    pub fn new(dots: Vec<DotElement>, root: &str, size: (f32, f32)) -> Self {
        RadialDotFile {
            dots,
            root: root.to_string(),
            size,
        }
    }
}

impl Display for RadialDotFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("digraph G {\n")?;
        f.write_fmt(format_args!(
            "  graph [ layout=twopi, root=\"{}\", size=\"{},{}\", outputorder=edgesfirst, fontname=Helvetica ]\n",
            escape(&self.root),
            self.size.0,
            self.size.1
        ))?;
        f.write_str("  node [ fontname=Helvetica ]\n")?;
        for dot in &self.dots {
            f.write_str(&dot.to_string())?;
            f.write_char('\n')?;
        }
        f.write_str("}\n")
    }
}

/// Escape a value for use inside a double-quoted DOT string.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_node() {
        let node = Dot {
            shape: Some(DotShape::Circle),
            width: Some(0.1),
            height: Some(0.1),
            fixedsize: true,
            label: Some("0: a".to_string()),
            fontsize: Some(12),
            style: vec![Style::Filled],
            color: None,
            fillcolor: Some("#0000ff80".to_string()),
            dir: None,
        }
        .to_string();

        assert_eq!(
            node,
            r##"[shape="circle" , label="0: a" , style="filled" , fillcolor="#0000ff80" , width=0.1 , height=0.1 , fixedsize=true , fontsize=12 , ]"##
        );
    }

    #[test]
    fn test_display_edge() {
        let edge = DotElement::new_edge(
            "0: a",
            "1: b",
            Dot {
                dir: Some("none".to_string()),
                ..Dot::default()
            },
        )
        .to_string();

        assert_eq!(edge, r#"    "0: a" -> "1: b" [dir="none" , ]"#);
    }

    #[test]
    fn test_quotes_are_escaped() {
        let node = DotElement::new(
            r#"0: {urn:"odd"}tag\x"#,
            Dot {
                label: Some("say \"hi\"".to_string()),
                ..Dot::default()
            },
        )
        .to_string();

        assert_eq!(node, r#"    "0: {urn:\"odd\"}tag\\x" [label="say \"hi\"" , ]"#);
    }
}
