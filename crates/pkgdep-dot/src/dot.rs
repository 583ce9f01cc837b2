//! DOT format utilities.

use std::fmt::Write;

/// Escape a string for use inside a double-quoted DOT string.
pub fn escape(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Quote an identifier or attribute value.
pub fn quote(input: &str) -> String {
    format!("\"{}\"", escape(input))
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// Write `[k="v", ...]`, or nothing for an empty list.
fn write_attr_list<'a, I>(output: &mut String, attrs: I)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut attrs = attrs.into_iter().peekable();
    if attrs.peek().is_none() {
        return;
    }
    output.push_str(" [");
    for (i, (key, value)) in attrs.enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        let _ = write!(output, "{}={}", key, quote(value));
    }
    output.push(']');
}

/// A DOT graph builder for constructing valid DOT output.
///
/// Every identifier and value is quoted, so unit paths with `/`, `.` or
/// spaces can be used as node ids directly.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl DotBuilder {
    /// Create a new digraph with the given name.
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "digraph {} {{", quote(name));
        Self { output, indent: 1 }
    }

    /// Add an attribute to the current graph or subgraph.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{}={};", key, quote(value));
        self
    }

    /// Set default node attributes.
    pub fn node_defaults<'a, I>(&mut self, attrs: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        write_indent(&mut self.output, self.indent);
        self.output.push_str("node");
        write_attr_list(&mut self.output, attrs);
        self.output.push_str(";\n");
        self
    }

    /// Set default edge attributes.
    pub fn edge_defaults<'a, I>(&mut self, attrs: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        write_indent(&mut self.output, self.indent);
        self.output.push_str("edge");
        write_attr_list(&mut self.output, attrs);
        self.output.push_str(";\n");
        self
    }

    /// Add a blank line for readability.
    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Declare a node.
    pub fn node<'a, I>(&mut self, id: &str, attrs: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        write_indent(&mut self.output, self.indent);
        self.output.push_str(&quote(id));
        write_attr_list(&mut self.output, attrs);
        self.output.push_str(";\n");
        self
    }

    /// Add an edge.
    pub fn edge<'a, I>(&mut self, from: &str, to: &str, attrs: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{} -> {}", quote(from), quote(to));
        write_attr_list(&mut self.output, attrs);
        self.output.push_str(";\n");
        self
    }

    /// Start a subgraph cluster. Graphviz only frames subgraphs whose name
    /// starts with `cluster`.
    pub fn start_cluster(&mut self, name: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "subgraph {} {{", quote(&format!("cluster_{name}")));
        self.indent += 1;
        self
    }

    /// End the current subgraph cluster.
    pub fn end_cluster(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        write_indent(&mut self.output, self.indent);
        self.output.push_str("}\n");
        self
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a "b" \c"#), r#"a \"b\" \\c"#);
        assert_eq!(escape("package: x\n/dir"), "package: x\\n/dir");
        assert_eq!(quote("github.com/a b"), "\"github.com/a b\"");
    }

    #[test]
    fn test_builder() {
        let mut dot = DotBuilder::new("g");
        dot.attr("rankdir", "LR")
            .node_defaults([("shape", "box")])
            .start_cluster("example.com/a")
            .attr("label", "a")
            .node("example.com/a", [("label", "a")])
            .end_cluster()
            .edge("example.com/a", "example.com/b", std::iter::empty())
            .node("plain", std::iter::empty());

        assert_eq!(
            dot.build(),
            concat!(
                "digraph \"g\" {\n",
                "  rankdir=\"LR\";\n",
                "  node [shape=\"box\"];\n",
                "  subgraph \"cluster_example.com/a\" {\n",
                "    label=\"a\";\n",
                "    \"example.com/a\" [label=\"a\"];\n",
                "  }\n",
                "  \"example.com/a\" -> \"example.com/b\";\n",
                "  \"plain\";\n",
                "}\n",
            )
        );
    }
}
