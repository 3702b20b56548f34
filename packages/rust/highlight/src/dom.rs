//! Owned, mutable document tree.
//!
//! `scraper` parses HTML into a read-mostly tree; highlighting needs to swap
//! text nodes for element subtrees, so the parsed tree is copied into an arena
//! of nodes addressed by [`NodeId`] with explicit parent links. Replaced or
//! detached nodes stay in the arena but lose their parent link.

use scraper::Html;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Elements whose text children are serialized without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

// ---------------------------------------------------------------------------
// Node types
// ---------------------------------------------------------------------------

/// Index of a node inside a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Element tag name and attributes, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Payload of a single tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Fragment,
    Doctype(String),
    Comment(String),
    Text(String),
    Element(ElementData),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An HTML document held as an arena tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Parse a full HTML document (html5ever error recovery applies).
    pub fn parse(html: &str) -> Self {
        Self::from_html(&Html::parse_document(html))
    }

    /// Copy a parsed `scraper` tree into a new arena.
    pub fn from_html(html: &Html) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.push(NodeData::Document);

        let mut stack = vec![(html.tree.root(), doc.root)];
        while let Some((source, parent)) = stack.pop() {
            for child in source.children() {
                let data = match child.value() {
                    scraper::Node::Document | scraper::Node::Fragment => NodeData::Fragment,
                    scraper::Node::Doctype(doctype) => NodeData::Doctype(doctype.name().to_owned()),
                    scraper::Node::Comment(comment) => NodeData::Comment((**comment).to_owned()),
                    scraper::Node::Text(text) => NodeData::Text((**text).to_owned()),
                    scraper::Node::Element(element) => NodeData::Element(ElementData {
                        name: element.name().to_owned(),
                        attrs: element
                            .attrs()
                            .map(|(key, value)| (key.to_owned(), value.to_owned()))
                            .collect(),
                    }),
                    _ => continue,
                };
                let id = doc.push(data);
                doc.append_child(parent, id);
                stack.push((child, id));
            }
        }

        doc
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // -- accessors ---------------------------------------------------------

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Element payload, if `id` is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.data(id) {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Text payload, if `id` is a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether the chain of parent links from `id` reaches the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// All nodes below `id` in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// First element named `name` in document order.
    pub fn find_element(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&id| self.element(id).is_some_and(|e| e.name == name))
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        self.find_element("body")
    }

    /// Concatenated text of every text node below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|node| self.text(node))
            .collect()
    }

    // -- mutation ----------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, name: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.push(NodeData::Element(ElementData {
            name: name.to_owned(),
            attrs,
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_owned()))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Remove `id` from its parent. No-op for nodes without a parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Put `new` where `old` sits in its parent. Returns `false` (and changes
    /// nothing) when `old` has no parent.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        self.detach(new);
        let Some(slot) = self.nodes[parent.0].children.iter().position(|&c| c == old) else {
            return false;
        };
        self.nodes[parent.0].children[slot] = new;
        self.nodes[new.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        true
    }

    // -- serialization -----------------------------------------------------

    /// Serialize the whole document back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_nodes(self.children(self.root), &mut out);
        out
    }

    #[cfg(test)]
    fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_nodes(&[id], &mut out);
        out
    }

    fn write_nodes(&self, roots: &[NodeId], out: &mut String) {
        let mut stack: Vec<Emit> = roots.iter().rev().map(|&id| Emit::Open(id)).collect();
        while let Some(step) = stack.pop() {
            let id = match step {
                Emit::Close(name) => {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                    continue;
                }
                Emit::Open(id) => id,
            };
            match self.data(id) {
                NodeData::Document | NodeData::Fragment => {
                    stack.extend(self.children(id).iter().rev().map(|&c| Emit::Open(c)));
                }
                NodeData::Doctype(name) => {
                    out.push_str("<!DOCTYPE ");
                    out.push_str(name);
                    out.push('>');
                }
                NodeData::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                NodeData::Text(text) => {
                    let raw = self
                        .parent(id)
                        .and_then(|p| self.element(p))
                        .is_some_and(|e| RAW_TEXT_ELEMENTS.contains(&e.name.as_str()));
                    if raw {
                        out.push_str(text);
                    } else {
                        escape_text(text, out);
                    }
                }
                NodeData::Element(element) => {
                    out.push('<');
                    out.push_str(&element.name);
                    for (key, value) in &element.attrs {
                        out.push(' ');
                        out.push_str(key);
                        out.push_str("=\"");
                        escape_attr(value, out);
                        out.push('"');
                    }
                    out.push('>');
                    if VOID_ELEMENTS.contains(&element.name.as_str()) {
                        continue;
                    }
                    stack.push(Emit::Close(&element.name));
                    stack.extend(self.children(id).iter().rev().map(|&c| Emit::Open(c)));
                }
            }
        }
    }
}

/// Serializer work item: open a node, or write a pending closing tag.
enum Emit<'a> {
    Open(NodeId),
    Close(&'a str),
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_finds_body_and_text() {
        let doc = Document::parse("<html><body><p>Hello <b>world</b></p></body></html>");
        let body = doc.body().expect("body");
        assert_eq!(doc.text_content(body), "Hello world");
    }

    #[test]
    fn serialization_escapes_text_but_not_scripts() {
        let doc = Document::parse(
            "<html><body><p>a &lt; b &amp; c</p><script>if (a < b) {}</script></body></html>",
        );
        let html = doc.to_html();
        assert!(html.contains("<p>a &lt; b &amp; c</p>"));
        assert!(html.contains("<script>if (a < b) {}</script>"));
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let doc = Document::parse(r#"<html><body><input value="x&quot;y"><br></body></html>"#);
        let html = doc.to_html();
        assert!(html.contains(r#"<input value="x&quot;y">"#));
        assert!(!html.contains("</input>"));
        assert!(!html.contains("</br>"));
    }

    #[test]
    fn doctype_and_comments_survive() {
        let doc = Document::parse("<!DOCTYPE html><html><body><!-- note --><p>x</p></body></html>");
        let html = doc.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<!-- note -->"));
    }

    #[test]
    fn serializes_deep_nesting_without_recursion() {
        const DEPTH: usize = 100_000;
        let mut doc = Document::parse("<html><body></body></html>");
        let mut parent = doc.body().unwrap();
        for _ in 0..DEPTH {
            let div = doc.create_element("div", Vec::new());
            doc.append_child(parent, div);
            parent = div;
        }
        let leaf = doc.create_text("deep");
        doc.append_child(parent, leaf);

        let html = doc.to_html();
        assert_eq!(html.matches("<div>").count(), DEPTH);
        assert!(html.contains("<div>deep</div>"));
        assert!(html.ends_with("</div></body></html>"));
        assert!(doc.is_attached(leaf));
    }

    #[test]
    fn replace_node_swaps_in_place() {
        let mut doc = Document::parse("<html><body><p>one</p><p>two</p></body></html>");
        let body = doc.body().unwrap();
        let first = doc.children(body)[0];
        let old_text = doc.children(first)[0];

        let span = doc.create_element("span", Vec::new());
        let text = doc.create_text("ONE");
        doc.append_child(span, text);

        assert!(doc.replace_node(old_text, span));
        assert_eq!(doc.parent(old_text), None);
        assert_eq!(doc.outer_html(body), "<body><p><span>ONE</span></p><p>two</p></body>");
    }

    #[test]
    fn replace_detached_node_is_refused() {
        let mut doc = Document::parse("<html><body><p>one</p></body></html>");
        let orphan = doc.create_text("loose");
        let other = doc.create_text("other");
        assert!(!doc.replace_node(orphan, other));
    }

    #[test]
    fn detached_subtree_is_not_attached() {
        let mut doc = Document::parse("<html><body><p>one</p></body></html>");
        let body = doc.body().unwrap();
        let p = doc.children(body)[0];
        let text = doc.children(p)[0];
        assert!(doc.is_attached(text));

        doc.detach(p);
        assert!(!doc.is_attached(text));
        assert_eq!(doc.parent(text), Some(p));
    }
}
