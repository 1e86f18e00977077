//! Call-scoped markup tree for card payloads.
//!
//! Cards arrive as loosely formed XML that is rewritten into HTML before
//! rendering. [`Fragment`] parses that markup into a small arena so the
//! transcoders can walk children, read attributes and serialize the result
//! without touching the live document.
//!
//! Handles:
//! - Start/end tags with quoted, unquoted and bare attributes
//! - Self-closing syntax (`<picture cover="x"/>`) and HTML void elements
//! - Text with entity decoding (re-escaped on output)
//! - Comments, doctype and `<?xml ...?>` declarations (dropped)

// =============================================================================
// Tokens
// =============================================================================

/// Tokens produced by the [`Tokenizer`]
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Opening tag with its attributes in source order
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    /// Closing tag `</name>`
    EndTag(String),
    /// Character data, entities already decoded
    Text(String),
}

/// Elements that never have children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn decode(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    htmlescape::decode_html(raw).unwrap_or_else(|_| raw.to_string())
}

// =============================================================================
// Tokenizer
// =============================================================================

/// Tokenizer for card markup
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn current_char(&self) -> char {
        self.rest().chars().next().unwrap_or('\0')
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() {
            let c = self.current_char();
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Skip past `terminator`, or to the end of input if it never appears.
    fn skip_past(&mut self, terminator: &str) {
        match self.rest().find(terminator) {
            Some(offset) => self.pos += offset + terminator.len(),
            None => self.pos = self.input.len(),
        }
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while !self.at_end() {
            let c = self.current_char();
            if c.is_whitespace() || c == '/' || c == '>' || c == '=' {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn next_token(&mut self) -> Option<Token> {
        let rest = self.rest();
        if !rest.starts_with('<') {
            return Some(Token::Text(self.read_text()));
        }

        let mut lookahead = rest[1..].chars();
        match lookahead.next() {
            Some('!') => {
                if rest.starts_with("<!--") {
                    self.skip_past("-->");
                } else {
                    self.skip_past(">");
                }
                None
            }
            Some('?') => {
                self.skip_past(">");
                None
            }
            Some('/') if lookahead.next().is_some_and(|c| c.is_ascii_alphabetic()) => {
                self.pos += 2; // skip </
                let name = self.read_name();
                self.skip_past(">");
                Some(Token::EndTag(name))
            }
            Some(c) if c.is_ascii_alphabetic() => Some(self.parse_start_tag()),
            _ => {
                // A lone '<' is just text
                self.pos += 1;
                Some(Token::Text(format!("<{}", self.read_text())))
            }
        }
    }

    fn read_text(&mut self) -> String {
        let start = self.pos;
        match self.rest().find('<') {
            Some(offset) => self.pos += offset,
            None => self.pos = self.input.len(),
        }
        decode(&self.input[start..self.pos])
    }

    fn parse_start_tag(&mut self) -> Token {
        self.pos += 1; // skip <
        let name = self.read_name();
        let mut attrs: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            match self.current_char() {
                '>' => {
                    self.pos += 1;
                    break;
                }
                '/' => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.current_char() == '>' {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                }
                _ => {
                    let attr_name = self.read_name();
                    if attr_name.is_empty() {
                        // Stray '=' or similar; drop one char and move on
                        self.pos += self.current_char().len_utf8();
                        continue;
                    }
                    self.skip_whitespace();
                    let value = if self.current_char() == '=' {
                        self.pos += 1;
                        self.skip_whitespace();
                        self.read_attr_value()
                    } else {
                        String::new()
                    };
                    // First occurrence wins, as in HTML
                    if !attrs.iter().any(|(n, _)| *n == attr_name) {
                        attrs.push((attr_name, value));
                    }
                }
            }
        }

        Token::StartTag {
            name,
            attrs,
            self_closing,
        }
    }

    fn read_attr_value(&mut self) -> String {
        let quote = self.current_char();
        if quote == '"' || quote == '\'' {
            self.pos += 1;
            let start = self.pos;
            let end = match self.rest().find(quote) {
                Some(offset) => start + offset,
                None => self.input.len(),
            };
            self.pos = (end + 1).min(self.input.len());
            return decode(&self.input[start..end]);
        }

        let start = self.pos;
        while !self.at_end() {
            let c = self.current_char();
            if c.is_whitespace() || c == '>' {
                break;
            }
            self.pos += c.len_utf8();
        }
        decode(&self.input[start..self.pos])
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.at_end() {
            if let Some(token) = self.next_token() {
                return Some(token);
            }
        }
        None
    }
}

// =============================================================================
// Fragment
// =============================================================================

/// Index of a node inside a [`Fragment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    children: Vec<NodeId>,
}

/// A parsed markup fragment hanging off a single container element.
///
/// Nodes live in one `Vec` and refer to each other by [`NodeId`]; the whole
/// tree is dropped with the fragment.
#[derive(Debug, Clone)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    /// Parse `markup` as the content of a new `<container>` element.
    ///
    /// End tags never close the container itself, and unmatched end tags
    /// are ignored.
    pub fn parse_in(container: &str, markup: &str) -> Self {
        let mut fragment = Self {
            nodes: vec![Node {
                data: NodeData::Element {
                    tag: container.to_ascii_lowercase(),
                    attrs: Vec::new(),
                },
                children: Vec::new(),
            }],
        };

        let mut stack = vec![fragment.root()];
        for token in Tokenizer::new(markup) {
            let parent = *stack.last().unwrap_or(&NodeId(0));
            match token {
                Token::StartTag {
                    name,
                    attrs,
                    self_closing,
                } => {
                    let leaf = self_closing || is_void(&name);
                    let id = fragment.push(parent, NodeData::Element { tag: name, attrs });
                    if !leaf {
                        stack.push(id);
                    }
                }
                Token::EndTag(name) => {
                    if let Some(depth) = stack
                        .iter()
                        .skip(1)
                        .rposition(|id| fragment.tag(*id) == Some(name.as_str()))
                    {
                        stack.truncate(depth + 1);
                    }
                }
                Token::Text(text) => {
                    if !text.is_empty() {
                        fragment.push(parent, NodeData::Text(text));
                    }
                }
            }
        }

        fragment
    }

    fn push(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// The container element passed to [`Fragment::parse_in`].
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Tag name of an element node, `None` for text.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Element children of `id` in document order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|child| self.tag(*child).is_some())
    }

    /// Element children of `id` whose tag is `tag`.
    pub fn children_by_tag<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.element_children(id)
            .filter(move |child| self.tag(*child) == Some(tag))
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// Set or replace an attribute. Text nodes are left alone.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            match attrs.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    /// Set one inline style property, keeping any others already present.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let mut declarations: Vec<(String, String)> = self
            .attribute(id, "style")
            .unwrap_or_default()
            .split(';')
            .filter_map(|decl| {
                let (prop, val) = decl.split_once(':')?;
                Some((prop.trim().to_string(), val.trim().to_string()))
            })
            .filter(|(prop, _)| !prop.is_empty())
            .collect();

        match declarations.iter_mut().find(|(prop, _)| prop == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }

        let style = declarations
            .iter()
            .map(|(prop, val)| format!("{}: {};", prop, val))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(id, "style", &style);
    }

    /// Serialize `id` including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in &self.nodes[id.0].children {
            self.write_node(*child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        match &node.data {
            NodeData::Text(text) => out.push_str(&htmlescape::encode_minimal(text)),
            NodeData::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&htmlescape::encode_minimal(value));
                    out.push('"');
                }
                out.push('>');
                if is_void(tag) {
                    return;
                }
                for child in &node.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, attrs: &[(&str, &str)], self_closing: bool) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            self_closing,
        }
    }

    #[test]
    fn test_tokenize_tags_and_text() {
        let tokens: Vec<_> = Tokenizer::new(r#"<p size="34">Hi</p>"#).collect();
        assert_eq!(
            tokens,
            vec![
                start("p", &[("size", "34")], false),
                Token::Text("Hi".to_string()),
                Token::EndTag("p".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_attribute_forms() {
        let tokens: Vec<_> = Tokenizer::new("<img src='a.png' alt=x hidden/>").collect();
        assert_eq!(
            tokens,
            vec![start(
                "img",
                &[("src", "a.png"), ("alt", "x"), ("hidden", "")],
                true
            )]
        );
    }

    #[test]
    fn test_tokenize_skips_declarations_and_comments() {
        let tokens: Vec<_> =
            Tokenizer::new("<?xml version='1.0'?><!-- note --><br>").collect();
        assert_eq!(tokens, vec![start("br", &[], false)]);
    }

    #[test]
    fn test_tokenize_decodes_entities() {
        let tokens: Vec<_> = Tokenizer::new(r#"<a href="?a=1&amp;b=2">x &lt; y</a>"#).collect();
        assert_eq!(tokens[0], start("a", &[("href", "?a=1&b=2")], false));
        assert_eq!(tokens[1], Token::Text("x < y".to_string()));
    }

    #[test]
    fn test_tokenize_lone_angle_bracket() {
        let tokens: Vec<_> = Tokenizer::new("1 < 2").collect();
        assert_eq!(
            tokens,
            vec![
                Token::Text("1 ".to_string()),
                Token::Text("< 2".to_string())
            ]
        );
    }

    #[test]
    fn test_tokenize_duplicate_attribute_keeps_first() {
        let tokens: Vec<_> = Tokenizer::new(r#"<div class="a" class="b">"#).collect();
        assert_eq!(tokens, vec![start("div", &[("class", "a")], false)]);
    }

    #[test]
    fn test_parse_nesting() {
        let frag = Fragment::parse_in("div", "<div><p>t</p><a>s</a></div><source data-name=\"n\">");
        let root = frag.root();
        let top: Vec<_> = frag.element_children(root).collect();
        assert_eq!(top.len(), 2);
        assert_eq!(frag.tag(top[0]), Some("div"));
        assert_eq!(frag.tag(top[1]), Some("source"));
        assert_eq!(frag.attribute(top[1], "data-name"), Some("n"));

        let inner: Vec<_> = frag.element_children(top[0]).collect();
        assert_eq!(frag.tag(inner[0]), Some("p"));
        assert_eq!(frag.tag(inner[1]), Some("a"));
    }

    #[test]
    fn test_void_and_self_closing_have_no_children() {
        let frag = Fragment::parse_in("div", "<img src=\"a\"><p/><span>x</span>");
        let tags: Vec<_> = frag
            .element_children(frag.root())
            .filter_map(|id| frag.tag(id))
            .collect();
        assert_eq!(tags, vec!["img", "p", "span"]);
    }

    #[test]
    fn test_unmatched_end_tag_ignored() {
        let frag = Fragment::parse_in("div", "<p>a</picture></div>b</p>");
        assert_eq!(frag.outer_html(frag.root()), "<div><p>ab</p></div>");
    }

    #[test]
    fn test_unclosed_elements_closed_on_output() {
        let frag = Fragment::parse_in("div", "<p><span>x");
        assert_eq!(frag.inner_html(frag.root()), "<p><span>x</span></p>");
    }

    #[test]
    fn test_children_by_tag() {
        let frag = Fragment::parse_in("div", "<p>1</p><a>2</a><p>3</p>");
        assert_eq!(frag.children_by_tag(frag.root(), "p").count(), 2);
        assert_eq!(frag.children_by_tag(frag.root(), "img").count(), 0);
    }

    #[test]
    fn test_set_attribute_and_serialize() {
        let mut frag = Fragment::parse_in("div", "<p>x</p>");
        let root = frag.root();
        frag.set_attribute(root, "id", "xml-1");
        frag.set_attribute(root, "data-id", "a\"b");
        frag.set_attribute(root, "id", "xml-2");
        assert_eq!(
            frag.outer_html(root),
            r#"<div id="xml-2" data-id="a&quot;b"><p>x</p></div>"#
        );
    }

    #[test]
    fn test_set_style_merges() {
        let mut frag = Fragment::parse_in("div", r#"<p style="color: red">x</p>"#);
        let p = frag.first_element_child(frag.root()).unwrap();
        frag.set_style(p, "font-size", "1rem");
        frag.set_style(p, "color", "blue");
        assert_eq!(
            frag.attribute(p, "style"),
            Some("color: blue; font-size: 1rem;")
        );
    }

    #[test]
    fn test_text_is_escaped_on_output() {
        let frag = Fragment::parse_in("div", "a &amp; b &lt;c&gt;");
        assert_eq!(frag.inner_html(frag.root()), "a &amp; b &lt;c&gt;");
    }
}
