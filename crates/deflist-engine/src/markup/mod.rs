//! # Markup
//!
//! Reads and writes the HTML-like notation documents and fixtures are
//! written in:
//!
//! ```text
//! <p>x</p><dl><dt>foo[]</dt></dl>
//! ```
//!
//! `[`/`]` mark the selection inside text and `{`/`}` between element
//! children. A text marker with no text next to it opens an empty text node,
//! so `<dd>[]</dd>` parses to a value holding an empty, focusable text node
//! and prints back the same way.
//!
//! Whitespace-only text directly inside the root, a list or a description
//! list is layout between blocks and is dropped on parse.

use deflist_syntax::{Tag, TokenKind, lex_with_spans};

use crate::tree::{NodeId, NodeKind, Position, Selection, Tree};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("unexpected input {text:?} at byte {offset}")]
    UnexpectedInput { text: String, offset: usize },

    #[error("unknown tag <{name}> at byte {offset}")]
    UnknownTag { name: String, offset: usize },

    #[error("closing </{found}> at byte {offset} does not match <{expected}>")]
    MismatchedClose {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("<{0}> is never closed")]
    Unclosed(String),

    #[error("duplicate selection marker {marker:?} at byte {offset}")]
    DuplicateMarker { marker: char, offset: usize },

    #[error("selection has a start marker but no end marker, or the reverse")]
    UnbalancedSelection,

    #[error("selection end marker comes before its start marker")]
    InvertedSelection,
}

/// A parsed document: its tree and the selection written into it, if any.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub tree: Tree,
    pub selection: Option<Selection>,
}

#[derive(Clone, Copy, PartialEq)]
enum Marker {
    Start,
    End,
}

struct Parser {
    tree: Tree,
    stack: Vec<NodeId>,
    open_text: Option<NodeId>,
    start: Option<Position>,
    end: Option<Position>,
}

impl Parser {
    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.tree.root())
    }

    /// Text node that markers and character data from `token` should go into.
    fn text_node(&mut self, token: &str, offset: usize) -> Result<NodeId, MarkupError> {
        if let Some(text) = self.open_text {
            return Ok(text);
        }
        let text = self.tree.create_text("");
        let parent = self.current();
        self.tree
            .append_child(parent, text)
            .map_err(|_| unexpected(token, offset))?;
        self.open_text = Some(text);
        Ok(text)
    }

    fn mark(
        &mut self,
        which: Marker,
        at: Position,
        marker: char,
        offset: usize,
    ) -> Result<(), MarkupError> {
        let slot = match which {
            Marker::Start => &mut self.start,
            Marker::End => &mut self.end,
        };
        if slot.is_some() {
            return Err(MarkupError::DuplicateMarker { marker, offset });
        }
        if which == Marker::End && self.start.is_none() {
            return Err(MarkupError::InvertedSelection);
        }
        match which {
            Marker::Start => self.start = Some(at),
            Marker::End => self.end = Some(at),
        }
        Ok(())
    }
}

fn unexpected(text: &str, offset: usize) -> MarkupError {
    MarkupError::UnexpectedInput {
        text: text.to_string(),
        offset,
    }
}

/// Parse markup into a tree and optional selection.
pub fn parse(input: &str) -> Result<Fragment, MarkupError> {
    let mut parser = Parser {
        tree: Tree::new(),
        stack: Vec::new(),
        open_text: None,
        start: None,
        end: None,
    };

    for (token, span) in lex_with_spans(input) {
        match token.kind {
            TokenKind::Text => {
                let decoded = html_escape::decode_html_entities(token.text);
                let text = parser.text_node(token.text, span.start)?;
                let mut joined = parser.tree.text(text).unwrap_or_default().to_string();
                joined.push_str(&decoded);
                parser
                    .tree
                    .set_text(text, joined)
                    .map_err(|_| unexpected(token.text, span.start))?;
            }
            TokenKind::TextStart | TokenKind::TextEnd => {
                let text = parser.text_node(token.text, span.start)?;
                let at = Position::new(text, parser.tree.len(text));
                let (which, marker) = if token.kind == TokenKind::TextStart {
                    (Marker::Start, '[')
                } else {
                    (Marker::End, ']')
                };
                parser.mark(which, at, marker, span.start)?;
            }
            TokenKind::ElementStart | TokenKind::ElementEnd => {
                parser.open_text = None;
                let parent = parser.current();
                let at = Position::new(parent, parser.tree.children(parent).len());
                let (which, marker) = if token.kind == TokenKind::ElementStart {
                    (Marker::Start, '{')
                } else {
                    (Marker::End, '}')
                };
                parser.mark(which, at, marker, span.start)?;
            }
            TokenKind::OpenTag => {
                parser.open_text = None;
                let name = token.tag_name().unwrap_or_default();
                let tag = Tag::from_name(name).ok_or_else(|| MarkupError::UnknownTag {
                    name: name.to_string(),
                    offset: span.start,
                })?;
                let node = parser.tree.create(NodeKind::from_tag(tag));
                let parent = parser.current();
                parser
                    .tree
                    .append_child(parent, node)
                    .map_err(|_| unexpected(token.text, span.start))?;
                if !tag.is_void() && !token.is_self_closing() {
                    parser.stack.push(node);
                }
            }
            TokenKind::CloseTag => {
                parser.open_text = None;
                let name = token.tag_name().unwrap_or_default();
                let Some(open) = parser.stack.pop() else {
                    return Err(MarkupError::UnexpectedInput {
                        text: token.text.to_string(),
                        offset: span.start,
                    });
                };
                let expected = parser.tree.kind(open).tag();
                if expected.is_none() || expected != Tag::from_name(name) {
                    return Err(MarkupError::MismatchedClose {
                        expected: parser.tree.kind(open).label().to_string(),
                        found: name.to_string(),
                        offset: span.start,
                    });
                }
            }
            TokenKind::Unknown => {
                return Err(MarkupError::UnexpectedInput {
                    text: token.text.to_string(),
                    offset: span.start,
                });
            }
        }
    }

    if let Some(open) = parser.stack.last() {
        return Err(MarkupError::Unclosed(
            parser.tree.kind(*open).label().to_string(),
        ));
    }

    let selection = match (parser.start, parser.end) {
        (Some(start), Some(end)) => Some(Selection::new(start, end)),
        (None, None) => None,
        _ => return Err(MarkupError::UnbalancedSelection),
    };

    let mut tree = parser.tree;
    let mut selection = selection;
    drop_layout_whitespace(&mut tree, &mut selection);

    Ok(Fragment { tree, selection })
}

fn drop_layout_whitespace(tree: &mut Tree, selection: &mut Option<Selection>) {
    let layout: Vec<NodeId> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&node| {
            let in_container = tree.parent(node).is_some_and(|p| {
                matches!(
                    tree.kind(p),
                    NodeKind::Root | NodeKind::List(_) | NodeKind::DescriptionList
                )
            });
            let holds_marker = selection
                .as_ref()
                .is_some_and(|s| s.start.node == node || s.end.node == node);
            in_container
                && !holds_marker
                && tree.text(node).is_some_and(|t| t.trim().is_empty())
        })
        .collect();

    for node in layout {
        let Some(parent) = tree.parent(node) else {
            continue;
        };
        let Ok(index) = tree.detach(node) else {
            continue;
        };
        // Element positions after the removed child shift left by one.
        if let Some(s) = selection.as_mut() {
            for pos in [&mut s.start, &mut s.end] {
                if pos.node == parent && pos.offset > index {
                    pos.offset -= 1;
                }
            }
        }
    }
}

/// Serialize the tree, writing selection markers when a selection is given.
pub fn serialize(tree: &Tree, selection: Option<&Selection>) -> String {
    let mut out = String::new();
    write_children(tree, tree.root(), selection, &mut out);
    out
}

fn write_markers(
    at: Position,
    selection: Option<&Selection>,
    open: char,
    close: char,
    out: &mut String,
) {
    if let Some(s) = selection {
        if s.start == at {
            out.push(open);
        }
        if s.end == at {
            out.push(close);
        }
    }
}

fn write_children(tree: &Tree, node: NodeId, selection: Option<&Selection>, out: &mut String) {
    let children = tree.children(node);
    for (index, &child) in children.iter().enumerate() {
        write_markers(Position::new(node, index), selection, '{', '}', out);
        write_node(tree, child, selection, out);
    }
    write_markers(Position::new(node, children.len()), selection, '{', '}', out);
}

fn write_node(tree: &Tree, node: NodeId, selection: Option<&Selection>, out: &mut String) {
    if let Some(text) = tree.text(node) {
        for (offset, ch) in text.chars().enumerate() {
            write_markers(Position::new(node, offset), selection, '[', ']', out);
            push_escaped(ch, out);
        }
        write_markers(Position::new(node, text.chars().count()), selection, '[', ']', out);
        return;
    }

    let Some(tag) = tree.kind(node).tag() else {
        write_children(tree, node, selection, out);
        return;
    };
    out.push('<');
    out.push_str(tag.name());
    out.push('>');
    if tag.is_void() {
        return;
    }
    write_children(tree, node, selection, out);
    out.push_str("</");
    out.push_str(tag.name());
    out.push('>');
}

fn push_escaped(ch: char, out: &mut String) {
    match ch {
        '[' => out.push_str("&#91;"),
        ']' => out.push_str("&#93;"),
        '{' => out.push_str("&#123;"),
        '}' => out.push_str("&#125;"),
        // Invisible characters are written as references so fixtures show them.
        '\u{00A0}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => {
            out.push_str(&format!("&#{};", ch as u32));
        }
        other => {
            let mut buf = [0u8; 4];
            out.push_str(&html_escape::encode_text(other.encode_utf8(&mut buf)));
        }
    }
}
