//! # Document Tree
//!
//! An arena-backed tree of [`NodeKind`]-tagged nodes. It replaces the live DOM
//! the editing rules were first written against: every primitive the rules
//! need (node at offset, ancestor chain, split, replace, insert sibling,
//! remove) is an explicit method here, and two trees can be compared for
//! structural equality without a rendering engine.
//!
//! ## Ownership
//!
//! Every attached node has exactly one parent. Primitives that attach a node
//! ([`Tree::insert_child`], [`Tree::insert_after`], ...) refuse nodes that are
//! still attached elsewhere, so a node can never be shared. Removing a node
//! detaches it; it stays in the arena (its [`NodeId`] remains valid) but is no
//! longer reachable from [`Tree::root`].
//!
//! ## Offsets
//!
//! Offsets into text nodes count `char`s, offsets into elements count
//! children, matching [`Position`].

pub mod position;

pub use position::{Position, Selection};

use deflist_syntax::Tag;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{EditError, Result};

/// Index of a node in its [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered (`ol`) or unordered (`ul`) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// The two kinds of description-list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Term,
    Value,
}

impl ItemKind {
    /// Term becomes value, value becomes term.
    pub fn toggled(self) -> ItemKind {
        match self {
            ItemKind::Term => ItemKind::Value,
            ItemKind::Value => ItemKind::Term,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Paragraph,
    List(ListKind),
    ListItem,
    DescriptionList,
    DescriptionTerm,
    DescriptionValue,
    /// Phrasing wrapper such as `b` or `a`
    Inline(Tag),
    LineBreak,
    Text(String),
}

impl NodeKind {
    pub fn item(kind: ItemKind) -> NodeKind {
        match kind {
            ItemKind::Term => NodeKind::DescriptionTerm,
            ItemKind::Value => NodeKind::DescriptionValue,
        }
    }

    /// Term/value kind if this is a description item.
    pub fn item_kind(&self) -> Option<ItemKind> {
        match self {
            NodeKind::DescriptionTerm => Some(ItemKind::Term),
            NodeKind::DescriptionValue => Some(ItemKind::Value),
            _ => None,
        }
    }

    pub fn is_description_item(&self) -> bool {
        self.item_kind().is_some()
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text(_))
    }

    /// Text, line breaks and inline wrappers.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text(_) | NodeKind::LineBreak | NodeKind::Inline(_)
        )
    }

    /// Whether nodes of this kind can hold children.
    pub fn is_element(&self) -> bool {
        !matches!(self, NodeKind::Text(_) | NodeKind::LineBreak)
    }

    /// Markup tag for this kind, `None` for the root and text.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            NodeKind::Root | NodeKind::Text(_) => None,
            NodeKind::Paragraph => Some(Tag::P),
            NodeKind::List(ListKind::Ordered) => Some(Tag::Ol),
            NodeKind::List(ListKind::Unordered) => Some(Tag::Ul),
            NodeKind::ListItem => Some(Tag::Li),
            NodeKind::DescriptionList => Some(Tag::Dl),
            NodeKind::DescriptionTerm => Some(Tag::Dt),
            NodeKind::DescriptionValue => Some(Tag::Dd),
            NodeKind::Inline(tag) => Some(*tag),
            NodeKind::LineBreak => Some(Tag::Br),
        }
    }

    pub fn from_tag(tag: Tag) -> NodeKind {
        match tag {
            Tag::P => NodeKind::Paragraph,
            Tag::Ul => NodeKind::List(ListKind::Unordered),
            Tag::Ol => NodeKind::List(ListKind::Ordered),
            Tag::Li => NodeKind::ListItem,
            Tag::Dl => NodeKind::DescriptionList,
            Tag::Dt => NodeKind::DescriptionTerm,
            Tag::Dd => NodeKind::DescriptionValue,
            Tag::Br => NodeKind::LineBreak,
            other => NodeKind::Inline(other),
        }
    }

    /// Short name used in errors and logs.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Text(_) => "text",
            other => other.tag().map(Tag::name).unwrap_or("node"),
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only an empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn data(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes.get(id.0).ok_or(EditError::NotFound(id))
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes.get_mut(id.0).ok_or(EditError::NotFound(id))
    }

    /// Create a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Text(text.into()))
    }

    /// Kind of a node. Panics if `id` does not belong to this tree.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Retag an element. Text nodes and line breaks keep their kind.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> Result<()> {
        let data = self.data_mut(id)?;
        if !data.kind.is_element() || !kind.is_element() {
            return Err(EditError::NotAnElement(id));
        }
        data.kind = kind;
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|d| d.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|d| d.children.as_slice())
            .unwrap_or(&[])
    }

    /// Child at `offset`, the "node at offset" of an element position.
    pub fn child(&self, id: NodeId, offset: usize) -> Option<NodeId> {
        self.children(id).get(offset).copied()
    }

    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Replace the text of a text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        match &mut self.data_mut(id)?.kind {
            NodeKind::Text(s) => {
                *s = text.into();
                Ok(())
            }
            _ => Err(EditError::UnexpectedShape {
                node: id,
                expected: "a text node",
            }),
        }
    }

    /// Length of a node in position offsets: chars for text, children otherwise.
    pub fn len(&self, id: NodeId) -> usize {
        match self.text(id) {
            Some(s) => s.chars().count(),
            None => self.children(id).len(),
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(s) = self.text(node) {
                out.push_str(s);
            }
        }
        out
    }

    /// Index of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Result<usize> {
        let parent = self.parent(id).ok_or(EditError::Detached(id))?;
        self.children(parent)
            .iter()
            .position(|&c| c == id)
            .ok_or(EditError::Detached(id))
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// First node, starting at `id` itself and walking up, matching `pred`.
    pub fn nearest(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| pred(self.kind(n)))
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.ancestors(node).contains(&ancestor)
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// `id` and all its descendants in document (pre-)order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// Child indices leading from the root to `id`.
    pub fn path(&self, id: NodeId) -> Result<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = id;
        while current != self.root {
            path.push(self.index_in_parent(current)?);
            current = self.parent(current).ok_or(EditError::Detached(current))?;
        }
        path.reverse();
        Ok(path)
    }

    // ============ Mutation primitives ============

    /// Attach a detached node as child `index` of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        if self.data(child)?.parent.is_some() || child == self.root {
            return Err(EditError::StillAttached(child));
        }
        let data = self.data_mut(parent)?;
        if !data.kind.is_element() {
            return Err(EditError::NotAnElement(parent));
        }
        if index > data.children.len() {
            return Err(EditError::InvalidPosition {
                node: parent,
                offset: index,
            });
        }
        data.children.insert(index, child);
        self.data_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child)
    }

    /// Insert a detached node as the previous sibling of `reference`.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        let parent = self.parent(reference).ok_or(EditError::Detached(reference))?;
        let index = self.index_in_parent(reference)?;
        self.insert_child(parent, index, node)
    }

    /// Insert a detached node as the next sibling of `reference`.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        let parent = self.parent(reference).ok_or(EditError::Detached(reference))?;
        let index = self.index_in_parent(reference)?;
        self.insert_child(parent, index + 1, node)
    }

    /// Remove a node (and its subtree) from its parent, returning its old index.
    pub fn detach(&mut self, id: NodeId) -> Result<usize> {
        let parent = self.parent(id).ok_or(EditError::Detached(id))?;
        let index = self.index_in_parent(id)?;
        self.data_mut(parent)?.children.remove(index);
        self.data_mut(id)?.parent = None;
        Ok(index)
    }

    /// Put the detached node `new` where `old` is, detaching `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        if self.data(new)?.parent.is_some() {
            return Err(EditError::StillAttached(new));
        }
        let parent = self.parent(old).ok_or(EditError::Detached(old))?;
        let index = self.detach(old)?;
        self.insert_child(parent, index, new)
    }

    /// Move `from`'s children starting at `start` to the end of `to`.
    pub fn move_children(&mut self, from: NodeId, start: usize, to: NodeId) -> Result<()> {
        if !self.kind(to).is_element() {
            return Err(EditError::NotAnElement(to));
        }
        let len = self.children(from).len();
        if start > len {
            return Err(EditError::InvalidPosition {
                node: from,
                offset: start,
            });
        }
        let moved: Vec<NodeId> = self.data_mut(from)?.children.drain(start..).collect();
        for child in moved {
            self.data_mut(child)?.parent = Some(to);
            self.data_mut(to)?.children.push(child);
        }
        Ok(())
    }

    /// Take `child` out of its container and put the detached `replacement`
    /// in its place at the container's level.
    ///
    /// A container left with no other children is replaced outright. A child
    /// in the middle splits the container: a new container of the same kind
    /// takes the following siblings and is returned.
    pub fn split_around(&mut self, child: NodeId, replacement: NodeId) -> Result<Option<NodeId>> {
        let container = self.parent(child).ok_or(EditError::Detached(child))?;
        let count = self.children(container).len();
        if count == 1 {
            self.replace(container, replacement)?;
            return Ok(None);
        }

        let index = self.detach(child)?;
        if index == 0 {
            self.insert_before(container, replacement)?;
            Ok(None)
        } else if index == count - 1 {
            self.insert_after(container, replacement)?;
            Ok(None)
        } else {
            let tail = self.create(self.kind(container).clone());
            self.move_children(container, index, tail)?;
            self.insert_after(container, replacement)?;
            self.insert_after(replacement, tail)?;
            Ok(Some(tail))
        }
    }

    /// Split a text node at a char offset. The right half becomes a new text
    /// node inserted after the original, which keeps the left half.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId> {
        let text = self
            .text(id)
            .ok_or(EditError::UnexpectedShape {
                node: id,
                expected: "a text node",
            })?
            .to_string();
        let byte = char_to_byte(&text, offset).ok_or(EditError::InvalidPosition {
            node: id,
            offset,
        })?;
        let (left, right) = text.split_at(byte);
        let right = self.create_text(right);
        self.set_text(id, left)?;
        self.insert_after(id, right)?;
        Ok(right)
    }

    /// Split an element before child `index`. A new element of the same kind
    /// takes the children from `index` on and is inserted after the original.
    pub fn split_element(&mut self, id: NodeId, index: usize) -> Result<NodeId> {
        let kind = self.kind(id).clone();
        if !kind.is_element() || kind == NodeKind::Root {
            return Err(EditError::NotAnElement(id));
        }
        let right = self.create(kind);
        self.move_children(id, index, right)?;
        self.insert_after(id, right)?;
        Ok(right)
    }

    /// Split every node from `at` up to and including `upto`, which must
    /// contain the position. Returns the new right-hand sibling of `upto`.
    ///
    /// Inline wrappers between the position and `upto` are split too, so the
    /// right half carries the same formatting as the left.
    pub fn split_at(&mut self, at: Position, upto: NodeId) -> Result<NodeId> {
        if !self.contains(upto, at.node) {
            return Err(EditError::UnexpectedShape {
                node: at.node,
                expected: "inside the node being split",
            });
        }

        // Turn a text position into an element position in its parent.
        let (mut node, mut index) = if self.kind(at.node).is_text() {
            let right = self.split_text(at.node, at.offset)?;
            let parent = self.parent(right).ok_or(EditError::Detached(right))?;
            (parent, self.index_in_parent(right)?)
        } else {
            (at.node, at.offset)
        };

        loop {
            let right = self.split_element(node, index)?;
            if node == upto {
                return Ok(right);
            }
            index = self.index_in_parent(right)?;
            node = self.parent(right).ok_or(EditError::Detached(right))?;
        }
    }

    /// Text node where a cursor placed at the very start of `id` should land,
    /// creating an empty one if the first-child chain ends without text.
    pub fn first_text_in(&mut self, id: NodeId) -> Result<NodeId> {
        let mut node = id;
        loop {
            if self.kind(node).is_text() {
                return Ok(node);
            }
            match self.child(node, 0) {
                Some(child) if self.kind(child).is_element() => node = child,
                Some(child) if self.kind(child).is_text() => return Ok(child),
                _ => {
                    let text = self.create_text("");
                    self.insert_child(node, 0, text)?;
                    return Ok(text);
                }
            }
        }
    }

    /// Remove everything between the ends of `selection`, returning the
    /// collapsed position where the removed range started.
    ///
    /// Nodes fully inside the range are detached; the boundary text nodes are
    /// trimmed. Partially selected elements are kept and not merged.
    pub fn delete_contents(&mut self, selection: &Selection) -> Result<Position> {
        let start = selection.start;
        let end = selection.end;
        if start == end {
            return Ok(start);
        }

        if start.node == end.node && self.kind(start.node).is_text() {
            let text = self.text(start.node).unwrap_or_default().to_string();
            let (from, to) = (
                char_to_byte(&text, start.offset),
                char_to_byte(&text, end.offset),
            );
            let (Some(from), Some(to)) = (from, to) else {
                return Err(EditError::InvalidPosition {
                    node: start.node,
                    offset: end.offset,
                });
            };
            let mut kept = text[..from].to_string();
            kept.push_str(&text[to..]);
            self.set_text(start.node, kept)?;
            return Ok(start);
        }

        let start_key = self.position_key(start)?;
        let end_key = self.position_key(end)?;
        let mut doomed = Vec::new();
        for node in self.descendants(self.root) {
            if node == self.root {
                continue;
            }
            let (before, after) = self.node_keys(node)?;
            let inside = start_key <= before && after <= end_key;
            let parent_inside = doomed
                .iter()
                .any(|&d| self.ancestors(node).contains(&d));
            if inside && !parent_inside {
                doomed.push(node);
            }
        }
        for node in doomed {
            self.detach(node)?;
        }

        if let Some(text) = self.text(start.node).map(str::to_string) {
            let byte = char_to_byte(&text, start.offset).ok_or(EditError::InvalidPosition {
                node: start.node,
                offset: start.offset,
            })?;
            self.set_text(start.node, &text[..byte])?;
        }
        if let Some(text) = self.text(end.node).map(str::to_string) {
            let byte = char_to_byte(&text, end.offset).ok_or(EditError::InvalidPosition {
                node: end.node,
                offset: end.offset,
            })?;
            self.set_text(end.node, &text[byte..])?;
        }

        Ok(start)
    }

    // ============ Ordering ============

    /// Sort key of a boundary position: the path to its node plus the offset.
    ///
    /// Keys compare lexicographically in document order: a boundary before
    /// child `i` is a prefix of every key inside child `i`, so it sorts first.
    pub fn position_key(&self, pos: Position) -> Result<Vec<usize>> {
        let mut key = self.path(pos.node)?;
        key.push(pos.offset);
        Ok(key)
    }

    /// Keys of the boundaries immediately before and after a node.
    fn node_keys(&self, id: NodeId) -> Result<(Vec<usize>, Vec<usize>)> {
        let before = self.path(id)?;
        let mut after = before.clone();
        match after.last_mut() {
            Some(last) => *last += 1,
            None => after.push(usize::MAX),
        }
        Ok((before, after))
    }

    /// Compare two positions in document order.
    pub fn compare(&self, a: Position, b: Position) -> Result<Ordering> {
        Ok(self.position_key(a)?.cmp(&self.position_key(b)?))
    }

    /// Attached nodes the selection touches, in document order.
    ///
    /// A node is touched when the range overlaps it, or when a collapsed
    /// selection lies inside it. The root is never reported.
    pub fn nodes_in_range(&self, selection: &Selection) -> Result<Vec<NodeId>> {
        let start = self.position_key(selection.start)?;
        let end = self.position_key(selection.end)?;
        let mut out = Vec::new();
        for node in self.descendants(self.root) {
            if node == self.root {
                continue;
            }
            let (before, after) = self.node_keys(node)?;
            let overlaps = if start == end {
                before < start && start < after
            } else {
                before < end && start < after
            };
            if overlaps {
                out.push(node);
            }
        }
        Ok(out)
    }

    /// Check that a position addresses an attached node within bounds.
    pub fn validate_position(&self, pos: Position) -> Result<()> {
        self.data(pos.node)?;
        if !self.is_attached(pos.node) {
            return Err(EditError::Detached(pos.node));
        }
        if pos.offset > self.len(pos.node) || self.kind(pos.node) == &NodeKind::LineBreak {
            return Err(EditError::InvalidPosition {
                node: pos.node,
                offset: pos.offset,
            });
        }
        Ok(())
    }

    /// Check both ends of a selection and their order.
    pub fn validate_selection(&self, selection: &Selection) -> Result<()> {
        self.validate_position(selection.start)?;
        self.validate_position(selection.end)?;
        if self.compare(selection.start, selection.end)? == Ordering::Greater {
            return Err(EditError::InvertedSelection);
        }
        Ok(())
    }

    fn subtree_eq(&self, a: NodeId, other: &Tree, b: NodeId) -> bool {
        self.kind(a) == other.kind(b)
            && self.children(a).len() == other.children(b).len()
            && self
                .children(a)
                .iter()
                .zip(other.children(b))
                .all(|(&x, &y)| self.subtree_eq(x, other, y))
    }
}

/// Structural equality: same shape, kinds and text reachable from the root.
/// Detached nodes and arena layout are ignored.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(self.root, other, other.root)
    }
}

/// Byte index of a char offset, `None` past the end.
pub(crate) fn char_to_byte(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// root > p > [text "hello", b > text "world"]
    fn sample() -> (Tree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let p = tree.create(NodeKind::Paragraph);
        let hello = tree.create_text("hello");
        let b = tree.create(NodeKind::Inline(Tag::B));
        let world = tree.create_text("world");
        tree.append_child(tree.root(), p).unwrap();
        tree.append_child(p, hello).unwrap();
        tree.append_child(p, b).unwrap();
        tree.append_child(b, world).unwrap();
        (tree, p, hello, b, world)
    }

    // ============ Structure ============

    #[test]
    fn test_ancestors_and_nearest() {
        let (tree, p, _, b, world) = sample();
        assert_eq!(tree.ancestors(world), vec![b, p, tree.root()]);
        assert_eq!(tree.nearest(world, |k| k == &NodeKind::Paragraph), Some(p));
        assert_eq!(tree.nearest(world, NodeKind::is_description_item), None);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let (tree, p, ..) = sample();
        assert_eq!(tree.text_content(p), "helloworld");
    }

    #[test]
    fn test_path_follows_child_indices() {
        let (tree, _, hello, _, world) = sample();
        assert_eq!(tree.path(hello).unwrap(), vec![0, 0]);
        assert_eq!(tree.path(world).unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn test_attached_node_cannot_be_inserted_twice() {
        let (mut tree, p, hello, ..) = sample();
        let result = tree.append_child(p, hello);
        assert!(matches!(result, Err(EditError::StillAttached(id)) if id == hello));
    }

    #[test]
    fn test_text_cannot_hold_children() {
        let (mut tree, _, hello, ..) = sample();
        let extra = tree.create_text("x");
        assert!(matches!(
            tree.append_child(hello, extra),
            Err(EditError::NotAnElement(_))
        ));
    }

    #[test]
    fn test_detach_and_replace() {
        let (mut tree, p, hello, ..) = sample();
        let dl = tree.create(NodeKind::DescriptionList);
        tree.replace(p, dl).unwrap();

        assert_eq!(tree.children(tree.root()), &[dl]);
        assert_eq!(tree.parent(p), None);
        assert!(!tree.is_attached(hello));
        assert!(matches!(tree.detach(p), Err(EditError::Detached(_))));
    }

    #[test]
    fn test_set_kind_refuses_text() {
        let (mut tree, p, hello, ..) = sample();
        tree.set_kind(p, NodeKind::DescriptionTerm).unwrap();
        assert_eq!(tree.kind(p), &NodeKind::DescriptionTerm);
        assert!(tree.set_kind(hello, NodeKind::Paragraph).is_err());
    }

    /// root > ul > li * n, each li holding its index as text
    fn list_of(n: usize) -> (Tree, NodeId, Vec<NodeId>) {
        let mut tree = Tree::new();
        let ul = tree.create(NodeKind::List(ListKind::Unordered));
        tree.append_child(tree.root(), ul).unwrap();
        let items = (0..n)
            .map(|i| {
                let li = tree.create(NodeKind::ListItem);
                let text = tree.create_text(i.to_string());
                tree.append_child(li, text).unwrap();
                tree.append_child(ul, li).unwrap();
                li
            })
            .collect();
        (tree, ul, items)
    }

    #[test]
    fn test_split_around_only_child_replaces_container() {
        let (mut tree, ul, items) = list_of(1);
        let p = tree.create(NodeKind::Paragraph);
        assert_eq!(tree.split_around(items[0], p).unwrap(), None);
        assert_eq!(tree.children(tree.root()), &[p]);
        assert!(!tree.is_attached(ul));
    }

    #[test]
    fn test_split_around_edges_keep_one_container() {
        let (mut tree, ul, items) = list_of(3);
        let first = tree.create(NodeKind::Paragraph);
        let last = tree.create(NodeKind::Paragraph);
        assert_eq!(tree.split_around(items[0], first).unwrap(), None);
        assert_eq!(tree.split_around(items[2], last).unwrap(), None);
        assert_eq!(tree.children(tree.root()), &[first, ul, last]);
        assert_eq!(tree.children(ul), &[items[1]]);
    }

    #[test]
    fn test_split_around_middle_creates_tail_of_same_kind() {
        let (mut tree, ul, items) = list_of(4);
        let p = tree.create(NodeKind::Paragraph);
        let tail = tree.split_around(items[1], p).unwrap().unwrap();

        assert_eq!(tree.children(tree.root()), &[ul, p, tail]);
        assert_eq!(tree.kind(tail), &NodeKind::List(ListKind::Unordered));
        assert_eq!(tree.children(ul), &[items[0]]);
        assert_eq!(tree.children(tail), &[items[2], items[3]]);
    }

    // ============ Splitting ============

    #[test]
    fn test_split_text_counts_chars() {
        let mut tree = Tree::new();
        let t = tree.create_text("héllo");
        tree.append_child(tree.root(), t).unwrap();

        let right = tree.split_text(t, 2).unwrap();
        assert_eq!(tree.text(t), Some("hé"));
        assert_eq!(tree.text(right), Some("llo"));
        assert!(tree.split_text(t, 3).is_err());
    }

    #[test]
    fn test_split_at_carries_inline_wrappers() {
        let (mut tree, p, _, _, world) = sample();
        let right = tree.split_at(Position::new(world, 2), p).unwrap();

        assert_eq!(tree.children(tree.root()), &[p, right]);
        assert_eq!(tree.text_content(p), "hellowo");
        assert_eq!(tree.text_content(right), "rld");
        let wrapper = tree.child(right, 0).unwrap();
        assert_eq!(tree.kind(wrapper), &NodeKind::Inline(Tag::B));
    }

    #[test]
    fn test_split_at_rejects_outside_position() {
        let (mut tree, p, hello, ..) = sample();
        let other = tree.create(NodeKind::Paragraph);
        tree.append_child(tree.root(), other).unwrap();
        assert!(tree.split_at(Position::new(hello, 1), other).is_err());
        assert_eq!(tree.text_content(p), "helloworld");
    }

    #[test]
    fn test_first_text_in_creates_missing_text() {
        let mut tree = Tree::new();
        let dd = tree.create(NodeKind::DescriptionValue);
        tree.append_child(tree.root(), dd).unwrap();

        let text = tree.first_text_in(dd).unwrap();
        assert_eq!(tree.parent(text), Some(dd));
        assert_eq!(tree.text(text), Some(""));
        assert_eq!(tree.first_text_in(dd).unwrap(), text);
    }

    // ============ Ordering and ranges ============

    #[test]
    fn test_compare_element_boundary_with_text_inside() {
        let (tree, p, hello, _, world) = sample();
        let before_b = Position::new(p, 1);
        assert_eq!(
            tree.compare(Position::new(hello, 5), before_b).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            tree.compare(before_b, Position::new(world, 0)).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn test_nodes_in_range_for_cursor_reports_ancestors() {
        let (tree, p, _, b, world) = sample();
        let nodes = tree
            .nodes_in_range(&Selection::collapsed(Position::new(world, 1)))
            .unwrap();
        assert_eq!(nodes, vec![p, b, world]);
    }

    #[test]
    fn test_nodes_in_range_excludes_nodes_touching_only_at_edges() {
        let (tree, p, hello, ..) = sample();
        let selection = Selection::new(Position::new(hello, 1), Position::new(hello, 5));
        let nodes = tree.nodes_in_range(&selection).unwrap();
        assert_eq!(nodes, vec![p, hello]);
    }

    #[test]
    fn test_delete_contents_across_wrapper() {
        let (mut tree, p, hello, _, world) = sample();
        let selection = Selection::new(Position::new(hello, 2), Position::new(world, 3));
        let cursor = tree.delete_contents(&selection).unwrap();

        assert_eq!(cursor, Position::new(hello, 2));
        assert_eq!(tree.text_content(p), "held");
    }

    #[test]
    fn test_validate_selection_rejects_inverted_range() {
        let (tree, _, hello, _, world) = sample();
        let inverted = Selection::new(Position::new(world, 0), Position::new(hello, 0));
        assert!(matches!(
            tree.validate_selection(&inverted),
            Err(EditError::InvertedSelection)
        ));
        assert!(tree.validate_position(Position::new(hello, 6)).is_err());
    }

    #[test]
    fn test_structural_equality_ignores_arena_layout() {
        let (a, ..) = sample();
        let (mut b, p, ..) = sample();
        let spare = b.create(NodeKind::DescriptionList);
        assert_eq!(a, b);

        b.append_child(p, spare).unwrap();
        assert!(a != b);
    }
}
