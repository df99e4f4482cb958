//! Enter-key handling inside description lists.
//!
//! Which rule applies depends on the item's content and the cursor:
//!
//! | item      | cursor        | result                                         |
//! |-----------|---------------|------------------------------------------------|
//! | non-empty | end           | new sibling of the other kind after the item   |
//! | non-empty | start, middle | item split in two of the same kind             |
//! | empty     | only item     | list replaced by an empty paragraph            |
//! | empty     | several items | list split in two around an empty paragraph    |
//!
//! The term/value alternation of the first rule holds whatever kinds the
//! neighbouring items have.

use crate::editing::classify::nearest_item;
use crate::editing::{EditOptions, Mutation, MutationKind};
use crate::error::{EditError, Result};
use crate::tree::{ItemKind, NodeId, NodeKind, Position, Selection, Tree};

/// What Enter did, if anything.
#[derive(Debug, Clone, PartialEq)]
pub enum EnterOutcome {
    /// The selection is not in a description item (or spans several); the
    /// host's default Enter behaviour applies.
    NotHandled,
    Handled(Mutation),
}

/// Handle Enter for `selection`.
pub fn on_enter(
    tree: &mut Tree,
    selection: &Selection,
    options: &EditOptions,
) -> Result<EnterOutcome> {
    let Some((item, kind)) = nearest_item(tree, selection.start.node) else {
        return Ok(EnterOutcome::NotHandled);
    };

    let cursor = if selection.is_collapsed() {
        selection.start
    } else {
        if nearest_item(tree, selection.end.node).map(|(n, _)| n) != Some(item) {
            log::debug!("enter: range spans several items, not handled");
            return Ok(EnterOutcome::NotHandled);
        }
        tree.delete_contents(selection)?
    };

    let list = tree.parent(item).ok_or(EditError::Detached(item))?;
    if tree.kind(list) != &NodeKind::DescriptionList {
        return Err(EditError::UnexpectedShape {
            node: list,
            expected: "a description list",
        });
    }

    let mutation = if is_empty_item(tree, item, options) {
        leave_list(tree, item, tree.children(list).len() == 1)?
    } else if has_content_after(tree, item, cursor, options)? {
        split_item(tree, item, cursor)?
    } else {
        new_sibling(tree, item, kind)?
    };

    log::debug!("enter in {kind:?} item {item}: {:?}", mutation.kind);
    Ok(EnterOutcome::Handled(mutation))
}

/// An item is empty when nothing in it renders: its text is placeholders
/// only, and it holds no nested lists or items.
pub fn is_empty_item(tree: &Tree, item: NodeId, options: &EditOptions) -> bool {
    tree.descendants(item).into_iter().skip(1).all(|node| match tree.kind(node) {
        NodeKind::Text(text) => text.chars().all(|c| options.is_placeholder(c)),
        NodeKind::Inline(_) | NodeKind::LineBreak | NodeKind::Paragraph => true,
        _ => false,
    })
}

/// Whether anything visible in `item` follows `cursor`.
fn has_content_after(
    tree: &Tree,
    item: NodeId,
    cursor: Position,
    options: &EditOptions,
) -> Result<bool> {
    let cursor_key = tree.position_key(cursor)?;
    for node in tree.descendants(item).into_iter().skip(1) {
        let visible_after = match tree.kind(node) {
            NodeKind::Text(text) if node == cursor.node => text
                .chars()
                .skip(cursor.offset)
                .any(|c| !options.is_placeholder(c)),
            NodeKind::Text(text) => {
                tree.path(node)? >= cursor_key
                    && text.chars().any(|c| !options.is_placeholder(c))
            }
            NodeKind::List(_) | NodeKind::DescriptionList => tree.path(node)? >= cursor_key,
            _ => false,
        };
        if visible_after {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Rule 1: a new, empty item of the other kind right after `item`.
fn new_sibling(tree: &mut Tree, item: NodeId, kind: ItemKind) -> Result<Mutation> {
    let sibling = tree.create(NodeKind::item(kind.toggled()));
    let text = tree.create_text("");
    tree.append_child(sibling, text)?;
    tree.insert_after(item, sibling)?;
    Ok(Mutation {
        kind: MutationKind::NewSibling,
        changed: vec![sibling],
        selection: Selection::collapsed(Position::new(text, 0)),
    })
}

/// Rule 2: split `item` at the cursor into two items of its kind.
fn split_item(tree: &mut Tree, item: NodeId, cursor: Position) -> Result<Mutation> {
    let right = tree.split_at(cursor, item)?;
    let text = tree.first_text_in(right)?;
    Ok(Mutation {
        kind: MutationKind::SplitItem,
        changed: vec![right],
        selection: Selection::collapsed(Position::new(text, 0)),
    })
}

fn empty_paragraph(tree: &mut Tree) -> Result<(NodeId, NodeId)> {
    let paragraph = tree.create(NodeKind::Paragraph);
    let text = tree.create_text("");
    tree.append_child(paragraph, text)?;
    Ok((paragraph, text))
}

/// Rules 3 and 4: drop the empty item, leaving an empty paragraph in its
/// place at the list's level. A sole item takes the whole list with it.
fn leave_list(tree: &mut Tree, item: NodeId, sole: bool) -> Result<Mutation> {
    let (paragraph, text) = empty_paragraph(tree)?;
    let tail = tree.split_around(item, paragraph)?;
    Ok(Mutation {
        kind: if sole {
            MutationKind::EscapeList
        } else {
            MutationKind::SplitList
        },
        changed: std::iter::once(paragraph).chain(tail).collect(),
        selection: Selection::collapsed(Position::new(text, 0)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn enter(input: &str) -> String {
        let fragment = markup::parse(input).unwrap();
        let mut tree = fragment.tree;
        let selection = fragment.selection.unwrap();
        let outcome = on_enter(&mut tree, &selection, &EditOptions::default()).unwrap();
        match outcome {
            EnterOutcome::Handled(mutation) => markup::serialize(&tree, Some(&mutation.selection)),
            EnterOutcome::NotHandled => panic!("enter was not handled for {input}"),
        }
    }

    #[rstest]
    // Rule 1: alternation at item end
    #[case("<dl><dt>foo[]</dt></dl>", "<dl><dt>foo</dt><dd>[]</dd></dl>")]
    #[case("<dl><dd>foo[]</dd></dl>", "<dl><dd>foo</dd><dt>[]</dt></dl>")]
    #[case(
        "<dl><dt>a</dt><dt>b[]</dt><dt>c</dt></dl>",
        "<dl><dt>a</dt><dt>b</dt><dd>[]</dd><dt>c</dt></dl>"
    )]
    #[case("<dl><dt><b>foo[]</b></dt></dl>", "<dl><dt><b>foo</b></dt><dd>[]</dd></dl>")]
    #[case("<dl><dt>foo[]&#8203;</dt></dl>", "<dl><dt>foo&#8203;</dt><dd>[]</dd></dl>")]
    // Rule 2: split inside the item
    #[case("<dl><dt>fo[]o</dt></dl>", "<dl><dt>fo</dt><dt>[]o</dt></dl>")]
    #[case("<dl><dd>[]foo</dd></dl>", "<dl><dd></dd><dd>[]foo</dd></dl>")]
    #[case(
        "<dl><dd><b>fo[]o</b>bar</dd></dl>",
        "<dl><dd><b>fo</b></dd><dd><b>[]o</b>bar</dd></dl>"
    )]
    #[case("<dl><dd><p>a[]b</p></dd></dl>", "<dl><dd><p>a</p></dd><dd><p>[]b</p></dd></dl>")]
    // Rule 3: escape the list
    #[case("<p>x</p><dl><dt>[]</dt></dl><p>y</p>", "<p>x</p><p>[]</p><p>y</p>")]
    #[case("<dl><dd>[]&#8203;</dd></dl>", "<p>[]</p>")]
    #[case("<dl><dd>[]<br></dd></dl>", "<p>[]</p>")]
    // Rule 4: split the list
    #[case(
        "<dl><dd>a</dd><dt>[]</dt><dd>b</dd></dl>",
        "<dl><dd>a</dd></dl><p>[]</p><dl><dd>b</dd></dl>"
    )]
    #[case("<dl><dt>[]</dt><dd>a</dd></dl>", "<p>[]</p><dl><dd>a</dd></dl>")]
    #[case("<dl><dt>a</dt><dd>[]</dd></dl>", "<dl><dt>a</dt></dl><p>[]</p>")]
    #[case(
        "<dl><dt>a</dt><dd>b</dd><dd>[]</dd><dt>c</dt><dd>d</dd></dl>",
        "<dl><dt>a</dt><dd>b</dd></dl><p>[]</p><dl><dt>c</dt><dd>d</dd></dl>"
    )]
    fn test_enter(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(enter(input), expected);
    }

    #[test]
    fn test_range_inside_one_item_is_deleted_first() {
        assert_eq!(
            enter("<dl><dt>f[oo]</dt></dl>"),
            "<dl><dt>f</dt><dd>[]</dd></dl>"
        );
        assert_eq!(
            enter("<dl><dt>[fo]o</dt></dl>"),
            "<dl><dt></dt><dt>[]o</dt></dl>"
        );
    }

    #[rstest]
    #[case("<p>fo[]o</p>")]
    #[case("<ul><li>x[]</li></ul>")]
    #[case("<dl><dt>f[oo</dt><dd>ba]r</dd></dl>")]
    fn test_not_handled(#[case] input: &str) {
        let fragment = markup::parse(input).unwrap();
        let mut tree = fragment.tree;
        let before = tree.clone();
        let selection = fragment.selection.unwrap();
        let outcome = on_enter(&mut tree, &selection, &EditOptions::default()).unwrap();
        assert_eq!(outcome, EnterOutcome::NotHandled);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_item_outside_list_is_an_error() {
        let fragment = markup::parse("<dt>x[]</dt>").unwrap();
        let mut tree = fragment.tree;
        let result = on_enter(&mut tree, &fragment.selection.unwrap(), &EditOptions::default());
        assert!(matches!(result, Err(EditError::UnexpectedShape { .. })));
    }

    #[test]
    fn test_split_preserves_text() {
        let input = "<dl><dd><b>ab[]c</b>d<i>e</i></dd></dl>";
        let fragment = markup::parse(input).unwrap();
        let original = fragment.tree.text_content(fragment.tree.root());
        let mut tree = fragment.tree;
        let selection = fragment.selection.unwrap();
        on_enter(&mut tree, &selection, &EditOptions::default()).unwrap();
        assert_eq!(tree.text_content(tree.root()), original);
    }

    #[test]
    fn test_placeholder_only_item_is_empty() {
        let options = EditOptions::default();
        let fragment = markup::parse("<dl><dt><b>&#8203;</b><br></dt><dd>x</dd></dl>").unwrap();
        let tree = &fragment.tree;
        let dl = tree.children(tree.root())[0];
        let items = tree.children(dl);
        assert!(is_empty_item(tree, items[0], &options));
        assert!(!is_empty_item(tree, items[1], &options));
    }
}
