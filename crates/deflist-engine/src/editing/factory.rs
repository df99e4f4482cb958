//! Creating an empty description list in place of a block.

use crate::error::{EditError, Result};
use crate::tree::{NodeId, NodeKind, Tree};

/// Replace `target` with a new, empty description list and return it.
///
/// - A paragraph is replaced in place. If it is the only block of a list
///   item, the list item is treated as the target instead.
/// - A list item is cut out of its list; the list is replaced when the item
///   was its only one, and split around the new list otherwise.
///
/// The target's content is dropped. Anything else is an invalid target.
pub fn create_at(tree: &mut Tree, target: NodeId) -> Result<NodeId> {
    match tree.kind(target).clone() {
        NodeKind::Paragraph => {
            let parent = tree.parent(target).ok_or(EditError::Detached(target))?;
            if tree.kind(parent) == &NodeKind::ListItem && tree.children(parent).len() == 1 {
                replace_list_item(tree, parent)
            } else {
                let list = tree.create(NodeKind::DescriptionList);
                tree.replace(target, list)?;
                Ok(list)
            }
        }
        NodeKind::ListItem => replace_list_item(tree, target),
        other => Err(EditError::InvalidTarget {
            node: target,
            kind: other.label().to_string(),
        }),
    }
}

fn replace_list_item(tree: &mut Tree, item: NodeId) -> Result<NodeId> {
    let parent = tree.parent(item).ok_or(EditError::Detached(item))?;
    if !matches!(tree.kind(parent), NodeKind::List(_)) {
        return Err(EditError::UnexpectedShape {
            node: parent,
            expected: "a list",
        });
    }
    let list = tree.create(NodeKind::DescriptionList);
    tree.split_around(item, list)?;
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Parse `input`, pick the target with `find`, create and serialize.
    fn create(input: &str, find: impl Fn(&Tree) -> NodeId) -> String {
        let mut tree = markup::parse(input).unwrap().tree;
        let target = find(&tree);
        let list = create_at(&mut tree, target).unwrap();
        assert_eq!(tree.kind(list), &NodeKind::DescriptionList);
        assert!(tree.children(list).is_empty());
        markup::serialize(&tree, None)
    }

    /// First node of `kind` whose text content is `text`.
    fn by_text(kind: NodeKind, text: &'static str) -> impl Fn(&Tree) -> NodeId {
        move |tree| {
            tree.descendants(tree.root())
                .into_iter()
                .find(|&n| tree.kind(n) == &kind && tree.text_content(n) == text)
                .unwrap()
        }
    }

    #[rstest]
    #[case::paragraph("<p>a</p><p>b</p><p>c</p>", NodeKind::Paragraph, "b", "<p>a</p><dl></dl><p>c</p>")]
    #[case::only_item("<p>x</p><ul><li>a</li></ul>", NodeKind::ListItem, "a", "<p>x</p><dl></dl>")]
    #[case::first_item(
        "<ul><li>a</li><li>b</li></ul>",
        NodeKind::ListItem,
        "a",
        "<dl></dl><ul><li>b</li></ul>"
    )]
    #[case::last_item(
        "<ol><li>a</li><li>b</li></ol>",
        NodeKind::ListItem,
        "b",
        "<ol><li>a</li></ol><dl></dl>"
    )]
    #[case::middle_item(
        "<ol><li>a</li><li>b</li><li>c</li></ol>",
        NodeKind::ListItem,
        "b",
        "<ol><li>a</li></ol><dl></dl><ol><li>c</li></ol>"
    )]
    #[case::paragraph_alone_in_item(
        "<ul><li>a</li><li><p>b</p></li><li>c</li></ul>",
        NodeKind::Paragraph,
        "b",
        "<ul><li>a</li></ul><dl></dl><ul><li>c</li></ul>"
    )]
    #[case::paragraph_among_blocks(
        "<ul><li><p>a</p><p>b</p></li></ul>",
        NodeKind::Paragraph,
        "b",
        "<ul><li><p>a</p><dl></dl></li></ul>"
    )]
    fn test_create_at(
        #[case] input: &str,
        #[case] kind: NodeKind,
        #[case] text: &'static str,
        #[case] expected: &str,
    ) {
        assert_eq!(create(input, by_text(kind, text)), expected);
    }

    #[rstest]
    #[case("<dl><dt>a</dt></dl>", NodeKind::DescriptionTerm)]
    #[case("<p><b>a</b></p>", NodeKind::Inline(deflist_syntax::Tag::B))]
    #[case("<ul><li>a</li></ul>", NodeKind::List(crate::tree::ListKind::Unordered))]
    fn test_invalid_target(#[case] input: &str, #[case] kind: NodeKind) {
        let mut tree = markup::parse(input).unwrap().tree;
        let target = by_text(kind, "a")(&tree);
        let before = tree.clone();
        assert!(matches!(
            create_at(&mut tree, target),
            Err(EditError::InvalidTarget { .. })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_list_item_outside_a_list_is_rejected() {
        let mut tree = markup::parse("<li>a</li>").unwrap().tree;
        let target = by_text(NodeKind::ListItem, "a")(&tree);
        assert!(matches!(
            create_at(&mut tree, target),
            Err(EditError::UnexpectedShape { .. })
        ));
    }
}
