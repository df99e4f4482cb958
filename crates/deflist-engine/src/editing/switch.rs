//! Converting description items between terms and values.

use crate::editing::classify::nearest_item;
use crate::editing::{Mutation, MutationKind};
use crate::error::Result;
use crate::tree::{ItemKind, NodeId, NodeKind, Selection, Tree};

/// Items the selection runs through, in document order.
///
/// That is the nearest item of every text or line break the selection
/// touches, plus the items around both ends. Nested lists contribute their
/// innermost items only.
pub fn selected_items(tree: &Tree, selection: &Selection) -> Result<Vec<NodeId>> {
    let leaves = tree
        .nodes_in_range(selection)?
        .into_iter()
        .filter(|&n| matches!(tree.kind(n), NodeKind::Text(_) | NodeKind::LineBreak));

    let mut items: Vec<NodeId> = Vec::new();
    for node in [selection.start.node, selection.end.node].into_iter().chain(leaves) {
        if let Some((item, _)) = nearest_item(tree, node)
            && !items.contains(&item)
        {
            items.push(item);
        }
    }

    let mut keyed = items
        .into_iter()
        .map(|item| Ok((tree.path(item)?, item)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort();
    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}

/// Retag every selected item as `target`. Items already of that kind, and
/// everything below the items, are left alone, so the selection stays valid.
pub fn switch_to(tree: &mut Tree, selection: &Selection, target: ItemKind) -> Result<Mutation> {
    let mut changed = Vec::new();
    for item in selected_items(tree, selection)? {
        if tree.kind(item).item_kind() != Some(target) {
            tree.set_kind(item, NodeKind::item(target))?;
            changed.push(item);
        }
    }

    log::debug!("switched {} item(s) to {target:?}", changed.len());
    if changed.is_empty() {
        return Ok(Mutation::unchanged(*selection));
    }
    Ok(Mutation {
        kind: MutationKind::Retag,
        changed,
        selection: *selection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn switch(input: &str, target: ItemKind) -> (String, MutationKind) {
        let fragment = markup::parse(input).unwrap();
        let mut tree = fragment.tree;
        let selection = fragment.selection.unwrap();
        let mutation = switch_to(&mut tree, &selection, target).unwrap();
        (markup::serialize(&tree, Some(&mutation.selection)), mutation.kind)
    }

    #[rstest]
    #[case(
        "<dl><dd>x</dd><dd>[foo</dd><dd>bar]</dd><dd>x</dd></dl>",
        ItemKind::Term,
        "<dl><dd>x</dd><dt>[foo</dt><dt>bar]</dt><dd>x</dd></dl>"
    )]
    #[case("<dl><dt>fo[]o</dt></dl>", ItemKind::Value, "<dl><dd>fo[]o</dd></dl>")]
    #[case(
        "<dl><dt>[a</dt><dd>b</dd><dt>c]</dt></dl>",
        ItemKind::Value,
        "<dl><dd>[a</dd><dd>b</dd><dd>c]</dd></dl>"
    )]
    #[case(
        "<dl><dt><b>[a</b></dt><dd><p>b]</p></dd></dl>",
        ItemKind::Term,
        "<dl><dt><b>[a</b></dt><dt><p>b]</p></dt></dl>"
    )]
    #[case(
        "<dl><dd><dl><dt>[]x</dt></dl></dd></dl>",
        ItemKind::Value,
        "<dl><dd><dl><dd>[]x</dd></dl></dd></dl>"
    )]
    fn test_switch(#[case] input: &str, #[case] target: ItemKind, #[case] expected: &str) {
        let (output, kind) = switch(input, target);
        assert_eq!(output, expected);
        assert_eq!(kind, MutationKind::Retag);
    }

    #[test]
    fn test_switch_is_idempotent() {
        let input = "<dl><dd>x</dd><dd>[foo</dd><dd>bar]</dd><dd>x</dd></dl>";
        let (once, _) = switch(input, ItemKind::Term);
        let (twice, kind) = switch(&once, ItemKind::Term);
        assert_eq!(twice, once);
        assert_eq!(kind, MutationKind::Unchanged);
    }

    #[test]
    fn test_selected_items_in_document_order() {
        let fragment = markup::parse("<dl><dt>[a</dt><dd>b</dd><dt>c]</dt><dd>d</dd></dl>").unwrap();
        let tree = &fragment.tree;
        let dl = tree.children(tree.root())[0];
        let items = selected_items(tree, &fragment.selection.unwrap()).unwrap();
        assert_eq!(items, tree.children(dl)[..3].to_vec());
    }

    #[test]
    fn test_partial_paragraph_selection_picks_only_items() {
        let fragment = markup::parse("<p>a[b</p><dl><dd>c]d</dd><dd>e</dd></dl>").unwrap();
        let tree = &fragment.tree;
        let dl = tree.children(tree.root())[1];
        let items = selected_items(tree, &fragment.selection.unwrap()).unwrap();
        assert_eq!(items, vec![tree.children(dl)[0]]);
    }
}
