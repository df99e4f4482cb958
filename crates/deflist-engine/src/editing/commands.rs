//! The three description-list commands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::editing::classify::{CommandState, classify};
use crate::editing::factory::create_at;
use crate::editing::switch::switch_to;
use crate::editing::{Mutation, MutationKind};
use crate::error::{EditError, Result};
use crate::tree::{ItemKind, NodeId, NodeKind, Position, Selection, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// Create a description list at the cursor, or unwrap the one around it
    DescriptionList,
    /// Turn the selected items into terms
    DescriptionTerm,
    /// Turn the selected items into values
    DescriptionValue,
}

impl Command {
    pub const ALL: [Command; 3] = [
        Command::DescriptionList,
        Command::DescriptionTerm,
        Command::DescriptionValue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::DescriptionList => "descriptionList",
            Command::DescriptionTerm => "descriptionTerm",
            Command::DescriptionValue => "descriptionValue",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self> {
        Command::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| EditError::UnknownCommand(s.to_string()))
    }
}

pub fn state(tree: &Tree, selection: &Selection, command: Command) -> Result<CommandState> {
    Ok(classify(tree, selection)?.get(command))
}

/// Run `command` against the selection. A disabled command changes nothing.
pub fn exec(tree: &mut Tree, selection: &Selection, command: Command) -> Result<Mutation> {
    let state = state(tree, selection, command)?;
    log::debug!("{command} is {state:?}");

    match (command, state) {
        (_, CommandState::Disabled) => Ok(Mutation::unchanged(*selection)),
        (Command::DescriptionTerm, _) => switch_to(tree, selection, ItemKind::Term),
        (Command::DescriptionValue, _) => switch_to(tree, selection, ItemKind::Value),
        (Command::DescriptionList, CommandState::Off) => create_list(tree, selection),
        (Command::DescriptionList, CommandState::On) => remove_list(tree, selection),
    }
}

/// Replace the block at the cursor with a list holding one empty term.
fn create_list(tree: &mut Tree, selection: &Selection) -> Result<Mutation> {
    let start = selection.start.node;
    let target = match tree.nearest(start, |k| {
        matches!(k, NodeKind::Paragraph | NodeKind::ListItem)
    }) {
        Some(block) => block,
        None => wrap_inline_run(tree, start)?,
    };

    let list = create_at(tree, target)?;
    let term = tree.create(NodeKind::DescriptionTerm);
    let text = tree.create_text("");
    tree.append_child(term, text)?;
    tree.append_child(list, term)?;

    Ok(Mutation {
        kind: MutationKind::CreateList,
        changed: vec![list, term],
        selection: Selection::collapsed(Position::new(text, 0)),
    })
}

/// Wrap the run of inline nodes at the root around `node` in a paragraph.
fn wrap_inline_run(tree: &mut Tree, node: NodeId) -> Result<NodeId> {
    let root = tree.root();
    let top = std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&n| tree.parent(n) == Some(root))
        .filter(|&n| tree.kind(n).is_inline())
        .ok_or_else(|| EditError::InvalidTarget {
            node,
            kind: tree.kind(node).label().to_string(),
        })?;

    let siblings = tree.children(root).to_vec();
    let index = tree.index_in_parent(top)?;
    let inline = |i: usize| tree.kind(siblings[i]).is_inline();
    let first = (0..index).rev().take_while(|&i| inline(i)).last().unwrap_or(index);
    let last = (index + 1..siblings.len())
        .take_while(|&i| inline(i))
        .last()
        .unwrap_or(index);

    let paragraph = tree.create(NodeKind::Paragraph);
    tree.insert_child(root, first, paragraph)?;
    for &child in &siblings[first..=last] {
        tree.detach(child)?;
        tree.append_child(paragraph, child)?;
    }
    Ok(paragraph)
}

/// Unwrap the description list around the selection into plain blocks.
///
/// Inline content of each item is gathered into paragraphs and nested
/// blocks move up as they are. Text nodes are moved, not copied, so
/// positions inside them stay valid.
fn remove_list(tree: &mut Tree, selection: &Selection) -> Result<Mutation> {
    let is_list = |k: &NodeKind| k == &NodeKind::DescriptionList;
    let list = match tree.nearest(selection.start.node, is_list) {
        Some(list) => list,
        None => tree
            .nodes_in_range(selection)?
            .into_iter()
            .find(|&n| is_list(tree.kind(n)))
            .ok_or(EditError::UnexpectedShape {
                node: selection.start.node,
                expected: "inside a description list",
            })?,
    };
    let parent = tree.parent(list).ok_or(EditError::Detached(list))?;
    let base = tree.index_in_parent(list)?;

    let items = tree.children(list).to_vec();
    let mut blocks = Vec::new();
    // Index into `blocks` where each item's output begins.
    let mut starts = Vec::with_capacity(items.len());
    for &item in &items {
        starts.push(blocks.len());
        tree.detach(item)?;
        if !tree.kind(item).is_description_item() {
            blocks.push(item);
            continue;
        }
        let content = tree.children(item).to_vec();
        if content.is_empty() {
            blocks.push(tree.create(NodeKind::Paragraph));
        }
        let mut run: Option<NodeId> = None;
        for child in content {
            tree.detach(child)?;
            if !tree.kind(child).is_inline() {
                run = None;
                blocks.push(child);
                continue;
            }
            let paragraph = match run {
                Some(p) => p,
                None => {
                    let p = tree.create(NodeKind::Paragraph);
                    blocks.push(p);
                    run = Some(p);
                    p
                }
            };
            tree.append_child(paragraph, child)?;
        }
    }

    tree.detach(list)?;
    for (i, &block) in blocks.iter().enumerate() {
        tree.insert_child(parent, base + i, block)?;
    }

    // Ends that addressed the list or an item now sit between the blocks,
    // and parent offsets past the list move by the change in child count.
    let relocate = |pos: Position| {
        if tree.is_attached(pos.node) {
            if pos.node == parent && pos.offset > base {
                return Position::new(parent, pos.offset - 1 + blocks.len());
            }
            return pos;
        }
        let slot = if pos.node == list {
            starts.get(pos.offset).copied().unwrap_or(blocks.len())
        } else {
            items
                .iter()
                .position(|&item| item == pos.node)
                .map_or(0, |i| starts[i])
        };
        Position::new(parent, base + slot)
    };
    let selection = Selection::new(relocate(selection.start), relocate(selection.end));

    Ok(Mutation {
        kind: MutationKind::RemoveList,
        changed: blocks,
        selection,
    })
}
