//! Block classification: where the selection sits relative to description
//! lists, and what that means for each command's state.

use serde::{Deserialize, Serialize};

use crate::editing::Command;
use crate::error::Result;
use crate::tree::{ItemKind, NodeId, NodeKind, Selection, Tree};

/// Tri-state availability of a command for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandState {
    On,
    Off,
    Disabled,
}

impl std::fmt::Display for CommandState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CommandState::On => "on",
            CommandState::Off => "off",
            CommandState::Disabled => "disabled",
        })
    }
}

/// State of all three commands for one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandStates {
    pub description_list: CommandState,
    pub description_term: CommandState,
    pub description_value: CommandState,
}

impl CommandStates {
    pub fn get(&self, command: Command) -> CommandState {
        match command {
            Command::DescriptionList => self.description_list,
            Command::DescriptionTerm => self.description_term,
            Command::DescriptionValue => self.description_value,
        }
    }
}

/// Nearest term or value enclosing `node`, walking past inline wrappers and
/// nested blocks.
pub fn nearest_item(tree: &Tree, node: NodeId) -> Option<(NodeId, ItemKind)> {
    let item = tree.nearest(node, NodeKind::is_description_item)?;
    Some((item, tree.kind(item).item_kind()?))
}

/// Compute the three command states for a selection.
pub fn classify(tree: &Tree, selection: &Selection) -> Result<CommandStates> {
    let touched = tree.nodes_in_range(selection)?;

    let in_list = touched
        .iter()
        .any(|&n| tree.kind(n) == &NodeKind::DescriptionList);
    let touches_item = touched.iter().any(|&n| tree.kind(n).is_description_item());
    let anchor = nearest_item(tree, selection.start.node).map(|(_, kind)| kind);

    let item_state = |kind: ItemKind| {
        if !touches_item {
            CommandState::Disabled
        } else if anchor == Some(kind) {
            CommandState::On
        } else {
            CommandState::Off
        }
    };

    let states = CommandStates {
        description_list: if in_list {
            CommandState::On
        } else {
            CommandState::Off
        },
        description_term: item_state(ItemKind::Term),
        description_value: item_state(ItemKind::Value),
    };
    log::debug!("classified {selection:?} as {states:?}");
    Ok(states)
}
