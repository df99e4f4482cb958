use serde::Serialize;

use crate::tree::{NodeId, Selection};

/// Which transformation an editing operation performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    /// Enter at the end of an item added an alternating sibling
    NewSibling,
    /// Enter inside an item split it in two
    SplitItem,
    /// Enter in the only, empty item replaced the list with a paragraph
    EscapeList,
    /// Enter in an empty item split the list around a new paragraph
    SplitList,
    /// Items were converted to terms or values
    Retag,
    /// A new description list replaced the block at the cursor
    CreateList,
    /// A description list was unwrapped into paragraphs
    RemoveList,
    /// Nothing changed
    Unchanged,
}

/// Outcome of one editing operation on a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub kind: MutationKind,
    /// Nodes created or retagged by the operation
    pub changed: Vec<NodeId>,
    pub selection: Selection,
}

impl Mutation {
    pub fn unchanged(selection: Selection) -> Self {
        Self {
            kind: MutationKind::Unchanged,
            changed: Vec::new(),
            selection,
        }
    }
}

/// Result of applying a command through an [`crate::EditSession`]
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub kind: MutationKind,
    pub changed: Vec<NodeId>,
    pub new_selection: Selection,
    pub version: u64,
}
