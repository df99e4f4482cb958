use crate::markup::MarkupError;
use crate::tree::NodeId;

/// Errors raised by tree primitives and editing operations.
///
/// An error from a mutating operation means the tree may be partially
/// mutated; [`crate::EditSession`] restores its checkpoint before returning it.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("node {0} does not exist")]
    NotFound(NodeId),

    #[error("node {0} has no parent")]
    Detached(NodeId),

    #[error("node {0} is still attached to the tree")]
    StillAttached(NodeId),

    #[error("node {0} cannot hold children")]
    NotAnElement(NodeId),

    #[error("offset {offset} is out of bounds for node {node}")]
    InvalidPosition { node: NodeId, offset: usize },

    #[error("selection end precedes its start")]
    InvertedSelection,

    #[error("node {node} was expected to be {expected}")]
    UnexpectedShape { node: NodeId, expected: &'static str },

    #[error("cannot create a description list at {kind} node {node}")]
    InvalidTarget { node: NodeId, kind: String },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("markup error: {0}")]
    Markup(#[from] MarkupError),
}

pub type Result<T, E = EditError> = std::result::Result<T, E>;
