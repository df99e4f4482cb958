pub mod editing;
pub mod error;
pub mod io;
pub mod markup;
pub mod tree;


// Re-export key types for easier usage
pub use editing::{
    Command, CommandState, CommandStates, EditOptions, EditSession, EnterOutcome, Mutation,
    MutationKind, Patch,
};
pub use error::{EditError, Result};
pub use io::*;
pub use markup::{Fragment, MarkupError};
pub use tree::{ItemKind, ListKind, NodeId, NodeKind, Position, Selection, Tree};
