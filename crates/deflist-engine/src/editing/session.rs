//! # Edit Session
//!
//! One document being edited: its tree, selection, options and undo history.
//! All editing goes through the session so that every change is atomic and
//! undoable.

use crate::editing::classify::{CommandState, CommandStates, classify};
use crate::editing::commands::{self, Command};
use crate::editing::enter::{EnterOutcome, on_enter};
use crate::editing::history::{Checkpoint, History};
use crate::editing::{EditOptions, Mutation, MutationKind, Patch};
use crate::error::Result;
use crate::markup;
use crate::tree::{Position, Selection, Tree};

#[derive(Debug)]
pub struct EditSession {
    tree: Tree,
    selection: Selection,
    options: EditOptions,
    /// Bumped on every applied change, undo and redo
    version: u64,
    history: History,
}

impl EditSession {
    /// Start a session on `tree`, checking the selection against it.
    pub fn new(tree: Tree, selection: Selection, options: EditOptions) -> Result<Self> {
        tree.validate_selection(&selection)?;
        let history = History::with_limit(options.history_limit);
        Ok(Self {
            tree,
            selection,
            options,
            version: 0,
            history,
        })
    }

    /// Parse a document written in markup. Without selection markers the
    /// cursor goes to the end of the document.
    pub fn from_markup(input: &str, options: EditOptions) -> Result<Self> {
        let fragment = markup::parse(input)?;
        let tree = fragment.tree;
        let selection = fragment.selection.unwrap_or_else(|| {
            let root = tree.root();
            Selection::collapsed(Position::new(root, tree.children(root).len()))
        });
        Self::new(tree, selection, options)
    }

    /// The document with the selection marked.
    pub fn to_markup(&self) -> String {
        markup::serialize(&self.tree, Some(&self.selection))
    }

    /// The document alone.
    pub fn content(&self) -> String {
        markup::serialize(&self.tree, None)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<()> {
        self.tree.validate_selection(&selection)?;
        self.selection = selection;
        Ok(())
    }

    pub fn states(&self) -> Result<CommandStates> {
        classify(&self.tree, &self.selection)
    }

    pub fn state(&self, command: Command) -> Result<CommandState> {
        Ok(self.states()?.get(command))
    }

    /// Run a command. Returns `None` when it changed nothing (a disabled
    /// command, or retagging items that already have the target kind).
    pub fn exec(&mut self, command: Command) -> Result<Option<Patch>> {
        let selection = self.selection;
        self.transact(command.name(), |tree| {
            commands::exec(tree, &selection, command)
        })
    }

    /// Handle Enter. Returns `None` when the selection is not inside a
    /// description item and the host's own Enter handling applies.
    pub fn enter(&mut self) -> Result<Option<Patch>> {
        let selection = self.selection;
        let options = self.options.clone();
        self.transact("enter", |tree| {
            Ok(match on_enter(tree, &selection, &options)? {
                EnterOutcome::Handled(mutation) => mutation,
                EnterOutcome::NotHandled => Mutation::unchanged(selection),
            })
        })
    }

    /// Revert the last change. Returns whether there was one.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.checkpoint()) else {
            return false;
        };
        self.restore(previous);
        self.version += 1;
        log::info!("undo -> version {}", self.version);
        true
    }

    /// Reapply the last undone change. Returns whether there was one.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.checkpoint()) else {
            return false;
        };
        self.restore(next);
        self.version += 1;
        log::info!("redo -> version {}", self.version);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of changes that can currently be undone.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            tree: self.tree.clone(),
            selection: self.selection,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.tree = checkpoint.tree;
        self.selection = checkpoint.selection;
    }

    /// Apply `edit` to the tree all or nothing. On error, including a
    /// resulting selection that no longer fits the tree, the tree and
    /// selection are put back as they were and the error is returned.
    fn transact(
        &mut self,
        name: &str,
        edit: impl FnOnce(&mut Tree) -> Result<Mutation>,
    ) -> Result<Option<Patch>> {
        let before = self.checkpoint();
        let applied = edit(&mut self.tree).and_then(|mutation| {
            self.tree.validate_selection(&mutation.selection)?;
            Ok(mutation)
        });
        let mutation = match applied {
            Ok(mutation) => mutation,
            Err(e) => {
                log::warn!("{name} failed, rolling back: {e}");
                self.restore(before);
                return Err(e);
            }
        };

        if mutation.kind == MutationKind::Unchanged {
            log::debug!("{name}: nothing to do");
            return Ok(None);
        }

        self.selection = mutation.selection;
        self.history.record(before);
        self.version += 1;
        log::info!(
            "{name}: {:?}, {} node(s) changed, version {}",
            mutation.kind,
            mutation.changed.len(),
            self.version
        );

        Ok(Some(Patch {
            kind: mutation.kind,
            changed: mutation.changed,
            new_selection: mutation.selection,
            version: self.version,
        }))
    }
}
