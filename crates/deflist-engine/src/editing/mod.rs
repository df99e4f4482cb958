/*!
 * # Description List Editing
 *
 * Editing behaviour for description lists (`dl`) with their terms (`dt`)
 * and values (`dd`), built on the arena [`Tree`](crate::tree::Tree).
 *
 * ## Architecture Overview
 *
 * ### 1. Pure transformations over the tree
 * - Every operation takes `&mut Tree` plus a [`Selection`](crate::tree::Selection)
 *   and returns a [`Mutation`]: what changed and where the cursor goes
 * - Operations never repair malformed input; they fail with an
 *   [`EditError`](crate::EditError) instead
 *
 * ### 2. Command states
 * - [`classify`] reports, for the current selection, whether each of the three
 *   commands is `On`, `Off` or `Disabled`
 * - A host toolbar renders these states; executing a disabled command does
 *   nothing
 *
 * ### 3. Sessions own the document
 * - [`EditSession`] holds the tree, selection, [`EditOptions`] and undo
 *   history, and is the only place edits are applied from
 * - Each edit is a transaction: on error the previous tree and selection are
 *   restored
 * - Successful edits are reported as a [`Patch`] with a new version number
 *
 * ## Module Structure
 *
 * - **`classify`**: command states for a selection
 * - **`enter`**: Enter-key rules (new sibling, split item, escape, split list)
 * - **`switch`**: retagging items between terms and values
 * - **`factory`**: replacing a paragraph or list item with a new list
 * - **`commands`**: the `descriptionList` / `descriptionTerm` /
 *   `descriptionValue` command surface
 * - **`history`**: snapshot-based undo/redo
 * - **`session`**: [`EditSession`]
 * - **`patch`**: [`Mutation`] and [`Patch`] result types
 *
 * ## Usage Pattern
 *
 * ```rust
 * use deflist_engine::editing::*;
 *
 * let mut session =
 *     EditSession::from_markup("<dl><dt>foo[]</dt></dl>", EditOptions::default()).unwrap();
 *
 * assert_eq!(session.state(Command::DescriptionTerm).unwrap(), CommandState::On);
 *
 * let patch = session.enter().unwrap().unwrap();
 * assert_eq!(patch.kind, MutationKind::NewSibling);
 * assert_eq!(session.to_markup(), "<dl><dt>foo</dt><dd>[]</dd></dl>");
 *
 * session.undo();
 * assert_eq!(session.to_markup(), "<dl><dt>foo[]</dt></dl>");
 * ```
 */

pub mod classify;
pub mod commands;
pub mod enter;
pub mod factory;
pub mod history;
pub mod patch;
pub mod session;
pub mod switch;

pub use classify::{CommandState, CommandStates, classify, nearest_item};
pub use commands::Command;
pub use enter::{EnterOutcome, on_enter};
pub use factory::create_at;
pub use history::{Checkpoint, DEFAULT_HISTORY_LIMIT, History};
pub use patch::{Mutation, MutationKind, Patch};
pub use session::EditSession;
pub use switch::switch_to;

/// Characters treated as placeholders when none are configured.
pub const DEFAULT_FILLERS: &str = "\u{200B}\u{FEFF}";

/// Settings the editing operations read. Passed explicitly, never global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOptions {
    /// Non-rendering filler characters. An item holding only these counts
    /// as empty.
    pub fillers: String,
    /// Undo levels kept by an [`EditSession`] (0 = unlimited)
    pub history_limit: usize,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            fillers: DEFAULT_FILLERS.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EditOptions {
    /// Whether `c` is a filler.
    pub fn is_placeholder(&self, c: char) -> bool {
        self.fillers.contains(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fillers() {
        let options = EditOptions::default();
        assert!(options.is_placeholder('\u{200B}'));
        assert!(options.is_placeholder('\u{FEFF}'));
        assert!(!options.is_placeholder(' '));
        assert!(!options.is_placeholder('a'));
    }

    #[test]
    fn test_custom_fillers() {
        let options = EditOptions {
            fillers: "\u{00A0}".to_string(),
            ..EditOptions::default()
        };
        assert!(options.is_placeholder('\u{00A0}'));
        assert!(!options.is_placeholder('\u{200B}'));
    }
}
