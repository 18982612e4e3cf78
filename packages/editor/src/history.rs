//! # Undo/Redo History
//!
//! Tracks executed commands and replays them for undo/redo.
//!
//! ## Design
//!
//! - `apply` executes a command and pushes it on the undo stack
//! - Undo calls the command's `undo` and moves it to the redo stack
//! - Redo re-runs `execute`; the document is back in its pre-state, so
//!   the command recaptures the same snapshot it had
//! - New applications clear the redo stack
//!
//! Grouping several edits into one history step is what
//! [`AggregateCommand`](crate::AggregateCommand) is for.

use apidoc_model::Document;

use crate::command::Command;
use crate::errors::CommandError;

pub struct CommandHistory {
    /// Executed commands, most recent last.
    undo_stack: Vec<Box<dyn Command>>,

    /// Undone commands, most recent last.
    redo_stack: Vec<Box<dyn Command>>,

    /// Maximum number of undo levels (0 = unlimited).
    max_levels: usize,
}

impl CommandHistory {
    /// History with the default cap of 100 levels.
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Execute a command and record it for undo.
    ///
    /// A failing command is not recorded; whatever it already changed is
    /// its own concern (see the aggregate's partial-failure note).
    pub fn apply(
        &mut self,
        mut command: Box<dyn Command>,
        doc: &mut Document,
    ) -> Result<(), CommandError> {
        command.execute(doc)?;

        self.undo_stack.push(command);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // A new edit invalidates the redone future.
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the most recent command. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        command.undo(doc)?;
        self.redo_stack.push(command);
        Ok(true)
    }

    /// Redo the most recently undone command. Returns `false` when there
    /// is nothing to redo.
    pub fn redo(&mut self, doc: &mut Document) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        command.execute(doc)?;
        self.undo_stack.push(command);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}
