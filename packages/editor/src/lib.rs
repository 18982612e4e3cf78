//! # Apidoc Editor
//!
//! Undoable command layer for editing versioned API-description
//! documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: typed document tree (two dialects)   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: reversible, serializable commands   │
//! │  - Node paths: portable structural address  │
//! │  - Commands: execute / undo / marshall      │
//! │  - Registry: tag → constructor              │
//! │  - Aggregate: composite edits               │
//! │  - History: undo/redo stacks                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core principles
//!
//! 1. **The document is the source of truth**: a command whose target no
//!    longer resolves no-ops instead of corrupting the tree
//! 2. **Exact undo**: each command captures only the state it changes,
//!    including whether it had to create an ancestor container
//! 3. **Plain-data histories**: every command marshals to a tagged JSON
//!    mapping and reconstructs through a closed registry, so an edit
//!    history can be persisted and replayed by another process
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apidoc_editor::{commands, marshall_command, unmarshall_command};
//!
//! let mut cmd = commands::info::change_title(&doc, "Pet Store");
//! cmd.execute(&mut doc)?;
//!
//! // Persist the edit, replay it elsewhere.
//! let record = marshall_command(cmd.as_ref())?;
//! let mut replayed = unmarshall_command(&record)?;
//!
//! cmd.undo(&mut doc)?;
//! ```
//!
//! The host drives commands strictly sequentially: construct, `execute`
//! once, optionally `undo` once afterwards. This layer does no locking,
//! no I/O, and nothing asynchronous.

mod command;
pub mod commands;
mod errors;
mod history;
mod node_path;
mod registry;

pub use command::{marshall_command, Command, TYPE_KEY};
pub use commands::aggregate::AggregateCommand;
pub use commands::delete_node::{
    delete_all_responses, delete_contact, delete_operation, delete_request_body,
    DeleteNodeCommand, NodeKind,
};
pub use commands::info::{
    change_contact, change_description, change_title, ChangeContactCommand,
    ChangeDescriptionCommand, ChangeTitleCommand,
};
pub use commands::paths::{new_path, new_response, NewPathCommand, NewResponseCommand};
pub use commands::schema::{new_schema_property, NewSchemaPropertyCommand};
pub use commands::security::{
    change_security_scheme, rename_security_scheme, ChangeSecuritySchemeCommand,
    RenameSecuritySchemeCommand,
};
pub use errors::CommandError;
pub use history::CommandHistory;
pub use node_path::{NodeMut, NodePath, NodeRef, Segment};
pub use registry::{unmarshall_command, CommandRegistry};

// Re-export the model root types for convenience.
pub use apidoc_model::{Dialect, Document};
