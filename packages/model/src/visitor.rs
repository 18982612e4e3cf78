//! Tree walks over a document.
//!
//! Commands that touch cross-cutting structure (currently only the
//! security-scheme rename) need to visit every node of one kind without
//! knowing where the dialect puts them.

use crate::document::{Document, SecurityRequirement};

impl Document {
    /// Every security-requirement node in the tree: the document-level
    /// list first, then each operation's list in path order.
    pub fn security_requirements_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut SecurityRequirement> {
        let Document {
            security, paths, ..
        } = self;

        security.iter_mut().chain(
            paths
                .values_mut()
                .flat_map(|item| item.operations_mut())
                .flat_map(|op| op.security.iter_mut().flatten()),
        )
    }
}
