//! Concrete commands and their factories.
//!
//! Each command family that exists in both dialects has one struct and a
//! stateless factory that reads the document's dialect discriminator and
//! builds the matching variant.

pub mod aggregate;
pub mod delete_node;
pub mod info;
pub mod paths;
pub mod schema;
pub mod security;
