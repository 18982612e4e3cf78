//! # Apidoc Model
//!
//! Typed document tree for versioned API descriptions.
//!
//! Two dialects are supported, "2.0" and "3.0". They share concepts but
//! place them differently (for example security schemes live in a flat
//! `securityDefinitions` map in 2.0 and under `components.securitySchemes`
//! in 3.0), so every node carries exactly the superset of fields the two
//! dialects need and [`Dialect`] tells editing code which shape applies.
//!
//! Nodes are plain owned serde structs; a node's parent and owning
//! document are whatever container currently holds it. Detaching a node
//! means removing it from its container, re-attaching means inserting it
//! back.

mod document;
mod visitor;

pub use document::{
    Components, Contact, Dialect, Document, Info, Operation, PathItem, RequestBody, Response,
    Responses, Schema, SecurityRequirement, SecurityScheme, METHODS,
};
