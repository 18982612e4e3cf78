//! # Node Paths
//!
//! Portable, structural addresses for document nodes.
//!
//! A [`NodePath`] records how to reach a node from the document root as a
//! list of property names and indices. It holds no live reference, so a
//! path built against one document instance resolves against any
//! structurally equal instance, including one that was serialized and
//! deserialized in between.
//!
//! Resolution is total: a path whose intermediate step is missing yields
//! `None`, never an error. Documents are routinely edited between the
//! moment a command is built and the moment it runs, so a dangling path is
//! an expected outcome that every command checks before touching anything.

use apidoc_model::{
    Components, Contact, Document, Info, Operation, PathItem, RequestBody, Response, Responses,
    Schema, SecurityRequirement, SecurityScheme,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One step of a path: a property name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Index(usize),
    Prop(String),
}

/// Structural address of a node relative to the document root.
///
/// Paths are plain data: they serialize as an array of strings and
/// numbers and round-trip unchanged through command marshalling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath {
    segments: Vec<Segment>,
}

impl NodePath {
    /// Path addressing the document root itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn prop(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Prop(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walk the path from the root of `doc`. Any missing intermediate
    /// (or a path ending on a bare container map) yields `None`.
    pub fn resolve<'a>(&self, doc: &'a Document) -> Option<NodeRef<'a>> {
        let mut cursor = Cursor::Node(NodeRef::Document(doc));
        for segment in &self.segments {
            cursor = cursor.step(segment)?;
        }
        match cursor {
            Cursor::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Mutable variant of [`NodePath::resolve`].
    pub fn resolve_mut<'a>(&self, doc: &'a mut Document) -> Option<NodeMut<'a>> {
        let mut cursor = CursorMut::Node(NodeMut::Document(doc));
        for segment in &self.segments {
            cursor = cursor.step(segment)?;
        }
        match cursor {
            CursorMut::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Prop(name) => write!(f, "/{}", name)?,
                Segment::Index(index) => write!(f, "/{}", index)?,
            }
        }
        Ok(())
    }
}

/// A resolved, addressable node.
#[derive(Debug)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Info(&'a Info),
    Contact(&'a Contact),
    Components(&'a Components),
    PathItem(&'a PathItem),
    Operation(&'a Operation),
    Responses(&'a Responses),
    Response(&'a Response),
    RequestBody(&'a RequestBody),
    Schema(&'a Schema),
    SecurityScheme(&'a SecurityScheme),
    SecurityRequirement(&'a SecurityRequirement),
}

/// Mutable counterpart of [`NodeRef`].
#[derive(Debug)]
pub enum NodeMut<'a> {
    Document(&'a mut Document),
    Info(&'a mut Info),
    Contact(&'a mut Contact),
    Components(&'a mut Components),
    PathItem(&'a mut PathItem),
    Operation(&'a mut Operation),
    Responses(&'a mut Responses),
    Response(&'a mut Response),
    RequestBody(&'a mut RequestBody),
    Schema(&'a mut Schema),
    SecurityScheme(&'a mut SecurityScheme),
    SecurityRequirement(&'a mut SecurityRequirement),
}

/// Intermediate resolution state. Keyed container maps are walkable but
/// are not addressable nodes themselves.
enum Cursor<'a> {
    Node(NodeRef<'a>),
    PathMap(&'a BTreeMap<String, PathItem>),
    SchemaMap(&'a BTreeMap<String, Schema>),
    SchemeMap(&'a BTreeMap<String, SecurityScheme>),
    RequirementList(&'a [SecurityRequirement]),
}

impl<'a> Cursor<'a> {
    fn step(self, segment: &Segment) -> Option<Cursor<'a>> {
        match (self, segment) {
            (Cursor::Node(NodeRef::Document(doc)), Segment::Prop(name)) => match name.as_str() {
                "info" => Some(Cursor::Node(NodeRef::Info(doc.info.as_ref()?))),
                "paths" => Some(Cursor::PathMap(&doc.paths)),
                "security" => Some(Cursor::RequirementList(doc.security.as_slice())),
                "definitions" => Some(Cursor::SchemaMap(doc.definitions.as_ref()?)),
                "securityDefinitions" => {
                    Some(Cursor::SchemeMap(doc.security_definitions.as_ref()?))
                }
                "components" => Some(Cursor::Node(NodeRef::Components(doc.components.as_ref()?))),
                _ => None,
            },
            (Cursor::Node(NodeRef::Components(components)), Segment::Prop(name)) => {
                match name.as_str() {
                    "schemas" => Some(Cursor::SchemaMap(components.schemas.as_ref()?)),
                    "securitySchemes" => {
                        Some(Cursor::SchemeMap(components.security_schemes.as_ref()?))
                    }
                    _ => None,
                }
            }
            (Cursor::Node(NodeRef::Info(info)), Segment::Prop(name)) if name == "contact" => {
                Some(Cursor::Node(NodeRef::Contact(info.contact.as_ref()?)))
            }
            (Cursor::Node(NodeRef::PathItem(item)), Segment::Prop(method)) => {
                Some(Cursor::Node(NodeRef::Operation(item.operation(method)?)))
            }
            (Cursor::Node(NodeRef::Operation(op)), Segment::Prop(name)) => match name.as_str() {
                "responses" => Some(Cursor::Node(NodeRef::Responses(op.responses.as_ref()?))),
                "requestBody" => Some(Cursor::Node(NodeRef::RequestBody(
                    op.request_body.as_ref()?,
                ))),
                "security" => Some(Cursor::RequirementList(op.security.as_deref()?)),
                _ => None,
            },
            (Cursor::Node(NodeRef::Responses(responses)), Segment::Prop(code)) => {
                Some(Cursor::Node(NodeRef::Response(responses.0.get(code)?)))
            }
            (Cursor::Node(NodeRef::Schema(schema)), Segment::Prop(name))
                if name == "properties" =>
            {
                Some(Cursor::SchemaMap(schema.properties.as_ref()?))
            }
            (Cursor::PathMap(map), Segment::Prop(key)) => {
                Some(Cursor::Node(NodeRef::PathItem(map.get(key)?)))
            }
            (Cursor::SchemaMap(map), Segment::Prop(key)) => {
                Some(Cursor::Node(NodeRef::Schema(map.get(key)?)))
            }
            (Cursor::SchemeMap(map), Segment::Prop(key)) => {
                Some(Cursor::Node(NodeRef::SecurityScheme(map.get(key)?)))
            }
            (Cursor::RequirementList(list), Segment::Index(index)) => Some(Cursor::Node(
                NodeRef::SecurityRequirement(list.get(*index)?),
            )),
            _ => None,
        }
    }
}

enum CursorMut<'a> {
    Node(NodeMut<'a>),
    PathMap(&'a mut BTreeMap<String, PathItem>),
    SchemaMap(&'a mut BTreeMap<String, Schema>),
    SchemeMap(&'a mut BTreeMap<String, SecurityScheme>),
    RequirementList(&'a mut [SecurityRequirement]),
}

impl<'a> CursorMut<'a> {
    fn step(self, segment: &Segment) -> Option<CursorMut<'a>> {
        match (self, segment) {
            (CursorMut::Node(NodeMut::Document(doc)), Segment::Prop(name)) => {
                match name.as_str() {
                    "info" => Some(CursorMut::Node(NodeMut::Info(doc.info.as_mut()?))),
                    "paths" => Some(CursorMut::PathMap(&mut doc.paths)),
                    "security" => Some(CursorMut::RequirementList(doc.security.as_mut_slice())),
                    "definitions" => Some(CursorMut::SchemaMap(doc.definitions.as_mut()?)),
                    "securityDefinitions" => {
                        Some(CursorMut::SchemeMap(doc.security_definitions.as_mut()?))
                    }
                    "components" => Some(CursorMut::Node(NodeMut::Components(
                        doc.components.as_mut()?,
                    ))),
                    _ => None,
                }
            }
            (CursorMut::Node(NodeMut::Components(components)), Segment::Prop(name)) => {
                match name.as_str() {
                    "schemas" => Some(CursorMut::SchemaMap(components.schemas.as_mut()?)),
                    "securitySchemes" => {
                        Some(CursorMut::SchemeMap(components.security_schemes.as_mut()?))
                    }
                    _ => None,
                }
            }
            (CursorMut::Node(NodeMut::Info(info)), Segment::Prop(name)) if name == "contact" => {
                Some(CursorMut::Node(NodeMut::Contact(info.contact.as_mut()?)))
            }
            (CursorMut::Node(NodeMut::PathItem(item)), Segment::Prop(method)) => Some(
                CursorMut::Node(NodeMut::Operation(item.operation_mut(method)?)),
            ),
            (CursorMut::Node(NodeMut::Operation(op)), Segment::Prop(name)) => {
                match name.as_str() {
                    "responses" => Some(CursorMut::Node(NodeMut::Responses(
                        op.responses.as_mut()?,
                    ))),
                    "requestBody" => Some(CursorMut::Node(NodeMut::RequestBody(
                        op.request_body.as_mut()?,
                    ))),
                    "security" => Some(CursorMut::RequirementList(op.security.as_deref_mut()?)),
                    _ => None,
                }
            }
            (CursorMut::Node(NodeMut::Responses(responses)), Segment::Prop(code)) => Some(
                CursorMut::Node(NodeMut::Response(responses.0.get_mut(code)?)),
            ),
            (CursorMut::Node(NodeMut::Schema(schema)), Segment::Prop(name))
                if name == "properties" =>
            {
                Some(CursorMut::SchemaMap(schema.properties.as_mut()?))
            }
            (CursorMut::PathMap(map), Segment::Prop(key)) => {
                Some(CursorMut::Node(NodeMut::PathItem(map.get_mut(key)?)))
            }
            (CursorMut::SchemaMap(map), Segment::Prop(key)) => {
                Some(CursorMut::Node(NodeMut::Schema(map.get_mut(key)?)))
            }
            (CursorMut::SchemeMap(map), Segment::Prop(key)) => {
                Some(CursorMut::Node(NodeMut::SecurityScheme(map.get_mut(key)?)))
            }
            (CursorMut::RequirementList(list), Segment::Index(index)) => Some(CursorMut::Node(
                NodeMut::SecurityRequirement(list.get_mut(*index)?),
            )),
            _ => None,
        }
    }
}
