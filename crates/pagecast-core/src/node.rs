//! # Node Model
//!
//! The recursive component descriptor and the page that contains it.
//!
//! A `ComponentNode` exclusively owns its children. There is no parent
//! back-reference; parents are found by depth-first search. Every walk in
//! this module is pre-order, left-to-right, so when IDs collide the earliest
//! pre-order match is the one that is returned.

use crate::primitives::{MAX_HEADING_LEVEL, MIN_HEADING_LEVEL};
use crate::PagecastError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind-specific component properties.
pub type Properties = serde_json::Map<String, Value>;

/// Presentation style, passed through without interpretation.
pub type Style = serde_json::Map<String, Value>;

// =============================================================================
// COMPONENT KIND
// =============================================================================

/// The closed set of component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Header,
    Button,
    Text,
    Image,
    Card,
    List,
}

const HEADER_PROPS: &[PropertySpec] = &[
    PropertySpec::required("text", PropertyType::String),
    PropertySpec::required(
        "level",
        PropertyType::Integer {
            min: MIN_HEADING_LEVEL,
            max: MAX_HEADING_LEVEL,
        },
    ),
];

const BUTTON_PROPS: &[PropertySpec] = &[
    PropertySpec::required("text", PropertyType::String),
    PropertySpec::optional("onClick", PropertyType::String),
    PropertySpec::optional(
        "variant",
        PropertyType::OneOf(&["primary", "secondary", "danger"]),
    ),
];

const TEXT_PROPS: &[PropertySpec] = &[
    PropertySpec::required("content", PropertyType::String),
    PropertySpec::optional("size", PropertyType::OneOf(&["small", "medium", "large"])),
];

const IMAGE_PROPS: &[PropertySpec] = &[
    PropertySpec::required("src", PropertyType::String),
    PropertySpec::required("alt", PropertyType::String),
    PropertySpec::optional("width", PropertyType::Number),
    PropertySpec::optional("height", PropertyType::Number),
];

const CARD_PROPS: &[PropertySpec] = &[
    PropertySpec::optional("title", PropertyType::String),
    PropertySpec::optional("padding", PropertyType::Number),
];

const LIST_PROPS: &[PropertySpec] = &[
    PropertySpec::required("items", PropertyType::StringList),
    PropertySpec::required("ordered", PropertyType::Boolean),
];

impl ComponentKind {
    /// Every kind, in declaration order.
    pub const ALL: [ComponentKind; 6] = [
        Self::Header,
        Self::Button,
        Self::Text,
        Self::Image,
        Self::Card,
        Self::List,
    ];

    /// Wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Button => "button",
            Self::Text => "text",
            Self::Image => "image",
            Self::Card => "card",
            Self::List => "list",
        }
    }

    /// The property schema for this kind.
    #[must_use]
    pub const fn property_specs(self) -> &'static [PropertySpec] {
        match self {
            Self::Header => HEADER_PROPS,
            Self::Button => BUTTON_PROPS,
            Self::Text => TEXT_PROPS,
            Self::Image => IMAGE_PROPS,
            Self::Card => CARD_PROPS,
            Self::List => LIST_PROPS,
        }
    }

    /// Check `properties` against this kind's schema.
    ///
    /// Required fields must be present and well-typed. Optional fields are
    /// type-checked when present and not null. Unknown fields pass through.
    pub fn validate(self, properties: &Properties) -> Result<(), PagecastError> {
        for spec in self.property_specs() {
            match properties.get(spec.name) {
                None | Some(Value::Null) if spec.required => {
                    return Err(PagecastError::BadRequest(format!(
                        "{} component requires property '{}' ({})",
                        self.as_str(),
                        spec.name,
                        spec.ty.describe()
                    )));
                }
                None | Some(Value::Null) => {}
                Some(value) if !spec.ty.accepts(value) => {
                    return Err(PagecastError::BadRequest(format!(
                        "property '{}' of {} component must be {}",
                        spec.name,
                        self.as_str(),
                        spec.ty.describe()
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PROPERTY SCHEMA
// =============================================================================

/// Value shape accepted by a component property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Boolean,
    Number,
    /// An integer within an inclusive range.
    Integer { min: i64, max: i64 },
    /// A string drawn from a fixed set.
    OneOf(&'static [&'static str]),
    /// An ordered sequence of strings.
    StringList,
}

impl PropertyType {
    /// Does `value` have this shape?
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::Integer { min, max } => value.as_i64().is_some_and(|n| (*min..=*max).contains(&n)),
            Self::OneOf(options) => value.as_str().is_some_and(|s| options.contains(&s)),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    /// Human-readable description, used in error messages and the catalog.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::String => "a string".to_string(),
            Self::Boolean => "a boolean".to_string(),
            Self::Number => "a number".to_string(),
            Self::Integer { min, max } => format!("an integer between {} and {}", min, max),
            Self::OneOf(options) => format!("one of {}", options.join(", ")),
            Self::StringList => "an array of strings".to_string(),
        }
    }
}

/// One entry of a kind's property schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub ty: PropertyType,
    pub required: bool,
}

impl PropertySpec {
    const fn required(name: &'static str, ty: PropertyType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    const fn optional(name: &'static str, ty: PropertyType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

// =============================================================================
// COMPONENT NODE
// =============================================================================

/// One component descriptor in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    pub id: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: ComponentKind,
    #[serde(rename = "props", alias = "properties", default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentNode>,
}

impl ComponentNode {
    /// Create a childless, unstyled node.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ComponentKind, properties: Properties) -> Self {
        Self {
            id: id.into(),
            kind,
            properties,
            style: None,
            children: Vec::new(),
        }
    }

    /// Attach a style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Attach children, replacing any existing ones.
    #[must_use]
    pub fn with_children(mut self, children: Vec<ComponentNode>) -> Self {
        self.children = children;
        self
    }

    /// Validate this node and its whole subtree against the kind schemas.
    pub fn validate_tree(&self) -> Result<(), PagecastError> {
        self.kind.validate(&self.properties).map_err(|e| match e {
            PagecastError::BadRequest(msg) => {
                PagecastError::BadRequest(format!("component '{}': {}", self.id, msg))
            }
            other => other,
        })?;
        self.children.iter().try_for_each(Self::validate_tree)
    }
}

// =============================================================================
// NODE PATCH
// =============================================================================

/// Partial update for a node.
///
/// Each present map is shallow-merged key by key into the node; keys the
/// patch does not mention keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
    #[serde(
        rename = "props",
        alias = "properties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<Properties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

impl NodePatch {
    /// True when the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_none() && self.style.is_none()
    }

    /// The properties `node` would have after this patch.
    #[must_use]
    pub fn merged_properties(&self, node: &ComponentNode) -> Properties {
        let mut merged = node.properties.clone();
        if let Some(props) = &self.properties {
            merged.extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Merge this patch into `node`.
    pub fn apply_to(&self, node: &mut ComponentNode) {
        if let Some(props) = &self.properties {
            node.properties
                .extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(style) = &self.style {
            node.style
                .get_or_insert_with(Style::new)
                .extend(style.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// A named, independently addressable sequence of root components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub components: Vec<ComponentNode>,
}

impl Page {
    /// Create a page.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, components: Vec<ComponentNode>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            components,
        }
    }

    /// First pre-order match for `id`.
    #[must_use]
    pub fn find_node(&self, id: &str) -> Option<&ComponentNode> {
        find_in(&self.components, id)
    }

    /// Whether any node at any depth carries `id`.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.find_node(id).is_some()
    }

    /// All nodes in pre-order, left-to-right.
    #[must_use]
    pub fn pre_order(&self) -> Vec<&ComponentNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&ComponentNode> = self.components.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Total number of nodes at every depth.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.pre_order().len()
    }

    /// Validate every node of the page.
    pub fn validate(&self) -> Result<(), PagecastError> {
        if self.id.trim().is_empty() {
            return Err(PagecastError::BadRequest("page id must not be empty".to_string()));
        }
        self.components.iter().try_for_each(ComponentNode::validate_tree)
    }
}

// =============================================================================
// TREE WALKS
// =============================================================================

/// Pre-order search for `id` across a sibling sequence.
pub(crate) fn find_in<'a>(nodes: &'a [ComponentNode], id: &str) -> Option<&'a ComponentNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable pre-order search for `id` across a sibling sequence.
pub(crate) fn find_in_mut<'a>(
    nodes: &'a mut [ComponentNode],
    id: &str,
) -> Option<&'a mut ComponentNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Detach the first pre-order match for `id`, subtree included.
pub(crate) fn detach_in(nodes: &mut Vec<ComponentNode>, id: &str) -> Option<ComponentNode> {
    for index in 0..nodes.len() {
        if nodes[index].id == id {
            return Some(nodes.remove(index));
        }
        if let Some(found) = detach_in(&mut nodes[index].children, id) {
            return Some(found);
        }
    }
    None
}

// =============================================================================
// TESTS
// =============================================================================
