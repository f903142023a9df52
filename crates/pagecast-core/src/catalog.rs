//! # Operation Catalog
//!
//! The discoverable contract surface for controllers: one machine-readable
//! schema per operation. Controllers enumerate it at runtime (the MCP bridge
//! and `GET /api/tools` both serve it).

use crate::node::ComponentKind;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The operations a controller can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    UpdatePage,
    AddComponent,
    UpdateComponent,
    RemoveComponent,
    GetCurrentPage,
    CreatePage,
    SwitchPage,
}

impl Operation {
    /// Every operation, in catalog order.
    pub const ALL: [Operation; 7] = [
        Self::UpdatePage,
        Self::AddComponent,
        Self::UpdateComponent,
        Self::RemoveComponent,
        Self::GetCurrentPage,
        Self::CreatePage,
        Self::SwitchPage,
    ];

    /// Wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpdatePage => "update_page",
            Self::AddComponent => "add_component",
            Self::UpdateComponent => "update_component",
            Self::RemoveComponent => "remove_component",
            Self::GetCurrentPage => "get_current_page",
            Self::CreatePage => "create_page",
            Self::SwitchPage => "switch_page",
        }
    }

    /// Resolve a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Schema for this operation.
    #[must_use]
    pub fn spec(self) -> OperationSpec {
        let (description, properties, required): (&str, Value, &[&str]) = match self {
            Self::UpdatePage => (
                "Replace a whole page configuration",
                json!({
                    "pageConfig": {
                        "type": "object",
                        "description": "Complete page object: { id, title, components }"
                    }
                }),
                &["pageConfig"],
            ),
            Self::AddComponent => (
                "Add a new component to the active page",
                json!({
                    "type": {
                        "type": "string",
                        "enum": kind_names(),
                        "description": "Component type"
                    },
                    "props": {
                        "type": "object",
                        "description": props_description()
                    },
                    "style": {
                        "type": "object",
                        "description": "Style object (optional)"
                    },
                    "parentId": {
                        "type": "string",
                        "description": "Parent component ID (optional; omitted means root level)"
                    }
                }),
                &["type", "props"],
            ),
            Self::UpdateComponent => (
                "Update an existing component; supplied keys are merged over existing ones",
                json!({
                    "componentId": {
                        "type": "string",
                        "description": "ID of the component to update"
                    },
                    "props": {
                        "type": "object",
                        "description": "Properties to merge"
                    },
                    "style": {
                        "type": "object",
                        "description": "Style keys to merge"
                    }
                }),
                &["componentId"],
            ),
            Self::RemoveComponent => (
                "Remove a component and everything nested inside it",
                json!({
                    "componentId": {
                        "type": "string",
                        "description": "ID of the component to remove"
                    }
                }),
                &["componentId"],
            ),
            Self::GetCurrentPage => ("Get the active page configuration", json!({}), &[]),
            Self::CreatePage => (
                "Create a new page without switching to it",
                json!({
                    "title": {
                        "type": "string",
                        "description": "Page title"
                    },
                    "components": {
                        "type": "array",
                        "description": "Initial components (optional)"
                    }
                }),
                &["title"],
            ),
            Self::SwitchPage => (
                "Make another page the active page",
                json!({
                    "pageId": {
                        "type": "string",
                        "description": "ID of the page to show"
                    }
                }),
                &["pageId"],
            ),
        };

        OperationSpec {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties,
                required: required.iter().map(|s| (*s).to_string()).collect(),
            },
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameter shape of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: Value,
    pub required: Vec<String>,
}

/// Machine-readable description of one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSpec {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

/// Every operation schema, in catalog order.
#[must_use]
pub fn operations() -> Vec<OperationSpec> {
    Operation::ALL.into_iter().map(Operation::spec).collect()
}

fn kind_names() -> Vec<&'static str> {
    ComponentKind::ALL.into_iter().map(ComponentKind::as_str).collect()
}

fn props_description() -> String {
    let per_kind: Vec<String> = ComponentKind::ALL
        .into_iter()
        .map(|kind| {
            let fields: Vec<String> = kind
                .property_specs()
                .iter()
                .map(|spec| {
                    let marker = if spec.required { "" } else { "?" };
                    format!("{}{}: {}", spec.name, marker, spec.ty.describe())
                })
                .collect();
            format!("{} {{ {} }}", kind.as_str(), fields.join(", "))
        })
        .collect();
    format!("Component properties by type: {}", per_kind.join("; "))
}
