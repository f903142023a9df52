//! # Mutation Engine
//!
//! The single service object controllers talk to. It owns the Tree Store
//! and the Observer Hub, so every mutation and the broadcasts it triggers
//! happen under one `&mut self` borrow and observers never see a
//! half-applied change.
//!
//! Every operation that changes what observers see announces it twice:
//! first a targeted event describing the change, then a `page_update`
//! snapshot of the resulting active page. Failed operations never
//! broadcast.

use crate::catalog::{self, Operation, OperationSpec};
use crate::hub::{ComponentUpdate, InteractionEvent, Observer, ObserverEvent, ObserverHub};
use crate::node::{ComponentKind, ComponentNode, NodePatch, Page, Properties, Style};
use crate::store::TreeStore;
use crate::{ObserverId, PagecastError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

// =============================================================================
// REQUESTS
// =============================================================================

/// Parameters of `update_page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    pub page_config: Page,
}

/// Parameters of `add_component`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddComponentRequest {
    #[serde(rename = "type", alias = "kind")]
    pub kind: ComponentKind,
    #[serde(rename = "props", alias = "properties")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    /// Empty string is treated the same as absent: append at root.
    #[serde(
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<String>,
}

/// Parameters of `update_component`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComponentRequest {
    pub component_id: String,
    #[serde(flatten)]
    pub patch: NodePatch,
}

/// Parameters of `remove_component`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveComponentRequest {
    pub component_id: String,
}

/// Parameters of `create_page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePageRequest {
    pub title: String,
    #[serde(default)]
    pub components: Vec<ComponentNode>,
}

/// Parameters of `switch_page`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPageRequest {
    pub page_id: String,
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn decode<T: DeserializeOwned>(op: Operation, params: Value) -> Result<T, PagecastError> {
    // Operations without parameters may be called with `null`.
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params)
        .map_err(|e| PagecastError::BadRequest(format!("invalid parameters for {}: {}", op, e)))
}

// =============================================================================
// RESULTS
// =============================================================================

/// Result envelope returned to controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    /// Successful result carrying `data`.
    pub fn success(message: impl Into<String>, data: impl Serialize) -> Result<Self, PagecastError> {
        Ok(Self {
            success: true,
            message: message.into(),
            data: Some(serde_json::to_value(data)?),
            error: None,
        })
    }

    /// Failure envelope for `err`.
    #[must_use]
    pub fn failure(message: impl Into<String>, err: &PagecastError) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(err.to_string()),
        }
    }
}

/// Snapshot of the service state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub connected_observers: usize,
    pub total_pages: usize,
    pub current_page_title: String,
    /// Number of operations in the catalog.
    pub available_operations: usize,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Tree Store plus Observer Hub behind one operation API.
#[derive(Debug, Default)]
pub struct MutationEngine {
    store: TreeStore,
    hub: ObserverHub,
}

impl MutationEngine {
    /// Engine over a freshly seeded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine over an existing store.
    #[must_use]
    pub fn with_store(store: TreeStore) -> Self {
        Self {
            store,
            hub: ObserverHub::new(),
        }
    }

    /// Read access to the store.
    #[must_use]
    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    /// Read access to the hub.
    #[must_use]
    pub fn hub(&self) -> &ObserverHub {
        &self.hub
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    /// Register an observer; it immediately receives the active page.
    pub fn register_observer(
        &mut self,
        observer: Box<dyn Observer>,
    ) -> Result<ObserverId, PagecastError> {
        self.hub.register(observer, self.store.active_page())
    }

    /// Drop an observer. Safe to call more than once.
    pub fn deregister_observer(&mut self, id: ObserverId) -> bool {
        self.hub.deregister(id)
    }

    /// Handle a message an observer sent back.
    pub fn handle_observer_message(
        &self,
        id: ObserverId,
        text: &str,
    ) -> Result<Option<InteractionEvent>, PagecastError> {
        self.hub.handle_inbound(id, text)
    }

    fn announce(&self, event: ObserverEvent) {
        self.hub.broadcast(&event);
        self.hub
            .broadcast(&ObserverEvent::snapshot(self.store.active_page()));
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Replace a whole page.
    ///
    /// Observers always receive the new page, followed by a snapshot of the
    /// active page, even when the replaced page is not the active one.
    pub fn update_page(&mut self, request: UpdatePageRequest) -> Result<OperationResult, PagecastError> {
        let page = request.page_config;
        page.validate()?;

        self.store.replace_page(page.clone());
        tracing::info!(
            page = %page.id,
            nodes = page.node_count(),
            active = page.id == self.store.active_page_id(),
            "page replaced"
        );

        self.announce(ObserverEvent::PageUpdate(page.clone()));
        OperationResult::success("Page updated", &page)
    }

    /// Add a component to the active page under a freshly allocated ID.
    pub fn add_component(
        &mut self,
        request: AddComponentRequest,
    ) -> Result<OperationResult, PagecastError> {
        request.kind.validate(&request.properties)?;
        if let Some(parent_id) = &request.parent_id {
            if !self.store.active_page().contains_node(parent_id) {
                return Err(PagecastError::ParentNotFound(parent_id.clone()));
            }
        }

        let id = self.store.allocate_component_id();
        let mut node = ComponentNode::new(id, request.kind, request.properties);
        node.style = request.style;

        self.store
            .insert_node(node.clone(), request.parent_id.as_deref())?;
        tracing::info!(
            component = %node.id,
            kind = %node.kind,
            parent = request.parent_id.as_deref().unwrap_or("<root>"),
            "component added"
        );

        self.announce(ObserverEvent::ComponentAdd(node.clone()));
        OperationResult::success("Component added", &node)
    }

    /// Merge property and style keys into an existing component.
    pub fn update_component(
        &mut self,
        request: UpdateComponentRequest,
    ) -> Result<OperationResult, PagecastError> {
        let UpdateComponentRequest { component_id, patch } = request;

        let node = self
            .store
            .find_node(&component_id)
            .ok_or_else(|| PagecastError::ComponentNotFound(component_id.clone()))?;
        node.kind.validate(&patch.merged_properties(node))?;

        self.store.update_node(&component_id, &patch)?;
        tracing::info!(component = %component_id, "component updated");

        let update = ComponentUpdate {
            component_id,
            updates: patch,
        };
        let result = OperationResult::success("Component updated", &update);
        self.announce(ObserverEvent::ComponentUpdate(update));
        result
    }

    /// Remove a component and its subtree.
    pub fn remove_component(
        &mut self,
        request: RemoveComponentRequest,
    ) -> Result<OperationResult, PagecastError> {
        let removed = self.store.remove_node(&request.component_id)?;
        tracing::info!(
            component = %removed.id,
            descendants = removed.children.len(),
            "component removed"
        );

        self.announce(ObserverEvent::ComponentRemove(removed.id.clone()));
        OperationResult::success(
            "Component removed",
            json!({ "componentId": request.component_id }),
        )
    }

    /// The active page. Never broadcasts.
    pub fn get_current_page(&self) -> Result<OperationResult, PagecastError> {
        OperationResult::success("Current page", self.store.active_page())
    }

    /// Store a new page. The active page does not change and nothing is
    /// broadcast.
    pub fn create_page(&mut self, request: CreatePageRequest) -> Result<OperationResult, PagecastError> {
        if request.title.trim().is_empty() {
            return Err(PagecastError::BadRequest(
                "page title must not be empty".to_string(),
            ));
        }
        request
            .components
            .iter()
            .try_for_each(ComponentNode::validate_tree)?;

        let page = self.store.create_page(request.title, request.components);
        tracing::info!(page = %page.id, title = %page.title, "page created");
        OperationResult::success("Page created", page)
    }

    /// Make another page the active one.
    pub fn switch_page(&mut self, request: SwitchPageRequest) -> Result<OperationResult, PagecastError> {
        let page = self.store.switch_active(&request.page_id)?.clone();
        tracing::info!(page = %page.id, "active page switched");

        self.announce(ObserverEvent::snapshot(&page));
        OperationResult::success("Switched page", &page)
    }

    /// Every stored page, default first.
    pub fn list_pages(&self) -> Result<OperationResult, PagecastError> {
        OperationResult::success("Pages", self.store.list_pages())
    }

    /// Delete a non-default page. Observers get a snapshot only when the
    /// deleted page was active.
    pub fn delete_page(&mut self, page_id: &str) -> Result<OperationResult, PagecastError> {
        let was_active = self.store.active_page_id() == page_id;
        let removed = self.store.delete_page(page_id)?;
        tracing::info!(page = %removed.id, was_active, "page deleted");

        if was_active {
            self.hub
                .broadcast(&ObserverEvent::snapshot(self.store.active_page()));
        }
        OperationResult::success("Page deleted", json!({ "pageId": removed.id }))
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Run a catalog operation by wire name with JSON parameters.
    pub fn execute(&mut self, name: &str, params: Value) -> Result<OperationResult, PagecastError> {
        let op = Operation::from_name(name)
            .ok_or_else(|| PagecastError::BadRequest(format!("unknown operation: {}", name)))?;
        tracing::debug!(operation = %op, "executing");

        match op {
            Operation::UpdatePage => self.update_page(decode(op, params)?),
            Operation::AddComponent => self.add_component(decode(op, params)?),
            Operation::UpdateComponent => self.update_component(decode(op, params)?),
            Operation::RemoveComponent => self.remove_component(decode(op, params)?),
            Operation::GetCurrentPage => self.get_current_page(),
            Operation::CreatePage => self.create_page(decode(op, params)?),
            Operation::SwitchPage => self.switch_page(decode(op, params)?),
        }
    }

    /// Machine-readable schemas of every catalog operation.
    #[must_use]
    pub fn catalog(&self) -> Vec<OperationSpec> {
        catalog::operations()
    }

    /// Current service status.
    #[must_use]
    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            connected_observers: self.hub.open_count(),
            total_pages: self.store.page_count(),
            current_page_title: self.store.active_page().title.clone(),
            available_operations: Operation::ALL.len(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
