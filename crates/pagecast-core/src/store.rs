//! # Tree Store
//!
//! Holds every page, tracks which page is active, and performs the CRUD
//! tree walks on the active page.
//!
//! The reserved default page is kept outside the page map, so it cannot be
//! removed and the active pointer always has somewhere to fall back to.
//! Pages are keyed in a `BTreeMap`, which keeps listings stable.

use crate::node::{self, ComponentKind, ComponentNode, NodePatch, Page, Properties};
use crate::primitives::{COMPONENT_ID_PREFIX, DEFAULT_PAGE_ID, DEFAULT_PAGE_TITLE, PAGE_ID_PREFIX};
use crate::PagecastError;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Page storage plus the active page pointer.
#[derive(Debug, Clone)]
pub struct TreeStore {
    /// The reserved page. Never removed.
    default_page: Page,
    /// Every other page, keyed by ID.
    pages: BTreeMap<String, Page>,
    /// ID of the page currently shown to observers.
    active_page_id: String,
    /// Last component sequence number handed out.
    component_seq: u64,
    /// Last page sequence number handed out.
    page_seq: u64,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeStore {
    /// Create a store whose default page carries the seed content.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_page(seed_page())
    }

    /// Create a store with custom default page content.
    ///
    /// The page's ID is forced to the reserved default ID.
    #[must_use]
    pub fn with_default_page(mut page: Page) -> Self {
        page.id = DEFAULT_PAGE_ID.to_string();
        Self {
            default_page: page,
            pages: BTreeMap::new(),
            active_page_id: DEFAULT_PAGE_ID.to_string(),
            component_seq: 0,
            page_seq: 0,
        }
    }

    // =========================================================================
    // PAGES
    // =========================================================================

    /// ID of the active page.
    #[must_use]
    pub fn active_page_id(&self) -> &str {
        &self.active_page_id
    }

    /// The active page, or the default page if the pointer does not resolve.
    #[must_use]
    pub fn active_page(&self) -> &Page {
        self.pages
            .get(&self.active_page_id)
            .unwrap_or(&self.default_page)
    }

    fn active_page_mut(&mut self) -> &mut Page {
        match self.pages.get_mut(&self.active_page_id) {
            Some(page) => page,
            None => &mut self.default_page,
        }
    }

    /// Look up any page by ID.
    #[must_use]
    pub fn page(&self, page_id: &str) -> Option<&Page> {
        if page_id == DEFAULT_PAGE_ID {
            Some(&self.default_page)
        } else {
            self.pages.get(page_id)
        }
    }

    /// Insert or overwrite the page keyed by `page.id`.
    ///
    /// Trusted bulk replace: the tree is stored as given.
    pub fn replace_page(&mut self, page: Page) {
        if page.id == DEFAULT_PAGE_ID {
            self.default_page = page;
        } else {
            self.pages.insert(page.id.clone(), page);
        }
    }

    /// Make `page_id` the active page.
    ///
    /// On a missing ID the active page is left as it was.
    pub fn switch_active(&mut self, page_id: &str) -> Result<&Page, PagecastError> {
        if page_id != DEFAULT_PAGE_ID && !self.pages.contains_key(page_id) {
            return Err(PagecastError::PageNotFound(page_id.to_string()));
        }
        self.active_page_id = page_id.to_string();
        Ok(self.active_page())
    }

    /// Store a new page under a fresh ID. The active page does not change.
    pub fn create_page(&mut self, title: impl Into<String>, components: Vec<ComponentNode>) -> &Page {
        let id = self.allocate_page_id();
        self.pages
            .entry(id.clone())
            .or_insert_with(|| Page::new(id, title, components))
    }

    /// Remove a page.
    ///
    /// The default page is refused. Deleting the active page resets the
    /// active pointer to the default page.
    pub fn delete_page(&mut self, page_id: &str) -> Result<Page, PagecastError> {
        if page_id == DEFAULT_PAGE_ID {
            return Err(PagecastError::Refused(
                "the default page cannot be deleted".to_string(),
            ));
        }
        let removed = self
            .pages
            .remove(page_id)
            .ok_or_else(|| PagecastError::PageNotFound(page_id.to_string()))?;
        if self.active_page_id == page_id {
            self.active_page_id = DEFAULT_PAGE_ID.to_string();
        }
        Ok(removed)
    }

    /// Every stored page: the default page first, then the rest by ID.
    #[must_use]
    pub fn list_pages(&self) -> Vec<&Page> {
        std::iter::once(&self.default_page)
            .chain(self.pages.values())
            .collect()
    }

    /// Number of stored pages, default included.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    // =========================================================================
    // NODES (active page)
    // =========================================================================

    /// Append `node` to the active page.
    ///
    /// Without a parent the node becomes the last root. With a parent, the
    /// first pre-order match receives it as its last child; if there is no
    /// match the tree is unchanged.
    pub fn insert_node(
        &mut self,
        node: ComponentNode,
        parent_id: Option<&str>,
    ) -> Result<(), PagecastError> {
        let page = self.active_page_mut();
        match parent_id {
            None => {
                page.components.push(node);
                Ok(())
            }
            Some(parent_id) => match node::find_in_mut(&mut page.components, parent_id) {
                Some(parent) => {
                    parent.children.push(node);
                    Ok(())
                }
                None => Err(PagecastError::ParentNotFound(parent_id.to_string())),
            },
        }
    }

    /// Shallow-merge `patch` into the first pre-order match for `node_id`.
    pub fn update_node(&mut self, node_id: &str, patch: &NodePatch) -> Result<(), PagecastError> {
        let page = self.active_page_mut();
        let node = node::find_in_mut(&mut page.components, node_id)
            .ok_or_else(|| PagecastError::ComponentNotFound(node_id.to_string()))?;
        patch.apply_to(node);
        Ok(())
    }

    /// Detach the first pre-order match for `node_id`, with its subtree.
    pub fn remove_node(&mut self, node_id: &str) -> Result<ComponentNode, PagecastError> {
        let page = self.active_page_mut();
        node::detach_in(&mut page.components, node_id)
            .ok_or_else(|| PagecastError::ComponentNotFound(node_id.to_string()))
    }

    /// First pre-order match for `node_id` in the active page.
    #[must_use]
    pub fn find_node(&self, node_id: &str) -> Option<&ComponentNode> {
        self.active_page().find_node(node_id)
    }

    // =========================================================================
    // ID ALLOCATION
    // =========================================================================

    /// Hand out a component ID not present in the active page.
    ///
    /// The sequence only moves forward, so an ID is never handed out twice.
    pub fn allocate_component_id(&mut self) -> String {
        loop {
            self.component_seq += 1;
            let id = format!("{}{}", COMPONENT_ID_PREFIX, self.component_seq);
            if !self.active_page().contains_node(&id) {
                return id;
            }
        }
    }

    /// Hand out a page ID not used by any stored page.
    pub fn allocate_page_id(&mut self) -> String {
        loop {
            self.page_seq += 1;
            let id = format!("{}{}", PAGE_ID_PREFIX, self.page_seq);
            if !self.pages.contains_key(&id) {
                return id;
            }
        }
    }
}

// =============================================================================
// SEED CONTENT
// =============================================================================

fn object(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => Properties::new(),
    }
}

/// Content of the default page at startup.
#[must_use]
pub fn seed_page() -> Page {
    let header = ComponentNode::new(
        "welcome-header",
        ComponentKind::Header,
        object(json!({ "text": "Welcome to pagecast", "level": 1 })),
    )
    .with_style(object(json!({
        "textAlign": "center",
        "color": "white",
        "textShadow": "2px 2px 4px rgba(0,0,0,0.5)",
        "marginBottom": "30px"
    })));

    let card = ComponentNode::new(
        "info-card",
        ComponentKind::Card,
        object(json!({ "title": "About this page" })),
    )
    .with_style(object(json!({ "maxWidth": "800px", "margin": "20px auto" })))
    .with_children(vec![
        ComponentNode::new(
            "description-text",
            ComponentKind::Text,
            object(json!({
                "content": "This page is driven remotely. Controllers add, update and remove \
                            components through the operation API and every viewer follows along.",
                "size": "medium"
            })),
        ),
        ComponentNode::new(
            "demo-button",
            ComponentKind::Button,
            object(json!({
                "text": "Try an interaction",
                "variant": "primary",
                "onClick": "demo_interaction"
            })),
        ),
    ]);

    Page::new(DEFAULT_PAGE_ID, DEFAULT_PAGE_TITLE, vec![header, card])
}

// =============================================================================
// TESTS
// =============================================================================
