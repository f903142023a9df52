//! # Scenario Tier Tests (S0-S3)
//!
//! End-to-end behavior of the engine as observers see it.
//!
//! ## Tiers
//! - S0: Request Validation
//! - S1: Tree Mutation
//! - S2: Page Lifecycle
//! - S3: Observer Delivery

#![allow(clippy::panic)]

use pagecast_core::primitives::DEFAULT_PAGE_ID;
use pagecast_core::{MutationEngine, Observer, ObserverEvent, PagecastError};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Viewer {
    inbox: Arc<Mutex<Vec<String>>>,
    gone: Arc<AtomicBool>,
}

impl Viewer {
    fn events(&self) -> Vec<ObserverEvent> {
        self.inbox
            .lock()
            .expect("lock")
            .iter()
            .map(|m| serde_json::from_str(m).expect("event"))
            .collect()
    }

    fn types(&self) -> Vec<&'static str> {
        self.events().iter().map(ObserverEvent::type_name).collect()
    }

    fn disconnect(&self) {
        self.gone.store(true, Ordering::SeqCst);
    }
}

impl Observer for Viewer {
    fn is_open(&self) -> bool {
        !self.gone.load(Ordering::SeqCst)
    }

    fn deliver(&self, message: &str) -> Result<(), PagecastError> {
        self.inbox.lock().expect("lock").push(message.to_string());
        Ok(())
    }
}

fn engine_with_viewer() -> (MutationEngine, Viewer) {
    let mut engine = MutationEngine::new();
    let viewer = Viewer::default();
    engine
        .register_observer(Box::new(viewer.clone()))
        .expect("register");
    (engine, viewer)
}

// =============================================================================
// TIER S0: REQUEST VALIDATION
// =============================================================================

mod s0_request_validation {
    use super::*;

    /// S0.1: Missing required fields never reach the store.
    #[test]
    fn missing_fields_are_bad_requests() {
        let (mut engine, viewer) = engine_with_viewer();
        let before = engine.store().active_page().clone();

        for (name, params) in [
            ("add_component", json!({ "props": {} })),
            ("update_component", json!({ "props": { "text": "x" } })),
            ("remove_component", json!({})),
            ("create_page", json!({ "components": [] })),
            ("switch_page", json!({})),
            ("update_page", json!({})),
        ] {
            let err = engine.execute(name, params).expect_err(name);
            assert!(matches!(err, PagecastError::BadRequest(_)), "{}: {}", name, err);
        }

        assert_eq!(engine.store().active_page(), &before);
        assert_eq!(viewer.types(), vec!["page_update"]);
    }

    /// S0.2: Kind schemas are enforced on add.
    #[test]
    fn schema_violations_are_rejected() {
        let mut engine = MutationEngine::new();
        let cases = [
            json!({ "type": "header", "props": { "text": "t", "level": 7 } }),
            json!({ "type": "button", "props": { "text": "b", "variant": "ghost" } }),
            json!({ "type": "image", "props": { "src": "a.png" } }),
            json!({ "type": "list", "props": { "items": ["a", 1], "ordered": false } }),
            json!({ "type": "slider", "props": {} }),
        ];
        for params in cases {
            let err = engine
                .execute("add_component", params.clone())
                .expect_err("invalid");
            assert!(matches!(err, PagecastError::BadRequest(_)), "{}", params);
        }
    }

    /// S0.3: Whole-page replacement validates every node.
    #[test]
    fn update_page_rejects_invalid_nested_nodes() {
        let mut engine = MutationEngine::new();
        let err = engine
            .execute(
                "update_page",
                json!({ "pageConfig": {
                    "id": "default",
                    "title": "Broken",
                    "components": [{
                        "id": "c", "type": "card", "props": {},
                        "children": [{ "id": "t", "type": "text", "props": {} }]
                    }]
                }}),
            )
            .expect_err("nested text without content");
        assert!(err.to_string().contains("component 't'"));
        assert_eq!(engine.status().current_page_title, "Live Component Demo");
    }
}

// =============================================================================
// TIER S1: TREE MUTATION
// =============================================================================

mod s1_tree_mutation {
    use super::*;

    /// S1.1: Adding text to the seeded page yields a third root and two
    /// broadcasts in order.
    #[test]
    fn add_text_to_default_page() {
        let (mut engine, viewer) = engine_with_viewer();
        let result = engine
            .execute(
                "add_component",
                json!({ "type": "text", "props": { "content": "Hello" } }),
            )
            .expect("add");

        assert!(result.success);
        let roots = &engine.store().active_page().components;
        assert_eq!(roots.len(), 3);
        assert_eq!(roots[2].properties["content"], "Hello");
        assert_eq!(viewer.types(), vec!["page_update", "component_add", "page_update"]);

        let events = viewer.events();
        match &events[2] {
            ObserverEvent::PageUpdate(page) => assert_eq!(page, engine.store().active_page()),
            other => panic!("expected snapshot, got {:?}", other),
        }
    }

    /// S1.2: Updating a missing node changes nothing and broadcasts nothing.
    #[test]
    fn update_missing_node() {
        let (mut engine, viewer) = engine_with_viewer();
        let before = engine.store().active_page().clone();

        let err = engine
            .execute(
                "update_component",
                json!({ "componentId": "missing", "props": { "text": "x" } }),
            )
            .expect_err("missing");

        assert!(err.is_not_found());
        assert_eq!(engine.store().active_page(), &before);
        assert_eq!(viewer.types(), vec!["page_update"]);
    }

    /// S1.3: Style-only update keeps properties.
    #[test]
    fn style_update_keeps_properties() {
        let mut engine = MutationEngine::new();
        engine
            .execute(
                "update_component",
                json!({ "componentId": "demo-button", "style": { "margin": "4px" } }),
            )
            .expect("update");
        let node = engine.store().find_node("demo-button").expect("node");
        assert_eq!(node.properties["onClick"], "demo_interaction");
        assert_eq!(node.style.as_ref().expect("style")["margin"], "4px");
    }

    /// S1.4: Duplicate IDs resolve to the first pre-order match.
    #[test]
    fn duplicate_ids_first_match_wins() {
        let mut engine = MutationEngine::new();
        engine
            .execute(
                "update_page",
                json!({ "pageConfig": {
                    "id": "default",
                    "title": "Dupes",
                    "components": [
                        { "id": "card", "type": "card", "props": {},
                          "children": [{ "id": "dup", "type": "text", "props": { "content": "inner" } }] },
                        { "id": "dup", "type": "text", "props": { "content": "outer" } }
                    ]
                }}),
            )
            .expect("replace");

        engine
            .execute("remove_component", json!({ "componentId": "dup" }))
            .expect("remove");

        let page = engine.store().active_page();
        let remaining = page.find_node("dup").expect("second dup");
        assert_eq!(remaining.properties["content"], "outer");
        assert!(page.components[0].children.is_empty());
    }
}

// =============================================================================
// TIER S2: PAGE LIFECYCLE
// =============================================================================

mod s2_page_lifecycle {
    use super::*;

    /// S2.1: Switching to an unknown page keeps the active page.
    #[test]
    fn switch_to_unknown_page() {
        let (mut engine, viewer) = engine_with_viewer();
        let err = engine
            .execute("switch_page", json!({ "pageId": "unknown" }))
            .expect_err("unknown");
        assert!(err.is_not_found());
        assert_eq!(engine.store().active_page_id(), DEFAULT_PAGE_ID);
        assert_eq!(viewer.types().len(), 1);
    }

    /// S2.2: The default page cannot be deleted.
    #[test]
    fn default_page_is_permanent() {
        let mut engine = MutationEngine::new();
        let err = engine.delete_page(DEFAULT_PAGE_ID).expect_err("refused");
        assert!(matches!(err, PagecastError::Refused(_)));
        assert_eq!(engine.status().total_pages, 1);
    }

    /// S2.3: Mutations follow the active page.
    #[test]
    fn mutations_follow_active_page() {
        let mut engine = MutationEngine::new();
        let created = engine
            .execute("create_page", json!({ "title": "Second" }))
            .expect("create");
        let id = created.data.expect("data")["id"]
            .as_str()
            .expect("id")
            .to_string();
        engine
            .execute("switch_page", json!({ "pageId": id }))
            .expect("switch");
        engine
            .execute(
                "add_component",
                json!({ "type": "text", "props": { "content": "on second" } }),
            )
            .expect("add");

        assert_eq!(engine.store().active_page().components.len(), 1);
        let default = engine.store().page(DEFAULT_PAGE_ID).expect("default");
        assert_eq!(default.components.len(), 2);
    }
}

// =============================================================================
// TIER S3: OBSERVER DELIVERY
// =============================================================================

mod s3_observer_delivery {
    use super::*;

    /// S3.1: Registration yields exactly one snapshot of the active page.
    #[test]
    fn registration_snapshot() {
        let (engine, viewer) = engine_with_viewer();
        let events = viewer.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], ObserverEvent::snapshot(engine.store().active_page()));
    }

    /// S3.2: A viewer that disconnects mid-session is skipped; others still
    /// receive.
    #[test]
    fn closed_viewer_is_skipped() {
        let (mut engine, first) = engine_with_viewer();
        let second = Viewer::default();
        engine
            .register_observer(Box::new(second.clone()))
            .expect("register");

        second.disconnect();
        engine
            .execute("remove_component", json!({ "componentId": "welcome-header" }))
            .expect("remove");

        assert_eq!(first.types().len(), 3);
        assert_eq!(second.types().len(), 1);
        assert_eq!(engine.status().connected_observers, 1);
    }

    /// S3.3: Viewer interactions are accepted and timestamped.
    #[test]
    fn interaction_round_trip() {
        let mut engine = MutationEngine::new();
        let id = engine
            .register_observer(Box::new(Viewer::default()))
            .expect("register");
        let event = engine
            .handle_observer_message(
                id,
                r#"{"type":"component_event","payload":{"eventName":"demo_interaction","componentId":"demo-button"}}"#,
            )
            .expect("parse")
            .expect("interaction");
        assert_eq!(event.component_id, "demo-button");
        assert!(event.timestamp.is_some());

        assert!(engine.deregister_observer(id));
        assert_eq!(engine.status().connected_observers, 0);
    }
}
