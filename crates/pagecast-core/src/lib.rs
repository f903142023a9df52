//! # pagecast-core
//!
//! The live component-tree engine for pagecast.
//!
//! This crate holds the authoritative description of what every viewer
//! should display: a set of pages, each an ordered tree of typed UI
//! components, one of which is active. Controllers change the tree through
//! the operation API of the `MutationEngine`; every visible change is
//! fanned out to registered observers.
//!
//! ## Layout
//!
//! - `node` → component and page model, per-kind property schemas
//! - `store` → page storage, active pointer, tree walks
//! - `hub` → observer registry and broadcast
//! - `catalog` → discoverable operation schemas
//! - `mutation` → the operation API tying store and hub together
//!
//! ## Constraints
//!
//! - Synchronous and single-owner: callers serialize access
//! - NO async, NO network dependencies; transports plug in through the
//!   `Observer` trait

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod hub;
pub mod mutation;
pub mod node;
pub mod primitives;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{ErrorKind, ObserverId, PagecastError};

// =============================================================================
// RE-EXPORTS: Model
// =============================================================================

pub use node::{
    ComponentKind, ComponentNode, NodePatch, Page, Properties, PropertySpec, PropertyType, Style,
};
pub use store::{TreeStore, seed_page};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use catalog::{InputSchema, Operation, OperationSpec, operations};
pub use hub::{
    BroadcastReport, ComponentUpdate, InteractionEvent, Observer, ObserverEvent, ObserverHub,
};
pub use mutation::{
    AddComponentRequest, CreatePageRequest, MutationEngine, OperationResult,
    RemoveComponentRequest, ServiceStatus, SwitchPageRequest, UpdateComponentRequest,
    UpdatePageRequest,
};
