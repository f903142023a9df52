//! # Primitives
//!
//! Fixed identifiers and limits for the pagecast engine.
//! These are compiled into the binary and immutable at runtime.

/// ID of the reserved page created at store initialization.
///
/// - It can never be deleted.
/// - It is the fallback whenever the active page would dangle.
pub const DEFAULT_PAGE_ID: &str = "default";

/// Title of the seeded default page.
pub const DEFAULT_PAGE_TITLE: &str = "Live Component Demo";

/// Prefix for component IDs allocated by the store.
pub const COMPONENT_ID_PREFIX: &str = "component-";

/// Prefix for page IDs allocated by the store.
pub const PAGE_ID_PREFIX: &str = "page-";

/// Lowest allowed `level` for a header component.
pub const MIN_HEADING_LEVEL: i64 = 1;

/// Highest allowed `level` for a header component.
pub const MAX_HEADING_LEVEL: i64 = 6;
