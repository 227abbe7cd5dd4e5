//! # Catalog Primitives
//!
//! Hardcoded runtime constants for the Sysmap catalog.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! They bound input sizes at the boundary and fix the documented defaults
//! for optional record fields.

/// Default transfer frequency stamped on a dataflow when none is supplied.
pub const DEFAULT_FREQUENCY: &str = "real-time";

/// Default version string for a freshly cataloged system.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Default criticality class label for a freshly cataloged system.
///
/// This is the free-form tier label, distinct from the derived
/// `is_critical` flag computed from business-function criticality.
pub const DEFAULT_CRITICALITY_CLASS: &str = "Business operational";

/// Number of entries reported by the top-technologies statistic.
pub const TOP_TECHNOLOGIES: usize = 10;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for system names and business codes.
///
/// Names longer than this are rejected before reaching the store.
/// This prevents memory exhaustion from malicious or malformed input.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum length for free-text fields (description, purpose, business value).
pub const MAX_TEXT_LENGTH: usize = 65536;

/// Maximum number of entries in a list field (data objects, technology
/// stack, business functions, dependent systems).
pub const MAX_LIST_ITEMS: usize = 1024;
