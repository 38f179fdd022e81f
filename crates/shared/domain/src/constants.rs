//! Domain-level constants.
//!
//! These constants define storage limits shared by the schema and validation.

// =============================================================================
// Column limits
// =============================================================================

/// Maximum display name length (matches the column definition)
pub const MAX_NAME_LENGTH: u64 = 255;

/// Maximum email length (matches the column definition)
pub const MAX_EMAIL_LENGTH: u64 = 255;
