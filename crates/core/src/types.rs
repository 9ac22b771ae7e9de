//! Primitive type aliases shared across the workspace.

/// Database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Timestamps are always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Money is integer cents in the owning row's currency, so the
/// synchronizer's compare-to-the-cent rule is exact integer equality.
pub type Cents = i64;
