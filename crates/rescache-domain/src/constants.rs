//! Domain layer constants
//!
//! Contains constants that are part of the cache contract and are shared by
//! the application layer and every backend. Infrastructure-specific defaults
//! remain in `rescache_infrastructure::constants`.

// ============================================================================
// KEY FORMAT CONSTANTS
// ============================================================================

/// Delimiter between components of a backing-store key
pub const STORE_KEY_DELIMITER: char = ':';

/// Delimiter between components of a semantic entity identity
pub const IDENTITY_DELIMITER: char = ';';

/// Key segment holding serialized entity attributes
pub const ATTRIBUTES_SEGMENT: &str = "attributes";

/// Key segment holding relationship data and the relationship-name index
pub const RELATIONSHIPS_SEGMENT: &str = "relationships";

/// Key segment holding the membership set of a type
pub const MEMBERS_SEGMENT: &str = "members";

/// Key segment holding stored content hashes of a type
pub const HASHES_SEGMENT: &str = "hashes";

/// Key segment of the per-type marker that disables hash comparison
pub const HASHES_DISABLED_SEGMENT: &str = "hashes.disabled";

// ============================================================================
// SCAN CONSTANTS
// ============================================================================

/// Cursor value that both starts and terminates a set scan
pub const SCAN_END_CURSOR: &str = "0";

// ============================================================================
// BATCHING DEFAULTS
// ============================================================================

/// Default maximum entities written per merge batch
pub const DEFAULT_MAX_MERGE_BATCH_SIZE: usize = 100;

/// Default maximum ids removed per eviction batch
pub const DEFAULT_MAX_EVICT_BATCH_SIZE: usize = 100;

/// Default maximum ids resolved per read batch
pub const DEFAULT_MAX_GET_BATCH_SIZE: usize = 100;

/// Default number of set members requested per scan page
pub const DEFAULT_SCAN_PAGE_SIZE: usize = 1000;

// ============================================================================
// ON-DEMAND CONSTANTS
// ============================================================================

/// Entity type holding on-demand refresh bookkeeping
pub const ON_DEMAND_TYPE: &str = "onDemand";

/// On-demand attribute: epoch millis of the on-demand write
pub const ON_DEMAND_CACHE_TIME: &str = "cacheTime";

/// On-demand attribute: number of polls that have observed the entry
pub const ON_DEMAND_PROCESSED_COUNT: &str = "processedCount";

/// On-demand attribute: epoch millis of the last poll that observed the entry
pub const ON_DEMAND_PROCESSED_TIME: &str = "processedTime";

/// On-demand attribute: agent type that produced the entry
pub const ON_DEMAND_MONIKER: &str = "moniker";
