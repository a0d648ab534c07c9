//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Server
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

// =============================================================================
// Database (MySQL)
// =============================================================================

/// Default MySQL host (for development)
pub const DEFAULT_MYSQL_HOST: &str = "127.0.0.1";

/// Default MySQL port
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Default MySQL user
pub const DEFAULT_MYSQL_USER: &str = "root";

/// Default MySQL database name
pub const DEFAULT_MYSQL_DATABASE: &str = "app";

/// Directory holding paired `{timestamp}_{description}.up.sql` files
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

// =============================================================================
// Cache (Redis)
// =============================================================================

/// Default Redis host (for development)
pub const DEFAULT_REDIS_HOST: &str = "127.0.0.1";

/// Default Redis port
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Default Redis database index
pub const DEFAULT_REDIS_DATABASE: u32 = 0;

/// Default cache TTL in seconds (1 hour)
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;
