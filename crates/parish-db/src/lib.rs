//! # parish-db
//!
//! Persistence layer implementing the `parish-core` repository traits.
//!
//! ## Overview
//!
//! Two interchangeable backends are provided:
//!
//! - PostgreSQL via SQLx (`Pg*Repository`), with schema migrations under `migrations/`
//! - [`InMemoryStore`], a process-local store used by tests and by servers
//!   started without `DATABASE_URL`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parish_db::{create_pool, run_migrations, DatabaseConfig, PgEventRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new("postgres://localhost/parish", 10, 1);
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let events = PgEventRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::InMemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAssignmentRepository, PgEventRepository, PgSlotRepository, PgSmsLogRepository,
    PgUserRepository,
};
