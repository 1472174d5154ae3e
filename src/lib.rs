//! Pick random movies from a personal catalog.
//!
//! User filter strings (`--rank 50-100`, `--year 1980s`, `--director "Nolan; !Zimmer"`)
//! are compiled into [`filter::Predicate`] trees, ANDed together and applied
//! to the movies still in the selection pool. Movies can be removed from the
//! pool once watched and the pool can be reset.

pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod grammar;
pub mod pool;
pub mod query;
pub mod render;
pub mod selection;
pub mod storage;
pub mod types;

pub use commands::{App, Command, ExitOutcome, GetRequest};
pub use config::{Config, ConfigBuilder, FileConfig};
pub use error::{Error, Result};
pub use filter::{FilterResult, MovieFilter, Predicate};
pub use query::FilterSpec;
pub use selection::{select, Count, Selection};
pub use storage::{CatalogStore, CsvStore};
pub use types::{Catalog, Movie};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::commands::{App, Command, ExitOutcome, GetRequest};
    pub use crate::config::{Config, ConfigBuilder, FileConfig};
    pub use crate::error::{Error, Result};
    pub use crate::filter::{FilterResult, MovieFilter, Predicate};
    pub use crate::query::FilterSpec;
    pub use crate::selection::{Count, Selection};
    pub use crate::storage::{CatalogStore, CsvStore};
    pub use crate::types::{Catalog, Movie};
}
