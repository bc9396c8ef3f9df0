//! Catalog access for dszip
//!
//! The export pipeline reads the catalog through the narrow [`Catalog`]
//! contract: look up a dataset, page through candidate files, load the
//! dataset's entity file paths, and write back the archive size.
//!
//! - [`SqliteCatalog`]: relational backend over rusqlite
//! - [`CandidateFiles`]: lazy, paged candidate universe for one export
//! - [`MembershipIndex`]: O(1) path membership for a dataset's entities
//! - [`testing`]: in-memory catalog fixtures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidates;
pub mod error;
pub mod membership;
pub mod schema;
pub mod sqlite;
pub mod testing;
pub mod traits;

pub use candidates::{CandidateFiles, CandidateScope, DEFAULT_BATCH_SIZE};
pub use error::{CatalogError, CatalogResult, IndexLoadError};
pub use membership::MembershipIndex;
pub use sqlite::SqliteCatalog;
pub use traits::{Catalog, PageRequest};
