//! Allocation engine: the row store behind the allocation form and the
//! calculator that turns it into per-category totals.
//!
//! ```rust
//! use engine::{AllocationSchema, Field, RowStore};
//!
//! let mut store = RowStore::new(AllocationSchema::accounts());
//! store.update_field(0, Field::Label("Brokerage".to_string())).unwrap();
//! store.update_field(0, Field::Amount(100.0)).unwrap();
//!
//! let summary = store.calculate().unwrap();
//! assert_eq!(summary.grand_total, 100.0);
//! assert_eq!(summary.total("Stocks").unwrap().total, 34.0);
//! ```

pub use entry::{Entry, EntryId, Field};
pub use error::EngineError;
pub use schema::{AllocationSchema, Category, Rgb, SchemaBuilder};
pub use store::{RemoveOutcome, RowStore, Validation};
pub use summary::{CategoryTotal, PieSlice, RowBreakdown, Summary, SummaryTable, calculate};

mod entry;
mod error;
pub mod money;
mod schema;
mod store;
mod summary;

pub type ResultEngine<T> = Result<T, EngineError>;
