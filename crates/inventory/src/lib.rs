//! Inventory reference data and stock movements.
//!
//! Units of measure, the item catalog, storage locations and the
//! append-only transaction log. Pure domain logic: no IO, no persistence.

pub mod item;
pub mod storage;
pub mod timestamp;
pub mod transaction;
pub mod unit;

pub use item::{GroupRegistry, Item, ItemCatalog, ItemGroup};
pub use storage::{Storage, StorageRegistry};
pub use timestamp::{TIMESTAMP_FORMAT, parse_timestamp};
pub use transaction::{Direction, Transaction, TransactionLog};
pub use unit::{UnitOfMeasure, UnitRegistry, convert};
