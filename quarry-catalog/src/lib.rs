mod catalog;
mod entry;
mod error;
mod inspector;

pub use catalog::Catalog;
pub use entry::DatabaseEntry;
pub use error::CatalogError;
pub use inspector::{open_immutable, Inspector};
