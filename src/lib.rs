// Finsight - Core Library
// Transaction classification core; the CLI (and any future surface) calls in
// with structured data and renders structured results.

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod loader;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use aggregate::{credit_total, debit_totals, CategoryTotal};
pub use classifier::classify;
pub use config::resolve_store_path;
pub use db::{DocStore, CATEGORIES_DOC_ID};
pub use error::{Error, Result};
pub use loader::{load_transactions, load_transactions_file, Direction, Transaction};
pub use session::{CategoryEdit, Session};
pub use store::{CategoryBook, CategoryEntry, CategoryStore, UNCATEGORIZED};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
