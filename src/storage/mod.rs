mod memory;
mod repository;

use anyhow::Result;

pub use memory::*;
pub use repository::*;

/// SQL migration for the key-value table
pub const MIGRATION_001_KEY_VALUE: &str = include_str!("migrations/001_key_value.sql");

/// Keys under which the ledger state is stored.
pub const KEY_EXPENSES: &str = "expenses";
pub const KEY_BUDGET: &str = "budget";
pub const KEY_DARK_MODE: &str = "darkMode";

/// String key-value persistence used by the ledger store.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
