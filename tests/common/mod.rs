// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::Path;

use anyhow::{Result, bail};
use tally::application::LedgerStore;
use tally::io::ReceiptImage;
use tally::storage::{KeyValueStore, Repository};
use tempfile::TempDir;

/// Helper to create a test store backed by a temporary database
pub async fn test_store() -> Result<(LedgerStore<Repository>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = open_store(temp_dir.path()).await?;
    Ok((store, temp_dir))
}

/// Open (or reopen) the ledger stored in `dir`
pub async fn open_store(dir: &Path) -> Result<LedgerStore<Repository>> {
    let db_path = dir.join("test.db");
    let repo = Repository::open(db_path.to_str().unwrap()).await?;
    Ok(LedgerStore::load(repo).await)
}

/// A small fake PNG receipt
pub fn sample_receipt() -> ReceiptImage {
    ReceiptImage::from_bytes(b"\x89PNG fake receipt", "image/png").unwrap()
}

/// Storage whose reads find nothing and whose writes always fail
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        bail!("disk full while writing '{}'", key)
    }
}

/// Storage whose reads fail
pub struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        bail!("cannot read '{}'", key)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}
