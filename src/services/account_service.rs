use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::accounts::{self, Account, AccountFields, MapperError};
use crate::notion::{DocumentStore, PageUpdate, StoreError};
use crate::types::Operation;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("configuration error: NOTION_DATABASE_ID is not set")]
    Configuration,

    #[error("invalid account: {0}")]
    InvalidInput(#[from] MapperError),

    #[error("{operation} failed: {source}")]
    Store {
        operation: Operation,
        #[source]
        source: StoreError,
    },
}

/// Acknowledgement returned by delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub success: bool,
}

/// CRUD over the accounts database. Holds no state between calls.
pub struct AccountService {
    store: Arc<dyn DocumentStore>,
    database_id: Option<String>,
    timeout: Duration,
}

impl AccountService {
    pub fn new(store: Arc<dyn DocumentStore>, database_id: Option<String>, timeout: Duration) -> Self {
        Self {
            store,
            database_id: database_id.filter(|id| !id.trim().is_empty()),
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.database_id.is_some()
    }

    fn database_id(&self) -> Result<&str, AccountError> {
        self.database_id.as_deref().ok_or(AccountError::Configuration)
    }

    /// Run one store call under the configured timeout
    async fn call<T, F>(&self, operation: Operation, fut: F) -> Result<T, AccountError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let result = match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        };
        result.map_err(|source| AccountError::Store { operation, source })
    }

    /// All non-archived accounts in store order
    pub async fn list(&self) -> Result<Vec<Account>, AccountError> {
        let database_id = self.database_id()?;
        let pages = self.call(Operation::List, self.store.query(database_id)).await?;

        let accounts: Vec<Account> = pages
            .iter()
            .filter(|page| !page.is_archived())
            .map(accounts::decode)
            .collect();
        tracing::debug!(total = pages.len(), listed = accounts.len(), "listed accounts");
        Ok(accounts)
    }

    pub async fn create(&self, fields: &AccountFields) -> Result<Account, AccountError> {
        let database_id = self.database_id()?;
        let properties = accounts::encode(fields)?;
        let page = self
            .call(Operation::Create, self.store.create(database_id, properties))
            .await?;

        tracing::info!(id = %page.id, "created account");
        Ok(accounts::decode(&page))
    }

    /// Write every field, then re-read the page so the caller sees what the store kept
    pub async fn update(&self, id: &str, fields: &AccountFields) -> Result<Account, AccountError> {
        self.database_id()?;
        let properties = accounts::encode(fields)?;
        self.call(
            Operation::Update,
            self.store.update(id, PageUpdate::Properties(properties)),
        )
        .await?;

        let page = self.call(Operation::Update, self.store.retrieve(id)).await?;
        tracing::info!(id = %id, "updated account");
        Ok(accounts::decode(&page))
    }

    /// Archive the page. Archiving an archived page succeeds.
    pub async fn delete(&self, id: &str) -> Result<Deleted, AccountError> {
        self.database_id()?;
        self.call(Operation::Delete, self.store.update(id, PageUpdate::Archive))
            .await?;

        tracing::info!(id = %id, "archived account");
        Ok(Deleted { success: true })
    }
}
