// notion/mod.rs - External document store boundary
//
// The account service only talks to the `DocumentStore` trait. `NotionClient`
// is the production implementation; `crate::testing` provides in-memory doubles.

mod client;
mod error;
mod types;

pub use client::NotionClient;
pub use error::StoreError;
pub use types::{Page, PageUpdate, PropertyMap};

use async_trait::async_trait;

/// Operations the account service needs from the document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All pages of a database, in the store's native order
    async fn query(&self, database_id: &str) -> Result<Vec<Page>, StoreError>;

    /// Create a page under a database and return it as stored
    async fn create(&self, database_id: &str, properties: PropertyMap) -> Result<Page, StoreError>;

    /// Write properties or the archival flag of an existing page
    async fn update(&self, page_id: &str, update: PageUpdate) -> Result<(), StoreError>;

    /// Read a single page
    async fn retrieve(&self, page_id: &str) -> Result<Page, StoreError>;
}
