//! Document store doubles for unit and integration tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::notion::{DocumentStore, Page, PageUpdate, PropertyMap, StoreError};

#[derive(Default)]
struct State {
    pages: Vec<Page>,
    calls: HashMap<&'static str, usize>,
    fail_next: Option<StoreError>,
    delay: Duration,
}

/// In-memory database that behaves like Notion for the calls the service makes:
/// property updates merge, archiving is a flag, and queries return archived pages too.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a page regardless of its archived flag
    pub fn page(&self, id: &str) -> Option<Page> {
        self.lock().pages.iter().find(|p| p.id == id).cloned()
    }

    /// Every stored page, archived included
    pub fn pages(&self) -> Vec<Page> {
        self.lock().pages.clone()
    }

    pub fn set_archived(&self, id: &str, archived: bool) {
        if let Some(page) = self.lock().pages.iter_mut().find(|p| p.id == id) {
            page.archived = archived;
        }
    }

    /// Number of times a store method ("query", "create", "update", "retrieve") ran
    pub fn calls(&self, method: &str) -> usize {
        self.lock().calls.get(method).copied().unwrap_or(0)
    }

    /// Make the next store call fail with `error`
    pub fn fail_next(&self, error: StoreError) {
        self.lock().fail_next = Some(error);
    }

    /// Sleep before answering each call
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = delay;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn enter(&self, method: &'static str) -> Result<(), StoreError> {
        let (delay, failure) = {
            let mut state = self.lock();
            *state.calls.entry(method).or_default() += 1;
            (state.delay, state.fail_next.take())
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Notion echoes each property back with its `type` alongside the value
fn normalize(properties: PropertyMap) -> PropertyMap {
    properties
        .into_iter()
        .map(|(name, mut value)| {
            if let Value::Object(map) = &mut value {
                let kind = map.keys().find(|k| k.as_str() != "type").cloned();
                if let Some(kind) = kind {
                    map.insert("type".to_string(), Value::String(kind));
                }
            }
            (name, value)
        })
        .collect()
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn query(&self, _database_id: &str) -> Result<Vec<Page>, StoreError> {
        self.enter("query").await?;
        Ok(self.pages())
    }

    async fn create(&self, _database_id: &str, properties: PropertyMap) -> Result<Page, StoreError> {
        self.enter("create").await?;
        let page = Page {
            id: Uuid::new_v4().to_string(),
            archived: false,
            in_trash: false,
            properties: normalize(properties),
        };
        self.lock().pages.push(page.clone());
        Ok(page)
    }

    async fn update(&self, page_id: &str, update: PageUpdate) -> Result<(), StoreError> {
        self.enter("update").await?;
        let mut state = self.lock();
        let page = state
            .pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| StoreError::not_found(format!("Could not find page with ID: {}", page_id)))?;

        match update {
            PageUpdate::Properties(properties) => page.properties.extend(normalize(properties)),
            PageUpdate::Archive => page.archived = true,
        }
        Ok(())
    }

    async fn retrieve(&self, page_id: &str) -> Result<Page, StoreError> {
        self.enter("retrieve").await?;
        self.page(page_id)
            .ok_or_else(|| StoreError::not_found(format!("Could not find page with ID: {}", page_id)))
    }
}

/// Store that fails the test if the service reaches it
pub struct UnreachableStore;

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn query(&self, database_id: &str) -> Result<Vec<Page>, StoreError> {
        panic!("unexpected store query for {}", database_id)
    }

    async fn create(&self, database_id: &str, _properties: PropertyMap) -> Result<Page, StoreError> {
        panic!("unexpected store create in {}", database_id)
    }

    async fn update(&self, page_id: &str, _update: PageUpdate) -> Result<(), StoreError> {
        panic!("unexpected store update of {}", page_id)
    }

    async fn retrieve(&self, page_id: &str) -> Result<Page, StoreError> {
        panic!("unexpected store retrieve of {}", page_id)
    }
}
