// List view: the full collection, fetched once on activation.

use tracing::{debug, warn};
use wishstore_api::Entity;

use crate::error::CoreError;
use crate::service::EntityService;

#[derive(Debug)]
pub struct ListViewModel<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for ListViewModel<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Entity> ListViewModel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|e| e.id() == Some(id))
    }

    /// Mark a fetch as in flight. Front ends that spawn the query themselves
    /// call this, then [`apply`](Self::apply) with the result.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn apply(&mut self, result: Result<Vec<T>, CoreError>) {
        self.loading = false;
        match result {
            Ok(items) => {
                debug!(entity = T::NAME, count = items.len(), "list loaded");
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                warn!(entity = T::NAME, error = %e, "list load failed");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Fetch the whole collection.
    pub async fn activate<S: EntityService<T>>(&mut self, service: &S) {
        self.begin_load();
        let result = service.query().await;
        self.apply(result);
    }

    /// Refetch after a modal closed with `reload`.
    pub async fn reload<S: EntityService<T>>(&mut self, service: &S) {
        self.activate(service).await;
    }
}
