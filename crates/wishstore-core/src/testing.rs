// In-memory `EntityService` for view-model tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use wishstore_api::Entity;

use crate::error::CoreError;
use crate::service::EntityService;

pub(crate) struct MockService<T> {
    pub items: Mutex<Vec<T>>,
    pub queries: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub fail: AtomicBool,
    next_id: AtomicI64,
}

impl<T: Entity> MockService<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
            queries: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            next_id: AtomicI64::new(100),
        }
    }

    pub fn failing() -> Self {
        let svc = Self::new(Vec::new());
        svc.fail.store(true, Ordering::SeqCst);
        svc
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Api {
                message: "Internal Server Error".into(),
                error_key: None,
                status: Some(500),
            });
        }
        Ok(())
    }

    fn with_id(entity: &T, id: i64) -> T {
        let mut value = serde_json::to_value(entity).unwrap();
        value["id"] = id.into();
        serde_json::from_value(value).unwrap()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl<T: Entity> EntityService<T> for MockService<T> {
    async fn query(&self) -> Result<Vec<T>, CoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.items.lock().unwrap().clone())
    }

    async fn get(&self, id: i64) -> Result<T, CoreError> {
        self.check()?;
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id() == Some(id))
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity_type: T::NAME.into(),
                identifier: id.to_string(),
            })
    }

    async fn create(&self, entity: &T) -> Result<T, CoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let saved = Self::with_id(entity, self.next_id.fetch_add(1, Ordering::SeqCst));
        self.items.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, entity: &T) -> Result<T, CoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut items = self.items.lock().unwrap();
        if let Some(slot) = items.iter_mut().find(|e| e.id() == entity.id()) {
            *slot = entity.clone();
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), CoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.items.lock().unwrap().retain(|e| e.id() != Some(id));
        Ok(())
    }
}
