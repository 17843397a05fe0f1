// ── Entity service seam ──
//
// View-models talk to the server through this trait rather than to
// `ResourceClient` directly, so front ends and tests can substitute their
// own implementation.

use std::future::Future;

use wishstore_api::{Entity, ResourceClient};

use crate::error::CoreError;

/// Async CRUD over one entity type.
pub trait EntityService<T: Entity>: Send + Sync {
    fn query(&self) -> impl Future<Output = Result<Vec<T>, CoreError>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<T, CoreError>> + Send;

    fn create(&self, entity: &T) -> impl Future<Output = Result<T, CoreError>> + Send;

    fn update(&self, entity: &T) -> impl Future<Output = Result<T, CoreError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl<T: Entity> EntityService<T> for ResourceClient<T> {
    async fn query(&self) -> Result<Vec<T>, CoreError> {
        Ok(ResourceClient::query(self).await?)
    }

    async fn get(&self, id: i64) -> Result<T, CoreError> {
        Ok(ResourceClient::get(self, id).await?)
    }

    async fn create(&self, entity: &T) -> Result<T, CoreError> {
        Ok(self.save(entity).await?)
    }

    async fn update(&self, entity: &T) -> Result<T, CoreError> {
        Ok(ResourceClient::update(self, entity).await?)
    }

    async fn delete(&self, id: i64) -> Result<(), CoreError> {
        Ok(ResourceClient::delete(self, id).await?)
    }
}
