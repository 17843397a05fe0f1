// Typed CRUD over one entity collection.
//
//   GET    api/{collection}        query / query_page
//   GET    api/{collection}/{id}   get
//   POST   api/{collection}        save
//   PUT    api/{collection}        update
//   DELETE api/{collection}/{id}   delete
//
// Date fields are converted in both directions by the models' serde adapters.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::client::ApiClient;
use crate::entity::Entity;
use crate::error::Error;
use crate::pagination::{Page, PageRequest};

/// REST resource client for a single entity type.
pub struct ResourceClient<T> {
    api: Arc<ApiClient>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            _entity: PhantomData,
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// List every entity in the collection.
    pub async fn query(&self) -> Result<Vec<T>, Error> {
        let url = self.api.api_url(T::COLLECTION)?;
        self.api.get(url).await
    }

    /// Fetch one page of the collection with its paging metadata.
    pub async fn query_page(&self, request: &PageRequest) -> Result<Page<T>, Error> {
        let url = self.api.api_url(T::COLLECTION)?;
        let (items, headers) = self
            .api
            .get_with_headers(url, &request.query_pairs())
            .await?;
        let page = Page::from_headers(items, &headers);
        debug!(
            collection = T::COLLECTION,
            page = request.page,
            total = ?page.total_count,
            "fetched page"
        );
        Ok(page)
    }

    /// Fetch a single entity by id.
    pub async fn get(&self, id: i64) -> Result<T, Error> {
        let url = self.api.api_url(&format!("{}/{id}", T::COLLECTION))?;
        self.api.get(url).await.map_err(|e| match e {
            Error::Http { status: 404, .. } => Error::NotFound {
                resource: T::NAME,
                id,
            },
            other => other,
        })
    }

    /// Create a new entity. The server assigns the id.
    pub async fn save(&self, entity: &T) -> Result<T, Error> {
        let url = self.api.api_url(T::COLLECTION)?;
        self.api.post(url, entity).await
    }

    /// Replace an existing entity. Fails locally if it has no id.
    pub async fn update(&self, entity: &T) -> Result<T, Error> {
        if entity.id().is_none() {
            return Err(Error::MissingId { resource: T::NAME });
        }
        let url = self.api.api_url(T::COLLECTION)?;
        self.api.put(url, entity).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let url = self.api.api_url(&format!("{}/{id}", T::COLLECTION))?;
        self.api.delete(url).await
    }
}
