use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::{storage, ServiceConfig};
use crate::domain::error::DomainError;
use crate::domain::merge::Merge;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repo::CrudRepository;
use crate::domain::Record;

/// Create / replace / merge / list / get / delete for one record type.
pub struct CrudService<M: Record> {
    repo: Arc<dyn CrudRepository<M>>,
    config: ServiceConfig,
}

impl<M: Record> Clone for CrudService<M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<M: Record> CrudService<M> {
    pub fn new(repo: Arc<dyn CrudRepository<M>>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[instrument(name = "products.service.create", skip_all, fields(entity = M::KIND.name()))]
    pub async fn create(&self, record: M) -> Result<M, DomainError> {
        info!("Creating record");

        if record.id().is_some() {
            return Err(DomainError::id_exists(M::KIND));
        }

        let saved = self.repo.insert(record).await.map_err(storage)?;
        info!(id = ?saved.id(), "Successfully created record");
        Ok(saved)
    }

    /// Full replace. The body must carry the path id of an existing record.
    #[instrument(
        name = "products.service.update",
        skip_all,
        fields(entity = M::KIND.name(), id = path_id)
    )]
    pub async fn update(&self, path_id: i64, record: M) -> Result<M, DomainError> {
        info!("Replacing record");

        self.check_target(path_id, record.id()).await?;
        let saved = self.repo.update(record).await.map_err(storage)?;

        info!("Successfully replaced record");
        Ok(saved)
    }

    /// Merge `patch` into the stored record; same id rules as `update`.
    #[instrument(
        name = "products.service.partial_update",
        skip_all,
        fields(entity = M::KIND.name(), id = path_id)
    )]
    pub async fn partial_update(
        &self,
        path_id: i64,
        body_id: Option<i64>,
        patch: M::Patch,
    ) -> Result<M, DomainError> {
        info!("Partially updating record");

        self.check_target(path_id, body_id).await?;

        // The row can disappear between the existence check and the load.
        let mut current = self
            .repo
            .find_by_id(path_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found(M::KIND, path_id))?;

        current.merge(patch);
        let saved = self.repo.update(current).await.map_err(storage)?;

        info!("Successfully merged record");
        Ok(saved)
    }

    #[instrument(
        name = "products.service.find_all",
        skip_all,
        fields(entity = M::KIND.name(), page = req.page, size = req.size)
    )]
    pub async fn find_all(&self, req: PageRequest) -> Result<Page<M>, DomainError> {
        debug!("Listing records");
        let page = self.repo.find_page(req).await.map_err(storage)?;
        debug!("Listed {} of {} records", page.items.len(), page.total);
        Ok(page)
    }

    #[instrument(
        name = "products.service.find_one",
        skip_all,
        fields(entity = M::KIND.name(), id = id)
    )]
    pub async fn find_one(&self, id: i64) -> Result<M, DomainError> {
        debug!("Getting record by id");
        self.repo
            .find_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found(M::KIND, id))
    }

    /// Idempotent: succeeds whether or not the record existed.
    #[instrument(
        name = "products.service.delete",
        skip_all,
        fields(entity = M::KIND.name(), id = id)
    )]
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting record");
        let removed = self.repo.delete(id).await.map_err(storage)?;
        if removed {
            info!("Successfully deleted record");
        } else {
            debug!("Nothing to delete");
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, DomainError> {
        self.repo.count().await.map_err(storage)
    }

    async fn check_target(&self, path_id: i64, body_id: Option<i64>) -> Result<(), DomainError> {
        let body_id = body_id.ok_or_else(|| DomainError::id_null(M::KIND))?;
        if body_id != path_id {
            return Err(DomainError::id_invalid(M::KIND, path_id, body_id));
        }
        if !self.repo.exists(path_id).await.map_err(storage)? {
            return Err(DomainError::id_not_found(M::KIND, path_id));
        }
        Ok(())
    }
}
