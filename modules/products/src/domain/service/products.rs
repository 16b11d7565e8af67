use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::storage;
use crate::contract::model::{EntityKind, Product, ProductUnit};
use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repo::{CrudRepository, ProductsRepository};

/// Product reads with unit sets and the persisted product/unit links.
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductsRepository>,
    units: Arc<dyn CrudRepository<ProductUnit>>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductsRepository>,
        units: Arc<dyn CrudRepository<ProductUnit>>,
    ) -> Self {
        Self { products, units }
    }

    #[instrument(
        name = "products.service.find_all_eager",
        skip(self),
        fields(page = req.page, size = req.size)
    )]
    pub async fn find_all_eager(&self, req: PageRequest) -> Result<Page<Product>, DomainError> {
        debug!("Listing products with unit sets");
        self.products.find_page_eager(req).await.map_err(storage)
    }

    #[instrument(name = "products.service.add_unit", skip(self))]
    pub async fn add_unit(&self, product_id: i64, unit_id: i64) -> Result<(), DomainError> {
        self.ensure_linkable(product_id, unit_id).await?;
        let added = self
            .products
            .add_unit(product_id, unit_id)
            .await
            .map_err(storage)?;
        info!(added, "Linked product to unit");
        Ok(())
    }

    #[instrument(name = "products.service.remove_unit", skip(self))]
    pub async fn remove_unit(&self, product_id: i64, unit_id: i64) -> Result<(), DomainError> {
        self.ensure_linkable(product_id, unit_id).await?;
        let removed = self
            .products
            .remove_unit(product_id, unit_id)
            .await
            .map_err(storage)?;
        info!(removed, "Unlinked product from unit");
        Ok(())
    }

    #[instrument(name = "products.service.products_of_unit", skip(self))]
    pub async fn products_of_unit(&self, unit_id: i64) -> Result<Vec<Product>, DomainError> {
        if !self.units.exists(unit_id).await.map_err(storage)? {
            return Err(DomainError::not_found(EntityKind::ProductUnit, unit_id));
        }
        self.products.find_by_unit(unit_id).await.map_err(storage)
    }

    async fn ensure_linkable(&self, product_id: i64, unit_id: i64) -> Result<(), DomainError> {
        if !self.products.exists(product_id).await.map_err(storage)? {
            return Err(DomainError::not_found(EntityKind::Product, product_id));
        }
        if !self.units.exists(unit_id).await.map_err(storage)? {
            return Err(DomainError::not_found(EntityKind::ProductUnit, unit_id));
        }
        Ok(())
    }
}
