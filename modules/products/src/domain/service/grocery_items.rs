use std::sync::Arc;

use tracing::{debug, instrument};

use super::storage;
use crate::contract::model::GroceryItem;
use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repo::OwnedRepository;

#[derive(Clone)]
pub struct GroceryItemService {
    items: Arc<dyn OwnedRepository<GroceryItem>>,
}

impl GroceryItemService {
    pub fn new(items: Arc<dyn OwnedRepository<GroceryItem>>) -> Self {
        Self { items }
    }

    /// Grocery items whose owner login equals `login`.
    #[instrument(name = "products.service.grocery_items.find_mine", skip(self, req))]
    pub async fn find_mine(
        &self,
        login: &str,
        req: PageRequest,
    ) -> Result<Page<GroceryItem>, DomainError> {
        debug!("Listing grocery items of the current user");
        self.items
            .find_by_owner_login(login, req)
            .await
            .map_err(storage)
    }
}
