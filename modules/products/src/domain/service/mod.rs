//! Domain services: id rules, merge, relation bookkeeping and logging.
//! They depend only on the repository ports, never on infra types.

mod crud;
mod grocery_items;
mod products;
mod recipes;
mod users;

pub use crud::CrudService;
pub use grocery_items::GroceryItemService;
pub use products::ProductService;
pub use recipes::RecipeService;
pub use users::UserService;

use std::sync::Arc;

use crate::contract::model::{
    GroceryItem, Product, ProductCategory, ProductUnit, Recipe, RecipeIngredient,
};
use crate::domain::error::DomainError;
use crate::domain::page::PageRequest;
use crate::domain::repo::{
    CrudRepository, OwnedRepository, ProductsRepository, RecipeIngredientsRepository,
    UsersRepository,
};

/// Configuration shared by the domain services
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 1000,
        }
    }
}

impl ServiceConfig {
    pub fn page_request(&self, page: Option<u64>, size: Option<u64>) -> PageRequest {
        PageRequest::clamped(page, size, self.default_page_size, self.max_page_size)
    }
}

/// Every service of the module, wired to one repository implementation.
#[derive(Clone)]
pub struct Services {
    pub products: Arc<CrudService<Product>>,
    pub product_units: Arc<CrudService<ProductUnit>>,
    pub product_categories: Arc<CrudService<ProductCategory>>,
    pub grocery_items: Arc<CrudService<GroceryItem>>,
    pub recipes: Arc<CrudService<Recipe>>,
    pub recipe_ingredients: Arc<CrudService<RecipeIngredient>>,
    pub product_service: Arc<ProductService>,
    pub recipe_service: Arc<RecipeService>,
    pub grocery_item_service: Arc<GroceryItemService>,
    pub user_service: Arc<UserService>,
    pub config: ServiceConfig,
}

impl Services {
    pub fn new<R>(repo: Arc<R>, config: ServiceConfig) -> Self
    where
        R: ProductsRepository
            + CrudRepository<ProductUnit>
            + CrudRepository<ProductCategory>
            + OwnedRepository<GroceryItem>
            + OwnedRepository<Recipe>
            + RecipeIngredientsRepository
            + UsersRepository
            + 'static,
    {
        let units: Arc<dyn CrudRepository<ProductUnit>> = repo.clone();
        Self {
            products: Arc::new(CrudService::<Product>::new(repo.clone(), config.clone())),
            product_units: Arc::new(CrudService::new(units.clone(), config.clone())),
            product_categories: Arc::new(CrudService::<ProductCategory>::new(
                repo.clone(),
                config.clone(),
            )),
            grocery_items: Arc::new(CrudService::<GroceryItem>::new(repo.clone(), config.clone())),
            recipes: Arc::new(CrudService::<Recipe>::new(repo.clone(), config.clone())),
            recipe_ingredients: Arc::new(CrudService::<RecipeIngredient>::new(
                repo.clone(),
                config.clone(),
            )),
            product_service: Arc::new(ProductService::new(repo.clone(), units)),
            recipe_service: Arc::new(RecipeService::new(repo.clone(), repo.clone())),
            grocery_item_service: Arc::new(GroceryItemService::new(repo.clone())),
            user_service: Arc::new(UserService::new(repo)),
            config,
        }
    }
}

fn storage(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}
