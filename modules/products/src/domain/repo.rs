use async_trait::async_trait;

use crate::contract::model::{Product, RecipeIngredient, User};
use crate::domain::links::IngredientMove;
use crate::domain::page::{Page, PageRequest};
use crate::domain::Record;

/// Port for the domain layer: persistence operations every record needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait CrudRepository<M: Record>: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<M>>;
    async fn exists(&self, id: i64) -> anyhow::Result<bool>;
    /// Insert a record without id; returns it with the store-assigned id.
    async fn insert(&self, m: M) -> anyhow::Result<M>;
    /// Replace an existing record (by primary key in `m`).
    async fn update(&self, m: M) -> anyhow::Result<M>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
    /// Page ordered by id ascending.
    async fn find_page(&self, req: PageRequest) -> anyhow::Result<Page<M>>;
    async fn count(&self) -> anyhow::Result<u64>;
}

/// Product-specific queries and the product/unit join table.
///
/// Every read returns products with their unit set.
#[async_trait]
pub trait ProductsRepository: CrudRepository<Product> {
    /// Page of products with unit sets, loaded with one batched join query.
    async fn find_page_eager(&self, req: PageRequest) -> anyhow::Result<Page<Product>>;
    /// Returns false if the pair was already linked.
    async fn add_unit(&self, product_id: i64, unit_id: i64) -> anyhow::Result<bool>;
    /// Returns false if the pair was not linked.
    async fn remove_unit(&self, product_id: i64, unit_id: i64) -> anyhow::Result<bool>;
    async fn find_by_unit(&self, unit_id: i64) -> anyhow::Result<Vec<Product>>;
}

/// Records owned by a user, filtered by the owner's login.
#[async_trait]
pub trait OwnedRepository<M: Record>: CrudRepository<M> {
    async fn find_by_owner_login(&self, login: &str, req: PageRequest)
        -> anyhow::Result<Page<M>>;
}

/// Outcome of [`RecipeIngredientsRepository::move_ingredient`].
#[derive(Debug, Clone)]
pub struct MovedIngredient {
    pub ingredient: RecipeIngredient,
    /// False when the ingredient already had the requested recipe.
    pub changed: bool,
}

#[async_trait]
pub trait RecipeIngredientsRepository: CrudRepository<RecipeIngredient> {
    async fn find_by_recipe(&self, recipe_id: i64) -> anyhow::Result<Vec<RecipeIngredient>>;
    /// Read, apply `change` and write back in one transaction.
    /// `None` if the ingredient does not exist.
    async fn move_ingredient(
        &self,
        ingredient_id: i64,
        change: IngredientMove,
    ) -> anyhow::Result<Option<MovedIngredient>>;
}

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_login(&self, login: &str) -> anyhow::Result<Option<User>>;
    async fn insert(&self, u: User) -> anyhow::Result<User>;
    async fn find_page(&self, req: PageRequest) -> anyhow::Result<Page<User>>;
}
