//! SeaORM-backed implementation of the repository ports.
//!
//! One struct serves every record type. It is generic over the connection so
//! it can be built on a `DatabaseConnection` (pool) in production and tests.
//! Writes run in a transaction; while a transaction is open only the
//! transaction handle is used, so single-connection pools never deadlock.

use std::collections::BTreeSet;

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::contract::model::{
    GroceryItem, Product, ProductCategory, ProductUnit, Recipe, RecipeIngredient, User,
};
use crate::domain::links::{IngredientMove, ProductUnitLinks, RecipeIngredientLinks};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repo::{
    CrudRepository, MovedIngredient, OwnedRepository, ProductsRepository,
    RecipeIngredientsRepository, UsersRepository,
};
use crate::infra::storage::entity::{
    grocery_item, product, product_category, product_product_unit, product_unit, recipe,
    recipe_ingredient, user,
};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// `CrudRepository` for a record stored in a single table.
macro_rules! single_table_repository {
    ($model:ty, $table:ident) => {
        #[async_trait]
        impl<C> CrudRepository<$model> for SeaOrmRepository<C>
        where
            C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
        {
            async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<$model>> {
                let found = $table::Entity::find_by_id(id)
                    .one(&self.conn)
                    .await
                    .context(concat!(stringify!($table), ".find_by_id failed"))?;
                Ok(found.map(Into::into))
            }

            async fn exists(&self, id: i64) -> anyhow::Result<bool> {
                let count = $table::Entity::find_by_id(id)
                    .count(&self.conn)
                    .await
                    .context(concat!(stringify!($table), ".exists failed"))?;
                Ok(count > 0)
            }

            async fn insert(&self, m: $model) -> anyhow::Result<$model> {
                let txn = self.conn.begin().await.context("begin failed")?;
                let am: $table::ActiveModel = m.into_active_model();
                let saved = am
                    .insert(&txn)
                    .await
                    .context(concat!(stringify!($table), ".insert failed"))?;
                txn.commit().await.context("commit failed")?;
                Ok(saved.into())
            }

            async fn update(&self, m: $model) -> anyhow::Result<$model> {
                let txn = self.conn.begin().await.context("begin failed")?;
                let am: $table::ActiveModel = m.into_active_model();
                let saved = am
                    .update(&txn)
                    .await
                    .context(concat!(stringify!($table), ".update failed"))?;
                txn.commit().await.context("commit failed")?;
                Ok(saved.into())
            }

            async fn delete(&self, id: i64) -> anyhow::Result<bool> {
                let txn = self.conn.begin().await.context("begin failed")?;
                let res = $table::Entity::delete_by_id(id)
                    .exec(&txn)
                    .await
                    .context(concat!(stringify!($table), ".delete failed"))?;
                txn.commit().await.context("commit failed")?;
                Ok(res.rows_affected > 0)
            }

            async fn find_page(&self, req: PageRequest) -> anyhow::Result<Page<$model>> {
                let paginator = $table::Entity::find()
                    .order_by_asc($table::Column::Id)
                    .paginate(&self.conn, req.size);
                let total = paginator
                    .num_items()
                    .await
                    .context(concat!(stringify!($table), ".count failed"))?;
                let rows = paginator
                    .fetch_page(req.page)
                    .await
                    .context(concat!(stringify!($table), ".find_page failed"))?;
                Ok(Page::new(rows.into_iter().map(Into::into).collect(), total, req))
            }

            async fn count(&self) -> anyhow::Result<u64> {
                $table::Entity::find()
                    .count(&self.conn)
                    .await
                    .context(concat!(stringify!($table), ".count failed"))
            }
        }
    };
}

single_table_repository!(ProductCategory, product_category);
single_table_repository!(ProductUnit, product_unit);
single_table_repository!(GroceryItem, grocery_item);
single_table_repository!(Recipe, recipe);
single_table_repository!(RecipeIngredient, recipe_ingredient);

#[async_trait]
impl<C> OwnedRepository<GroceryItem> for SeaOrmRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_owner_login(
        &self,
        login: &str,
        req: PageRequest,
    ) -> anyhow::Result<Page<GroceryItem>> {
        let paginator = grocery_item::Entity::find()
            .inner_join(user::Entity)
            .filter(user::Column::Login.eq(login))
            .order_by_asc(grocery_item::Column::Id)
            .paginate(&self.conn, req.size);
        let total = paginator
            .num_items()
            .await
            .context("grocery_item.count_by_owner failed")?;
        let rows = paginator
            .fetch_page(req.page)
            .await
            .context("grocery_item.find_by_owner_login failed")?;
        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total, req))
    }
}

#[async_trait]
impl<C> OwnedRepository<Recipe> for SeaOrmRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_owner_login(
        &self,
        login: &str,
        req: PageRequest,
    ) -> anyhow::Result<Page<Recipe>> {
        let paginator = recipe::Entity::find()
            .inner_join(user::Entity)
            .filter(user::Column::Login.eq(login))
            .order_by_asc(recipe::Column::Id)
            .paginate(&self.conn, req.size);
        let total = paginator
            .num_items()
            .await
            .context("recipe.count_by_owner failed")?;
        let rows = paginator
            .fetch_page(req.page)
            .await
            .context("recipe.find_by_owner_login failed")?;
        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total, req))
    }
}

#[async_trait]
impl<C> RecipeIngredientsRepository for SeaOrmRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_recipe(&self, recipe_id: i64) -> anyhow::Result<Vec<RecipeIngredient>> {
        let rows = recipe_ingredient::Entity::find()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .order_by_asc(recipe_ingredient::Column::Id)
            .all(&self.conn)
            .await
            .context("recipe_ingredient.find_by_recipe failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn move_ingredient(
        &self,
        ingredient_id: i64,
        change: IngredientMove,
    ) -> anyhow::Result<Option<MovedIngredient>> {
        let txn = self.conn.begin().await.context("begin failed")?;
        let Some(row) = recipe_ingredient::Entity::find_by_id(ingredient_id)
            .one(&txn)
            .await
            .context("recipe_ingredient.find_by_id failed")?
        else {
            return Ok(None);
        };

        let recipes: Vec<i64> = row.recipe_id.into_iter().chain([change.recipe()]).collect();
        let pairs: Vec<(Option<i64>, i64)> = recipe_ingredient::Entity::find()
            .select_only()
            .column(recipe_ingredient::Column::RecipeId)
            .column(recipe_ingredient::Column::Id)
            .filter(recipe_ingredient::Column::RecipeId.is_in(recipes))
            .into_tuple()
            .all(&txn)
            .await
            .context("recipe_ingredient links load failed")?;
        let mut links = RecipeIngredientLinks::from_rows(
            pairs
                .into_iter()
                .filter_map(|(recipe, ingredient)| recipe.map(|r| (r, ingredient))),
        );

        if !change.apply(&mut links, ingredient_id) {
            return Ok(Some(MovedIngredient {
                ingredient: row.into(),
                changed: false,
            }));
        }

        let mut am: recipe_ingredient::ActiveModel = row.into();
        am.recipe_id = Set(links.recipe_of(ingredient_id));
        let saved = am
            .update(&txn)
            .await
            .context("recipe_ingredient.move failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(Some(MovedIngredient {
            ingredient: saved.into(),
            changed: true,
        }))
    }
}

#[async_trait]
impl<C> UsersRepository for SeaOrmRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_login(&self, login: &str) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Login.eq(login))
            .one(&self.conn)
            .await
            .context("user.find_by_login failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, u: User) -> anyhow::Result<User> {
        let txn = self.conn.begin().await.context("begin failed")?;
        let am: user::ActiveModel = u.into_active_model();
        let saved = am.insert(&txn).await.context("user.insert failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(saved.into())
    }

    async fn find_page(&self, req: PageRequest) -> anyhow::Result<Page<User>> {
        let paginator = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .paginate(&self.conn, req.size);
        let total = paginator.num_items().await.context("user.count failed")?;
        let rows = paginator
            .fetch_page(req.page)
            .await
            .context("user.find_page failed")?;
        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total, req))
    }
}

// ---- products and the product/unit join table ----

/// Join rows of `product_ids` as a relation index.
async fn load_links<T: ConnectionTrait>(
    conn: &T,
    product_ids: impl IntoIterator<Item = i64>,
) -> anyhow::Result<ProductUnitLinks> {
    let ids: Vec<i64> = product_ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(ProductUnitLinks::default());
    }
    let rows = product_product_unit::Entity::find()
        .filter(product_product_unit::Column::ProductId.is_in(ids))
        .all(conn)
        .await
        .context("product_unit links load failed")?;
    Ok(ProductUnitLinks::from_rows(
        rows.into_iter().map(|r| (r.product_id, r.product_unit_id)),
    ))
}

fn with_units(rows: Vec<product::Model>, links: &ProductUnitLinks) -> Vec<Product> {
    rows.into_iter()
        .map(|row| {
            let mut p = Product::from(row);
            if let Some(id) = p.id {
                p.product_unit_ids = links.units_of_product(id);
            }
            p
        })
        .collect()
}

async fn insert_links<T: ConnectionTrait>(
    conn: &T,
    product_id: i64,
    unit_ids: &BTreeSet<i64>,
) -> anyhow::Result<()> {
    if unit_ids.is_empty() {
        return Ok(());
    }
    let rows = unit_ids.iter().map(|unit_id| product_product_unit::ActiveModel {
        product_id: Set(product_id),
        product_unit_id: Set(*unit_id),
    });
    product_product_unit::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await
        .context("product_unit links insert failed")?;
    Ok(())
}

async fn delete_links<T: ConnectionTrait>(
    conn: &T,
    product_id: i64,
    unit_ids: Option<&BTreeSet<i64>>,
) -> anyhow::Result<u64> {
    let mut stmt = product_product_unit::Entity::delete_many()
        .filter(product_product_unit::Column::ProductId.eq(product_id));
    if let Some(units) = unit_ids {
        if units.is_empty() {
            return Ok(0);
        }
        stmt = stmt.filter(product_product_unit::Column::ProductUnitId.is_in(units.iter().copied()));
    }
    let res = stmt
        .exec(conn)
        .await
        .context("product_unit links delete failed")?;
    Ok(res.rows_affected)
}

#[async_trait]
impl<C> CrudRepository<Product> for SeaOrmRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Product>> {
        let Some(row) = product::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("product.find_by_id failed")?
        else {
            return Ok(None);
        };
        let links = load_links(&self.conn, [id]).await?;
        Ok(with_units(vec![row], &links).pop())
    }

    async fn exists(&self, id: i64) -> anyhow::Result<bool> {
        let count = product::Entity::find_by_id(id)
            .count(&self.conn)
            .await
            .context("product.exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, p: Product) -> anyhow::Result<Product> {
        let unit_ids = p.product_unit_ids.clone();
        let txn = self.conn.begin().await.context("begin failed")?;

        let am: product::ActiveModel = p.into_active_model();
        let saved = am.insert(&txn).await.context("product.insert failed")?;
        insert_links(&txn, saved.id, &unit_ids).await?;

        txn.commit().await.context("commit failed")?;
        let mut out = Product::from(saved);
        out.product_unit_ids = unit_ids;
        Ok(out)
    }

    async fn update(&self, p: Product) -> anyhow::Result<Product> {
        let id = p.id.context("product.update without id")?;
        let unit_ids = p.product_unit_ids.clone();
        let txn = self.conn.begin().await.context("begin failed")?;

        let am: product::ActiveModel = p.into_active_model();
        let saved = am.update(&txn).await.context("product.update failed")?;

        let mut links = load_links(&txn, [id]).await?;
        let delta = links.set_product_units(id, unit_ids);
        delete_links(&txn, id, Some(&delta.removed)).await?;
        insert_links(&txn, id, &delta.added).await?;

        txn.commit().await.context("commit failed")?;
        let mut out = Product::from(saved);
        out.product_unit_ids = links.units_of_product(id);
        Ok(out)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;
        delete_links(&txn, id, None).await?;
        let res = product::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("product.delete failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn find_page(&self, req: PageRequest) -> anyhow::Result<Page<Product>> {
        let paginator = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .paginate(&self.conn, req.size);
        let total = paginator.num_items().await.context("product.count failed")?;
        let rows = paginator
            .fetch_page(req.page)
            .await
            .context("product.find_page failed")?;
        let links = load_links(&self.conn, rows.iter().map(|r| r.id)).await?;
        Ok(Page::new(with_units(rows, &links), total, req))
    }

    async fn count(&self) -> anyhow::Result<u64> {
        product::Entity::find()
            .count(&self.conn)
            .await
            .context("product.count failed")
    }
}

#[async_trait]
impl<C> ProductsRepository for SeaOrmRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_page_eager(&self, req: PageRequest) -> anyhow::Result<Page<Product>> {
        CrudRepository::<Product>::find_page(self, req).await
    }

    async fn add_unit(&self, product_id: i64, unit_id: i64) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;
        let mut links = load_links(&txn, [product_id]).await?;
        let added = links.add_product_unit(product_id, unit_id);
        if added {
            insert_links(&txn, product_id, &BTreeSet::from([unit_id])).await?;
        }
        txn.commit().await.context("commit failed")?;
        Ok(added)
    }

    async fn remove_unit(&self, product_id: i64, unit_id: i64) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;
        let removed = delete_links(&txn, product_id, Some(&BTreeSet::from([unit_id]))).await?;
        txn.commit().await.context("commit failed")?;
        Ok(removed > 0)
    }

    async fn find_by_unit(&self, unit_id: i64) -> anyhow::Result<Vec<Product>> {
        let product_ids: Vec<i64> = product_product_unit::Entity::find()
            .select_only()
            .column(product_product_unit::Column::ProductId)
            .filter(product_product_unit::Column::ProductUnitId.eq(unit_id))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("product.find_by_unit links failed")?;
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids.clone()))
            .order_by_asc(product::Column::Id)
            .all(&self.conn)
            .await
            .context("product.find_by_unit failed")?;
        let links = load_links(&self.conn, product_ids).await?;
        Ok(with_units(rows, &links))
    }
}
