use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::storage;
use crate::contract::model::{EntityKind, Recipe, RecipeIngredient};
use crate::domain::error::DomainError;
use crate::domain::links::IngredientMove;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repo::{MovedIngredient, OwnedRepository, RecipeIngredientsRepository};

/// Recipe ownership queries and the recipe/ingredient relation.
#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn OwnedRepository<Recipe>>,
    ingredients: Arc<dyn RecipeIngredientsRepository>,
}

impl RecipeService {
    pub fn new(
        recipes: Arc<dyn OwnedRepository<Recipe>>,
        ingredients: Arc<dyn RecipeIngredientsRepository>,
    ) -> Self {
        Self {
            recipes,
            ingredients,
        }
    }

    #[instrument(name = "products.service.recipes.find_mine", skip(self, req))]
    pub async fn find_mine(&self, login: &str, req: PageRequest) -> Result<Page<Recipe>, DomainError> {
        debug!("Listing recipes of the current user");
        self.recipes
            .find_by_owner_login(login, req)
            .await
            .map_err(storage)
    }

    #[instrument(name = "products.service.recipes.ingredients_of", skip(self))]
    pub async fn ingredients_of(&self, recipe_id: i64) -> Result<Vec<RecipeIngredient>, DomainError> {
        self.ensure_recipe(recipe_id).await?;
        self.ingredients
            .find_by_recipe(recipe_id)
            .await
            .map_err(storage)
    }

    /// Attach `ingredient_id` to `recipe_id`, moving it out of its previous recipe.
    #[instrument(name = "products.service.recipes.attach_ingredient", skip(self))]
    pub async fn attach_ingredient(
        &self,
        recipe_id: i64,
        ingredient_id: i64,
    ) -> Result<RecipeIngredient, DomainError> {
        self.ensure_recipe(recipe_id).await?;
        let moved = self
            .move_ingredient(ingredient_id, IngredientMove::Attach { recipe: recipe_id })
            .await?;
        if moved.changed {
            info!("Attached ingredient to recipe");
        } else {
            debug!("Ingredient already attached");
        }
        Ok(moved.ingredient)
    }

    /// Detach `ingredient_id` from `recipe_id`; leaves ingredients of other
    /// recipes untouched.
    #[instrument(name = "products.service.recipes.detach_ingredient", skip(self))]
    pub async fn detach_ingredient(
        &self,
        recipe_id: i64,
        ingredient_id: i64,
    ) -> Result<RecipeIngredient, DomainError> {
        self.ensure_recipe(recipe_id).await?;
        let moved = self
            .move_ingredient(ingredient_id, IngredientMove::Detach { recipe: recipe_id })
            .await?;
        if moved.changed {
            info!("Detached ingredient from recipe");
        } else {
            debug!(
                current = ?moved.ingredient.recipe_id,
                "Ingredient not attached to this recipe"
            );
        }
        Ok(moved.ingredient)
    }

    async fn ensure_recipe(&self, recipe_id: i64) -> Result<(), DomainError> {
        if !self.recipes.exists(recipe_id).await.map_err(storage)? {
            return Err(DomainError::not_found(EntityKind::Recipe, recipe_id));
        }
        Ok(())
    }

    async fn move_ingredient(
        &self,
        ingredient_id: i64,
        change: IngredientMove,
    ) -> Result<MovedIngredient, DomainError> {
        self.ingredients
            .move_ingredient(ingredient_id, change)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found(EntityKind::RecipeIngredient, ingredient_id))
    }
}
