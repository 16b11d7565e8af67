//! Conversions between SeaORM rows and contract models.
//!
//! A model without an id becomes an active model with `NotSet` id so the
//! store assigns one on insert.

use sea_orm::{ActiveValue, IntoActiveModel, NotSet, Set};

use crate::contract::model::{
    GroceryItem, Product, ProductCategory, ProductUnit, Recipe, RecipeIngredient, User,
};
use crate::infra::storage::entity::{
    grocery_item, product, product_category, product_unit, recipe, recipe_ingredient, user,
};

fn id_value(id: Option<i64>) -> ActiveValue<i64> {
    id.map_or(NotSet, Set)
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: Some(m.id),
            login: m.login,
        }
    }
}

impl IntoActiveModel<user::ActiveModel> for User {
    fn into_active_model(self) -> user::ActiveModel {
        user::ActiveModel {
            id: id_value(self.id),
            login: Set(self.login),
        }
    }
}

impl From<product_category::Model> for ProductCategory {
    fn from(m: product_category::Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
        }
    }
}

impl IntoActiveModel<product_category::ActiveModel> for ProductCategory {
    fn into_active_model(self) -> product_category::ActiveModel {
        product_category::ActiveModel {
            id: id_value(self.id),
            name: Set(self.name),
        }
    }
}

impl From<product_unit::Model> for ProductUnit {
    fn from(m: product_unit::Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
        }
    }
}

impl IntoActiveModel<product_unit::ActiveModel> for ProductUnit {
    fn into_active_model(self) -> product_unit::ActiveModel {
        product_unit::ActiveModel {
            id: id_value(self.id),
            name: Set(self.name),
        }
    }
}

/// The unit set lives in the join table and starts out empty here.
impl From<product::Model> for Product {
    fn from(m: product::Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
            ean_code: m.ean_code,
            product_category_id: m.product_category_id,
            product_unit_ids: Default::default(),
        }
    }
}

impl IntoActiveModel<product::ActiveModel> for Product {
    fn into_active_model(self) -> product::ActiveModel {
        product::ActiveModel {
            id: id_value(self.id),
            name: Set(self.name),
            ean_code: Set(self.ean_code),
            product_category_id: Set(self.product_category_id),
        }
    }
}

impl From<grocery_item::Model> for GroceryItem {
    fn from(m: grocery_item::Model) -> Self {
        Self {
            id: Some(m.id),
            quantity: m.quantity,
            description: m.description,
            user_id: m.user_id,
            product_id: m.product_id,
            unit_id: m.unit_id,
        }
    }
}

impl IntoActiveModel<grocery_item::ActiveModel> for GroceryItem {
    fn into_active_model(self) -> grocery_item::ActiveModel {
        grocery_item::ActiveModel {
            id: id_value(self.id),
            quantity: Set(self.quantity),
            description: Set(self.description),
            user_id: Set(self.user_id),
            product_id: Set(self.product_id),
            unit_id: Set(self.unit_id),
        }
    }
}

impl From<recipe::Model> for Recipe {
    fn from(m: recipe::Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
            instructions_body: m.instructions_body,
            user_id: m.user_id,
        }
    }
}

impl IntoActiveModel<recipe::ActiveModel> for Recipe {
    fn into_active_model(self) -> recipe::ActiveModel {
        recipe::ActiveModel {
            id: id_value(self.id),
            name: Set(self.name),
            instructions_body: Set(self.instructions_body),
            user_id: Set(self.user_id),
        }
    }
}

impl From<recipe_ingredient::Model> for RecipeIngredient {
    fn from(m: recipe_ingredient::Model) -> Self {
        Self {
            id: Some(m.id),
            quantity: m.quantity,
            product_id: m.product_id,
            product_unit_id: m.product_unit_id,
            recipe_id: m.recipe_id,
        }
    }
}

impl IntoActiveModel<recipe_ingredient::ActiveModel> for RecipeIngredient {
    fn into_active_model(self) -> recipe_ingredient::ActiveModel {
        recipe_ingredient::ActiveModel {
            id: id_value(self.id),
            quantity: Set(self.quantity),
            product_id: Set(self.product_id),
            product_unit_id: Set(self.product_unit_id),
            recipe_id: Set(self.recipe_id),
        }
    }
}
