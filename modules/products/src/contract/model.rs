//! Transport-agnostic models of the products domain.
//!
//! Every record carries an optional store-assigned id. Equality is identity
//! equality: two values are equal only when both carry an id and the ids
//! match. A value without an id is never equal to anything, itself included,
//! so none of these types implement `Eq`.

use std::collections::BTreeSet;

/// The entity types exposed by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    ProductUnit,
    ProductCategory,
    GroceryItem,
    Recipe,
    RecipeIngredient,
    User,
}

impl EntityKind {
    /// Name used in alert headers and problem documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Product => "productsProduct",
            Self::ProductUnit => "productsProductUnit",
            Self::ProductCategory => "productsProductCategory",
            Self::GroceryItem => "productsGroceryItem",
            Self::Recipe => "productsRecipe",
            Self::RecipeIngredient => "productsRecipeIngredient",
            Self::User => "user",
        }
    }

    /// Collection segment under `/api`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::ProductUnit => "product-units",
            Self::ProductCategory => "product-categories",
            Self::GroceryItem => "grocery-items",
            Self::Recipe => "recipes",
            Self::RecipeIngredient => "recipe-ingredients",
            Self::User => "admin/users",
        }
    }

    /// Human-readable label for log lines and error details.
    pub fn label(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::ProductUnit => "ProductUnit",
            Self::ProductCategory => "ProductCategory",
            Self::GroceryItem => "GroceryItem",
            Self::Recipe => "Recipe",
            Self::RecipeIngredient => "RecipeIngredient",
            Self::User => "User",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

macro_rules! identity_eq {
    ($($ty:ty),+ $(,)?) => {$(
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
            }
        }
    )+};
}

/// Principal record; only the login is tracked.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub login: String,
}

#[derive(Debug, Clone)]
pub struct ProductCategory {
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ProductUnit {
    pub id: Option<i64>,
    pub name: String,
}

/// A product with its unit set (owning side of the product/unit relation).
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub ean_code: Option<String>,
    pub product_category_id: Option<i64>,
    pub product_unit_ids: BTreeSet<i64>,
}

#[derive(Debug, Clone)]
pub struct GroceryItem {
    pub id: Option<i64>,
    pub quantity: Option<f64>,
    pub description: Option<String>,
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
    pub unit_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: Option<i64>,
    pub name: String,
    pub instructions_body: String,
    /// Owner used by the "my recipes" filter.
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct RecipeIngredient {
    pub id: Option<i64>,
    pub quantity: Option<f64>,
    pub product_id: Option<i64>,
    pub product_unit_id: Option<i64>,
    pub recipe_id: Option<i64>,
}

identity_eq!(
    User,
    ProductCategory,
    ProductUnit,
    Product,
    GroceryItem,
    Recipe,
    RecipeIngredient,
);

// Patches: `None` leaves the stored value untouched.

#[derive(Debug, Clone, Default)]
pub struct ProductCategoryPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductUnitPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub ean_code: Option<String>,
    pub product_category_id: Option<i64>,
    /// Replaces the whole unit set when present, even if empty.
    pub product_unit_ids: Option<BTreeSet<i64>>,
}

#[derive(Debug, Clone, Default)]
pub struct GroceryItemPatch {
    pub quantity: Option<f64>,
    pub description: Option<String>,
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
    pub unit_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub instructions_body: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct RecipeIngredientPatch {
    pub quantity: Option<f64>,
    pub product_id: Option<i64>,
    pub product_unit_id: Option<i64>,
    pub recipe_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: Option<i64>, name: &str) -> ProductUnit {
        ProductUnit {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn equal_ids_are_equal_regardless_of_fields() {
        assert_eq!(unit(Some(1), "kg"), unit(Some(1), "litre"));
        assert_ne!(unit(Some(1), "kg"), unit(Some(2), "kg"));
    }

    #[test]
    fn transient_values_are_never_equal() {
        let a = unit(None, "kg");
        let b = a.clone();
        assert_ne!(a, b);
        assert_ne!(a, unit(Some(1), "kg"));
        #[allow(clippy::eq_op)]
        let self_eq = a == a;
        assert!(!self_eq);
    }

    #[test]
    fn entity_names_and_paths() {
        assert_eq!(EntityKind::GroceryItem.name(), "productsGroceryItem");
        assert_eq!(EntityKind::ProductCategory.path(), "product-categories");
        assert_eq!(EntityKind::RecipeIngredient.to_string(), "RecipeIngredient");
    }
}
