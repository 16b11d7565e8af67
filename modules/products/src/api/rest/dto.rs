//! REST DTOs. One shape per entity serves requests and responses; all
//! fields are optional on the wire so the same type parses a full body and
//! a merge patch (`null` and absent both mean "leave untouched").

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{
    EntityKind, GroceryItem, GroceryItemPatch, Product, ProductCategory, ProductCategoryPatch,
    ProductPatch, ProductUnit, ProductUnitPatch, Recipe, RecipeIngredient, RecipeIngredientPatch,
    RecipePatch, User,
};
use crate::domain::error::DomainError;
use crate::domain::merge::Merge;
use crate::domain::Record;

/// Reference to another entity by id, e.g. `{"id": 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    pub id: i64,
}

impl EntityRef {
    fn of(id: Option<i64>) -> Option<Self> {
        id.map(|id| Self { id })
    }
}

fn ref_id(r: Option<EntityRef>) -> Option<i64> {
    r.map(|r| r.id)
}

fn required(value: Option<String>, entity: EntityKind, field: &str) -> Result<String, DomainError> {
    not_blank(value, entity, field)?
        .ok_or_else(|| DomainError::validation(entity, field, "must not be null"))
}

/// Patch counterpart of `required`: absent stays absent, blank is rejected.
fn not_blank(
    value: Option<String>,
    entity: EntityKind,
    field: &str,
) -> Result<Option<String>, DomainError> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(DomainError::validation(entity, field, "must not be blank"))
        }
        other => Ok(other),
    }
}

/// Conversions between a wire DTO and its domain record.
pub trait RestDto: Serialize + DeserializeOwned + Send + 'static {
    type Model: Record;

    fn body_id(&self) -> Option<i64>;
    /// Full body to record; fails when a required field is missing.
    fn into_model(self) -> Result<Self::Model, DomainError>;
    /// Merge patch; present required fields must still be non-blank.
    fn into_patch(self) -> Result<<Self::Model as Merge>::Patch, DomainError>;
    fn from_model(m: Self::Model) -> Self;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategoryDto {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl RestDto for ProductCategoryDto {
    type Model = ProductCategory;

    fn body_id(&self) -> Option<i64> {
        self.id
    }

    fn into_model(self) -> Result<ProductCategory, DomainError> {
        Ok(ProductCategory {
            id: self.id,
            name: required(self.name, EntityKind::ProductCategory, "name")?,
        })
    }

    fn into_patch(self) -> Result<ProductCategoryPatch, DomainError> {
        Ok(ProductCategoryPatch {
            name: not_blank(self.name, EntityKind::ProductCategory, "name")?,
        })
    }

    fn from_model(m: ProductCategory) -> Self {
        Self {
            id: m.id,
            name: Some(m.name),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUnitDto {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl RestDto for ProductUnitDto {
    type Model = ProductUnit;

    fn body_id(&self) -> Option<i64> {
        self.id
    }

    fn into_model(self) -> Result<ProductUnit, DomainError> {
        Ok(ProductUnit {
            id: self.id,
            name: required(self.name, EntityKind::ProductUnit, "name")?,
        })
    }

    fn into_patch(self) -> Result<ProductUnitPatch, DomainError> {
        Ok(ProductUnitPatch {
            name: not_blank(self.name, EntityKind::ProductUnit, "name")?,
        })
    }

    fn from_model(m: ProductUnit) -> Self {
        Self {
            id: m.id,
            name: Some(m.name),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub ean_code: Option<String>,
    /// Unit references; always present on reads.
    pub product_units: Option<Vec<EntityRef>>,
    pub product_category: Option<EntityRef>,
}

fn unit_set(refs: Vec<EntityRef>) -> BTreeSet<i64> {
    refs.into_iter().map(|r| r.id).collect()
}

impl RestDto for ProductDto {
    type Model = Product;

    fn body_id(&self) -> Option<i64> {
        self.id
    }

    fn into_model(self) -> Result<Product, DomainError> {
        Ok(Product {
            id: self.id,
            name: required(self.name, EntityKind::Product, "name")?,
            ean_code: self.ean_code,
            product_category_id: ref_id(self.product_category),
            product_unit_ids: self.product_units.map(unit_set).unwrap_or_default(),
        })
    }

    fn into_patch(self) -> Result<ProductPatch, DomainError> {
        Ok(ProductPatch {
            name: not_blank(self.name, EntityKind::Product, "name")?,
            ean_code: self.ean_code,
            product_category_id: ref_id(self.product_category),
            product_unit_ids: self.product_units.map(unit_set),
        })
    }

    fn from_model(m: Product) -> Self {
        Self {
            id: m.id,
            name: Some(m.name),
            ean_code: m.ean_code,
            product_units: Some(
                m.product_unit_ids
                    .into_iter()
                    .map(|id| EntityRef { id })
                    .collect(),
            ),
            product_category: EntityRef::of(m.product_category_id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItemDto {
    pub id: Option<i64>,
    pub quantity: Option<f64>,
    pub description: Option<String>,
    pub user: Option<EntityRef>,
    pub product: Option<EntityRef>,
    pub unit: Option<EntityRef>,
}

impl RestDto for GroceryItemDto {
    type Model = GroceryItem;

    fn body_id(&self) -> Option<i64> {
        self.id
    }

    fn into_model(self) -> Result<GroceryItem, DomainError> {
        Ok(GroceryItem {
            id: self.id,
            quantity: self.quantity,
            description: self.description,
            user_id: ref_id(self.user),
            product_id: ref_id(self.product),
            unit_id: ref_id(self.unit),
        })
    }

    fn into_patch(self) -> Result<GroceryItemPatch, DomainError> {
        Ok(GroceryItemPatch {
            quantity: self.quantity,
            description: self.description,
            user_id: ref_id(self.user),
            product_id: ref_id(self.product),
            unit_id: ref_id(self.unit),
        })
    }

    fn from_model(m: GroceryItem) -> Self {
        Self {
            id: m.id,
            quantity: m.quantity,
            description: m.description,
            user: EntityRef::of(m.user_id),
            product: EntityRef::of(m.product_id),
            unit: EntityRef::of(m.unit_id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDto {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub instructions_body: Option<String>,
    pub user: Option<EntityRef>,
}

impl RestDto for RecipeDto {
    type Model = Recipe;

    fn body_id(&self) -> Option<i64> {
        self.id
    }

    fn into_model(self) -> Result<Recipe, DomainError> {
        Ok(Recipe {
            id: self.id,
            name: required(self.name, EntityKind::Recipe, "name")?,
            instructions_body: required(
                self.instructions_body,
                EntityKind::Recipe,
                "instructionsBody",
            )?,
            user_id: ref_id(self.user),
        })
    }

    fn into_patch(self) -> Result<RecipePatch, DomainError> {
        Ok(RecipePatch {
            name: not_blank(self.name, EntityKind::Recipe, "name")?,
            instructions_body: not_blank(
                self.instructions_body,
                EntityKind::Recipe,
                "instructionsBody",
            )?,
            user_id: ref_id(self.user),
        })
    }

    fn from_model(m: Recipe) -> Self {
        Self {
            id: m.id,
            name: Some(m.name),
            instructions_body: Some(m.instructions_body),
            user: EntityRef::of(m.user_id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredientDto {
    pub id: Option<i64>,
    pub quantity: Option<f64>,
    pub product: Option<EntityRef>,
    pub product_unit: Option<EntityRef>,
    pub recipe: Option<EntityRef>,
}

impl RestDto for RecipeIngredientDto {
    type Model = RecipeIngredient;

    fn body_id(&self) -> Option<i64> {
        self.id
    }

    fn into_model(self) -> Result<RecipeIngredient, DomainError> {
        Ok(RecipeIngredient {
            id: self.id,
            quantity: self.quantity,
            product_id: ref_id(self.product),
            product_unit_id: ref_id(self.product_unit),
            recipe_id: ref_id(self.recipe),
        })
    }

    fn into_patch(self) -> Result<RecipeIngredientPatch, DomainError> {
        Ok(RecipeIngredientPatch {
            quantity: self.quantity,
            product_id: ref_id(self.product),
            product_unit_id: ref_id(self.product_unit),
            recipe_id: ref_id(self.recipe),
        })
    }

    fn from_model(m: RecipeIngredient) -> Self {
        Self {
            id: m.id,
            quantity: m.quantity,
            product: EntityRef::of(m.product_id),
            product_unit: EntityRef::of(m.product_unit_id),
            recipe: EntityRef::of(m.recipe_id),
        }
    }
}

/// REST DTO for user representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Option<i64>,
    pub login: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            login: u.login,
        }
    }
}

/// Paging and eager-load query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    #[serde(default)]
    pub eagerload: bool,
}
