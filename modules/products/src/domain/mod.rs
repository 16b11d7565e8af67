pub mod error;
pub mod links;
pub mod merge;
pub mod page;
pub mod repo;
pub mod service;

use crate::contract::model::{
    EntityKind, GroceryItem, Product, ProductCategory, ProductUnit, Recipe, RecipeIngredient,
};
use merge::Merge;

/// A persisted, patchable record handled by the generic CRUD service.
pub trait Record: Merge + Clone + std::fmt::Debug + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Option<i64>;
}

macro_rules! impl_record {
    ($($ty:ty => $kind:ident),+ $(,)?) => {$(
        impl Record for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn id(&self) -> Option<i64> {
                self.id
            }
        }
    )+};
}

impl_record!(
    Product => Product,
    ProductUnit => ProductUnit,
    ProductCategory => ProductCategory,
    GroceryItem => GroceryItem,
    Recipe => Recipe,
    RecipeIngredient => RecipeIngredient,
);
