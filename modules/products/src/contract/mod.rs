pub mod model;

pub use model::{
    EntityKind, GroceryItem, GroceryItemPatch, Product, ProductCategory, ProductCategoryPatch,
    ProductPatch, ProductUnit, ProductUnitPatch, Recipe, RecipeIngredient, RecipeIngredientPatch,
    RecipePatch, User,
};
