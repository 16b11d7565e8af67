//! SeaORM entities, one module per table.

pub mod grocery_item;
pub mod product;
pub mod product_category;
pub mod product_product_unit;
pub mod product_unit;
pub mod recipe;
pub mod recipe_ingredient;
pub mod user;
