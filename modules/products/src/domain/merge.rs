//! Null-aware partial merge.
//!
//! A patch field that is `None` leaves the stored value untouched; a present
//! value overwrites it. Relationship references follow the same rule, so a
//! patch can never clear a reference.

use crate::contract::model::{
    GroceryItem, GroceryItemPatch, Product, ProductCategory, ProductCategoryPatch, ProductPatch,
    ProductUnit, ProductUnitPatch, Recipe, RecipeIngredient, RecipeIngredientPatch, RecipePatch,
};

pub trait Merge {
    type Patch: Send + 'static;

    fn merge(&mut self, patch: Self::Patch);
}

#[inline]
fn set<T>(slot: &mut T, incoming: Option<T>) {
    if let Some(v) = incoming {
        *slot = v;
    }
}

#[inline]
fn set_opt<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

impl Merge for ProductCategory {
    type Patch = ProductCategoryPatch;

    fn merge(&mut self, patch: ProductCategoryPatch) {
        set(&mut self.name, patch.name);
    }
}

impl Merge for ProductUnit {
    type Patch = ProductUnitPatch;

    fn merge(&mut self, patch: ProductUnitPatch) {
        set(&mut self.name, patch.name);
    }
}

impl Merge for Product {
    type Patch = ProductPatch;

    fn merge(&mut self, patch: ProductPatch) {
        set(&mut self.name, patch.name);
        set_opt(&mut self.ean_code, patch.ean_code);
        set_opt(&mut self.product_category_id, patch.product_category_id);
        set(&mut self.product_unit_ids, patch.product_unit_ids);
    }
}

impl Merge for GroceryItem {
    type Patch = GroceryItemPatch;

    fn merge(&mut self, patch: GroceryItemPatch) {
        set_opt(&mut self.quantity, patch.quantity);
        set_opt(&mut self.description, patch.description);
        set_opt(&mut self.user_id, patch.user_id);
        set_opt(&mut self.product_id, patch.product_id);
        set_opt(&mut self.unit_id, patch.unit_id);
    }
}

impl Merge for Recipe {
    type Patch = RecipePatch;

    fn merge(&mut self, patch: RecipePatch) {
        set(&mut self.name, patch.name);
        set(&mut self.instructions_body, patch.instructions_body);
        set_opt(&mut self.user_id, patch.user_id);
    }
}

impl Merge for RecipeIngredient {
    type Patch = RecipeIngredientPatch;

    fn merge(&mut self, patch: RecipeIngredientPatch) {
        set_opt(&mut self.quantity, patch.quantity);
        set_opt(&mut self.product_id, patch.product_id);
        set_opt(&mut self.product_unit_id, patch.product_unit_id);
        set_opt(&mut self.recipe_id, patch.recipe_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn flour() -> Product {
        Product {
            id: Some(1),
            name: "Flour".into(),
            ean_code: Some("5901234123457".into()),
            product_category_id: Some(3),
            product_unit_ids: BTreeSet::from([10, 11]),
        }
    }

    #[test]
    fn single_field_patch_leaves_the_rest() {
        let mut p = flour();
        p.merge(ProductPatch {
            name: Some("Rye flour".into()),
            ..Default::default()
        });
        assert_eq!(p.name, "Rye flour");
        assert_eq!(p.ean_code.as_deref(), Some("5901234123457"));
        assert_eq!(p.product_category_id, Some(3));
        assert_eq!(p.product_unit_ids, BTreeSet::from([10, 11]));
    }

    #[test]
    fn absent_reference_is_not_a_clear() {
        let mut item = GroceryItem {
            id: Some(4),
            quantity: Some(2.0),
            description: None,
            user_id: Some(1),
            product_id: Some(2),
            unit_id: Some(3),
        };
        item.merge(GroceryItemPatch {
            description: Some("organic".into()),
            ..Default::default()
        });
        assert_eq!(item.user_id, Some(1));
        assert_eq!(item.product_id, Some(2));
        assert_eq!(item.unit_id, Some(3));
        assert_eq!(item.quantity, Some(2.0));
        assert_eq!(item.description.as_deref(), Some("organic"));
    }

    #[test]
    fn present_unit_set_replaces_even_when_empty() {
        let mut p = flour();
        p.merge(ProductPatch {
            product_unit_ids: Some(BTreeSet::new()),
            ..Default::default()
        });
        assert!(p.product_unit_ids.is_empty());
        assert_eq!(p.name, "Flour");
    }

    #[test]
    fn full_patch_overwrites_every_field() {
        let mut r = Recipe {
            id: Some(7),
            name: "Bread".into(),
            instructions_body: "Bake.".into(),
            user_id: None,
        };
        r.merge(RecipePatch {
            name: Some("Sourdough".into()),
            instructions_body: Some("Feed the starter.".into()),
            user_id: Some(2),
        });
        assert_eq!(r.name, "Sourdough");
        assert_eq!(r.instructions_body, "Feed the starter.");
        assert_eq!(r.user_id, Some(2));
    }
}
