//! Id-addressed relation indexes.
//!
//! Both directions of a relation are kept in one structure and every
//! operation updates both sides before returning, so a half-applied link is
//! never observable. Ids are not checked for existence; the store's foreign
//! keys are the enforcement point.

use std::collections::{BTreeMap, BTreeSet};

/// Product/unit many-to-many index.
#[derive(Debug, Clone, Default)]
pub struct ProductUnitLinks {
    by_product: BTreeMap<i64, BTreeSet<i64>>,
    by_unit: BTreeMap<i64, BTreeSet<i64>>,
}

/// Join rows a replacement must insert and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDelta {
    pub added: BTreeSet<i64>,
    pub removed: BTreeSet<i64>,
}

impl LinkDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl ProductUnitLinks {
    /// Index built from `(product_id, unit_id)` join rows.
    pub fn from_rows(rows: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let mut links = Self::default();
        for (product, unit) in rows {
            links.add_product_unit(product, unit);
        }
        links
    }

    /// Returns false if the pair was already linked.
    pub fn add_product_unit(&mut self, product: i64, unit: i64) -> bool {
        let added = self.by_product.entry(product).or_default().insert(unit);
        self.by_unit.entry(unit).or_default().insert(product);
        added
    }

    /// Returns false if the pair was not linked.
    pub fn remove_product_unit(&mut self, product: i64, unit: i64) -> bool {
        let removed = detach(&mut self.by_product, product, unit);
        detach(&mut self.by_unit, unit, product);
        removed
    }

    /// Make `units` the exact unit set of `product`.
    ///
    /// Detaches the product from every current unit, then attaches it to every
    /// unit of `units`. The returned delta lists only the pairs whose state
    /// actually changed.
    pub fn set_product_units(&mut self, product: i64, units: BTreeSet<i64>) -> LinkDelta {
        let previous = self.units_of_product(product);
        for unit in &previous {
            self.remove_product_unit(product, *unit);
        }
        for unit in &units {
            self.add_product_unit(product, *unit);
        }
        LinkDelta {
            added: units.difference(&previous).copied().collect(),
            removed: previous.difference(&units).copied().collect(),
        }
    }

    pub fn units_of_product(&self, product: i64) -> BTreeSet<i64> {
        self.by_product.get(&product).cloned().unwrap_or_default()
    }

    pub fn products_of_unit(&self, unit: i64) -> BTreeSet<i64> {
        self.by_unit.get(&unit).cloned().unwrap_or_default()
    }

    pub fn contains(&self, product: i64, unit: i64) -> bool {
        self.by_product
            .get(&product)
            .is_some_and(|units| units.contains(&unit))
    }
}

fn detach(index: &mut BTreeMap<i64, BTreeSet<i64>>, key: i64, value: i64) -> bool {
    let Some(set) = index.get_mut(&key) else {
        return false;
    };
    let removed = set.remove(&value);
    if set.is_empty() {
        index.remove(&key);
    }
    removed
}

/// Recipe/ingredient one-to-many index.
#[derive(Debug, Clone, Default)]
pub struct RecipeIngredientLinks {
    parent_of: BTreeMap<i64, i64>,
    children: BTreeMap<i64, BTreeSet<i64>>,
}

impl RecipeIngredientLinks {
    /// Index built from `(recipe_id, ingredient_id)` rows.
    pub fn from_rows(rows: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let mut links = Self::default();
        for (recipe, ingredient) in rows {
            links.add_recipe_ingredient(recipe, ingredient);
        }
        links
    }

    /// Attach `ingredient` to `recipe`, moving it out of any previous recipe.
    pub fn add_recipe_ingredient(&mut self, recipe: i64, ingredient: i64) {
        if let Some(previous) = self.parent_of.insert(ingredient, recipe) {
            if previous != recipe {
                detach(&mut self.children, previous, ingredient);
            }
        }
        self.children.entry(recipe).or_default().insert(ingredient);
    }

    /// Detach `ingredient` from `recipe`. No-op (returns false) when the
    /// ingredient belongs to another recipe or to none.
    pub fn remove_recipe_ingredient(&mut self, recipe: i64, ingredient: i64) -> bool {
        if self.parent_of.get(&ingredient) != Some(&recipe) {
            return false;
        }
        self.parent_of.remove(&ingredient);
        detach(&mut self.children, recipe, ingredient)
    }

    pub fn recipe_of(&self, ingredient: i64) -> Option<i64> {
        self.parent_of.get(&ingredient).copied()
    }

    pub fn ingredients_of(&self, recipe: i64) -> BTreeSet<i64> {
        self.children.get(&recipe).cloned().unwrap_or_default()
    }
}

/// Requested change of one ingredient's recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientMove {
    Attach { recipe: i64 },
    Detach { recipe: i64 },
}

impl IngredientMove {
    pub fn recipe(&self) -> i64 {
        match *self {
            Self::Attach { recipe } | Self::Detach { recipe } => recipe,
        }
    }

    /// Apply to `links`; returns false when `ingredient` is left where it was.
    pub fn apply(&self, links: &mut RecipeIngredientLinks, ingredient: i64) -> bool {
        match *self {
            Self::Attach { recipe } => {
                if links.recipe_of(ingredient) == Some(recipe) {
                    return false;
                }
                links.add_recipe_ingredient(recipe, ingredient);
                true
            }
            Self::Detach { recipe } => links.remove_recipe_ingredient(recipe, ingredient),
        }
    }
}
