//! Domain services against the SeaORM repository on in-memory SQLite.

mod common;

use std::collections::BTreeSet;

use products::contract::model::{
    GroceryItem, Product, ProductCategory, ProductPatch, ProductUnit, Recipe, RecipeIngredient,
    RecipePatch,
};
use products::domain::error::DomainError;
use products::domain::links::IngredientMove;
use products::domain::page::PageRequest;
use products::domain::repo::{CrudRepository, RecipeIngredientsRepository};
use products::infra::storage::SeaOrmRepository;

use common::{create_test_db, create_test_services};

fn unit(name: &str) -> ProductUnit {
    ProductUnit {
        id: None,
        name: name.to_string(),
    }
}

fn product(name: &str) -> Product {
    Product {
        id: None,
        name: name.to_string(),
        ean_code: None,
        product_category_id: None,
        product_unit_ids: BTreeSet::new(),
    }
}

fn first_page() -> PageRequest {
    PageRequest { page: 0, size: 100 }
}

#[tokio::test]
async fn save_then_fetch_returns_the_same_fields() {
    let svc = create_test_services().await;

    let category = svc
        .product_categories
        .create(ProductCategory {
            id: None,
            name: "Baking".into(),
        })
        .await
        .unwrap();
    let kg = svc.product_units.create(unit("kg")).await.unwrap();

    let saved = svc
        .products
        .create(Product {
            id: None,
            name: "Flour".into(),
            ean_code: Some("5901234123457".into()),
            product_category_id: category.id,
            product_unit_ids: BTreeSet::from([kg.id.unwrap()]),
        })
        .await
        .unwrap();
    assert!(saved.id.is_some());

    let fetched = svc.products.find_one(saved.id.unwrap()).await.unwrap();
    assert_eq!(fetched, saved);
    assert_eq!(fetched.name, "Flour");
    assert_eq!(fetched.ean_code.as_deref(), Some("5901234123457"));
    assert_eq!(fetched.product_category_id, category.id);
    assert_eq!(fetched.product_unit_ids, BTreeSet::from([kg.id.unwrap()]));

    let recipe = svc
        .recipes
        .create(Recipe {
            id: None,
            name: "Bread".into(),
            instructions_body: "Mix, knead, bake.".into(),
            user_id: None,
        })
        .await
        .unwrap();
    let ingredient = svc
        .recipe_ingredients
        .create(RecipeIngredient {
            id: None,
            quantity: Some(0.5),
            product_id: saved.id,
            product_unit_id: kg.id,
            recipe_id: recipe.id,
        })
        .await
        .unwrap();
    let fetched = svc
        .recipe_ingredients
        .find_one(ingredient.id.unwrap())
        .await
        .unwrap();
    assert_eq!(fetched.quantity, Some(0.5));
    assert_eq!(fetched.product_id, saved.id);
    assert_eq!(fetched.product_unit_id, kg.id);
    assert_eq!(fetched.recipe_id, recipe.id);
}

#[tokio::test]
async fn create_with_id_is_rejected_and_count_unchanged() {
    let svc = create_test_services().await;
    svc.product_units.create(unit("kg")).await.unwrap();
    let before = svc.product_units.count().await.unwrap();

    let err = svc
        .product_units
        .create(ProductUnit {
            id: Some(1),
            name: "litre".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::IdExists { .. }));
    assert_eq!(svc.product_units.count().await.unwrap(), before);
}

#[tokio::test]
async fn update_id_rules() {
    let svc = create_test_services().await;
    let kg = svc.product_units.create(unit("kg")).await.unwrap();
    let id = kg.id.unwrap();

    let err = svc.product_units.update(id, unit("g")).await.unwrap_err();
    assert!(matches!(err, DomainError::IdNull { .. }));

    let err = svc
        .product_units
        .update(
            id,
            ProductUnit {
                id: Some(id + 1),
                name: "g".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IdInvalid { .. }));

    let err = svc
        .product_units
        .update(
            999,
            ProductUnit {
                id: Some(999),
                name: "g".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IdNotFound { id: 999, .. }));

    let updated = svc
        .product_units
        .update(
            id,
            ProductUnit {
                id: Some(id),
                name: "kilogram".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "kilogram");
}

#[tokio::test]
async fn partial_update_touches_only_present_fields() {
    let svc = create_test_services().await;
    let kg = svc.product_units.create(unit("kg")).await.unwrap().id.unwrap();
    let g = svc.product_units.create(unit("g")).await.unwrap().id.unwrap();

    let mut flour = product("Flour");
    flour.ean_code = Some("123".into());
    flour.product_unit_ids = BTreeSet::from([kg]);
    let flour = svc.products.create(flour).await.unwrap();
    let id = flour.id.unwrap();

    let patched = svc
        .products
        .partial_update(
            id,
            Some(id),
            ProductPatch {
                name: Some("Rye flour".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.name, "Rye flour");
    assert_eq!(patched.ean_code.as_deref(), Some("123"));
    assert_eq!(patched.product_unit_ids, BTreeSet::from([kg]));

    let patched = svc
        .products
        .partial_update(
            id,
            Some(id),
            ProductPatch {
                product_unit_ids: Some(BTreeSet::from([g])),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.product_unit_ids, BTreeSet::from([g]));

    let stored = svc.products.find_one(id).await.unwrap();
    assert_eq!(stored.name, "Rye flour");
    assert_eq!(stored.product_unit_ids, BTreeSet::from([g]));

    let err = svc
        .products
        .partial_update(12345, Some(12345), ProductPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IdNotFound { .. }));
}

#[tokio::test]
async fn full_update_overwrites_every_field() {
    let svc = create_test_services().await;
    let recipe = svc
        .recipes
        .create(Recipe {
            id: None,
            name: "Bread".into(),
            instructions_body: "Bake.".into(),
            user_id: None,
        })
        .await
        .unwrap();
    let id = recipe.id.unwrap();

    let patched = svc
        .recipes
        .partial_update(
            id,
            Some(id),
            RecipePatch {
                name: Some("Sourdough".into()),
                instructions_body: Some("Feed the starter.".into()),
                user_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.name, "Sourdough");
    assert_eq!(patched.instructions_body, "Feed the starter.");
}

#[tokio::test]
async fn delete_decrements_count_by_one_and_is_idempotent() {
    let svc = create_test_services().await;
    let kg = svc.product_units.create(unit("kg")).await.unwrap();
    svc.product_units.create(unit("g")).await.unwrap();
    let before = svc.product_units.count().await.unwrap();

    svc.product_units.delete(kg.id.unwrap()).await.unwrap();
    assert_eq!(svc.product_units.count().await.unwrap(), before - 1);

    svc.product_units.delete(kg.id.unwrap()).await.unwrap();
    assert_eq!(svc.product_units.count().await.unwrap(), before - 1);
}

#[tokio::test]
async fn deleting_a_product_drops_its_unit_links() {
    let svc = create_test_services().await;
    let kg = svc.product_units.create(unit("kg")).await.unwrap().id.unwrap();
    let mut flour = product("Flour");
    flour.product_unit_ids = BTreeSet::from([kg]);
    let flour = svc.products.create(flour).await.unwrap().id.unwrap();

    svc.products.delete(flour).await.unwrap();

    assert!(svc
        .product_service
        .products_of_unit(kg)
        .await
        .unwrap()
        .is_empty());
    // The unit itself can now be removed without violating the join table.
    svc.product_units.delete(kg).await.unwrap();
}

#[tokio::test]
async fn flour_in_kilograms_is_visible_from_both_sides() {
    let svc = create_test_services().await;
    let kg = svc.product_units.create(unit("kg")).await.unwrap().id.unwrap();
    let flour = svc.products.create(product("Flour")).await.unwrap().id.unwrap();

    svc.product_service.add_unit(flour, kg).await.unwrap();

    let stored = svc.products.find_one(flour).await.unwrap();
    assert!(stored.product_unit_ids.contains(&kg));

    let of_kg = svc.product_service.products_of_unit(kg).await.unwrap();
    assert_eq!(of_kg.len(), 1);
    assert_eq!(of_kg[0].name, "Flour");

    // Adding twice is harmless.
    svc.product_service.add_unit(flour, kg).await.unwrap();
    assert_eq!(
        svc.products.find_one(flour).await.unwrap().product_unit_ids.len(),
        1
    );
}

#[tokio::test]
async fn product_unit_links_stay_symmetric() {
    let svc = create_test_services().await;
    let mut units = Vec::new();
    for name in ["kg", "g", "pcs"] {
        units.push(svc.product_units.create(unit(name)).await.unwrap().id.unwrap());
    }
    let mut products = Vec::new();
    for name in ["Flour", "Sugar"] {
        products.push(svc.products.create(product(name)).await.unwrap().id.unwrap());
    }

    svc.product_service.add_unit(products[0], units[0]).await.unwrap();
    svc.product_service.add_unit(products[0], units[1]).await.unwrap();
    svc.product_service.add_unit(products[1], units[1]).await.unwrap();
    svc.product_service.remove_unit(products[0], units[1]).await.unwrap();
    svc.product_service.remove_unit(products[1], units[2]).await.unwrap();

    for &p in &products {
        let of_product = svc.products.find_one(p).await.unwrap().product_unit_ids;
        for &u in &units {
            let of_unit: Vec<i64> = svc
                .product_service
                .products_of_unit(u)
                .await
                .unwrap()
                .into_iter()
                .filter_map(|p| p.id)
                .collect();
            assert_eq!(of_product.contains(&u), of_unit.contains(&p));
        }
    }

    let eager = svc.product_service.find_all_eager(first_page()).await.unwrap();
    assert_eq!(eager.total, 2);
    assert_eq!(eager.items[0].product_unit_ids, BTreeSet::from([units[0]]));
    assert_eq!(eager.items[1].product_unit_ids, BTreeSet::from([units[1]]));

    let plain = svc.products.find_all(first_page()).await.unwrap();
    assert_eq!(plain.items, eager.items);
    for (a, b) in plain.items.iter().zip(&eager.items) {
        assert_eq!(a.product_unit_ids, b.product_unit_ids);
    }
}

#[tokio::test]
async fn linking_unknown_ids_is_not_found() {
    let svc = create_test_services().await;
    let flour = svc.products.create(product("Flour")).await.unwrap().id.unwrap();

    let err = svc.product_service.add_unit(flour, 404).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    let err = svc.product_service.products_of_unit(404).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn ingredients_move_between_recipes() {
    let svc = create_test_services().await;
    let mut recipes = Vec::new();
    for name in ["Bread", "Cake"] {
        let r = svc
            .recipes
            .create(Recipe {
                id: None,
                name: name.into(),
                instructions_body: "Bake.".into(),
                user_id: None,
            })
            .await
            .unwrap();
        recipes.push(r.id.unwrap());
    }
    let ingredient = svc
        .recipe_ingredients
        .create(RecipeIngredient {
            id: None,
            quantity: Some(1.0),
            product_id: None,
            product_unit_id: None,
            recipe_id: None,
        })
        .await
        .unwrap()
        .id
        .unwrap();

    let attached = svc
        .recipe_service
        .attach_ingredient(recipes[0], ingredient)
        .await
        .unwrap();
    assert_eq!(attached.recipe_id, Some(recipes[0]));

    svc.recipe_service
        .attach_ingredient(recipes[1], ingredient)
        .await
        .unwrap();
    assert!(svc
        .recipe_service
        .ingredients_of(recipes[0])
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        svc.recipe_service.ingredients_of(recipes[1]).await.unwrap()[0].id,
        Some(ingredient)
    );

    // Detaching from a recipe that does not own it changes nothing.
    let unchanged = svc
        .recipe_service
        .detach_ingredient(recipes[0], ingredient)
        .await
        .unwrap();
    assert_eq!(unchanged.recipe_id, Some(recipes[1]));

    let detached = svc
        .recipe_service
        .detach_ingredient(recipes[1], ingredient)
        .await
        .unwrap();
    assert_eq!(detached.recipe_id, None);
}

#[tokio::test]
async fn moving_an_ingredient_rewrites_only_its_own_row() {
    let db = create_test_db().await;
    let repo = SeaOrmRepository::new(db);
    let recipe = |name: &str| Recipe {
        id: None,
        name: name.into(),
        instructions_body: "Bake.".into(),
        user_id: None,
    };
    let bread = CrudRepository::<Recipe>::insert(&repo, recipe("Bread"))
        .await
        .unwrap()
        .id
        .unwrap();
    let cake = CrudRepository::<Recipe>::insert(&repo, recipe("Cake"))
        .await
        .unwrap()
        .id
        .unwrap();
    let mut ids = Vec::new();
    for owner in [Some(bread), Some(bread), None] {
        let saved = CrudRepository::<RecipeIngredient>::insert(
            &repo,
            RecipeIngredient {
                id: None,
                quantity: Some(2.0),
                product_id: None,
                product_unit_id: None,
                recipe_id: owner,
            },
        )
        .await
        .unwrap();
        ids.push(saved.id.unwrap());
    }

    let moved = repo
        .move_ingredient(ids[0], IngredientMove::Attach { recipe: cake })
        .await
        .unwrap()
        .unwrap();
    assert!(moved.changed);
    assert_eq!(moved.ingredient.recipe_id, Some(cake));
    assert_eq!(moved.ingredient.quantity, Some(2.0));

    let again = repo
        .move_ingredient(ids[0], IngredientMove::Attach { recipe: cake })
        .await
        .unwrap()
        .unwrap();
    assert!(!again.changed);

    let foreign = repo
        .move_ingredient(ids[2], IngredientMove::Detach { recipe: bread })
        .await
        .unwrap()
        .unwrap();
    assert!(!foreign.changed);
    assert_eq!(foreign.ingredient.recipe_id, None);

    let of_bread: Vec<_> = repo
        .find_by_recipe(bread)
        .await
        .unwrap()
        .into_iter()
        .filter_map(|i| i.id)
        .collect();
    assert_eq!(of_bread, vec![ids[1]]);

    assert!(repo
        .move_ingredient(9999, IngredientMove::Detach { recipe: bread })
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn attaching_an_unknown_ingredient_is_not_found() {
    let svc = create_test_services().await;
    let bread = svc
        .recipes
        .create(Recipe {
            id: None,
            name: "Bread".into(),
            instructions_body: "Bake.".into(),
            user_id: None,
        })
        .await
        .unwrap()
        .id
        .unwrap();

    let err = svc
        .recipe_service
        .attach_ingredient(bread, 77)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    let err = svc
        .recipe_service
        .detach_ingredient(bread + 1, 77)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn mine_filters_by_owner_login() {
    let svc = create_test_services().await;
    let alice = svc.user_service.sync_user("alice").await.unwrap();
    let bob = svc.user_service.sync_user("Bob").await.unwrap();
    assert_eq!(bob.login, "bob");

    for (owner, description) in [(&alice, "milk"), (&bob, "eggs"), (&alice, "bread")] {
        svc.grocery_items
            .create(GroceryItem {
                id: None,
                quantity: Some(1.0),
                description: Some(description.into()),
                user_id: owner.id,
                product_id: None,
                unit_id: None,
            })
            .await
            .unwrap();
    }
    svc.recipes
        .create(Recipe {
            id: None,
            name: "Omelette".into(),
            instructions_body: "Whisk, fry.".into(),
            user_id: bob.id,
        })
        .await
        .unwrap();

    let mine = svc
        .grocery_item_service
        .find_mine("alice", first_page())
        .await
        .unwrap();
    let descriptions: Vec<_> = mine
        .items
        .iter()
        .filter_map(|i| i.description.clone())
        .collect();
    assert_eq!(mine.total, 2);
    assert_eq!(descriptions, vec!["milk", "bread"]);

    let recipes = svc.recipe_service.find_mine("bob", first_page()).await.unwrap();
    assert_eq!(recipes.total, 1);
    assert_eq!(recipes.items[0].name, "Omelette");
    assert_eq!(
        svc.recipe_service
            .find_mine("alice", first_page())
            .await
            .unwrap()
            .total,
        0
    );
}

#[tokio::test]
async fn sync_user_is_stable() {
    let svc = create_test_services().await;
    let first = svc.user_service.sync_user("carol").await.unwrap();
    let again = svc.user_service.sync_user(" Carol ").await.unwrap();
    assert_eq!(first, again);

    let page = svc.user_service.find_all(first_page()).await.unwrap();
    assert_eq!(page.total, 1);

    let err = svc.user_service.find_by_login("dave").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn pages_are_ordered_by_id() {
    let svc = create_test_services().await;
    for name in ["a", "b", "c", "d", "e"] {
        svc.product_units.create(unit(name)).await.unwrap();
    }
    let page = svc
        .product_units
        .find_all(PageRequest { page: 1, size: 2 })
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    let names: Vec<_> = page.items.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["c", "d"]);
}
