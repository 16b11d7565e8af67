use axum::{
    routing::{get, put},
    Extension, Router,
};

use crate::api::rest::dto::{
    GroceryItemDto, ProductCategoryDto, ProductDto, ProductUnitDto, RecipeDto,
    RecipeIngredientDto, RestDto,
};
use crate::api::rest::handlers::{crud, grocery_items, products, recipes, users};
use crate::api::rest::RestContext;
use crate::domain::service::Services;
use crate::domain::Record;

fn collection<D: RestDto>() -> String {
    format!("/api/{}", <D::Model as Record>::KIND.path())
}

fn item<D: RestDto>() -> String {
    format!("/api/{}/{{id}}", <D::Model as Record>::KIND.path())
}

/// The six CRUD route pairs for one entity.
fn crud_routes<D: RestDto>(router: Router) -> Router {
    router
        .route(
            &collection::<D>(),
            get(crud::list::<D>).post(crud::create::<D>),
        )
        .route(
            &item::<D>(),
            get(crud::get_one::<D>)
                .put(crud::update::<D>)
                .patch(crud::partial_update::<D>)
                .delete(crud::delete::<D>),
        )
}

/// Register every products REST route on `router`.
pub fn register_routes(router: Router, services: &Services, ctx: RestContext) -> Router {
    let mut api = Router::new();
    api = crud_routes::<ProductUnitDto>(api);
    api = crud_routes::<ProductCategoryDto>(api);
    api = crud_routes::<GroceryItemDto>(api);
    api = crud_routes::<RecipeDto>(api);
    api = crud_routes::<RecipeIngredientDto>(api);

    // Products list with optional eager load, otherwise generic.
    api = api
        .route(
            &collection::<ProductDto>(),
            get(products::list_products).post(crud::create::<ProductDto>),
        )
        .route(
            &item::<ProductDto>(),
            get(crud::get_one::<ProductDto>)
                .put(crud::update::<ProductDto>)
                .patch(crud::partial_update::<ProductDto>)
                .delete(crud::delete::<ProductDto>),
        )
        .route(
            "/api/products/{id}/product-units/{unit_id}",
            put(products::add_unit).delete(products::remove_unit),
        )
        .route(
            "/api/product-units/{id}/products",
            get(products::products_of_unit),
        );

    api = api
        .route("/api/recipes/mine", get(recipes::my_recipes))
        .route(
            "/api/recipes/{id}/recipe-ingredients",
            get(recipes::ingredients_of),
        )
        .route(
            "/api/recipes/{id}/recipe-ingredients/{ingredient_id}",
            put(recipes::attach_ingredient).delete(recipes::detach_ingredient),
        )
        .route("/api/grocery-items/mine", get(grocery_items::my_grocery_items))
        .route("/api/admin/users", get(users::list_users))
        .route("/api/admin/users/{login}", get(users::get_user));

    let api = api
        .layer(Extension(services.products.clone()))
        .layer(Extension(services.product_units.clone()))
        .layer(Extension(services.product_categories.clone()))
        .layer(Extension(services.grocery_items.clone()))
        .layer(Extension(services.recipes.clone()))
        .layer(Extension(services.recipe_ingredients.clone()))
        .layer(Extension(services.product_service.clone()))
        .layer(Extension(services.recipe_service.clone()))
        .layer(Extension(services.grocery_item_service.clone()))
        .layer(Extension(services.user_service.clone()))
        .layer(Extension(services.config.clone()))
        .layer(Extension(ctx));

    router.merge(api)
}
