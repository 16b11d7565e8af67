use http_problem::{FieldError, Problem};
use utoipa::OpenApi;

use crate::api::rest::dto::{
    EntityRef, GroceryItemDto, ProductCategoryDto, ProductDto, ProductUnitDto, RecipeDto,
    RecipeIngredientDto, UserDto,
};

/// Schemas of the products REST surface.
#[derive(OpenApi)]
#[openapi(
    info(title = "Fridgy Products API", description = "Products, units, categories, grocery items and recipes"),
    components(schemas(
        EntityRef,
        ProductDto,
        ProductUnitDto,
        ProductCategoryDto,
        GroceryItemDto,
        RecipeDto,
        RecipeIngredientDto,
        UserDto,
        Problem,
        FieldError
    )),
    tags((name = "products", description = "Product catalogue, grocery lists and recipes"))
)]
pub struct ProductsApiDoc;
