use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Login,
}

#[derive(DeriveIden)]
enum ProductCategory {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum ProductUnit {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Name,
    EanCode,
    ProductCategoryId,
}

#[derive(DeriveIden)]
enum RelProductProductUnit {
    #[sea_orm(iden = "rel_product__product_unit")]
    Table,
    ProductId,
    ProductUnitId,
}

#[derive(DeriveIden)]
enum GroceryItem {
    Table,
    Id,
    Quantity,
    Description,
    UserId,
    ProductId,
    UnitId,
}

#[derive(DeriveIden)]
enum Recipe {
    Table,
    Id,
    Name,
    InstructionsBody,
    UserId,
}

#[derive(DeriveIden)]
enum RecipeIngredient {
    Table,
    Id,
    Quantity,
    ProductId,
    ProductUnitId,
    RecipeId,
}

fn id_column<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn fk<F, T, C>(name: &str, from: F, column: C, to: T) -> ForeignKeyCreateStatement
where
    F: IntoIden + 'static,
    T: IntoIden + 'static,
    C: IntoIden,
{
    ForeignKey::create()
        .name(name)
        .from_tbl(from)
        .from_col(column)
        .to_tbl(to)
        .to_col(Alias::new("id"))
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_column(Users::Id))
                    .col(ColumnDef::new(Users::Login).string_len(50).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductCategory::Table)
                    .if_not_exists()
                    .col(id_column(ProductCategory::Id))
                    .col(ColumnDef::new(ProductCategory::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductUnit::Table)
                    .if_not_exists()
                    .col(id_column(ProductUnit::Id))
                    .col(ColumnDef::new(ProductUnit::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(id_column(Product::Id))
                    .col(ColumnDef::new(Product::Name).string().not_null())
                    .col(ColumnDef::new(Product::EanCode).string().null())
                    .col(ColumnDef::new(Product::ProductCategoryId).big_integer().null())
                    .foreign_key(&mut fk(
                        "fk_product__product_category_id",
                        Product::Table,
                        Product::ProductCategoryId,
                        ProductCategory::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RelProductProductUnit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RelProductProductUnit::ProductId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RelProductProductUnit::ProductUnitId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(RelProductProductUnit::ProductId)
                            .col(RelProductProductUnit::ProductUnitId),
                    )
                    .foreign_key(&mut fk(
                        "fk_rel_product__product_unit__product_id",
                        RelProductProductUnit::Table,
                        RelProductProductUnit::ProductId,
                        Product::Table,
                    ))
                    .foreign_key(&mut fk(
                        "fk_rel_product__product_unit__product_unit_id",
                        RelProductProductUnit::Table,
                        RelProductProductUnit::ProductUnitId,
                        ProductUnit::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GroceryItem::Table)
                    .if_not_exists()
                    .col(id_column(GroceryItem::Id))
                    .col(ColumnDef::new(GroceryItem::Quantity).double().null())
                    .col(ColumnDef::new(GroceryItem::Description).string().null())
                    .col(ColumnDef::new(GroceryItem::UserId).big_integer().null())
                    .col(ColumnDef::new(GroceryItem::ProductId).big_integer().null())
                    .col(ColumnDef::new(GroceryItem::UnitId).big_integer().null())
                    .foreign_key(&mut fk(
                        "fk_grocery_item__user_id",
                        GroceryItem::Table,
                        GroceryItem::UserId,
                        Users::Table,
                    ))
                    .foreign_key(&mut fk(
                        "fk_grocery_item__product_id",
                        GroceryItem::Table,
                        GroceryItem::ProductId,
                        Product::Table,
                    ))
                    .foreign_key(&mut fk(
                        "fk_grocery_item__unit_id",
                        GroceryItem::Table,
                        GroceryItem::UnitId,
                        ProductUnit::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipe::Table)
                    .if_not_exists()
                    .col(id_column(Recipe::Id))
                    .col(ColumnDef::new(Recipe::Name).string().not_null())
                    .col(ColumnDef::new(Recipe::InstructionsBody).text().not_null())
                    .col(ColumnDef::new(Recipe::UserId).big_integer().null())
                    .foreign_key(&mut fk(
                        "fk_recipe__user_id",
                        Recipe::Table,
                        Recipe::UserId,
                        Users::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeIngredient::Table)
                    .if_not_exists()
                    .col(id_column(RecipeIngredient::Id))
                    .col(ColumnDef::new(RecipeIngredient::Quantity).double().null())
                    .col(ColumnDef::new(RecipeIngredient::ProductId).big_integer().null())
                    .col(ColumnDef::new(RecipeIngredient::ProductUnitId).big_integer().null())
                    .col(ColumnDef::new(RecipeIngredient::RecipeId).big_integer().null())
                    .foreign_key(&mut fk(
                        "fk_recipe_ingredient__product_id",
                        RecipeIngredient::Table,
                        RecipeIngredient::ProductId,
                        Product::Table,
                    ))
                    .foreign_key(&mut fk(
                        "fk_recipe_ingredient__product_unit_id",
                        RecipeIngredient::Table,
                        RecipeIngredient::ProductUnitId,
                        ProductUnit::Table,
                    ))
                    .foreign_key(&mut fk(
                        "fk_recipe_ingredient__recipe_id",
                        RecipeIngredient::Table,
                        RecipeIngredient::RecipeId,
                        Recipe::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let drops = [
            Table::drop().table(RecipeIngredient::Table).if_exists().to_owned(),
            Table::drop().table(Recipe::Table).if_exists().to_owned(),
            Table::drop().table(GroceryItem::Table).if_exists().to_owned(),
            Table::drop().table(RelProductProductUnit::Table).if_exists().to_owned(),
            Table::drop().table(Product::Table).if_exists().to_owned(),
            Table::drop().table(ProductUnit::Table).if_exists().to_owned(),
            Table::drop().table(ProductCategory::Table).if_exists().to_owned(),
            Table::drop().table(Users::Table).if_exists().to_owned(),
        ];
        for stmt in drops {
            manager.drop_table(stmt).await?;
        }
        Ok(())
    }
}
