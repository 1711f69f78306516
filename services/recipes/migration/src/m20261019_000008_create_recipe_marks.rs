use sea_orm_migration::prelude::*;

/// Favorites and shopping carts share one shape: a unique `(user_id, recipe_id)` mark.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [MarkTable::Favorites, MarkTable::ShoppingCarts] {
            manager.create_table(mark_table(table)).await?;
            manager
                .create_index(
                    Index::create()
                        .table(table)
                        .col(Mark::UserId)
                        .col(Mark::RecipeId)
                        .name(format!("uq_{}_user_id_recipe_id", table.to_string()))
                        .unique()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MarkTable::ShoppingCarts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MarkTable::Favorites).to_owned())
            .await
    }
}

fn mark_table(table: MarkTable) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Mark::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Mark::UserId).uuid().not_null())
        .col(ColumnDef::new(Mark::RecipeId).integer().not_null())
        .col(
            ColumnDef::new(Mark::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .from(table, Mark::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(table, Mark::RecipeId)
                .to(Recipes::Table, Recipes::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[derive(Iden, Clone, Copy)]
enum MarkTable {
    Favorites,
    ShoppingCarts,
}

#[derive(Iden)]
enum Mark {
    Id,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
}
