//! Bulk ingredient import.
//!
//! ```bash
//! cargo run -p ingredient-loader -- --database-url postgres://... data/ingredients.csv
//! ```
//!
//! Rows already present (same name and measurement unit) are left untouched.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, Database, EntityTrait};
use tracing::info;

use pantry_recipes_schema::ingredients;

mod rows;

use rows::parse_rows;

/// Rows per INSERT statement.
const BATCH_SIZE: usize = 1000;

#[derive(Parser)]
#[command(about = "Load `name,measurement_unit` rows into the ingredient catalog")]
struct Args {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Two-column input file
    path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    pantry_core::tracing::init_tracing();
    let args = Args::parse();

    let input = tokio::fs::read_to_string(&args.path)
        .await
        .with_context(|| format!("read {}", args.path.display()))?;
    let rows = parse_rows(&input)?;

    let db = Database::connect(&args.database_url)
        .await
        .context("connect to database")?;

    let mut inserted = 0u64;
    for batch in rows.chunks(BATCH_SIZE) {
        let models = batch.iter().map(|row| ingredients::ActiveModel {
            name: Set(row.name.clone()),
            measurement_unit: Set(row.measurement_unit.clone()),
            ..Default::default()
        });
        inserted += ingredients::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    ingredients::Column::Name,
                    ingredients::Column::MeasurementUnit,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&db)
            .await
            .context("insert ingredients")?;
    }

    info!(
        read = rows.len(),
        inserted,
        path = %args.path.display(),
        "ingredients loaded"
    );
    Ok(())
}
