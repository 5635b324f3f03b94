use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Append-only calorie log entry: manual, food-linked or meal-linked.
/// Macro figures are snapshotted at insert time.
#[derive(Debug, Clone, FromRow)]
pub struct CalorieEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: Date,
    pub description: Option<String>,
    pub food_id: Option<Uuid>,
    pub meal_id: Option<Uuid>,
    pub calories: Decimal,
    pub carbs_g: Decimal,
    pub protein_g: Decimal,
    pub fat_g: Decimal,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct WaterIntake {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: Date,
    pub amount_ml: Decimal,
    pub created_at: OffsetDateTime,
}

pub struct CalorieEntryInput {
    pub entry_date: Date,
    pub description: Option<String>,
    pub food_id: Option<Uuid>,
    pub meal_id: Option<Uuid>,
    pub calories: Decimal,
    pub carbs_g: Decimal,
    pub protein_g: Decimal,
    pub fat_g: Decimal,
}

impl CalorieEntry {
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        input: &CalorieEntryInput,
    ) -> anyhow::Result<CalorieEntry> {
        let row = sqlx::query_as::<_, CalorieEntry>(
            r#"
            INSERT INTO calorie_entries
                (user_id, entry_date, description, food_id, meal_id, calories,
                 carbs_g, protein_g, fat_g)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, entry_date, description, food_id, meal_id,
                      calories, carbs_g, protein_g, fat_g, created_at
            "#,
        )
        .bind(user_id)
        .bind(input.entry_date)
        .bind(&input.description)
        .bind(input.food_id)
        .bind(input.meal_id)
        .bind(input.calories)
        .bind(input.carbs_g)
        .bind(input.protein_g)
        .bind(input.fat_g)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list_for_day(
        db: &PgPool,
        user_id: Uuid,
        day: Date,
    ) -> anyhow::Result<Vec<CalorieEntry>> {
        let rows = sqlx::query_as::<_, CalorieEntry>(
            r#"
            SELECT id, user_id, entry_date, description, food_id, meal_id,
                   calories, carbs_g, protein_g, fat_g, created_at
            FROM calorie_entries
            WHERE user_id = $1 AND entry_date = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(day)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

impl WaterIntake {
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        entry_date: Date,
        amount_ml: Decimal,
    ) -> anyhow::Result<WaterIntake> {
        let row = sqlx::query_as::<_, WaterIntake>(
            r#"
            INSERT INTO water_intakes (user_id, entry_date, amount_ml)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, entry_date, amount_ml, created_at
            "#,
        )
        .bind(user_id)
        .bind(entry_date)
        .bind(amount_ml)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// (entry count, total ml) for a user's day.
    pub async fn day_totals(
        db: &PgPool,
        user_id: Uuid,
        day: Date,
    ) -> anyhow::Result<(i64, Decimal)> {
        let row = sqlx::query_as::<_, (i64, Decimal)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(amount_ml), 0)
            FROM water_intakes
            WHERE user_id = $1 AND entry_date = $2
            "#,
        )
        .bind(user_id)
        .bind(day)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}
