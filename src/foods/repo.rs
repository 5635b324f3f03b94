use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::macros::MacroSet;

/// Catalog entry with a per-100g nutrition basis. `owner_id` is NULL for
/// shared catalog foods; user-created foods carry their owner.
#[derive(Debug, Clone, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub category: Option<String>,
    pub calories: Option<Decimal>,
    pub carbs_g: Option<Decimal>,
    pub protein_g: Option<Decimal>,
    pub fat_g: Option<Decimal>,
    pub fiber_g: Option<Decimal>,
    pub sugar_g: Option<Decimal>,
    pub sodium_mg: Option<Decimal>,
    pub saturated_fat_g: Option<Decimal>,
    pub serving_size_g: Option<Decimal>,
    pub serving_description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Food {
    /// Per-100g basis with null fields read as zero.
    pub fn basis(&self) -> MacroSet {
        MacroSet {
            calories: self.calories.unwrap_or_default(),
            carbs_g: self.carbs_g.unwrap_or_default(),
            protein_g: self.protein_g.unwrap_or_default(),
            fat_g: self.fat_g.unwrap_or_default(),
            fiber_g: self.fiber_g.unwrap_or_default(),
            sugar_g: self.sugar_g.unwrap_or_default(),
            sodium_mg: self.sodium_mg.unwrap_or_default(),
            saturated_fat_g: self.saturated_fat_g.unwrap_or_default(),
        }
    }
}

const FOOD_COLUMNS: &str = r#"
    id, owner_id, name, category, calories, carbs_g, protein_g, fat_g, fiber_g,
    sugar_g, sodium_mg, saturated_fat_g, serving_size_g, serving_description,
    created_at, updated_at
"#;

pub struct FoodInput {
    pub name: String,
    pub category: Option<String>,
    pub calories: Option<Decimal>,
    pub carbs_g: Option<Decimal>,
    pub protein_g: Option<Decimal>,
    pub fat_g: Option<Decimal>,
    pub fiber_g: Option<Decimal>,
    pub sugar_g: Option<Decimal>,
    pub sodium_mg: Option<Decimal>,
    pub saturated_fat_g: Option<Decimal>,
    pub serving_size_g: Option<Decimal>,
    pub serving_description: Option<String>,
}

impl Food {
    pub async fn create(db: &PgPool, owner_id: Uuid, input: &FoodInput) -> anyhow::Result<Food> {
        let row = sqlx::query_as::<_, Food>(&format!(
            r#"
            INSERT INTO foods
                (owner_id, name, category, calories, carbs_g, protein_g, fat_g,
                 fiber_g, sugar_g, sodium_mg, saturated_fat_g, serving_size_g,
                 serving_description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {FOOD_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.calories)
        .bind(input.carbs_g)
        .bind(input.protein_g)
        .bind(input.fat_g)
        .bind(input.fiber_g)
        .bind(input.sugar_g)
        .bind(input.sodium_mg)
        .bind(input.saturated_fat_g)
        .bind(input.serving_size_g)
        .bind(&input.serving_description)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// A food the user can read: shared catalog or their own.
    pub async fn find_visible(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Food>> {
        let row = sqlx::query_as::<_, Food>(&format!(
            r#"
            SELECT {FOOD_COLUMNS}
            FROM foods
            WHERE id = $1 AND (owner_id IS NULL OR owner_id = $2)
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        q: Option<&str>,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Food>> {
        let rows = sqlx::query_as::<_, Food>(&format!(
            r#"
            SELECT {FOOD_COLUMNS}
            FROM foods
            WHERE (owner_id IS NULL OR owner_id = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR category = $3)
            ORDER BY name ASC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(user_id)
        .bind(q)
        .bind(category)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Edits only the user's own foods; edits never rewrite historical
    /// line-item snapshots, they only affect future calculations.
    pub async fn update(
        db: &PgPool,
        owner_id: Uuid,
        id: Uuid,
        input: &FoodInput,
    ) -> anyhow::Result<Option<Food>> {
        let row = sqlx::query_as::<_, Food>(&format!(
            r#"
            UPDATE foods SET
                name = $3, category = $4, calories = $5, carbs_g = $6,
                protein_g = $7, fat_g = $8, fiber_g = $9, sugar_g = $10,
                sodium_mg = $11, saturated_fat_g = $12, serving_size_g = $13,
                serving_description = $14, updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING {FOOD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.calories)
        .bind(input.carbs_g)
        .bind(input.protein_g)
        .bind(input.fat_g)
        .bind(input.fiber_g)
        .bind(input.sugar_g)
        .bind(input.sodium_mg)
        .bind(input.saturated_fat_g)
        .bind(input.serving_size_g)
        .bind(&input.serving_description)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM foods WHERE id = $1 AND owner_id = $2"#)
            .bind(id)
            .bind(owner_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn basis_reads_nulls_as_zero() {
        let food = Food {
            id: Uuid::new_v4(),
            owner_id: None,
            name: "Oats".into(),
            category: Some("grains".into()),
            calories: Some(dec!(389)),
            carbs_g: Some(dec!(66.3)),
            protein_g: None,
            fat_g: None,
            fiber_g: None,
            sugar_g: None,
            sodium_mg: None,
            saturated_fat_g: None,
            serving_size_g: Some(dec!(40)),
            serving_description: Some("1/2 cup".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let basis = food.basis();
        assert_eq!(basis.calories, dec!(389));
        assert_eq!(basis.protein_g, Decimal::ZERO);
    }
}
