use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::macros::{MacroSet, TargetMacros};
use crate::nutrition::reconcile::CheckIn;

/// One plan per (user, date). Target macros are copied from the profile
/// at generation time; consumed figures are never stored — they are
/// recomputed from the meals and extras on every read.
#[derive(Debug, Clone, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_date: Date,
    pub target_calories: Option<Decimal>,
    pub target_carbs_g: Option<Decimal>,
    pub target_protein_g: Option<Decimal>,
    pub target_fat_g: Option<Decimal>,
    pub created_at: OffsetDateTime,
}

impl MealPlan {
    /// `None` when the plan was generated without a profile.
    pub fn targets(&self) -> Option<TargetMacros> {
        self.target_calories.map(|calories| TargetMacros {
            calories,
            carbs_g: self.target_carbs_g.unwrap_or_default(),
            protein_g: self.target_protein_g.unwrap_or_default(),
            fat_g: self.target_fat_g.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub position: i32,
    pub created_at: OffsetDateTime,
}

/// Line item with the macro snapshot cached at creation time. Summing
/// always happens over these columns, so later food edits or deletes
/// never change historical totals.
#[derive(Debug, Clone, FromRow)]
pub struct MealFood {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub food_id: Option<Uuid>,
    pub food_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub calc_calories: Decimal,
    pub calc_carbs_g: Decimal,
    pub calc_protein_g: Decimal,
    pub calc_fat_g: Decimal,
    pub calc_fiber_g: Decimal,
    pub calc_sugar_g: Decimal,
    pub calc_sodium_mg: Decimal,
    pub calc_saturated_fat_g: Decimal,
    pub consumed: bool,
    pub consumed_quantity: Option<Decimal>,
    pub created_at: OffsetDateTime,
}

impl MealFood {
    pub fn snapshot(&self) -> MacroSet {
        MacroSet {
            calories: self.calc_calories,
            carbs_g: self.calc_carbs_g,
            protein_g: self.calc_protein_g,
            fat_g: self.calc_fat_g,
            fiber_g: self.calc_fiber_g,
            sugar_g: self.calc_sugar_g,
            sodium_mg: self.calc_sodium_mg,
            saturated_fat_g: self.calc_saturated_fat_g,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MealCheckIn {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub completion_pct: Decimal,
    pub actual_calories: Option<Decimal>,
    pub actual_carbs_g: Option<Decimal>,
    pub actual_protein_g: Option<Decimal>,
    pub actual_fat_g: Option<Decimal>,
    pub satisfaction: Option<i16>,
    pub checked_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl MealCheckIn {
    pub fn to_check_in(&self) -> CheckIn {
        CheckIn {
            completion_pct: self.completion_pct,
            actual_calories: self.actual_calories,
            actual_carbs_g: self.actual_carbs_g,
            actual_protein_g: self.actual_protein_g,
            actual_fat_g: self.actual_fat_g,
            satisfaction: self.satisfaction,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ExtraFood {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub food_id: Option<Uuid>,
    pub food_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub calc_calories: Decimal,
    pub calc_carbs_g: Decimal,
    pub calc_protein_g: Decimal,
    pub calc_fat_g: Decimal,
    pub calc_fiber_g: Decimal,
    pub calc_sugar_g: Decimal,
    pub calc_sodium_mg: Decimal,
    pub calc_saturated_fat_g: Decimal,
    pub created_at: OffsetDateTime,
}

impl ExtraFood {
    pub fn snapshot(&self) -> MacroSet {
        MacroSet {
            calories: self.calc_calories,
            carbs_g: self.calc_carbs_g,
            protein_g: self.calc_protein_g,
            fat_g: self.calc_fat_g,
            fiber_g: self.calc_fiber_g,
            sugar_g: self.calc_sugar_g,
            sodium_mg: self.calc_sodium_mg,
            saturated_fat_g: self.calc_saturated_fat_g,
        }
    }
}

impl MealPlan {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        plan_date: Date,
        targets: Option<&TargetMacros>,
    ) -> Result<MealPlan, sqlx::Error> {
        sqlx::query_as::<_, MealPlan>(
            r#"
            INSERT INTO meal_plans
                (user_id, plan_date, target_calories, target_carbs_g,
                 target_protein_g, target_fat_g)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, plan_date, target_calories, target_carbs_g,
                      target_protein_g, target_fat_g, created_at
            "#,
        )
        .bind(user_id)
        .bind(plan_date)
        .bind(targets.map(|t| t.calories))
        .bind(targets.map(|t| t.carbs_g))
        .bind(targets.map(|t| t.protein_g))
        .bind(targets.map(|t| t.fat_g))
        .fetch_one(db)
        .await
    }

    pub async fn find_by_date(
        db: &PgPool,
        user_id: Uuid,
        plan_date: Date,
    ) -> anyhow::Result<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, plan_date, target_calories, target_carbs_g,
                   target_protein_g, target_fat_g, created_at
            FROM meal_plans
            WHERE user_id = $1 AND plan_date = $2
            "#,
        )
        .bind(user_id)
        .bind(plan_date)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}

impl Meal {
    pub async fn create(
        db: &PgPool,
        plan_id: Uuid,
        name: &str,
        position: i32,
    ) -> anyhow::Result<Meal> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (plan_id, name, position)
            VALUES ($1, $2, $3)
            RETURNING id, plan_id, name, position, created_at
            "#,
        )
        .bind(plan_id)
        .bind(name)
        .bind(position)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Resolve a meal only if it belongs to one of the user's plans.
    pub async fn find_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            SELECT m.id, m.plan_id, m.name, m.position, m.created_at
            FROM meals m
            JOIN meal_plans p ON p.id = m.plan_id
            WHERE m.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn list_for_plan(db: &PgPool, plan_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, plan_id, name, position, created_at
            FROM meals
            WHERE plan_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM meals m
            USING meal_plans p
            WHERE m.plan_id = p.id AND m.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

const MEAL_FOOD_COLUMNS: &str = r#"
    id, meal_id, food_id, food_name, quantity, unit, calc_calories, calc_carbs_g,
    calc_protein_g, calc_fat_g, calc_fiber_g, calc_sugar_g, calc_sodium_mg,
    calc_saturated_fat_g, consumed, consumed_quantity, created_at
"#;

impl MealFood {
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        db: &PgPool,
        meal_id: Uuid,
        food_id: Uuid,
        food_name: &str,
        quantity: Decimal,
        unit: &str,
        snapshot: &MacroSet,
    ) -> anyhow::Result<MealFood> {
        let row = sqlx::query_as::<_, MealFood>(&format!(
            r#"
            INSERT INTO meal_foods
                (meal_id, food_id, food_name, quantity, unit, calc_calories,
                 calc_carbs_g, calc_protein_g, calc_fat_g, calc_fiber_g,
                 calc_sugar_g, calc_sodium_mg, calc_saturated_fat_g)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {MEAL_FOOD_COLUMNS}
            "#
        ))
        .bind(meal_id)
        .bind(food_id)
        .bind(food_name)
        .bind(quantity)
        .bind(unit)
        .bind(snapshot.calories)
        .bind(snapshot.carbs_g)
        .bind(snapshot.protein_g)
        .bind(snapshot.fat_g)
        .bind(snapshot.fiber_g)
        .bind(snapshot.sugar_g)
        .bind(snapshot.sodium_mg)
        .bind(snapshot.saturated_fat_g)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// All line items of a plan's meals in one read.
    pub async fn list_for_plan(db: &PgPool, plan_id: Uuid) -> anyhow::Result<Vec<MealFood>> {
        let rows = sqlx::query_as::<_, MealFood>(
            r#"
            SELECT mf.id, mf.meal_id, mf.food_id, mf.food_name, mf.quantity, mf.unit,
                   mf.calc_calories, mf.calc_carbs_g, mf.calc_protein_g, mf.calc_fat_g,
                   mf.calc_fiber_g, mf.calc_sugar_g, mf.calc_sodium_mg,
                   mf.calc_saturated_fat_g, mf.consumed, mf.consumed_quantity, mf.created_at
            FROM meal_foods mf
            JOIN meals m ON m.id = mf.meal_id
            WHERE m.plan_id = $1
            ORDER BY mf.created_at ASC
            "#,
        )
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_meal(db: &PgPool, meal_id: Uuid) -> anyhow::Result<Vec<MealFood>> {
        let rows = sqlx::query_as::<_, MealFood>(&format!(
            r#"
            SELECT {MEAL_FOOD_COLUMNS}
            FROM meal_foods
            WHERE meal_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(meal_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn set_consumption(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        consumed: bool,
        consumed_quantity: Option<Decimal>,
    ) -> anyhow::Result<Option<MealFood>> {
        let row = sqlx::query_as::<_, MealFood>(
            r#"
            UPDATE meal_foods mf SET consumed = $3, consumed_quantity = $4
            FROM meals m
            JOIN meal_plans p ON p.id = m.plan_id
            WHERE mf.meal_id = m.id AND mf.id = $1 AND p.user_id = $2
            RETURNING mf.id, mf.meal_id, mf.food_id, mf.food_name, mf.quantity, mf.unit,
                      mf.calc_calories, mf.calc_carbs_g, mf.calc_protein_g, mf.calc_fat_g,
                      mf.calc_fiber_g, mf.calc_sugar_g, mf.calc_sodium_mg,
                      mf.calc_saturated_fat_g, mf.consumed, mf.consumed_quantity, mf.created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(consumed)
        .bind(consumed_quantity)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM meal_foods mf
            USING meals m, meal_plans p
            WHERE mf.meal_id = m.id AND m.plan_id = p.id
              AND mf.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

const CHECK_IN_COLUMNS: &str = r#"
    id, meal_id, completion_pct, actual_calories, actual_carbs_g,
    actual_protein_g, actual_fat_g, satisfaction, checked_at, updated_at
"#;

pub struct CheckInInput {
    pub completion_pct: Decimal,
    pub actual_calories: Option<Decimal>,
    pub actual_carbs_g: Option<Decimal>,
    pub actual_protein_g: Option<Decimal>,
    pub actual_fat_g: Option<Decimal>,
    pub satisfaction: Option<i16>,
}

impl MealCheckIn {
    /// First check-in inserts; any later one updates in place. The unique
    /// meal_id constraint guarantees at most one row per meal.
    pub async fn upsert(
        db: &PgPool,
        meal_id: Uuid,
        input: &CheckInInput,
    ) -> anyhow::Result<MealCheckIn> {
        let row = sqlx::query_as::<_, MealCheckIn>(&format!(
            r#"
            INSERT INTO meal_check_ins
                (meal_id, completion_pct, actual_calories, actual_carbs_g,
                 actual_protein_g, actual_fat_g, satisfaction)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (meal_id) DO UPDATE SET
                completion_pct = EXCLUDED.completion_pct,
                actual_calories = EXCLUDED.actual_calories,
                actual_carbs_g = EXCLUDED.actual_carbs_g,
                actual_protein_g = EXCLUDED.actual_protein_g,
                actual_fat_g = EXCLUDED.actual_fat_g,
                satisfaction = EXCLUDED.satisfaction,
                updated_at = now()
            RETURNING {CHECK_IN_COLUMNS}
            "#
        ))
        .bind(meal_id)
        .bind(input.completion_pct)
        .bind(input.actual_calories)
        .bind(input.actual_carbs_g)
        .bind(input.actual_protein_g)
        .bind(input.actual_fat_g)
        .bind(input.satisfaction)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list_for_plan(db: &PgPool, plan_id: Uuid) -> anyhow::Result<Vec<MealCheckIn>> {
        let rows = sqlx::query_as::<_, MealCheckIn>(
            r#"
            SELECT ci.id, ci.meal_id, ci.completion_pct, ci.actual_calories,
                   ci.actual_carbs_g, ci.actual_protein_g, ci.actual_fat_g,
                   ci.satisfaction, ci.checked_at, ci.updated_at
            FROM meal_check_ins ci
            JOIN meals m ON m.id = ci.meal_id
            WHERE m.plan_id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

const EXTRA_FOOD_COLUMNS: &str = r#"
    id, plan_id, food_id, food_name, quantity, unit, calc_calories, calc_carbs_g,
    calc_protein_g, calc_fat_g, calc_fiber_g, calc_sugar_g, calc_sodium_mg,
    calc_saturated_fat_g, created_at
"#;

impl ExtraFood {
    pub async fn insert(
        db: &PgPool,
        plan_id: Uuid,
        food_id: Uuid,
        food_name: &str,
        quantity: Decimal,
        unit: &str,
        snapshot: &MacroSet,
    ) -> anyhow::Result<ExtraFood> {
        let row = sqlx::query_as::<_, ExtraFood>(&format!(
            r#"
            INSERT INTO extra_foods
                (plan_id, food_id, food_name, quantity, unit, calc_calories,
                 calc_carbs_g, calc_protein_g, calc_fat_g, calc_fiber_g,
                 calc_sugar_g, calc_sodium_mg, calc_saturated_fat_g)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {EXTRA_FOOD_COLUMNS}
            "#
        ))
        .bind(plan_id)
        .bind(food_id)
        .bind(food_name)
        .bind(quantity)
        .bind(unit)
        .bind(snapshot.calories)
        .bind(snapshot.carbs_g)
        .bind(snapshot.protein_g)
        .bind(snapshot.fat_g)
        .bind(snapshot.fiber_g)
        .bind(snapshot.sugar_g)
        .bind(snapshot.sodium_mg)
        .bind(snapshot.saturated_fat_g)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list_for_plan(db: &PgPool, plan_id: Uuid) -> anyhow::Result<Vec<ExtraFood>> {
        let rows = sqlx::query_as::<_, ExtraFood>(&format!(
            r#"
            SELECT {EXTRA_FOOD_COLUMNS}
            FROM extra_foods
            WHERE plan_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM extra_foods ef
            USING meal_plans p
            WHERE ef.plan_id = p.id AND ef.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
