use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub birth_date: Date,
    pub gender: String,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub target_weight_kg: Option<Decimal>,
    pub target_date: Option<Date>,
    pub activity_level: String,
    pub goal: String,
    pub bmr: Option<Decimal>,
    pub tdee: Option<Decimal>,
    pub daily_calorie_target: Option<Decimal>,
    pub daily_water_target_ml: Option<Decimal>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Activity multiplier row, seeded by migration.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLevel {
    pub code: String,
    pub multiplier: Decimal,
}

/// Goal policy row: calorie adjustment plus macro split, seeded by migration.
#[derive(Debug, Clone, FromRow)]
pub struct GoalConfig {
    pub code: String,
    pub adjustment_type: String,
    pub adjustment_value: Decimal,
    pub carbs_pct: Decimal,
    pub protein_pct: Decimal,
    pub fat_pct: Decimal,
}

impl ActivityLevel {
    pub async fn find(db: &PgPool, code: &str) -> anyhow::Result<Option<ActivityLevel>> {
        let row = sqlx::query_as::<_, ActivityLevel>(
            r#"SELECT code, multiplier FROM activity_levels WHERE code = $1"#,
        )
        .bind(code)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}

impl GoalConfig {
    pub async fn find(db: &PgPool, code: &str) -> anyhow::Result<Option<GoalConfig>> {
        let row = sqlx::query_as::<_, GoalConfig>(
            r#"
            SELECT code, adjustment_type, adjustment_value, carbs_pct, protein_pct, fat_pct
            FROM goal_configs
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}

const PROFILE_COLUMNS: &str = r#"
    id, user_id, birth_date, gender, height_cm, weight_kg, target_weight_kg,
    target_date, activity_level, goal, bmr, tdee, daily_calorie_target,
    daily_water_target_ml, created_at, updated_at
"#;

pub struct ProfileInput {
    pub birth_date: Date,
    pub gender: String,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub target_weight_kg: Option<Decimal>,
    pub target_date: Option<Date>,
    pub activity_level: String,
    pub goal: String,
    pub bmr: Decimal,
    pub tdee: Decimal,
    pub daily_calorie_target: Decimal,
    pub daily_water_target_ml: Decimal,
}

impl Profile {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> Result<Profile, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO user_profiles
                (user_id, birth_date, gender, height_cm, weight_kg, target_weight_kg,
                 target_date, activity_level, goal, bmr, tdee, daily_calorie_target,
                 daily_water_target_ml)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(input.birth_date)
        .bind(&input.gender)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(input.target_weight_kg)
        .bind(input.target_date)
        .bind(&input.activity_level)
        .bind(&input.goal)
        .bind(input.bmr)
        .bind(input.tdee)
        .bind(input.daily_calorie_target)
        .bind(input.daily_water_target_ml)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE user_profiles SET
                birth_date = $2, gender = $3, height_cm = $4, weight_kg = $5,
                target_weight_kg = $6, target_date = $7, activity_level = $8,
                goal = $9, bmr = $10, tdee = $11, daily_calorie_target = $12,
                daily_water_target_ml = $13, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(input.birth_date)
        .bind(&input.gender)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(input.target_weight_kg)
        .bind(input.target_date)
        .bind(&input.activity_level)
        .bind(&input.goal)
        .bind(input.bmr)
        .bind(input.tdee)
        .bind(input.daily_calorie_target)
        .bind(input.daily_water_target_ml)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn update_weight(
        db: &PgPool,
        user_id: Uuid,
        weight_kg: Decimal,
        bmr: Decimal,
        tdee: Decimal,
        daily_calorie_target: Decimal,
        daily_water_target_ml: Decimal,
    ) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE user_profiles SET
                weight_kg = $2, bmr = $3, tdee = $4, daily_calorie_target = $5,
                daily_water_target_ml = $6, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(weight_kg)
        .bind(bmr)
        .bind(tdee)
        .bind(daily_calorie_target)
        .bind(daily_water_target_ml)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}
