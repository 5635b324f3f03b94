//! Plan loading and view assembly: three bounded reads (meals, line
//! items, check-ins) plus extras, stitched into the pure summary input.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::nutrition::macros::MacroSet;
use crate::nutrition::summary::{MealView, PlanView};

use super::repo::{ExtraFood, Meal, MealCheckIn, MealFood, MealPlan};

pub struct MealWithItems {
    pub meal: Meal,
    pub foods: Vec<MealFood>,
    pub check_in: Option<MealCheckIn>,
}

pub struct PlanContents {
    pub meals: Vec<MealWithItems>,
    pub extras: Vec<ExtraFood>,
}

pub async fn load_contents(db: &PgPool, plan_id: Uuid) -> anyhow::Result<PlanContents> {
    let meals = Meal::list_for_plan(db, plan_id).await?;
    let foods = MealFood::list_for_plan(db, plan_id).await?;
    let check_ins = MealCheckIn::list_for_plan(db, plan_id).await?;
    let extras = ExtraFood::list_for_plan(db, plan_id).await?;

    let mut foods_by_meal: HashMap<Uuid, Vec<MealFood>> = HashMap::new();
    for food in foods {
        foods_by_meal.entry(food.meal_id).or_default().push(food);
    }
    let mut check_ins_by_meal: HashMap<Uuid, MealCheckIn> = check_ins
        .into_iter()
        .map(|ci| (ci.meal_id, ci))
        .collect();

    let meals = meals
        .into_iter()
        .map(|meal| MealWithItems {
            foods: foods_by_meal.remove(&meal.id).unwrap_or_default(),
            check_in: check_ins_by_meal.remove(&meal.id),
            meal,
        })
        .collect();

    Ok(PlanContents { meals, extras })
}

/// Meal target = sum of its cached line-item snapshots.
pub fn meal_target(foods: &[MealFood]) -> MacroSet {
    foods.iter().map(MealFood::snapshot).sum()
}

pub fn to_plan_view(plan: &MealPlan, contents: &PlanContents) -> PlanView {
    PlanView {
        targets: plan.targets(),
        meals: contents
            .meals
            .iter()
            .map(|m| MealView {
                id: m.meal.id,
                name: m.meal.name.clone(),
                target: meal_target(&m.foods),
                check_in: m.check_in.as_ref().map(MealCheckIn::to_check_in),
            })
            .collect(),
        extras: contents.extras.iter().map(ExtraFood::snapshot).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::OffsetDateTime;

    fn meal_row(plan_id: Uuid, name: &str) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            plan_id,
            name: name.into(),
            position: 0,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn food_row(meal_id: Uuid, calories: rust_decimal::Decimal) -> MealFood {
        MealFood {
            id: Uuid::new_v4(),
            meal_id,
            // food deleted since: the cached snapshot still counts
            food_id: None,
            food_name: "Oats".into(),
            quantity: dec!(150),
            unit: "g".into(),
            calc_calories: calories,
            calc_carbs_g: dec!(10),
            calc_protein_g: dec!(5),
            calc_fat_g: dec!(2),
            calc_fiber_g: dec!(1),
            calc_sugar_g: dec!(0.5),
            calc_sodium_mg: dec!(100),
            calc_saturated_fat_g: dec!(0.3),
            consumed: false,
            consumed_quantity: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn meal_target_sums_snapshots() {
        let meal_id = Uuid::new_v4();
        let foods = vec![food_row(meal_id, dec!(375)), food_row(meal_id, dec!(125))];
        let target = meal_target(&foods);
        assert_eq!(target.calories, dec!(500));
        assert_eq!(target.carbs_g, dec!(20));
    }

    #[test]
    fn meal_with_no_items_has_zero_target() {
        assert_eq!(meal_target(&[]), MacroSet::zero());
    }

    #[test]
    fn view_keeps_snapshot_totals_for_deleted_foods() {
        let plan = MealPlan {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_date: time::macros::date!(2025 - 08 - 06),
            target_calories: Some(dec!(2000)),
            target_carbs_g: Some(dec!(250)),
            target_protein_g: Some(dec!(100)),
            target_fat_g: Some(dec!(67)),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let meal = meal_row(plan.id, "breakfast");
        let contents = PlanContents {
            meals: vec![MealWithItems {
                foods: vec![food_row(meal.id, dec!(375))],
                check_in: None,
                meal,
            }],
            extras: vec![],
        };
        let view = to_plan_view(&plan, &contents);
        assert_eq!(view.targets.as_ref().unwrap().calories, dec!(2000));
        assert_eq!(view.meals[0].target.calories, dec!(375));
    }
}
