use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result};

/// The meal a recipe is planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// Every meal type, in the order meals are served.
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    /// The name used on the wire and in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MealType::ALL
            .into_iter()
            .find(|meal| meal.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(
                    format!("unknown meal type {s:?} (use breakfast, lunch, or dinner)"),
                    Some("meal_type".to_string()),
                )
            })
    }
}

/// Per-serving nutrition facts, as free-form strings like `"25g"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fats: String,
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
    /// Shopping aisle, e.g. `Produce` or `Pantry`.
    pub category: String,
}

/// A recipe placed on one day of a meal plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Day of the plan, starting at 1.
    pub day: u32,
    pub meal_type: MealType,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Recipe {
    /// The (day, meal) slot this recipe fills; plans are ordered by it.
    pub fn slot(&self) -> (u32, MealType) {
        (self.day, self.meal_type)
    }
}

/// Orders recipes by day, then breakfast, lunch, dinner.
pub fn sort_recipes(recipes: &mut [Recipe]) {
    recipes.sort_by_key(Recipe::slot);
}

/// The JSON reply of a plan or regenerate call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl MealPlan {
    /// Parses the model's JSON reply; blank text is an empty plan.
    pub fn from_reply(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text).map_err(|err| {
            Error::serialization(
                format!("model returned a malformed meal plan: {err}"),
                Some(Box::new(err)),
            )
        })
    }
}

/// Response schema constraining plan and regenerate replies to [`MealPlan`].
pub fn meal_plan_schema() -> Value {
    let ingredient = json!({
        "type": "OBJECT",
        "properties": {
            "name": {"type": "STRING"},
            "quantity": {"type": "STRING"},
            "category": {
                "type": "STRING",
                "description": "One of: Produce, Meat, Dairy, Bakery, Frozen, Pantry, Beverages, Household, Other"
            }
        },
        "required": ["name", "quantity", "category"]
    });
    let nutrition = json!({
        "type": "OBJECT",
        "properties": {
            "calories": {"type": "STRING", "description": "e.g. 500 kcal"},
            "protein": {"type": "STRING", "description": "e.g. 25g"},
            "carbs": {"type": "STRING", "description": "e.g. 40g"},
            "fats": {"type": "STRING", "description": "e.g. 15g"}
        },
        "required": ["calories", "protein", "carbs", "fats"]
    });
    let recipe = json!({
        "type": "OBJECT",
        "properties": {
            "id": {"type": "STRING", "description": "A unique random string ID for this recipe"},
            "name": {"type": "STRING"},
            "description": {"type": "STRING", "description": "A short appetizing description"},
            "day": {"type": "INTEGER"},
            "mealType": {"type": "STRING", "enum": ["Breakfast", "Lunch", "Dinner"]},
            "prepTime": {"type": "STRING", "description": "Preparation time (e.g., '15 mins')"},
            "cookTime": {"type": "STRING", "description": "Cooking time (e.g., '30 mins')"},
            "nutrition": nutrition,
            "ingredients": {"type": "ARRAY", "items": ingredient},
            "instructions": {"type": "ARRAY", "items": {"type": "STRING"}}
        },
        "required": [
            "id", "name", "day", "mealType", "ingredients",
            "instructions", "prepTime", "cookTime", "nutrition"
        ]
    });
    json!({
        "type": "OBJECT",
        "properties": {"recipes": {"type": "ARRAY", "items": recipe}},
        "required": ["recipes"]
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn recipe(id: &str, name: &str, day: u32, meal_type: MealType) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            day,
            meal_type,
            prep_time: "10 mins".to_string(),
            cook_time: "20 mins".to_string(),
            nutrition: Nutrition::default(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    #[test]
    fn meal_type_parses_case_insensitively() {
        assert_eq!("dinner".parse::<MealType>().unwrap(), MealType::Dinner);
        assert_eq!(" Breakfast ".parse::<MealType>().unwrap(), MealType::Breakfast);
        assert!("brunch".parse::<MealType>().unwrap_err().is_validation());
    }

    #[test]
    fn plan_reply_uses_camel_case_fields() {
        let plan = MealPlan::from_reply(
            r#"{"recipes": [{
                "id": "r1", "name": "Shakshuka", "day": 2, "mealType": "Breakfast",
                "prepTime": "10 mins", "cookTime": "20 mins",
                "nutrition": {"calories": "400 kcal", "protein": "20g", "carbs": "30g", "fats": "18g"},
                "ingredients": [{"name": "Eggs", "quantity": "4", "category": "Dairy"}],
                "instructions": ["Simmer the sauce.", "Crack in the eggs."]
            }]}"#,
        )
        .unwrap();
        let recipe = &plan.recipes[0];
        assert_eq!(recipe.slot(), (2, MealType::Breakfast));
        assert_eq!(recipe.nutrition.protein, "20g");
        assert_eq!(recipe.ingredients[0].category, "Dairy");
        assert!(recipe.description.is_empty());
    }

    #[test]
    fn blank_reply_is_an_empty_plan() {
        assert!(MealPlan::from_reply("  ").unwrap().recipes.is_empty());
        assert!(MealPlan::from_reply("{}").unwrap().recipes.is_empty());
        assert!(matches!(
            MealPlan::from_reply("not json"),
            Err(Error::Serialization { .. })
        ));
    }

    #[test]
    fn recipes_sort_by_day_then_meal() {
        let mut recipes = vec![
            recipe("a", "Stew", 2, MealType::Dinner),
            recipe("b", "Oats", 2, MealType::Breakfast),
            recipe("c", "Salad", 1, MealType::Lunch),
        ];
        sort_recipes(&mut recipes);
        let ids: Vec<_> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn schema_requires_recipes() {
        let schema = meal_plan_schema();
        assert_eq!(schema["required"], json!(["recipes"]));
        let recipe = &schema["properties"]["recipes"]["items"];
        assert_eq!(
            recipe["properties"]["mealType"]["enum"],
            json!(["Breakfast", "Lunch", "Dinner"])
        );
    }
}
