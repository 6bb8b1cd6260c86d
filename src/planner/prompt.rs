//! Plan settings and the prompts sent for plan and regenerate calls.

use serde_json::json;

use crate::error::{Error, Result};
use crate::planner::recipe::{MealType, Recipe};

/// Longest plan that can be requested, in days.
pub const MAX_PLAN_DAYS: u32 = 14;

/// Most starred favourites folded into one plan.
pub const MAX_FAVORITES: usize = 3;

/// Dietary guidelines offered by `/guideline`.
pub const GUIDELINE_OPTIONS: [&str; 11] = [
    "Kid Friendly",
    "Healthy",
    "Vegetarian",
    "Mediterranean",
    "Asian",
    "Mexican",
    "Italian",
    "Quick & Easy",
    "Budget Friendly",
    "Extravagant",
    "No Cook",
];

/// Guideline that asks for restaurant-style recipes.
pub const CHEF_MADE: &str = "Chef Made";

/// Suggested `/regen` instructions.
pub const REGENERATE_OPTIONS: [&str; 7] = [
    "Make more kid friendly",
    "Make it vegetarian",
    "More protein",
    "Different cuisine",
    "Quick and easy",
    "Budget friendly",
    "Surprise me",
];

/// Instruction used by `/regen` when none is given.
pub const DEFAULT_REGENERATE_OPTION: &str = "Different cuisine";

/// What a new meal plan should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSettings {
    pub days: u32,
    /// Meals planned for every day, kept in serving order.
    pub meals: Vec<MealType>,
    pub guidelines: Vec<String>,
    pub adults: u32,
    pub kids: u32,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            days: 5,
            meals: vec![MealType::Dinner],
            guidelines: Vec::new(),
            adults: 2,
            kids: 0,
        }
    }
}

impl PlanSettings {
    /// Checks the settings before a plan call is made.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PLAN_DAYS).contains(&self.days) {
            return Err(Error::validation(
                format!("please choose between 1 and {MAX_PLAN_DAYS} days"),
                Some("days".to_string()),
            ));
        }
        if self.meals.is_empty() {
            return Err(Error::validation(
                "please select at least one meal type",
                Some("meals".to_string()),
            ));
        }
        if self.adults + self.kids == 0 {
            return Err(Error::validation(
                "a plan needs at least one person to feed",
                Some("servings".to_string()),
            ));
        }
        Ok(())
    }

    /// Replaces the planned meals, dropping duplicates.
    pub fn set_meals(&mut self, meals: &[MealType]) {
        let mut meals = meals.to_vec();
        meals.sort();
        meals.dedup();
        self.meals = meals;
    }

    /// Adds the guideline if absent, removes it if present; returns whether
    /// it is now active.  Matching ignores case.
    pub fn toggle_guideline(&mut self, guideline: &str) -> bool {
        let guideline = canonical_guideline(guideline);
        if let Some(pos) = self
            .guidelines
            .iter()
            .position(|g| g.eq_ignore_ascii_case(&guideline))
        {
            self.guidelines.remove(pos);
            false
        } else {
            self.guidelines.push(guideline);
            true
        }
    }

    fn meal_list(&self) -> String {
        self.meals
            .iter()
            .map(MealType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn canonical_guideline(guideline: &str) -> String {
    let guideline = guideline.trim();
    GUIDELINE_OPTIONS
        .iter()
        .chain(std::iter::once(&CHEF_MADE))
        .find(|known| known.eq_ignore_ascii_case(guideline))
        .map(|known| known.to_string())
        .unwrap_or_else(|| guideline.to_string())
}

/// Prompt for a fresh plan; `favorites` are recipe names to include as-is.
pub fn plan_prompt(settings: &PlanSettings, favorites: &[String]) -> String {
    let guidelines = if settings.guidelines.is_empty() {
        "None specified".to_string()
    } else {
        settings.guidelines.join(", ")
    };
    let mut prompt = format!(
        "Generate a meal plan for {} days.\n\
         Include the following meal types for each day: {}.\n\
         Portion each recipe for {} adults and {} children.\n\
         Dietary Guidelines & Preferences: {guidelines}.\n",
        settings.days,
        settings.meal_list(),
        settings.adults,
        settings.kids,
    );
    if settings
        .guidelines
        .iter()
        .any(|g| g.eq_ignore_ascii_case(CHEF_MADE))
    {
        prompt.push_str(
            "For 'Chef Made' recipes, create gourmet, restaurant-quality dishes with detailed \
             steps and comprehensive ingredient lists.\n",
        );
    }
    prompt.push_str(
        "IMPORTANT: Use METRIC units (grams, milliliters, celsius) for all measurements.\n",
    );
    if !favorites.is_empty() {
        prompt.push_str(&format!(
            "You MUST include these {} favorite recipes (or extremely close variations) in the \
             plan: {}. IMPORTANT: For these specific favorite recipes, IGNORE the dietary \
             guidelines provided above and generate them in their traditional/classic style, \
             but adjusted for the requested portion sizes.\n",
            favorites.len(),
            favorites.join(", "),
        ));
    }
    prompt.push_str("Ensure the shopping list categories are accurate.\n");
    prompt.push_str("Provide nutrition facts for every recipe.\n");
    prompt
}

/// Prompt asking for replacements of `to_change`, keeping each one's slot.
pub fn regenerate_prompt(to_change: &[Recipe], options: &[String], custom: Option<&str>) -> String {
    let mut instruction = options.join(", ");
    if let Some(custom) = custom.map(str::trim).filter(|c| !c.is_empty()) {
        instruction.push_str(&format!(". Additional specific instruction: {custom}"));
    }
    let slots = to_change
        .iter()
        .map(|r| json!({"day": r.day, "mealType": r.meal_type, "oldName": r.name}))
        .collect::<Vec<_>>();
    format!(
        "I have a list of recipes. I want to REGENERATE specific recipes based on these \
         instructions: \"{instruction}\".\n\
         IMPORTANT: Use METRIC units (grams, milliliters, celsius) for all measurements.\n\
         Here are the recipes to regenerate (keep the same Day and Meal Type, but change the \
         dish):\n{}\n\
         Please return a valid JSON object containing ONLY the new versions of these specific \
         recipes. Use the same schema as before, including nutrition info.\n",
        serde_json::Value::Array(slots),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::recipe::tests::recipe;

    #[test]
    fn default_settings_plan_five_dinners() {
        let settings = PlanSettings::default();
        assert_eq!(settings.days, 5);
        assert_eq!(settings.meals, vec![MealType::Dinner]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validation_bounds() {
        let mut settings = PlanSettings {
            days: 0,
            ..PlanSettings::default()
        };
        assert!(settings.validate().unwrap_err().is_validation());
        settings.days = MAX_PLAN_DAYS + 1;
        assert!(settings.validate().is_err());
        settings.days = MAX_PLAN_DAYS;
        assert!(settings.validate().is_ok());
        settings.meals.clear();
        assert!(settings.validate().is_err());
        settings.set_meals(&[MealType::Lunch]);
        settings.adults = 0;
        assert!(settings.validate().is_err());
        settings.kids = 1;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn meals_are_ordered_and_unique() {
        let mut settings = PlanSettings::default();
        settings.set_meals(&[MealType::Dinner, MealType::Breakfast, MealType::Dinner]);
        assert_eq!(settings.meals, vec![MealType::Breakfast, MealType::Dinner]);
    }

    #[test]
    fn guidelines_toggle_by_known_name() {
        let mut settings = PlanSettings::default();
        assert!(settings.toggle_guideline("vegetarian"));
        assert_eq!(settings.guidelines, vec!["Vegetarian".to_string()]);
        assert!(!settings.toggle_guideline("VEGETARIAN"));
        assert!(settings.guidelines.is_empty());
        assert!(settings.toggle_guideline("low sodium"));
        assert_eq!(settings.guidelines, vec!["low sodium".to_string()]);
    }

    #[test]
    fn plan_prompt_mentions_settings() {
        let mut settings = PlanSettings {
            days: 3,
            adults: 2,
            kids: 1,
            ..PlanSettings::default()
        };
        settings.set_meals(&[MealType::Breakfast, MealType::Dinner]);
        let prompt = plan_prompt(&settings, &[]);
        assert!(prompt.contains("meal plan for 3 days"));
        assert!(prompt.contains("meal types for each day: Breakfast, Dinner."));
        assert!(prompt.contains("2 adults and 1 children"));
        assert!(prompt.contains("Preferences: None specified."));
        assert!(prompt.contains("METRIC"));
        assert!(!prompt.contains("favorite"));
        assert!(!prompt.contains("gourmet"));
    }

    #[test]
    fn plan_prompt_with_favorites_and_chef_made() {
        let mut settings = PlanSettings::default();
        settings.toggle_guideline("chef made");
        settings.toggle_guideline("Healthy");
        let favorites = vec!["Lasagna".to_string(), "Pad Thai".to_string()];
        let prompt = plan_prompt(&settings, &favorites);
        assert!(prompt.contains("Preferences: Chef Made, Healthy."));
        assert!(prompt.contains("gourmet"));
        assert!(prompt.contains("these 2 favorite recipes"));
        assert!(prompt.contains("Lasagna, Pad Thai"));
    }

    #[test]
    fn regenerate_prompt_lists_slots_and_instructions() {
        let recipes = vec![recipe("r1", "Chili", 1, MealType::Dinner)];
        let prompt = regenerate_prompt(
            &recipes,
            &["More protein".to_string(), "Budget friendly".to_string()],
            Some("no beans"),
        );
        assert!(prompt.contains(
            "\"More protein, Budget friendly. Additional specific instruction: no beans\""
        ));
        assert!(prompt.contains(r#"{"day":1,"mealType":"Dinner","oldName":"Chili"}"#));
    }
}
