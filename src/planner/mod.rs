//! Meal planning on top of the chat backend.
//!
//! A plan is one structured `generateContent` call: the prompt describes the
//! days, meals, guidelines, and servings, and the reply is constrained to
//! [`meal_plan_schema`] with a JSON response MIME type.  Selected recipes
//! can be regenerated in place.  The plan feeds a shopping list, and
//! recipes worth keeping go to an in-session cookbook whose starred entries
//! come back as favourites in later plans.
//!
//! Planner calls carry no chat history and no system instruction; they do
//! not touch the conversation.

pub mod cookbook;
pub mod prompt;
pub mod recipe;
pub mod shopping;

pub use cookbook::{Cookbook, CookbookEntry};
pub use prompt::{
    CHEF_MADE, DEFAULT_REGENERATE_OPTION, GUIDELINE_OPTIONS, MAX_PLAN_DAYS, PlanSettings,
    REGENERATE_OPTIONS,
};
pub use recipe::{Ingredient, MealPlan, MealType, Nutrition, Recipe, meal_plan_schema};
pub use shopping::{ShoppingItem, ShoppingList};

use crate::chat::{ChatBackend, ChatRequest};
use crate::error::{Error, Result};
use crate::observability::{PLANNER_PLANS, PLANNER_REGENERATIONS};
use crate::types::{GenerationConfig, Model};

/// The current plan, the recipes picked for regeneration, the shopping list,
/// and the cookbook.
#[derive(Debug, Clone, Default)]
pub struct MealPlanner {
    settings: PlanSettings,
    recipes: Vec<Recipe>,
    selected: Vec<String>,
    shopping: ShoppingList,
    cookbook: Cookbook,
}

impl MealPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &PlanSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PlanSettings {
        &mut self.settings
    }

    /// The current plan, ordered by day and meal.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn shopping(&self) -> &ShoppingList {
        &self.shopping
    }

    pub fn shopping_mut(&mut self) -> &mut ShoppingList {
        &mut self.shopping
    }

    pub fn cookbook(&self) -> &Cookbook {
        &self.cookbook
    }

    pub fn cookbook_mut(&mut self) -> &mut Cookbook {
        &mut self.cookbook
    }

    /// Whether the recipe at `index` (0-based) is marked for regeneration.
    pub fn is_selected(&self, index: usize) -> bool {
        self.recipes
            .get(index)
            .is_some_and(|r| self.selected.contains(&r.id))
    }

    /// Number of recipes marked for regeneration.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Marks or unmarks the recipe at `number` (1-based, as listed) for
    /// regeneration; returns whether it is now selected.
    pub fn toggle_selection(&mut self, number: usize) -> Result<bool> {
        let recipe = number
            .checked_sub(1)
            .and_then(|index| self.recipes.get(index))
            .ok_or_else(|| {
                Error::validation(
                    format!("no recipe #{number} in the current plan"),
                    Some("recipe".to_string()),
                )
            })?;
        if let Some(pos) = self.selected.iter().position(|id| id == &recipe.id) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(recipe.id.clone());
            Ok(true)
        }
    }

    /// Asks the model for a new plan, replacing the current one and its
    /// shopping list.  The current plan is untouched on error.
    pub async fn generate<B: ChatBackend>(&mut self, backend: &B, model: &Model) -> Result<&[Recipe]> {
        self.settings.validate()?;
        let favorites = self.cookbook.favorites_for(&self.settings.meals);
        let request = structured_request(model, prompt::plan_prompt(&self.settings, &favorites));
        tracing::debug!(
            days = self.settings.days,
            favorites = favorites.len(),
            "requesting meal plan"
        );
        let reply = backend.send_message(&request).await?;
        let mut recipes = MealPlan::from_reply(&reply.text)?.recipes;
        recipe::sort_recipes(&mut recipes);
        PLANNER_PLANS.click();

        self.shopping = ShoppingList::from_recipes(&recipes);
        self.recipes = recipes;
        self.selected.clear();
        Ok(&self.recipes)
    }

    /// Replaces the selected recipes with new ones for the same slots.
    ///
    /// `options` defaults to [`DEFAULT_REGENERATE_OPTION`]; `custom` is an
    /// extra free-form instruction.  Checked shopping items stay checked.
    /// Returns the number of recipes the model sent back.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when nothing is selected, or the backend error;
    /// the plan is untouched on error.
    pub async fn regenerate<B: ChatBackend>(
        &mut self,
        backend: &B,
        model: &Model,
        options: &[String],
        custom: Option<&str>,
    ) -> Result<usize> {
        let (to_change, mut kept): (Vec<Recipe>, Vec<Recipe>) = self
            .recipes
            .iter()
            .cloned()
            .partition(|r| self.selected.contains(&r.id));
        if to_change.is_empty() {
            return Err(Error::validation(
                "select recipes to regenerate with /select first",
                Some("recipe".to_string()),
            ));
        }
        let options = if options.is_empty() {
            vec![DEFAULT_REGENERATE_OPTION.to_string()]
        } else {
            options.to_vec()
        };
        let request = structured_request(
            model,
            prompt::regenerate_prompt(&to_change, &options, custom),
        );
        tracing::debug!(recipes = to_change.len(), "requesting replacement recipes");
        let reply = backend.send_message(&request).await?;
        let replacements = MealPlan::from_reply(&reply.text)?.recipes;
        PLANNER_REGENERATIONS.click();

        let count = replacements.len();
        kept.extend(replacements);
        recipe::sort_recipes(&mut kept);
        self.recipes = kept;
        self.selected.clear();
        self.shopping.rebuild(&self.recipes);
        Ok(count)
    }

    /// Keeps the current plan's recipes in the cookbook; returns how many
    /// were new.
    pub fn keep_plan(&mut self) -> usize {
        self.cookbook.keep(&self.recipes)
    }
}

fn structured_request(model: &Model, prompt: String) -> ChatRequest {
    ChatRequest {
        model: model.clone(),
        system_instruction: None,
        history: Vec::new(),
        message: prompt,
        generation_config: GenerationConfig::json(Some(meal_plan_schema())),
    }
}
