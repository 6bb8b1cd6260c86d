//! Recipes kept from earlier plans during this session.

use std::collections::HashSet;

use crate::planner::prompt::MAX_FAVORITES;
use crate::planner::recipe::{MealType, Recipe};

/// A kept recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookbookEntry {
    /// Session-unique number, increasing in the order recipes were kept.
    pub number: u64,
    pub recipe: Recipe,
    pub starred: bool,
}

/// Recipes kept with `/keep`, searchable and starrable.  Starred recipes
/// are offered back to the model as favourites when a new plan is made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookbook {
    entries: Vec<CookbookEntry>,
    next_number: u64,
}

impl Cookbook {
    /// Keeps every recipe whose name (ignoring case) is not already in the
    /// cookbook.  Returns how many were added.
    pub fn keep(&mut self, recipes: &[Recipe]) -> usize {
        let mut names: HashSet<String> = self
            .entries
            .iter()
            .map(|entry| entry.recipe.name.to_lowercase())
            .collect();
        let mut added = 0;
        for recipe in recipes {
            if !names.insert(recipe.name.to_lowercase()) {
                continue;
            }
            self.next_number += 1;
            self.entries.push(CookbookEntry {
                number: self.next_number,
                recipe: recipe.clone(),
                starred: false,
            });
            added += 1;
        }
        added
    }

    /// Flips the star on entry `number`; `None` if there is no such entry.
    pub fn toggle_star(&mut self, number: u64) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.number == number)?;
        entry.starred = !entry.starred;
        Some(entry.starred)
    }

    /// Entries whose name contains `term` (ignoring case), starred first,
    /// then most recently kept first.
    pub fn search(&self, term: &str) -> Vec<&CookbookEntry> {
        let term = term.trim().to_lowercase();
        let mut found: Vec<&CookbookEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.recipe.name.to_lowercase().contains(&term))
            .collect();
        found.sort_by(|a, b| b.starred.cmp(&a.starred).then(b.number.cmp(&a.number)));
        found
    }

    /// Names of starred recipes served at one of `meals`, at most
    /// [`MAX_FAVORITES`], oldest first.
    pub fn favorites_for(&self, meals: &[MealType]) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.starred && meals.contains(&entry.recipe.meal_type))
            .take(MAX_FAVORITES)
            .map(|entry| entry.recipe.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::recipe::tests::recipe;

    #[test]
    fn keep_skips_names_already_kept() {
        let mut cookbook = Cookbook::default();
        let recipes = vec![
            recipe("a", "Chili", 1, MealType::Dinner),
            recipe("b", "Pancakes", 2, MealType::Breakfast),
        ];
        assert_eq!(cookbook.keep(&recipes), 2);
        assert_eq!(
            cookbook.keep(&[
                recipe("c", "chili", 3, MealType::Dinner),
                recipe("d", "Ramen", 3, MealType::Lunch),
                recipe("e", "RAMEN", 4, MealType::Lunch),
            ]),
            1
        );
        assert_eq!(cookbook.len(), 3);
    }

    #[test]
    fn search_lists_starred_then_newest() {
        let mut cookbook = Cookbook::default();
        cookbook.keep(&[
            recipe("a", "Chili", 1, MealType::Dinner),
            recipe("b", "Chicken Curry", 2, MealType::Dinner),
            recipe("c", "Oats", 3, MealType::Breakfast),
        ]);
        assert_eq!(cookbook.toggle_star(1), Some(true));
        let names: Vec<_> = cookbook
            .search("")
            .iter()
            .map(|e| e.recipe.name.as_str())
            .collect();
        assert_eq!(names, vec!["Chili", "Oats", "Chicken Curry"]);

        let names: Vec<_> = cookbook
            .search("CHI")
            .iter()
            .map(|e| e.recipe.name.as_str())
            .collect();
        assert_eq!(names, vec!["Chili", "Chicken Curry"]);
        assert_eq!(cookbook.toggle_star(99), None);
    }

    #[test]
    fn favorites_match_planned_meals() {
        let mut cookbook = Cookbook::default();
        cookbook.keep(&[
            recipe("a", "Chili", 1, MealType::Dinner),
            recipe("b", "Oats", 1, MealType::Breakfast),
            recipe("c", "Curry", 2, MealType::Dinner),
            recipe("d", "Stew", 3, MealType::Dinner),
            recipe("e", "Pie", 4, MealType::Dinner),
            recipe("f", "Tacos", 5, MealType::Dinner),
        ]);
        for number in 1..=6 {
            cookbook.toggle_star(number);
        }
        cookbook.toggle_star(3);

        assert_eq!(
            cookbook.favorites_for(&[MealType::Dinner]),
            vec!["Chili".to_string(), "Stew".to_string(), "Pie".to_string()]
        );
        assert_eq!(
            cookbook.favorites_for(&[MealType::Breakfast]),
            vec!["Oats".to_string()]
        );
        assert!(cookbook.favorites_for(&[MealType::Lunch]).is_empty());
    }
}
