//! The shopping list built from a plan's ingredients.

use std::collections::{BTreeMap, HashSet};

use crate::planner::recipe::Recipe;

/// Category given to items added by hand.
pub const MANUAL_CATEGORY: &str = "Other";

/// One line on the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub quantity: String,
    pub category: String,
    pub checked: bool,
    /// Recipe the item came from; `None` for items added by hand.
    pub source_recipe: Option<String>,
}

/// Ingredients of the current plan plus anything added by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    items: Vec<ShoppingItem>,
}

impl ShoppingList {
    /// Every ingredient of `recipes`, unchecked, tagged with its recipe.
    pub fn from_recipes(recipes: &[Recipe]) -> Self {
        let items = recipes
            .iter()
            .flat_map(|recipe| {
                recipe.ingredients.iter().map(move |ingredient| ShoppingItem {
                    name: ingredient.name.clone(),
                    quantity: ingredient.quantity.clone(),
                    category: ingredient.category.clone(),
                    checked: false,
                    source_recipe: Some(recipe.name.clone()),
                })
            })
            .collect();
        Self { items }
    }

    /// Rebuilds the list from `recipes`, keeping items checked whose name
    /// was checked before.
    pub fn rebuild(&mut self, recipes: &[Recipe]) {
        let checked: HashSet<String> = self
            .items
            .iter()
            .filter(|item| item.checked)
            .map(|item| item.name.to_lowercase())
            .collect();
        let mut rebuilt = Self::from_recipes(recipes);
        for item in &mut rebuilt.items {
            item.checked = checked.contains(&item.name.to_lowercase());
        }
        *self = rebuilt;
    }

    /// Adds an item by hand; the quantity defaults to `1`.
    pub fn add(&mut self, name: &str, quantity: Option<&str>) {
        let quantity = quantity
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or("1");
        self.items.push(ShoppingItem {
            name: name.trim().to_string(),
            quantity: quantity.to_string(),
            category: MANUAL_CATEGORY.to_string(),
            checked: false,
            source_recipe: None,
        });
    }

    /// Flips every item called `name` (ignoring case).  Returns the new
    /// state, or `None` when no item matches.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let name = name.trim();
        let mut state = None;
        for item in &mut self.items {
            if item.name.eq_ignore_ascii_case(name) {
                item.checked = !item.checked;
                state = Some(item.checked);
            }
        }
        state
    }

    /// Unchecked items grouped by category, categories sorted by name.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&ShoppingItem>> {
        let mut groups: BTreeMap<&str, Vec<&ShoppingItem>> = BTreeMap::new();
        for item in self.items.iter().filter(|item| !item.checked) {
            groups.entry(item.category.as_str()).or_default().push(item);
        }
        groups
    }

    /// Items already in the cart.
    pub fn checked(&self) -> Vec<&ShoppingItem> {
        self.items.iter().filter(|item| item.checked).collect()
    }

    /// Number of items still to buy.
    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|item| !item.checked).count()
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
