//! Slash command parsing for the chat application.
//!
//! Anything starting with `/` controls the session or the meal planner and
//! is never sent to the model as a message.

use crate::planner::MealType;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the conversation history.
    Clear,

    /// Print the whole transcript again.
    History,

    /// Re-send the last unanswered message.
    Retry,

    /// Change the model.
    Model(String),

    /// Set or clear the system instruction.
    System(Option<String>),

    /// Cap the tokens per reply.
    MaxTokens(u32),

    /// Let the model pick its own output limit.
    ClearMaxTokens,

    /// Ask for JSON replies, constrained by the schema in the named file if
    /// one is given.
    JsonOutput(Option<String>),

    /// Go back to plain-text replies.
    TextOutput,

    /// Generate a meal plan, optionally for a new number of days.
    Plan(Option<u32>),

    /// Choose the meals planned each day.
    Meals(Vec<MealType>),

    /// Set how many people each recipe serves.
    Servings { adults: u32, kids: u32 },

    /// Toggle a dietary guideline; `None` lists them.
    Guideline(Option<String>),

    /// Show the current plan.
    Recipes,

    /// Toggle recipes (1-based, as listed) for regeneration.
    Select(Vec<usize>),

    /// Regenerate the selected recipes.
    Regenerate {
        options: Vec<String>,
        custom: Option<String>,
    },

    /// Show the shopping list.
    Shopping,

    /// Tick or untick a shopping item.
    Check(String),

    /// Add a shopping item by hand.
    Buy {
        name: String,
        quantity: Option<String>,
    },

    /// Keep the current plan's recipes in the cookbook.
    Keep,

    /// List the cookbook, optionally filtered by name.
    Cookbook(Option<String>),

    /// Toggle the star on a cookbook entry.
    Star(u64),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent as a regular message.
///
/// # Examples
///
/// ```
/// # use gemchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/model gemini-2.5-flash").is_some());
/// assert!(parse_command("Hello, Gemini!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let rest = input.trim().strip_prefix('/')?;

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "history" => ChatCommand::History,
        "retry" => ChatCommand::Retry,
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "system" => ChatCommand::System(argument.map(str::to_string)),
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        "max_tokens" => match argument {
            Some(arg) if arg.eq_ignore_ascii_case("clear") => ChatCommand::ClearMaxTokens,
            _ => match parse_positive(argument, "/max_tokens") {
                Ok(value) => ChatCommand::MaxTokens(value),
                Err(invalid) => invalid,
            },
        },
        "json" => match argument {
            Some(arg) if arg.eq_ignore_ascii_case("off") => ChatCommand::TextOutput,
            _ => ChatCommand::JsonOutput(argument.map(str::to_string)),
        },
        "plan" => match argument {
            None => ChatCommand::Plan(None),
            Some(_) => match parse_positive(argument, "/plan") {
                Ok(days) => ChatCommand::Plan(Some(days)),
                Err(invalid) => invalid,
            },
        },
        "meals" => parse_meals(argument),
        "servings" => parse_servings(argument),
        "guideline" => ChatCommand::Guideline(argument.map(str::to_string)),
        "recipes" => ChatCommand::Recipes,
        "select" => parse_select(argument),
        "regen" => parse_regenerate(argument),
        "shop" => ChatCommand::Shopping,
        "check" => match argument {
            Some(name) => ChatCommand::Check(name.to_string()),
            None => ChatCommand::Invalid("/check requires an item name".to_string()),
        },
        "buy" => parse_buy(argument),
        "keep" => ChatCommand::Keep,
        "cookbook" => ChatCommand::Cookbook(argument.map(str::to_string)),
        "star" => match argument.and_then(|arg| arg.trim_start_matches('#').parse::<u64>().ok()) {
            Some(number) => ChatCommand::Star(number),
            None => ChatCommand::Invalid("/star requires a cookbook number".to_string()),
        },
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_positive(argument: Option<&str>, name: &str) -> Result<u32, ChatCommand> {
    match argument {
        Some(arg) => match arg.parse::<u32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ChatCommand::Invalid(format!(
                "{} expects a positive integer",
                name
            ))),
        },
        None => Err(ChatCommand::Invalid(format!("{} requires a value", name))),
    }
}

fn words(argument: &str) -> impl Iterator<Item = &str> {
    argument
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|w| !w.is_empty())
}

fn parse_meals(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/meals requires breakfast, lunch, and/or dinner".to_string());
    };
    match words(arg).map(str::parse).collect::<Result<Vec<MealType>, _>>() {
        Ok(meals) => ChatCommand::Meals(meals),
        Err(err) => ChatCommand::Invalid(format!("/meals: {err}")),
    }
}

fn parse_servings(argument: Option<&str>) -> ChatCommand {
    let usage = || ChatCommand::Invalid("/servings expects <adults> [kids]".to_string());
    let Some(arg) = argument else {
        return usage();
    };
    let counts: Result<Vec<u32>, _> = words(arg).map(str::parse).collect();
    match counts.as_deref() {
        Ok([adults]) => ChatCommand::Servings {
            adults: *adults,
            kids: 0,
        },
        Ok([adults, kids]) => ChatCommand::Servings {
            adults: *adults,
            kids: *kids,
        },
        _ => usage(),
    }
}

fn parse_select(argument: Option<&str>) -> ChatCommand {
    let usage = || ChatCommand::Invalid("/select expects recipe numbers, e.g. /select 1 3".to_string());
    let Some(arg) = argument else {
        return usage();
    };
    match words(arg).map(str::parse).collect::<Result<Vec<usize>, _>>() {
        Ok(numbers) if !numbers.is_empty() => ChatCommand::Select(numbers),
        _ => usage(),
    }
}

/// `/regen [option, option] [| custom instruction]`
fn parse_regenerate(argument: Option<&str>) -> ChatCommand {
    let (options, custom) = match argument {
        Some(arg) => match arg.split_once('|') {
            Some((options, custom)) => (options, Some(custom.trim())),
            None => (arg, None),
        },
        None => ("", None),
    };
    ChatCommand::Regenerate {
        options: options
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect(),
        custom: custom.filter(|c| !c.is_empty()).map(str::to_string),
    }
}

/// `/buy <item> [| quantity]`
fn parse_buy(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/buy requires an item name".to_string());
    };
    let (name, quantity) = match arg.split_once('|') {
        Some((name, quantity)) => (name.trim(), Some(quantity.trim())),
        None => (arg, None),
    };
    if name.is_empty() {
        return ChatCommand::Invalid("/buy requires an item name".to_string());
    }
    ChatCommand::Buy {
        name: name.to_string(),
        quantity: quantity.filter(|q| !q.is_empty()).map(str::to_string),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Clear conversation history
  /history               Show the whole conversation again
  /retry                 Re-send the last message that got no reply
  /model <name>          Change the model (e.g., /model gemini-2.5-flash)
  /system [prompt]       Set system instruction (no argument clears it)
  /max_tokens <n>        Set maximum response tokens (or 'clear')
  /json [schema-file]    Ask for JSON replies, optionally following a schema
  /json off              Go back to plain-text replies
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat

Meal planner:
  /plan [days]           Generate a meal plan (1-14 days)
  /meals <list>          Meals per day, e.g. /meals breakfast,dinner
  /servings <a> [k]      Adults and kids each recipe serves
  /guideline [name]      Toggle a dietary guideline (no argument lists them)
  /recipes               Show the current plan
  /select <n>...         Mark recipes for regeneration
  /regen [opts] [| txt]  Regenerate marked recipes
  /shop                  Show the shopping list
  /check <item>          Tick or untick a shopping item
  /buy <item> [| qty]    Add an item to the shopping list
  /keep                  Keep the plan's recipes in the cookbook
  /cookbook [search]     List kept recipes, starred first
  /star <n>              Star or unstar a cookbook recipe"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_clear_history_retry() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/CLEAR"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
        assert_eq!(parse_command("/retry"), Some(ChatCommand::Retry));
        assert!(matches!(
            parse_command("/transcript"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn parse_model_and_system() {
        assert_eq!(
            parse_command("/model   gemini-1.5-pro  "),
            Some(ChatCommand::Model("gemini-1.5-pro".to_string()))
        );
        assert_eq!(
            parse_command("/model"),
            Some(ChatCommand::Invalid("/model requires a model name".to_string()))
        );
        assert_eq!(
            parse_command("/system You are a pirate"),
            Some(ChatCommand::System(Some("You are a pirate".to_string())))
        );
        assert_eq!(parse_command("/system"), Some(ChatCommand::System(None)));
    }

    #[test]
    fn parse_max_tokens() {
        assert_eq!(
            parse_command("/max_tokens 256"),
            Some(ChatCommand::MaxTokens(256))
        );
        assert_eq!(
            parse_command("/max_tokens clear"),
            Some(ChatCommand::ClearMaxTokens)
        );
        assert!(matches!(
            parse_command("/max_tokens 0"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("positive")
        ));
    }

    #[test]
    fn parse_json_output() {
        assert_eq!(parse_command("/json"), Some(ChatCommand::JsonOutput(None)));
        assert_eq!(
            parse_command("/json schemas/answer.yaml"),
            Some(ChatCommand::JsonOutput(Some("schemas/answer.yaml".to_string())))
        );
        assert_eq!(parse_command("/json OFF"), Some(ChatCommand::TextOutput));
    }

    #[test]
    fn parse_plan_settings() {
        assert_eq!(parse_command("/plan"), Some(ChatCommand::Plan(None)));
        assert_eq!(parse_command("/plan 7"), Some(ChatCommand::Plan(Some(7))));
        assert!(matches!(
            parse_command("/plan week"),
            Some(ChatCommand::Invalid(_))
        ));
        assert_eq!(
            parse_command("/meals breakfast, Dinner"),
            Some(ChatCommand::Meals(vec![MealType::Breakfast, MealType::Dinner]))
        );
        assert!(matches!(
            parse_command("/meals brunch"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("brunch")
        ));
        assert_eq!(
            parse_command("/servings 2 3"),
            Some(ChatCommand::Servings { adults: 2, kids: 3 })
        );
        assert_eq!(
            parse_command("/servings 4"),
            Some(ChatCommand::Servings { adults: 4, kids: 0 })
        );
        assert!(matches!(
            parse_command("/servings 1 2 3"),
            Some(ChatCommand::Invalid(_))
        ));
        assert_eq!(
            parse_command("/guideline Quick & Easy"),
            Some(ChatCommand::Guideline(Some("Quick & Easy".to_string())))
        );
    }

    #[test]
    fn parse_plan_editing() {
        assert_eq!(
            parse_command("/select 1, 3"),
            Some(ChatCommand::Select(vec![1, 3]))
        );
        assert!(matches!(parse_command("/select"), Some(ChatCommand::Invalid(_))));
        assert_eq!(
            parse_command("/regen"),
            Some(ChatCommand::Regenerate {
                options: Vec::new(),
                custom: None
            })
        );
        assert_eq!(
            parse_command("/regen More protein, Budget friendly | no mushrooms"),
            Some(ChatCommand::Regenerate {
                options: vec!["More protein".to_string(), "Budget friendly".to_string()],
                custom: Some("no mushrooms".to_string())
            })
        );
        assert_eq!(
            parse_command("/regen | surprise me"),
            Some(ChatCommand::Regenerate {
                options: Vec::new(),
                custom: Some("surprise me".to_string())
            })
        );
    }

    #[test]
    fn parse_shopping_and_cookbook() {
        assert_eq!(parse_command("/shop"), Some(ChatCommand::Shopping));
        assert_eq!(
            parse_command("/check Olive oil"),
            Some(ChatCommand::Check("Olive oil".to_string()))
        );
        assert_eq!(
            parse_command("/buy Coffee beans | 500 g"),
            Some(ChatCommand::Buy {
                name: "Coffee beans".to_string(),
                quantity: Some("500 g".to_string())
            })
        );
        assert_eq!(
            parse_command("/buy Milk"),
            Some(ChatCommand::Buy {
                name: "Milk".to_string(),
                quantity: None
            })
        );
        assert!(matches!(parse_command("/buy | 2"), Some(ChatCommand::Invalid(_))));
        assert_eq!(parse_command("/keep"), Some(ChatCommand::Keep));
        assert_eq!(
            parse_command("/cookbook chili"),
            Some(ChatCommand::Cookbook(Some("chili".to_string())))
        );
        assert_eq!(parse_command("/star #4"), Some(ChatCommand::Star(4)));
        assert!(matches!(parse_command("/star"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn parse_stats_and_config() {
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/config"), Some(ChatCommand::ShowConfig));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_command("/temperature 1"),
            Some(ChatCommand::Invalid("Unknown command: /temperature".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, Gemini!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_lists_commands() {
        let help = help_text();
        assert!(help.contains("/quit"));
        assert!(help.contains("/retry"));
        assert!(help.contains("/json"));
        assert!(help.contains("/plan"));
    }
}
