//! Interactive chat application for conversing with Gemini.
//!
//! This binary provides a REPL interface for chatting with Gemini models via
//! the `generateContent` API.  Each reply is shown once it is complete.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; the key comes from GEMINI_API_KEY
//! gemchat
//!
//! # Read the key from a YAML secrets file instead
//! gemchat --secrets ~/.config/gemchat/secrets.yaml
//!
//! # Specify a model and system instruction
//! gemchat --model gemini-2.5-flash --system "You are a terse assistant"
//!
//! # Ask for JSON replies that follow a schema
//! gemchat --response-schema answer.yaml
//!
//! # Disable colors (useful for piping output)
//! gemchat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/history` - Show the conversation so far
//! - `/retry` - Re-send a message whose call failed
//! - `/model <name>` - Change the model
//! - `/system [prompt]` - Set or clear the system instruction
//! - `/json [schema-file]` - Ask for JSON replies
//! - `/plan [days]` - Generate a meal plan; `/help` lists the planner commands
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::path::Path;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use gemchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    load_response_schema, parse_command,
};
use gemchat::planner::{GUIDELINE_OPTIONS, MealPlanner, REGENERATE_OPTIONS, Recipe};
use gemchat::{Gemini, Model};

/// Main entry point for the gemchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemchat [OPTIONS]");
    let mut config = ChatConfig::from(args);
    init_logging(config.verbose);
    let use_color = config.use_color;

    let client = match startup(&mut config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("gemchat: {err}");
            std::process::exit(1);
        }
    };
    let mut session = ChatSession::new(client, config);
    let mut planner = MealPlanner::new();
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    println!("Gemini Chat (model: {})", session.model());
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::History => {
                            if session.history().is_empty() {
                                renderer.print_info("(no messages yet)");
                            } else {
                                renderer.print_transcript(session.history().all());
                            }
                        }
                        ChatCommand::Retry => match session.retry().await {
                            Ok(turn) => renderer.print_turn(&turn),
                            Err(e) => renderer.print_error(&e.to_string()),
                        },
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Model(model_name) => {
                            let model = model_name
                                .parse()
                                .unwrap_or_else(|_| Model::Custom(model_name.clone()));
                            session.set_model(model);
                            renderer.print_info(&format!("Model changed to: {}", model_name));
                        }
                        ChatCommand::System(prompt) => {
                            session.set_system_prompt(prompt.clone());
                            match prompt {
                                Some(p) => renderer
                                    .print_info(&format!("System instruction set to: {}", p)),
                                None => renderer.print_info("System instruction cleared."),
                            }
                        }
                        ChatCommand::MaxTokens(value) => {
                            session.set_max_output_tokens(Some(value));
                            renderer.print_info(&format!("max_tokens set to {value}"));
                        }
                        ChatCommand::ClearMaxTokens => {
                            session.set_max_output_tokens(None);
                            renderer.print_info("max_tokens reset to model default");
                        }
                        ChatCommand::JsonOutput(None) => {
                            session.set_json_output(None);
                            renderer.print_info("Replies will be JSON.");
                        }
                        ChatCommand::JsonOutput(Some(path)) => {
                            match load_response_schema(Path::new(&path)) {
                                Ok(schema) => {
                                    session.set_json_output(Some(schema));
                                    renderer.print_info(&format!(
                                        "Replies will be JSON following {path}."
                                    ));
                                }
                                Err(e) => renderer.print_error(&e.to_string()),
                            }
                        }
                        ChatCommand::TextOutput => {
                            session.set_text_output();
                            renderer.print_info("Replies will be plain text.");
                        }
                        ChatCommand::Plan(days) => {
                            if let Some(days) = days {
                                planner.settings_mut().days = days;
                            }
                            renderer.print_info(&format!(
                                "Planning {} day(s) of {}...",
                                planner.settings().days,
                                describe_meals(&planner)
                            ));
                            let planned = planner
                                .generate(session.backend(), session.model())
                                .await
                                .map(|_| ());
                            match planned {
                                Ok(()) => print_recipes(&planner),
                                Err(e) => renderer.print_error(&e.to_string()),
                            }
                        }
                        ChatCommand::Meals(meals) => {
                            planner.settings_mut().set_meals(&meals);
                            renderer
                                .print_info(&format!("Meals per day: {}", describe_meals(&planner)));
                        }
                        ChatCommand::Servings { adults, kids } => {
                            let settings = planner.settings_mut();
                            settings.adults = adults;
                            settings.kids = kids;
                            renderer.print_info(&format!(
                                "Recipes will serve {adults} adult(s) and {kids} kid(s)."
                            ));
                        }
                        ChatCommand::Guideline(None) => print_guidelines(&planner),
                        ChatCommand::Guideline(Some(name)) => {
                            if planner.settings_mut().toggle_guideline(&name) {
                                renderer.print_info(&format!("Guideline on: {name}"));
                            } else {
                                renderer.print_info(&format!("Guideline off: {name}"));
                            }
                        }
                        ChatCommand::Recipes => print_recipes(&planner),
                        ChatCommand::Select(numbers) => {
                            for number in numbers {
                                match planner.toggle_selection(number) {
                                    Ok(true) => renderer.print_info(&format!("Selected #{number}")),
                                    Ok(false) => {
                                        renderer.print_info(&format!("Unselected #{number}"))
                                    }
                                    Err(e) => renderer.print_error(&e.to_string()),
                                }
                            }
                        }
                        ChatCommand::Regenerate { options, custom } => {
                            match planner
                                .regenerate(
                                    session.backend(),
                                    session.model(),
                                    &options,
                                    custom.as_deref(),
                                )
                                .await
                            {
                                Ok(count) => {
                                    renderer.print_info(&format!("Regenerated {count} recipe(s)."));
                                    print_recipes(&planner);
                                }
                                Err(e) => renderer.print_error(&e.to_string()),
                            }
                        }
                        ChatCommand::Shopping => print_shopping(&planner),
                        ChatCommand::Check(name) => {
                            match planner.shopping_mut().toggle(&name) {
                                Some(true) => renderer.print_info(&format!("Checked off {name}")),
                                Some(false) => renderer.print_info(&format!("Back on the list: {name}")),
                                None => renderer.print_error(&format!("No item called {name}")),
                            }
                        }
                        ChatCommand::Buy { name, quantity } => {
                            planner.shopping_mut().add(&name, quantity.as_deref());
                            renderer.print_info(&format!("Added {name} to the shopping list."));
                        }
                        ChatCommand::Keep => {
                            if planner.recipes().is_empty() {
                                renderer.print_error("There is no plan to keep; use /plan first.");
                            } else {
                                let added = planner.keep_plan();
                                renderer.print_info(&format!(
                                    "Kept {added} new recipe(s); duplicates were skipped."
                                ));
                            }
                        }
                        ChatCommand::Cookbook(term) => {
                            print_cookbook(&planner, term.as_deref().unwrap_or(""))
                        }
                        ChatCommand::Star(number) => {
                            match planner.cookbook_mut().toggle_star(number) {
                                Some(true) => renderer.print_info(&format!("Starred #{number}")),
                                Some(false) => renderer.print_info(&format!("Unstarred #{number}")),
                                None => renderer
                                    .print_error(&format!("No cookbook recipe #{number}")),
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&session);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                match session.send(&line).await {
                    Ok(turn) => renderer.print_turn(&turn),
                    Err(e) => renderer.print_error(&e.to_string()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt discards the line
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Resolves the API key, loads the response schema, and builds the client.
fn startup(config: &mut ChatConfig) -> gemchat::Result<Gemini> {
    let api_key = config.api_key()?;
    config.load_response_schema()?;
    Gemini::with_options(Some(api_key), None, Some(config.timeout))
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "gemchat=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Messages: {}", stats.message_count);
    if stats.awaiting_reply {
        println!("      Last message: unanswered (use /retry)");
    }
    println!(
        "      Requests: {} ({} failed)",
        stats.total_requests, stats.failed_requests
    );
    println!(
        "      Total tokens: {} prompt / {} reply",
        stats.total_prompt_tokens, stats.total_reply_tokens
    );
    if let Some(prompt) = stats.last_turn_prompt_tokens {
        let reply = stats.last_turn_reply_tokens.unwrap_or(0);
        println!("      Last turn tokens: {prompt} prompt / {reply} reply");
    }
}

fn print_config(session: &ChatSession) {
    let stats = session.stats();
    println!("    Current Configuration:");
    println!("      Model: {}", stats.model);
    println!(
        "      Max tokens: {}",
        stats
            .max_output_tokens
            .map(|v| v.to_string())
            .unwrap_or_else(|| "default".to_string())
    );
    let output = match (stats.json_output, stats.has_response_schema) {
        (false, _) => "plain text",
        (true, false) => "JSON",
        (true, true) => "JSON with schema",
    };
    println!("      Replies: {output}");
    if let Some(prompt) = stats.system_prompt.as_deref() {
        println!("      System instruction: {}", prompt);
    } else {
        println!("      System instruction: (none)");
    }
}

fn describe_meals(planner: &MealPlanner) -> String {
    planner
        .settings()
        .meals
        .iter()
        .map(|meal| meal.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_guidelines(planner: &MealPlanner) {
    let active = &planner.settings().guidelines;
    println!("    Guidelines (toggle with /guideline <name>):");
    for option in GUIDELINE_OPTIONS {
        let mark = if active.iter().any(|g| g == option) { "x" } else { " " };
        println!("      [{mark}] {option}");
    }
    for custom in active
        .iter()
        .filter(|g| !GUIDELINE_OPTIONS.contains(&g.as_str()))
    {
        println!("      [x] {custom}");
    }
}

fn print_recipes(planner: &MealPlanner) {
    if planner.recipes().is_empty() {
        println!("    (no plan yet; use /plan)");
        return;
    }
    for (index, recipe) in planner.recipes().iter().enumerate() {
        let mark = if planner.is_selected(index) { "*" } else { " " };
        println!(
            "   {mark}{:>2}. Day {} {}: {}",
            index + 1,
            recipe.day,
            recipe.meal_type,
            recipe.name
        );
        print_recipe_details(recipe);
    }
    println!(
        "    Select with /select <n>, then /regen [{}]",
        REGENERATE_OPTIONS.join(", ")
    );
}

fn print_recipe_details(recipe: &Recipe) {
    if !recipe.description.is_empty() {
        println!("        {}", recipe.description);
    }
    println!(
        "        Prep {} / Cook {} / {} / P {} C {} F {}",
        recipe.prep_time,
        recipe.cook_time,
        recipe.nutrition.calories,
        recipe.nutrition.protein,
        recipe.nutrition.carbs,
        recipe.nutrition.fats
    );
    for ingredient in &recipe.ingredients {
        println!("        - {} {}", ingredient.quantity, ingredient.name);
    }
    for (step, instruction) in recipe.instructions.iter().enumerate() {
        println!("        {}. {}", step + 1, instruction);
    }
}

fn print_shopping(planner: &MealPlanner) {
    let shopping = planner.shopping();
    if shopping.is_empty() {
        println!("    (shopping list is empty)");
        return;
    }
    println!("    Shopping list ({} to buy):", shopping.remaining());
    for (category, items) in shopping.by_category() {
        println!("      {category}");
        for item in items {
            println!("        [ ] {} ({})", item.name, item.quantity);
        }
    }
    let checked = shopping.checked();
    if !checked.is_empty() {
        println!("      In the cart");
        for item in checked {
            println!("        [x] {} ({})", item.name, item.quantity);
        }
    }
}

fn print_cookbook(planner: &MealPlanner, term: &str) {
    let entries = planner.cookbook().search(term);
    if entries.is_empty() {
        println!("    (no recipes kept yet; use /keep after /plan)");
        return;
    }
    for entry in entries {
        let star = if entry.starred { "*" } else { " " };
        println!(
            "   {star}#{} {} ({})",
            entry.number, entry.recipe.name, entry.recipe.meal_type
        );
    }
}
