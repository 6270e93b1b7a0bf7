//! SousChef CLI
//!
//! Command-line interface for the recipe assistant: interactive chat with
//! optional voice, meal planning, nutrition analysis, and recipe
//! generation.

#![allow(clippy::print_stdout)]

mod repl;

use std::sync::Arc;

use application::ports::{ChatBackendPort, RecipeApiPort};
use application::{
    ChatSession, MealPlannerService, NutritionService, PreferencesService,
    RecipeGeneratorService, TranscriptService,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use domain::{MealPlanRequest, RecipeRequest};
use infrastructure::{
    AppConfig, FileCache, RecipeBackendClient, build_speech_adapters, init_tracing,
};
use uuid::Uuid;

/// SousChef CLI
#[derive(Parser)]
#[command(name = "souschef")]
#[command(author, version, about = "SousChef recipe assistant CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Send a single chat message
    Ask {
        /// Message to send
        message: String,
    },

    /// Request a meal plan
    Plan {
        /// Number of days to plan for
        #[arg(short, long, default_value = "7")]
        days: u16,

        /// First day of the plan (YYYY-MM-DD, default today)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Dietary profile (e.g. "vegetarian")
        #[arg(long)]
        diet: Option<String>,

        /// Daily calorie target
        #[arg(long)]
        calories: Option<u32>,

        /// Save the plan locally under this name
        #[arg(short, long)]
        save: Option<String>,
    },

    /// Manage saved meal plans
    Plans {
        #[command(subcommand)]
        command: Option<PlansCommand>,
    },

    /// Analyze the nutrition of an ingredient list
    Nutrition {
        /// Ingredients to analyze
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// Generate a recipe from available ingredients
    Generate {
        /// Available ingredients
        #[arg(required = true)]
        ingredients: Vec<String>,

        /// Desired cuisine
        #[arg(long, default_value = "")]
        cuisine: String,

        /// Meal type (e.g. "Dinner")
        #[arg(long, default_value = "")]
        meal_type: String,

        /// Dietary restrictions
        #[arg(long, default_value = "")]
        dietary: String,

        /// Save the generated recipe to favorites
        #[arg(long)]
        save: bool,
    },

    /// List favorite recipes
    Favorites,

    /// Show or toggle the display theme
    Theme {
        /// Toggle instead of showing
        #[arg(long)]
        toggle: bool,
    },

    /// Check backend and speech service health
    Status,
}

#[derive(Subcommand)]
enum PlansCommand {
    /// List saved plans
    List,
    /// Delete a saved plan
    Delete {
        /// Plan id
        id: Uuid,
    },
    /// Print a grocery list derived from a saved plan
    Grocery {
        /// Plan id
        id: Uuid,
    },
}

const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

struct Services {
    config: AppConfig,
    backend: Arc<RecipeBackendClient>,
    cache: Arc<FileCache>,
}

async fn build_services() -> anyhow::Result<Services> {
    let config = AppConfig::load()?;
    let backend = Arc::new(RecipeBackendClient::new(&config.backend)?);
    let cache = Arc::new(FileCache::open(config.cache.resolve_dir()).await?);
    Ok(Services {
        config,
        backend,
        cache,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(log_filter_from_verbosity(cli.verbose));

    match cli.command {
        Commands::Chat => {
            let services = build_services().await?;
            let transcript =
                Arc::new(TranscriptService::load(Arc::clone(&services.cache) as _).await);
            let (session, events) = ChatSession::new(
                Arc::clone(&services.backend) as _,
                Arc::clone(&transcript),
            );

            let session = match &services.config.speech {
                Some(speech_config) => {
                    let (input, output) = build_speech_adapters(speech_config)?;
                    session.with_speech(input, output)
                },
                None => session,
            };

            repl::run(Arc::new(session), transcript, events).await?;
        },

        Commands::Ask { message } => {
            let services = build_services().await?;
            let transcript =
                Arc::new(TranscriptService::load(Arc::clone(&services.cache) as _).await);
            let (session, _events) = ChatSession::new(Arc::clone(&services.backend) as _, transcript);

            match session.send_message(&message).await? {
                application::SendOutcome::Delivered(reply)
                | application::SendOutcome::Failed(reply) => println!("{}", reply.text),
                application::SendOutcome::Ignored => println!("Nothing to send."),
                application::SendOutcome::Superseded => {},
            }
        },

        Commands::Plan {
            days,
            start_date,
            diet,
            calories,
            save,
        } => {
            let services = build_services().await?;
            let planner = MealPlannerService::new(
                Arc::clone(&services.backend) as _,
                Arc::clone(&services.cache) as _,
            );

            let mut request = MealPlanRequest::new(days);
            if let Some(start_date) = start_date {
                request.start_date = start_date;
            }
            request.diet = diet;
            request.calories = calories;

            let plan = planner.plan(&request).await?;
            println!("{plan}");

            if let Some(name) = save {
                let saved = planner.save_plan(&name, &plan).await?;
                println!("\nSaved as \"{}\" ({})", saved.name, saved.id);
            }
        },

        Commands::Plans { command } => {
            let services = build_services().await?;
            let planner = MealPlannerService::new(
                Arc::clone(&services.backend) as _,
                Arc::clone(&services.cache) as _,
            );

            match command.unwrap_or(PlansCommand::List) {
                PlansCommand::List => {
                    let plans = planner.saved_plans().await;
                    if plans.is_empty() {
                        println!("No saved plans.");
                    }
                    for plan in plans {
                        println!(
                            "{}  {}  (saved {})",
                            plan.id,
                            plan.name,
                            plan.saved_at.format("%Y-%m-%d")
                        );
                    }
                },
                PlansCommand::Delete { id } => {
                    if planner.delete_plan(id).await? {
                        println!("Deleted.");
                    } else {
                        println!("No plan with id {id}.");
                    }
                },
                PlansCommand::Grocery { id } => {
                    let plans = planner.saved_plans().await;
                    match plans.iter().find(|p| p.id == id) {
                        Some(plan) => {
                            for item in MealPlannerService::grocery_list(&plan.content) {
                                println!("- {item}");
                            }
                        },
                        None => println!("No plan with id {id}."),
                    }
                },
            }
        },

        Commands::Nutrition { ingredients } => {
            let services = build_services().await?;
            let nutrition = NutritionService::new(
                Arc::clone(&services.backend) as _,
                Arc::clone(&services.cache) as _,
            );

            let record = nutrition.analyze(ingredients).await?;
            println!("{}", record.analysis);
        },

        Commands::Generate {
            ingredients,
            cuisine,
            meal_type,
            dietary,
            save,
        } => {
            let services = build_services().await?;
            let generator = RecipeGeneratorService::new(
                Arc::clone(&services.backend) as _,
                Arc::clone(&services.cache) as _,
            );

            let request = RecipeRequest {
                ingredients,
                cuisine,
                meal_type,
                dietary_restrictions: dietary,
            };

            let generation = generator.generate(&request).await?;
            println!("{}", generation.rendered);

            if save {
                let recipe = generator.save_last_recipe().await?;
                println!("\nSaved \"{}\" to favorites.", recipe.title);
            }
        },

        Commands::Favorites => {
            let services = build_services().await?;
            let favorites = services.backend.favorites().await?;
            if favorites.is_empty() {
                println!("No favorite recipes yet.");
            }
            for recipe in favorites {
                println!(
                    "{}  [{} | {} | {} min]",
                    recipe.title, recipe.category, recipe.difficulty, recipe.cooking_time
                );
            }
        },

        Commands::Theme { toggle } => {
            let services = build_services().await?;
            let preferences = PreferencesService::new(Arc::clone(&services.cache) as _);

            let theme = if toggle {
                preferences.toggle_theme().await?
            } else {
                preferences.theme().await
            };
            println!("{theme}");
        },

        Commands::Status => {
            let services = build_services().await?;

            let backend_ok = services.backend.is_healthy().await;
            println!(
                "Backend ({}): {}",
                services.config.backend.base_url,
                if backend_ok { "ok" } else { "unreachable" }
            );

            match &services.config.speech {
                Some(_) => println!("Speech: configured"),
                None => println!("Speech: not configured (text-only)"),
            }
        },
    }

    Ok(())
}
