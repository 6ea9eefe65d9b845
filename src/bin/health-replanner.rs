// ABOUTME: health-replanner CLI: run the replanning workflow and manage plans, logs, and profiles
// ABOUTME: Prints WorkflowResult or ErrorResponse JSON on stdout; logs go to stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Record a day of activity
//! health-replanner log --user kiit0001 --date 2025-03-01 --calories 2500 --steps 8000 --weight 84.6
//!
//! # Store a profile so targets are personalised
//! health-replanner profile --user kiit0001 --sex male --age 30 --height 175 --weight 85 \
//!     --activity "moderately active" --goal "Lose 10 kg over 12 weeks"
//!
//! # Run the workflow for today (or --date), optionally against synthetic wearable data
//! health-replanner run --user kiit0001 --synthetic
//!
//! # Inspect plans
//! health-replanner show --user kiit0001
//! health-replanner history --user kiit0001
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use pierre_replanner::config::{DatabaseUrl, ReplannerConfig};
use pierre_replanner::database::{Database, HealthRecordSource, PlanRepository};
use pierre_replanner::errors::{AppError, AppResult, ErrorCode, ErrorResponse, StorageError};
use pierre_replanner::llm::create_provider;
use pierre_replanner::logging::LoggingConfig;
use pierre_replanner::models::{ActivityLevel, HealthRecord, Sex, UserProfile};
use pierre_replanner::planning::{LlmPlanningCapability, PlanGenerator};
use pierre_replanner::synthetic::SyntheticHealthRecords;
use pierre_replanner::workflow::ReplanningWorkflow;
use serde::Serialize;
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "health-replanner",
    about = "Pierre autonomous health plan replanner",
    long_about = "Evaluates a user's logged activity against their active plan and generates a new plan version when adherence drifts."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override (defaults to `REPLANNER_DATABASE_URL`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the replanning workflow for a user
    Run {
        /// User id
        #[arg(long)]
        user: String,

        /// Day to evaluate (YYYY-MM-DD, default today in UTC)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Use deterministic synthetic wearable data instead of logged records
        #[arg(long)]
        synthetic: bool,

        /// Base seed for synthetic data
        #[arg(long, default_value = "0", requires = "synthetic")]
        seed: u64,
    },

    /// Show the active plan
    Show {
        /// User id
        #[arg(long)]
        user: String,
    },

    /// List every plan version, oldest first
    History {
        /// User id
        #[arg(long)]
        user: String,
    },

    /// Record a day of intake and activity
    Log {
        /// User id
        #[arg(long)]
        user: String,

        /// Day the record covers (YYYY-MM-DD, default today in UTC)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Calories consumed (kcal)
        #[arg(long)]
        calories: f64,

        /// Steps walked
        #[arg(long)]
        steps: u32,

        /// Body weight (kg)
        #[arg(long)]
        weight: Option<f64>,
    },

    /// Create or replace a user profile
    Profile {
        /// User id
        #[arg(long)]
        user: String,

        /// male or female
        #[arg(long)]
        sex: String,

        /// Age in years
        #[arg(long)]
        age: u32,

        /// Height in centimetres
        #[arg(long)]
        height: f64,

        /// Weight in kilograms
        #[arg(long)]
        weight: f64,

        /// sedentary, lightly active, moderately active, very active
        #[arg(long, default_value = "moderately active")]
        activity: String,

        /// Free-text goal passed to plan generation
        #[arg(long, default_value = "")]
        goal: String,

        /// Explicit daily calorie target, overriding the derived one
        #[arg(long)]
        target: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    if let Err(e) = logging.init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    match execute(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let response = ErrorResponse::from(error);
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("{}: {e}", response.error.message),
            }
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> AppResult<String> {
    let mut config = ReplannerConfig::from_env()?;
    if let Some(url) = &cli.database_url {
        config.database = DatabaseUrl::parse_url(url);
    }

    let database = Database::new(&config.database)
        .await
        .map_err(|e| e.into_app_error(ErrorCode::DataFetchFailed))?;

    match cli.command {
        Command::Run {
            user,
            date,
            synthetic,
            seed,
        } => {
            let provider = create_provider(&config.llm)?;
            let capability = LlmPlanningCapability::from_config(provider, &config.llm);
            let generator =
                PlanGenerator::new(Arc::new(capability), config.workflow.generation_timeout);

            let database = Arc::new(database);
            let records: Arc<dyn HealthRecordSource> = if synthetic {
                Arc::new(SyntheticHealthRecords::new(seed))
            } else {
                database.clone()
            };

            let workflow = ReplanningWorkflow::new(database.clone(), records, generator)
                .with_profiles(database)
                .with_config(config.workflow);

            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            info!(user_id = %user, %date, synthetic, "Starting replanning run");
            to_json(&workflow.run_for_date(&user, date).await?)
        }
        Command::Show { user } => {
            let plan = database
                .get_active_plan(&user)
                .await
                .map_err(|e| e.into_app_error(ErrorCode::DataFetchFailed))?;
            to_json(&json!({ "user_id": user, "plan": plan }))
        }
        Command::History { user } => {
            let plans = database
                .get_history(&user)
                .await
                .map_err(|e| e.into_app_error(ErrorCode::DataFetchFailed))?;
            to_json(&json!({ "user_id": user, "versions": plans.len(), "plans": plans }))
        }
        Command::Log {
            user,
            date,
            calories,
            steps,
            weight,
        } => {
            if !calories.is_finite() || calories < 0.0 {
                return Err(AppError::invalid_input("Calories must be zero or more"));
            }
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let mut record = HealthRecord::new(user, date, calories, steps);
            if let Some(weight) = weight {
                record = record.with_weight(weight);
            }
            database.log_record(&record).await.map_err(|e| {
                let code = match e {
                    StorageError::AlreadyExists { .. } => ErrorCode::InvalidInput,
                    _ => ErrorCode::PersistenceFailed,
                };
                e.into_app_error(code)
            })?;
            to_json(&record)
        }
        Command::Profile {
            user,
            sex,
            age,
            height,
            weight,
            activity,
            goal,
            target,
        } => {
            let sex = Sex::parse(&sex)
                .ok_or_else(|| AppError::invalid_input(format!("Unknown sex: {sex}")))?;
            let profile = UserProfile {
                user_id: user,
                sex,
                age_years: age,
                height_cm: height,
                weight_kg: weight,
                activity_level: ActivityLevel::parse(&activity),
                goal,
                daily_calorie_target: target,
            };
            database
                .upsert_profile(&profile)
                .await
                .map_err(|e| e.into_app_error(ErrorCode::PersistenceFailed))?;
            to_json(&profile)
        }
    }
}

fn to_json(value: &impl Serialize) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
