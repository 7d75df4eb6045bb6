//! Health Dome
//!
//! Main entry point: the HTTP service plus a few maintenance commands.

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use healthdome::api::{self, AppState};
use healthdome::config::{self, Config};
use healthdome::db::{schema, Database};
use healthdome::seed::{SeedOptions, SeedPlan};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "healthdome", about = "Hospital bed, patient and medicine backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,
    /// Create any missing tables
    InitSchema,
    /// Fill the tables with random demo rows
    Seed {
        #[arg(long)]
        skip_patients: bool,
        #[arg(long)]
        skip_beds: bool,
        #[arg(long)]
        skip_history: bool,
        #[arg(long)]
        skip_medicines: bool,
        #[arg(long)]
        skip_meditags: bool,
    },
    /// Print every table and its columns
    Describe,
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = config::load_config().context("Failed to load configuration")?;
    let database = Database::connect_lazy(&config.database);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, database).await,
        Commands::InitSchema => {
            let mut conn = database.acquire().await?;
            schema::initialize_schema(&mut *conn)
                .await
                .context("Failed to initialize schema")?;
            Ok(())
        }
        Commands::Seed {
            skip_patients,
            skip_beds,
            skip_history,
            skip_medicines,
            skip_meditags,
        } => {
            let options = SeedOptions {
                patients: !skip_patients,
                beds: !skip_beds,
                history: !skip_history,
                medicines: !skip_medicines,
                meditags: !skip_meditags,
            };
            let plan = SeedPlan::generate(&mut rand::thread_rng(), chrono::Local::now().date_naive());
            let mut conn = database.acquire().await?;
            let results = healthdome::seed::insert_random_data(&mut *conn, &plan, options).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Commands::Describe => {
            let mut conn = database.acquire().await?;
            let tables = schema::describe_tables(&mut *conn).await?;
            println!("{}", serde_json::to_string_pretty(&tables)?);
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn serve(config: Config, database: Database) -> Result<()> {
    let state = web::Data::new(AppState {
        db: database,
        hospital_name: config.hospital.name.clone(),
    });
    let address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting {} on {}", config.hospital.name, address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .configure(api::configure)
    })
    .bind(&address)
    .with_context(|| format!("Failed to bind {}", address))?
    .run()
    .await?;

    Ok(())
}
