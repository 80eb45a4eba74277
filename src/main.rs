use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hh_vacancies::config::{parse_id_list, Config};
use hh_vacancies::database::pool::create_pool;
use hh_vacancies::presentation::prompt::Prompter;
use hh_vacancies::presentation::report::run_interactive;
use hh_vacancies::services::hh_service::HhClient;
use hh_vacancies::services::ingest_service::IngestService;
use hh_vacancies::services::schema_service::SchemaService;
use hh_vacancies::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hh-vacancies")]
#[command(about = "Collect hh.ru vacancies into PostgreSQL and report on them")]
struct Cli {
    /// Env file with POSTGRES_* and HH_* settings; defaults to ./.env if present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Provision, fetch, store and walk through the interactive report
    Run(RunArgs),
    /// Drop and recreate the database with empty tables
    Provision(TargetArgs),
    /// Fetch vacancies and store them in an already provisioned database
    Ingest(RunArgs),
    /// Interactive report over an already populated database
    Report(RunArgs),
}

#[derive(Debug, Args, Default)]
struct TargetArgs {
    /// Target database name; defaults to POSTGRES_DB
    #[arg(long)]
    database: Option<String>,
}

#[derive(Debug, Args, Default)]
struct RunArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Comma-separated employer ids; defaults to HH_EMPLOYER_IDS
    #[arg(long)]
    employers: Option<String>,

    /// Free-text search passed to hh.ru
    #[arg(long, default_value = "")]
    query: String,
}

impl TargetArgs {
    fn database<'a>(&'a self, config: &'a Config) -> &'a str {
        self.database.as_deref().unwrap_or(&config.database.dbname)
    }
}

impl RunArgs {
    fn employer_ids(&self, config: &Config) -> Vec<String> {
        self.employers
            .as_deref()
            .map(parse_id_list)
            .unwrap_or_else(|| config.employer_ids.clone())
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = Config::load(cli.config.as_deref())?;
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));

    match command {
        Commands::Provision(target) => {
            SchemaService::new(config.database.clone())
                .provision(target.database(&config))
                .await?;
        }
        Commands::Run(args) => {
            let database = args.target.database(&config);
            SchemaService::new(config.database.clone())
                .provision(database)
                .await?;
            let state = AppState::new(create_pool(&config.database, database).await?);
            ingest(&config, &state, &args).await?;
            report(&state, &args.employer_ids(&config)).await?;
            state.close().await;
        }
        Commands::Ingest(args) => {
            let database = args.target.database(&config);
            let state = AppState::new(create_pool(&config.database, database).await?);
            ingest(&config, &state, &args).await?;
            state.close().await;
        }
        Commands::Report(args) => {
            let database = args.target.database(&config);
            let state = AppState::new(create_pool(&config.database, database).await?);
            report(&state, &args.employer_ids(&config)).await?;
            state.close().await;
        }
    }

    Ok(())
}

async fn ingest(config: &Config, state: &AppState, args: &RunArgs) -> anyhow::Result<()> {
    let client = HhClient::new(config.hh.clone())?;
    let service = IngestService::new(client, state.writer.clone());
    let summary = service
        .run(&args.employer_ids(config), &args.query)
        .await?;
    info!(
        inserted = summary.vacancies_inserted,
        duplicates = summary.duplicates_skipped,
        failed = summary.failures.len(),
        "Ingest finished"
    );
    Ok(())
}

async fn report(state: &AppState, employer_ids: &[String]) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    run_interactive(&state.queries, employer_ids, &mut prompter).await?;
    Ok(())
}
