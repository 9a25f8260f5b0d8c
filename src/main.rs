use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use budgetwise::cli::{
    handle_audit, handle_budget_command, handle_export_command, handle_fund_command,
    handle_goal_command, handle_history, handle_insights_command, handle_pay,
    handle_pending_command, Scope,
};
use budgetwise::config::{BudgetwisePaths, Settings, StorageBackend};
use budgetwise::models::{BudgetMonth, UserId};
use budgetwise::storage::Storage;

#[derive(Parser)]
#[command(
    name = "budgetwise",
    version,
    about = "Bundle-based monthly budgeting from the command line",
    long_about = "BudgetWise splits each month's income into bundles and pays from them. \
                  Urgent payments can be made first and assigned to a bundle later; \
                  savings is protected and never spent from."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// User whose ledger to use (defaults to the configured default user)
    #[arg(long, global = true, env = "BUDGETWISE_USER")]
    user: Option<String>,

    /// Budget month: YYYY-MM, "current", "last" or "next"
    #[arg(short, long, global = true, default_value = "current")]
    month: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and data directories
    Init,

    /// Show current configuration and paths
    Config,

    /// Budget management commands
    #[command(subcommand)]
    Budget(budgetwise::cli::BudgetCommands),

    /// Pay from a bundle, or urgently with --urgent
    Pay(budgetwise::cli::PayArgs),

    /// Urgent payments waiting for a bundle
    #[command(subcommand)]
    Pending(budgetwise::cli::PendingCommands),

    /// Show the month's transactions
    History,

    /// Health score, insights and recommendations
    #[command(subcommand)]
    Insights(budgetwise::cli::InsightsCommands),

    /// Savings goals
    #[command(subcommand)]
    Goal(budgetwise::cli::GoalCommands),

    /// Emergency fund
    #[command(subcommand)]
    Fund(budgetwise::cli::FundCommands),

    /// Export a month
    #[command(subcommand)]
    Export(budgetwise::cli::ExportCommands),

    /// Show the user's recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let paths = BudgetwisePaths::new()?;
    let settings = Settings::load(&paths)?;

    match cli.command {
        Commands::Init => return init(&paths, settings),
        Commands::Config => {
            show_config(&paths, &settings);
            return Ok(());
        }
        _ => {}
    }

    let scope = Scope {
        user: UserId::new(cli.user.unwrap_or_else(|| settings.default_user.clone()))?,
        month: BudgetMonth::parse_relative(&cli.month, Local::now().date_naive())?,
    };

    let storage = Storage::open(&paths, &settings)?;
    if storage.is_sample_mode() {
        warn!("no store configured, using in-memory sample data (run 'budgetwise init' to keep changes)");
    }

    match cli.command {
        Commands::Budget(cmd) => handle_budget_command(&storage, &settings, &scope, cmd)?,
        Commands::Pay(args) => handle_pay(&storage, &settings, &scope, args)?,
        Commands::Pending(cmd) => handle_pending_command(&storage, &settings, &scope, cmd)?,
        Commands::History => handle_history(&storage, &settings, &scope)?,
        Commands::Insights(cmd) => handle_insights_command(&storage, &settings, &scope, cmd)?,
        Commands::Goal(cmd) => handle_goal_command(&storage, &settings, &scope, cmd)?,
        Commands::Fund(cmd) => handle_fund_command(&storage, &settings, &scope, cmd)?,
        Commands::Export(cmd) => handle_export_command(&storage, &paths, &scope, cmd)?,
        Commands::Audit { count } => handle_audit(&storage, &scope, count)?,
        Commands::Init | Commands::Config => {}
    }

    Ok(())
}

fn init(paths: &BudgetwisePaths, mut settings: Settings) -> Result<()> {
    if paths.is_initialized() && !settings.is_sample_mode() {
        println!("BudgetWise is already initialized at: {}", paths.base_dir().display());
        return Ok(());
    }

    println!("Initializing BudgetWise at: {}", paths.base_dir().display());
    settings.storage_backend = StorageBackend::Json;
    settings.save(paths)?;

    println!("Initialization complete!");
    println!();
    println!("Create this month's budget with, for example:");
    println!(
        "  budgetwise budget create 45000 --bundle meals=8000 --bundle groceries=6000 \
         --bundle rent=25000 --bundle savings=6000"
    );
    Ok(())
}

fn show_config(paths: &BudgetwisePaths, settings: &Settings) {
    println!("BudgetWise Configuration");
    println!("========================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Data directory:   {}", paths.users_dir().display());
    println!("Audit log:        {}", paths.audit_log().display());
    println!("Export directory: {}", paths.export_dir().display());
    println!();
    println!("Settings:");
    println!("  Storage backend:     {}", settings.storage_backend);
    println!("  Default user:        {}", settings.default_user);
    println!("  Currency symbol:     {}", settings.currency_symbol);
    println!(
        "  Meal cost threshold: {}",
        settings.format_money(settings.meal_cost_threshold)
    );
    println!(
        "  Monthly expenses:    {}",
        settings.format_money(settings.monthly_expense_estimate)
    );
}
