use clap::{Parser, Subcommand};
use eyre::{Context, Result, eyre};
use std::io;
use std::path::PathBuf;
use tasklist::{Config, TaskFilter, TaskListController, TaskStore, shell, view};
use tracing::Level;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "tasklist - add, edit, complete and delete to-do items stored in SQLite")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the task database (default: platform data directory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show the completed view instead of the pending one
    #[arg(long, global = true)]
    completed: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a pending task
    Add {
        #[arg(required = true)]
        description: Vec<String>,
    },

    /// Show tasks in the current view
    List {
        /// Show every task regardless of completion
        #[arg(long)]
        all: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Flip a task between pending and completed
    Toggle { id: i64 },

    /// Replace a task's description
    Edit {
        id: i64,
        #[arg(required = true)]
        description: Vec<String>,
    },

    /// Delete one task
    Delete { id: i64 },

    /// Delete every task
    Clear,

    /// Interactive session
    Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config)?;

    let db_path = config.resolve_db_path(cli.db);
    let store =
        TaskStore::open(&db_path).with_context(|| format!("Failed to open task store at {}", db_path.display()))?;

    let mut controller = TaskListController::new(store).context("Failed to load tasks")?;
    controller.filter_tasks(cli.completed || config.show_completed);

    let result = run(&mut controller, cli.command);
    controller.close().context("Failed to close task store")?;
    result
}

fn init_tracing(verbose: bool, config: &Config) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        config.log_level()?.unwrap_or(Level::WARN)
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    Ok(())
}

fn run(controller: &mut TaskListController, command: Commands) -> Result<()> {
    if let Commands::Shell = command {
        let stdin = io::stdin();
        return shell::run(controller, stdin.lock(), &mut io::stdout().lock());
    }

    let updates = controller.subscribe();

    match command {
        Commands::Add { description } => {
            controller.add_task(&description.join(" "))?;
        }
        Commands::List { all, json } => {
            let filter = if all {
                TaskFilter::All
            } else {
                TaskFilter::for_view(controller.show_completed())
            };

            if json {
                println!("{}", view::render_json(controller.tasks(), filter)?);
            } else {
                print!("{}", view::render_filtered(controller.tasks(), filter));
            }
        }
        Commands::Toggle { id } => {
            let task = lookup(controller, id)?;
            controller.toggle_task_completion(&task)?;
        }
        Commands::Edit { id, description } => {
            let task = lookup(controller, id)?;
            controller.edit_task(&task, &description.join(" "))?;
        }
        Commands::Delete { id } => {
            let task = lookup(controller, id)?;
            controller.delete_task(&task)?;
        }
        Commands::Clear => {
            controller.delete_all_tasks()?;
        }
        Commands::Shell => unreachable!("handled above"),
    }

    if let Some(snapshot) = updates.try_iter().last() {
        print!("{}", view::render_view(&snapshot, controller.show_completed()));
    }

    Ok(())
}

fn lookup(controller: &TaskListController, id: i64) -> Result<tasklist::Task> {
    controller.find(id).cloned().ok_or_else(|| eyre!("task {} not found", id))
}
