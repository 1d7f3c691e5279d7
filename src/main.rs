use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use maeltodo::{Board, Config, Store, TaskList};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "maeltodo")]
#[command(about = "Personal task lists stored in a local SQLite database")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the database file (overrides the config file)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List to act on (default: the first list)
    #[arg(short, long)]
    list: Option<i64>,

    /// Print state as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all lists
    Lists,

    /// Show the tasks of the selected list
    Show,

    /// Create a list and select it
    AddList { name: String },

    /// Rename the selected list
    RenameList { name: String },

    /// Delete the selected list and all of its tasks
    DeleteList,

    /// Add a task to the selected list
    Add { text: String },

    /// Replace the text of a task
    Edit { id: i64, text: String },

    /// Check or uncheck a task
    Toggle { id: i64 },

    /// Check every task, or uncheck them all if none is unchecked
    ToggleAll,

    /// Delete every checked task in the selected list
    ClearChecked,

    /// Delete a task
    Delete { id: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    setup_tracing(&config.log_level);

    let db_path = cli.db.clone().unwrap_or_else(|| config.database.clone());
    let store = Store::open(&db_path)?;
    let mut board = Board::new(store)?;

    if let Some(list_id) = cli.list {
        if !board.select_list(list_id)? {
            return Err(eyre!("List {} not found", list_id));
        }
    }

    let command = cli.command.unwrap_or(Commands::Show);
    if let Commands::Lists = command {
        let lists = board.lists()?;
        return print_lists(&lists, board.current(), cli.json);
    }

    let applied = match command {
        Commands::Lists | Commands::Show => true,
        Commands::AddList { name } => board.add_list(&name)?,
        Commands::RenameList { name } => board.rename_current(&name)?,
        Commands::DeleteList => board.delete_current()?,
        Commands::Add { text } => board.add_task(&text)?,
        Commands::Edit { id, text } => board.edit_task(id, &text)?,
        Commands::Toggle { id } => board.toggle_task(id)?,
        Commands::ToggleAll => board.toggle_all()?,
        Commands::ClearChecked => board.delete_checked()?,
        Commands::Delete { id } => board.delete_task(id)?,
    };

    if !applied && !cli.json {
        eprintln!("{}", "Nothing changed".yellow());
    }

    print_board(&board, cli.json)
}

fn setup_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_lists(lists: &[TaskList], current: &TaskList, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(lists)?);
        return Ok(());
    }

    for list in lists {
        let line = format!("{:>4}  {}", list.id, list.name);
        if list.id == current.id {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

fn print_board(board: &Board, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&board.snapshot())?);
        return Ok(());
    }

    let list = board.current();
    println!("{} {}", list.name.bold(), format!("(#{})", list.id).dimmed());

    if board.items().is_empty() {
        println!("  {}", "No tasks".dimmed());
        return Ok(());
    }

    for item in board.items() {
        if item.is_checked {
            println!("  {} {:>4}  {}", "[x]".green(), item.id, item.text.strikethrough().dimmed());
        } else {
            println!("  [ ] {:>4}  {}", item.id, item.text);
        }
    }
    Ok(())
}
