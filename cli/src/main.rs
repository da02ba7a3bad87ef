mod client;
mod display;

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use todo_core::{parse_due_date, NewTodo, Status, TodoPatch};

use client::{ApiClient, DEFAULT_BASE_URL};
use display::{render_table, render_todo};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Command-line client for the todo API", long_about = None)]
struct Cli {
    /// Base URL of the API
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a new todo (prompts for anything not given)
    Create {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// YYYY-MM-DD, today, tomorrow, +3d, fri, ...
        #[arg(long)]
        due: Option<String>,
    },
    /// List all todos
    List,
    /// Show a single todo
    Get { id: String },
    /// Change fields of a todo
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a todo
    Delete { id: String },
    /// List todos with the given status (pending, in_progress, completed)
    Filter { status: Status },
}

fn parse_due(input: &str) -> Result<NaiveDate> {
    parse_due_date(input, Local::now().date_naive())
        .map_err(|e| anyhow!("Invalid due date '{}': {}", input, e))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let api = ApiClient::new(&cli.server);

    match cli.command {
        Commands::Create {
            title,
            description,
            due,
        } => {
            // Interactive mode kicks in when no title was passed.
            let interactive = title.is_none();
            let title = match title {
                Some(t) => t,
                None => prompt("Title")?,
            };
            let description = match description {
                Some(d) => Some(d),
                None if interactive => Some(prompt("Description")?),
                None => None,
            };
            let due = match due {
                Some(d) => Some(d),
                None if interactive => Some(prompt("Due Date (YYYY-MM-DD)")?),
                None => None,
            };

            if title.trim().is_empty() {
                return Err(anyhow!("Title is required"));
            }
            let due_date = due
                .filter(|d| !d.trim().is_empty())
                .map(|d| parse_due(&d))
                .transpose()?;

            let input = NewTodo {
                title,
                description: description.filter(|d| !d.is_empty()),
                due_date,
            };
            let created = api.create(&input)?;
            println!("{}", render_todo(&created));
        }
        Commands::List => {
            let todos = api.list()?;
            println!("{}", render_table(&todos));
        }
        Commands::Get { id } => {
            let todo = api.get(&id)?;
            println!("{}", render_todo(&todo));
        }
        Commands::Update {
            id,
            title,
            description,
            status,
            due,
        } => {
            let patch = TodoPatch {
                title,
                description,
                status,
                due_date: due.as_deref().map(parse_due).transpose()?,
            };
            if patch.is_empty() {
                return Err(anyhow!(
                    "Nothing to update: pass --title, --description, --status or --due"
                ));
            }
            let updated = api.update(&id, &patch)?;
            println!("{}", render_todo(&updated));
        }
        Commands::Delete { id } => {
            api.delete(&id)?;
            println!("Todo deleted successfully");
        }
        Commands::Filter { status } => {
            let todos = api.filter(status)?;
            println!("{}", render_table(&todos));
        }
    }
    Ok(())
}
