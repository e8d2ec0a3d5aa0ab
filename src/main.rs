//! # project-tracker
//!
//! A terminal project tracker: users own projects, projects hold tasks.
//! Everything is kept in two JSON files and every command rewrites the
//! collection it touches.
//!
//! ## Usage
//!
//! ```bash
//! project-tracker add-user --name Alex --email alex@example.com
//! project-tracker add-project --user Alex --title "CLI Tool" --due 2025-12-01
//! project-tracker add-task --project "CLI Tool" --title "Implement add-task" --assignee Alex
//! project-tracker list-tasks --project "CLI Tool"
//! project-tracker complete-task --id <TASK ID>
//! project-tracker set-status --id <TASK ID> --status in_progress
//! ```
//!
//! Run without a subcommand (or with `ui`) for the interactive view.
//!
//! ## Data Storage
//!
//! `users.json` and `projects.json` live in your local data directory:
//! *   Linux: `~/.local/share/project-tracker/`
//! *   macOS: `~/Library/Application Support/project-tracker/`
//! *   Windows: `%LOCALAPPDATA%\project-tracker\`
//!
//! Override it with `--data-dir` or the `PROJECT_TRACKER_DATA_DIR` environment
//! variable. The files are not locked: running two commands at once can lose
//! one of the writes.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use env_logger::Env;

use project_tracker::commands::*;
use project_tracker::config::Config;
use project_tracker::error::CommandError;
use project_tracker::output;
use project_tracker::storage::Store;
use project_tracker::tui::run_tui;

#[derive(Parser)]
#[command(name = "project-tracker")]
#[command(about = "Command-line Project Management Tool", long_about = None)]
struct Cli {
    /// Directory holding users.json and projects.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user
    AddUser {
        /// User's name
        #[arg(long)]
        name: String,
        /// User's email address (optional)
        #[arg(long)]
        email: Option<String>,
    },
    /// List users
    ListUsers,
    /// Create a project for a user
    AddProject {
        /// Owner user's name
        #[arg(long)]
        user: String,
        /// Project title
        #[arg(long)]
        title: String,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
        /// Due date, YYYY-MM-DD or an ISO date-time
        #[arg(long)]
        due: Option<String>,
    },
    /// List projects (optionally filter by user)
    ListProjects {
        /// Filter by owner user's name
        #[arg(long)]
        user: Option<String>,
    },
    /// Add a task to a project
    AddTask {
        /// Project title
        #[arg(long)]
        project: String,
        /// Task title
        #[arg(long)]
        title: String,
        /// Name of the user to assign
        #[arg(long)]
        assignee: Option<String>,
    },
    /// List tasks (optionally filter by project)
    ListTasks {
        /// Filter by project title
        #[arg(long)]
        project: Option<String>,
    },
    /// Mark a task as completed by its ID
    CompleteTask {
        /// Task ID
        #[arg(long)]
        id: String,
    },
    /// Move a task back to todo by its ID
    ReopenTask {
        /// Task ID
        #[arg(long)]
        id: String,
    },
    /// Set a task's status (todo, in_progress, done)
    SetStatus {
        /// Task ID
        #[arg(long)]
        id: String,
        /// New status
        #[arg(long)]
        status: String,
    },
    /// Assign a task to a user, or clear the assignee
    AssignTask {
        /// Task ID
        #[arg(long)]
        id: String,
        /// User's name; omit to unassign
        #[arg(long)]
        user: Option<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), CommandError> {
    let store = Store::new(&Config::resolve(cli.data_dir));
    log::debug!("using store {}", store.users_path().display());

    match cli.command {
        Some(Commands::AddUser { name, email }) => {
            cmd_add_user(&store, &name, email.as_deref(), false).map(|_| ())
        }
        Some(Commands::ListUsers) => cmd_list_users(&store),
        Some(Commands::AddProject { user, title, description, due }) => {
            cmd_add_project(&store, &user, &title, description.as_deref(), due.as_deref(), false)
        }
        Some(Commands::ListProjects { user }) => cmd_list_projects(&store, user.as_deref()),
        Some(Commands::AddTask { project, title, assignee }) => {
            cmd_add_task(&store, &project, &title, assignee.as_deref(), false)
        }
        Some(Commands::ListTasks { project }) => cmd_list_tasks(&store, project.as_deref()),
        Some(Commands::CompleteTask { id }) => cmd_complete_task(&store, &id, false),
        Some(Commands::ReopenTask { id }) => cmd_reopen_task(&store, &id, false),
        Some(Commands::SetStatus { id, status }) => cmd_set_status(&store, &id, &status, false),
        Some(Commands::AssignTask { id, user }) => cmd_assign_task(&store, &id, user.as_deref(), false),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "project-tracker", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui) | None => run_tui(store),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
