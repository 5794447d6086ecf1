use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pdash",
    about = "Project dashboard: grouped projects, kept in order",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding settings.json, global_state.json and config.toml
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the group tree
    List(ListArgs),
    /// Look up a project and its group
    Find(FindArgs),
    /// Create a group
    AddGroup(AddGroupArgs),
    /// Add a project to a group
    AddProject(AddProjectArgs),
    /// Change a project's fields
    UpdateProject(UpdateProjectArgs),
    /// Change a group's fields
    UpdateGroup(UpdateGroupArgs),
    /// Remove a project from a root group
    RemoveProject(RemoveProjectArgs),
    /// Remove a group at any depth
    RemoveGroup(RemoveGroupArgs),
    /// Apply a reordered-projects message from a file
    Reorder(ReorderArgs),
    /// Move data between backends
    Migrate(MigrateArgs),
    /// Show backend state
    Status(StatusArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Print stored data without repairing it
    #[arg(long)]
    pub raw: bool,
    /// Print projects as one flat list
    #[arg(long)]
    pub flat: bool,
}

#[derive(Args)]
pub struct FindArgs {
    pub id: String,
}

#[derive(Args)]
pub struct AddGroupArgs {
    pub name: Option<String>,
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct AddProjectArgs {
    pub name: String,
    pub path: String,
    #[arg(short, long)]
    pub group: Option<String>,
    #[arg(short, long)]
    pub color: Option<String>,
    #[arg(long)]
    pub git: bool,
}

#[derive(Args)]
pub struct UpdateProjectArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub path: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct UpdateGroupArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub collapsed: Option<bool>,
}

#[derive(Args)]
pub struct RemoveProjectArgs {
    pub id: String,
}

#[derive(Args)]
pub struct RemoveGroupArgs {
    pub id: String,
    #[arg(long)]
    pub only_if_empty: bool,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// JSON file holding the message
    pub message: PathBuf,
}

#[derive(Args)]
pub struct MigrateArgs {}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct ConfigArgs {}
