//! Clap derive structures for the `opsdeck` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// opsdeck -- administration console CLI
#[derive(Debug, Parser)]
#[command(
    name = "opsdeck",
    version,
    about = "Manage users, stores, tickets, and project boards from the command line",
    long_about = "A CLI for the opsdeck administration server.\n\n\
        Covers the full admin surface: users, roles, stores, regions,\n\
        support tickets, promotions, and project task boards.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "OPSDECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "OPSDECK_SERVER", global = true)]
    pub server: Option<String>,

    /// Username (overrides profile)
    #[arg(long, short = 'u', env = "OPSDECK_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OPSDECK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "OPSDECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "OPSDECK_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage user accounts
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage permission roles
    Roles(RolesArgs),

    /// Manage store locations
    #[command(alias = "st")]
    Stores(StoresArgs),

    /// Manage sales regions
    Regions(RegionsArgs),

    /// Work support tickets
    #[command(alias = "t")]
    Tickets(TicketsArgs),

    /// Manage promotions
    #[command(alias = "promo")]
    Promotions(PromotionsArgs),

    /// Inspect and edit project boards
    #[command(alias = "proj")]
    Projects(ProjectsArgs),

    /// Show the authenticated principal
    Whoami,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all users
    #[command(alias = "ls")]
    List,

    /// Reset a user's password (one-time password delivered out of band)
    ResetPassword {
        /// User ID or username
        user: String,
    },

    /// Tickets assigned to a user
    Tickets {
        /// User ID or username
        user: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROLES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RolesCommand {
    /// List all roles
    #[command(alias = "ls")]
    List,

    /// Create a role
    Create {
        /// Role name
        name: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Permissions (repeatable)
        #[arg(long = "permission", value_name = "PERM")]
        permissions: Vec<String>,
    },

    /// Update a role
    Update {
        /// Role ID
        id: String,

        /// New role name
        #[arg(long)]
        name: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Permissions (repeatable; replaces the existing set)
        #[arg(long = "permission", value_name = "PERM")]
        permissions: Vec<String>,
    },

    /// Delete a role
    Delete {
        /// Role ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STORES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StoresArgs {
    #[command(subcommand)]
    pub command: StoresCommand,
}

#[derive(Debug, Subcommand)]
pub enum StoresCommand {
    /// List all stores
    #[command(alias = "ls")]
    List,

    /// Create a store
    Create {
        /// Store name
        name: String,

        /// Region ID
        #[arg(long)]
        region: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Create the store disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Update a store
    Update {
        /// Store ID
        id: String,

        /// New store name
        #[arg(long)]
        name: String,

        /// Region ID
        #[arg(long)]
        region: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Enable or disable the store
        #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Delete a store
    Delete {
        /// Store ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REGIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RegionsArgs {
    #[command(subcommand)]
    pub command: RegionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegionsCommand {
    /// List all regions
    #[command(alias = "ls")]
    List,

    /// Create a region
    Create {
        /// Region name
        name: String,

        /// Short code (e.g. "SE")
        #[arg(long)]
        code: Option<String>,
    },

    /// Update a region
    Update {
        /// Region ID
        id: String,

        /// New region name
        #[arg(long)]
        name: String,

        /// Short code
        #[arg(long)]
        code: Option<String>,
    },

    /// Delete a region
    Delete {
        /// Region ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TICKETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List all tickets
    #[command(alias = "ls")]
    List,

    /// Per-status ticket counts
    Summary,

    /// Move a ticket into the repairing state
    Repair {
        /// Ticket ID
        id: String,

        /// Assignee user ID
        #[arg(long)]
        assignee: Option<String>,

        /// Repair notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Mark a ticket completed
    Complete {
        /// Ticket ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROMOTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PromotionsArgs {
    #[command(subcommand)]
    pub command: PromotionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PromotionsCommand {
    /// List all promotions
    #[command(alias = "ls")]
    List,

    /// Create a promotion
    Create {
        /// Promotion title
        title: String,

        /// Body text
        #[arg(long)]
        body: Option<String>,

        /// Start time (RFC 3339)
        #[arg(long)]
        starts: Option<String>,

        /// End time (RFC 3339)
        #[arg(long)]
        ends: Option<String>,

        /// Create the promotion inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Update a promotion
    Update {
        /// Promotion ID
        id: String,

        /// New title
        #[arg(long)]
        title: String,

        /// Body text
        #[arg(long)]
        body: Option<String>,

        /// Start time (RFC 3339)
        #[arg(long)]
        starts: Option<String>,

        /// End time (RFC 3339)
        #[arg(long)]
        ends: Option<String>,

        /// Activate or deactivate
        #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
        active: bool,
    },

    /// Delete a promotion
    Delete {
        /// Promotion ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROJECTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List all projects
    #[command(alias = "ls")]
    List,

    /// Show a project's detail record
    Show {
        /// Project ID
        project: String,
    },

    /// Show a project's board (sections and tasks in order)
    Board {
        /// Project ID
        project: String,
    },

    /// Create a task in a section
    CreateTask {
        /// Project ID
        project: String,

        /// Section ID
        #[arg(long)]
        section: String,

        /// Task name
        name: String,
    },

    /// Rename a task
    RenameTask {
        /// Project ID
        project: String,

        /// Task ID
        task: String,

        /// New name
        name: String,
    },

    /// Set a task's status
    SetStatus {
        /// Project ID
        project: String,

        /// Task ID
        task: String,

        /// New status
        #[arg(value_enum)]
        status: TaskStatusArg,
    },

    /// Delete a task
    DeleteTask {
        /// Project ID
        project: String,

        /// Task ID
        task: String,
    },

    /// Move a task (adjacency-based position)
    MoveTask {
        /// Project ID
        project: String,

        /// Task ID
        task: String,

        /// Destination section ID
        #[arg(long)]
        section: String,

        /// ID of the task that should precede it (omit at the top)
        #[arg(long)]
        before: Option<String>,

        /// ID of the task that should follow it (omit at the bottom)
        #[arg(long)]
        after: Option<String>,
    },

    /// Create a section
    CreateSection {
        /// Project ID
        project: String,

        /// Section name
        name: String,
    },

    /// Rename a section
    RenameSection {
        /// Project ID
        project: String,

        /// Section ID
        section: String,

        /// New name
        name: String,
    },

    /// Move a section (adjacency-based position)
    MoveSection {
        /// Project ID
        project: String,

        /// Section ID
        section: String,

        /// ID of the section that should precede it
        #[arg(long)]
        before: Option<String>,

        /// ID of the section that should follow it
        #[arg(long)]
        after: Option<String>,
    },

    /// Add a subtask to a task
    AddSubtask {
        /// Project ID
        project: String,

        /// Task ID
        task: String,

        /// Subtask name
        name: String,
    },

    /// Toggle a subtask's done flag
    ToggleSubtask {
        /// Project ID
        project: String,

        /// Task ID
        task: String,

        /// Subtask ID
        subtask: String,

        /// Mark done (true) or not done (false)
        #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
        done: bool,
    },

    /// Delete a subtask
    DeleteSubtask {
        /// Project ID
        project: String,

        /// Task ID
        task: String,

        /// Subtask ID
        subtask: String,
    },

    /// List a task's attachments
    Attachments {
        /// Project ID
        project: String,

        /// Task ID
        task: String,
    },

    /// Register an attachment record on a task
    AddAttachment {
        /// Project ID
        project: String,

        /// Task ID
        task: String,

        /// File name
        file_name: String,

        /// Size in bytes
        #[arg(long, default_value = "0")]
        size: u64,
    },

    /// Delete an attachment record
    DeleteAttachment {
        /// Project ID
        project: String,

        /// Task ID
        task: String,

        /// Attachment ID
        attachment: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TaskStatusArg {
    Todo,
    Doing,
    Done,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create or update a profile
    Init,

    /// Show the current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
