//! Clap derive structures for the `uiorch` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// uiorch -- command-line client for UiPath Orchestrator
#[derive(Debug, Parser)]
#[command(
    name = "uiorch",
    version,
    about = "Work with UiPath Orchestrator from the command line",
    long_about = "Inspect and drive a UiPath Orchestrator tenant: jobs, queues, assets,\n\
        robots, processes, folders, and webhooks.\n\n\
        Connection settings come from profiles in the config file; see `uiorch config path`.",
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
    /// Config profile to use
    #[arg(long, short = 'p', env = "UIORCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Orchestrator base URL (overrides profile)
    #[arg(long, env = "UIORCH_URL", global = true)]
    pub url: Option<String>,

    /// Bearer token (skips the profile's auth flow)
    #[arg(long, env = "UIORCH_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Folder id or fully qualified folder path (overrides profile)
    #[arg(long, short = 'f', env = "UIORCH_FOLDER", global = true)]
    pub folder: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UIORCH_OUTPUT",
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
    #[arg(long, short = 'k', env = "UIORCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "UIORCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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
    /// List, inspect, start, and stop jobs
    #[command(alias = "j")]
    Jobs(JobsArgs),

    /// Queue definitions and queue items
    #[command(alias = "q")]
    Queues(QueuesArgs),

    /// Read assets
    Assets(AssetsArgs),

    /// Robots and their sessions
    Robots(RobotsArgs),

    /// Packages in the processes feed
    Processes(ProcessesArgs),

    /// Processes deployed to folders
    Releases(ReleasesArgs),

    /// Folders visible to the caller
    Folders(FoldersArgs),

    /// Webhook subscriptions and delivery verification
    Webhooks(WebhooksArgs),

    /// Check that Orchestrator is reachable
    Status,

    /// Tenant statistics
    Stats(StatsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Paging and OData options shared by list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results (`$top`)
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: u32,

    /// Results to skip (`$skip`)
    #[arg(long, default_value = "0")]
    pub skip: u32,

    /// Raw OData `$filter` expression, and-ed with the command's own filters
    #[arg(long)]
    pub filter: Option<String>,

    /// OData `$orderby`, e.g. "CreationTime desc"
    #[arg(long)]
    pub order_by: Option<String>,

    /// Follow pagination and return every match (ignores --limit)
    #[arg(long, short = 'a')]
    pub all: bool,
}

// ── Jobs ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub command: JobsCommand,
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List jobs (newest first)
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only jobs in this state (Pending, Running, Faulted, ...)
        #[arg(long)]
        state: Option<String>,

        /// Only jobs of this release
        #[arg(long)]
        release: Option<String>,
    },

    /// Show one job
    Get {
        /// Job id
        id: i64,
    },

    /// Start jobs for a release
    Start {
        /// Release name or key (UUID)
        release: String,

        /// Run on these robot ids (Specific strategy)
        #[arg(long = "robot", value_delimiter = ',')]
        robots: Vec<i64>,

        /// Number of jobs to start when no robots are named
        #[arg(long, default_value = "1")]
        count: u32,

        /// Input arguments as a JSON object
        #[arg(long)]
        input: Option<String>,

        /// Input arguments from a JSON file
        #[arg(long, conflicts_with = "input")]
        input_file: Option<PathBuf>,

        /// Job reference
        #[arg(long)]
        reference: Option<String>,
    },

    /// Stop running jobs
    Stop {
        /// Job ids
        #[arg(required = true)]
        ids: Vec<i64>,

        /// Kill instead of requesting a soft stop
        #[arg(long)]
        kill: bool,
    },
}

// ── Queues ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QueuesArgs {
    #[command(subcommand)]
    pub command: QueuesCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueuesCommand {
    /// List queue definitions
    #[command(alias = "ls")]
    List(ListArgs),

    /// List queue items
    Items {
        #[command(flatten)]
        list: ListArgs,

        /// Only items of this queue (by queue definition id)
        #[arg(long)]
        queue_id: Option<i64>,

        /// Only items in this status (New, InProgress, Failed, ...)
        #[arg(long)]
        status: Option<String>,
    },

    /// Add an item to a queue
    Add {
        /// Queue name
        queue: String,

        /// Specific content as a JSON object
        #[arg(long)]
        content: String,

        /// Item reference
        #[arg(long)]
        reference: Option<String>,

        #[arg(long, value_enum, default_value = "normal")]
        priority: PriorityArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Normal,
    High,
}

// ── Assets ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AssetsArgs {
    #[command(subcommand)]
    pub command: AssetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AssetsCommand {
    /// List assets
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one asset by name
    Get {
        /// Asset name
        name: String,
    },
}

// ── Robots ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RobotsArgs {
    #[command(subcommand)]
    pub command: RobotsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RobotsCommand {
    /// List robots
    #[command(alias = "ls")]
    List(ListArgs),

    /// List robot sessions
    Sessions(ListArgs),
}

// ── Processes / Releases / Folders ──────────────────────────────────

#[derive(Debug, Args)]
pub struct ProcessesArgs {
    #[command(subcommand)]
    pub command: ProcessesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProcessesCommand {
    /// List packages
    #[command(alias = "ls")]
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ReleasesArgs {
    #[command(subcommand)]
    pub command: ReleasesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReleasesCommand {
    /// List releases
    #[command(alias = "ls")]
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct FoldersArgs {
    #[command(subcommand)]
    pub command: FoldersCommand,
}

#[derive(Debug, Subcommand)]
pub enum FoldersCommand {
    /// List folders
    #[command(alias = "ls")]
    List(ListArgs),
}

// ── Webhooks ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WebhooksArgs {
    #[command(subcommand)]
    pub command: WebhooksCommand,
}

#[derive(Debug, Subcommand)]
pub enum WebhooksCommand {
    /// List webhooks
    #[command(alias = "ls")]
    List,

    /// Verify a delivery's signature (no connection needed)
    Verify {
        /// Shared webhook secret
        #[arg(long, env = "UIORCH_WEBHOOK_SECRET", hide_env_values = true)]
        secret: String,

        /// Value of the X-UiPath-Signature header
        #[arg(long)]
        signature: String,

        /// File holding the raw request body ("-" for stdin)
        #[arg(default_value = "-")]
        body: PathBuf,
    },
}

// ── Stats ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Entity counts (processes, assets, queues, ...)
    Counts,
    /// Job totals per state
    Jobs,
}

// ── Config ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a profile secret in the system keyring
    SetSecret {
        /// Which secret to store
        #[arg(long, value_enum, default_value = "client-secret")]
        kind: SecretKindArg,

        /// Read the secret from stdin instead of prompting
        #[arg(long)]
        stdin: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SecretKindArg {
    ClientSecret,
    RefreshToken,
    Password,
    Token,
}

// ── Completions ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
