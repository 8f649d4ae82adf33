//! Clap derive structures for the `nateos` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nateos -- switch configuration from the command line
#[derive(Debug, Parser)]
#[command(
    name = "nateos",
    version,
    about = "Inspect and change NateOS switch configuration",
    long_about = "A console for the NateOS remote configuration API.\n\n\
        Reads layer 2, layer 3 and management settings, and writes changes\n\
        one domain at a time through the same form rules as the dashboard.",
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
    /// Device profile to use
    #[arg(long, short = 'p', env = "NATEOS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "NATEOS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NATEOS_OUTPUT",
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
    #[arg(long, short = 'k', env = "NATEOS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "NATEOS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// Check whether the configuration API is reachable
    Status,

    /// Show the configuration of one or more domains (all by default)
    #[command(alias = "get")]
    Show(ShowArgs),

    /// List the configuration domains this console knows about
    Domains,

    /// Create or update an entry, or update a singleton domain
    Set(SetArgs),

    /// Add an entry (VLANs, static routes)
    #[command(alias = "create")]
    Add(AddArgs),

    /// Delete an entry (VLANs, static routes)
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Dump the device's full running configuration
    Export,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Domain commands ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Domains to show (e.g. vlans, stp, routes)
    pub domains: Vec<String>,
}

#[derive(Debug, Args)]
pub struct FormArgs {
    /// Prompt for every field, pre-filled with the current value
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Domain to change
    pub domain: String,

    /// Optional entry key, then FIELD=VALUE assignments
    #[arg(value_name = "KEY|FIELD=VALUE")]
    pub args: Vec<String>,

    #[command(flatten)]
    pub form: FormArgs,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Domain to add to
    pub domain: String,

    /// FIELD=VALUE assignments
    #[arg(value_name = "FIELD=VALUE")]
    pub assignments: Vec<String>,

    #[command(flatten)]
    pub form: FormArgs,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Domain to delete from
    pub domain: String,

    /// VLAN id or route position
    pub key: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Create or update a profile
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Profile name
    #[arg(long, default_value = "default")]
    pub name: String,

    /// Write without prompting, using --api-url or the built-in default
    #[arg(long)]
    pub non_interactive: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
