//! Clap derive structures for the `wishstore` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wishstore -- manage wishlists and wishes from the command line
#[derive(Debug, Parser)]
#[command(
    name = "wishstore",
    version,
    about = "Manage wishlists and wishes on a wishstore server",
    long_about = "A command-line client for wishstore servers.\n\n\
        Lists, inspects, creates, updates and deletes wishlists and wishes\n\
        through the same navigation states the interactive client uses.",
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
    #[arg(long, short = 'p', env = "WISHSTORE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 'u', env = "WISHSTORE_URL", global = true)]
    pub url: Option<String>,

    /// Pre-issued JWT (overrides profile credentials)
    #[arg(long, env = "WISHSTORE_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Username for password sign-in (overrides profile)
    #[arg(long, env = "WISHSTORE_USERNAME", global = true)]
    pub username: Option<String>,

    /// Application name used in alert headers and events
    #[arg(long, env = "WISHSTORE_APP_NAME", global = true)]
    pub app_name: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WISHSTORE_OUTPUT",
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
    #[arg(long, short = 'k', env = "WISHSTORE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "WISHSTORE_TIMEOUT", global = true)]
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
    /// Manage wishlists
    #[command(alias = "wl")]
    Wishlists(WishlistsArgs),

    /// Manage wishes
    #[command(alias = "w")]
    Wishes(WishesArgs),

    /// List users (wishlist owners)
    Users(UsersArgs),

    /// Inspect navigation states and deep links
    Routes(RoutesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared paging arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Zero-based page number
    #[arg(long, default_value = "0")]
    pub page: u32,

    /// Results per page
    #[arg(long, short = 'l', default_value = "20")]
    pub size: u32,

    /// Sort order as `property,asc|desc` (repeatable)
    #[arg(long, short = 's', default_value = "id,asc")]
    pub sort: Vec<String>,

    /// Fetch all pages automatically
    #[arg(long, short = 'a')]
    pub all: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WISHLISTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WishlistsArgs {
    #[command(subcommand)]
    pub command: WishlistsCommand,
}

#[derive(Debug, Subcommand)]
pub enum WishlistsCommand {
    /// List wishlists
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one wishlist
    Get {
        /// Wishlist ID
        id: i64,
    },

    /// Create a wishlist
    Create {
        /// Wishlist name
        #[arg(long)]
        name: String,

        /// Creation date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        creation_date: Option<String>,

        /// Hide the wishlist from other users
        #[arg(long)]
        hidden: bool,

        /// Owning user ID
        #[arg(long, value_name = "USER_ID")]
        owner: Option<i64>,
    },

    /// Update a wishlist
    Update {
        /// Wishlist ID
        id: i64,

        #[arg(long)]
        name: Option<String>,

        /// Creation date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        creation_date: Option<String>,

        #[arg(long, action = clap::ArgAction::Set)]
        hidden: Option<bool>,

        /// Owning user ID
        #[arg(long, value_name = "USER_ID", conflicts_with = "clear_owner")]
        owner: Option<i64>,

        /// Remove the owning user
        #[arg(long)]
        clear_owner: bool,
    },

    /// Delete a wishlist
    #[command(alias = "rm")]
    Delete {
        /// Wishlist ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WISHES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WishesArgs {
    #[command(subcommand)]
    pub command: WishesCommand,
}

#[derive(Debug, Subcommand)]
pub enum WishesCommand {
    /// List wishes
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one wish
    Get {
        /// Wish ID
        id: i64,
    },

    /// Create a wish
    Create {
        /// Product ID
        #[arg(long)]
        product_id: i64,

        /// Price (non-negative)
        #[arg(long)]
        price: f64,

        /// Wishlist ID the wish belongs to
        #[arg(long, value_name = "WISHLIST_ID")]
        wishlist: Option<i64>,
    },

    /// Update a wish
    Update {
        /// Wish ID
        id: i64,

        #[arg(long)]
        product_id: Option<i64>,

        #[arg(long)]
        price: Option<f64>,

        /// Wishlist ID the wish belongs to
        #[arg(long, value_name = "WISHLIST_ID", conflicts_with = "clear_wishlist")]
        wishlist: Option<i64>,

        /// Detach the wish from its wishlist
        #[arg(long)]
        clear_wishlist: bool,
    },

    /// Delete a wish
    #[command(alias = "rm")]
    Delete {
        /// Wish ID
        id: i64,
    },
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
    /// List users
    #[command(alias = "ls")]
    List(ListArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROUTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RoutesArgs {
    #[command(subcommand)]
    pub command: RoutesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// List every navigation state
    #[command(alias = "ls")]
    List,

    /// Resolve a deep link to its state
    Match {
        /// URL path, e.g. /wishlist/3/edit
        url: String,
    },

    /// Build the URL of a state
    Href {
        /// State name, e.g. wishlist.edit
        state: String,

        /// Entity ID for states that need one
        #[arg(long)]
        id: Option<i64>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
