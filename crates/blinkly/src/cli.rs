//! Clap derive structures for the `blinkly` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Also
//! compiled by `build.rs` for man page generation, so it may only depend
//! on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// blinkly -- command-line client for Blink cameras
#[derive(Debug, Parser)]
#[command(
    name = "blinkly",
    version,
    about = "Watch and control Blink cameras from the command line",
    long_about = "Talks to the Blink cloud on behalf of one account: lists cameras\n\
        and networks, downloads thumbnails and clips, arms and disarms\n\
        networks, and watches for new motion events.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "BLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Account email (overrides profile)
    #[arg(long, short = 'e', env = "BLINK_EMAIL", global = true)]
    pub email: Option<String>,

    /// Network id or name (overrides profile)
    #[arg(long, short = 'n', env = "BLINK_NETWORK", global = true)]
    pub network: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BLINK_OUTPUT",
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

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "BLINK_TIMEOUT", global = true)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Self::On
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect and control cameras
    #[command(alias = "cam", alias = "c")]
    Cameras(CamerasArgs),

    /// List networks
    #[command(alias = "net")]
    Networks(NetworksArgs),

    /// Arm a network (all selected networks if none given)
    Arm(ArmArgs),

    /// Disarm a network (all selected networks if none given)
    Disarm(ArmArgs),

    /// Poll continuously and print motion events
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Cameras ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CamerasArgs {
    #[command(subcommand)]
    pub command: CamerasCommand,
}

#[derive(Debug, Subcommand)]
pub enum CamerasCommand {
    /// List cameras across selected networks
    #[command(alias = "ls")]
    List,

    /// Show one camera's attributes
    #[command(alias = "get")]
    Show {
        /// Camera name
        camera: String,

        /// Fetch the camera's detailed configuration first
        #[arg(long)]
        refresh: bool,
    },

    /// Save the cached thumbnail to a file
    Thumbnail {
        /// Camera name
        camera: String,

        /// Destination file
        #[arg(long, short = 'O', default_value = "thumbnail.jpg")]
        out: PathBuf,
    },

    /// Save the clip for the newest motion event to a file
    Clip {
        /// Camera name
        camera: String,

        /// Destination file
        #[arg(long, short = 'O', default_value = "clip.mp4")]
        out: PathBuf,
    },

    /// Ask a camera to take a new thumbnail
    Snap {
        /// Camera name
        camera: String,
    },

    /// Turn motion detection on or off
    Motion {
        /// Camera name
        camera: String,

        /// Desired state
        state: Toggle,
    },
}

// ── Networks ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List networks on the account
    #[command(alias = "ls")]
    List,
}

// ── Arm / Disarm ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ArmArgs {
    /// Network id or name
    pub network: Option<String>,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between poll cycles (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

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

    /// Store a profile's password in the system keyring
    SetPassword,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
