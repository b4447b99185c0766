use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "webos")]
#[command(about = "Inspect and sync the WebOS desktop cache from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local cache database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tenant to act for (overrides config and WEBOS_TENANT_ID)
    #[arg(long, global = true, value_name = "ID")]
    pub tenant: Option<String>,

    /// User to act for (overrides config and WEBOS_USER_ID)
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Push queued edits, then pull the server's dataset
    Sync {
        /// Keep syncing on an interval until interrupted
        #[arg(long)]
        watch: bool,
        /// Seconds between cycles in watch mode (defaults to config)
        #[arg(long, value_name = "SECS")]
        interval_secs: Option<u64>,
        /// Output the cycle report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Cached and remote desktop icons
    Icons {
        #[command(subcommand)]
        command: IconCommands,
    },
    /// Icon edits waiting to be pushed
    Pending {
        #[command(subcommand)]
        command: PendingCommands,
    },
    /// Sync preferences of the current scope
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Move an icon into a folder
    Move {
        /// Icon to move
        icon: i64,
        /// Destination folder: category id, or `root` for the desktop
        target: String,
    },
    /// Set an icon's desktop position and queue it for sync
    Position {
        /// Icon to place
        icon: i64,
        x: i64,
        y: i64,
    },
    /// Rename an icon
    Rename {
        icon: i64,
        /// New title
        name: String,
    },
    /// Uninstall an icon and what it points at
    Remove { icon: i64 },
    /// Create a folder
    Folder {
        name: String,
        #[arg(long, default_value_t = 0)]
        x: i64,
        #[arg(long, default_value_t = 0)]
        y: i64,
        /// Parent folder: category id, or `root` for the desktop
        #[arg(long, default_value = "root", value_name = "FOLDER")]
        parent: String,
    },
    /// Create a link icon
    Link {
        title: String,
        /// Address the icon opens
        url: String,
        /// Icon class shown instead of a favicon (e.g. fa-solid fa-globe)
        #[arg(long, value_name = "CLASS")]
        icon_class: Option<String>,
        #[arg(long, default_value_t = 0)]
        x: i64,
        #[arg(long, default_value_t = 0)]
        y: i64,
        /// Parent folder: category id, or `root` for the desktop
        #[arg(long, default_value = "root", value_name = "FOLDER")]
        parent: String,
    },
    /// Tenants the signed-in user belongs to
    Tenants {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or write client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum IconCommands {
    /// List icons from the local cache
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch icons of a folder from the server and refresh the cache
    Fetch {
        /// `root`, a category id, `recent`, or one of image/doc/video/audio
        #[arg(default_value = "root")]
        folder: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PendingCommands {
    /// List queued icon updates
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show stored sync settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change stored sync settings
    Set {
        /// Push queued edits during sync
        #[arg(long, value_name = "BOOL")]
        upload_enabled: Option<bool>,
        /// Conflict strategy sent with pushes (e.g. server_wins)
        #[arg(long, value_name = "NAME")]
        conflict_strategy: Option<String>,
        /// Also publish the change to the server
        #[arg(long)]
        publish: bool,
    },
    /// Adopt the server's copy of the settings
    Pull,
    /// Publish the stored settings to the server
    Push,
    /// Forget the last sync time so the next pull fetches everything
    Reset,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Initialize or update the config file
    Init {
        /// API base URL (e.g. <http://127.0.0.1:8000/api>)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Bearer token sent with every request
        #[arg(long, value_name = "TOKEN")]
        access_token: Option<String>,
        /// Default tenant
        #[arg(long = "default-tenant", value_name = "ID")]
        tenant_id: Option<String>,
        /// Default user
        #[arg(long = "default-user", value_name = "ID")]
        user_id: Option<String>,
        /// HTTP request timeout in seconds
        #[arg(long, value_name = "SECS")]
        request_timeout_secs: Option<u64>,
        /// Seconds between cycles of `sync --watch`
        #[arg(long, value_name = "SECS")]
        sync_interval_secs: Option<u64>,
    },
}
