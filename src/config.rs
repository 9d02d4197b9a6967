use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobboard", about = "Job board portal")]
pub struct Config {
    /// MongoDB connection string (kept out of source control)
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: String,

    /// Database name
    #[arg(long, env = "DATABASE_NAME", default_value = "portal_vagas")]
    pub database_name: String,

    /// Ensure search/unique indexes on startup
    #[arg(long, env = "ENSURE_INDEXES", default_value = "true")]
    pub ensure_indexes: bool,

    /// Session lifetime in hours
    #[arg(long, env = "SESSION_TTL_HOURS", default_value = "24")]
    pub session_ttl_hours: i64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the web server (default when no subcommand given)
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,
    },
    /// Drop and recreate the full-text search indexes, then exit
    CreateIndexes,
}

impl Config {
    /// Resolve the command, defaulting to Serve if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}
