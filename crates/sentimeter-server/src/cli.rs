use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sentimeter-server")]
#[command(author, version, about = "Sentiment analysis API server")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "sentimeter.yaml")]
    pub config: String,

    /// Database URL, overriding the configured MySQL connection
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server (default)
    Serve {
        /// Listen address
        #[arg(short, long)]
        listen: Option<String>,

        /// Listen port
        #[arg(short = 'P', long)]
        port: Option<u16>,
    },

    /// Create the feedback schema and exit
    InitDb,
}

impl Cli {
    /// The selected subcommand, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            listen: None,
            port: None,
        })
    }
}
