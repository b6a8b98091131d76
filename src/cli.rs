use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Job portal backend — application status notifications
#[derive(Parser)]
#[command(name = "job-portal", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Apply pending database migrations and exit
    Migrate,

    /// Record a company's review decision on an application
    Review {
        #[arg(long)]
        application_id: Uuid,
        #[arg(long)]
        company_id: Uuid,
        /// ignored, interested, accepted or rejected
        #[arg(long)]
        status: String,
    },
}
