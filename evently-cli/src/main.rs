mod commands;
mod context;
mod render;
mod utils;
mod when;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::App;

#[derive(Parser)]
#[command(name = "evently")]
#[command(about = "Plan events, invite people and keep up with your calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Profile picture to upload with the account
        #[arg(long)]
        picture: Option<std::path::PathBuf>,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show who is signed in
    Whoami,
    /// List events
    Events {
        /// Show events from this date (YYYY-MM-DD, or "start" for everything before)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only events matching this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one event in detail
    Show { id: String },
    /// Create an event
    New {
        title: Option<String>,

        /// Start date/time (e.g., "tomorrow 3pm", "2025-03-20T15:00")
        #[arg(short, long)]
        start: Option<String>,

        /// End date/time
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Duration (e.g., "30m", "2h")
        #[arg(short, long)]
        duration: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Comma-separated participant emails
        #[arg(short, long)]
        participants: Option<String>,
    },
    /// Edit an event you created
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        participants: Option<String>,
    },
    /// Delete an event you created
    Delete {
        id: String,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move an event you created to a new time
    Move {
        id: String,
        #[arg(short, long)]
        start: String,
        /// New end (defaults to keeping the event's length)
        #[arg(short, long)]
        end: Option<String>,
    },
    /// List event categories
    Categories,
    /// Look up people to invite
    People { query: String },
    /// Show notifications
    Notifications {
        /// Mark a notification as read
        #[arg(long, conflicts_with = "decline")]
        ack: Option<String>,
        /// Decline the invitation to an event
        #[arg(long)]
        decline: Option<String>,
    },
    /// Past events you took part in
    History,
    /// Show or update your profile
    Profile {
        #[arg(long)]
        username: Option<String>,
        /// Prompt for a new password
        #[arg(long)]
        password: bool,
        /// Upload a new profile picture
        #[arg(long)]
        picture: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("EVENTLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::load()?;

    match cli.command {
        Commands::Signup { username, email, picture } => {
            commands::auth::signup(&app, username, email, picture).await
        }
        Commands::Login { email } => commands::auth::login(&app, email).await,
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Whoami => commands::auth::whoami(&app).await,
        Commands::Events { from, to, search } => {
            commands::events::run(&app, from.as_deref(), to.as_deref(), search.as_deref()).await
        }
        Commands::Show { id } => commands::show::run(&app, &id).await,
        Commands::New {
            title,
            start,
            end,
            duration,
            category,
            location,
            description,
            participants,
        } => {
            let form = commands::new::NewArgs {
                title,
                start,
                end,
                duration,
                category,
                location,
                description,
                participants,
            };
            commands::new::run(&app, form).await
        }
        Commands::Edit {
            id,
            title,
            start,
            end,
            category,
            location,
            description,
            participants,
        } => {
            let changes = commands::edit::EditArgs {
                title,
                start,
                end,
                category,
                location,
                description,
                participants,
            };
            commands::edit::run(&app, &id, changes).await
        }
        Commands::Delete { id, yes } => commands::delete::run(&app, &id, yes).await,
        Commands::Move { id, start, end } => {
            commands::reschedule::run(&app, &id, &start, end.as_deref()).await
        }
        Commands::Categories => commands::categories::run(&app).await,
        Commands::People { query } => commands::people::run(&app, &query).await,
        Commands::Notifications { ack, decline } => {
            commands::notifications::run(&app, ack.as_deref(), decline.as_deref()).await
        }
        Commands::History => commands::history::run(&app).await,
        Commands::Profile { username, password, picture } => {
            commands::profile::run(&app, username, password, picture).await
        }
    }
}
