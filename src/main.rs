mod commands;
mod context;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "plancal")]
#[command(about = "Plan posts, meetings and tasks on a month calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the month grid with posts per day
    Month {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Show the week sheet, one row per post
    Sheet {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Show meetings and tasks by day
    Agenda {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Add a post
    Add {
        title: String,

        /// Planned date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Planned time (HH:MM)
        #[arg(short, long)]
        time: Option<String>,

        /// Platforms to publish to (repeatable, defaults to the configured platform)
        #[arg(short, long = "platform")]
        platforms: Vec<String>,
    },
    /// Edit one sheet cell
    Edit {
        /// Day of the cell (YYYY-MM-DD)
        date: String,

        /// Column to edit, e.g. title, date, status, owner
        field: String,

        /// New value; empty clears the field
        value: String,

        /// Post to edit when the day has several
        #[arg(long)]
        post: Option<String>,
    },
    /// Set the platforms of a sheet row
    Platforms {
        /// Day of the row (YYYY-MM-DD)
        date: String,

        /// Platforms to keep or add
        platforms: Vec<String>,

        /// Post to edit when the day has several
        #[arg(long)]
        post: Option<String>,
    },
    /// Show the configuration, or set one key with `config <key> <value>`
    Config {
        /// Key to set, e.g. default_platform, timezone, user
        #[arg(requires = "value")]
        key: Option<String>,

        /// New value; empty resets the key
        value: Option<String>,
    },
    /// Delete a post and its platform targets
    Delete { id: String },
    /// Schedule a meeting
    Meeting {
        title: String,

        /// Meeting date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Start time (HH:MM)
        #[arg(short, long)]
        time: Option<String>,

        /// Length in minutes
        #[arg(long)]
        duration: Option<u32>,

        #[arg(short, long)]
        location: Option<String>,

        /// Attendee email (repeatable)
        #[arg(short, long = "attendee")]
        attendees: Vec<String>,

        /// Agenda item (repeatable)
        #[arg(long = "agenda")]
        agenda: Vec<String>,

        /// Star the meeting
        #[arg(long)]
        important: bool,
    },
    /// Add a task
    Task {
        name: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// low, normal, high or urgent
        #[arg(short, long)]
        priority: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Month { month } => commands::month::run(month.as_deref()).await,
        Commands::Sheet { month } => commands::sheet::run(month.as_deref()).await,
        Commands::Agenda { month } => commands::agenda::run(month.as_deref()).await,
        Commands::Add {
            title,
            date,
            time,
            platforms,
        } => commands::add::run(&title, &date, time.as_deref(), &platforms).await,
        Commands::Edit {
            date,
            field,
            value,
            post,
        } => commands::edit::run(&date, &field, &value, post.as_deref()).await,
        Commands::Platforms {
            date,
            platforms,
            post,
        } => commands::platforms::run(&date, &platforms, post.as_deref()).await,
        Commands::Config { key, value } => commands::config::run(key.as_deref(), value.as_deref()),
        Commands::Delete { id } => commands::delete::run(&id).await,
        Commands::Meeting {
            title,
            date,
            time,
            duration,
            location,
            attendees,
            agenda,
            important,
        } => {
            commands::meeting::run(commands::meeting::MeetingArgs {
                title,
                date,
                time,
                duration,
                location,
                attendees,
                agenda,
                important,
            })
            .await
        }
        Commands::Task {
            name,
            due,
            priority,
        } => commands::task::run(&name, due.as_deref(), priority.as_deref()).await,
    }
}
