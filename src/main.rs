use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod cli;
mod config;
mod error;
mod ui;
mod version;

mod auth;
mod client;
mod inbox;
mod matching;
mod profile;
mod project;
mod rating;
mod resume;
mod store;

#[cfg(test)]
mod tests;

use cli::CliHandler;
use converge_protocol::common::OpportunityKind;
use project::FeedFilter;
use version::CURRENT_VERSION;

#[derive(Parser)]
#[command(
    name = "converge",
    about = "Converge campus collaboration platform CLI",
    long_about = "Converge - find teammates, post projects, rate collaborations

OVERVIEW:
  This tool talks to the Converge platform: browse the opportunity feed,
  post projects, review AI-ranked teammate matches, and answer invites and
  rating requests from your inbox.

WORKFLOW:
  1. Login with your API key
  2. Upload your resume so the matching engine knows you
  3. Post a project and invite your top matches
  4. When a project completes, rate your teammates

QUICK START:
  converge login <API_KEY>              # Authenticate
  converge resume upload cv.pdf         # Extract and upload your resume
  converge post --title ... --skills .. # Post a new project
  converge matches <PROJECT_ID>         # Review ranked candidates
  converge inbox                        # Pending invites and rating requests
  converge status                       # Check authentication and endpoint",
    version = CURRENT_VERSION,
    author = "Converge Team",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Explicit config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the platform endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Login with API key
    Login(LoginArgs),

    /// Logout and revoke the session
    Logout,

    /// Show authentication status
    #[command(aliases = &["st"])]
    Status,

    /// Show a profile (yours by default)
    Profile(ProfileArgs),

    /// Resume upload and download
    Resume(ResumeArgs),

    /// List your projects
    #[command(aliases = &["ls"])]
    Projects,

    /// Browse the public opportunity feed
    Explore(ExploreArgs),

    /// Show full project detail
    Show(ShowArgs),

    /// Post a new opportunity
    Post(PostArgs),

    /// Ranked teammate matches for a project
    Matches(MatchesArgs),

    /// Invite a candidate to a project by email
    Invite(InviteArgs),

    /// Pending invites and rating requests
    Inbox,

    /// Accept a pending invite
    Accept(AcceptArgs),

    /// Answer a rating request
    Rate(RateArgs),

    /// Mark a project completed
    Complete(CompleteArgs),

    /// Show resolved configuration
    #[command(aliases = &["cfg"])]
    Config,
}

#[derive(Args)]
pub struct LoginArgs {
    /// API key; prompted for when omitted
    pub api_key: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    /// Profile id; defaults to your own profile
    pub id: Option<i64>,
}

#[derive(Args)]
pub struct ResumeArgs {
    #[command(subcommand)]
    pub command: ResumeCommand,
}

#[derive(Subcommand)]
pub enum ResumeCommand {
    /// Extract text from a PDF resume and upload it
    Upload {
        /// Path to the PDF file
        file: PathBuf,
    },
    /// Download a resume PDF
    Download {
        /// Profile id; defaults to your own resume
        #[arg(long)]
        id: Option<i64>,

        /// Output file or directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Args)]
pub struct ExploreArgs {
    /// Category filter
    #[arg(short, long, value_enum, default_value = "all")]
    pub filter: FeedFilter,
}

#[derive(Args)]
pub struct ShowArgs {
    pub project_id: i64,
}

/// Opportunity kind as a CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Project,
    Research,
    OpenSource,
}

impl From<KindArg> for OpportunityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Project => OpportunityKind::Project,
            KindArg::Research => OpportunityKind::Research,
            KindArg::OpenSource => OpportunityKind::OpenSource,
        }
    }
}

#[derive(Args)]
pub struct PostArgs {
    #[arg(short, long)]
    pub title: String,

    #[arg(short, long)]
    pub description: String,

    /// Required skills, comma separated
    #[arg(short, long)]
    pub skills: String,

    /// Preferred technologies, comma separated
    #[arg(long, default_value = "")]
    pub tech: String,

    /// Domains, comma separated
    #[arg(long, default_value = "")]
    pub domains: String,

    #[arg(short, long, value_enum, default_value = "project")]
    pub kind: KindArg,

    /// GitHub repository URL
    #[arg(long)]
    pub github: Option<String>,

    /// Hide from the public feed
    #[arg(long)]
    pub private: bool,
}

#[derive(Args)]
pub struct MatchesArgs {
    pub project_id: i64,

    /// Walk the list and send invites interactively
    #[arg(short, long)]
    pub invite: bool,
}

#[derive(Args)]
pub struct InviteArgs {
    pub project_id: i64,
    pub email: String,
}

#[derive(Args)]
pub struct AcceptArgs {
    pub request_id: i64,
}

#[derive(Args)]
pub struct RateArgs {
    pub request_id: i64,
}

#[derive(Args)]
pub struct CompleteArgs {
    pub project_id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("converge={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    let handler = match CliHandler::new(cli.config, cli.endpoint) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = handler.execute(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
