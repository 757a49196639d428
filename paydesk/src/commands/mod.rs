//! `paydesk` command line
//!
//! Every command stands in for one screen. Protected commands run the route
//! guard for that screen first, then return the text to print.

pub mod auth;
pub mod dashboard;
pub mod department;
pub mod output;
pub mod requests;
pub mod settings;
pub mod users;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shared::AppResult;
use shared::models::{RequestStatus, Role, TemplateType};

use crate::core::{AppConfig, AppContext};
use crate::views::ReviewAction;

use requests::{ListOptions, PdfSource};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "paydesk")]
#[command(author, version, about = "Payment request approvals", long_about = None)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "PAYDESK_API_BASE_URL")]
    pub api_url: Option<String>,

    /// Session storage directory
    #[arg(long, env = "PAYDESK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Also write daily rolling log files here
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Fail instead of serving sample data when the backend is down
    #[arg(long)]
    pub no_fallback: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Flags win over the environment
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        if self.no_fallback {
            config.fallback = false;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        email: String,
        #[arg(long, env = "PAYDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// Menu entries available to your role
    Nav,

    /// Status counts and recent requests
    Dashboard,

    /// Payment requests
    #[command(subcommand)]
    Requests(RequestsCommands),

    /// Department review queue
    #[command(subcommand)]
    Department(DepartmentCommands),

    /// Reports across all requests
    Analytics {
        /// Write analytics-<date>.csv into this directory
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// User administration
    #[command(subcommand)]
    Users(UsersCommands),

    /// System settings
    Settings,
}

#[derive(Subcommand, Debug)]
pub enum RequestsCommands {
    /// List requests
    List {
        #[arg(long)]
        status: Option<RequestStatus>,
        /// Template (`tools`, `link_building`, ...)
        #[arg(long = "type")]
        template: Option<TemplateType>,
        /// Case-insensitive search across every column
        #[arg(short, long)]
        search: Option<String>,
        /// Column key to sort by (`amount`, `date`, ...)
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Show one request
    Show { id: i64 },
    /// Submit a JSON draft file
    Create {
        draft: PathBuf,
        /// Invoice file to upload with the request
        #[arg(long)]
        attach: Option<PathBuf>,
    },
    /// Save a request (or a draft) as PDF
    Pdf {
        #[arg(long, required_unless_present = "draft", conflicts_with = "draft")]
        id: Option<i64>,
        #[arg(long)]
        draft: Option<PathBuf>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum DepartmentCommands {
    /// Pending requests awaiting review
    List,
    Approve {
        id: i64,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    Reject {
        id: i64,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommands {
    List,
    /// Change a user's role (`employee`, `manager`, `finance_manager`, `admin`)
    SetRole { id: i64, role: Role },
}

/// Run one command and return its output
pub async fn run(ctx: &AppContext, command: Commands) -> AppResult<String> {
    match command {
        Commands::Login { email, password } => auth::login(ctx, &email, &password).await,
        Commands::Logout => auth::logout(ctx).await,
        Commands::Whoami => auth::whoami(ctx).await,
        Commands::Nav => auth::nav(ctx),
        Commands::Dashboard => dashboard::dashboard(ctx).await,
        Commands::Requests(cmd) => match cmd {
            RequestsCommands::List {
                status,
                template,
                search,
                sort,
                desc,
            } => {
                let options = ListOptions {
                    status,
                    template,
                    search,
                    sort,
                    descending: desc,
                };
                requests::list(ctx, &options).await
            }
            RequestsCommands::Show { id } => requests::show(ctx, id).await,
            RequestsCommands::Create { draft, attach } => {
                requests::create(ctx, &draft, attach.as_deref()).await
            }
            RequestsCommands::Pdf { id, draft, out } => {
                let source = match (id, draft.as_deref()) {
                    (Some(id), _) => PdfSource::Stored(id),
                    (None, Some(path)) => PdfSource::Draft(path),
                    (None, None) => {
                        return Err(shared::AppError::with_message(
                            shared::ErrorCode::RequiredField,
                            "Pass --id or --draft",
                        ));
                    }
                };
                requests::pdf(ctx, source, &out).await
            }
        },
        Commands::Department(cmd) => match cmd {
            DepartmentCommands::List => department::list(ctx).await,
            DepartmentCommands::Approve { id, comment } => {
                department::review(ctx, id, ReviewAction::Approve, &comment).await
            }
            DepartmentCommands::Reject { id, comment } => {
                department::review(ctx, id, ReviewAction::Reject, &comment).await
            }
        },
        Commands::Analytics { csv } => dashboard::analytics(ctx, csv.as_deref()).await,
        Commands::Users(cmd) => match cmd {
            UsersCommands::List => users::list(ctx).await,
            UsersCommands::SetRole { id, role } => users::set_role(ctx, id, role).await,
        },
        Commands::Settings => settings::show(ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_commands() {
        let cli = Cli::parse_from([
            "paydesk",
            "--no-fallback",
            "requests",
            "list",
            "--status",
            "pending",
            "--type",
            "tools",
            "--sort",
            "amount",
            "--desc",
        ]);
        assert!(cli.no_fallback);
        match cli.command {
            Commands::Requests(RequestsCommands::List {
                status,
                template,
                sort,
                desc,
                ..
            }) => {
                assert_eq!(status, Some(RequestStatus::Pending));
                assert_eq!(template, Some(TemplateType::Tools));
                assert_eq!(sort.as_deref(), Some("amount"));
                assert!(desc);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_create_with_attachment() {
        let cli = Cli::parse_from(["paydesk", "requests", "create", "draft.json", "--attach", "inv.pdf"]);
        match cli.command {
            Commands::Requests(RequestsCommands::Create { draft, attach }) => {
                assert_eq!(draft, PathBuf::from("draft.json"));
                assert_eq!(attach, Some(PathBuf::from("inv.pdf")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        assert!(Cli::try_parse_from(["paydesk", "users", "set-role", "2", "owner"]).is_err());
        let cli = Cli::try_parse_from(["paydesk", "users", "set-role", "2", "finance_manager"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Users(UsersCommands::SetRole { id: 2, role: Role::FinanceManager })
        ));
    }

    #[test]
    fn test_pdf_needs_a_source() {
        assert!(Cli::try_parse_from(["paydesk", "requests", "pdf"]).is_err());
        assert!(Cli::try_parse_from(["paydesk", "requests", "pdf", "--id", "2"]).is_ok());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "paydesk",
            "--api-url",
            "http://api.test",
            "--log-level",
            "debug",
            "--no-fallback",
            "nav",
        ]);
        let mut config = AppConfig::from_vars();
        cli.apply(&mut config);
        assert_eq!(config.api_base_url, "http://api.test");
        assert_eq!(config.log_level, "debug");
        assert!(!config.fallback);
    }
}
