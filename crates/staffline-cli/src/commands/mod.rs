//! Subcommands shared by one-shot invocations and the interactive shell.

pub mod alerts;
pub mod auth;
pub mod email;
pub mod matches;
pub mod records;
pub mod shell;

use crate::app::App;
use crate::render;
use anyhow::{Result, bail};
use clap::Subcommand;
use staffline_core::overlay::EntityKind;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in to the ATS
    Login(auth::LoginArgs),

    /// Create an account (does not sign in)
    Signup(auth::SignupArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Also check the token against the server
        #[arg(long)]
        verify: bool,
    },

    /// Summary stats, unread alerts and ending assignments
    Dashboard,

    /// Candidate records
    Candidates {
        #[command(subcommand)]
        action: records::CandidateAction,
    },

    /// Job postings
    Jobs {
        #[command(subcommand)]
        action: records::JobAction,
    },

    /// Assignments
    Assignments {
        #[command(subcommand)]
        action: records::ListAction,
    },

    /// Candidate documents
    Documents {
        #[command(subcommand)]
        action: records::ListAction,
    },

    /// Expenses
    Expenses {
        #[command(subcommand)]
        action: records::ExpenseAction,
    },

    /// Alerts and their read state
    Alerts {
        #[command(subcommand)]
        action: alerts::AlertAction,
    },

    /// Server-computed matches
    Matches {
        #[command(subcommand)]
        action: matches::MatchAction,
    },

    /// Bulk import a CSV or Excel file
    Import {
        /// candidates, jobs, assignments, documents or expenses
        kind: EntityKind,
        file: PathBuf,
    },

    /// Email a candidate about an opportunity
    Email(email::EmailArgs),

    /// Interactive session; unremembered logins and local edits last until exit
    Shell,
}

/// Runs one command against `app`. `Shell` is handled by the caller.
pub async fn run(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Login(args) => auth::login(app, args).await,
        Command::Signup(args) => auth::signup(app, args).await,
        Command::Logout => {
            auth::logout(app);
            Ok(())
        }
        Command::Whoami { verify } => auth::whoami(app, verify).await,
        Command::Dashboard => {
            app.require_login()?;
            let view = app.dashboard.load().await?;
            render::print_dashboard(&view);
            Ok(())
        }
        Command::Candidates { action } => records::candidates(app, action).await,
        Command::Jobs { action } => records::jobs(app, action).await,
        Command::Assignments { action } => {
            records::list(app, EntityKind::Assignment, action).await
        }
        Command::Documents { action } => records::list(app, EntityKind::Document, action).await,
        Command::Expenses { action } => records::expenses(app, action).await,
        Command::Alerts { action } => alerts::run(app, action).await,
        Command::Matches { action } => matches::run(app, action).await,
        Command::Import { kind, file } => {
            app.require_login()?;
            let summary = app.importer.import(kind, &file).await?;
            render::print_import_summary(&summary);
            Ok(())
        }
        Command::Email(args) => email::send(app, args).await,
        Command::Shell => bail!("Already in a shell"),
    }
}
