use crate::app::App;
use crate::render;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use staffline_core::overlay::EntityKind;

#[derive(Subcommand, Debug)]
pub enum MatchAction {
    /// Candidates for a job
    Job {
        id: String,
        #[arg(long)]
        min_score: Option<u32>,
    },
    /// Jobs for a candidate
    Candidate {
        id: String,
        #[arg(long)]
        min_score: Option<u32>,
    },
    /// Ending assignments with replacement candidates
    Ending {
        #[arg(long)]
        days: Option<u32>,
    },
}

pub async fn run(app: &mut App, action: MatchAction) -> Result<()> {
    app.require_login()?;
    let matching = &app.matching;
    match action {
        MatchAction::Job { id, min_score } => {
            let matches = matching.for_job(&id, min_score).await?;
            render::print_records(EntityKind::Match, &matches, |_| false);
        }
        MatchAction::Candidate { id, min_score } => {
            let matches = matching.for_candidate(&id, min_score).await?;
            render::print_records(EntityKind::Match, &matches, |_| false);
        }
        MatchAction::Ending { days } => {
            let ending = matching.ending_assignments(days).await?;
            if ending.is_empty() {
                println!("{}", "No assignments ending soon.".bright_black());
            }
            for item in &ending {
                println!("{}", render::ending_assignment_row(item));
            }
        }
    }
    Ok(())
}
