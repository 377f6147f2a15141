use crate::app::App;
use crate::render;
use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::Value;
use staffline_core::gateway::ListQuery;
use staffline_core::overlay::{EntityKind, Patch, Record};

#[derive(Args, Debug, Default)]
pub struct Filters {
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub specialty: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
}

impl Filters {
    fn query(self) -> ListQuery {
        ListQuery {
            status: self.status,
            specialty: self.specialty,
            state: self.state,
            ..ListQuery::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CandidateAction {
    /// List candidates, searching locally by name, email or specialty
    List {
        #[command(flatten)]
        filters: Filters,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one candidate
    Show { id: String },
    /// Add a candidate
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        specialty: String,
        /// Extra fields as key=value
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Save a local edit (shell only)
    Edit {
        id: String,
        #[arg(value_name = "KEY=VALUE", required = true)]
        fields: Vec<String>,
    },
    /// Change status as a local edit (shell only)
    Status { id: String, status: String },
    /// Drop the local edit of a candidate (shell only)
    Discard { id: String },
    /// Ids with unsynced local edits (shell only)
    Pending,
    /// Specialties in use
    Specialties,
}

#[derive(Subcommand, Debug)]
pub enum JobAction {
    List {
        #[command(flatten)]
        filters: Filters,
    },
    Show { id: String },
    /// Post a job
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        specialty: String,
        #[arg(long)]
        facility: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        /// Extra fields as key=value
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    Specialties,
}

#[derive(Subcommand, Debug)]
pub enum ListAction {
    List {
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExpenseAction {
    List {
        #[arg(long)]
        status: Option<String>,
    },
    /// Submit an expense
    Create {
        #[arg(long = "type")]
        expense_type: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        candidate: String,
        #[arg(long)]
        assignment: Option<String>,
    },
}

/// Parses `key=value` pairs. Values that read as JSON (numbers, booleans,
/// `null`) keep that type; everything else is a string.
pub fn parse_fields(pairs: &[String]) -> Result<Patch> {
    let mut patch = Patch::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got '{pair}'"))?;
        let key = key.trim();
        if key.is_empty() {
            bail!("Empty field name in '{pair}'");
        }
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(v @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => v,
            _ => Value::String(raw.to_string()),
        };
        patch.insert(key.to_string(), value);
    }
    Ok(patch)
}

fn require_shell(app: &App) -> Result<()> {
    if !app.interactive {
        bail!("Local edits only last for an interactive session. Run `staffline shell`.");
    }
    Ok(())
}

fn with_fields(mut record: Record, fields: &[String]) -> Result<Record> {
    record.extend(parse_fields(fields)?);
    Ok(record)
}

fn string_field(record: &mut Record, key: &str, value: String) {
    record.insert(key.to_string(), Value::String(value));
}

pub async fn candidates(app: &mut App, action: CandidateAction) -> Result<()> {
    app.require_login()?;
    let usecase = &app.candidates;
    match action {
        CandidateAction::List { filters, search } => {
            let list = usecase.list_or_empty(&filters.query(), &search).await;
            render::print_records(EntityKind::Candidate, &list, |id| {
                usecase.has_pending_edit(id)
            });
        }
        CandidateAction::Show { id } => {
            let candidate = usecase.detail(&id).await?;
            render::print_record(&candidate, usecase.has_pending_edit(&id));
        }
        CandidateAction::Create {
            first_name,
            last_name,
            email,
            specialty,
            fields,
        } => {
            let mut candidate = with_fields(Record::new(), &fields)?;
            string_field(&mut candidate, "first_name", first_name);
            string_field(&mut candidate, "last_name", last_name);
            string_field(&mut candidate, "email", email);
            string_field(&mut candidate, "primary_specialty", specialty);
            let created = usecase.create(candidate).await?;
            println!("{}", "Candidate created.".green());
            render::print_record(&created, false);
        }
        CandidateAction::Edit { id, fields } => {
            require_shell(app)?;
            let patch = parse_fields(&fields)?;
            let current = usecase.detail(&id).await?;
            let updated = usecase.save_edit(&current, patch)?;
            println!("{}", "Saved locally (not synced).".yellow());
            render::print_record(&updated, true);
        }
        CandidateAction::Status { id, status } => {
            require_shell(app)?;
            let current = usecase.detail(&id).await?;
            usecase.change_status(&current, &status)?;
            println!("{}", format!("Status of {id} set to {status} locally.").yellow());
        }
        CandidateAction::Discard { id } => {
            require_shell(app)?;
            if usecase.discard_edit(&id)? {
                println!("Discarded local edit of {id}.");
            } else {
                println!("{id} has no local edit.");
            }
        }
        CandidateAction::Pending => {
            require_shell(app)?;
            let pending = usecase.pending_edits();
            if pending.is_empty() {
                println!("{}", "No unsynced edits.".bright_black());
            }
            for id in pending {
                println!("{} {id}", render::UNSYNCED_MARKER.yellow());
            }
        }
        CandidateAction::Specialties => {
            for specialty in usecase.specialties().await {
                println!("{specialty}");
            }
        }
    }
    Ok(())
}

pub async fn jobs(app: &mut App, action: JobAction) -> Result<()> {
    app.require_login()?;
    let usecase = &app.jobs;
    match action {
        JobAction::List { filters } => {
            let list = usecase.list_or_empty(&filters.query()).await;
            render::print_records(EntityKind::Job, &list, |_| false);
        }
        JobAction::Show { id } => {
            let job = usecase.detail(&id).await?;
            render::print_record(&job, false);
        }
        JobAction::Create {
            title,
            specialty,
            facility,
            city,
            state,
            fields,
        } => {
            let mut job = with_fields(Record::new(), &fields)?;
            string_field(&mut job, "title", title);
            string_field(&mut job, "specialty_required", specialty);
            string_field(&mut job, "facility", facility);
            string_field(&mut job, "city", city);
            string_field(&mut job, "state", state);
            let created = usecase.create(job).await?;
            println!("{}", "Job posted successfully!".green());
            render::print_record(&created, false);
        }
        JobAction::Specialties => {
            for specialty in usecase.specialties().await {
                println!("{specialty}");
            }
        }
    }
    Ok(())
}

pub async fn list(app: &mut App, kind: EntityKind, action: ListAction) -> Result<()> {
    app.require_login()?;
    let ListAction::List { status } = action;
    let query = ListQuery {
        status,
        ..ListQuery::default()
    };
    let records = app.records.list_or_empty(kind, &query).await;
    render::print_records(kind, &records, |_| false);
    Ok(())
}

pub async fn expenses(app: &mut App, action: ExpenseAction) -> Result<()> {
    match action {
        ExpenseAction::List { status } => {
            list(app, EntityKind::Expense, ListAction::List { status }).await
        }
        ExpenseAction::Create {
            expense_type,
            description,
            amount,
            candidate,
            assignment,
        } => {
            app.require_login()?;
            let mut expense = Record::new();
            string_field(&mut expense, "expense_type", expense_type);
            string_field(&mut expense, "description", description);
            string_field(&mut expense, "candidate_id", candidate);
            if let Some(assignment) = assignment {
                string_field(&mut expense, "assignment_id", assignment);
            }
            let amount = match amount.trim().parse::<f64>() {
                Ok(n) => serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .unwrap_or(Value::String(amount)),
                Err(_) => Value::String(amount),
            };
            expense.insert("amount".into(), amount);

            let created = app.records.create_expense(expense).await?;
            println!("{}", "Expense created.".green());
            render::print_record(&created, false);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_fields_keeps_scalar_types() {
        let fields = vec![
            "phone=5551234567".to_string(),
            "city=San Antonio".to_string(),
            "willing_to_travel=true".to_string(),
            "notes=".to_string(),
            "zip=07030".to_string(),
        ];
        let patch = parse_fields(&fields).unwrap();
        assert_eq!(patch["phone"], json!(5551234567u64));
        assert_eq!(patch["city"], "San Antonio");
        assert_eq!(patch["willing_to_travel"], true);
        assert_eq!(patch["notes"], "");
        assert_eq!(patch["zip"], "07030");
    }

    #[test]
    fn test_parse_fields_rejects_malformed_pairs() {
        assert!(parse_fields(&["status".to_string()]).is_err());
        assert!(parse_fields(&["=x".to_string()]).is_err());
    }
}
