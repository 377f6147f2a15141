//! Terminal output for records and summaries.

use chrono::{Local, Utc};
use colored::Colorize;
use serde_json::Value;
use staffline_application::DashboardView;
use staffline_core::format::{
    capitalize_first_letter, format_currency, format_date, format_phone_number,
    format_relative_time, is_expired, is_expiring_soon, truncate_text,
};
use staffline_core::gateway::ImportSummary;
use staffline_core::overlay::{EntityKind, Record, record_id, str_field};
use staffline_core::session::UserProfile;

/// Marker shown next to records with unsynced local edits.
pub const UNSYNCED_MARKER: &str = "*";

const MAX_IMPORT_ERRORS_SHOWN: usize = 10;

/// Plain text for a field: strings as-is, numbers and bools printed, `-` otherwise.
pub fn text(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => "-".to_string(),
    }
}

/// Text of the first present field in `fields`.
fn first_text(record: &Record, fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| text(record, f))
        .find(|t| t != "-")
        .unwrap_or_else(|| "-".to_string())
}

fn number(record: &Record, field: &str) -> Option<f64> {
    match record.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn full_name(record: &Record) -> String {
    let name = [str_field(record, "first_name"), str_field(record, "last_name")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        text(record, "candidate_name")
    } else {
        name
    }
}

fn location(record: &Record) -> String {
    match (str_field(record, "city"), str_field(record, "state")) {
        (Some(city), Some(state)) if !city.is_empty() => format!("{city}, {state}"),
        (_, Some(state)) => state.to_string(),
        (Some(city), None) => city.to_string(),
        (None, None) => "-".to_string(),
    }
}

/// The columns printed for one record of `kind`.
pub fn row(kind: EntityKind, record: &Record) -> Vec<String> {
    let id = record_id(kind, record).unwrap_or_else(|| "-".to_string());
    match kind {
        EntityKind::Candidate => vec![
            id,
            full_name(record),
            text(record, "email"),
            format_phone_number(str_field(record, "phone")),
            text(record, "primary_specialty"),
            capitalize_first_letter(&text(record, "status")),
        ],
        EntityKind::Job => vec![
            id,
            text(record, "title"),
            text(record, "facility"),
            location(record),
            format_currency(number(record, "pay_rate_weekly")),
            capitalize_first_letter(&text(record, "status")),
        ],
        EntityKind::Assignment => vec![
            id,
            full_name(record),
            text(record, "facility"),
            format_date(str_field(record, "start_date")),
            format_date(str_field(record, "end_date")),
            capitalize_first_letter(&text(record, "status")),
        ],
        EntityKind::Document => {
            let expires = str_field(record, "expiration_date");
            let today = Local::now().date_naive();
            let mut expiry = format_date(expires);
            if let Some(date) = expires {
                if is_expired(date, today) {
                    expiry = format!("{expiry} (expired)");
                } else if is_expiring_soon(date, today, 30) {
                    expiry = format!("{expiry} (expiring soon)");
                }
            }
            vec![
                id,
                full_name(record),
                text(record, "document_type"),
                expiry,
                capitalize_first_letter(&text(record, "status")),
            ]
        }
        EntityKind::Expense => vec![
            id,
            text(record, "expense_type"),
            truncate_text(&text(record, "description"), 40),
            format_currency(number(record, "amount")),
            capitalize_first_letter(&text(record, "status")),
        ],
        EntityKind::Alert => {
            let read = record.get("is_read").and_then(Value::as_bool).unwrap_or(false);
            vec![
                id,
                if read { " " } else { "●" }.to_string(),
                text(record, "priority"),
                truncate_text(&first_text(record, &["title", "message"]), 60),
                str_field(record, "created_at")
                    .map(|t| format_relative_time(t, Utc::now()))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        }
        EntityKind::Match => vec![
            first_text(record, &["candidate_id", "job_id"]),
            first_text(record, &["candidate_name", "title"]),
            first_text(record, &["primary_specialty", "specialty_required"]),
            first_text(record, &["facility", "email"]),
            number(record, "score")
                .map(|s| format!("{s:.0}"))
                .unwrap_or_else(|| "-".to_string()),
        ],
    }
}

/// One line for an ending assignment with its replacement count.
pub fn ending_assignment_row(item: &Record) -> String {
    let nested = |key: &str| -> Record {
        item.get(key)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    };
    let assignment = &nested("assignment");
    let candidate = &nested("candidate");
    format!(
        "{}  |  {} <{}>  |  ends {} ({} days)  |  {}  |  {} potential matches",
        text(assignment, "assignment_id"),
        text(candidate, "full_name"),
        text(candidate, "email"),
        format_date(str_field(assignment, "end_date")),
        text(item, "days_remaining"),
        text(assignment, "location"),
        number(item, "potential_matches").unwrap_or(0.0),
    )
}

/// Prints records one per line. `is_pending` marks rows with unsynced edits.
pub fn print_records(kind: EntityKind, records: &[Record], is_pending: impl Fn(&str) -> bool) {
    if records.is_empty() {
        println!("{}", format!("No {} found.", kind.collection()).bright_black());
        return;
    }
    for record in records {
        let pending = record_id(kind, record)
            .map(|id| is_pending(&id))
            .unwrap_or(false);
        let marker = if pending { UNSYNCED_MARKER } else { " " };
        println!("{} {}", marker.yellow(), row(kind, record).join("  |  "));
    }
    if records
        .iter()
        .any(|r| record_id(kind, r).is_some_and(|id| is_pending(&id)))
    {
        println!(
            "{}",
            format!("{UNSYNCED_MARKER} unsynced local edit").bright_black()
        );
    }
}

/// Prints every field of one record.
pub fn print_record(record: &Record, pending: bool) {
    for (field, value) in record {
        let shown = match value {
            Value::String(s) => s.clone(),
            Value::Null => "-".to_string(),
            other => other.to_string(),
        };
        println!("{:>24}: {}", field.bright_black(), shown);
    }
    if pending {
        println!("{}", "Has unsynced local edits.".yellow());
    }
}

pub fn print_user(user: &UserProfile) {
    println!(
        "[{}] {} <{}>",
        user.initials().bold(),
        user.display_name(),
        user.display_email()
    );
}

pub fn print_dashboard(view: &DashboardView) {
    let stats = &view.stats;
    println!("{}", "Dashboard".bright_magenta().bold());
    println!(
        "  Candidates  {} active / {} total",
        stats.candidates.active, stats.candidates.total
    );
    println!("  Jobs        {} open / {} total", stats.jobs.open, stats.jobs.total);
    println!(
        "  Assignments {} active, {} ending within {} days",
        stats.assignments.active, stats.assignments.ending_soon, stats.assignments.ending_soon_days
    );
    println!("  Alerts      {} unread", stats.alerts.unread);

    println!();
    println!("{}", "Unread alerts".bold());
    print_records(EntityKind::Alert, &view.alerts, |_| false);

    println!();
    println!("{}", "Ending assignments".bold());
    print_records(EntityKind::Assignment, &view.ending_assignments, |_| false);
}

pub fn print_import_summary(summary: &ImportSummary) {
    let headline = format!(
        "Imported {}, skipped {}, {} errors",
        summary.imported,
        summary.skipped,
        summary.errors.len()
    );
    if summary.has_errors() {
        println!("{}", headline.yellow());
    } else {
        println!("{}", headline.green());
    }
    for error in summary.errors.iter().take(MAX_IMPORT_ERRORS_SHOWN) {
        println!("  {}", error.red());
    }
    if summary.errors.len() > MAX_IMPORT_ERRORS_SHOWN {
        println!(
            "  ... and {} more errors",
            summary.errors.len() - MAX_IMPORT_ERRORS_SHOWN
        );
    }
}
