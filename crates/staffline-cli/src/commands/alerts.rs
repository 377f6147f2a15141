use crate::app::App;
use crate::render;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use staffline_core::overlay::EntityKind;

#[derive(Subcommand, Debug)]
pub enum AlertAction {
    List {
        /// Only unread alerts
        #[arg(long)]
        unread: bool,
    },
    /// Mark one or more alerts as read
    Read {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Mark an alert as unread
    Unread { id: String },
    /// Mark every alert as unread
    UnreadAll,
}

pub async fn run(app: &mut App, action: AlertAction) -> Result<()> {
    app.require_login()?;
    let alerts = &app.alerts;
    match action {
        AlertAction::List { unread } => {
            let list = alerts.list(unread).await?;
            render::print_records(EntityKind::Alert, &list, |_| false);
        }
        AlertAction::Read { ids } => {
            if let [id] = ids.as_slice() {
                alerts.mark_read(id).await?;
            } else {
                alerts.mark_many_read(&ids).await?;
            }
            println!("{}", format!("Marked {} as read.", ids.join(", ")).green());
        }
        AlertAction::Unread { id } => {
            alerts.mark_unread(&id).await?;
            println!("{}", format!("Marked {id} as unread.").green());
        }
        AlertAction::UnreadAll => {
            let update = alerts.mark_all_unread().await?;
            println!("{}", format!("{} ({})", update.message, update.count).green());
        }
    }
    Ok(())
}
