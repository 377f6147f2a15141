use crate::app::App;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use staffline_application::email_usecase::compose;

#[derive(Args, Debug)]
pub struct EmailArgs {
    /// Candidate to email
    pub candidate_id: String,

    /// Job to pitch; fills in the job details and default subject
    #[arg(long)]
    pub job: Option<String>,

    /// Defaults to the standard opportunity subject
    #[arg(long, default_value = "")]
    pub subject: String,

    /// Personal message highlighted in the email
    #[arg(long, default_value = "")]
    pub message: String,
}

pub async fn send(app: &mut App, args: EmailArgs) -> Result<()> {
    app.require_login()?;

    let candidate = app.candidates.detail(&args.candidate_id).await?;
    let job = match &args.job {
        Some(job_id) => Some(app.jobs.detail(job_id).await?),
        None => None,
    };

    let request = compose(&candidate, job.as_ref(), &args.subject, &args.message);
    let receipt = app.email.send(&request).await?;

    let message = if receipt.message.is_empty() {
        format!("Email sent to {}", request.to_email)
    } else {
        receipt.message
    };
    println!("{}", message.green());
    Ok(())
}
