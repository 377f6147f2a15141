use crate::app::App;
use crate::render;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use rustyline::DefaultEditor;
use staffline_core::validation::SignupForm;

pub const PASSWORD_ENV: &str = "STAFFLINE_PASSWORD";

#[derive(Args, Debug)]
pub struct LoginArgs {
    pub email: String,

    /// Prompted for when not given
    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,

    /// Keep the session across runs (up to the configured max age)
    #[arg(long)]
    pub remember: bool,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    pub email: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Prompted for (twice) when not given
    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,
}

fn prompt(label: &str) -> Result<String> {
    let mut editor = DefaultEditor::new()?;
    Ok(editor.readline(label)?)
}

pub async fn login(app: &mut App, args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };

    let response = app
        .auth
        .login(args.email.trim(), &password, args.remember)
        .await?;

    print!("{} ", "Logged in as".green());
    render::print_user(&response.user);
    if !args.remember && !app.interactive {
        println!(
            "{}",
            "Session not remembered: it ends when this command exits. Use --remember or `staffline shell`."
                .yellow()
        );
    }
    Ok(())
}

pub async fn signup(app: &mut App, args: SignupArgs) -> Result<()> {
    let (password, confirm_password) = match args.password {
        Some(password) => (password.clone(), password),
        None => (prompt("Password: ")?, prompt("Confirm password: ")?),
    };

    let form = SignupForm {
        email: args.email,
        password,
        confirm_password,
        first_name: args.first_name,
        last_name: args.last_name,
    };
    let request = form.validate()?;
    app.auth.signup(&request).await?;

    println!(
        "{}",
        "Account created successfully! Please login with your credentials.".green()
    );
    Ok(())
}

pub fn logout(app: &mut App) {
    app.auth.logout();
    println!("{}", "Logged out.".green());
}

pub async fn whoami(app: &mut App, verify: bool) -> Result<()> {
    app.require_login()?;
    if let Some(user) = app.auth.current_user() {
        render::print_user(&user);
    }

    let store = app.auth.store();
    let scope = if store.is_remembered() {
        "remembered"
    } else {
        "this session only"
    };
    println!("{}", format!("Session: {scope}").bright_black());

    if verify {
        if app.auth.verify_token().await {
            println!("{}", "Token is valid.".green());
        } else if app.auth.is_authenticated() {
            println!("{}", "Could not reach the server to verify the token.".yellow());
        } else {
            anyhow::bail!("{}", staffline_application::route_guard::SESSION_EXPIRED_NOTICE);
        }
    }
    Ok(())
}
