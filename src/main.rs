use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use briefmail_lib::config::{AppConfig, Brand};
use briefmail_lib::form::{Banner, FormController, HttpTransport};
use briefmail_lib::processor::SubmissionProcessor;
use briefmail_lib::server::{self, AppState};
use briefmail_lib::smtp::{self, SmtpMailer, PASSWORD_ENV};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "briefmail")]
#[command(version = briefmail_lib::VERSION, about = "Creative brief intake and email notifications")]
struct Cli {
    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the submission endpoint.
    Serve {
        /// TOML, YAML or JSON configuration file.
        #[arg(short, long, env = "BRIEFMAIL_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Fill in and submit a creative brief from the terminal.
    Submit {
        /// Submission endpoint URL.
        #[arg(long, default_value = "http://127.0.0.1:5000/submit")]
        endpoint: String,

        /// Field value as `key=value`; repeat for each field.
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Tick the terms acknowledgement.
        #[arg(long)]
        acknowledge: bool,

        /// Address offered when the endpoint cannot be reached.
        #[arg(long)]
        contact_email: Option<String>,
    },

    /// Store SMTP credentials for a profile in the OS keychain.
    ///
    /// The password is read from BRIEFMAIL_SMTP_PASSWORD.
    StoreCredential { profile: String, username: String },

    /// Remove a profile's SMTP credentials from the OS keychain.
    DeleteCredential { profile: String },

    /// Connect to the configured SMTP server without sending anything.
    TestSmtp {
        #[arg(short, long, env = "BRIEFMAIL_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log level")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Serve { config } => serve(config).await,
        Command::Submit {
            endpoint,
            fields,
            acknowledge,
            contact_email,
        } => submit(endpoint, fields, acknowledge, contact_email).await,
        Command::StoreCredential { profile, username } => {
            let password = std::env::var(PASSWORD_ENV)
                .with_context(|| format!("{PASSWORD_ENV} must hold the password to store"))?;
            smtp::store_credential(&profile, &username, &password)?;
            println!("Stored credentials for profile '{profile}'");
            Ok(())
        }
        Command::DeleteCredential { profile } => {
            smtp::delete_credential(&profile)?;
            println!("Deleted credentials for profile '{profile}'");
            Ok(())
        }
        Command::TestSmtp { config } => {
            let config = AppConfig::load(config.as_deref())?;
            let (mailer, authenticated) = build_mailer(&config)?;
            mailer.test_connection().await?;
            println!(
                "Connected to {}:{} ({})",
                config.smtp.host,
                config.smtp.port,
                if authenticated { "authenticated" } else { "no credentials" }
            );
            Ok(())
        }
    }
}

fn build_mailer(config: &AppConfig) -> Result<(SmtpMailer, bool)> {
    let credentials = smtp::resolve_credentials(&config.smtp, |key| std::env::var(key).ok());
    let mailer = SmtpMailer::new(&config.smtp, credentials.as_ref(), &config.from_email)
        .context("building SMTP transport")?;
    Ok((mailer, credentials.is_some()))
}

async fn serve(config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;
    let (mailer, smtp_configured) = build_mailer(&config)?;
    if !smtp_configured {
        tracing::warn!(profile = %config.smtp.name, "no SMTP credentials found; sending unauthenticated");
    }

    let bind = config.bind;
    let processor = SubmissionProcessor::new(Arc::new(config), Arc::new(mailer))?;
    let state = AppState {
        processor: Arc::new(processor),
        smtp_configured,
    };

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    server::serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}

async fn submit(
    endpoint: String,
    fields: Vec<(String, String)>,
    acknowledge: bool,
    contact_email: Option<String>,
) -> Result<()> {
    let contact = contact_email.unwrap_or_else(|| Brand::default().contact_email);
    let mut form = FormController::new(contact);
    for (key, value) in &fields {
        if !form.set_value(key, value.as_str()) {
            bail!("unknown field '{key}'");
        }
    }
    form.set_acknowledged(acknowledge);

    if !form.validate_all() {
        for (key, message) in form.field_errors() {
            eprintln!("{key}: {message}");
        }
        bail!("fix the fields above and try again");
    }

    let transport = HttpTransport::new(endpoint);
    form.submit(&transport).await;
    match form.banner() {
        Some(Banner::Success(text)) => {
            println!("{text}");
            Ok(())
        }
        Some(Banner::Error(text)) => bail!("{text}"),
        None => bail!("no response from {}", transport.endpoint()),
    }
}
