//! Registration intake CLI.
//!
//! ```bash
//! intake-form --email a@x.com --password secret
//! intake-form --phone +15550001 --password secret --server http://10.0.0.5:5000
//! ```

use clap::Parser;
use intake_form::{IntakeClient, RegistrationForm, DEFAULT_SERVER_URL};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "intake-form")]
#[command(version, about = "Submit a student registration")]
struct Cli {
    /// Email address
    #[arg(short, long)]
    email: Option<String>,

    /// Phone number
    #[arg(short, long)]
    phone: Option<String>,

    /// Account password
    #[arg(long, default_value = "")]
    password: String,

    /// Registration service base URL
    #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
    server: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let form = RegistrationForm::new(cli.email, cli.phone, cli.password);

    if let Err(e) = form.validate() {
        eprintln!("{}", e.user_message());
        return Ok(ExitCode::FAILURE);
    }

    let client = IntakeClient::new(cli.server)?;
    match client.submit(&form).await {
        Ok(message) => {
            println!("{message}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Submission failed");
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
