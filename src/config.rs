use anyhow::Context;
use clap::{Args, ValueEnum};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_USER_EMAIL: &str = "teacher@example.com";
pub const DEFAULT_LOG_FILTER: &str = "classroom_dashboard=info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Email the mock session signs in with
    #[arg(long, global = true, env = "DASHBOARD_USER_EMAIL", default_value = DEFAULT_USER_EMAIL)]
    pub user_email: String,
    /// Output format for list and stats
    #[arg(long, global = true, env = "DASHBOARD_FORMAT", value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    /// Tracing filter directive
    #[arg(long, global = true, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        let email = self.user_email.trim();
        let valid = email
            .split_once('@')
            .map(|(user, domain)| !user.is_empty() && !domain.is_empty())
            .unwrap_or(false);
        anyhow::ensure!(valid, "user email '{}' is not a valid address", self.user_email);
        Ok(())
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays
/// machine readable.
pub fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_new(filter).with_context(|| format!("invalid log filter '{filter}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))?;
    Ok(())
}
