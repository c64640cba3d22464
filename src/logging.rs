use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub default_level: String,
}

impl LoggingConfig {
    pub fn new(verbose: bool) -> Self {
        Self {
            default_level: if verbose { "debug" } else { "warn" }.to_string(),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_level))
    }
}

/// Install the global subscriber. Logs go to stderr so command output on stdout stays clean.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(config.filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}
