use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::infrastructure::config::LogFormat;

/// Everything the subscriber needs, decided once at startup.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// `RUST_LOG` wins; otherwise the crate and the HTTP tracing layer log at `level`.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "news_aggregator={level},tower_http={level}",
                level = self.level
            )
            .into()
        })
    }
}

pub fn init_logging(settings: &LogSettings) {
    let registry = tracing_subscriber::registry().with(settings.filter());

    if settings.format == LogFormat::Json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }

    tracing::debug!(level = %settings.level, format = ?settings.format, "Logging initialised");
}
