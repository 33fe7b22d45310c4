//! windowscope application library.

mod config;
mod console;

pub use config::AppConfig;
pub use console::{log_event, log_events, read_commands};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "windowscope=debug,windowscope_lib=debug,windowscope_engine=debug,windowscope_capture=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
