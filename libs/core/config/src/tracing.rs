use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Default directives when `RUST_LOG` is not set.
const PRODUCTION_FILTER: &str = "info,tower_http=info,sea_orm=warn,sqlx=warn";
const DEVELOPMENT_FILTER: &str = "debug,tower_http=debug,sea_orm=info,sqlx=info,audit=info";

/// Install color-eyre before any fallible work in `main`.
///
/// Repeated calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Build the log filter from `RUST_LOG`, or the environment's default directives.
pub fn env_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if environment.is_production() {
            EnvFilter::new(PRODUCTION_FILTER)
        } else {
            EnvFilter::new(DEVELOPMENT_FILTER)
        }
    })
}

/// Initialize the global subscriber.
///
/// - production: flattened JSON lines for log shippers
/// - development: pretty, multi-line output
///
/// Both carry an [`tracing_error::ErrorLayer`] so `eyre` reports include span traces.
/// Calling this more than once (common in tests) is a no-op.
pub fn init_tracing(environment: &Environment) {
    let filter = env_filter(environment);

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(()) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_multiple_calls() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Production);
    }

    #[test]
    fn test_env_filter_prefers_rust_log() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            let filter = env_filter(&Environment::Development);
            assert_eq!(filter.to_string(), "warn");
        });
    }

    #[test]
    fn test_env_filter_production_default() {
        temp_env::with_var_unset("RUST_LOG", || {
            let filter = env_filter(&Environment::Production);
            assert!(filter.to_string().contains("sea_orm=warn"));
        });
    }
}
