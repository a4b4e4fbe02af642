use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Builds the log filter: `RUST_LOG` wins, otherwise `verbosity_level`, with
/// the HTTP stack kept quiet.
///
/// # Errors
///
/// Returns an error if a directive fails to parse
pub fn env_filter(verbosity_level: Option<Level>) -> Result<EnvFilter> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    Ok(EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("hyper_util=error".parse()?)
        .add_directive("reqwest=warn".parse()?))
}

/// Initialize logging on stderr so command output on stdout stays clean.
///
/// # Errors
///
/// Returns an error if the subscriber is already set
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(env_filter(verbosity_level)?);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_default_level() {
        temp_env::with_var("RUST_LOG", None::<&str>, || {
            let filter = env_filter(None).unwrap().to_string();
            assert!(filter.contains("error"));
            assert!(filter.contains("hyper=error"));
            assert!(filter.contains("reqwest=warn"));
        });
    }

    #[test]
    fn test_env_filter_verbosity() {
        temp_env::with_var("RUST_LOG", None::<&str>, || {
            let filter = env_filter(Some(Level::DEBUG)).unwrap().to_string();
            assert!(filter.contains("debug"));
        });
    }

    #[test]
    fn test_env_filter_rust_log() {
        temp_env::with_var("RUST_LOG", Some("ems=trace"), || {
            let filter = env_filter(Some(Level::WARN)).unwrap().to_string();
            assert!(filter.contains("ems=trace"));
        });
    }
}
