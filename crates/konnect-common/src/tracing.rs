use log::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{CommonError, CommonResult};

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn setup_tracing(level: LevelFilter) -> CommonResult {
    let filter = EnvFilter::builder()
        .with_default_directive(to_directive(level).into())
        .from_env_lossy()
        .add_directive(
            "hyper=warn"
                .parse()
                .map_err(|e| CommonError::Tracing(format!("{e}")))?,
        );

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .map_err(|e| CommonError::Tracing(e.to_string()))
}

fn to_directive(level: LevelFilter) -> tracing_subscriber::filter::LevelFilter {
    use tracing_subscriber::filter::LevelFilter as Tl;
    match level {
        LevelFilter::Off => Tl::OFF,
        LevelFilter::Error => Tl::ERROR,
        LevelFilter::Warn => Tl::WARN,
        LevelFilter::Info => Tl::INFO,
        LevelFilter::Debug => Tl::DEBUG,
        LevelFilter::Trace => Tl::TRACE,
    }
}
