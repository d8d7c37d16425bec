use std::io;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// `RUST_LOG` wins over the verbosity flag.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("dork_hound=info")
        } else {
            EnvFilter::new("dork_hound=warn")
        }
    })
}

/// Terminal logs go to stderr, stdout only carries the links found.
/// With `log_file` every event is also written, without colors, to that file.
pub fn init_tracing_subscriber(verbose: bool, log_file: Option<(&Path, &str)>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_span_events(FmtSpan::CLOSE)
        .with_file(false)
        .with_target(false);

    if let Some((output_dir, filename)) = log_file {
        let file_appender =
            RollingFileAppender::new(Rotation::NEVER, output_dir, format!("{}.log", filename));
        let suscriber = subscriber
            .with_ansi(false)
            .with_writer(file_appender)
            .finish();

        let stderr_layer = layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true)
            .with_file(false)
            .with_target(false)
            .with_writer(io::stderr);

        tracing::subscriber::set_global_default(suscriber.with(stderr_layer))
            .expect("Unable to set global subscriber with 2 layer");
    } else {
        let suscriber = subscriber.with_ansi(true).with_writer(io::stderr).finish();

        tracing::subscriber::set_global_default(suscriber)
            .expect("Unable to set global subscriber");
    }
}
