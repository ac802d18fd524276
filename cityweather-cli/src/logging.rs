use anyhow::Result;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Installs the global subscriber. Logs go to stderr so stdout stays the menu.
pub fn init(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG.into()
    } else {
        LevelFilter::WARN.into()
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::builder().with_default_directive(level).from_env()?)
        .with_writer(std::io::stderr)
        .with_ansi(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
