//! Hello Settings entry point: accumulate settings, set up logging, greet.

use std::io::Write;

use accrete::is_display_request;
use hello_settings::{HelloError, Inputs, load};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let settings = match load(Inputs::default()).await {
        Ok(settings) => settings,
        Err(HelloError::Settings(err)) if err.as_clap().is_some_and(is_display_request) => {
            if let Some(clap_err) = err.as_clap() {
                clap_err.print()?;
            }
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let level = if settings.silent {
        Level::ERROR
    } else if settings.debug {
        Level::DEBUG
    } else {
        Level::WARN
    };
    if let Err(err) = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
    {
        writeln!(std::io::stderr(), "failed to install tracing subscriber: {err}")?;
    }
    tracing::debug!(?settings, "resolved settings");

    if !settings.silent {
        let message = settings.message()?;
        writeln!(std::io::stdout(), "{message}")?;
    }
    Ok(())
}
