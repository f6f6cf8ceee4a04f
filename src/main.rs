mod config;
mod directory;
mod ephemeris;
mod error;
mod planetary;
mod report;
mod server;

use std::{io::Write, net::SocketAddr, sync::Arc};

use clap::Parser;
use tracing::{debug, error, info, span};
use tracing_subscriber::EnvFilter;

use config::{Cli, Command};
use directory::{DEFAULT_COUNTRY, LocationDirectory};
use ephemeris::{EphemerisProvider, SpaEphemeris};
use error::AppError;
use planetary::Window;
use report::{PlanetaryHoursReport, planetary_hours, reference_instant};
use server::AppState;

/// Loads the location directory once, then either serves the HTTP API or
/// answers queries typed on stdin until the user sends `exit`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let window = cli.window();
    let directory = Arc::new(LocationDirectory::load(cli.countries.as_deref())?);

    match cli.command.unwrap_or(Command::Repl) {
        Command::Serve { host, port } => {
            let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
            let state = AppState::new(directory, Arc::new(SpaEphemeris), window);
            server::serve(state, addr).await?;
        }
        Command::Repl => repl(&directory, &SpaEphemeris, window)?,
    }

    Ok(())
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Query<'a> {
    Empty,
    Exit,
    /// `list` or `list <country>`
    List(Option<&'a str>),
    /// `<country>, <state>` or just `<state>`
    Hours { country: &'a str, state: &'a str },
}

fn parse_query(line: &str) -> Query<'_> {
    let line = line.trim_start_matches('>').trim();

    if line.is_empty() {
        return Query::Empty;
    }
    if line.eq_ignore_ascii_case("exit") {
        return Query::Exit;
    }
    if line.eq_ignore_ascii_case("list") {
        return Query::List(None);
    }
    if let Some((head, rest)) = line.split_once(char::is_whitespace) {
        if head.eq_ignore_ascii_case("list") {
            return Query::List(Some(rest.trim()));
        }
    }

    match line.split_once(',') {
        Some((country, state)) => Query::Hours {
            country: country.trim(),
            state: state.trim(),
        },
        None => Query::Hours {
            country: DEFAULT_COUNTRY,
            state: line,
        },
    }
}

fn current_hours(
    directory: &LocationDirectory,
    provider: &dyn EphemerisProvider,
    window: Window,
    country: &str,
    state: &str,
) -> Result<PlanetaryHoursReport, AppError> {
    let location = directory.lookup(country, state)?;
    let now = reference_instant(None, location.tz()?)?;
    planetary_hours(provider, location, &now, window)
}

/// Reads queries from stdin until `exit` or end of input.
fn repl(
    directory: &LocationDirectory,
    provider: &dyn EphemerisProvider,
    window: Window,
) -> anyhow::Result<()> {
    span!(tracing::Level::INFO, "repl").in_scope(|| {
        info!("Type `<country>, <state>` or `<state>` for the current planetary hour");
        info!("`list` shows countries, `list <country>` its locations, `exit` stops");
    });

    let mut buffer = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        buffer.clear();
        if std::io::stdin().read_line(&mut buffer)? == 0 {
            break;
        }

        let query = parse_query(&buffer);
        let _entered = span!(tracing::Level::INFO, "query", input = buffer.trim()).entered();
        match query {
            Query::Empty => continue,
            Query::Exit => {
                info!("User wants to exit");
                break;
            }
            Query::List(None) => {
                for country in directory.countries() {
                    println!("{}", country);
                }
            }
            Query::List(Some(country)) => match directory.locations(country) {
                Ok(locations) => {
                    for location in locations {
                        println!(
                            "{} ({}, {:.4}, {:.4})",
                            location.name, location.time_zone, location.latitude, location.longitude
                        );
                    }
                }
                Err(e) => error!("{}", e),
            },
            Query::Hours { country, state } => {
                match current_hours(directory, provider, window, country, state) {
                    Ok(report) => {
                        debug!("Report: {:?}", report);
                        println!("{}", report);
                    }
                    Err(e) => error!("Failed to compute planetary hours: {}", e),
                }
            }
        }
    }

    Ok(())
}
