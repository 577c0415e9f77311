use clap::Parser;
use lunch_roulette::config::{Credentials, LoggingSettings, Settings};
use lunch_roulette::services::SearchClient;
use lunch_roulette::{decide, AppError, Outcome};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Choose your lunch provider, favouring places you have not been to yet.
#[derive(Debug, Parser)]
#[command(name = "lunch-roulette", version)]
struct Args {
    /// Search term (default: lunch)
    #[arg(short, long)]
    term: Option<String>,

    /// Search location (default: Gaithersburg, MD)
    #[arg(short, long)]
    location: Option<String>,

    /// Number of top results to choose from, 1-50 (default: 20).
    /// Larger values are rejected before any request is sent.
    #[arg(short = 'm', long = "max")]
    max: Option<u16>,

    /// Histogram of visited places (default: visited.json)
    #[arg(short = 'v', long = "visited")]
    visited: Option<PathBuf>,

    /// JSON file holding the API_KEY (default: credentials.json)
    #[arg(short, long)]
    credentials: Option<PathBuf>,

    /// Extra configuration file layered over config/default.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Command line flags win over every other configuration source
    fn apply(self, settings: &mut Settings) {
        if let Some(term) = self.term {
            settings.search.term = term;
        }
        if let Some(location) = self.location {
            settings.search.location = location;
        }
        if let Some(max) = self.max {
            settings.search.limit = max;
        }
        if let Some(visited) = self.visited {
            settings.files.history = visited;
        }
        if let Some(credentials) = self.credentials {
            settings.files.credentials = credentials;
        }
    }
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let args = Args::parse();

    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut settings);

    init_logging(&settings.logging);
    info!("Configuration loaded successfully");

    // Credentials are required before any network call
    let credentials = match Credentials::resolve(&settings.files.credentials) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Failed to load credentials: {}", e);
            eprintln!("Unable to load credentials: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match SearchClient::new(settings.client_config(credentials)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Unable to create search client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut rng = rand::thread_rng();

    let result = decide(&settings, &client, &mut rng, &mut stdin.lock(), &mut stdout.lock()).await;
    match &result {
        Ok(Outcome::Accepted { name, visits, .. }) => info!("Enjoy {} (visit #{})", name, visits),
        Ok(Outcome::NoResults) => {}
        Err(e) => {
            error!("Decision failed: {}", e);
            eprintln!("{}", error_message(e));
        }
    }

    ExitCode::from(exit_status(&result))
}

/// 0 once a choice is accepted or the search came back empty, 1 on any failure
fn exit_status(result: &Result<Outcome, AppError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Text shown to the user when a decision cycle fails
fn error_message(err: &AppError) -> String {
    match err {
        AppError::Search(search) => match search.http_details() {
            Some((status, url, body)) => format!(
                "Encountered HTTP error {} on {}:\n {}\nAbort program.",
                status.as_u16(),
                url,
                body
            ),
            None => format!("Unable to decide: {}", search),
        },
        other => format!("Unable to decide: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunch_roulette::core::DecisionError;
    use lunch_roulette::services::SearchError;
    use reqwest::StatusCode;
    use validator::Validate;

    #[test]
    fn test_flags_override_settings() {
        let args = Args::try_parse_from(["lunch-roulette", "-m", "5", "-v", "x.json"]).unwrap();
        let mut settings = Settings::default();
        args.apply(&mut settings);

        assert_eq!(settings.search.limit, 5);
        assert_eq!(settings.files.history, PathBuf::from("x.json"));
        // Untouched flags keep the configured values
        assert_eq!(settings.search.term, "lunch");
        assert_eq!(settings.search.location, "Gaithersburg, MD");
        assert_eq!(settings.files.credentials, PathBuf::from("credentials.json"));
    }

    #[test]
    fn test_long_flags() {
        let args = Args::try_parse_from([
            "lunch-roulette",
            "--term",
            "tacos",
            "--location",
            "Rockville, MD",
            "--credentials",
            "keys.json",
            "--config",
            "extra.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("extra.toml")));

        let mut settings = Settings::default();
        args.apply(&mut settings);

        assert_eq!(settings.search.term, "tacos");
        assert_eq!(settings.search.location, "Rockville, MD");
        assert_eq!(settings.files.credentials, PathBuf::from("keys.json"));
        assert_eq!(settings.search.limit, 20);
    }

    #[test]
    fn test_max_out_of_range_fails_validation() {
        let args = Args::try_parse_from(["lunch-roulette", "-m", "100"]).unwrap();
        let mut settings = Settings::default();
        args.apply(&mut settings);

        assert!(settings.search_query().validate().is_err());
    }

    #[test]
    fn test_http_error_message() {
        let err = AppError::Search(SearchError::Query {
            status: StatusCode::BAD_REQUEST,
            url: "https://api.yelp.com/v3/businesses/search?term=lunch".to_string(),
            body: r#"{"error": "LOCATION_NOT_FOUND"}"#.to_string(),
        });

        assert_eq!(
            error_message(&err),
            "Encountered HTTP error 400 on https://api.yelp.com/v3/businesses/search?term=lunch:\n \
             {\"error\": \"LOCATION_NOT_FOUND\"}\nAbort program."
        );
    }

    #[test]
    fn test_other_error_message() {
        let err = AppError::Decision(DecisionError::InputClosed);
        assert_eq!(
            error_message(&err),
            "Unable to decide: Input closed before a choice was accepted"
        );
    }

    #[test]
    fn test_exit_status() {
        let accepted = Ok(Outcome::Accepted {
            id: "X".to_string(),
            name: "Place X".to_string(),
            visits: 1,
        });
        assert_eq!(exit_status(&accepted), 0);
        assert_eq!(exit_status(&Ok(Outcome::NoResults)), 0);
        assert_eq!(exit_status(&Err(AppError::Decision(DecisionError::InputClosed))), 1);
    }
}
