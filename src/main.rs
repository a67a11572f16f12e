//! wayfare binary entry point.

use wayfare::agent::AgentOptionsUpdate;
use wayfare::app::TravelApp;
use wayfare::cli::Cli;
use wayfare::config::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wayfare=info")),
        )
        .init();

    let cli = Cli::parse_args();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    println!("Initializing Travel Planning Agent...");

    let mut app = match TravelApp::new(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Initialization error: {e}");
            std::process::exit(1);
        }
    };

    if cli.model.is_some() || cli.verbose {
        let update = AgentOptionsUpdate {
            model: cli.model.clone(),
            verbose: Some(cli.verbose),
            ..Default::default()
        };
        if let Err(e) = app.primary_mut().update_config(update) {
            eprintln!("Initialization error: {e}");
            std::process::exit(1);
        }
    }

    app.startup_check().await;

    let result = match cli.query {
        Some(query) => {
            app.run_single_query(&query).await;
            Ok(())
        }
        None => app.run_interactive().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
