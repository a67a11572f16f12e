//! wayfare — travel-assistant agent with tool calling and a fallback model.
//!
//! A Groq-backed agent answers travel queries by interleaving reasoning with
//! calls to three capabilities (weather, cost estimates, recommendations).
//! Any primary failure degrades to a simpler, tool-less model whose answers
//! are explicitly labeled as fallback mode.
//!
//! # Quick Start
//!
//! ```no_run
//! use wayfare::app::TravelApp;
//! use wayfare::config::AppConfig;
//!
//! # async fn example() -> Result<(), wayfare::error::WayfareError> {
//! let config = AppConfig::from_env()?;
//! let mut app = TravelApp::new(&config)?;
//! let answer = app.run_single_query("What's the weather in Paris?").await;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;
pub mod workflow;
