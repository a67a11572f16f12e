//! The three travel capabilities: weather, cost estimate, recommendations.
//!
//! Weather and cost figures are mocked unless an OpenWeatherMap key is
//! configured; each tool is stateless and safe to call concurrently.

use rand::Rng;
use serde::Deserialize;
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::WayfareError;
use crate::provider::http::shared_client;

use super::registry::ToolRegistry;
use super::tool::AgentTool;
use super::types::ToolParameters;

const OPENWEATHER_BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Cabin class for cost estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum TravelClass {
    Economy,
    Business,
    First,
}

impl TravelClass {
    fn base_cost(self) -> f64 {
        match self {
            Self::Economy => 300.0,
            Self::Business => 800.0,
            Self::First => 1500.0,
        }
    }
}

/// Recommendation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RecommendationCategory {
    Attractions,
    Restaurants,
    Hotels,
}

impl RecommendationCategory {
    fn entries(self) -> [&'static str; 3] {
        match self {
            Self::Attractions => ["City Museum", "Historic District", "Botanical Gardens"],
            Self::Restaurants => ["Local Cuisine Bistro", "Seafood Grill", "Rooftop Cafe"],
            Self::Hotels => ["Grand Plaza Hotel", "Riverside Inn", "City Center Suites"],
        }
    }
}

/// Mock weather report for a city.
pub fn mock_weather(city: &str) -> String {
    const CONDITIONS: [&str; 9] = [
        "sunny and clear",
        "partly cloudy",
        "overcast",
        "light rain",
        "heavy rain",
        "thunderstorms",
        "snow",
        "foggy",
        "windy",
    ];

    let mut rng = rand::thread_rng();
    let condition = CONDITIONS[rng.gen_range(0..CONDITIONS.len())];
    let temp = rng.gen_range(5..=35);
    let humidity = rng.gen_range(30..=90);

    format!(
        "Weather in {city}: {condition}, {temp}°C, {humidity}% humidity. \
         Perfect for exploring the city!"
    )
}

/// Fetch live weather from OpenWeatherMap.
pub async fn fetch_weather(
    api_key: &str,
    city: &str,
    country: Option<&str>,
) -> Result<String, WayfareError> {
    #[derive(Deserialize)]
    struct OwmResponse {
        weather: Vec<OwmWeather>,
        main: OwmMain,
    }
    #[derive(Deserialize)]
    struct OwmWeather {
        description: String,
    }
    #[derive(Deserialize)]
    struct OwmMain {
        temp: f64,
        humidity: u32,
    }

    let location = match country {
        Some(c) if !c.is_empty() => format!("{city},{c}"),
        _ => city.to_string(),
    };

    debug!(%location, "weather lookup");

    let resp = shared_client()
        .get(OPENWEATHER_BASE_URL)
        .query(&[("q", location.as_str()), ("appid", api_key), ("units", "metric")])
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await?
        .error_for_status()?;

    let data: OwmResponse = resp.json().await?;
    let description = data
        .weather
        .first()
        .map(|w| w.description.as_str())
        .unwrap_or("unknown conditions");

    Ok(format!(
        "Current weather in {city}: {description}, {}°C, {}% humidity",
        data.main.temp, data.main.humidity
    ))
}

/// Estimate the cost of travel between two locations.
///
/// An unrecognized class falls back to Economy pricing.
pub fn calculate_travel_cost(origin: &str, destination: &str, travel_class: &str) -> String {
    let class = travel_class
        .parse::<TravelClass>()
        .unwrap_or(TravelClass::Economy);
    let multiplier = rand::thread_rng().gen_range(0.8..1.5);
    let cost = class.base_cost() * multiplier;

    format!("Estimated {class} class travel from {origin} to {destination}: ${cost:.2}")
}

/// List canned recommendations for a location.
///
/// Unknown categories produce the header with no entries.
pub fn get_recommendations(location: &str, category: &str) -> String {
    let mut out = format!("Top {category} in {location}:");
    if let Ok(cat) = category.parse::<RecommendationCategory>() {
        for entry in cat.entries() {
            out.push_str("\n- ");
            out.push_str(entry);
        }
    }
    out
}

/// The `weather_lookup` tool. Uses live data when an API key is present.
pub fn weather_tool(weather_api_key: Option<String>) -> AgentTool {
    AgentTool::new(
        "weather_lookup",
        "Get current weather information for a specific city",
        ToolParameters::object()
            .string("city", "The city name to get weather for", true)
            .string("country", "The country code (optional)", false)
            .build(),
        move |args| {
            let api_key = weather_api_key.clone();
            async move {
                let city = args.get_str("city")?.trim().to_string();
                if city.is_empty() {
                    return Err(WayfareError::ToolExecution {
                        tool_name: "weather_lookup".into(),
                        message: "city must not be empty".into(),
                    });
                }
                let country = args.get_str_opt("country").map(str::to_string);

                let report = match api_key {
                    Some(key) => fetch_weather(&key, &city, country.as_deref())
                        .await
                        .map_err(|e| WayfareError::ToolExecution {
                            tool_name: "weather_lookup".into(),
                            message: format!(
                                "Unable to fetch weather for {city}: {e}. Please try again later."
                            ),
                        })?,
                    None => mock_weather(&city),
                };

                Ok(serde_json::Value::String(report))
            }
        },
    )
}

/// The `travel_cost_calculator` tool.
pub fn cost_tool() -> AgentTool {
    AgentTool::new(
        "travel_cost_calculator",
        "Calculate approximate travel costs between locations",
        ToolParameters::object()
            .string("origin", "Origin city and country", true)
            .string("destination", "Destination city and country", true)
            .string_enum(
                "travel_class",
                "Cabin class for the estimate",
                &["Economy", "Business", "First"],
                false,
            )
            .build(),
        |args| async move {
            let origin = args.get_str("origin")?.to_string();
            let destination = args.get_str("destination")?.to_string();
            let class = args.get_str_opt("travel_class").unwrap_or("Economy").to_string();
            Ok(serde_json::Value::String(calculate_travel_cost(
                &origin,
                &destination,
                &class,
            )))
        },
    )
}

/// The `destination_recommendations` tool.
pub fn recommendations_tool() -> AgentTool {
    AgentTool::new(
        "destination_recommendations",
        "Get recommendations for attractions, restaurants, or hotels",
        ToolParameters::object()
            .string("location", "City and country for recommendations", true)
            .string_enum(
                "category",
                "Type of recommendation",
                &["attractions", "restaurants", "hotels"],
                true,
            )
            .build(),
        |args| async move {
            let location = args.get_str("location")?.to_string();
            let category = args.get_str("category")?.to_string();
            Ok(serde_json::Value::String(get_recommendations(
                &location, &category,
            )))
        },
    )
}

/// Registry holding all three travel tools.
pub fn travel_registry(weather_api_key: Option<String>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    // Names are unique by construction; registration cannot fail here.
    let _ = registry.register(Box::new(weather_tool(weather_api_key)));
    let _ = registry.register(Box::new(cost_tool()));
    let _ = registry.register(Box::new(recommendations_tool()));
    registry
}
