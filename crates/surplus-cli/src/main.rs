mod display;

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use surplus_api::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, HttpClient};
use surplus_core::{EntityId, MealType, PredictionRequest, Weather};
use surplus_view::selection::ROUTE_SURPLUS_DEFAULT_KG;
use surplus_view::{MatchCoordinator, MatchOutcome, OperatorView, ResponsePolicy};
use tracing_subscriber::EnvFilter;

use display::{
    DashboardCard, HistoryCard, NgoList, OutcomeLog, PredictionCard, RestaurantList, RouteCard,
};

#[derive(Parser)]
#[command(
    name = "surplus",
    version,
    about = "Operator console for surplus food prediction and NGO matching",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the matching service, including the /api prefix
    #[arg(long, global = true, env = "SURPLUS_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "SURPLUS_API_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Apply every response in arrival order, even after a newer selection
    #[arg(long, global = true)]
    arrival_order: bool,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List registered restaurants
    Restaurants,

    /// List registered NGOs
    Ngos,

    /// Show illustrative routes (25 kg within 15 km) for one or more restaurants
    Map {
        /// Restaurant id; repeat to re-select in quick succession
        #[arg(long, required = true, num_args = 1..)]
        restaurant: Vec<EntityId>,

        /// Print the route layer as GeoJSON
        #[arg(long)]
        geojson: bool,
    },

    /// Plan a delivery route for a chosen surplus
    Route {
        #[arg(long)]
        restaurant: EntityId,

        /// Surplus in kg, clamped to 5..=100
        #[arg(long, default_value_t = ROUTE_SURPLUS_DEFAULT_KG)]
        surplus: f64,

        #[arg(long)]
        geojson: bool,
    },

    /// Predict surplus and match it to nearby NGOs
    Predict(PredictArgs),

    /// Show a restaurant's prediction history and accuracy
    History {
        #[arg(long)]
        restaurant: EntityId,
    },

    /// Show service-wide totals
    Dashboard,
}

#[derive(Args)]
struct PredictArgs {
    #[arg(long)]
    restaurant: EntityId,

    /// Waste recorded for the previous comparable service, in kg
    #[arg(long)]
    previous_waste: f64,

    /// Day of week, 0 = Sunday [default: today]
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=6))]
    day: Option<u8>,

    /// breakfast, lunch or dinner
    #[arg(long)]
    meal: Option<MealType>,

    /// sunny, rainy or cloudy
    #[arg(long)]
    weather: Option<Weather>,

    #[arg(long)]
    special_event: bool,

    #[arg(long)]
    customers: Option<u32>,

    /// Degrees Celsius
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,
}

impl PredictArgs {
    fn into_request(self) -> PredictionRequest {
        let mut request = PredictionRequest::with_defaults(self.restaurant, self.previous_waste);
        if let Some(day) = self.day {
            request.day_of_week = day;
        }
        if let Some(meal) = self.meal {
            request.meal_type = meal;
        }
        if let Some(weather) = self.weather {
            request.weather = weather;
        }
        if let Some(customers) = self.customers {
            request.customer_count = customers;
        }
        if let Some(temperature) = self.temperature {
            request.temperature = temperature;
        }
        request.special_event = self.special_event;
        request
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("surplus v{}", env!("CARGO_PKG_VERSION"));

    let config = ApiConfig::new(cli.api_url.as_str(), cli.timeout);
    let client = HttpClient::new(config).context("invalid service configuration")?;
    let policy = if cli.arrival_order {
        ResponsePolicy::ArrivalOrder
    } else {
        ResponsePolicy::LatestSelection
    };
    let mut view = OperatorView::new(Arc::new(client), policy);

    match cli.command {
        Command::Restaurants => {
            view.activate().await;
            print!("{}", RestaurantList(view.cache.restaurants()));
        }

        Command::Ngos => {
            view.activate().await;
            print!("{}", NgoList(view.cache.ngos()));
        }

        Command::Map {
            restaurant,
            geojson,
        } => {
            view.activate().await;
            if let [id] = restaurant.as_slice() {
                view.show_routes(id).await?;
            } else {
                let outcomes = view.show_routes_rapidly(&restaurant).await?;
                print!("{}", OutcomeLog(&outcomes));
                println!();
            }
            print_routes(&view, &view.map, geojson)?;
        }

        Command::Route {
            restaurant,
            surplus,
            geojson,
        } => {
            view.activate().await;
            view.plan_route(&restaurant, surplus).await?;
            print_routes(&view, &view.planner, geojson)?;
        }

        Command::Predict(args) => {
            let outcome = view.predict(args.into_request()).await?;
            print!("{}", PredictionCard(&outcome));
        }

        Command::History { restaurant } => {
            view.activate().await;
            let summary = view.open_history(&restaurant).await?;
            let selected = view
                .cache
                .restaurant(&restaurant)
                .with_context(|| format!("restaurant {restaurant} not loaded"))?;
            print!(
                "{}",
                HistoryCard {
                    restaurant: selected,
                    logs: view.history.logs(),
                    summary: &summary,
                }
            );
        }

        Command::Dashboard => match view.refresh_dashboard().await {
            Some(stats) => print!("{}", DashboardCard(stats)),
            None => println!("Dashboard unavailable; is the service running at {}?", cli.api_url),
        },
    }

    Ok(())
}

/// Print the shown match of `coordinator` as a card or GeoJSON, or the
/// empty-result notice when nothing has been shown.
fn print_routes(
    view: &OperatorView,
    coordinator: &MatchCoordinator,
    geojson: bool,
) -> anyhow::Result<()> {
    let layer = coordinator.routes(view.cache.ngos());
    match (coordinator.last_match(), layer) {
        (Some(shown), Some(layer)) => {
            if coordinator.last_outcome() == Some(MatchOutcome::NoMatches) {
                println!("{}", display::no_matches_notice());
                println!("Showing the previous result.");
                println!();
            }
            if geojson {
                let json = serde_json::to_string_pretty(&layer.to_geojson())
                    .context("serializing route layer")?;
                println!("{json}");
            } else {
                print!("{}", RouteCard { shown, layer: &layer });
            }
        }
        _ => match coordinator.last_outcome() {
            Some(MatchOutcome::Failed) => {
                anyhow::bail!("match request failed, see log for details")
            }
            _ => println!("{}", display::no_matches_notice()),
        },
    }
    Ok(())
}
