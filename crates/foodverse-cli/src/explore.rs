//! The `explore` command: nearby search followed by the local filter and sort
//! pipeline.

use chrono::Local;
use clap::{Args, ValueEnum};
use foodverse_client::{DiscoverySession, NearbyQuery, SearchOutcome};
use foodverse_core::{
    resolve_location, Availability, Coordinate, EnvLocation, FilterCriteria, FilterState,
    FixedLocation, LocationProvider, LocationSource, SettingsPatch, SortKey,
};

use crate::output::print_listings;
use crate::Context;

/// Starting point for the filter criteria before flags are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// Within 5 km and at least 50% off
    #[default]
    Explore,
    /// No distance or discount limit
    All,
}

impl Preset {
    fn criteria(self) -> FilterCriteria {
        match self {
            Preset::Explore => FilterCriteria::explore(),
            Preset::All => FilterCriteria::default(),
        }
    }
}

#[derive(Debug, Args)]
pub struct ExploreArgs {
    /// Search latitude; defaults to FOODVERSE_LAT, then the fallback location
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Search longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,
    /// Server-side search radius in km
    #[arg(long)]
    pub radius: Option<f64>,
    /// Server-side category ("All" for none)
    #[arg(long, default_value = "All")]
    pub category: String,
    /// Text to match against name, description, address and tags
    #[arg(long, short)]
    pub query: Option<String>,
    #[arg(long)]
    pub max_distance: Option<f64>,
    #[arg(long)]
    pub min_discount: Option<u8>,
    /// Keep only listings in these categories (repeatable)
    #[arg(long = "filter-category")]
    pub filter_categories: Vec<String>,
    /// Keep only these pickup windows (repeatable)
    #[arg(long = "available")]
    pub availability: Vec<Availability>,
    #[arg(long, default_value_t = SortKey::Distance)]
    pub sort: SortKey,
    #[arg(long, value_enum, default_value_t = Preset::Explore)]
    pub preset: Preset,
    /// Highest food-bag price sent to the server
    #[arg(long)]
    pub max_price: Option<f64>,
    #[arg(long)]
    pub min_price: Option<f64>,
    /// Print listings as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ExploreArgs {
    /// Applies the preset and then each flag to a filter state.
    pub(crate) fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new(self.preset.criteria());
        {
            let criteria = state.criteria_mut();
            if let Some(query) = &self.query {
                criteria.query = query.trim().to_string();
            }
            if let Some(max) = self.max_distance {
                criteria.max_distance_km = max;
            }
            if let Some(min) = self.min_discount {
                criteria.min_discount_percent = min.min(100);
            }
            criteria.sort_key = self.sort;
        }
        for category in &self.filter_categories {
            state.toggle_category(category);
        }
        for availability in &self.availability {
            state.toggle_availability(*availability);
        }
        state
    }

    fn location_provider(&self) -> Box<dyn LocationProvider> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Box::new(FixedLocation(Coordinate::new(lat, lng))),
            _ => Box::new(EnvLocation),
        }
    }
}

pub(crate) async fn run_explore(ctx: &Context, args: &ExploreArgs) -> anyhow::Result<()> {
    let settings = ctx.settings.load()?;
    let fallback = settings
        .last_location
        .unwrap_or(ctx.config.fallback_location);
    let provider = args.location_provider();
    let location = resolve_location(provider.as_ref(), fallback);

    if location.source == LocationSource::Device && settings.last_location != Some(location.coordinate)
    {
        ctx.settings.save(SettingsPatch {
            last_location: Some(location.coordinate),
            ..SettingsPatch::default()
        })?;
    }

    let radius = args.radius.unwrap_or(ctx.config.search_radius_km);
    let mut query = NearbyQuery::new(location.coordinate, radius).with_category(&args.category);
    query.max_price = args.max_price;
    query.min_price = args.min_price;

    let session = DiscoverySession::new();
    let nearby = match session.search(&ctx.client, &query).await? {
        SearchOutcome::Fresh(nearby) => nearby,
        SearchOutcome::Stale => anyhow::bail!("search was superseded before it completed"),
    };
    for failure in &nearby.failures {
        eprintln!("warning: could not load {}: {}", failure.resource, failure.message);
    }

    let state = args.filter_state();
    let listings = state.apply(&nearby.listings(&Local::now()));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    let source = match location.source {
        LocationSource::Device => "your location",
        LocationSource::Fallback => "default location",
    };
    println!(
        "{} result(s) near {} ({source}), sorted by {}",
        listings.len(),
        location.coordinate,
        state.criteria().sort_key
    );
    if listings.is_empty() {
        if state.is_modified() || args.preset == Preset::Explore {
            println!("nothing matches; try --preset all or fewer filters");
        }
        return Ok(());
    }
    print_listings(&listings);
    Ok(())
}
