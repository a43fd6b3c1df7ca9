//! Plan command implementation for the Roadside CLI.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use geo::Coord;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roadside_core::{
    CorridorConfig, CorridorWidth, Epoch, PriceLevel, ResultFilters, ResultView, ScoringProgress,
    SearchConfig, SearchRange, validate_location,
};
use roadside_data::{
    DEFAULT_BASE_URL, HttpDirectionsProvider, HttpPlaceSearchProvider, HttpProviderConfig,
    ProviderBuildError,
};
use roadside_scorer::{DetourSession, ScorerConfig, SessionConfig};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BASE_URL, ARG_BATCH_SIZE, ARG_CORRIDOR_MILES, ARG_DESTINATION, ARG_KEYWORD, ARG_LOAD_MORE,
    ARG_MAX_CANDIDATES, ARG_MAX_PRICE, ARG_MIN_PRICE, ARG_ORIGIN, ARG_RADIUS_M,
    ARG_SAMPLE_SPACING_KM, ARG_TIMEOUT_SECS, CliError, ENV_DESTINATION, ENV_ORIGIN,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch the direct route between two points, search for \
                 restaurants along it and rank each by the driving time a \
                 detour through it adds. Results are printed as JSON.",
    about = "Rank restaurant detours along a drive"
)]
#[ortho_config(prefix = "ROADSIDE")]
pub(crate) struct PlanArgs {
    /// Trip start as `lat,lng`.
    #[arg(long = ARG_ORIGIN, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// Trip end as `lat,lng`.
    #[arg(long = ARG_DESTINATION, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) destination: Option<String>,
    /// Corridor half-width in miles, between 1 and 6.
    #[arg(long = ARG_CORRIDOR_MILES, value_name = "miles")]
    #[serde(default)]
    pub(crate) corridor_miles: Option<f64>,
    /// Distance between search points along the route.
    #[arg(long = ARG_SAMPLE_SPACING_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) sample_spacing_km: Option<f64>,
    /// Candidates scored per pass.
    #[arg(long = ARG_MAX_CANDIDATES, value_name = "count")]
    #[serde(default)]
    pub(crate) max_candidates: Option<usize>,
    /// Concurrent detour requests per batch.
    #[arg(long = ARG_BATCH_SIZE, value_name = "count")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
    /// Search radius around each search point, clamped to 500..=8000.
    #[arg(long = ARG_RADIUS_M, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius_m: Option<u32>,
    /// Only show results whose name or category contains this text.
    #[arg(long = ARG_KEYWORD, value_name = "text")]
    #[serde(default)]
    pub(crate) keyword: Option<String>,
    /// Lowest price level to show (0 to 4).
    #[arg(long = ARG_MIN_PRICE, value_name = "level")]
    #[serde(default)]
    pub(crate) min_price: Option<u8>,
    /// Highest price level to show (0 to 4).
    #[arg(long = ARG_MAX_PRICE, value_name = "level")]
    #[serde(default)]
    pub(crate) max_price: Option<u8>,
    /// Base URL for the places and directions services.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-request timeout.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Extra passes over candidates left unscored by the first pass.
    #[arg(long = ARG_LOAD_MORE, value_name = "passes")]
    #[serde(default)]
    pub(crate) load_more: Option<u32>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    pub(crate) origin: Coord<f64>,
    pub(crate) destination: Coord<f64>,
    pub(crate) session: SessionConfig,
    pub(crate) filters: ResultFilters,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) load_more: u32,
}

impl PlanConfig {
    fn http(&self) -> HttpProviderConfig {
        HttpProviderConfig::new(self.base_url.clone()).with_timeout(self.timeout)
    }

    fn build_error(&self, source: ProviderBuildError) -> CliError {
        CliError::BuildProvider {
            base_url: self.base_url.clone(),
            source,
        }
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let origin = parse_location(args.origin.as_deref(), ARG_ORIGIN, ENV_ORIGIN)?;
        let destination =
            parse_location(args.destination.as_deref(), ARG_DESTINATION, ENV_DESTINATION)?;

        let mut corridor = CorridorConfig::default();
        if let Some(miles) = args.corridor_miles {
            corridor.width = CorridorWidth::from_miles(miles)?;
        }
        if let Some(km) = args.sample_spacing_km {
            corridor.sample_spacing_km = km;
        }
        if let Some(max) = args.max_candidates {
            corridor.max_candidates = max;
        }
        corridor.validate()?;

        let scorer = args
            .batch_size
            .map_or_else(ScorerConfig::default, ScorerConfig::new);
        scorer.validate()?;

        let search = args
            .radius_m
            .map_or_else(SearchConfig::default, |radius| {
                SearchConfig::default().with_range(SearchRange::Radius(radius))
            });

        let min_price = parse_price(args.min_price, ARG_MIN_PRICE)?;
        let max_price = parse_price(args.max_price, ARG_MAX_PRICE)?;
        let mut filters = ResultFilters::default().with_price_range(min_price, max_price);
        if let Some(keyword) = args.keyword {
            filters = filters.with_keyword(keyword);
        }

        Ok(Self {
            origin,
            destination,
            session: SessionConfig {
                corridor,
                search,
                scorer,
            },
            filters,
            base_url: args.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            load_more: args.load_more.unwrap_or(0),
        })
    }
}

/// Parse `lat,lng` into a validated coordinate.
pub(crate) fn parse_location(
    raw: Option<&str>,
    field: &'static str,
    env: &'static str,
) -> Result<Coord<f64>, CliError> {
    let raw = raw.ok_or(CliError::MissingArgument { field, env })?;
    let malformed = || CliError::MalformedCoordinate {
        field,
        value: raw.to_owned(),
    };
    let (lat, lng) = raw.split_once(',').ok_or_else(malformed)?;
    let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
    let lng: f64 = lng.trim().parse().map_err(|_| malformed())?;
    validate_location(Coord { x: lng, y: lat })
        .map_err(|source| CliError::InvalidLocation { field, source })
}

fn parse_price(raw: Option<u8>, field: &'static str) -> Result<Option<PriceLevel>, CliError> {
    raw.map(PriceLevel::new)
        .transpose()
        .map_err(|source| CliError::InvalidPrice { field, source })
}

/// What the `plan` command prints.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PlanReport {
    pub(crate) epoch: Epoch,
    pub(crate) baseline_secs: u64,
    pub(crate) samples: usize,
    pub(crate) discovered: usize,
    pub(crate) in_corridor: usize,
    pub(crate) scored: usize,
    pub(crate) failed: usize,
    pub(crate) progress: ScoringProgress,
    #[serde(flatten)]
    pub(crate) view: ResultView,
}

pub(super) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let report = runtime.block_on(execute_plan(&config))?;
    let mut stdout = std::io::stdout().lock();
    write_report(&mut stdout, &report)
}

/// Plan the configured trip against the HTTP collaborators.
pub(crate) async fn execute_plan(config: &PlanConfig) -> Result<PlanReport, CliError> {
    let http = config.http();
    let search =
        HttpPlaceSearchProvider::with_config(http.clone()).map_err(|err| config.build_error(err))?;
    let directions =
        HttpDirectionsProvider::with_config(http).map_err(|err| config.build_error(err))?;
    let session = DetourSession::new(search, directions, config.session.clone());

    let summary = session.plan(config.origin, config.destination).await?;
    let mut scored = summary.pass.scored;
    let mut failed = summary.pass.failed;
    for round in 0..config.load_more {
        let more = session.load_more().await?;
        if more.queued == 0 {
            info!("no candidates left after {round} extra passes");
            break;
        }
        scored += more.scored;
        failed += more.failed;
    }

    Ok(PlanReport {
        epoch: summary.epoch,
        baseline_secs: summary.baseline_secs,
        samples: summary.samples,
        discovered: summary.discovered,
        in_corridor: summary.in_corridor,
        scored,
        failed,
        progress: session.snapshot().progress,
        view: session.view(&config.filters),
    })
}

pub(crate) fn write_report(writer: &mut dyn Write, report: &PlanReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteReport)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
