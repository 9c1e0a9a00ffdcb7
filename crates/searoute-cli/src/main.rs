use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use searoute_lib::{
    plan_route, Cell, Grid, ObjectiveWeights, OptimizerConfig, RouteAlgorithm, RouteRequest,
    RoutingSession, SafetyLayer, SearchOptions, VesselConfig, WeatherField, WeatherPattern,
};
use searoute_cli::logging::{init_logging, LogFormat};
use searoute_cli::output::{
    render_comparison, render_optimization, render_route, render_weather, OutputFormat,
};
use searoute_cli::terminal::ColorPalette;

#[derive(Parser, Debug)]
#[command(author, version, about = "Grid-based vessel route planning")]
struct Cli {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Log line format (logs go to stderr).
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Write the report to a file instead of stdout.
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Options that shape the simulated ocean.
#[derive(Args, Debug)]
struct ScenarioArgs {
    /// Grid width in cells.
    #[arg(long, default_value_t = 100, global = true)]
    width: usize,

    /// Grid height in cells.
    #[arg(long, default_value_t = 100, global = true)]
    height: usize,

    /// Cell edge length in kilometers.
    #[arg(long, default_value_t = searoute_lib::DEFAULT_CELL_SIZE_KM, global = true)]
    cell_size: f64,

    /// Generated weather regime.
    #[arg(long, value_enum, default_value_t = WeatherChoice::Moderate, global = true)]
    weather: WeatherChoice,

    /// Storm as `x,y,radius,intensity`; may be repeated.
    #[arg(long = "storm", global = true)]
    storms: Vec<Storm>,

    /// Overlay the bundled pirate, military and shallow-water zones.
    #[arg(long, global = true)]
    safety: bool,

    /// Vessel speed in knots.
    #[arg(long, global = true)]
    speed: Option<f64>,

    /// Calm-water fuel burn in tons per nautical mile.
    #[arg(long, global = true)]
    fuel_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WeatherChoice {
    None,
    Calm,
    Moderate,
    Stormy,
}

impl WeatherChoice {
    fn pattern(self) -> Option<WeatherPattern> {
        match self {
            WeatherChoice::None => None,
            WeatherChoice::Calm => Some(WeatherPattern::Calm),
            WeatherChoice::Moderate => Some(WeatherPattern::Moderate),
            WeatherChoice::Stormy => Some(WeatherPattern::Stormy),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find a route with one algorithm.
    Route {
        #[arg(long = "from")]
        from: Coord,
        #[arg(long = "to")]
        to: Coord,
        /// dijkstra, a-star, weather-aware, fuel-optimized or bidirectional.
        #[arg(long, default_value_t = RouteAlgorithm::AStar)]
        algorithm: RouteAlgorithm,
        /// Restrict moves to the four axis directions.
        #[arg(long)]
        orthogonal: bool,
    },
    /// Run every algorithm between two cells and tabulate the results.
    Compare {
        #[arg(long = "from")]
        from: Coord,
        #[arg(long = "to")]
        to: Coord,
    },
    /// Search for a multi-objective route with the genetic optimizer.
    Optimize {
        #[arg(long = "from")]
        from: Coord,
        #[arg(long = "to")]
        to: Coord,
        #[arg(long, default_value_t = 0.25)]
        distance_weight: f64,
        #[arg(long, default_value_t = 0.35)]
        fuel_weight: f64,
        #[arg(long, default_value_t = 0.25)]
        safety_weight: f64,
        #[arg(long, default_value_t = 0.15)]
        time_weight: f64,
        #[arg(long)]
        population: Option<usize>,
        #[arg(long)]
        generations: Option<usize>,
        /// Random seed; runs with the same seed are identical.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the weather at one cell.
    Weather {
        #[arg(long)]
        at: Coord,
    },
}

/// Grid coordinate parsed from `x,y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Coord {
    x: i32,
    y: i32,
}

impl Coord {
    fn tuple(self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn cell(self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y] = parts.as_slice() else {
            return Err(format!("expected 'x,y', got '{s}'"));
        };
        let x = x.parse().map_err(|_| format!("invalid x coordinate '{x}'"))?;
        let y = y.parse().map_err(|_| format!("invalid y coordinate '{y}'"))?;
        Ok(Coord { x, y })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Storm {
    x: i32,
    y: i32,
    radius: i32,
    intensity: f64,
}

impl FromStr for Storm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, radius, intensity] = parts.as_slice() else {
            return Err(format!("expected 'x,y,radius,intensity', got '{s}'"));
        };
        let storm = Storm {
            x: x.parse().map_err(|_| format!("invalid storm x '{x}'"))?,
            y: y.parse().map_err(|_| format!("invalid storm y '{y}'"))?,
            radius: radius
                .parse()
                .map_err(|_| format!("invalid storm radius '{radius}'"))?,
            intensity: intensity
                .parse()
                .map_err(|_| format!("invalid storm intensity '{intensity}'"))?,
        };
        if storm.radius < 0 || !storm.intensity.is_finite() || storm.intensity < 0.0 {
            return Err(format!("storm radius and intensity must be non-negative: '{s}'"));
        }
        Ok(storm)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let session = build_session(&cli.scenario)?;
    let palette = match (&cli.output, cli.format) {
        (None, OutputFormat::Text) => ColorPalette::detect(),
        _ => ColorPalette::plain(),
    };

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match cli.command {
        Command::Route {
            from,
            to,
            algorithm,
            orthogonal,
        } => handle_route(
            &session,
            &mut writer,
            RouteRequest::new(from.tuple(), to.tuple(), algorithm),
            orthogonal,
            cli.format,
            &palette,
        )?,
        Command::Compare { from, to } => {
            handle_compare(&session, &mut writer, from, to, cli.format, &palette)?
        }
        Command::Optimize {
            from,
            to,
            distance_weight,
            fuel_weight,
            safety_weight,
            time_weight,
            population,
            generations,
            seed,
        } => {
            let weights =
                ObjectiveWeights::new(distance_weight, fuel_weight, safety_weight, time_weight);
            let mut config = OptimizerConfig::default();
            if let Some(population) = population {
                config.population_size = population;
            }
            if let Some(generations) = generations {
                config.generations = generations;
            }
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            handle_optimize(
                &session,
                &mut writer,
                from,
                to,
                &weights,
                config,
                cli.format,
                &palette,
            )?
        }
        Command::Weather { at } => {
            handle_weather(&session, &mut writer, at, cli.format, &palette)?
        }
    }

    writer.flush().context("failed to flush output")?;
    if let Some(path) = &cli.output {
        tracing::info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn build_session(args: &ScenarioArgs) -> Result<RoutingSession> {
    let defaults = VesselConfig::default();
    let vessel = VesselConfig {
        speed_knots: args.speed.unwrap_or(defaults.speed_knots),
        base_fuel_rate: args.fuel_rate.unwrap_or(defaults.base_fuel_rate),
    };

    let mut session = match args.weather.pattern() {
        Some(pattern) => RoutingSession::sample(args.width, args.height, args.cell_size, pattern),
        None => {
            let mut grid = Grid::new(args.width, args.height, args.cell_size)?;
            grid.create_sample_ocean();
            Ok(RoutingSession::new(grid))
        }
    }
    .context("failed to build the ocean grid")?
    .with_vessel(vessel)
    .context("invalid vessel settings")?;

    if !args.storms.is_empty() {
        if session.weather().is_none() {
            let still = WeatherField::new(session.grid());
            session.set_weather(still);
        }
        if let Some(weather) = session.weather_mut() {
            for storm in &args.storms {
                weather.add_storm(storm.x, storm.y, storm.radius, storm.intensity);
                tracing::debug!(?storm, "storm added");
            }
        }
        session.refresh_weather();
    }

    if args.safety {
        let layer = SafetyLayer::realistic_scenario(session.grid());
        tracing::debug!(zones = layer.zones().len(), "applying safety zones");
        session.apply_safety(layer);
    }

    Ok(session)
}

fn handle_route<W: Write>(
    session: &RoutingSession,
    writer: &mut W,
    request: RouteRequest,
    orthogonal: bool,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let mut request = request.with_vessel(*session.vessel());
    request.options = SearchOptions {
        allow_diagonal: !orthogonal,
    };
    let field = session
        .weather()
        .map(|w| w as &dyn searoute_lib::CostField);

    let result = plan_route(session.grid(), field, &request)
        .with_context(|| format!("failed to plan a {} route", request.algorithm))?;
    render_route(writer, &result, session.safety(), format, palette)
        .context("failed to write route")
}

fn handle_compare<W: Write>(
    session: &RoutingSession,
    writer: &mut W,
    from: Coord,
    to: Coord,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let router = session.router();
    let start = from.cell();
    let goal = to.cell();

    let mut results = router
        .compare(&start, &goal)
        .context("failed to compare algorithms")?;
    if let Some(result) = router
        .bidirectional(&start, &goal)
        .context("bidirectional search failed")?
    {
        results.insert(RouteAlgorithm::Bidirectional, result);
    }
    render_comparison(writer, &results, session.safety(), format, palette)
        .context("failed to write comparison")
}

#[allow(clippy::too_many_arguments)]
fn handle_optimize<W: Write>(
    session: &RoutingSession,
    writer: &mut W,
    from: Coord,
    to: Coord,
    weights: &ObjectiveWeights,
    config: OptimizerConfig,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let mut optimizer = session
        .optimizer(config)
        .context("invalid optimizer settings")?;
    let route = optimizer
        .optimize(&from.cell(), &to.cell(), weights)
        .context("optimization failed")?;
    render_optimization(
        writer,
        &route,
        weights,
        optimizer.history(),
        session.safety(),
        format,
        palette,
    )
    .context("failed to write optimization report")
}

fn handle_weather<W: Write>(
    session: &RoutingSession,
    writer: &mut W,
    at: Coord,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let Some(weather) = session.weather() else {
        bail!("no weather field; rerun with --weather calm, moderate or stormy");
    };
    let (_, cell) = session
        .grid()
        .resolve(&at.cell())
        .with_context(|| format!("({}, {}) is outside the grid", at.x, at.y))?;
    render_weather(writer, weather, &cell, format, palette).context("failed to write weather")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinates() {
        assert_eq!("3,4".parse::<Coord>(), Ok(Coord { x: 3, y: 4 }));
        assert_eq!(" 10 , -2 ".parse::<Coord>(), Ok(Coord { x: 10, y: -2 }));
        assert!("3".parse::<Coord>().is_err());
        assert!("a,b".parse::<Coord>().is_err());
        assert!("1,2,3".parse::<Coord>().is_err());
    }

    #[test]
    fn parses_storms() {
        let storm: Storm = "20,30,8,2.5".parse().unwrap();
        assert_eq!(storm.radius, 8);
        assert_eq!(storm.intensity, 2.5);
        assert!("20,30,-1,2.5".parse::<Storm>().is_err());
        assert!("20,30,8".parse::<Storm>().is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
