//! Report rendering for the CLI.
//!
//! Every renderer writes to an `impl Write` so the binary can target stdout
//! or a file, and tests can capture into a `Vec<u8>`.

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use searoute_lib::safety::DEFAULT_MAX_ROUTE_RISK;
use searoute_lib::{
    Cell, CostField, GenerationStats, ObjectiveWeights, Route, RouteAlgorithm, RouteResult,
    SafetyAssessment, SafetyLayer, WeatherField, WeatherSample,
};

use crate::terminal::ColorPalette;

/// Report format on stdout or `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Paths longer than this are abbreviated in text output.
const MAX_TEXT_WAYPOINTS: usize = 12;

/// Compass headings sampled by the weather report, in degrees.
const COMPASS_HEADINGS: [(&str, f64); 4] = [("E", 0.0), ("N", 90.0), ("W", 180.0), ("S", 270.0)];

fn format_path(path: &[Cell]) -> String {
    let coords: Vec<String> = path.iter().map(|c| format!("({},{})", c.x, c.y)).collect();
    if coords.len() <= MAX_TEXT_WAYPOINTS {
        return coords.join(" -> ");
    }
    let head = &coords[..MAX_TEXT_WAYPOINTS / 2];
    let tail = &coords[coords.len() - MAX_TEXT_WAYPOINTS / 2..];
    format!(
        "{} -> ... ({} more) ... -> {}",
        head.join(" -> "),
        coords.len() - MAX_TEXT_WAYPOINTS,
        tail.join(" -> ")
    )
}

fn write_json<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> io::Result<()> {
    searoute_lib::write_json(writer, value).map_err(io::Error::other)
}

/// A route result plus its zone assessment when a safety layer is active.
#[derive(Serialize)]
struct RouteReport<'a> {
    #[serde(flatten)]
    result: &'a RouteResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety: Option<SafetyAssessment>,
}

impl<'a> RouteReport<'a> {
    fn new(result: &'a RouteResult, layer: Option<&SafetyLayer>) -> Self {
        let safety = layer
            .filter(|_| !result.is_empty())
            .map(|layer| layer.assess(&result.path));
        Self { result, safety }
    }
}

fn write_safety<W: Write>(
    writer: &mut W,
    assessment: &SafetyAssessment,
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    let (color, verdict) = if assessment.safe {
        (p.good, "safe".to_string())
    } else {
        (p.bad, format!("exceeds max risk {DEFAULT_MAX_ROUTE_RISK:.2}"))
    };
    writeln!(
        writer,
        "  {}zone safety:{} {:.1}% (peak risk {:.2}, {}{}{})",
        p.muted,
        p.reset,
        assessment.score * 100.0,
        assessment.peak_risk,
        color,
        verdict,
        p.reset
    )
}

/// Render a single route search.
///
/// With a safety layer, the zone assessment of the path is included.
pub fn render_route<W: Write>(
    writer: &mut W,
    result: &RouteResult,
    safety: Option<&SafetyLayer>,
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    let report = RouteReport::new(result, safety);
    if format == OutputFormat::Json {
        return write_json(writer, &report);
    }

    let p = palette;
    writeln!(
        writer,
        "{}Route ({}){}",
        p.heading,
        result.algorithm.label(),
        p.reset
    )?;
    if result.is_empty() {
        writeln!(writer, "  {}No route found{}", p.bad, p.reset)?;
        writeln!(
            writer,
            "  {}nodes explored:{} {}",
            p.muted, p.reset, result.nodes_explored
        )?;
        return Ok(());
    }

    let rows = [
        ("distance", format!("{:.2} km", result.distance_km)),
        ("fuel", format!("{:.2} t", result.fuel_tons)),
        ("time", format!("{:.2} h", result.time_hours)),
        ("cost", format!("{:.2}", result.cost)),
        ("hops", result.hop_count().to_string()),
        ("nodes explored", result.nodes_explored.to_string()),
        (
            "computed in",
            format!("{:.2} ms", result.computation_time.as_secs_f64() * 1000.0),
        ),
    ];
    for (label, value) in rows {
        writeln!(
            writer,
            "  {}{:<15}{} {}{}{}",
            p.muted, label, p.reset, p.value, value, p.reset
        )?;
    }
    if let Some(assessment) = &report.safety {
        write_safety(writer, assessment, p)?;
    }
    writeln!(writer, "  {}path:{} {}", p.muted, p.reset, format_path(&result.path))?;
    Ok(())
}

/// Render one row per algorithm, best distance highlighted.
pub fn render_comparison<W: Write>(
    writer: &mut W,
    results: &BTreeMap<RouteAlgorithm, RouteResult>,
    safety: Option<&SafetyLayer>,
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        let keyed: BTreeMap<String, RouteReport<'_>> = results
            .iter()
            .map(|(algorithm, result)| (algorithm.to_string(), RouteReport::new(result, safety)))
            .collect();
        return write_json(writer, &keyed);
    }

    let p = palette;
    let shortest = results
        .values()
        .filter(|r| !r.is_empty())
        .map(|r| r.distance_km)
        .fold(f64::INFINITY, f64::min);

    write!(
        writer,
        "{}{:<20} {:>12} {:>10} {:>9} {:>8} {:>10}",
        p.heading, "algorithm", "distance km", "fuel t", "time h", "nodes", "ms"
    )?;
    if safety.is_some() {
        write!(writer, " {:>8}", "safety")?;
    }
    writeln!(writer, "{}", p.reset)?;
    for result in results.values() {
        if result.is_empty() {
            writeln!(
                writer,
                "{:<20} {}{:>12}{} {:>10} {:>9} {:>8} {:>10.2}",
                result.algorithm.label(),
                p.bad,
                "no route",
                p.reset,
                "-",
                "-",
                result.nodes_explored,
                result.computation_time.as_secs_f64() * 1000.0
            )?;
            continue;
        }
        let color = if result.distance_km <= shortest {
            p.good
        } else {
            p.value
        };
        write!(
            writer,
            "{:<20} {}{:>12.2}{} {:>10.2} {:>9.2} {:>8} {:>10.2}",
            result.algorithm.label(),
            color,
            result.distance_km,
            p.reset,
            result.fuel_tons,
            result.time_hours,
            result.nodes_explored,
            result.computation_time.as_secs_f64() * 1000.0
        )?;
        if let Some(assessment) = safety.map(|layer| layer.assess(&result.path)) {
            let color = if assessment.safe { p.good } else { p.bad };
            write!(
                writer,
                " {}{:>7.1}%{}",
                color,
                assessment.score * 100.0,
                p.reset
            )?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct OptimizationReport<'a> {
    route: &'a Route,
    weights: &'a ObjectiveWeights,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety: Option<SafetyAssessment>,
    history: &'a [GenerationStats],
}

/// Render the optimizer's best route with its weighting and per-generation
/// fitness history.
pub fn render_optimization<W: Write>(
    writer: &mut W,
    route: &Route,
    weights: &ObjectiveWeights,
    history: &[GenerationStats],
    safety: Option<&SafetyLayer>,
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    let assessment = safety.map(|layer| layer.assess(route.waypoints()));
    if format == OutputFormat::Json {
        let report = OptimizationReport {
            route,
            weights,
            safety: assessment,
            history,
        };
        return write_json(writer, &report);
    }

    let p = palette;
    writeln!(writer, "{}Optimized route{}", p.heading, p.reset)?;
    writeln!(
        writer,
        "  {}weights:{} distance {:.2}, fuel {:.2}, safety {:.2}, time {:.2}",
        p.muted, p.reset, weights.distance, weights.fuel, weights.safety, weights.time
    )?;
    let rows = [
        ("fitness", format!("{:.4}", route.fitness())),
        ("distance", format!("{:.2} km", route.distance_km())),
        ("fuel", format!("{:.2} t", route.fuel_tons())),
        ("safety", format!("{:.4}", route.safety())),
        ("time", format!("{:.2} h", route.time_hours())),
        ("waypoints", route.len().to_string()),
    ];
    for (label, value) in rows {
        writeln!(
            writer,
            "  {}{:<10}{} {}{}{}",
            p.muted, label, p.reset, p.value, value, p.reset
        )?;
    }
    if route.touches_land() {
        writeln!(writer, "  {}warning: route crosses land{}", p.bad, p.reset)?;
    }
    if let Some(assessment) = &assessment {
        write_safety(writer, assessment, p)?;
    }
    writeln!(
        writer,
        "  {}path:{} {}",
        p.muted,
        p.reset,
        format_path(route.waypoints())
    )?;
    if let (Some(first), Some(last)) = (history.first(), history.last()) {
        writeln!(
            writer,
            "  {}best fitness:{} {:.4} at generation {} -> {:.4} after {} generations",
            p.muted, p.reset, first.best_so_far, first.generation, last.best_so_far, last.generation
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct WeatherReport {
    x: i32,
    y: i32,
    #[serde(flatten)]
    sample: WeatherSample,
    penalties: BTreeMap<&'static str, f64>,
}

/// Render conditions at one cell and the penalty for leaving it in each
/// compass direction.
pub fn render_weather<W: Write>(
    writer: &mut W,
    field: &WeatherField,
    cell: &Cell,
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    let Some(sample) = field.weather_at(cell.x, cell.y) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no weather data at ({}, {})", cell.x, cell.y),
        ));
    };
    let penalties: BTreeMap<&'static str, f64> = COMPASS_HEADINGS
        .iter()
        .map(|(name, degrees)| (*name, field.weather_cost(cell, degrees.to_radians())))
        .collect();

    if format == OutputFormat::Json {
        let report = WeatherReport {
            x: cell.x,
            y: cell.y,
            sample,
            penalties,
        };
        return write_json(writer, &report);
    }

    let p = palette;
    writeln!(writer, "{}Weather at ({}, {}){}", p.heading, cell.x, cell.y, p.reset)?;
    let rows = [
        (
            "wind",
            format!(
                "{:.1} kts from {:.0} deg",
                sample.wind_speed,
                sample.wind_direction.to_degrees().rem_euclid(360.0)
            ),
        ),
        ("waves", format!("{:.2} m", sample.wave_height)),
        (
            "current",
            format!(
                "{:.2} kts toward {:.0} deg",
                sample.current_speed,
                sample.current_direction.to_degrees().rem_euclid(360.0)
            ),
        ),
    ];
    for (label, value) in rows {
        writeln!(
            writer,
            "  {}{:<8}{} {}{}{}",
            p.muted, label, p.reset, p.value, value, p.reset
        )?;
    }
    writeln!(writer, "  {}penalty by heading:{}", p.muted, p.reset)?;
    for (name, degrees) in COMPASS_HEADINGS {
        let penalty = penalties.get(name).copied().unwrap_or_default();
        writeln!(writer, "    {name} ({degrees:>3.0} deg): {penalty:.3}")?;
    }
    Ok(())
}
