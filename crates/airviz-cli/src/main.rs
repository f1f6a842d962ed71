// File: crates/airviz-cli/src/main.rs
// Summary: `airviz` CLI; loads a sensor CSV into a session and writes the chart views as SVG (and PNG with `skia`).

mod settings;

use std::io;
use std::path::{Path, PathBuf};

use airviz_core::drilldown::{available_days, available_months, available_years, drill_detail, drill_series, DrillFilter};
use airviz_core::types::{date_to_millis, DAY_MS};
use airviz_core::{
    pick_tick_granularity, BrushLineChart, Dataset, EngineConfig, Frame, Granularity, Layout, MultiLineChart,
    SelectionRegion, Session, StackedBarChart, ZoomableAreaChart,
};
use airviz_render::{render_svg_file, theme, Theme};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Air-quality time-series charts from sensor CSV exports", long_about = None)]
struct Cli {
    /// TOML configuration file (AIRVIZ_* environment variables override it)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Channels, imputed means, available dates and one day's snapshot
    Summary(SummaryArgs),
    /// Stacked bar charts of channel sums per day, week, month or weekday
    Stacked(StackedArgs),
    /// Zoomable step-area chart per channel
    Zoom(ZoomArgs),
    /// Daily-mean lines with a rectangular selection
    Brush(BrushArgs),
    /// Year/month/day drill-down of one channel
    Drill(DrillArgs),
    /// Daily-mean line per channel on one chart
    Lines(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Sensor CSV export
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Directory for rendered charts
    #[arg(short, long, default_value = "target/out", value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,

    /// Color theme (light, dark)
    #[arg(long, default_value = "light")]
    theme: String,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Date (as written in the file) to show; defaults to the first one
    #[arg(long)]
    date: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GranularityArg {
    Day,
    Week,
    Month,
    DayOfWeek,
    All,
}

impl GranularityArg {
    fn expand(self) -> Vec<Granularity> {
        match self {
            GranularityArg::Day => vec![Granularity::Day],
            GranularityArg::Week => vec![Granularity::Week],
            GranularityArg::Month => vec![Granularity::Month],
            GranularityArg::DayOfWeek => vec![Granularity::DayOfWeek],
            GranularityArg::All => vec![Granularity::Day, Granularity::Week, Granularity::Month, Granularity::DayOfWeek],
        }
    }
}

#[derive(Args, Debug)]
struct StackedArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(short, long, value_enum, default_value_t = GranularityArg::All)]
    granularity: GranularityArg,
}

#[derive(Args, Debug)]
struct ZoomArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Channels to chart (repeatable); defaults to the configured area channels
    #[arg(short, long)]
    channel: Vec<String>,

    /// Absolute zoom factor applied after the default zoom
    #[arg(long)]
    scale: Option<f64>,

    /// Zoom anchor in pixels; defaults to the plot center
    #[arg(long)]
    anchor: Option<f64>,

    /// Horizontal pan in pixels, applied last
    #[arg(long, allow_hyphen_values = true)]
    pan: Option<f64>,

    /// Start from the full extent instead of the configured default zoom
    #[arg(long, action = ArgAction::SetTrue)]
    no_default_zoom: bool,
}

#[derive(Args, Debug)]
struct BrushArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Selection start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Selection end date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Lower value bound
    #[arg(long, allow_hyphen_values = true)]
    min: Option<f64>,

    /// Upper value bound
    #[arg(long, allow_hyphen_values = true)]
    max: Option<f64>,
}

#[derive(Args, Debug)]
struct DrillArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(short, long)]
    channel: String,

    /// Defaults to the first year in the data
    #[arg(long)]
    year: Option<i32>,

    #[arg(long)]
    month: Option<u32>,

    #[arg(long)]
    day: Option<u32>,

    /// Drill point label to expand (e.g. "March", "Day 05", "07:00")
    #[arg(long)]
    detail: Option<String>,

    /// Channels paired for --detail
    #[arg(long, num_args = 2, value_names = ["X", "Y"], default_values = ["T", "AH"])]
    pair: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();

    let cfg = settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Summary(args) => handle_summary(cfg, args),
        Command::Stacked(args) => handle_stacked(cfg, args),
        Command::Zoom(args) => handle_zoom(cfg, args),
        Command::Brush(args) => handle_brush(cfg, args),
        Command::Drill(args) => handle_drill(cfg, args),
        Command::Lines(args) => handle_lines(cfg, args),
    }
}

/// Read the file into a fresh session. Parse failures surface as
/// "empty or invalid file".
fn load_session(cfg: EngineConfig, path: &Path) -> Result<Session> {
    let mut session = Session::new(cfg);
    session.begin_load();
    let read = std::fs::read_to_string(path).map_err(|e| e.to_string());
    if let Err(e) = &read {
        warn!("cannot read {}: {}", path.display(), e);
    }
    session
        .finish_load(read)
        .with_context(|| format!("failed to load '{}'", path.display()))?;
    Ok(session)
}

fn file_stem(name: &str) -> String {
    let s: String = name.chars().map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' }).collect();
    let s = s.trim_matches('_').to_string();
    if s.is_empty() { "chart".to_string() } else { s }
}

fn write_frame(frame: &Frame, args: &InputArgs, name: &str) -> Result<PathBuf> {
    let theme: Theme = theme::find(&args.theme);
    let out = args.out_dir.join(format!("{}.svg", file_stem(name)));
    render_svg_file(frame, &theme, &out).with_context(|| format!("writing {}", out.display()))?;
    println!("Wrote {}", out.display());

    #[cfg(feature = "skia")]
    {
        let png = out.with_extension("png");
        airviz_render::render_png(frame, &theme, &png).with_context(|| format!("writing {}", png.display()))?;
        println!("Wrote {}", png.display());
    }
    Ok(out)
}

fn handle_summary(cfg: EngineConfig, args: SummaryArgs) -> Result<()> {
    let session = load_session(cfg, &args.input.input)?;
    let ds: &Dataset = session.dataset()?;

    println!("{} rows, {} channels", ds.cleaned.len(), ds.channels.len());
    println!("{:<16} {:>12}", "channel", "mean");
    for ch in &ds.channels {
        println!("{:<16} {:>12.4}", ch, ds.means.get(ch));
    }

    let dates = ds.available_dates();
    println!("{} dates ({} .. {})", dates.len(), dates.first().unwrap_or(&"-"), dates.last().unwrap_or(&"-"));

    let date = args.date.as_deref().or_else(|| dates.first().copied());
    if let Some(date) = date {
        match ds.snapshot(date) {
            Some(rec) => {
                println!("Snapshot {date}:");
                for ch in &ds.channels {
                    println!("  {:<16} {:>12.4}", ch, rec.value(ch));
                }
            }
            None => warn!("no records for date {}", date),
        }
    }
    Ok(())
}

fn handle_stacked(cfg: EngineConfig, args: StackedArgs) -> Result<()> {
    let session = load_session(cfg, &args.input.input)?;
    let ds = session.dataset()?;
    let cfg = session.config();
    let channels = ds.resolve(&cfg.stack_channels);
    let layout = Layout::from(&cfg.layout);

    for g in args.granularity.expand() {
        let chart = StackedBarChart::new(channels.clone(), g, layout);
        let frame = chart.frame(&ds.cleaned);
        info!("{}: {} bars", g.label(), frame.x_axis.ticks.len());
        write_frame(&frame, &args.input, &format!("stacked_{}", g.label()))?;
    }
    Ok(())
}

fn handle_zoom(cfg: EngineConfig, args: ZoomArgs) -> Result<()> {
    let session = load_session(cfg, &args.input.input)?;
    let ds = session.dataset()?;
    let cfg = session.config();
    let wanted = if args.channel.is_empty() { cfg.area_channels.clone() } else { args.channel.clone() };
    let channels = ds.resolve(&wanted);

    for (color, ch) in channels.iter().enumerate() {
        let mut chart = ZoomableAreaChart::new(&ds.cleaned, ch, color, cfg);
        if args.no_default_zoom {
            chart.reset();
        }
        let plot = Layout::from(&cfg.layout).plot();
        let anchor = args.anchor.unwrap_or((plot.left + plot.right) / 2.0);
        if let Some(k) = args.scale {
            chart.scale_to(k, anchor);
        }
        let frame = match args.pan {
            Some(dx) => chart.pan_by(dx),
            None => chart.frame(),
        };

        let (d0, d1) = chart.engine.visible_domain();
        info!(
            "{}: k={:.2}, {:.1} days visible, labels {:?}",
            ch,
            chart.engine.transform().k,
            (d1 - d0) / DAY_MS,
            pick_tick_granularity((d0, d1))
        );
        write_frame(&frame, &args.input, &format!("zoom_{ch}"))?;
    }
    Ok(())
}

fn handle_brush(cfg: EngineConfig, args: BrushArgs) -> Result<()> {
    let session = load_session(cfg, &args.input.input)?;
    let ds = session.dataset()?;
    let cfg = session.config();
    let channels = ds.resolve(&cfg.brush_channels);
    let mut chart =
        BrushLineChart::new(&ds.cleaned, channels, Layout::from(&cfg.layout)).with_tick_spacing(cfg.tick_spacing_px);

    let no_bounds = args.from.is_none() && args.to.is_none() && args.min.is_none() && args.max.is_none();
    let region = if no_bounds {
        None
    } else {
        let (x, y) = chart.scales();
        let t0 = args.from.map(date_to_millis).unwrap_or(x.domain.0);
        let t1 = args.to.map(date_to_millis).unwrap_or(x.domain.1);
        Some(SelectionRegion::new((t0, t1), (args.min.unwrap_or(y.vmin), args.max.unwrap_or(y.vmax))))
    };

    let (selection, frame) = chart.brush_end(region);
    println!("Selection: {:?}", chart.status());
    println!("{} days selected", selection.points.len());
    if !selection.active_channels.is_empty() {
        let names: Vec<&str> = selection.active_channels.iter().map(String::as_str).collect();
        println!("Active channels: {}", names.join(", "));
    }
    write_frame(&frame, &args.input, "brush")?;
    Ok(())
}

fn handle_drill(cfg: EngineConfig, args: DrillArgs) -> Result<()> {
    let session = load_session(cfg, &args.input.input)?;
    let ds = session.dataset()?;
    if !ds.channels.iter().any(|c| c == &args.channel) {
        anyhow::bail!("unknown channel '{}'; available: {}", args.channel, ds.channels.join(", "));
    }

    let years = available_years(&ds.cleaned);
    let Some(year) = args.year.or_else(|| years.first().copied()) else {
        anyhow::bail!("no dated records to drill into");
    };
    let filter = DrillFilter { year, month: args.month, day: args.month.and(args.day) };

    println!("Years: {:?}", years);
    println!("Months in {}: {:?}", year, available_months(&ds.cleaned, year));
    if let Some(m) = filter.month {
        println!("Days in {}-{:02}: {:?}", year, m, available_days(&ds.cleaned, year, m));
    }

    let points = drill_series(&ds.cleaned, &args.channel, &filter);
    if points.is_empty() {
        println!("No data available for the selected filters.");
        return Ok(());
    }
    println!("{:<12} {:>12} {:>8}", "", args.channel, "n");
    for p in &points {
        println!("{:<12} {:>12.4} {:>8}", p.label, p.value, p.count);
    }

    if let Some(label) = &args.detail {
        let (xc, yc) = match args.pair.as_slice() {
            [x, y] => (x.as_str(), y.as_str()),
            _ => ("T", "AH"),
        };
        let pairs = drill_detail(&ds.cleaned, &filter, label, xc, yc);
        println!("{} records behind '{}' ({} vs {}):", pairs.len(), label, xc, yc);
        for (x, y) in pairs {
            println!("  {:>10.3} {:>10.4}", x, y);
        }
    }
    Ok(())
}

fn handle_lines(cfg: EngineConfig, args: InputArgs) -> Result<()> {
    let session = load_session(cfg, &args.input)?;
    let ds = session.dataset()?;
    let channels = ds.resolve(&session.config().brush_channels);
    let cfg = session.config();
    let chart = MultiLineChart::new(channels, Layout::from(&cfg.layout)).with_tick_spacing(cfg.tick_spacing_px);
    write_frame(&chart.frame(&ds.cleaned), &args, "lines")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_are_file_safe() {
        assert_eq!(file_stem("zoom_PT08.S1(CO)"), "zoom_pt08_s1_co");
        assert_eq!(file_stem("stacked_Day of Week"), "stacked_day_of_week");
        assert_eq!(file_stem("()"), "chart");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["airviz", "zoom", "data.csv", "-c", "CO(GT)", "--scale", "8", "--pan", "-40"])
            .expect("parse");
        match cli.command {
            Command::Zoom(z) => {
                assert_eq!(z.channel, vec!["CO(GT)"]);
                assert_eq!(z.scale, Some(8.0));
                assert_eq!(z.pan, Some(-40.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        let cli = Cli::try_parse_from(["airviz", "stacked", "f.csv", "-g", "day-of-week"]).expect("parse");
        assert!(matches!(cli.command, Command::Stacked(StackedArgs { granularity: GranularityArg::DayOfWeek, .. })));
    }
}
