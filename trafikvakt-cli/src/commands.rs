use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use trafikvakt_analytics::{Burst, RatioRow, RollingCount, RollingSum, Spike};
use trafikvakt_config::TrafikvaktConfig;
use trafikvakt_core::prelude::*;
use trafikvakt_engine::{
    AnalyticsEngine, AvgPacketSizeRow, BandwidthRow, FanoutRow, HourlyAlertRow, KeyCountRow,
};
use trafikvakt_telemetry::metrics::MetricsRecorder;

use crate::data::Dataset;
use crate::error::CliError;
use crate::generate::{generate, GeneratorParams};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a seeded synthetic dataset
    Generate(GenerateArgs),
    /// Run every named view over a recorded dataset and print a YAML report
    Report(ReportArgs),
    /// Run a single view with explicit parameters
    View(ViewArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Output dataset file
    #[arg(short, long)]
    pub out: PathBuf,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Hours of traffic to synthesize
    #[arg(long, default_value_t = 6)]
    pub hours: u64,
    /// Monitored hosts
    #[arg(long, default_value_t = 5)]
    pub hosts: usize,
    /// Distinct attacker sources
    #[arg(long, default_value_t = 8)]
    pub sources: usize,
    /// Total alerts
    #[arg(long, default_value_t = 400)]
    pub alerts: usize,
    #[arg(long, default_value_t = 1)]
    pub interval_minutes: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Dataset file to analyze
    #[arg(short, long)]
    pub data: PathBuf,
    /// Optional config file overriding the default hierarchy
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Append a Prometheus text dump of engine metrics
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Dataset file to analyze
    #[arg(short, long)]
    pub data: PathBuf,
    /// View to run
    #[arg(short, long, value_enum)]
    pub name: ViewName,
    /// Optional config file overriding the default hierarchy
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub window_secs: Option<u64>,
    #[arg(long)]
    pub lookback_hours: Option<u64>,
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub gap_secs: Option<u64>,
    #[arg(long)]
    pub min_size: Option<u64>,
    #[arg(long)]
    pub min_ports: Option<u64>,
    #[arg(long)]
    pub threshold: Option<u64>,
    #[arg(long)]
    pub multiplier: Option<f64>,
    #[arg(long)]
    pub alert_type: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ViewName {
    AlertsByHour,
    TopSources,
    RollingAlertCount,
    ScanBursts,
    TopBandwidth,
    AvgPacketSize,
    HeavyOutgoing,
    PortFanout,
    NewSourceSpikes,
    RollingPacketTotal,
    RecentAlerts,
}

/// Everything the dashboard polls, in one document.
#[derive(Serialize)]
struct Report {
    alerts_by_hour: Vec<HourlyAlertRow>,
    top_sources: Vec<KeyCountRow>,
    rolling_alert_count: Vec<RollingCount>,
    scan_bursts: Vec<Burst>,
    top_bandwidth: Vec<BandwidthRow>,
    avg_packet_size_per_host: Vec<AvgPacketSizeRow>,
    heavy_outgoing_hosts: Vec<RatioRow>,
    port_fanout: Vec<FanoutRow>,
    new_source_spikes: Vec<Spike>,
    rolling_packet_total: Vec<RollingSum>,
    recent_alerts: Vec<AlertEvent>,
}

pub fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let dataset = generate(&GeneratorParams {
        seed: args.seed,
        hours: args.hours,
        hosts: args.hosts,
        sources: args.sources,
        alerts: args.alerts,
        interval_minutes: args.interval_minutes,
        end: Utc::now(),
    });
    info!(
        alerts = dataset.alerts.len(),
        intervals = dataset.intervals.len(),
        "dataset generated"
    );
    dataset.save(&args.out)
}

fn load_config(path: Option<&PathBuf>) -> Result<TrafikvaktConfig, CliError> {
    Ok(match path {
        Some(p) => TrafikvaktConfig::load_from_path(p)?,
        None => TrafikvaktConfig::load()?,
    })
}

fn build_engine(
    data: &PathBuf,
    config: &TrafikvaktConfig,
    metrics: MetricsRecorder,
) -> Result<AnalyticsEngine, CliError> {
    let dataset = Dataset::load(data)?;
    let anchor = dataset.latest_timestamp().unwrap_or_else(Utc::now);
    let store = dataset.into_store()?;
    Ok(AnalyticsEngine::new(store.clone(), store, config, metrics).with_reference(anchor))
}

pub fn run_report(args: ReportArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_ref())?;
    let metrics = MetricsRecorder::new();
    let engine = build_engine(&args.data, &config, metrics.clone())?;
    let ctx = QueryCtx::with_timeout(StdDuration::from_secs(config.engine.query_timeout_secs));
    let d = engine.defaults().clone();

    let report = Report {
        alerts_by_hour: engine.alerts_by_hour(&ctx, d.histogram_lookback_hours)?,
        top_sources: engine.top_sources(&ctx, d.top_sources_limit)?,
        rolling_alert_count: engine.rolling_alert_count(
            &ctx,
            &d.rolling_alert_type,
            d.rolling_alert_window_secs,
        )?,
        scan_bursts: engine.scan_bursts(&ctx, d.burst_gap_secs, d.burst_min_size)?,
        top_bandwidth: engine.top_bandwidth(&ctx, d.bandwidth_window_secs, d.bandwidth_limit)?,
        avg_packet_size_per_host: engine.avg_packet_size_per_host(&ctx)?,
        heavy_outgoing_hosts: engine.heavy_outgoing_hosts(
            &ctx,
            d.heavy_window_secs,
            d.heavy_ratio_multiplier,
        )?,
        port_fanout: engine.port_fanout(&ctx, d.fanout_min_ports, d.fanout_window_secs)?,
        new_source_spikes: engine.new_source_spikes(&ctx, d.spike_window_secs, d.spike_threshold)?,
        rolling_packet_total: engine.rolling_packet_total(&ctx, d.rolling_packet_window_secs)?,
        recent_alerts: engine.recent_alerts(&ctx, d.recent_alerts_limit)?,
    };

    println!("{}", serde_yaml::to_string(&report)?);
    if args.metrics {
        if let Ok(text) = metrics.gather_metrics() {
            println!("{text}");
        }
    }
    Ok(())
}

pub fn run_view(args: ViewArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_ref())?;
    let engine = build_engine(&args.data, &config, MetricsRecorder::new())?;
    let ctx = QueryCtx::with_timeout(StdDuration::from_secs(config.engine.query_timeout_secs));
    let d = engine.defaults().clone();

    let rendered = match args.name {
        ViewName::AlertsByHour => to_yaml(&engine.alerts_by_hour(
            &ctx,
            args.lookback_hours.unwrap_or(d.histogram_lookback_hours),
        )?)?,
        ViewName::TopSources => {
            to_yaml(&engine.top_sources(&ctx, args.limit.unwrap_or(d.top_sources_limit))?)?
        }
        ViewName::RollingAlertCount => to_yaml(&engine.rolling_alert_count(
            &ctx,
            args.alert_type.as_deref().unwrap_or(&d.rolling_alert_type),
            args.window_secs.unwrap_or(d.rolling_alert_window_secs),
        )?)?,
        ViewName::ScanBursts => to_yaml(&engine.scan_bursts(
            &ctx,
            args.gap_secs.unwrap_or(d.burst_gap_secs),
            args.min_size.unwrap_or(d.burst_min_size),
        )?)?,
        ViewName::TopBandwidth => to_yaml(&engine.top_bandwidth(
            &ctx,
            args.window_secs.unwrap_or(d.bandwidth_window_secs),
            args.limit.unwrap_or(d.bandwidth_limit),
        )?)?,
        ViewName::AvgPacketSize => to_yaml(&engine.avg_packet_size_per_host(&ctx)?)?,
        ViewName::HeavyOutgoing => to_yaml(&engine.heavy_outgoing_hosts(
            &ctx,
            args.window_secs.unwrap_or(d.heavy_window_secs),
            args.multiplier.unwrap_or(d.heavy_ratio_multiplier),
        )?)?,
        ViewName::PortFanout => to_yaml(&engine.port_fanout(
            &ctx,
            args.min_ports.unwrap_or(d.fanout_min_ports),
            args.window_secs.unwrap_or(d.fanout_window_secs),
        )?)?,
        ViewName::NewSourceSpikes => to_yaml(&engine.new_source_spikes(
            &ctx,
            args.window_secs.unwrap_or(d.spike_window_secs),
            args.threshold.unwrap_or(d.spike_threshold),
        )?)?,
        ViewName::RollingPacketTotal => to_yaml(&engine.rolling_packet_total(
            &ctx,
            args.window_secs.unwrap_or(d.rolling_packet_window_secs),
        )?)?,
        ViewName::RecentAlerts => {
            to_yaml(&engine.recent_alerts(&ctx, args.limit.unwrap_or(d.recent_alerts_limit))?)?
        }
    };

    println!("{rendered}");
    Ok(())
}

fn to_yaml<T: Serialize>(rows: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(rows)?)
}
