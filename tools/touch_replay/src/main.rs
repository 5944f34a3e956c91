use std::{
    env, fs,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process,
};

use serde::Deserialize;
use splashguard::{
    BatchOutcome, FilterConfig, FilterEngine, FilterOutcome, PanelKind, TouchEvent, TouchSample,
};

const DEFAULT_WIDTH: u16 = 320;
const DEFAULT_HEIGHT: u16 = 240;

#[derive(Clone, Debug, PartialEq)]
enum ReplayLine {
    Touch(TouchSample),
    Batch { ms: u64, samples: Vec<TouchSample> },
    Tick(u64),
    Release(u64),
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum PanelName {
    Resistive,
    Capacitive,
}

impl From<PanelName> for PanelKind {
    fn from(value: PanelName) -> Self {
        match value {
            PanelName::Resistive => PanelKind::Resistive,
            PanelName::Capacitive => PanelKind::Capacitive,
        }
    }
}

/// Replay settings loaded from `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReplayConfig {
    panel: Option<PanelName>,
    wet: Option<bool>,
    width: Option<u16>,
    height: Option<u16>,
    #[serde(default)]
    filter: FilterOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FilterOverrides {
    max_touch_area: Option<u16>,
    min_movement: Option<u16>,
    max_static_time_ms: Option<u16>,
    max_simultaneous_touches: Option<u8>,
    touch_timeout_ms: Option<u16>,
    gesture_timeout_ms: Option<u16>,
    require_gesture: Option<bool>,
    edge_swipe_threshold: Option<u16>,
    swipe_min_distance: Option<u16>,
    debounce_time_ms: Option<u16>,
    pressure_threshold: Option<u16>,
}

impl FilterOverrides {
    fn apply(&self, config: &mut FilterConfig) {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        set(&mut config.max_touch_area, self.max_touch_area);
        set(&mut config.min_movement, self.min_movement);
        set(&mut config.max_static_time_ms, self.max_static_time_ms);
        set(
            &mut config.max_simultaneous_touches,
            self.max_simultaneous_touches,
        );
        set(&mut config.touch_timeout_ms, self.touch_timeout_ms);
        set(&mut config.gesture_timeout_ms, self.gesture_timeout_ms);
        set(&mut config.require_gesture, self.require_gesture);
        set(&mut config.edge_swipe_threshold, self.edge_swipe_threshold);
        set(&mut config.swipe_min_distance, self.swipe_min_distance);
        set(&mut config.debounce_time_ms, self.debounce_time_ms);
        set(&mut config.pressure_threshold, self.pressure_threshold);
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut panel: Option<PanelKind> = None;
    let mut wet: Option<bool> = None;
    let mut verbose = false;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--expect" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --expect".into());
                };
                expect_path = Some(PathBuf::from(path));
            }
            "--config" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --config".into());
                };
                config_path = Some(PathBuf::from(path));
            }
            "--panel" => {
                idx += 1;
                let Some(value) = args.get(idx) else {
                    return Err("missing value after --panel".into());
                };
                panel = Some(parse_panel(value)?);
            }
            "--wet" => wet = Some(true),
            "--dry" => wet = Some(false),
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    init_logging(verbose)?;

    let trace_path = trace_path.ok_or_else(usage)?;
    let replay_config = match &config_path {
        Some(path) => load_config(path)?,
        None => ReplayConfig::default(),
    };

    let mut engine = build_engine(&replay_config, panel, wet)?;
    let lines = parse_trace(&trace_path)?;
    let decisions = replay(&mut engine, &lines);

    if verbose {
        eprintln!("{}", engine.debug_info());
        eprint!("{}", engine.zone_map());
    }
    let stats = engine.stats();
    println!("stats,{},{}", stats.accepted, stats.rejected);

    if let Some(expect_path) = expect_path {
        let expected = parse_expected(&expect_path)?;
        if decisions != expected {
            eprintln!("expected decisions: {}", expected.join(","));
            eprintln!("actual decisions:   {}", decisions.join(","));
            return Err("decision sequence mismatch".into());
        }
    }

    Ok(())
}

/// Command-line `panel` and `wet` win over the config file.
fn build_engine(
    replay_config: &ReplayConfig,
    panel: Option<PanelKind>,
    wet: Option<bool>,
) -> Result<FilterEngine, String> {
    let panel = panel
        .or(replay_config.panel.map(PanelKind::from))
        .unwrap_or_default();
    let width = replay_config.width.unwrap_or(DEFAULT_WIDTH);
    let height = replay_config.height.unwrap_or(DEFAULT_HEIGHT);

    let mut engine = FilterEngine::new(width, height, panel);
    let mut config = match wet.or(replay_config.wet) {
        Some(wet) => FilterConfig::calibrated(panel, wet),
        None => FilterConfig::for_panel(panel),
    };
    replay_config.filter.apply(&mut config);
    config
        .validate(engine.screen())
        .map_err(|e| format!("invalid filter config: {e}"))?;
    if !config.accepts_pressure_derived_area() {
        log::warn!(
            "pressure_threshold {} estimates an area above max_touch_area {}",
            config.pressure_threshold,
            config.max_touch_area
        );
    }
    engine.begin_with(config);
    Ok(engine)
}

/// Runs the trace, printing one row per line, and returns the decision labels
/// of touch and batch lines.
fn replay(engine: &mut FilterEngine, lines: &[ReplayLine]) -> Vec<String> {
    let mut decisions = Vec::new();
    println!("decision,ms,x,y,outcome,event");
    for line in lines {
        match line {
            ReplayLine::Touch(sample) => {
                let outcome = engine.process(*sample);
                let event = if outcome == FilterOutcome::Accepted {
                    engine.touch_event(sample)
                } else {
                    TouchEvent::None
                };
                let label = outcome_label(outcome);
                println!(
                    "decision,{},{},{},{},{}",
                    sample.timestamp_ms,
                    sample.x,
                    sample.y,
                    label,
                    event_label(event)
                );
                decisions.push(label.to_string());
            }
            ReplayLine::Batch { ms, samples } => {
                let outcome = engine.process_batch(samples);
                let label = match outcome {
                    BatchOutcome::Rejected(reason) => reason.label().to_string(),
                    BatchOutcome::Filtered { accepted, rejected } => {
                        format!("batch_{accepted}_{rejected}")
                    }
                };
                println!("batch,{ms},{},{label}", samples.len());
                decisions.push(label);
            }
            ReplayLine::Tick(ms) => engine.tick(*ms),
            ReplayLine::Release(ms) => {
                let event = engine.touch_event(&TouchSample::released(*ms));
                println!("release,{ms},{}", event_label(event));
            }
        }
    }
    decisions
}

fn log_level(verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Warn
    }
}

fn init_logging(verbose: bool) -> Result<(), String> {
    env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .target(env_logger::Target::Stderr)
        .try_init()
        .map_err(|e| format!("failed to install logger: {e}"))
}

fn usage() -> String {
    "usage: touch_replay <trace.csv> [--panel resistive|capacitive] [--wet|--dry] \
     [--config replay.toml] [--expect expected.txt] [--verbose]"
        .to_string()
}

fn parse_panel(value: &str) -> Result<PanelKind, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "resistive" => Ok(PanelKind::Resistive),
        "capacitive" => Ok(PanelKind::Capacitive),
        other => Err(format!("unknown panel '{other}'")),
    }
}

fn load_config(path: &Path) -> Result<ReplayConfig, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    toml::from_str(&text).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

fn outcome_label(outcome: FilterOutcome) -> &'static str {
    match outcome {
        FilterOutcome::Accepted => "accepted",
        FilterOutcome::Repeat => "repeat",
        FilterOutcome::Rejected(reason) => reason.label(),
    }
}

fn event_label(event: TouchEvent) -> &'static str {
    match event {
        TouchEvent::None => "none",
        TouchEvent::Start => "start",
        TouchEvent::Move => "move",
        TouchEvent::End => "end",
    }
}

fn parse_trace(path: &Path) -> Result<Vec<ReplayLine>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        out.push(parse_line(trimmed).map_err(|e| format!("{}:{} {e}", path.display(), line_no))?);
    }

    Ok(out)
}

/// One trace line:
/// `touch,ms,x,y[,pressure[,area]]`, `batch,ms,x0,y0[,x1,y1...]`, `tick,ms`,
/// or `release,ms`.
fn parse_line(line: &str) -> Result<ReplayLine, String> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let kind = parts[0];
    let ms = parse_num::<u64>(column(&parts, 1, "ms")?, "ms")?;

    match kind {
        "touch" => {
            if parts.len() > 6 {
                return Err("touch line has too many columns".into());
            }
            let x = parse_num::<i16>(column(&parts, 2, "x")?, "x")?;
            let y = parse_num::<i16>(column(&parts, 3, "y")?, "y")?;
            let mut sample = match parts.get(4) {
                Some(raw) => TouchSample::with_pressure(x, y, parse_num(raw, "pressure")?, ms),
                None => TouchSample::new(x, y, ms),
            };
            if let Some(raw) = parts.get(5) {
                sample = sample.area(parse_num(raw, "area")?);
            }
            Ok(ReplayLine::Touch(sample))
        }
        "batch" => {
            let coords = &parts[2..];
            if coords.is_empty() || coords.len() % 2 != 0 {
                return Err("batch line needs x,y pairs".into());
            }
            let samples = coords
                .chunks_exact(2)
                .map(|pair| -> Result<TouchSample, String> {
                    Ok(TouchSample::new(
                        parse_num(pair[0], "x")?,
                        parse_num(pair[1], "y")?,
                        ms,
                    ))
                })
                .collect::<Result<Vec<_>, String>>()?;
            Ok(ReplayLine::Batch { ms, samples })
        }
        "tick" => Ok(ReplayLine::Tick(ms)),
        "release" => Ok(ReplayLine::Release(ms)),
        other => Err(format!("unknown line kind '{other}'")),
    }
}

fn column<'a>(parts: &[&'a str], idx: usize, name: &str) -> Result<&'a str, String> {
    parts
        .get(idx)
        .copied()
        .ok_or_else(|| format!("{} line is missing {name}", parts[0]))
}

fn parse_num<T>(raw: &str, field: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| format!("invalid {field} '{raw}': {e}"))
}

fn parse_expected(path: &Path) -> Result<Vec<String>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_ascii_lowercase)
        .collect())
}
