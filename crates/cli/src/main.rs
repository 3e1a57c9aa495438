mod provenance;
mod svg;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use shatter::api::{
    drc_summary, load_tab_library, read_impact, read_projectile, save_impact, DrcCfg, DrcSummary, Impact, Point,
    RectangularFrame, RepairReport, ReplayToken, ShatterParams, TabCfg, TabShape,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use provenance::{write_sidecar, Payload};

const DEFAULT_FRAME: [f64; 4] = [-400.0, -300.0, 400.0, 300.0];

#[derive(Parser)]
#[command(name = "shatter")]
#[command(about = "Impact shatter cut-pattern generator")]
#[command(version)]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Generate an impact and write its JSON document
    Generate(GenerateArgs),
    /// Run the design-rule check and print the summary
    Drc {
        #[arg(long)]
        input: PathBuf,
        /// DrcCfg JSON (missing fields take defaults)
        #[arg(long)]
        drc: Option<PathBuf>,
        /// Write the error list as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Alternate DRC and repair passes, then write the repaired impact
    Repair {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        drc: Option<PathBuf>,
        #[arg(long)]
        tab_cfg: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 5)]
        passes: usize,
    },
    /// Export the cut paths as SVG
    Svg {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a JSON summary of an impact (tabs, pieces, DRC counts)
    Report {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        drc: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long)]
    out: PathBuf,
    /// ShatterParams JSON (missing fields take defaults)
    #[arg(long)]
    params: Option<PathBuf>,
    /// TabCfg JSON (missing fields take defaults)
    #[arg(long)]
    tab_cfg: Option<PathBuf>,
    /// Projectile document shaping the innermost ring
    #[arg(long)]
    projectile: Option<PathBuf>,
    /// Directory of `*.tab` prototype documents
    #[arg(long)]
    library: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long)]
    rings: Option<usize>,
    #[arg(long)]
    divisions: Option<usize>,
    /// Frame corners
    #[arg(long, num_args = 4, allow_negative_numbers = true, value_names = ["X0", "Y0", "X1", "Y1"])]
    frame: Option<Vec<f64>>,
    /// Impact point
    #[arg(long, num_args = 2, allow_negative_numbers = true, value_names = ["X", "Y"])]
    center: Option<Vec<f64>>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Generate(args) => generate(args),
        Action::Drc { input, drc, out } => check(&input, drc.as_deref(), out.as_deref()),
        Action::Repair {
            input,
            out,
            drc,
            tab_cfg,
            seed,
            passes,
        } => repair(&input, &out, drc.as_deref(), tab_cfg.as_deref(), seed, passes),
        Action::Svg { input, out } => export_svg(&input, &out),
        Action::Report { input, drc } => report(&input, drc.as_deref()),
    }
}

/// Parse a JSON config, or take the defaults when no path is given.
fn read_cfg<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load(input: &Path) -> Result<Impact> {
    read_impact(input).with_context(|| format!("loading impact {}", input.display()))
}

fn write_text(out: &Path, text: &str) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(out, text).with_context(|| format!("writing {}", out.display()))
}

fn frame_from(corners: &[f64]) -> Result<RectangularFrame> {
    let &[x0, y0, x1, y1] = corners else {
        bail!("frame needs 4 numbers, got {}", corners.len());
    };
    if x0 == x1 || y0 == y1 {
        bail!("frame [{x0}, {y0}, {x1}, {y1}] has no area");
    }
    Ok(RectangularFrame::new(Point::new(x0, y0), Point::new(x1, y1)))
}

fn generate(args: GenerateArgs) -> Result<()> {
    let mut params: ShatterParams = read_cfg(args.params.as_deref())?;
    let tab_cfg: TabCfg = read_cfg(args.tab_cfg.as_deref())?;
    if let Some(rings) = args.rings {
        params.rings = rings;
    }
    if let Some(divisions) = args.divisions {
        params.divisions = divisions;
    }
    if let Some(c) = args.center.as_deref() {
        if let &[x, y] = c {
            params.center = [x, y];
        }
    }
    params.validate().context("invalid generation parameters")?;
    let corners = args.frame.clone().unwrap_or_else(|| DEFAULT_FRAME.to_vec());
    let frame = frame_from(&corners)?;
    let projectile = args
        .projectile
        .as_deref()
        .map(|p| read_projectile(p).with_context(|| format!("loading projectile {}", p.display())))
        .transpose()?;
    let library = args.library.as_deref().map(load_tab_library).unwrap_or_default();

    let mut rng = ReplayToken::generation(args.seed).to_std_rng();
    let impact = Impact::generate(frame, projectile.as_ref(), &library, &params, &tab_cfg, &mut rng);
    tracing::info!(
        seed = args.seed,
        rings = params.rings,
        divisions = params.divisions,
        tabs = impact.grid().len(),
        pieces = impact.piece_count(),
        library = library.len(),
        "generate"
    );

    save_impact(&args.out, &impact).with_context(|| format!("writing {}", args.out.display()))?;
    let mut payload = Payload::new(json!({
        "command": "generate",
        "seed": args.seed,
        "frame": corners,
        "params": params,
        "tab_cfg": tab_cfg,
    }));
    for input in [&args.params, &args.tab_cfg, &args.projectile, &args.library].into_iter().flatten() {
        payload = payload.with_input(input);
    }
    write_sidecar(&args.out, payload)?;
    Ok(())
}

fn check(input: &Path, drc: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let cfg: DrcCfg = read_cfg(drc)?;
    let mut impact = load(input)?;
    let errors = impact.drc(&cfg).to_vec();
    println!("{}", drc_summary(&errors));
    for err in &errors {
        tracing::debug!(%err, "drc error");
    }
    if let Some(out) = out {
        write_text(out, &serde_json::to_string_pretty(&errors)?)?;
        write_sidecar(out, Payload::new(json!({ "command": "drc", "drc": cfg })).with_input(input))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct RepairPass {
    before: usize,
    report: RepairReport,
}

fn repair(
    input: &Path,
    out: &Path,
    drc: Option<&Path>,
    tab_cfg: Option<&Path>,
    seed: u64,
    passes: usize,
) -> Result<()> {
    let cfg: DrcCfg = read_cfg(drc)?;
    let tab_cfg: TabCfg = read_cfg(tab_cfg)?;
    let mut impact = load(input)?;

    let mut log = Vec::new();
    let mut remaining = impact.drc(&cfg).len();
    for pass in 0..passes {
        if remaining == 0 {
            break;
        }
        let mut rng = ReplayToken::repair_pass(seed, pass).to_std_rng();
        let report = impact.repair(&tab_cfg, &mut rng);
        tracing::info!(pass, before = remaining, changed = report.total(), "repair pass");
        log.push(RepairPass {
            before: remaining,
            report,
        });
        remaining = impact.drc(&cfg).len();
        if report.total() == 0 {
            break;
        }
    }
    if remaining > 0 {
        tracing::warn!(remaining, "errors left after repair");
    }
    println!("{}", drc_summary(impact.drc_errors()));

    save_impact(out, &impact).with_context(|| format!("writing {}", out.display()))?;
    let payload = Payload::new(json!({
        "command": "repair",
        "seed": seed,
        "passes": log,
        "remaining": remaining,
        "drc": cfg,
        "tab_cfg": tab_cfg,
    }))
    .with_input(input);
    write_sidecar(out, payload)?;
    Ok(())
}

fn export_svg(input: &Path, out: &Path) -> Result<()> {
    let impact = load(input)?;
    let text = svg::render(&impact);
    write_text(out, &text)?;
    tracing::info!(out = %out.display(), paths = impact.to_polylines().len(), "svg");
    write_sidecar(out, Payload::new(json!({ "command": "svg" })).with_input(input))?;
    Ok(())
}

#[derive(Serialize)]
struct Report {
    code_rev: String,
    engine_version: &'static str,
    ndiv: usize,
    rows: usize,
    columns: usize,
    tabs: BTreeMap<&'static str, usize>,
    pieces: usize,
    drc: DrcSummary,
}

fn summarize(impact: &mut Impact, cfg: &DrcCfg) -> Report {
    let mut tabs = BTreeMap::new();
    for shape in [TabShape::Gap, TabShape::Fracture, TabShape::Jagged, TabShape::Line] {
        tabs.insert(shape.name(), 0);
    }
    for (_, tab) in impact.tabs() {
        *tabs.entry(tab.shape().name()).or_insert(0) += 1;
    }
    let drc = drc_summary(impact.drc(cfg));
    Report {
        code_rev: provenance::current_git_rev(),
        engine_version: shatter::VERSION,
        ndiv: impact.ndiv(),
        rows: impact.grid().rows(),
        columns: impact.grid().columns(),
        tabs,
        pieces: impact.piece_count(),
        drc,
    }
}

fn report(input: &Path, drc: Option<&Path>) -> Result<()> {
    let cfg: DrcCfg = read_cfg(drc)?;
    let mut impact = load(input)?;
    let report = summarize(&mut impact, &cfg);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cmd::command().debug_assert();
    }

    #[test]
    fn frame_and_center_flags_accept_negative_numbers() {
        let cmd = Cmd::try_parse_from([
            "shatter", "generate", "--out", "a.json", "--frame", "-50", "-40", "50", "40", "--center", "-5", "2",
        ])
        .unwrap();
        let Action::Generate(args) = cmd.action else {
            panic!("expected generate");
        };
        assert_eq!(args.frame, Some(vec![-50.0, -40.0, 50.0, 40.0]));
        assert_eq!(args.center, Some(vec![-5.0, 2.0]));
    }

    #[test]
    fn degenerate_frame_is_rejected() {
        assert!(frame_from(&[0.0, 0.0, 0.0, 10.0]).is_err());
        assert!(frame_from(&[0.0, 0.0, 10.0]).is_err());
        let f = frame_from(&[10.0, 10.0, -10.0, -10.0]).unwrap();
        assert_eq!(f.min_corner(), Point::new(-10.0, -10.0));
    }

    #[test]
    fn config_files_fill_missing_fields_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{ "rings": 4 }"#).unwrap();
        let params: ShatterParams = read_cfg(Some(&path)).unwrap();
        assert_eq!(params.rings, 4);
        assert_eq!(params.divisions, ShatterParams::default().divisions);
        let cfg: DrcCfg = read_cfg(None).unwrap();
        assert_eq!(cfg, DrcCfg::default());
        fs::write(&path, "{ nope").unwrap();
        assert!(read_cfg::<ShatterParams>(Some(&path)).is_err());
    }

    #[test]
    fn generate_repair_and_export_write_artifacts_with_sidecars() {
        let dir = tempdir().unwrap();
        let impact_path = dir.path().join("impact.json");
        generate(GenerateArgs {
            out: impact_path.clone(),
            params: None,
            tab_cfg: None,
            projectile: None,
            library: None,
            seed: 3,
            rings: Some(5),
            divisions: Some(12),
            frame: Some(vec![-200.0, -150.0, 200.0, 150.0]),
            center: None,
        })
        .unwrap();
        assert!(impact_path.exists());
        assert!(dir.path().join("impact.provenance.json").exists());

        let fixed = dir.path().join("fixed.json");
        repair(&impact_path, &fixed, None, None, 1, 3).unwrap();
        assert!(fixed.exists());
        assert!(dir.path().join("fixed.provenance.json").exists());

        let errors = dir.path().join("errors.json");
        check(&fixed, None, Some(&errors)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&errors).unwrap()).unwrap();
        assert!(parsed.is_array());

        let svg_path = dir.path().join("out").join("cut.svg");
        export_svg(&fixed, &svg_path).unwrap();
        assert!(fs::read_to_string(&svg_path).unwrap().contains("<polyline"));

        let mut impact = load(&fixed).unwrap();
        let summary = summarize(&mut impact, &DrcCfg::default());
        assert_eq!(summary.rows, 12);
        assert_eq!(summary.tabs.values().sum::<usize>(), impact.grid().len());
    }

    #[test]
    fn repair_replays_from_the_seed() {
        let dir = tempdir().unwrap();
        let impact_path = dir.path().join("impact.json");
        generate(GenerateArgs {
            out: impact_path.clone(),
            params: None,
            tab_cfg: None,
            projectile: None,
            library: None,
            seed: 8,
            rings: Some(8),
            divisions: Some(16),
            frame: None,
            center: None,
        })
        .unwrap();
        let (a, b) = (dir.path().join("a.json"), dir.path().join("b.json"));
        repair(&impact_path, &a, None, None, 5, 3).unwrap();
        repair(&impact_path, &b, None, None, 5, 3).unwrap();
        assert_eq!(fs::read_to_string(&a).unwrap(), fs::read_to_string(&b).unwrap());
    }

    #[test]
    fn inverted_scale_range_is_reported_not_panicked() {
        let dir = tempdir().unwrap();
        let params = dir.path().join("params.json");
        fs::write(&params, r#"{ "min_scale": 5.0, "max_scale": 0.1 }"#).unwrap();
        let out = dir.path().join("impact.json");
        let err = generate(GenerateArgs {
            out: out.clone(),
            params: Some(params),
            tab_cfg: None,
            projectile: None,
            library: None,
            seed: 1,
            rings: Some(3),
            divisions: Some(8),
            frame: None,
            center: None,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("min_scale 5 exceeds max_scale 0.1"));
        assert!(!out.exists());
    }

    #[test]
    fn missing_input_reports_the_path() {
        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }
}
