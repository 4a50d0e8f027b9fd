mod provenance;
mod scene;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clip3d::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::provenance::RunInfo;
use crate::scene::{fmt_point, ClipRecord};

#[derive(Parser, Debug)]
#[command(name = "clip3")]
#[command(about = "Clip 3D line segments against boxes and convex volumes")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Algo {
    CohenSutherland,
    CyrusBeck,
    Both,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Clip one segment against a box and print the result as JSON
    Clip {
        #[arg(long, value_enum, default_value_t = Algo::Both)]
        algo: Algo,
        /// xmin,xmax,ymin,ymax,zmin,zmax
        #[arg(long, default_value = "0,5,0,4,0,3", value_parser = parse_bounds)]
        bounds: Box3,
        #[arg(long, default_value = "-1,2,1", allow_hyphen_values = true, value_parser = parse_point)]
        from: Point3,
        #[arg(long, default_value = "6,5,4", allow_hyphen_values = true, value_parser = parse_point)]
        to: Point3,
    },
    /// Clip every segment of a scene file and write results plus a provenance sidecar
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Compare both algorithms on seeded random segments around a box
    Sweep {
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 2.0)]
        margin: f64,
        #[arg(long, default_value = "0,5,0,4,0,3", value_parser = parse_bounds)]
        bounds: Box3,
        /// Endpoint tolerance for counting two accepted clips as equal
        #[arg(long, default_value_t = 1e-7)]
        eps: f64,
    },
    /// Print version and code revision
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Clip {
            algo,
            bounds,
            from,
            to,
        } => clip_one(algo, bounds, from, to),
        Action::Batch { input, out } => batch(&input, &out),
        Action::Sweep {
            count,
            seed,
            margin,
            bounds,
            eps,
        } => sweep(count, seed, margin, bounds, eps),
        Action::Report => report(),
    }
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f64; N]> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    ensure!(
        parts.len() == N,
        "expected {N} comma-separated numbers, got {}",
        parts.len()
    );
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .with_context(|| format!("not a number: {part:?}"))?;
    }
    Ok(out)
}

fn parse_point(s: &str) -> Result<Point3> {
    parse_floats::<3>(s).map(Point3::from)
}

fn parse_bounds(s: &str) -> Result<Box3> {
    let [xmin, xmax, ymin, ymax, zmin, zmax] = parse_floats::<6>(s)?;
    Ok(Box3::from_bounds(xmin, xmax, ymin, ymax, zmin, zmax)?)
}

fn clippers_for(algo: Algo, bounds: Box3) -> Vec<Box<dyn LineClipper>> {
    let cs = || Box::new(CohenSutherland::new(bounds)) as Box<dyn LineClipper>;
    let cb = || Box::new(CyrusBeck::from(bounds)) as Box<dyn LineClipper>;
    match algo {
        Algo::CohenSutherland => vec![cs()],
        Algo::CyrusBeck => vec![cb()],
        Algo::Both => vec![cs(), cb()],
    }
}

fn clip_one(algo: Algo, bounds: Box3, from: Point3, to: Point3) -> Result<()> {
    let segment = Segment3::new(from, to);
    tracing::info!(?algo, from = %fmt_point(&from), to = %fmt_point(&to), "clip");
    let results: Vec<ClipRecord> = clippers_for(algo, bounds)
        .iter()
        .map(|c| ClipRecord::new(c.name(), c.clip(&segment)))
        .collect();
    let doc = json!({
        "bounds": { "min": bounds.min().as_slice(), "max": bounds.max().as_slice() },
        "segment": {
            "from": from.as_slice(),
            "to": to.as_slice(),
            "label": format!("P1 {}  P2 {}", fmt_point(&from), fmt_point(&to)),
        },
        "results": results,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn batch(input: &Path, out: &Path) -> Result<()> {
    let scene = scene::load(input)?;
    tracing::info!(
        input = %input.display(),
        volume = scene.volume.kind(),
        segments = scene.segments.len(),
        "batch"
    );
    let reports = scene::run(&scene)?;
    let accepted = reports
        .iter()
        .flat_map(|r| &r.results)
        .filter(|r| r.accepted)
        .count();

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output dir {}", parent.display()))?;
    }
    std::fs::write(out, serde_json::to_vec_pretty(&reports)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let info = RunInfo::new(json!({
        "volume": scene.volume.kind(),
        "segments": scene.segments.len(),
        "accepted": accepted,
    }))
    .with_input(input);
    let sidecar = provenance::write_sidecar(out, &info)?;
    tracing::info!(out = %out.display(), sidecar = %sidecar.display(), accepted, "batch done");
    Ok(())
}

/// Tallies from running both algorithms on the same segments.
#[derive(Debug, Default, PartialEq, serde::Serialize)]
struct SweepStats {
    both_accepted: usize,
    both_rejected: usize,
    endpoint_mismatch: usize,
    accept_mismatch: usize,
    /// Longest segment kept by one algorithm and dropped by the other.
    max_mismatch_length: f64,
}

fn sweep_stats(segments: &[Segment3], bounds: &Box3, eps: f64) -> SweepStats {
    let cs = CohenSutherland::new(*bounds);
    let cb = CyrusBeck::from(*bounds);
    let mut stats = SweepStats::default();
    for s in segments {
        match (cs.clip(s), cb.clip(s)) {
            (ClipOutcome::Accepted(a), ClipOutcome::Accepted(b)) => {
                stats.both_accepted += 1;
                if !a.approx_eq(&b, eps) {
                    stats.endpoint_mismatch += 1;
                }
            }
            (ClipOutcome::Rejected, ClipOutcome::Rejected) => stats.both_rejected += 1,
            (ClipOutcome::Accepted(kept), ClipOutcome::Rejected)
            | (ClipOutcome::Rejected, ClipOutcome::Accepted(kept)) => {
                stats.accept_mismatch += 1;
                stats.max_mismatch_length = stats.max_mismatch_length.max(kept.length());
            }
        }
    }
    stats
}

fn sweep(count: usize, seed: u64, margin: f64, bounds: Box3, eps: f64) -> Result<()> {
    if !(eps.is_finite() && eps >= 0.0) {
        bail!("--eps must be a finite non-negative number, got {eps}");
    }
    let segments = random_segments(&bounds, margin, count, seed)
        .context("sampling sweep segments")?;
    let stats = sweep_stats(&segments, &bounds, eps);
    if stats.endpoint_mismatch > 0 {
        tracing::warn!(count = stats.endpoint_mismatch, eps, "endpoint mismatches");
    }
    let doc = json!({
        "count": count,
        "seed": seed,
        "margin": margin,
        "eps": eps,
        "stats": stats,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "clip3d_version": clip3d::VERSION,
        "code_rev": provenance::current_git_rev(),
        "algorithms": ["cohen-sutherland", "cyrus-beck"],
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
