//! meshedit CLI - half-edge mesh editing from the command line.
//!
//! Usage: meshedit <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `meshedit --help` for available commands. Set `RUST_LOG=debug` for
//! per-phase algorithm output.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::{info, warn};

use meshedit::algo::decimate::DecimateOptions;
use meshedit::algo::remesh::RemeshOptions;
use meshedit::algo::subdivide::SubdivideOptions;
use meshedit::algo::MeshResampler;
use meshedit::io;
use meshedit::mesh::{EdgeId, HalfedgeMesh};

#[derive(Parser)]
#[command(name = "meshedit")]
#[command(author, version, about = "Half-edge mesh editing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Refine a mesh with Loop subdivision
    Upsample {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short = 'n', long, default_value = "1")]
        iterations: usize,
    },

    /// Simplify a mesh with quadric error metrics
    Downsample {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Target number of faces
        #[arg(short = 'f', long, conflicts_with = "ratio")]
        faces: Option<usize>,

        /// Target ratio of faces to keep (0.0 to 1.0)
        #[arg(short, long, default_value = "0.25")]
        ratio: f64,

        /// Never collapse boundary edges
        #[arg(long)]
        preserve_boundary: bool,
    },

    /// Even out edge lengths with isotropic remeshing
    Resample {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of iterations
        #[arg(short, long, default_value = "5")]
        iterations: usize,

        /// Target edge length (default: average edge length)
        #[arg(short = 'l', long)]
        target_length: Option<f64>,

        /// Keep boundary vertices fixed
        #[arg(long)]
        preserve_boundary: bool,
    },

    /// Apply local edits, addressing edges by creation-order index
    Edit {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Edits to apply in order: flip:<edge>, split:<edge> or collapse:<edge>
        #[arg(required = true)]
        ops: Vec<EditOp>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Flip,
    Split,
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EditOp {
    kind: EditKind,
    edge: usize,
}

impl FromStr for EditOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, index) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <op>:<edge>, got '{s}'"))?;
        let kind = match name {
            "flip" => EditKind::Flip,
            "split" => EditKind::Split,
            "collapse" => EditKind::Collapse,
            other => return Err(format!("unknown edit '{other}' (flip, split or collapse)")),
        };
        let edge = index
            .parse()
            .map_err(|_| format!("invalid edge index '{index}'"))?;
        Ok(EditOp { kind, edge })
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,

        Commands::Upsample {
            input,
            output,
            iterations,
        } => {
            let resampler =
                MeshResampler::new().with_subdivide(SubdivideOptions::new(iterations));
            let mut mesh = load(&input)?;
            timed(&format!("Loop subdivision ({iterations} iterations)"), || {
                resampler.upsample(&mut mesh)
            })?;
            save(&mesh, &output)?;
        }

        Commands::Downsample {
            input,
            output,
            faces,
            ratio,
            preserve_boundary,
        } => {
            let options = match faces {
                Some(target) => DecimateOptions::with_target_faces(target),
                None => DecimateOptions::with_target_ratio(ratio),
            }
            .with_preserve_boundary(preserve_boundary);

            let mut mesh = load(&input)?;
            let target = options.compute_target(mesh.num_faces());
            let resampler = MeshResampler::new().with_decimate(options);
            timed(&format!("QEM decimation to {target} faces"), || {
                resampler.downsample(&mut mesh)
            })?;
            save(&mesh, &output)?;
        }

        Commands::Resample {
            input,
            output,
            iterations,
            target_length,
            preserve_boundary,
        } => {
            let options = RemeshOptions {
                target_length,
                ..RemeshOptions::default()
            }
            .with_iterations(iterations)
            .with_preserve_boundary(preserve_boundary);
            options.validate()?;

            let mut mesh = load(&input)?;
            let target = options.resolve_target_length(&mesh);
            info!(
                "Average edge length: {:.6}, target: {:.6}",
                mesh.average_edge_length(),
                target
            );
            let resampler = MeshResampler::new().with_remesh(options);
            timed(&format!("isotropic remeshing ({iterations} iterations)"), || {
                resampler.resample(&mut mesh)
            })?;
            info!("Average edge length now {:.6}", mesh.average_edge_length());
            save(&mesh, &output)?;
        }

        Commands::Edit { input, output, ops } => {
            let mut mesh = load(&input)?;
            let applied = apply_edits(&mut mesh, &ops);
            info!("Applied {} of {} edits", applied, ops.len());
            save(&mesh, &output)?;
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<HalfedgeMesh, Box<dyn std::error::Error>> {
    let mesh = io::load(path)?;
    info!(
        "Loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

fn save(mesh: &HalfedgeMesh, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    io::save(mesh, path)?;
    info!(
        "Saved {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(())
}

fn timed<T>(
    label: &str,
    f: impl FnOnce() -> meshedit::Result<T>,
) -> Result<T, Box<dyn std::error::Error>> {
    info!("Applying {label}...");
    let start = Instant::now();
    let value = f()?;
    info!("Done in {:.2?}", start.elapsed());
    Ok(value)
}

/// Apply each edit in turn; a rejected or out-of-range edit is reported and
/// skipped. Returns the number applied.
fn apply_edits(mesh: &mut HalfedgeMesh, ops: &[EditOp]) -> usize {
    let mut applied = 0;
    for op in ops {
        let Some(e) = nth_edge(mesh, op.edge) else {
            warn!(
                "Skipping {:?} of edge {}: mesh has {} edges",
                op.kind,
                op.edge,
                mesh.num_edges()
            );
            continue;
        };

        let result = match op.kind {
            EditKind::Flip => mesh.flip_edge(e).map(|_| ()),
            EditKind::Split => mesh.split_edge(e).map(|_| ()),
            EditKind::Collapse => mesh.collapse_edge(e).map(|_| ()),
        };
        match result {
            Ok(()) => applied += 1,
            Err(err) => warn!("Skipping edge {}: {}", op.edge, err),
        }
    }
    applied
}

fn nth_edge(mesh: &HalfedgeMesh, index: usize) -> Option<EdgeId> {
    mesh.edge_ids().nth(index)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());
    println!("Euler characteristic: {}", mesh.euler_characteristic());

    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for f in mesh.face_ids() {
        let area = mesh.face_area(f);
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }
    println!("Surface area: {:.6}", mesh.surface_area());
    println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    println!("Average edge length: {:.6}", mesh.average_edge_length());

    let max_degree = mesh.vertex_ids().map(|v| mesh.degree(v)).max().unwrap_or(0);
    println!("Max vertex degree: {}", max_degree);

    let boundary_verts = mesh
        .vertex_ids()
        .filter(|&v| mesh.is_boundary_vertex(v))
        .count();
    if boundary_verts == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary vertices)", boundary_verts);
    }

    Ok(())
}
