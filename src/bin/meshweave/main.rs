//! Meshweave CLI - generate meshes and inspect their half-edge topology.
//!
//! Usage: meshweave [--verbose] <COMMAND> [OPTIONS]
//!
//! Run `meshweave --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use meshweave::adjacency::TriangleAdjacency;
use meshweave::generate::{grid, icosahedron, ElementKind, GridOptions};
use meshweave::io;
use meshweave::mesh::{build, extract, HalfMesh, IndexedMesh};
use meshweave::validate::validate;

#[derive(Parser)]
#[command(name = "meshweave")]
#[command(author, version, about = "Half-edge mesh topology CLI", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a structured grid over a rectangle
    Grid {
        /// Cell type
        #[arg(short, long, value_enum, default_value = "triangle")]
        kind: CellKind,

        /// Number of cells in the x-direction
        #[arg(long, default_value = "10")]
        nx: usize,

        /// Number of cells in the y-direction
        #[arg(long, default_value = "10")]
        ny: usize,

        /// Extent in the x-direction
        #[arg(long, default_value = "1.0")]
        width: f64,

        /// Extent in the y-direction
        #[arg(long, default_value = "1.0")]
        height: f64,

        /// Write the extracted mesh here (OBJ)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a unit icosahedron
    Icosahedron {
        /// Write the extracted mesh here (OBJ)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CellKind {
    /// Two triangles per cell
    Triangle,
    /// One quad per cell
    Quad,
}

impl From<CellKind> for ElementKind {
    fn from(kind: CellKind) -> Self {
        match kind {
            CellKind::Triangle => ElementKind::Triangle,
            CellKind::Quad => ElementKind::Quad,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Grid {
            kind,
            nx,
            ny,
            width,
            height,
            output,
        } => {
            let options = GridOptions::new(kind.into(), nx, ny)
                .with_width(width)
                .with_height(height);
            options.validate()?;
            cmd_report(&grid(&options), output.as_deref())?;
        }

        Commands::Icosahedron { output } => {
            cmd_report(&icosahedron(), output.as_deref())?;
        }
    }

    Ok(())
}

fn cmd_report(
    mesh: &IndexedMesh,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    validate(mesh)?;

    println!("Vertices: {}", mesh.num_vertices());
    println!(
        "Faces: {} ({} triangles, {} quads, {} polygons)",
        mesh.num_faces(),
        mesh.num_triangles(),
        mesh.num_quads(),
        mesh.num_polygons()
    );

    let start = Instant::now();
    let hmesh: HalfMesh = build(mesh);
    let elapsed = start.elapsed();
    log::info!("Built half-edge mesh in {:.2?}", elapsed);

    println!("Nodes: {}", hmesh.num_nodes());
    println!("Half-edges: {}", hmesh.num_halfedges());
    println!("Half-faces: {}", hmesh.num_faces());

    let loops = hmesh.boundary_loops();
    let lengths: Vec<usize> = loops.iter().map(Vec::len).collect();
    println!("Boundary loops: {} {:?}", loops.len(), lengths);

    if mesh.num_triangles() > 0 {
        let adj = TriangleAdjacency::build(&mesh.triangles);
        let open = adj.as_slice().iter().filter(|&&n| n < 0).count();
        println!("Triangle faces without a neighbor: {}", open);
    }

    let valences: Vec<usize> = hmesh.node_ids().map(|n| hmesh.valence(n)).collect();
    if let (Some(min), Some(max)) = (valences.iter().min(), valences.iter().max()) {
        println!("Valence range: [{}, {}]", min, max);
    }

    if let Some(path) = output {
        let out = extract(&hmesh);
        io::save(&out, path)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
