//! Writes a rounded polyhedron as an STL file.
//!
//! ```text
//! spholyhedra -s dodecahedron -e 9 -p 0.25 -o dodeca.stl
//! ```

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use spholyhedra::{MeshConfig, ShapeKind, generate_mesh, stl::save_stl};

#[derive(Parser, Debug)]
#[command(name = "spholyhedra", version, about = "Make an stl file", long_about = None)]
struct Cli {
    /// Name of the shape: tetrahedron, cube, hexahedron, octahedron, dodecahedron,
    /// icosahedron, or its face count.
    #[arg(short, long, default_value = "cube")]
    shape: String,

    /// Blend exponent; larger is sharper.
    #[arg(short, long, default_value_t = 4.0)]
    exponent: f64,

    /// Sampling step size.
    #[arg(short = 'p', long, default_value_t = 0.25)]
    step: f64,

    /// Output file name.
    #[arg(short, long, default_value = "out.stl")]
    output: PathBuf,

    /// Inradius of the shape.
    #[arg(short, long, default_value_t = 10.0)]
    radius: f64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => {
            println!("Saved to: {}", cli.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> spholyhedra::Result<()> {
    let kind: ShapeKind = cli.shape.parse()?;
    let field = kind
        .params()
        .with_radius(cli.radius)
        .with_exponent(cli.exponent)
        .build()?;
    let config = MeshConfig {
        step: cli.step,
        ..Default::default()
    };
    let mesh = generate_mesh(&field, &config)?;
    save_stl(&mesh, &cli.output)
}
