//! texconv: bake a diffuse texture and normal map into a trilight asset
//!
//! The diffuse texture must hold at most 32 distinct colors and match the
//! normal map's resolution; both sides must be powers of two from 8 to
//! 1024. Any validation failure prints an error and exits nonzero without
//! writing the output file.

use std::path::PathBuf;
use std::process;

use clap::Parser;

#[derive(Parser)]
#[command(name = "texconv")]
#[command(about = "Bake a diffuse texture + tangent-space normal map into a palette asset", long_about = None)]
#[command(version)]
struct Cli {
    /// Diffuse texture (PNG/JPEG/BMP, at most 32 distinct colors)
    diffuse: PathBuf,

    /// Tangent-space normal map, same resolution as the diffuse texture
    normal: PathBuf,

    /// Output asset path
    #[arg(short, long, default_value = "output.bin")]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(e) = trilight::bake::convert_files(&cli.diffuse, &cli.normal, &cli.output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
