//! Build automation tasks for trilight
//!
//! Usage:
//!   cargo run -p xtask -- gen-assets   # Generate demo textures and bake them
//!   cargo run -p xtask -- ci           # Run fmt + clippy + tests

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for trilight")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate demo brick textures and bake assets/demo/output.bin
    GenAssets {
        /// Texture side length (power of two, 8 to 1024)
        #[arg(long, default_value = "64")]
        size: u32,
    },
    /// Run the same checks CI runs: rustfmt, clippy, tests
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::GenAssets { size } => gen_assets(size),
        Commands::Ci => ci(),
    }
}

/// Get the project root directory
fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Generate a brick diffuse texture + matching normal map, bake both
fn gen_assets(size: u32) -> Result<()> {
    anyhow::ensure!(
        size.is_power_of_two() && (8..=1024).contains(&size),
        "size must be a power of two between 8 and 1024, got {}",
        size
    );

    let root = project_root();
    let demo = root.join("assets/demo");
    std::fs::create_dir_all(&demo)?;

    let diffuse_path = demo.join("bricks.png");
    let normal_path = demo.join("bricks_n.png");
    let output_path = demo.join("output.bin");

    println!("Generating {}x{} demo textures...", size, size);
    brick_diffuse(size).save(&diffuse_path)?;
    brick_normals(size).save(&normal_path)?;

    println!("Baking {}...", output_path.display());
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["run", "--bin", "texconv", "--"])
            .arg(&diffuse_path)
            .arg(&normal_path)
            .arg("--output")
            .arg(&output_path),
    )?;

    println!("Demo asset ready: {}", output_path.display());
    println!("Run the viewer: cargo run --bin trilight");
    Ok(())
}

/// Run formatting, lint and test checks
fn ci() -> Result<()> {
    let root = project_root();

    println!("Checking formatting...");
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["fmt", "--all", "--check"]),
    )?;

    println!("Running clippy...");
    run_cmd(Command::new("cargo").current_dir(&root).args([
        "clippy",
        "--workspace",
        "--all-targets",
        "--",
        "-D",
        "warnings",
    ]))?;

    println!("Running tests...");
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["test", "--workspace"]),
    )?;

    println!("All checks passed");
    Ok(())
}

// =============================================================================
// Demo texture synthesis
// =============================================================================

/// Mortar plus four brick shades: five palette colors in total, well under
/// the 32-color limit texconv enforces
const MORTAR: [u8; 3] = [99, 96, 93];
const SHADES: [[u8; 3]; 4] = [
    [168, 72, 52],
    [149, 63, 47],
    [178, 84, 60],
    [158, 70, 44],
];

/// Running-bond brick pattern: bricks of size/4 x size/8 texels separated
/// by one-texel mortar lines, alternate rows shifted half a brick.
fn brick_diffuse(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let (col, row, in_mortar) = brick_cell(x, y, size);
        let [r, g, b] = if in_mortar {
            MORTAR
        } else {
            SHADES[((col * 7 + row * 13) % 4) as usize]
        };
        Rgba([r, g, b, 255])
    })
}

/// Which brick a texel belongs to and whether it sits on a mortar line
fn brick_cell(x: u32, y: u32, size: u32) -> (u32, u32, bool) {
    let brick_w = size / 4;
    let brick_h = (size / 8).max(1);
    let row = y / brick_h;
    let shifted_x = (x + (row % 2) * brick_w / 2) % size;
    let in_mortar = y % brick_h == 0 || shifted_x % brick_w == 0;
    (shifted_x / brick_w, row, in_mortar)
}

/// Brick-face height at one texel: mortar lines sit low, faces sit high,
/// with a two-texel ramp between them
fn brick_height(x: u32, y: u32, size: u32) -> f32 {
    let brick_w = size / 4;
    let brick_h = (size / 8).max(1);
    let row = y / brick_h;
    let shifted_x = (x + (row % 2) * brick_w / 2) % size;

    let u = shifted_x % brick_w;
    let v = y % brick_h;
    let edge = u.min(brick_w - u).min(v.min(brick_h - v)) as f32;
    (edge / 2.0).min(1.0)
}

/// Tangent-space normal map of the brick height field, central differences
/// with tiling wrap, channels encoded as `0.5 * n + 0.5`
fn brick_normals(size: u32) -> RgbaImage {
    const STRENGTH: f32 = 2.0;

    RgbaImage::from_fn(size, size, |x, y| {
        let left = brick_height((x + size - 1) % size, y, size);
        let right = brick_height((x + 1) % size, y, size);
        let up = brick_height(x, (y + size - 1) % size, size);
        let down = brick_height(x, (y + 1) % size, size);

        let dx = (left - right) * STRENGTH;
        let dy = (up - down) * STRENGTH;
        let len = (dx * dx + dy * dy + 1.0).sqrt();
        Rgba([channel(dx / len), channel(dy / len), channel(1.0 / len), 255])
    })
}

/// Map a [-1, 1] normal component to its 8-bit channel
fn channel(v: f32) -> u8 {
    ((v * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8
}
