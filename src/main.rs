//! Headless driver for the ocean simulation core.
//!
//! Runs the pipeline for a fixed number of ticks, reports surface statistics
//! and optionally writes the displacement/normal fields as PNG snapshots.
//! Stands in for the renderer and debug-card surface, which consume the same
//! textures.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};

use cli::Args;
use wavecrest::field::Field;
use wavecrest::ocean::OceanSystem;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let config = args.simulation_config();
    let mut ocean = OceanSystem::new(config)?;

    info!("running {} ticks at dt={}s", args.ticks, args.dt);
    for tick in 0..args.ticks {
        ocean.advance(args.dt)?;
        if tick % 60 == 0 {
            let (min, max) = height_range(ocean.displacement());
            debug!("tick {}: height range [{:.3}, {:.3}]m", tick, min, max);
        }
    }

    let (min, max) = height_range(ocean.displacement());
    let mean_slope = ocean
        .slope()
        .as_slice()
        .iter()
        .map(|s| (s[0] * s[0] + s[1] * s[1]).sqrt())
        .sum::<f32>()
        / ocean.slope().as_slice().len() as f32;
    println!(
        "Simulated {} ticks at {}x{}: height [{:.3}, {:.3}]m, mean |slope| {:.4}",
        args.ticks,
        ocean.config().resolution,
        ocean.config().resolution,
        min,
        max,
        mean_slope
    );

    if let Some(dir) = &args.snapshot_dir {
        write_snapshots(&ocean, dir)?;
    }
    Ok(())
}

fn height_range(displacement: &Field<[f32; 3]>) -> (f32, f32) {
    displacement
        .as_slice()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), offset| {
            (min.min(offset[1]), max.max(offset[1]))
        })
}

/// Dump the height field (grayscale) and the reconstructed normals (RGB).
fn write_snapshots(ocean: &OceanSystem, dir: &str) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("failed to create {}: {}", dir, e))?;
    let n = ocean.config().resolution as u32;

    let (min, max) = height_range(ocean.displacement());
    let range = (max - min).max(1e-6);
    let height_img = image::GrayImage::from_fn(n, n, |x, y| {
        let h = ocean.displacement().get(x as usize, y as usize)[1];
        image::Luma([(255.0 * (h - min) / range) as u8])
    });
    let height_path = Path::new(dir).join("height.png");
    height_img
        .save(&height_path)
        .map_err(|e| format!("failed to write {}: {}", height_path.display(), e))?;
    info!("wrote {}", height_path.display());

    let normal_img = image::RgbImage::from_fn(n, n, |x, y| {
        let [sx, sz] = ocean.slope().get(x as usize, y as usize);
        let len = (sx * sx + 1.0 + sz * sz).sqrt();
        let encode = |v: f32| (255.0 * (v / len * 0.5 + 0.5)) as u8;
        image::Rgb([encode(-sx), encode(1.0), encode(-sz)])
    });
    let normal_path = Path::new(dir).join("normals.png");
    normal_img
        .save(&normal_path)
        .map_err(|e| format!("failed to write {}: {}", normal_path.display(), e))?;
    info!("wrote {}", normal_path.display());

    Ok(())
}
