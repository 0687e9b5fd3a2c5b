//! Dump the contents of one frame file: dimensions, variables, attributes,
//! and the masked statistics each overlay layer would resolve.
//!
//! Usage: `inspect_frame <path/to/frame.nc>`

use anyhow::{bail, Context, Result};
use std::path::Path;

use anvil::data_loader::load_frame;
use anvil::LAYERS;

fn main() -> Result<()> {
    let arg = std::env::args()
        .nth(1)
        .context("usage: inspect_frame <path/to/frame.nc>")?;
    let path = Path::new(&arg);

    println!("Inspecting frame file: {}", path.display());

    let file = netcdf::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    println!("\nDimensions:");
    for dim in file.dimensions() {
        println!(
            "  {} = {} {}",
            dim.name(),
            dim.len(),
            if dim.is_unlimited() { "(unlimited)" } else { "" }
        );
    }

    println!("\nVariables:");
    for var in file.variables() {
        print!("  {} ({:?})", var.name(), var.vartype());
        print!(" [");
        for (i, dim) in var.dimensions().iter().enumerate() {
            if i > 0 {
                print!(", ");
            }
            print!("{} = {}", dim.name(), dim.len());
        }
        println!("]");

        for attr in var.attributes() {
            print!("    {}: ", attr.name());
            match attr.value() {
                Ok(val) => println!("{:?}", val),
                Err(e) => println!("Error reading value: {}", e),
            }
        }
    }

    println!("\nGlobal Attributes:");
    for attr in file.attributes() {
        print!("  {}: ", attr.name());
        match attr.value() {
            Ok(val) => println!("{:?}", val),
            Err(e) => println!("Error reading value: {}", e),
        }
    }
    drop(file);

    let Some(frame) = load_frame(path)? else {
        bail!("frame file vanished while inspecting");
    };

    println!("\nLayer statistics:");
    for layer in &LAYERS {
        let field = layer.field(&frame);
        let mask = layer.mask_rule.mask(field);

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut count = 0usize;
        for (&value, &valid) in field.iter().zip(mask.iter()) {
            if valid {
                let v = if value.is_nan() { 0.0 } else { value };
                min = min.min(v);
                max = max.max(v);
                count += 1;
            }
        }

        let (rows, cols) = field.dim();
        println!("  {} ({}x{} cells):", layer.name, rows, cols);
        if count > 0 {
            println!(
                "    masked-true: {} ({:.1}%), range {} .. {}",
                count,
                100.0 * count as f64 / (rows * cols) as f64,
                min,
                max
            );
        } else {
            println!("    masked-true: 0 (scale would default to 0 .. 1)");
        }
    }

    Ok(())
}
