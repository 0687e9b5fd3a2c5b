//! Test data generation utilities.
//!
//! Writes synthetic frame archives with known field patterns so the
//! integration tests can assert exact ranges and pixel values.

use std::path::Path;

// Use the netcdf crate's error type directly
use netcdf::Error;
type Result<T> = std::result::Result<T, Error>;

/// Timestamp of the one frame the test archive contains
pub const TEST_STAMP: &str = "200401011200";
/// A valid timestamp with no frame file behind it
pub const MISSING_STAMP: &str = "200401011215";

/// Grid dimensions of the test frame
pub const GRID_ROWS: usize = 4;
pub const GRID_COLS: usize = 5;

/// Expected resolved range for the `tir` layer (values below zero)
pub const TIR_RANGE: (f32, f32) = (-60.0, -5.0);
/// Expected resolved range for the `cores` layer (values above zero)
pub const CORES_RANGE: (f32, f32) = (1.5, 9.0);

/// The `tir` test field: a ramp from -60 in steps of 5, with a NaN in the
/// last cell. Cells 0..=11 are below zero, so the masked range is
/// [`TIR_RANGE`]. The NaN cell satisfies no mask and must render transparent.
pub fn tir_values() -> Vec<f32> {
    let mut values: Vec<f32> = (0..GRID_ROWS * GRID_COLS)
        .map(|i| -60.0 + i as f32 * 5.0)
        .collect();
    values[GRID_ROWS * GRID_COLS - 1] = f32::NAN;
    values
}

/// The `cores` test field: zero everywhere except three positive cells,
/// giving the masked range [`CORES_RANGE`].
pub fn cores_values() -> Vec<f32> {
    let mut values = vec![0.0_f32; GRID_ROWS * GRID_COLS];
    values[0] = 1.5; // (0, 0)
    values[GRID_COLS + 2] = 4.0; // (1, 2)
    values[2 * GRID_COLS + 3] = 9.0; // (2, 3)
    values
}

/// Create the archive tree `<root>/2004/01/200401011200.nc` holding the test
/// frame.
pub fn create_test_archive(root: &Path) -> Result<()> {
    let dir = root.join("2004").join("01");
    std::fs::create_dir_all(&dir).expect("Failed to create archive directories");
    create_frame_file(&dir.join(format!("{}.nc", TEST_STAMP)))
}

/// Write one frame file with the known test fields.
pub fn create_frame_file(path: &Path) -> Result<()> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("time", 1)?;
    file.add_dimension("lat", GRID_ROWS)?;
    file.add_dimension("lon", GRID_COLS)?;
    file.add_attribute("title", "anvil integration test frame")?;

    {
        let mut var = file.add_variable::<f32>("tir", &["time", "lat", "lon"])?;
        var.put_attribute("units", "degC")?;
        var.put_attribute("long_name", "Cloud top temperature")?;
        var.put_values(&tir_values(), &[.., .., ..])?;
    }
    {
        let mut var = file.add_variable::<f32>("cores", &["time", "lat", "lon"])?;
        var.put_attribute("units", "1")?;
        var.put_attribute("long_name", "Wavelet core power")?;
        var.put_values(&cores_values(), &[.., .., ..])?;
    }

    Ok(())
}
