//! Frame loading from the timestamped NetCDF archive.
//!
//! Frames live at `<data_dir>/<YYYY>/<MM>/<YYYYMMDDHHMM>.nc`, one file per
//! 15-minute satellite scan, each holding the `tir` (cloud-top temperature)
//! and `cores` (wavelet core power) fields on a fixed lat/lon grid.
//!
//! A missing file is an ordinary outcome (`Ok(None)`) so the viewer can show
//! a "no data" state; a file that exists but cannot be read is an error, so
//! corrupt archives show up in the logs instead of silently rendering blank.

use chrono::NaiveDateTime;
use ndarray::{Array, Array2, Axis, Ix2, IxDyn};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AnvilError, Result};

/// NetCDF variable holding cloud-top temperature, degrees C
pub const TIR_VAR: &str = "tir";
/// NetCDF variable holding wavelet core power
pub const CORES_VAR: &str = "cores";

/// Timestamp format used in frame file names and query parameters
const STAMP_FORMAT: &str = "%Y%m%d%H%M";

/// A frame timestamp, parsed from the `YYYYMMDDHHMM` wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTime(NaiveDateTime);

impl FrameTime {
    /// Parse a `YYYYMMDDHHMM` string; calendar-invalid stamps (month 13,
    /// Feb 30) are rejected.
    pub fn parse(value: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(value, STAMP_FORMAT)
            .map(FrameTime)
            .map_err(|_| AnvilError::InvalidTimestamp {
                value: value.to_string(),
            })
    }

    /// The canonical `YYYYMMDDHHMM` form.
    pub fn stamp(&self) -> String {
        self.0.format(STAMP_FORMAT).to_string()
    }

    /// Archive location relative to the data directory: `YYYY/MM/<stamp>.nc`.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.0.format("%Y").to_string())
            .join(self.0.format("%m").to_string())
            .join(format!("{}.nc", self.stamp()))
    }
}

/// Absolute path of the frame file for a timestamp.
pub fn frame_path(data_dir: &Path, time: &FrameTime) -> PathBuf {
    data_dir.join(time.relative_path())
}

/// One loaded frame: both scalar fields as 2-D arrays (lat, lon).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Cloud-top temperature, degrees C
    pub tir: Array2<f32>,
    /// Wavelet core power
    pub cores: Array2<f32>,
}

/// Load the frame at `path`, or `Ok(None)` if no file exists there.
///
/// Both fields are stored `(time, lat, lon)`; the first time index is taken.
/// A file that exists but cannot be opened, lacks a field, or has an
/// unexpected rank is an `Err`, not a silent `None`.
pub fn load_frame(path: &Path) -> Result<Option<Frame>> {
    if !path.exists() {
        debug!(path = %path.display(), "Frame file not present");
        return Ok(None);
    }

    let file = netcdf::open(path)?;

    let tir = read_field(&file, TIR_VAR)?;
    let cores = read_field(&file, CORES_VAR)?;

    debug!(
        path = %path.display(),
        tir_shape = ?tir.dim(),
        cores_shape = ?cores.dim(),
        "Loaded frame"
    );

    Ok(Some(Frame { tir, cores }))
}

/// Read one field as a 2-D f32 array, taking the first index of a leading
/// time dimension when present.
fn read_field(file: &netcdf::File, name: &str) -> Result<Array2<f32>> {
    let var = file.variable(name).ok_or_else(|| AnvilError::FieldMissing {
        name: name.to_string(),
    })?;

    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let values = read_values_f32(&var)?;
    let array = Array::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
        AnvilError::DataNotFound {
            message: format!("Field {} has inconsistent shape: {}", name, e),
        }
    })?;

    match array.ndim() {
        2 => Ok(array.into_dimensionality::<Ix2>().expect("checked rank")),
        3 => {
            if array.shape()[0] == 0 {
                return Err(AnvilError::DataNotFound {
                    message: format!("Field {} has an empty time dimension", name),
                });
            }
            Ok(array
                .index_axis(Axis(0), 0)
                .to_owned()
                .into_dimensionality::<Ix2>()
                .expect("checked rank"))
        }
        n => Err(AnvilError::DataNotFound {
            message: format!("Field {} has rank {}, expected 2 or 3", name, n),
        }),
    }
}

/// Read a variable's full contents as f32, converting from whichever numeric
/// type the file stores.
fn read_values_f32(var: &netcdf::Variable) -> Result<Vec<f32>> {
    use netcdf::types::{BasicType, VariableType};

    match var.vartype() {
        VariableType::Basic(BasicType::Byte) => {
            let data: Vec<i8> = var.get_values::<i8, _>(&[] as &[netcdf::Extent])?;
            Ok(data.into_iter().map(|v| v as f32).collect())
        }
        VariableType::Basic(BasicType::Short) => {
            let data: Vec<i16> = var.get_values::<i16, _>(&[] as &[netcdf::Extent])?;
            Ok(data.into_iter().map(|v| v as f32).collect())
        }
        VariableType::Basic(BasicType::Int) => {
            let data: Vec<i32> = var.get_values::<i32, _>(&[] as &[netcdf::Extent])?;
            Ok(data.into_iter().map(|v| v as f32).collect())
        }
        VariableType::Basic(BasicType::Float) => {
            Ok(var.get_values::<f32, _>(&[] as &[netcdf::Extent])?)
        }
        VariableType::Basic(BasicType::Double) => {
            let data: Vec<f64> = var.get_values::<f64, _>(&[] as &[netcdf::Extent])?;
            Ok(data.into_iter().map(|v| v as f32).collect())
        }
        other => Err(AnvilError::DataNotFound {
            message: format!("Unsupported variable type for {}: {:?}", var.name(), other),
        }),
    }
}

/// Write a small frame file with known field contents for tests.
#[cfg(test)]
pub(crate) fn create_test_frame(path: &Path, tir: &Array2<f32>, cores: &Array2<f32>) -> Result<()> {
    let (rows, cols) = tir.dim();
    let mut file = netcdf::create(path)?;

    file.add_dimension("time", 1)?;
    file.add_dimension("lat", rows)?;
    file.add_dimension("lon", cols)?;
    file.add_attribute("title", "anvil test frame")?;

    {
        let mut var = file.add_variable::<f32>(TIR_VAR, &["time", "lat", "lon"])?;
        var.put_attribute("units", "degC")?;
        let values: Vec<f32> = tir.iter().copied().collect();
        var.put_values(&values, &[.., .., ..])?;
    }
    {
        let mut var = file.add_variable::<f32>(CORES_VAR, &["time", "lat", "lon"])?;
        var.put_attribute("units", "1")?;
        let values: Vec<f32> = cores.iter().copied().collect();
        var.put_values(&values, &[.., .., ..])?;
    }

    Ok(())
}
