//! Helper functions for the compressed volume container format
//!
//! A container is a gzip compressed stream starting with a single line holding a JSON
//! header of the form `{"dataset": "volume", "dtype": "uint8", "shape": [D, H, W]}`,
//! followed by the raw cell data of the dataset in z-major, x-fastest order.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{anyhow, Context};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use serde_json::json;
use thiserror::Error as ThisError;

use crate::volume::VoxelVolume;

/// Name of the single dataset stored in a volume container
const DATASET_NAME: &str = "volume";

/// Error type for violations of the volume container format
#[derive(Clone, Eq, PartialEq, Debug, ThisError)]
pub enum VolumeFormatError {
    /// The first line of the container is not a valid JSON header
    #[error("container does not start with a valid JSON header line")]
    InvalidHeader,
    /// The container holds a dataset with an unexpected name
    #[error("container holds dataset \"{found}\" instead of \"{expected}\"")]
    WrongDataset { expected: String, found: String },
    /// The header shape entry is not a three element array of positive integers
    #[error("dataset shape is not a three-dimensional extent array")]
    InvalidShape,
    /// The element type of the dataset does not match the requested one
    #[error("dataset has element type \"{found}\" instead of \"{expected}\"")]
    WrongElementType { expected: String, found: String },
    /// The data block is shorter or longer than the shape requires
    #[error("dataset holds {found} bytes of cell data but shape {shape:?} requires {expected}")]
    WrongDataSize {
        shape: [usize; 3],
        expected: usize,
        found: usize,
    },
}

/// Loads a `uint8` occupancy volume from the given container file
pub fn volume_from_vol_u8<P: AsRef<Path>>(path: P) -> Result<VoxelVolume<u8>, anyhow::Error> {
    let (dims, bytes) = read_container(path.as_ref(), "uint8", 1)?;
    VoxelVolume::from_vec(dims, bytes).context("Failed to construct the volume from the container data")
}

/// Loads a `float32` scalar volume from the given container file
pub fn volume_from_vol_f32<P: AsRef<Path>>(path: P) -> Result<VoxelVolume<f32>, anyhow::Error> {
    let (dims, bytes) = read_container(path.as_ref(), "float32", std::mem::size_of::<f32>())?;
    let values: Vec<f32> = bytemuck::pod_collect_to_vec(&bytes);
    VoxelVolume::from_vec(dims, values)
        .context("Failed to construct the volume from the container data")
}

/// Stores a `uint8` occupancy volume in a container file at the given path
pub fn volume_to_vol_u8<P: AsRef<Path>>(
    volume: &VoxelVolume<u8>,
    path: P,
) -> Result<(), anyhow::Error> {
    write_container(path.as_ref(), "uint8", volume.dims(), volume.data())
}

/// Stores a `float32` scalar volume in a container file at the given path
pub fn volume_to_vol_f32<P: AsRef<Path>>(
    volume: &VoxelVolume<f32>,
    path: P,
) -> Result<(), anyhow::Error> {
    write_container(
        path.as_ref(),
        "float32",
        volume.dims(),
        bytemuck::cast_slice(volume.data()),
    )
}

fn write_container(
    path: &Path,
    dtype: &str,
    dims: [usize; 3],
    bytes: &[u8],
) -> Result<(), anyhow::Error> {
    info!(
        "Writing {} volume with shape {:?} to \"{}\"...",
        dtype,
        dims,
        path.display()
    );

    let file = File::create(path)
        .with_context(|| format!("Failed to open file \"{}\" for writing", path.display()))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());

    let header = json!({
        "dataset": DATASET_NAME,
        "dtype": dtype,
        "shape": dims,
    });
    serde_json::to_writer(&mut encoder, &header)
        .context("Failed to write the container header")?;
    encoder
        .write_all(b"\n")
        .context("Failed to write the container header")?;
    encoder
        .write_all(bytes)
        .context("Failed to write the cell data of the volume")?;
    encoder
        .finish()
        .context("Failed to finish the compressed stream")?;

    Ok(())
}

fn read_container(
    path: &Path,
    dtype: &str,
    bytes_per_element: usize,
) -> Result<([usize; 3], Vec<u8>), anyhow::Error> {
    info!("Reading volume from \"{}\"...", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open file \"{}\" for reading", path.display()))?;
    let mut reader = BufReader::new(GzDecoder::new(file));

    let mut header_line = Vec::new();
    reader
        .read_until(b'\n', &mut header_line)
        .context("Failed to read the container header")?;
    let header: serde_json::Value =
        serde_json::from_slice(&header_line).map_err(|_| VolumeFormatError::InvalidHeader)?;

    let dataset = header["dataset"]
        .as_str()
        .ok_or(VolumeFormatError::InvalidHeader)?;
    if dataset != DATASET_NAME {
        return Err(VolumeFormatError::WrongDataset {
            expected: DATASET_NAME.to_string(),
            found: dataset.to_string(),
        }
        .into());
    }

    let found_dtype = header["dtype"]
        .as_str()
        .ok_or(VolumeFormatError::InvalidHeader)?;
    if found_dtype != dtype {
        return Err(VolumeFormatError::WrongElementType {
            expected: dtype.to_string(),
            found: found_dtype.to_string(),
        }
        .into());
    }

    let shape = header["shape"]
        .as_array()
        .ok_or(VolumeFormatError::InvalidShape)?;
    if shape.len() != 3 {
        return Err(VolumeFormatError::InvalidShape.into());
    }
    let mut dims = [0usize; 3];
    for (dim, extent) in dims.iter_mut().zip(shape.iter()) {
        *dim = extent
            .as_u64()
            .and_then(|e| usize::try_from(e).ok())
            .ok_or(VolumeFormatError::InvalidShape)?;
    }

    let expected_bytes = dims[0]
        .checked_mul(dims[1])
        .and_then(|dh| dh.checked_mul(dims[2]))
        .and_then(|cells| cells.checked_mul(bytes_per_element))
        .ok_or_else(|| anyhow!("Dataset shape {:?} overflows the platform index type", dims))?;

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .context("Failed to read the cell data of the volume")?;
    if bytes.len() != expected_bytes {
        return Err(VolumeFormatError::WrongDataSize {
            shape: dims,
            expected: expected_bytes,
            found: bytes.len(),
        }
        .into());
    }

    Ok((dims, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(file_name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(file_name)
    }

    #[test]
    fn test_vol_u8_roundtrip() {
        let mut volume = VoxelVolume::new_filled([2, 3, 4], 0u8).unwrap();
        volume.set([1, 2, 3], 7);
        volume.set([0, 0, 0], 1);

        let path = temp_path("voxsolid_vol_u8_roundtrip.vol.gz");
        volume_to_vol_u8(&volume, &path).unwrap();
        let read_back = volume_from_vol_u8(&path).unwrap();

        assert_eq!(read_back, volume);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_vol_f32_roundtrip() {
        let mut volume = VoxelVolume::new_filled([3, 2, 2], 0.0f32).unwrap();
        volume.set([2, 1, 1], -1.5);
        volume.set([0, 1, 0], 0.25);

        let path = temp_path("voxsolid_vol_f32_roundtrip.vol.gz");
        volume_to_vol_f32(&volume, &path).unwrap();
        let read_back = volume_from_vol_f32(&path).unwrap();

        assert_eq!(read_back, volume);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_vol_element_type_mismatch() {
        let volume = VoxelVolume::new_filled([2, 2, 2], 0u8).unwrap();
        let path = temp_path("voxsolid_vol_dtype_mismatch.vol.gz");
        volume_to_vol_u8(&volume, &path).unwrap();

        let error = volume_from_vol_f32(&path).unwrap_err();
        assert_eq!(
            error.downcast::<VolumeFormatError>().unwrap(),
            VolumeFormatError::WrongElementType {
                expected: "float32".to_string(),
                found: "uint8".to_string(),
            }
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_vol_invalid_header() {
        let path = temp_path("voxsolid_vol_invalid_header.vol.gz");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            encoder.write_all(b"not a json header\n").unwrap();
            encoder.finish().unwrap();
        }

        let error = volume_from_vol_u8(&path).unwrap_err();
        assert_eq!(
            error.downcast::<VolumeFormatError>().unwrap(),
            VolumeFormatError::InvalidHeader
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_vol_rejects_non_3d_shape() {
        // A flat 2D dataset is not a volume
        let path = temp_path("voxsolid_vol_2d_shape.vol.gz");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            encoder
                .write_all(b"{\"dataset\":\"volume\",\"dtype\":\"uint8\",\"shape\":[4,4]}\n")
                .unwrap();
            encoder.write_all(&[0u8; 16]).unwrap();
            encoder.finish().unwrap();
        }

        let error = volume_from_vol_u8(&path).unwrap_err();
        assert_eq!(
            error.downcast::<VolumeFormatError>().unwrap(),
            VolumeFormatError::InvalidShape
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_vol_truncated_data() {
        let path = temp_path("voxsolid_vol_truncated.vol.gz");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            encoder
                .write_all(b"{\"dataset\":\"volume\",\"dtype\":\"uint8\",\"shape\":[2,2,2]}\n")
                .unwrap();
            encoder.write_all(&[0u8; 5]).unwrap();
            encoder.finish().unwrap();
        }

        let error = volume_from_vol_u8(&path).unwrap_err();
        assert_eq!(
            error.downcast::<VolumeFormatError>().unwrap(),
            VolumeFormatError::WrongDataSize {
                shape: [2, 2, 2],
                expected: 8,
                found: 5,
            }
        );
        std::fs::remove_file(&path).unwrap();
    }
}
