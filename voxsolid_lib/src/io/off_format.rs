//! Helper functions for the OFF file format

use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use log::info;
use nalgebra::Vector3;

use crate::mesh::TriMesh3d;
use crate::Real;

/// Loads a triangle surface mesh from an OFF file
///
/// Comment lines and empty lines are skipped. Only triangular faces are supported;
/// trailing face attributes such as per-face colors are ignored.
pub fn surface_mesh_from_off<R: Real, P: AsRef<Path>>(
    path: P,
) -> Result<TriMesh3d<R>, anyhow::Error> {
    let path = path.as_ref();
    info!("Reading mesh from \"{}\"...", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to open file \"{}\" for reading", path.display()))?;
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let header = lines.next().ok_or_else(|| anyhow!("File is empty"))?;
    if header != "OFF" {
        bail!("Missing the \"OFF\" format header");
    }

    let counts_line = lines
        .next()
        .ok_or_else(|| anyhow!("Missing the element count line"))?;
    let counts: Vec<usize> = counts_line
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .context("Failed to parse the element count line")?;
    if counts.len() < 2 {
        bail!("The element count line has to contain at least vertex and face counts");
    }
    let (n_vertices, n_faces) = (counts[0], counts[1]);

    let mut vertices = Vec::with_capacity(n_vertices);
    for _ in 0..n_vertices {
        let line = lines
            .next()
            .ok_or_else(|| anyhow!("File ended inside of the vertex block"))?;
        let coordinates: Vec<f64> = line
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .context("Failed to parse a vertex coordinate")?;
        if coordinates.len() != 3 {
            bail!("Encountered a vertex line without exactly three coordinates");
        }
        let converted = [
            R::from_f64(coordinates[0]),
            R::from_f64(coordinates[1]),
            R::from_f64(coordinates[2]),
        ];
        match (converted[0], converted[1], converted[2]) {
            (Some(x), Some(y), Some(z)) => vertices.push(Vector3::new(x, y, z)),
            _ => bail!("A vertex coordinate is not representable in the target real type"),
        }
    }

    let mut triangles = Vec::with_capacity(n_faces);
    for _ in 0..n_faces {
        let line = lines
            .next()
            .ok_or_else(|| anyhow!("File ended inside of the face block"))?;
        let mut tokens = line.split_whitespace();
        let arity: usize = tokens
            .next()
            .ok_or_else(|| anyhow!("Encountered an empty face line"))?
            .parse()
            .context("Failed to parse the vertex count of a face")?;
        if arity != 3 {
            bail!("Only triangular faces are supported (found a face with {} vertices)", arity);
        }

        let mut triangle = [0usize; 3];
        for slot in &mut triangle {
            let index: usize = tokens
                .next()
                .ok_or_else(|| anyhow!("A face line ended before all of its vertex indices"))?
                .parse()
                .context("Failed to parse a face vertex index")?;
            if index >= vertices.len() {
                bail!(
                    "A face references vertex {} but the file only contains {} vertices",
                    index,
                    vertices.len()
                );
            }
            *slot = index;
        }
        // Remaining tokens are optional face attributes (e.g. colors)
        triangles.push(triangle);
    }

    Ok(TriMesh3d {
        vertices,
        triangles,
    })
}

/// Stores a triangle surface mesh in an OFF file at the given path
pub fn mesh_to_off<R: Real, P: AsRef<Path>>(
    mesh: &TriMesh3d<R>,
    path: P,
) -> Result<(), anyhow::Error> {
    let path = path.as_ref();
    info!(
        "Writing mesh with {} vertices and {} triangles to \"{}\"...",
        mesh.vertices.len(),
        mesh.triangles.len(),
        path.display()
    );

    let file = File::create(path)
        .with_context(|| format!("Failed to open file \"{}\" for writing", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(&mut writer, "OFF").context("Failed to write the format header")?;
    writeln!(&mut writer, "{} {} 0", mesh.vertices.len(), mesh.triangles.len())
        .context("Failed to write the element count line")?;

    for vertex in &mesh.vertices {
        let coordinates = [vertex.x, vertex.y, vertex.z].map(|c| c.to_f64());
        match coordinates {
            [Some(x), Some(y), Some(z)] => {
                writeln!(&mut writer, "{:.6} {:.6} {:.6}", x, y, z)
                    .context("Failed to write a vertex")?;
            }
            _ => bail!("A vertex coordinate is not representable as a 64 bit float"),
        }
    }
    for triangle in &mesh.triangles {
        writeln!(&mut writer, "3 {} {} {}", triangle[0], triangle[1], triangle[2])
            .context("Failed to write a face")?;
    }

    Ok(())
}
