//! Heightmap save files and render exports.
//!
//! Both formats are plain JSON written with `serde_json`:
//! - a versioned save file holding raw elevations, row by row
//! - a render export holding the normalized view and an optional flow path,
//!   for whatever draws the terrain

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::erosion::FlowPath;
use crate::heightmap::HeightGrid;
use crate::tilemap::{GridError, Tilemap};

const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save file version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// On-disk layout of a saved heightmap.
#[derive(Serialize, Deserialize)]
struct HeightmapSaveFile {
    /// Format version for forward compatibility
    version: u32,
    width: usize,
    height: usize,
    /// Row-major elevations, `elevations[y * width + x]`
    elevations: Vec<f32>,
}

/// Data handed to a renderer: values in `[0, 1]` plus a path to overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderData {
    pub width: usize,
    pub height: usize,
    /// Row-major normalized elevations
    pub normalized: Vec<f32>,
    /// Cells of a flow path, start first
    pub path: Option<Vec<(usize, usize)>>,
}

impl RenderData {
    pub fn new(heightmap: &HeightGrid, path: Option<&FlowPath>) -> Self {
        Self {
            width: heightmap.width(),
            height: heightmap.height(),
            normalized: heightmap.normalized().into_values(),
            path: path.map(|p| p.cells().to_vec()),
        }
    }
}

/// Save a heightmap as JSON.
pub fn save_heightmap(heightmap: &HeightGrid, path: &Path) -> Result<(), PersistenceError> {
    let save = HeightmapSaveFile {
        version: SAVE_VERSION,
        width: heightmap.width(),
        height: heightmap.height(),
        elevations: heightmap.cells().values().to_vec(),
    };
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, &save)?;
    Ok(())
}

/// Load a heightmap written by [`save_heightmap`].
pub fn load_heightmap(path: &Path) -> Result<HeightGrid, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let save: HeightmapSaveFile = serde_json::from_reader(reader)?;

    if save.version > SAVE_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: save.version,
            supported: SAVE_VERSION,
        });
    }

    let cells = Tilemap::from_vec(save.width, save.height, save.elevations)?;
    Ok(HeightGrid::from_tilemap(cells))
}

/// Write the normalized view (and optional overlay path) as pretty JSON.
pub fn export_render_data(
    heightmap: &HeightGrid,
    overlay: Option<&FlowPath>,
    path: &Path,
) -> Result<RenderData, PersistenceError> {
    let data = RenderData::new(heightmap, overlay);
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &data)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erosion::trace_flow;
    use crate::terrain;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terrain.json");

        let mut grid = HeightGrid::flat(7, 4).unwrap();
        terrain::add_tilt(&mut grid, 0.25, -1.5);
        grid.set(3, 2, -12.75).unwrap();

        save_heightmap(&grid, &path).unwrap();
        let loaded = load_heightmap(&path).unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_rejects_newer_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.json");
        std::fs::write(
            &path,
            r#"{"version": 99, "width": 1, "height": 1, "elevations": [0.0]}"#,
        )
        .unwrap();

        assert!(matches!(
            load_heightmap(&path),
            Err(PersistenceError::UnsupportedVersion { found: 99, supported: 1 })
        ));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.json");
        std::fs::write(
            &path,
            r#"{"version": 1, "width": 2, "height": 2, "elevations": [0.0, 1.0]}"#,
        )
        .unwrap();

        assert!(matches!(
            load_heightmap(&path),
            Err(PersistenceError::Grid(GridError::DataLength { expected: 4, actual: 2 }))
        ));
    }

    #[test]
    fn test_render_export_with_path() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("render.json");

        let mut grid = HeightGrid::new(5, 5, 0.0).unwrap();
        terrain::add_tilt(&mut grid, 1.0, 0.0);
        let (_, flow) = trace_flow(&grid, 2, 2).unwrap();

        let data = export_render_data(&grid, Some(&flow), &out).unwrap();
        assert_eq!(data.normalized[0], 0.0);
        assert_eq!(data.normalized[4], 1.0);
        assert_eq!(data.path.as_deref(), Some(&[(2, 2), (1, 1), (0, 0)][..]));

        let written: RenderData =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, data);
    }
}
