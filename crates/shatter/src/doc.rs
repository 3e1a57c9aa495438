//! Versioned JSON documents for impacts, projectiles and tab prototypes.
//!
//! Purpose
//! - Persist engine state and the two collaborator inputs (projectile
//!   silhouette, tab library) in a flat, attribute-style schema.
//!
//! Why this design
//! - Documents are plain `serde` structs mirroring the file layout; conversion
//!   to engine types is a separate, validating step that yields `DocError`.
//! - The `load_*` helpers are the boundary used by callers that only want
//!   "an object or nothing": they log the typed error via `tracing::warn!` and
//!   return `None`. The `read_*` helpers return the error itself.
//!
//! Coordinates are flattened `[x0, y0, x1, y1, ...]`. An impact stores its tab
//! matrix as a sparse list of `pos = [row, column, slot]` entries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::frame::RectangularFrame;
use crate::geom::Point;
use crate::impact::{Impact, TabGrid};
use crate::projectile::Projectile;
use crate::tab::{Axis, Tab, TabKey, TabPrototype, TabShape};

/// Schema version written and accepted.
pub const DOC_VERSION: &str = "1.0";

/// Extension of tab prototype documents in a library directory.
pub const TAB_EXTENSION: &str = "tab";

const RECTANGULAR: &str = "rectangular";

#[derive(Debug, Error)]
pub enum DocError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported document version {found:?} (expected {expected:?})", expected = DOC_VERSION)]
    Version { found: String },

    #[error("unsupported frame type {0:?}")]
    FrameType(String),

    #[error("odd coordinate count {0}")]
    OddCoordinates(usize),

    #[error("tab position {pos:?} outside a {rows}x{columns} matrix")]
    Position { pos: [usize; 3], rows: usize, columns: usize },

    #[error("tab at {0:?} has fewer than two points")]
    TooFewPoints([usize; 3]),

    #[error("degenerate {0}")]
    Degenerate(&'static str),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameDoc {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[x0, y0, x1, y1]`: min corner then max corner.
    pub corners: [f64; 4],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TabDoc {
    pub pos: [usize; 3],
    pub tabtype: TabShape,
    pub scaledlen: f64,
    pub pts: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TabMatrixDoc {
    pub rows: usize,
    pub columns: usize,
    pub tabs: Vec<TabDoc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpactDoc {
    pub version: String,
    pub ndiv: usize,
    pub frame: FrameDoc,
    pub tabmatrix: TabMatrixDoc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileDoc {
    pub version: String,
    pub pts: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TabPrototypeDoc {
    pub version: String,
    pub tabtype: TabShape,
    pub pts: Vec<f64>,
}

fn check_version(found: &str) -> Result<(), DocError> {
    if found == DOC_VERSION {
        Ok(())
    } else {
        Err(DocError::Version {
            found: found.to_string(),
        })
    }
}

pub fn flatten(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x(), p.y()]).collect()
}

pub fn unflatten(coords: &[f64]) -> Result<Vec<Point>, DocError> {
    if coords.len() % 2 != 0 {
        return Err(DocError::OddCoordinates(coords.len()));
    }
    Ok(coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect())
}

impl ImpactDoc {
    pub fn from_impact(impact: &Impact) -> Self {
        let (lo, hi) = (impact.frame().min_corner(), impact.frame().max_corner());
        let tabs = impact
            .tabs()
            .map(|(key, tab)| TabDoc {
                pos: [key.division, key.column, key.slot],
                tabtype: tab.shape(),
                scaledlen: tab.scaled_length(),
                pts: flatten(tab.points()),
            })
            .collect();
        Self {
            version: DOC_VERSION.to_string(),
            ndiv: impact.ndiv(),
            frame: FrameDoc {
                kind: RECTANGULAR.to_string(),
                corners: [lo.x(), lo.y(), hi.x(), hi.y()],
            },
            tabmatrix: TabMatrixDoc {
                rows: impact.grid().rows(),
                columns: impact.grid().columns(),
                tabs,
            },
        }
    }

    /// Validate and rebuild the engine state; pieces are re-derived.
    pub fn into_impact(self) -> Result<Impact, DocError> {
        check_version(&self.version)?;
        if self.frame.kind != RECTANGULAR {
            return Err(DocError::FrameType(self.frame.kind));
        }
        let [x0, y0, x1, y1] = self.frame.corners;
        let frame = RectangularFrame::new(Point::new(x0, y0), Point::new(x1, y1));

        let TabMatrixDoc { rows, columns, tabs } = self.tabmatrix;
        let mut grid = TabGrid::new(rows, columns);
        for doc in tabs {
            let [row, column, slot] = doc.pos;
            let key = TabKey::new(row, column, slot);
            let axis = Axis::from_slot(slot).filter(|_| grid.contains_key(key)).ok_or(DocError::Position {
                pos: doc.pos,
                rows,
                columns,
            })?;
            let ring = match axis {
                Axis::Radial => column + 1,
                Axis::Angular => column,
            };
            let points = unflatten(&doc.pts)?;
            let tab = Tab::from_points(doc.tabtype, points, ring, row, axis, doc.scaledlen)
                .ok_or(DocError::TooFewPoints(doc.pos))?;
            grid.set(key, Some(tab));
        }
        Ok(Impact::from_grid(self.ndiv, frame, grid))
    }
}

impl ProjectileDoc {
    pub fn from_projectile(projectile: &Projectile) -> Self {
        Self {
            version: DOC_VERSION.to_string(),
            pts: flatten(projectile.points()),
        }
    }

    pub fn into_projectile(self) -> Result<Projectile, DocError> {
        check_version(&self.version)?;
        Projectile::new(unflatten(&self.pts)?).ok_or(DocError::Degenerate("projectile"))
    }
}

impl TabPrototypeDoc {
    pub fn from_prototype(proto: &TabPrototype) -> Self {
        Self {
            version: DOC_VERSION.to_string(),
            tabtype: proto.shape(),
            pts: flatten(proto.points()),
        }
    }

    pub fn into_prototype(self) -> Result<TabPrototype, DocError> {
        check_version(&self.version)?;
        TabPrototype::new(self.tabtype, &unflatten(&self.pts)?).ok_or(DocError::Degenerate("tab prototype"))
    }
}

fn read_doc<T: DeserializeOwned>(path: &Path) -> Result<T, DocError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_doc<T: Serialize>(path: &Path, doc: &T) -> Result<(), DocError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(doc)?)?;
    Ok(())
}

pub fn impact_to_json(impact: &Impact) -> Result<String, DocError> {
    Ok(serde_json::to_string_pretty(&ImpactDoc::from_impact(impact))?)
}

pub fn impact_from_json(text: &str) -> Result<Impact, DocError> {
    serde_json::from_str::<ImpactDoc>(text)?.into_impact()
}

pub fn read_impact(path: impl AsRef<Path>) -> Result<Impact, DocError> {
    read_doc::<ImpactDoc>(path.as_ref())?.into_impact()
}

pub fn read_projectile(path: impl AsRef<Path>) -> Result<Projectile, DocError> {
    read_doc::<ProjectileDoc>(path.as_ref())?.into_projectile()
}

pub fn read_prototype(path: impl AsRef<Path>) -> Result<TabPrototype, DocError> {
    read_doc::<TabPrototypeDoc>(path.as_ref())?.into_prototype()
}

pub fn save_impact(path: impl AsRef<Path>, impact: &Impact) -> Result<(), DocError> {
    write_doc(path.as_ref(), &ImpactDoc::from_impact(impact))
}

pub fn save_projectile(path: impl AsRef<Path>, projectile: &Projectile) -> Result<(), DocError> {
    write_doc(path.as_ref(), &ProjectileDoc::from_projectile(projectile))
}

pub fn save_prototype(path: impl AsRef<Path>, proto: &TabPrototype) -> Result<(), DocError> {
    write_doc(path.as_ref(), &TabPrototypeDoc::from_prototype(proto))
}

fn logged<T>(path: &Path, what: &'static str, res: Result<T, DocError>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to load {what}");
            None
        }
    }
}

/// Load an impact document; failures are logged and yield `None`.
pub fn load_impact(path: impl AsRef<Path>) -> Option<Impact> {
    let path = path.as_ref();
    logged(path, "impact", read_impact(path))
}

pub fn load_projectile(path: impl AsRef<Path>) -> Option<Projectile> {
    let path = path.as_ref();
    logged(path, "projectile", read_projectile(path))
}

pub fn load_prototype(path: impl AsRef<Path>) -> Option<TabPrototype> {
    let path = path.as_ref();
    logged(path, "tab prototype", read_prototype(path))
}

/// Every valid `*.tab` document in `dir`, in file-name order.
pub fn load_tab_library(dir: impl AsRef<Path>) -> Vec<TabPrototype> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %dir.display(), error = %err, "failed to read tab library");
            return Vec::new();
        }
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == TAB_EXTENSION))
        .collect();
    paths.sort();
    let library: Vec<TabPrototype> = paths.iter().filter_map(load_prototype).collect();
    debug!(path = %dir.display(), files = paths.len(), loaded = library.len(), "tab library");
    library
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drc::DrcCfg;
    use crate::impact::ShatterParams;
    use crate::tab::TabCfg;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample_impact() -> Impact {
        let frame = RectangularFrame::new(Point::new(-150.0, -120.0), Point::new(150.0, 120.0));
        let params = ShatterParams {
            rings: 5,
            divisions: 10,
            impact_radius: [20.0, 200.0],
            ..ShatterParams::default()
        };
        let mut rng = StdRng::seed_from_u64(31);
        Impact::generate(frame, None, &[], &params, &TabCfg::default(), &mut rng)
    }

    fn minimal_doc() -> serde_json::Value {
        json!({
            "version": "1.0",
            "ndiv": 4,
            "frame": { "type": "rectangular", "corners": [0.0, 0.0, 100.0, 100.0] },
            "tabmatrix": {
                "rows": 2,
                "columns": 2,
                "tabs": [
                    { "pos": [0, 0, 1], "tabtype": "FRACTURE", "scaledlen": 10.0,
                      "pts": [10.0, 10.0, 15.0, 12.0, 20.0, 10.0] },
                    { "pos": [1, 1, 0], "tabtype": "GAP", "scaledlen": 10.0,
                      "pts": [20.0, 10.0, 20.0, 20.0] }
                ]
            }
        })
    }

    #[test]
    fn impact_survives_a_file_round_trip() {
        let impact = sample_impact();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("impact.json");
        save_impact(&path, &impact).unwrap();
        let loaded = load_impact(&path).unwrap();

        assert_eq!(loaded.ndiv(), impact.ndiv());
        assert_eq!(loaded.frame(), impact.frame());
        assert_eq!(loaded.grid().rows(), impact.grid().rows());
        assert_eq!(loaded.grid().columns(), impact.grid().columns());
        assert_eq!(loaded.piece_count(), impact.piece_count());
        let pairs: Vec<_> = impact.tabs().zip(loaded.tabs()).collect();
        assert_eq!(pairs.len(), impact.grid().len());
        for ((k1, t1), (k2, t2)) in pairs {
            assert_eq!(k1, k2);
            assert_eq!(t1.shape(), t2.shape());
            assert_eq!((t1.ring(), t1.division(), t1.axis()), (t2.ring(), t2.division(), t2.axis()));
            assert_eq!(t1.points().len(), t2.points().len());
            assert_eq!(t1.points(), t2.points());
        }
    }

    #[test]
    fn reloaded_impact_reports_the_same_drc_errors() {
        let frame = RectangularFrame::new(Point::new(-400.0, -300.0), Point::new(400.0, 300.0));
        let cfg = DrcCfg::default();
        for seed in 20..40u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut impact =
                Impact::generate(frame.clone(), None, &[], &ShatterParams::default(), &TabCfg::default(), &mut rng);
            let mut reloaded = impact_from_json(&impact_to_json(&impact).unwrap()).unwrap();

            let before = impact.drc(&cfg).to_vec();
            let after = reloaded.drc(&cfg).to_vec();
            assert_eq!(before.len(), after.len(), "seed {seed}");
            for (a, b) in before.iter().zip(&after) {
                assert_eq!((a.kind, a.first, a.second), (b.kind, b.first, b.second), "seed {seed}");
                assert_eq!(a.value.map(f64::to_bits), b.value.map(f64::to_bits), "seed {seed}");
            }
        }
    }

    #[test]
    fn minimal_document_rebuilds_keys_and_rings() {
        let impact = impact_from_json(&minimal_doc().to_string()).unwrap();
        let inner = impact.tab(TabKey::new(0, 0, 1)).unwrap();
        assert_eq!(inner.shape(), TabShape::Fracture);
        assert_eq!((inner.ring(), inner.division(), inner.axis()), (0, 0, Axis::Angular));
        let radial = impact.tab(TabKey::new(1, 1, 0)).unwrap();
        assert!(radial.is_gap());
        assert_eq!((radial.ring(), radial.division(), radial.axis()), (2, 1, Axis::Radial));
        assert_eq!(impact.piece_count(), 1);

        let text = impact_to_json(&impact).unwrap();
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back["frame"]["type"], "rectangular");
        assert_eq!(back["tabmatrix"]["tabs"][1]["pos"], json!([1, 1, 0]));
        assert_eq!(back["tabmatrix"]["tabs"][0]["tabtype"], "FRACTURE");
    }

    #[test]
    fn malformed_documents_are_typed_errors() {
        let mut doc = minimal_doc();
        doc["version"] = json!("2.0");
        assert!(matches!(impact_from_json(&doc.to_string()), Err(DocError::Version { .. })));

        let mut doc = minimal_doc();
        doc["frame"]["type"] = json!("circular");
        assert!(matches!(impact_from_json(&doc.to_string()), Err(DocError::FrameType(_))));

        let mut doc = minimal_doc();
        doc["tabmatrix"]["tabs"][0]["pts"] = json!([1.0, 2.0, 3.0]);
        assert!(matches!(impact_from_json(&doc.to_string()), Err(DocError::OddCoordinates(3))));

        let mut doc = minimal_doc();
        doc["tabmatrix"]["tabs"][0]["pos"] = json!([2, 0, 1]);
        assert!(matches!(impact_from_json(&doc.to_string()), Err(DocError::Position { .. })));

        let mut doc = minimal_doc();
        doc["tabmatrix"]["tabs"][0]["pos"] = json!([0, 0, 2]);
        assert!(matches!(impact_from_json(&doc.to_string()), Err(DocError::Position { .. })));

        let mut doc = minimal_doc();
        doc["tabmatrix"]["tabs"][0]["pts"] = json!([1.0, 2.0]);
        assert!(matches!(impact_from_json(&doc.to_string()), Err(DocError::TooFewPoints([0, 0, 1]))));

        assert!(matches!(impact_from_json("{ not json"), Err(DocError::Json(_))));
    }

    #[test]
    fn load_helpers_return_none_on_failure() {
        let dir = tempdir().unwrap();
        assert!(load_impact(dir.path().join("missing.json")).is_none());
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "[]").unwrap();
        assert!(load_impact(&bad).is_none());
        assert!(matches!(read_impact(&bad), Err(DocError::Json(_))));
        assert!(matches!(read_projectile(dir.path().join("nope")), Err(DocError::Io(_))));
    }

    #[test]
    fn projectile_document_recentres_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rock.json");
        fs::write(
            &path,
            json!({ "version": "1.0", "pts": [10.0, 10.0, 14.0, 10.0, 14.0, 14.0, 10.0, 14.0] }).to_string(),
        )
        .unwrap();
        let projectile = load_projectile(&path).unwrap();
        assert_eq!(projectile.points().len(), 4);
        assert!(projectile.points()[0].dist(Point::new(-2.0, -2.0)) < 1e-9);

        save_projectile(&path, &projectile).unwrap();
        let again = read_projectile(&path).unwrap();
        assert!(again.points()[2].dist(Point::new(2.0, 2.0)) < 1e-9);

        fs::write(&path, json!({ "version": "1.0", "pts": [0.0, 0.0, 1.0, 1.0] }).to_string()).unwrap();
        assert!(matches!(read_projectile(&path), Err(DocError::Degenerate(_))));
    }

    #[test]
    fn library_loads_sorted_tab_files_and_skips_invalid_ones() {
        let dir = tempdir().unwrap();
        let zig = [Point::new(0.0, 0.0), Point::new(4.0, 3.0), Point::new(10.0, 0.0)];
        let bump = TabPrototype::new(TabShape::Fracture, &zig).unwrap();
        let flat = TabPrototype::new(TabShape::Line, &[Point::new(0.0, 0.0), Point::new(5.0, 0.0)]).unwrap();
        save_prototype(dir.path().join("b.tab"), &bump).unwrap();
        save_prototype(dir.path().join("a.tab"), &flat).unwrap();
        fs::write(dir.path().join("c.tab"), "garbage").unwrap();
        save_prototype(dir.path().join("d.json"), &bump).unwrap();

        let library = load_tab_library(dir.path());
        assert_eq!(library.len(), 2);
        assert_eq!(library[0].shape(), TabShape::Line);
        assert_eq!(library[1].shape(), TabShape::Fracture);
        assert!(library[1].points()[1].dist(Point::new(0.4, 0.3)) < 1e-9);

        assert!(load_tab_library(dir.path().join("absent")).is_empty());
    }
}
