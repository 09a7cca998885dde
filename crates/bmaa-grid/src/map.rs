//! MovingAI `.map` loading.
//!
//! ```text
//! type octile
//! height 4
//! width 6
//! map
//! ......
//! .@@@..
//! ..S...
//! T.....
//! ```
//!
//! `.` (ground) and `S` (shallow water) are passable; every other character
//! is a wall.  The resulting graph is 8-connected with cardinal weight 1 and
//! diagonal weight √2, and a diagonal is added whenever both endpoints are
//! passable (corners are not checked).

use std::path::Path as FsPath;

use bmaa_core::GridPoint;

use crate::graph::{GridGraph, GridGraphBuilder};
use crate::{GridError, GridResult};

/// Terrain characters that produce a node.
pub const PASSABLE_TERRAIN: [u8; 2] = [b'.', b'S'];

#[inline]
pub fn is_passable(c: u8) -> bool {
    PASSABLE_TERRAIN.contains(&c)
}

/// A parsed character grid, before graph construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major terrain characters, `width * height` long.
    pub cells: Vec<u8>,
}

impl GridMap {
    /// Read and parse a `.map` file.  The map name is the file name.
    pub fn load(path: impl AsRef<FsPath>) -> GridResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut map = Self::parse(&text)?;
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            map.name = name.to_owned();
        }
        Ok(map)
    }

    /// Parse `.map` text.
    pub fn parse(text: &str) -> GridResult<Self> {
        let mut width = None;
        let mut height = None;
        let mut lines = text.lines().enumerate();

        // Header: key/value lines up to and including `map`.
        loop {
            let Some((i, line)) = lines.next() else {
                return Err(GridError::Parse { line: 0, msg: "missing `map` line".into() });
            };
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("map") => break,
                Some("type") | None => {}
                Some(key @ ("width" | "height")) => {
                    let value = parts
                        .next()
                        .and_then(|v| v.parse::<u32>().ok())
                        .ok_or_else(|| GridError::Parse {
                            line: i + 1,
                            msg: format!("`{key}` needs a non-negative integer"),
                        })?;
                    if key == "width" { width = Some(value) } else { height = Some(value) }
                }
                Some(other) => {
                    return Err(GridError::Parse {
                        line: i + 1,
                        msg: format!("unexpected header key `{other}`"),
                    });
                }
            }
        }

        let width  = width.ok_or(GridError::Parse { line: 0, msg: "missing width".into() })?;
        let height = height.ok_or(GridError::Parse { line: 0, msg: "missing height".into() })?;

        // Coordinates are i32 and the cell count must fit a u32.
        let size = width
            .checked_mul(height)
            .filter(|_| width <= i32::MAX as u32 && height <= i32::MAX as u32)
            .ok_or(GridError::Parse { line: 0, msg: "map too large".into() })?;

        let mut cells = Vec::with_capacity((size as usize).min(text.len()));
        let mut rows = 0;
        for (i, line) in lines {
            let row = line.trim_end_matches(['\r', '\n']).as_bytes();
            if row.is_empty() && rows == height {
                continue;
            }
            if rows == height {
                return Err(GridError::Parse { line: i + 1, msg: "more rows than `height`".into() });
            }
            if row.len() != width as usize {
                return Err(GridError::Parse {
                    line: i + 1,
                    msg: format!("row has {} cells, expected {width}", row.len()),
                });
            }
            cells.extend_from_slice(row);
            rows += 1;
        }
        if rows != height {
            return Err(GridError::Parse {
                line: 0,
                msg: format!("found {rows} rows, expected {height}"),
            });
        }

        Ok(Self { name: String::new(), width, height, cells })
    }

    /// Terrain at `(x, y)`, or `None` outside the map.
    pub fn cell(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| is_passable(c)).count()
    }

    /// Build the 8-connected graph of the passable cells.  Node ids follow
    /// row-major order over passable cells.
    pub fn to_graph(&self) -> GridGraph {
        let mut b = GridGraphBuilder::with_capacity(self.passable_count(), self.cells.len() * 8);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if let Some(c) = self.cell(x, y).filter(|&c| is_passable(c)) {
                    b.add_node(GridPoint::new(x, y), c);
                }
            }
        }
        b.connect_octile();
        b.build()
    }
}
