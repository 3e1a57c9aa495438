//! Piece extraction: flood fill over the cell grid with gaps as passages.
//!
//! Cell `(i, j)` is bounded by four slots, visited in this order:
//!
//! | slot            | edge                      | leads to      |
//! |-----------------|---------------------------|---------------|
//! | `(i, j, 1)`     | inner angular (ring `j`)  | `(i, j-1)`    |
//! | `(i, j, 0)`     | radial at division `i`    | `(i-1, j)`    |
//! | `(i, j+1, 1)`   | outer angular (ring `j+1`)| `(i, j+1)`    |
//! | `(i+1, j, 0)`   | radial at division `i+1`  | `(i+1, j)`    |
//!
//! Divisions wrap modulo `ndiv` (rows cropped away are absent); columns never
//! wrap. The walk uses an explicit stack but visits, creates pieces and links
//! neighbours in exactly the order of the recursive formulation: the current
//! piece is threaded through the whole traversal started at one seed cell.

use super::{Impact, TabGrid};
use crate::piece::{link, Piece, PieceId};
use crate::tab::TabKey;

type Cell = (usize, usize);

struct Frame {
    cell: Cell,
    step: usize,
    candidates: Vec<Cell>,
}

impl Impact {
    /// Re-derive pieces from the current gap layout.
    pub fn recompute_pieces(&mut self) {
        self.pieces = extract_pieces(&self.grid, self.ndiv);
    }
}

/// Bounding slots of a cell with the cell across each (if present).
fn slots(cell: Cell, grid: &TabGrid, ndiv: usize) -> [(TabKey, Option<Cell>); 4] {
    let (i, j) = cell;
    let present = |c: Cell| (c.0 < grid.rows() && c.1 < grid.columns()).then_some(c);
    let prev = (i + ndiv - 1) % ndiv;
    let next = (i + 1) % ndiv;
    [
        (TabKey::new(i, j, 1), j.checked_sub(1).and_then(|jm| present((i, jm)))),
        (TabKey::new(i, j, 0), present((prev, j))),
        (TabKey::new(i, j + 1, 1), present((i, j + 1))),
        (TabKey::new(next, j, 0), present((next, j))),
    ]
}

/// All pieces in discovery order (seed cells in row-major order).
pub fn extract_pieces(grid: &TabGrid, ndiv: usize) -> Vec<Piece> {
    let (rows, cols) = (grid.rows(), grid.columns());
    let ndiv = ndiv.max(rows).max(1);
    let mut visited = vec![false; rows * cols];
    let mut owner: Vec<Option<PieceId>> = vec![None; rows * cols];
    let mut pieces: Vec<Piece> = Vec::new();
    let at = |c: Cell| c.0 * cols + c.1;

    for i in 0..rows {
        for j in 0..cols {
            if visited[at((i, j))] {
                continue;
            }
            visited[at((i, j))] = true;
            let mut current: Option<PieceId> = None;
            let mut stack = vec![Frame {
                cell: (i, j),
                step: 0,
                candidates: Vec::new(),
            }];

            while let Some(top) = stack.last_mut() {
                if top.step == 4 {
                    let Some(done) = stack.pop() else { break };
                    if let Some(me) = current {
                        for c in done.candidates {
                            if let Some(other) = owner[at(c)] {
                                link(&mut pieces, me, other);
                            }
                        }
                    }
                    continue;
                }
                let (key, across) = slots(top.cell, grid, ndiv)[top.step];
                top.step += 1;
                let Some(tab) = grid.get(key) else { continue };
                if tab.is_gap() {
                    if let Some(c) = across {
                        if !visited[at(c)] {
                            visited[at(c)] = true;
                            stack.push(Frame {
                                cell: c,
                                step: 0,
                                candidates: Vec::new(),
                            });
                        }
                    }
                } else {
                    if let Some(c) = across {
                        top.candidates.push(c);
                    }
                    let id = match current {
                        Some(id) => {
                            pieces[id.0].add_tab(key, tab);
                            id
                        }
                        None => {
                            pieces.push(Piece::new(key, tab));
                            PieceId(pieces.len() - 1)
                        }
                    };
                    current = Some(id);
                    owner[at(top.cell)] = Some(id);
                }
            }
        }
    }
    pieces
}
