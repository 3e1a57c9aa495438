//! Dense `(division, column, slot)` storage for tabs.

use crate::tab::{Tab, TabKey};

/// `rows × columns × 2` optional tabs, row-major with the slot innermost.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabGrid {
    rows: usize,
    columns: usize,
    cells: Vec<Option<Tab>>,
}

impl TabGrid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows * columns * 2],
        }
    }

    /// Angular divisions kept after cropping.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }
    /// Ring levels kept after cropping.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn contains_key(&self, key: TabKey) -> bool {
        key.division < self.rows && key.column < self.columns && key.slot < 2
    }

    fn index(&self, key: TabKey) -> Option<usize> {
        self.contains_key(key)
            .then(|| (key.division * self.columns + key.column) * 2 + key.slot)
    }

    pub fn get(&self, key: TabKey) -> Option<&Tab> {
        self.index(key).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, key: TabKey) -> Option<&mut Tab> {
        self.index(key).and_then(|i| self.cells[i].as_mut())
    }

    /// Store `tab` at `key`; returns `false` if the key is outside the grid.
    pub fn set(&mut self, key: TabKey, tab: Option<Tab>) -> bool {
        match self.index(key) {
            Some(i) => {
                self.cells[i] = tab;
                true
            }
            None => false,
        }
    }

    /// Present tabs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (TabKey, &Tab)> + '_ {
        let columns = self.columns;
        self.cells.iter().enumerate().filter_map(move |(i, t)| {
            let tab = t.as_ref()?;
            let slot = i % 2;
            let cell = i / 2;
            Some((TabKey::new(cell / columns, cell % columns, slot), tab))
        })
    }

    /// Keys of present tabs, in key order.
    pub fn keys(&self) -> Vec<TabKey> {
        self.iter().map(|(k, _)| k).collect()
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep the leading `rows × columns` block.
    pub fn cropped(mut self, rows: usize, columns: usize) -> Self {
        let rows = rows.min(self.rows);
        let columns = columns.min(self.columns);
        let mut out = Self::new(rows, columns);
        for i in 0..rows {
            for j in 0..columns {
                for s in 0..2 {
                    let key = TabKey::new(i, j, s);
                    if let Some(idx) = self.index(key) {
                        out.set(key, self.cells[idx].take());
                    }
                }
            }
        }
        out
    }
}
