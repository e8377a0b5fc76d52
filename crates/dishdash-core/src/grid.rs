//! The kitchen floor plan: a fixed grid of classified tiles.
//!
//! A grid is built once per level and never changes kind at runtime. Rows are
//! numbered from the first line of a layout, columns from the left.

use crate::id::TilePoint;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TileKind
// ---------------------------------------------------------------------------

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    Counter,
    Machine,
    Sink,
    Table,
    Trashcan,
    Floor,
    #[default]
    Unknown,
}

impl TileKind {
    pub const ALL: [TileKind; 7] = [
        TileKind::Counter,
        TileKind::Machine,
        TileKind::Sink,
        TileKind::Table,
        TileKind::Trashcan,
        TileKind::Floor,
        TileKind::Unknown,
    ];

    /// Whether food may be set down on this kind of tile.
    pub fn placeable(self) -> bool {
        match self {
            TileKind::Counter
            | TileKind::Machine
            | TileKind::Sink
            | TileKind::Table
            | TileKind::Trashcan => true,
            TileKind::Floor | TileKind::Unknown => false,
        }
    }

    /// Layout glyph for this kind.
    pub fn glyph(self) -> char {
        match self {
            TileKind::Counter => 'C',
            TileKind::Machine => 'M',
            TileKind::Sink => 'S',
            TileKind::Table => 'T',
            TileKind::Trashcan => 'X',
            TileKind::Floor => '.',
            TileKind::Unknown => '?',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        TileKind::ALL.into_iter().find(|k| k.glyph() == glyph)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("layout has no rows")]
    Empty,
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile glyph '{glyph}' at {at}")]
    UnknownGlyph { glyph: char, at: TilePoint },
}

// ---------------------------------------------------------------------------
// TileGrid
// ---------------------------------------------------------------------------

/// Immutable map from `(column, row)` to [`TileKind`]. Cells outside the grid
/// read as [`TileKind::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    columns: usize,
    rows: usize,
    /// Row-major cells.
    cells: Vec<TileKind>,
}

impl TileGrid {
    /// A grid of the given size filled with one kind.
    pub fn filled(columns: usize, rows: usize, kind: TileKind) -> Self {
        Self {
            columns,
            rows,
            cells: vec![kind; columns * rows],
        }
    }

    /// Parse an ASCII layout, one line per row. See [`TileKind::glyph`].
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let first = rows.first().ok_or(GridError::Empty)?;
        let columns = first.as_ref().chars().count();
        if columns == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(columns * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != columns {
                return Err(GridError::RaggedRow {
                    row,
                    expected: columns,
                    found,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let kind = TileKind::from_glyph(glyph).ok_or(GridError::UnknownGlyph {
                    glyph,
                    at: TilePoint::new(column as i32, row as i32),
                })?;
                cells.push(kind);
            }
        }

        Ok(Self {
            columns,
            rows: rows.len(),
            cells,
        })
    }

    /// The stock single-station kitchen: floor everywhere with one counter,
    /// machine and sink stacked in column 5, a trashcan beside them, and a
    /// single customer table.
    pub fn default_kitchen() -> Self {
        let mut grid = Self::filled(10, 12, TileKind::Floor);
        grid.set(TilePoint::new(5, 5), TileKind::Counter);
        grid.set(TilePoint::new(5, 6), TileKind::Machine);
        grid.set(TilePoint::new(5, 7), TileKind::Sink);
        grid.set(TilePoint::new(4, 5), TileKind::Trashcan);
        grid.set(TilePoint::new(7, 9), TileKind::Table);
        grid
    }

    /// Layout-time edit. Grids are not modified once handed to a kitchen.
    pub fn set(&mut self, at: TilePoint, kind: TileKind) {
        if let Some(idx) = self.index(at) {
            self.cells[idx] = kind;
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn contains(&self, at: TilePoint) -> bool {
        self.index(at).is_some()
    }

    fn index(&self, at: TilePoint) -> Option<usize> {
        let column = usize::try_from(at.column).ok()?;
        let row = usize::try_from(at.row).ok()?;
        (column < self.columns && row < self.rows).then_some(row * self.columns + column)
    }

    pub fn kind_at(&self, at: TilePoint) -> TileKind {
        self.index(at)
            .map(|idx| self.cells[idx])
            .unwrap_or(TileKind::Unknown)
    }

    pub fn is_placeable(&self, at: TilePoint) -> bool {
        self.kind_at(at).placeable()
    }

    /// Every cell of `kind`, enumerated column by column, top to bottom.
    /// This is the order tables are offered to arriving customers.
    pub fn positions_of(&self, kind: TileKind) -> Vec<TilePoint> {
        let mut out = Vec::new();
        for column in 0..self.columns {
            for row in 0..self.rows {
                if self.cells[row * self.columns + column] == kind {
                    out.push(TilePoint::new(column as i32, row as i32));
                }
            }
        }
        out
    }

    /// Render back to ASCII rows.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.columns.max(1))
            .map(|row| row.iter().map(|k| k.glyph()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeability_by_kind() {
        assert!(TileKind::Counter.placeable());
        assert!(TileKind::Trashcan.placeable());
        assert!(!TileKind::Floor.placeable());
        assert!(!TileKind::Unknown.placeable());
    }

    #[test]
    fn parse_layout() {
        let grid = TileGrid::from_rows(&["..C", "MST", "X.?"]).unwrap();
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.kind_at(TilePoint::new(2, 0)), TileKind::Counter);
        assert_eq!(grid.kind_at(TilePoint::new(0, 1)), TileKind::Machine);
        assert_eq!(grid.kind_at(TilePoint::new(2, 1)), TileKind::Table);
        assert_eq!(grid.kind_at(TilePoint::new(0, 2)), TileKind::Trashcan);
    }

    #[test]
    fn out_of_bounds_is_unknown() {
        let grid = TileGrid::filled(2, 2, TileKind::Counter);
        assert_eq!(grid.kind_at(TilePoint::new(-1, 0)), TileKind::Unknown);
        assert_eq!(grid.kind_at(TilePoint::new(2, 0)), TileKind::Unknown);
        assert!(!grid.is_placeable(TilePoint::new(0, 5)));
        assert!(grid.is_placeable(TilePoint::new(1, 1)));
    }

    #[test]
    fn ragged_layout_rejected() {
        let err = TileGrid::from_rows(&["CC", "C"]).unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn empty_and_unknown_glyphs_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(TileGrid::from_rows(&empty).unwrap_err(), GridError::Empty);
        assert!(matches!(
            TileGrid::from_rows(&["C#"]).unwrap_err(),
            GridError::UnknownGlyph { glyph: '#', .. }
        ));
    }

    #[test]
    fn positions_enumerate_column_major() {
        let grid = TileGrid::from_rows(&["T.T", "T.."]).unwrap();
        assert_eq!(
            grid.positions_of(TileKind::Table),
            vec![
                TilePoint::new(0, 0),
                TilePoint::new(0, 1),
                TilePoint::new(2, 0)
            ]
        );
    }

    #[test]
    fn default_kitchen_has_one_of_each_station() {
        let grid = TileGrid::default_kitchen();
        for kind in [
            TileKind::Counter,
            TileKind::Machine,
            TileKind::Sink,
            TileKind::Table,
            TileKind::Trashcan,
        ] {
            assert_eq!(grid.positions_of(kind).len(), 1, "{kind:?}");
        }
    }

    #[test]
    fn rows_round_trip_through_text() {
        let rows = ["C.M", "S.T"];
        let grid = TileGrid::from_rows(&rows).unwrap();
        assert_eq!(grid.to_rows(), rows);
    }
}
