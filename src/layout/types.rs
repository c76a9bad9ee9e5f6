use crate::ir::{Cell, Column};

/// One horizontal slice of the grid: exactly one slot per lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    slots: Vec<Option<Cell>>,
}

impl Row {
    pub fn new(width: usize) -> Self {
        Self {
            slots: vec![None; width],
        }
    }

    pub fn width(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, lane: usize) -> Option<&Cell> {
        self.slots.get(lane).and_then(Option::as_ref)
    }

    pub fn is_occupied(&self, lane: usize) -> bool {
        self.get(lane).is_some()
    }

    pub fn slots(&self) -> &[Option<Cell>] {
        &self.slots
    }

    /// Put `cell` into `lane`, handing back whatever was there.
    pub(crate) fn place(&mut self, lane: usize, cell: Cell) -> Option<Cell> {
        self.slots[lane].replace(cell)
    }

    pub(crate) fn put(&mut self, lane: usize, cell: Option<Cell>) {
        self.slots[lane] = cell;
    }

    pub fn first_filled(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_some)
    }
}

/// Append-only sequence of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn push(&mut self, row: Row) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> &mut Row {
        &mut self.rows[index]
    }

    /// Every placed cell with its `(row, lane)` position, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row_idx, row)| {
            row.slots
                .iter()
                .enumerate()
                .filter_map(move |(lane, slot)| slot.as_ref().map(|cell| (row_idx, lane, cell)))
        })
    }
}

/// A finished flow: the lanes and the grid placed across them.
#[derive(Debug, Clone)]
pub struct Layout {
    pub columns: Vec<Column>,
    pub grid: Grid,
}
