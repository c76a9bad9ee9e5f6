mod glyphs;
mod types;

pub use glyphs::{ArrowGlyphs, GlyphSet, GlyphStyle};
pub use types::{Grid, Layout, Row};

use crate::config::LayoutConfig;
use crate::error::FlowError;
use crate::ir::{Cell, CellKind, ColumnRegistry, Direction, Flow, SourceLine};
use crate::parser::parse_cell;

/// Places cells of one flow into rows, one cell at a time.
///
/// Every builder owns its own cursors and counters, so independent flows can
/// be built side by side without sharing anything but read-only lanes.
#[derive(Debug)]
pub struct GridBuilder<'a> {
    registry: &'a ColumnRegistry,
    glyphs: GlyphSet,
    strict_self_transitions: bool,
    grid: Grid,
    current_row: Option<usize>,
    current_column: usize,
    continuation_open: bool,
    work_counter: usize,
}

impl<'a> GridBuilder<'a> {
    pub fn new(registry: &'a ColumnRegistry, config: &LayoutConfig) -> Self {
        Self {
            registry,
            glyphs: GlyphSet::for_style(config.glyphs),
            strict_self_transitions: config.strict_self_transitions,
            grid: Grid::default(),
            current_row: None,
            current_column: registry.first_work().unwrap_or(0),
            continuation_open: true,
            work_counter: 0,
        }
    }

    /// Title of the lane the flow is currently in.
    #[cfg(test)]
    fn current_column(&self) -> &str {
        self.registry
            .get(self.current_column)
            .map(|column| column.title.as_str())
            .unwrap_or_default()
    }

    /// Rows placed so far. After a failed `feed` this is only a diagnostic
    /// snapshot, not a finished grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn feed_line(&mut self, line: &SourceLine) -> Result<(), FlowError> {
        self.feed(parse_cell(&line.text), line.number, &line.raw)
    }

    pub fn feed(&mut self, cell: Cell, line: usize, raw: &str) -> Result<(), FlowError> {
        match cell.kind {
            CellKind::Work => {
                self.feed_work(cell);
                Ok(())
            }
            CellKind::Arrow => self.feed_arrow(cell, line, raw),
            CellKind::DummyWork | CellKind::DummyArrow => {
                tracing::warn!(line, "ignoring placeholder cell fed as input");
                Ok(())
            }
        }
    }

    pub fn finish(self) -> Grid {
        self.grid
    }

    fn open_row(&mut self) -> usize {
        let index = self.grid.push(Row::new(self.registry.len()));
        self.current_row = Some(index);
        index
    }

    fn feed_work(&mut self, mut cell: Cell) {
        let row = match self.current_row {
            Some(row) if self.continuation_open => row,
            _ => self.open_row(),
        };
        self.work_counter += 1;
        cell.sequence = Some(self.work_counter);
        cell.prefix = format!("{}, ", self.work_counter);
        tracing::debug!(row, lane = self.current_column, seq = self.work_counter, "placed work");
        self.place(row, self.current_column, cell);
        self.continuation_open = false;
    }

    fn feed_arrow(&mut self, mut cell: Cell, line: usize, raw: &str) -> Result<(), FlowError> {
        let tag = cell.dest_tag.clone().unwrap_or_default();
        let Some(dest) = self.registry.resolve(&tag) else {
            return Err(FlowError::UnknownColumn {
                tag,
                line,
                raw: raw.to_string(),
            });
        };
        let from = self.current_column;
        if from == dest && self.strict_self_transitions {
            return Err(FlowError::SelfTransition {
                tag,
                line,
                raw: raw.to_string(),
            });
        }

        let (left, right) = (from.min(dest), from.max(dest));
        let lane = (left + right) / 2;
        let direction = Direction::between(from, dest);
        let glyphs = self.glyphs.arrow(direction);

        cell.direction = Some(direction);
        if cell.label.is_empty() {
            cell.label = glyphs.filler.to_string();
        } else {
            cell.prefix = glyphs.prefix.to_string();
            cell.suffix = glyphs.suffix.to_string();
        }

        let blocked = match self.current_row {
            Some(row) => self.grid.rows()[row].is_occupied(lane),
            None => true,
        };
        if blocked {
            self.insert_continuation_row(from);
        }
        if let Some(row) = self.current_row {
            if row > 0 && self.grid.rows()[row - 1].is_occupied(lane) {
                self.insert_continuation_row(from);
            }
        }

        if left == right {
            tracing::debug!(line, tag = %tag, "self transition, nothing placed");
            return Ok(());
        }

        let row = match self.current_row {
            Some(row) => row,
            None => self.open_row(),
        };
        for between in left + 1..right {
            self.place(
                row,
                between,
                Cell::filler(CellKind::DummyArrow, glyphs.filler, Some(direction)),
            );
        }
        tracing::debug!(row, lane, from, dest, "placed arrow");
        self.place(row, lane, cell);

        self.current_column = dest;
        self.continuation_open = true;
        Ok(())
    }

    /// Open a fresh row and move the cell in `lane` of the active row down
    /// into it, leaving a continuation marker behind.
    fn insert_continuation_row(&mut self, lane: usize) {
        let marker = Cell::filler(CellKind::DummyWork, self.glyphs.continuation, None);
        let previous = self.current_row;
        let next = self.open_row();
        match previous {
            Some(previous) => {
                let moved = self.grid.row_mut(previous).place(lane, marker);
                self.grid.row_mut(next).put(lane, moved);
            }
            None => {
                self.grid.row_mut(next).place(lane, marker);
            }
        }
        tracing::debug!(row = next, lane, "inserted continuation row");
    }

    fn place(&mut self, row: usize, lane: usize, cell: Cell) {
        if let Some(displaced) = self.grid.row_mut(row).place(lane, cell) {
            if !displaced.is_placeholder() {
                tracing::warn!(
                    row,
                    lane,
                    label = %displaced.label,
                    "cell overwritten while placing a connector"
                );
            }
        }
    }
}

/// Feed every cell of `flow` through a fresh builder.
pub fn compute_layout(flow: &Flow, config: &LayoutConfig) -> Result<Layout, FlowError> {
    let mut builder = GridBuilder::new(&flow.registry, config);
    for parsed in &flow.cells {
        builder.feed(parsed.cell.clone(), parsed.line, &parsed.raw)?;
    }
    let grid = builder.finish();
    tracing::info!(
        lanes = flow.registry.len(),
        rows = grid.len(),
        "built flow grid"
    );
    Ok(Layout {
        columns: flow.registry.columns().to_vec(),
        grid,
    })
}
