//! ASCII patterns for components.
//!
//! `#` is a component cell, `@` a component cell that is also a focus, and
//! `.` or a space is empty. Row `y` of the text is grid row `y`.

use thiserror::Error;

use crate::component::{Component, ComponentError};
use crate::result::MatchGroup;
use crate::shapes::Cell;

const CELL: char = '#';
const FOCUS: char = '@';
const UNASSIGNED: char = '+';
const EMPTY: char = '.';

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("Pattern has no cells")]
    Empty,
    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// A parsed component and its focus cells in reading order.
#[derive(Clone, Debug)]
pub struct Pattern {
    pub component: Component,
    pub foci: Vec<Cell>,
}

pub fn parse(text: &str) -> Result<Pattern, PatternError> {
    let rows: Vec<&str> = text.lines().collect();
    parse_rows(&rows)
}

pub fn parse_rows(rows: &[&str]) -> Result<Pattern, PatternError> {
    let mut cells = Vec::new();
    let mut foci = Vec::new();

    for (row, line) in rows.iter().enumerate() {
        for (col, glyph) in line.trim_end().chars().enumerate() {
            let cell = Cell::new(col as i32, row as i32);
            match glyph {
                CELL => cells.push(cell),
                FOCUS => {
                    cells.push(cell);
                    foci.push(cell);
                }
                EMPTY | ' ' => {}
                glyph => return Err(PatternError::UnknownGlyph { glyph, row, col }),
            }
        }
    }

    if cells.is_empty() {
        return Err(PatternError::Empty);
    }
    Ok(Pattern {
        component: Component::new(cells)?,
        foci,
    })
}

/// Draws `groups` over the bounding box of `component`.
///
/// Group `i` is drawn with the `i`-th capital letter and its origin with the
/// lowercase one; component cells in no group are drawn as `+`.
pub fn render(component: &Component, groups: &[MatchGroup]) -> String {
    let cells = component.cells();
    let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
        return String::new();
    };
    let min_x = cells.iter().map(|cell| cell.x).min().unwrap_or(first.x);
    let max_x = cells.iter().map(|cell| cell.x).max().unwrap_or(first.x);

    let mut out = String::new();
    for y in first.y..=last.y {
        if y > first.y {
            out.push('\n');
        }
        for x in min_x..=max_x {
            let cell = Cell::new(x, y);
            out.push(glyph_at(component, groups, cell));
        }
    }
    out
}

fn glyph_at(component: &Component, groups: &[MatchGroup], cell: Cell) -> char {
    let group = groups
        .iter()
        .enumerate()
        .find(|(_, group)| group.cells.binary_search(&cell).is_ok());

    match group {
        Some((i, group)) => {
            let letter = (b'A' + (i % 26) as u8) as char;
            if group.origin == Some(cell) {
                letter.to_ascii_lowercase()
            } else {
                letter
            }
        }
        None if component.contains(cell) => UNASSIGNED,
        None => EMPTY,
    }
}
