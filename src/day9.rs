use anyhow::Context;
use gridly::prelude::*;
use gridly_grids::VecGrid;
use itertools::Itertools;
use nom::{
    character::complete::{char, digit1},
    Parser,
};
use nom_supreme::{error::ErrorTree, final_parser::final_parser, ParserExt};
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    library::{grid_locations, split_parser, ITResult, IterExt},
    parser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tile {
    x: i64,
    y: i64,
}

/// Area of the rectangle with these two tiles at opposite corners, counting
/// the tiles themselves
fn rectangle_area(a: Tile, b: Tile) -> i64 {
    ((a.x - b.x).abs() + 1) * ((a.y - b.y).abs() + 1)
}

fn parse_coordinate(input: &str) -> ITResult<&str, i64> {
    digit1.parse_from_str_cut().parse(input)
}

/// Parse something resembling "7,1"
fn parse_tile(input: &str) -> ITResult<&str, Tile> {
    parser! {
        parse_coordinate => x,
        char(','),
        parse_coordinate => y;
        Tile { x, y }
    }
    .parse(input)
}

#[derive(Debug)]
pub struct Input {
    tiles: Vec<Tile>,
}

fn parse_input(input: &str) -> ITResult<&str, Input> {
    split_parser(parse_tile, "\n")
        .map(|tiles| Input { tiles })
        .parse(input)
}

impl TryFrom<&str> for Input {
    type Error = ErrorTree<nom_supreme::final_parser::Location>;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        final_parser(parse_input)(value.trim())
    }
}

pub fn part1(input: Input) -> anyhow::Result<i64> {
    input
        .tiles
        .iter()
        .tuple_combinations()
        .map(|(&a, &b)| rectangle_area(a, b))
        .max()
        .context("need at least two red tiles to make a rectangle")
}

#[derive(Debug, Clone, Copy, Error)]
#[error("tiles ({},{}) and ({},{}) aren't in a straight line", .from.x, .from.y, .to.x, .to.y)]
struct DiagonalEdge {
    from: Tile,
    to: Tile,
}

/// The distinct coordinates along one axis. Compressed index `2i + 1` is the
/// `i`th coordinate; even indexes are the gaps between them, including one
/// extra gap at each end.
#[derive(Debug)]
struct Axis {
    coordinates: Vec<i64>,
}

impl Axis {
    fn new(coordinates: impl IntoIterator<Item = i64>) -> Self {
        let mut coordinates = coordinates.into_iter().collect_vec();
        coordinates.sort_unstable();
        coordinates.dedup();

        Self { coordinates }
    }

    fn len(&self) -> isize {
        (self.coordinates.len() * 2 + 1) as isize
    }

    fn compress(&self, coordinate: i64) -> isize {
        let idx = match self.coordinates.binary_search(&coordinate) {
            Ok(idx) => idx * 2 + 1,
            Err(idx) => idx * 2,
        };

        idx as isize
    }

    /// How many real tiles each compressed index spans. The outermost gaps
    /// are never part of a rectangle, so their width is arbitrary.
    fn widths(&self) -> Vec<i64> {
        let mut widths = Vec::with_capacity(self.coordinates.len() * 2 + 1);
        widths.push(1);

        for (idx, &coordinate) in self.coordinates.iter().enumerate() {
            widths.push(1);
            widths.push(match self.coordinates.get(idx + 1) {
                Some(&next) => next - coordinate - 1,
                None => 1,
            });
        }

        widths
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Cell {
    #[default]
    Unknown,
    Boundary,
    Outside,
}

/// Sum of everything in `prefix` up to and including this row and column.
/// Anything before the first row or column sums to 0.
fn prefix_sum(prefix: &VecGrid<i64>, row: isize, column: isize) -> i64 {
    prefix.get(Row(row) + Column(column)).copied().unwrap_or(0)
}

/// The tile floor, compressed so that each red tile's row and column gets a
/// cell of its own.
#[derive(Debug)]
struct Floor {
    columns: Axis,
    rows: Axis,

    /// Prefix sums over the number of real tiles outside the loop
    exterior: VecGrid<i64>,
}

impl Floor {
    fn new(tiles: &[Tile]) -> anyhow::Result<Self> {
        let columns = Axis::new(tiles.iter().map(|tile| tile.x));
        let rows = Axis::new(tiles.iter().map(|tile| tile.y));

        let dimensions = Vector {
            rows: Rows(rows.len()),
            columns: Columns(columns.len()),
        };

        let mut cells: VecGrid<Cell> =
            VecGrid::new(dimensions).context("failed to create the compressed floor")?;

        for [from, to] in tiles
            .iter()
            .copied()
            .chain(tiles.first().copied())
            .streaming_windows()
        {
            if from.x != to.x && from.y != to.y {
                return Err(DiagonalEdge { from, to }.into());
            }

            let (top, bottom) = minmax(rows.compress(from.y), rows.compress(to.y));
            let (left, right) = minmax(columns.compress(from.x), columns.compress(to.x));

            for row in (top..=bottom).map(Row) {
                for column in (left..=right).map(Column) {
                    if let Ok(cell) = cells.get_mut(row + column) {
                        *cell = Cell::Boundary;
                    }
                }
            }
        }

        // The corner is a gap cell, so it's always outside the loop
        let corner = Row(0) + Column(0);
        let mut queue = vec![corner];

        if let Ok(cell) = cells.get_mut(corner) {
            *cell = Cell::Outside;
        }

        while let Some(location) = queue.pop() {
            for &direction in EACH_DIRECTION.iter() {
                let neighbor = location + direction;

                if let Ok(cell) = cells.get_mut(neighbor) {
                    if *cell == Cell::Unknown {
                        *cell = Cell::Outside;
                        queue.push(neighbor);
                    }
                }
            }
        }

        let column_widths = columns.widths();
        let row_widths = rows.widths();
        let mut exterior: VecGrid<i64> =
            VecGrid::new(dimensions).context("failed to create the exterior sums")?;

        for location in grid_locations(&cells) {
            let row = location.row.0;
            let column = location.column.0;

            let area = match cells.get(location) {
                Ok(Cell::Outside) => column_widths[column as usize] * row_widths[row as usize],
                _ => 0,
            };

            let sum = area
                + prefix_sum(&exterior, row - 1, column)
                + prefix_sum(&exterior, row, column - 1)
                - prefix_sum(&exterior, row - 1, column - 1);

            if let Ok(cell) = exterior.get_mut(location) {
                *cell = sum;
            }
        }

        Ok(Self {
            columns,
            rows,
            exterior,
        })
    }

    /// True if every tile of the rectangle with these corners is red or green
    fn covers(&self, a: Tile, b: Tile) -> bool {
        let (top, bottom) = minmax(self.rows.compress(a.y), self.rows.compress(b.y));
        let (left, right) = minmax(self.columns.compress(a.x), self.columns.compress(b.x));

        let sum = |row, column| prefix_sum(&self.exterior, row, column);

        let outside = sum(bottom, right) - sum(top - 1, right) - sum(bottom, left - 1)
            + sum(top - 1, left - 1);

        outside == 0
    }
}

fn minmax(a: isize, b: isize) -> (isize, isize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub fn part2(input: Input) -> anyhow::Result<i64> {
    let tiles = &input.tiles;
    let floor = Floor::new(tiles).context("red tiles don't form a closed loop")?;

    log::debug!(
        "compressed floor is {}x{}",
        floor.columns.len(),
        floor.rows.len()
    );

    (0..tiles.len())
        .into_par_iter()
        .flat_map_iter(|a| (a + 1..tiles.len()).map(move |b| (tiles[a], tiles[b])))
        .filter(|&(a, b)| floor.covers(a, b))
        .map(|(a, b)| rectangle_area(a, b))
        .max()
        .context("no rectangle fits inside the loop")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
7,1
11,1
11,7
9,7
9,5
2,5
2,3
7,3
";

    // A U shape with a one tile wide notch at x=2
    const NOTCHED: &str = "0,0\n4,0\n4,4\n3,4\n3,1\n1,1\n1,4\n0,4\n";

    #[test]
    fn part1_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part1(input).unwrap(), 50);
    }

    #[test]
    fn part2_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part2(input).unwrap(), 24);
    }

    #[test]
    fn notch_blocks_rectangles() {
        let input = Input::try_from(NOTCHED).unwrap();
        assert_eq!(part1(input).unwrap(), 25);

        let input = Input::try_from(NOTCHED).unwrap();
        assert_eq!(part2(input).unwrap(), 10);
    }

    #[test]
    fn compressed_widths() {
        let axis = Axis::new([2, 7, 9, 11, 7]);
        assert_eq!(axis.len(), 9);
        assert_eq!(axis.compress(9), 5);
        assert_eq!(axis.widths(), [1, 1, 4, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn diagonal_edges_rejected() {
        let input = Input::try_from("0,0\n3,3\n0,3\n").unwrap();
        assert!(part2(input).is_err());
    }

    #[test]
    fn single_tile_has_no_rectangle() {
        let input = Input::try_from("5,5\n").unwrap();
        assert!(part1(input).is_err());
    }
}
