use std::num::NonZeroUsize;

use anyhow::Context;
use gridly::prelude::*;
use gridly_grids::VecGrid;
use lazy_format::lazy_format;

use crate::library::{grid_locations, OrderedCounter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Start,
    Splitter,
}

impl Cell {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'.' => Some(Cell::Empty),
            b'S' => Some(Cell::Start),
            b'^' => Some(Cell::Splitter),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Input {
    manifold: VecGrid<Cell>,
    start: Location,
}

impl TryFrom<&str> for Input {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let rows = value
            .trim()
            .lines()
            .zip(1..)
            .map(|(line, line_number)| {
                line.trim()
                    .bytes()
                    .map(Cell::from_byte)
                    .collect::<Option<Vec<Cell>>>()
                    .context(lazy_format!("unrecognized cell on line {line_number}"))
            })
            .collect::<anyhow::Result<Vec<Vec<Cell>>>>()?;

        let manifold = VecGrid::new_from_rows(rows).context("failed to create grid")?;

        let start = grid_locations(&manifold)
            .find(|&location| matches!(manifold.get(location), Ok(Cell::Start)))
            .context("no start location in the manifold")?;

        Ok(Input { manifold, start })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BeamReport {
    /// How many times a beam hit a splitter. Overlapping beams hit it once.
    splits: usize,

    /// How many distinct paths a single particle could have taken
    timelines: usize,
}

/// Send a beam down from the start. Beams in the same column travel
/// together; the counter tracks how many timelines each column carries.
fn fire_beam(input: &Input) -> BeamReport {
    let manifold = &input.manifold;
    let bottom = manifold.dimensions().rows;

    // Beams are keyed by column index
    let mut beams: OrderedCounter<isize> = OrderedCounter::new();
    beams.add(input.start.column.0, NonZeroUsize::MIN);

    let mut splits = 0;

    for row in (input.start.row.0..bottom.0).map(Row) {
        let mut next = OrderedCounter::new();

        for (&column, timelines) in beams.iter() {
            let location = row + Column(column);

            match manifold.get(location) {
                Ok(Cell::Splitter) => {
                    splits += 1;

                    [Left, Right]
                        .into_iter()
                        .map(|direction| location + direction)
                        .filter(|&target| manifold.get(target).is_ok())
                        .for_each(|target| next.add(target.column.0, timelines));
                }
                _ => next.add(column, timelines),
            }
        }

        beams = next;
    }

    log::debug!("{} beams leave the manifold", beams.len());

    BeamReport {
        splits,
        timelines: beams.total(),
    }
}

pub fn part1(input: Input) -> anyhow::Result<usize> {
    Ok(fire_beam(&input).splits)
}

pub fn part2(input: Input) -> anyhow::Result<usize> {
    Ok(fire_beam(&input).timelines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
.......S.......
...............
.......^.......
...............
......^.^......
...............
.....^.^.^.....
...............
....^.^...^....
...............
...^.^...^.^...
...............
..^...^.....^..
...............
.^.^.^.^.^...^.
...............
";

    #[test]
    fn part1_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part1(input).unwrap(), 21);
    }

    #[test]
    fn part2_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part2(input).unwrap(), 40);
    }

    #[test]
    fn beams_falling_off_the_side() {
        let input = Input::try_from("S.\n^.\n..\n").unwrap();
        assert_eq!(
            fire_beam(&input),
            BeamReport {
                splits: 1,
                timelines: 1
            }
        );
    }

    #[test]
    fn missing_start() {
        assert!(Input::try_from("...\n.^.\n").is_err());
    }
}
