use anyhow::Context;
use gridly::{prelude::*, vector::TOUCHING_ADJACENCIES};
use gridly_grids::VecGrid;
use lazy_format::lazy_format;

use crate::library::grid_locations;

/// A roll is accessible by forklift when fewer than this many of its
/// neighbors are rolls
const CROWDED: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Roll,
}

impl Cell {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'.' => Some(Cell::Empty),
            b'@' => Some(Cell::Roll),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Input {
    map: VecGrid<Cell>,
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

        VecGrid::new_from_rows(rows)
            .context("failed to create grid")
            .map(|map| Input { map })
    }
}

fn is_roll(map: &VecGrid<Cell>, location: Location) -> bool {
    matches!(map.get(location), Ok(Cell::Roll))
}

fn is_accessible(map: &VecGrid<Cell>, location: Location) -> bool {
    is_roll(map, location)
        && TOUCHING_ADJACENCIES
            .iter()
            .filter(|&&offset| is_roll(map, location + offset))
            .count()
            < CROWDED
}

fn accessible_rolls(map: &VecGrid<Cell>) -> Vec<Location> {
    grid_locations(map)
        .filter(|&location| is_accessible(map, location))
        .collect()
}

pub fn part1(input: Input) -> anyhow::Result<usize> {
    Ok(accessible_rolls(&input.map).len())
}

pub fn part2(Input { mut map }: Input) -> anyhow::Result<usize> {
    let mut removed = 0;

    loop {
        // Every roll that's accessible right now goes at once; removing one
        // doesn't let its neighbors go until the next round.
        let accessible = accessible_rolls(&map);

        if accessible.is_empty() {
            break;
        }

        log::debug!("removing {} rolls", accessible.len());
        removed += accessible.len();

        for location in accessible {
            if let Ok(cell) = map.get_mut(location) {
                *cell = Cell::Empty;
            }
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
..@@.@@@@.
@@@.@.@.@@
@@@@@.@.@@
@.@@@@..@.
@@.@@@@.@@
.@@@@@@@.@
.@.@.@.@@@
@.@@@.@@@@
.@@@@@@@@.
@.@.@@@.@.
";

    #[test]
    fn part1_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part1(input).unwrap(), 13);
    }

    #[test]
    fn part2_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part2(input).unwrap(), 43);
    }

    #[test]
    fn lone_rolls_are_accessible() {
        let input = Input::try_from("@.@\n...\n@.@\n").unwrap();
        assert_eq!(part1(input).unwrap(), 4);
    }

    #[test]
    fn packed_block_empties_from_the_corners() {
        let input = Input::try_from("@@@\n@@@\n@@@\n").unwrap();
        assert_eq!(part2(input).unwrap(), 9);
    }

    #[test]
    fn rejects_unknown_cells() {
        assert!(Input::try_from("@.#\n").is_err());
    }
}
