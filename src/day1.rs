use anyhow::Context;
use lazy_format::lazy_format;
use regex::Regex;

const DIAL_SIZE: i64 = 100;
const DIAL_START: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Rotation {
    direction: Direction,
    clicks: i64,
}

impl Rotation {
    /// Number of clicks, during this rotation, that leave the dial pointing
    /// at 0 when starting from `position`.
    fn zero_crossings(self, position: i64) -> i64 {
        match self.direction {
            Direction::Right => {
                self.clicks / DIAL_SIZE + (position + self.clicks % DIAL_SIZE) / DIAL_SIZE
            }
            Direction::Left if position == 0 => self.clicks / DIAL_SIZE,
            Direction::Left if self.clicks < position => 0,
            Direction::Left => (self.clicks - position) / DIAL_SIZE + 1,
        }
    }

    /// Full turns are dropped first, so huge rotations can't overflow
    fn apply(self, position: i64) -> i64 {
        let clicks = self.clicks % DIAL_SIZE;

        match self.direction {
            Direction::Right => (position + clicks).rem_euclid(DIAL_SIZE),
            Direction::Left => (position - clicks).rem_euclid(DIAL_SIZE),
        }
    }
}

#[derive(Debug)]
pub struct Input {
    rotations: Vec<Rotation>,
}

impl TryFrom<&str> for Input {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let pattern = Regex::new(r"^([LR])(\d+)$").expect("rotation pattern is valid");

        value
            .lines()
            .map(str::trim)
            .zip(1..)
            .filter(|(line, _)| !line.is_empty())
            .map(|(line, line_number)| {
                let captures = pattern.captures(line).with_context(|| {
                    format!("malformed rotation {line:?} on line {line_number}")
                })?;

                let direction = match &captures[1] {
                    "L" => Direction::Left,
                    _ => Direction::Right,
                };

                let clicks = captures[2]
                    .parse()
                    .context(lazy_format!("rotation too large on line {line_number}"))?;

                Ok(Rotation { direction, clicks })
            })
            .collect::<anyhow::Result<_>>()
            .map(|rotations| Input { rotations })
    }
}

pub fn part1(input: Input) -> anyhow::Result<usize> {
    Ok(input
        .rotations
        .iter()
        .scan(DIAL_START, |position, rotation| {
            *position = rotation.apply(*position);
            Some(*position)
        })
        .filter(|&position| position == 0)
        .count())
}

pub fn part2(input: Input) -> anyhow::Result<i64> {
    let (_, zeroes) = input
        .rotations
        .iter()
        .fold((DIAL_START, 0i64), |(position, zeroes), rotation| {
            (
                rotation.apply(position),
                zeroes + rotation.zero_crossings(position),
            )
        });

    Ok(zeroes)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE: &str = "\
L68
L30
R48
L5
R60
L55
L1
L99
R14
L82
";

    #[test]
    fn part1_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part1(input).unwrap(), 3);
    }

    #[test]
    fn part2_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part2(input).unwrap(), 6);
    }

    #[rstest]
    #[case("R1000", 10)]
    #[case("L50", 1)]
    #[case("L50\nL100", 2)]
    #[case("L50\nR1", 1)]
    #[case("R49", 0)]
    #[case("L150", 2)]
    #[case("R2147483600", 21474836)]
    #[case("L9223372036854775807", 92233720368547758)]
    fn part2_full_turns(#[case] input: &str, #[case] expected: i64) {
        let input = Input::try_from(input).unwrap();
        assert_eq!(part2(input).unwrap(), expected);
    }

    #[test]
    fn rejects_bad_direction() {
        let err = Input::try_from("L10\nU5\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn rejects_oversized_rotation() {
        let err = Input::try_from("R1\nL5\nR99999999999999999999\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn huge_rotation_keeps_position() {
        let input = Input::try_from("R9223372036854775807\nL7\n").unwrap();
        assert_eq!(part1(input).unwrap(), 0);

        let input = Input::try_from("R9223372036854775750\n").unwrap();
        assert_eq!(part1(input).unwrap(), 1);
    }
}
