use std::ops::RangeInclusive;

use itertools::Itertools;
use nom::{
    character::complete::{char, digit1, multispace0},
    combinator::eof,
    multi::separated_list0,
    Parser,
};
use nom_supreme::{
    error::ErrorTree, final_parser::final_parser, multi::collect_separated_terminated,
    tag::complete::tag, ParserExt,
};

use crate::{
    library::{Definitely, ITResult},
    parser,
};

type IngredientId = u64;

fn parse_id(input: &str) -> ITResult<&str, IngredientId> {
    digit1.parse_from_str_cut().parse(input)
}

/// Parse something resembling "10-14"
fn parse_fresh_range(input: &str) -> ITResult<&str, RangeInclusive<IngredientId>> {
    parser! {
        parse_id => start,
        char('-'),
        parse_id => end;
        start..=end
    }
    .parse(input)
}

#[derive(Debug)]
pub struct Input {
    fresh: Vec<RangeInclusive<IngredientId>>,
    available: Vec<IngredientId>,
}

fn parse_input(input: &str) -> ITResult<&str, Input> {
    parser! {
        collect_separated_terminated(
            parse_fresh_range,
            char('\n'),
            tag("\n\n"),
        ).context("fresh ranges") => fresh,
        // Only part 1 needs the ids, so the list may be empty
        separated_list0(char('\n'), parse_id)
            .terminated(multispace0)
            .terminated(eof)
            .context("available ids") => available;
        Input { fresh, available }
    }
    .parse(input)
}

impl TryFrom<&str> for Input {
    type Error = ErrorTree<nom_supreme::final_parser::Location>;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        final_parser(parse_input)(value)
    }
}

/// Sort the ranges and fuse any that overlap or touch, so that every id is
/// covered by at most one range.
fn merge_ranges(
    mut ranges: Vec<RangeInclusive<IngredientId>>,
) -> Vec<RangeInclusive<IngredientId>> {
    ranges.sort_unstable_by_key(|range| (*range.start(), *range.end()));

    ranges
        .into_iter()
        .filter(|range| !range.is_empty())
        .coalesce(|lhs, rhs| {
            if *rhs.start() <= lhs.end().saturating_add(1) {
                Ok(*lhs.start()..=*lhs.end().max(rhs.end()))
            } else {
                Err((lhs, rhs))
            }
        })
        .collect()
}

pub fn part1(input: Input) -> Definitely<usize> {
    Ok(input
        .available
        .iter()
        .filter(|&&id| input.fresh.iter().any(|range| range.contains(&id)))
        .count())
}

pub fn part2(input: Input) -> Definitely<u64> {
    Ok(merge_ranges(input.fresh)
        .into_iter()
        .map(|range| range.end() - range.start() + 1)
        .sum())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE: &str = "\
3-5
10-14
16-20
12-18

1
5
8
11
17
32
";

    #[test]
    fn part1_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part1(input).unwrap(), 3);
    }

    #[test]
    fn part2_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part2(input).unwrap(), 14);
    }

    #[rstest]
    #[case(vec![3..=5, 10..=14, 16..=20, 12..=18], vec![3..=5, 10..=20])]
    #[case(vec![1..=10, 2..=3], vec![1..=10])]
    #[case(vec![1..=2, 3..=4], vec![1..=4])]
    #[case(vec![5..=6, 1..=2], vec![1..=2, 5..=6])]
    fn merging(
        #[case] ranges: Vec<RangeInclusive<IngredientId>>,
        #[case] expected: Vec<RangeInclusive<IngredientId>>,
    ) {
        assert_eq!(merge_ranges(ranges), expected);
    }

    #[test]
    fn ranges_without_ids() {
        let input = Input::try_from("3-5\n10-14\n\n").unwrap();
        assert!(input.available.is_empty());
        assert_eq!(part2(input).unwrap(), 8);
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(Input::try_from("3-5\n1\n").is_err());
    }
}
