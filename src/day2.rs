use std::{collections::BTreeSet, ops::RangeInclusive};

use nom::{
    character::complete::{char, digit1},
    Parser,
};
use nom_supreme::{error::ErrorTree, final_parser::final_parser, ParserExt};
use rayon::prelude::*;

use crate::{
    library::{split_parser, Definitely, ITResult},
    parser,
};

#[derive(Debug, Clone)]
struct IdRange {
    first: u64,
    last: u64,
}

fn parse_id(input: &str) -> ITResult<&str, u64> {
    digit1.parse_from_str_cut().parse(input)
}

/// Parse something resembling "998-1012"
fn parse_id_range(input: &str) -> ITResult<&str, IdRange> {
    parser! {
        parse_id => first,
        char('-'),
        parse_id => last;
        IdRange { first, last }
    }
    .parse(input)
}

#[derive(Debug)]
pub struct Input {
    ranges: Vec<IdRange>,
}

fn parse_input(input: &str) -> ITResult<&str, Input> {
    split_parser(parse_id_range, ",")
        .map(|ranges| Input { ranges })
        .parse(input)
}

impl TryFrom<&str> for Input {
    type Error = ErrorTree<nom_supreme::final_parser::Location>;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        final_parser(parse_input)(value.trim())
    }
}

fn digit_count(value: u64) -> u32 {
    value.checked_ilog10().unwrap_or(0) + 1
}

/// The number that repeats a `width` digit seed `repeats` times, when
/// multiplied by the seed: 1001 for width 3 and 2 repeats, 10101 for width
/// 2 and 3 repeats.
fn repeat_multiplier(width: u32, repeats: u32) -> u64 {
    let shift = 10u64.pow(width);
    (0..repeats).fold(0, |multiplier, _| multiplier * shift + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeats {
    Twice,
    AtLeastTwice,
}

impl Repeats {
    fn allows(self, repeats: u32) -> bool {
        match self {
            Repeats::Twice => repeats == 2,
            Repeats::AtLeastTwice => repeats >= 2,
        }
    }
}

/// Find every id in the range made of a single digit sequence repeated. Ids
/// are built from their seeds rather than searched for, and an id that
/// repeats in several ways (222222 is 2, 22, and 222 repeated) is reported
/// once.
fn repeated_ids(range: &IdRange, repeats: Repeats) -> BTreeSet<u64> {
    let mut ids = BTreeSet::new();

    for digits in digit_count(range.first)..=digit_count(range.last) {
        let widths = (1..digits)
            .filter(|width| digits % width == 0)
            .filter(|width| repeats.allows(digits / width));

        for width in widths {
            let multiplier = repeat_multiplier(width, digits / width);

            let smallest_seed = 10u64.pow(width - 1);
            let largest_seed = 10u64.pow(width) - 1;

            let seeds: RangeInclusive<u64> = smallest_seed.max(range.first.div_ceil(multiplier))
                ..=largest_seed.min(range.last / multiplier);

            ids.extend(seeds.map(|seed| seed * multiplier));
        }
    }

    ids
}

fn sum_repeated_ids(input: &Input, repeats: Repeats) -> u64 {
    input
        .ranges
        .par_iter()
        .map(|range| repeated_ids(range, repeats).into_iter().sum::<u64>())
        .sum()
}

pub fn part1(input: Input) -> Definitely<u64> {
    Ok(sum_repeated_ids(&input, Repeats::Twice))
}

pub fn part2(input: Input) -> Definitely<u64> {
    Ok(sum_repeated_ids(&input, Repeats::AtLeastTwice))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE: &str = "11-22,95-115,998-1012,1188511880-1188511890,222220-222224,\
1698522-1698528,446443-446449,38593856-38593862,565653-565659,\
824824821-824824827,2121212118-2121212124\n";

    #[test]
    fn part1_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part1(input).unwrap(), 1227775554);
    }

    #[test]
    fn part2_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part2(input).unwrap(), 4174379265);
    }

    #[rstest]
    #[case(11, 22, Repeats::Twice, &[11, 22])]
    #[case(95, 115, Repeats::Twice, &[99])]
    #[case(95, 115, Repeats::AtLeastTwice, &[99, 111])]
    #[case(998, 1012, Repeats::AtLeastTwice, &[999, 1010])]
    #[case(222220, 222224, Repeats::AtLeastTwice, &[222222])]
    #[case(1698522, 1698528, Repeats::AtLeastTwice, &[])]
    fn ids_in_range(
        #[case] first: u64,
        #[case] last: u64,
        #[case] repeats: Repeats,
        #[case] expected: &[u64],
    ) {
        let ids: Vec<u64> = repeated_ids(&IdRange { first, last }, repeats)
            .into_iter()
            .collect();
        assert_eq!(ids, expected);
    }

    #[rstest]
    #[case(3, 2, 1001)]
    #[case(2, 3, 10101)]
    #[case(1, 4, 1111)]
    fn multipliers(#[case] width: u32, #[case] repeats: u32, #[case] expected: u64) {
        assert_eq!(repeat_multiplier(width, repeats), expected);
    }
}
