use anyhow::Context;
use itertools::Itertools;
use lazy_format::lazy_format;

#[derive(Debug)]
struct Bank {
    batteries: Vec<u8>,
}

impl Bank {
    /// Largest number that can be made by switching on exactly `count`
    /// batteries, keeping their order. Each digit is the largest one that
    /// still leaves enough batteries for the digits after it; taking the
    /// earliest such battery leaves the most choice for the rest.
    fn joltage(&self, count: usize) -> Option<u64> {
        let mut remaining = self.batteries.as_slice();

        (0..count)
            .rev()
            .map(|reserved| {
                let window = remaining.get(..remaining.len().checked_sub(reserved)?)?;

                let (index, &digit) = window
                    .iter()
                    .enumerate()
                    .rev()
                    .max_by_key(|&(_, &digit)| digit)?;

                remaining = &remaining[index + 1..];
                Some(digit)
            })
            .fold_options(0, |joltage, digit| joltage * 10 + digit as u64)
    }
}

#[derive(Debug)]
pub struct Input {
    banks: Vec<Bank>,
}

impl TryFrom<&str> for Input {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .zip(1..)
            .map(|(line, line_number)| {
                line.bytes()
                    .map(|b| match b {
                        b'1'..=b'9' => Some(b - b'0'),
                        _ => None,
                    })
                    .collect::<Option<Vec<u8>>>()
                    .map(|batteries| Bank { batteries })
                    .context(lazy_format!("bad battery rating in bank {line_number}"))
            })
            .try_collect()
            .map(|banks| Input { banks })
    }
}

fn total_joltage(input: &Input, count: usize) -> anyhow::Result<u64> {
    let joltages = input.banks.iter().zip(1..).map(|(bank, bank_number)| {
        bank.joltage(count)
            .context(lazy_format!("bank {bank_number} has fewer than {count} batteries"))
    });

    itertools::process_results(joltages, |joltages| joltages.sum())
}

pub fn part1(input: Input) -> anyhow::Result<u64> {
    total_joltage(&input, 2)
}

pub fn part2(input: Input) -> anyhow::Result<u64> {
    total_joltage(&input, 12)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE: &str = "\
987654321111111
811111111111119
234234234234278
818181911112111
";

    #[test]
    fn part1_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part1(input).unwrap(), 357);
    }

    #[test]
    fn part2_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part2(input).unwrap(), 3121910778619);
    }

    #[rstest]
    #[case("987654321111111", 2, 98)]
    #[case("811111111111119", 2, 89)]
    #[case("234234234234278", 12, 434234234278)]
    #[case("818181911112111", 12, 888911112111)]
    #[case("12", 2, 12)]
    fn bank_joltage(#[case] bank: &str, #[case] count: usize, #[case] expected: u64) {
        let input = Input::try_from(bank).unwrap();
        assert_eq!(input.banks[0].joltage(count), Some(expected));
    }

    #[test]
    fn short_bank() {
        let input = Input::try_from("123").unwrap();
        assert!(part2(input).is_err());
    }
}
