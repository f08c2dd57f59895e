use anyhow::{bail, Context};
use itertools::Itertools;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add,
    Multiply,
}

impl Operation {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'+' => Some(Operation::Add),
            b'*' => Some(Operation::Multiply),
            _ => None,
        }
    }

    fn apply(self, operands: impl IntoIterator<Item = u64>) -> u64 {
        let operands = operands.into_iter();

        match self {
            Operation::Add => operands.sum(),
            Operation::Multiply => operands.product(),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("unrecognized operator {0:?}")]
struct BadOperator(String);

#[derive(Debug)]
struct Problem {
    operation: Operation,
    operands: Vec<u64>,
}

impl Problem {
    fn solve(&self) -> u64 {
        self.operation.apply(self.operands.iter().copied())
    }
}

fn grand_total(problems: &[Problem]) -> u64 {
    problems.iter().map(Problem::solve).sum()
}

/// Split the worksheet into its number rows and the operator row at the
/// bottom. Blank trailing lines are ignored; trailing spaces are kept,
/// because they matter when reading by column.
fn split_sheet(value: &str) -> anyhow::Result<(Vec<&str>, &str)> {
    let mut lines = value
        .lines()
        .rev()
        .skip_while(|line| line.trim().is_empty())
        .collect_vec();

    lines.reverse();

    let operators = lines.pop().context("worksheet is empty")?;

    if lines.is_empty() {
        bail!("worksheet has operators but no numbers");
    }

    Ok((lines, operators))
}

/// The worksheet read as humans do: each whitespace separated column is a
/// problem.
#[derive(Debug)]
pub struct Input {
    problems: Vec<Problem>,
}

impl TryFrom<&str> for Input {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (number_rows, operators) = split_sheet(value)?;

        let operations: Vec<Operation> = operators
            .split_whitespace()
            .map(|token| match token.as_bytes() {
                &[b] => Operation::from_byte(b).ok_or_else(|| BadOperator(token.to_owned())),
                _ => Err(BadOperator(token.to_owned())),
            })
            .try_collect()?;

        let rows: Vec<Vec<u64>> = number_rows
            .iter()
            .zip(1..)
            .map(|(row, row_number)| {
                row.split_whitespace()
                    .map(|token| {
                        token.parse().with_context(|| {
                            format!("failed to parse number {token:?} in row {row_number}")
                        })
                    })
                    .collect::<anyhow::Result<Vec<u64>>>()
            })
            .try_collect()?;

        if let Some((row_number, row)) = rows
            .iter()
            .zip(1..)
            .map(|(row, row_number)| (row_number, row))
            .find(|(_, row)| row.len() != operations.len())
        {
            bail!(
                "row {row_number} has {} numbers, but there are {} operators",
                row.len(),
                operations.len()
            );
        }

        let problems = operations
            .into_iter()
            .enumerate()
            .map(|(column, operation)| Problem {
                operation,
                operands: rows.iter().map(|row| row[column]).collect(),
            })
            .collect();

        Ok(Input { problems })
    }
}

pub fn part1(input: Input) -> anyhow::Result<u64> {
    Ok(grand_total(&input.problems))
}

/// The worksheet read as cephalopods do: every character column is a number,
/// written top to bottom, and problems are separated by blank columns.
#[derive(Debug)]
pub struct Input2 {
    problems: Vec<Problem>,
}

impl TryFrom<&str> for Input2 {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (number_rows, operators) = split_sheet(value)?;

        let width = number_rows
            .iter()
            .chain([&operators])
            .map(|line| line.len())
            .max()
            .unwrap_or(0);

        let cell = |line: &str, column: usize| {
            line.as_bytes().get(column).copied().unwrap_or(b' ')
        };

        let columns = (0..width).map(|column| {
            let digits = number_rows
                .iter()
                .map(|row| cell(row, column))
                .filter(|&b| b != b' ')
                .collect_vec();

            (column, digits, cell(operators, column))
        });

        let problems = columns
            .group_by(|(_, digits, operator)| digits.is_empty() && *operator == b' ')
            .into_iter()
            .filter(|&(blank, _)| !blank)
            .map(|(_, problem)| {
                let mut operation = None;
                let mut operands = Vec::new();

                for (column, digits, operator) in problem {
                    if operator != b' ' {
                        if operation.is_some() {
                            bail!("two operators for one problem, second in column {column}");
                        }
                        operation = Some(Operation::from_byte(operator).ok_or_else(|| {
                            BadOperator(char::from(operator).to_string())
                        })?);
                    }

                    let operand = digits.iter().try_fold(0u64, |value, &digit| match digit {
                        b'0'..=b'9' => Some(value * 10 + (digit - b'0') as u64),
                        _ => None,
                    });

                    match operand {
                        Some(operand) if !digits.is_empty() => operands.push(operand),
                        Some(_) => bail!("column {column} has an operator but no number"),
                        None => bail!("column {column} isn't a number"),
                    }
                }

                let operation = operation.context("problem has no operator")?;

                Ok(Problem {
                    operation,
                    operands,
                })
            })
            .try_collect()?;

        Ok(Input2 { problems })
    }
}

pub fn part2(input: Input2) -> anyhow::Result<u64> {
    Ok(grand_total(&input.problems))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // The trailing spaces are significant
    const EXAMPLE: &str = "\
123 328  51 64 \n\
\x2045 64  387 23 \n\
\x20 6 98  215 314\n\
*   +   *   +  \n";

    #[test]
    fn example_layout() {
        assert!(EXAMPLE.lines().all(|line| line.len() == 15));
    }

    #[test]
    fn part1_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part1(input).unwrap(), 4277556);
    }

    #[test]
    fn part2_example() {
        let input = Input2::try_from(EXAMPLE).unwrap();
        assert_eq!(part2(input).unwrap(), 3263827);
    }

    #[test]
    fn part2_problems_read_by_column() {
        let input = Input2::try_from(EXAMPLE).unwrap();
        let mut operands = input.problems[0].operands.clone();
        operands.sort_unstable();
        assert_eq!(operands, [1, 24, 356]);
        assert_eq!(input.problems[0].operation, Operation::Multiply);
    }

    #[rstest]
    #[case(" 1\n* \n", "column 0 has an operator but no number")]
    #[case("1 2\n3 4\n+  \n", "problem has no operator")]
    #[case("12\n*+\n", "two operators for one problem, second in column 1")]
    #[case("1\n-\n", "unrecognized operator \"-\"")]
    fn part2_malformed_problems(#[case] input: &str, #[case] message: &str) {
        let err = Input2::try_from(input).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn mismatched_rows() {
        assert!(Input::try_from("1 2 3\n4 5\n+ * +\n").is_err());
    }

    #[test]
    fn bad_operator() {
        assert!(Input::try_from("1 2\n3 4\n+ -\n").is_err());
    }
}
