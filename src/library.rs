pub mod counter;

use std::{convert::Infallible, iter::FusedIterator, mem, ops::ControlFlow};

use brownstone::move_builder::{ArrayBuilder, PushResult};
use gridly::prelude::{Column, GridBounds, Location, Row, Vector};
use nom::{error::ParseError, IResult, Parser};
use nom_supreme::{error::ErrorTree, tag::TagError};

pub use self::counter::{Counter, OrderedCounter};

pub type ITResult<I, O> = IResult<I, O, ErrorTree<I>>;

/// Every location in a grid rooted at the origin, in row-major order
pub fn grid_locations(grid: &impl GridBounds) -> impl Iterator<Item = Location> {
    let Vector { rows, columns } = grid.dimensions();

    (0..rows.0).flat_map(move |row| (0..columns.0).map(move |column| Row(row) + Column(column)))
}

#[macro_export]
macro_rules! express {
    ($receiver:ident $(.$method:ident($($args:tt)*))*) => {
        {
            let mut receiver = $receiver;
            $(
                receiver.$method($($args)*);
            )*
            receiver
        }
    }
}

pub trait IterExt: Iterator + Sized {
    fn streaming_windows<const N: usize>(self) -> Windows<Self, N> {
        Windows {
            state: State::Begin,
            iter: self,
        }
    }
}

impl<T: Iterator + Sized> IterExt for T {}

#[macro_export]
macro_rules! parser {
    (
        $(
            $parser:expr $(=> $bind:ident)?
        ),* ;
        $map:expr
    ) => {
        move |input| -> nom::IResult<_, _, _> {
            $(
                let (input, value) = $parser.parse(input)?;
                $(
                    let $bind = value;
                    let value = ();
                )?
                let _ = value;
            )*

            Ok((input, $map))
        }
    };
}

#[derive(Debug, Clone, Copy)]
enum State<T, const N: usize> {
    Begin,
    Buffered([T; N]),
    Done,
}

impl<T, const N: usize> State<T, N> {
    fn take(&mut self) -> Self {
        mem::replace(self, State::Done)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Windows<I: Iterator, const N: usize> {
    iter: I,
    state: State<I::Item, N>,
}

fn try_build_iter<I, const N: usize>(iter: I) -> Option<[I::Item; N]>
where
    I: IntoIterator,
{
    let builder = match ArrayBuilder::start() {
        PushResult::Full(array) => return Some(array),
        PushResult::NotFull(builder) => builder,
    };

    let result = iter
        .into_iter()
        .try_fold(builder, |builder, item| match builder.push(item) {
            PushResult::Full(array) => ControlFlow::Break(array),
            PushResult::NotFull(builder) => ControlFlow::Continue(builder),
        });

    match result {
        ControlFlow::Continue(_) => None,
        ControlFlow::Break(array) => Some(array),
    }
}

fn build_iter<I, const N: usize>(iter: I) -> [I::Item; N]
where
    I: IntoIterator,
{
    try_build_iter(iter).expect("iterator wasn't long enough")
}

impl<I: Iterator, const N: usize> Iterator for Windows<I, N>
where
    I::Item: Clone,
{
    type Item = [I::Item; N];

    fn next(&mut self) -> Option<Self::Item> {
        let buffer = match self.state.take() {
            State::Begin => try_build_iter(&mut self.iter)?,
            State::Buffered(buffer) => buffer,
            State::Done => return None,
        };

        if let Some(next) = self.iter.next() {
            self.state = State::Buffered(build_iter(buffer[1..].iter().cloned().chain([next])))
        }

        Some(buffer)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Begin => {
                let (min, max) = self.iter.size_hint();
                (
                    min.saturating_sub(N - 1),
                    max.map(|max| max.saturating_sub(N - 1)),
                )
            }
            State::Buffered(_) => {
                let (min, max) = self.iter.size_hint();
                (
                    min.saturating_add(1),
                    max.and_then(|max| max.checked_add(1)),
                )
            }
            State::Done => (0, Some(0)),
        }
    }
}

impl<I: Iterator, const N: usize> FusedIterator for Windows<I, N> where I::Item: Clone {}

impl<I: ExactSizeIterator, const N: usize> ExactSizeIterator for Windows<I, N>
where
    I::Item: Clone,
{
    fn len(&self) -> usize {
        match self.state {
            State::Begin => self.iter.len().saturating_sub(N - 1),
            State::Buffered(_) => self.iter.len() + 1,
            State::Done => 0,
        }
    }
}

pub type Definitely<T> = Result<T, Infallible>;

pub trait ErrorWithLocation<I> {
    fn map_location(self, map: impl Fn(I) -> I) -> Self;
}

impl<I> ErrorWithLocation<I> for ErrorTree<I> {
    fn map_location(self, map: impl Fn(I) -> I) -> Self {
        self.map_locations(map)
    }
}

pub fn split_parser_fold<'i, 's, O, T, E>(
    mut item_parser: impl Parser<&'i str, O, E> + 's,
    separator: &'s str,
    mut init: impl FnMut() -> T + 's,
    mut fold: impl FnMut(T, O) -> T + 's,
) -> impl Parser<&'i str, T, E> + 's
where
    E: ErrorWithLocation<&'i str>,
    E: TagError<&'i str, &'s str>,
    E: ParseError<&'i str>,
{
    if separator.is_empty() {
        panic!("can't create a split parser with an empty separator")
    }

    move |mut input: &'i str| {
        let mut accum = init();

        loop {
            let (block, tail) = match input.split_once(separator) {
                None if input.is_empty() => return Ok(("", accum)),
                None => (input, ""),
                Some(pair) => pair,
            };

            let rebuild_tail = |local_tail_len: usize| {
                let rebuilt_tail_len = tail.len() + separator.len() + local_tail_len;
                let parsed_len = input.len() - rebuilt_tail_len;
                &input[parsed_len..]
            };

            let item = match item_parser.parse(block) {
                Ok(("", item)) => item,
                Ok((local_tail, _)) => {
                    return Err(nom::Err::Error(E::from_tag(
                        rebuild_tail(local_tail.len()),
                        separator,
                    )));
                }
                Err(nom::Err::Error(err)) => {
                    return Err(nom::Err::Error(
                        err.map_location(|local_tail| rebuild_tail(local_tail.len())),
                    ))
                }
                Err(nom::Err::Failure(err)) => {
                    return Err(nom::Err::Failure(
                        err.map_location(|local_tail| rebuild_tail(local_tail.len())),
                    ))
                }
                Err(nom::Err::Incomplete(_)) => {
                    return Err(nom::Err::Error(E::from_error_kind(
                        rebuild_tail(0),
                        nom::error::ErrorKind::Complete,
                    )))
                }
            };

            accum = fold(accum, item);
            input = tail;
        }
    }
}

pub fn split_parser<'i, 's, O, T, E>(
    item_parser: impl Parser<&'i str, O, E> + 's,
    separator: &'s str,
) -> impl Parser<&'i str, T, E> + 's
where
    E: ErrorWithLocation<&'i str>,
    E: TagError<&'i str, &'s str>,
    E: ParseError<&'i str>,
    T: Default + Extend<O> + 's,
{
    split_parser_fold(item_parser, separator, T::default, |collection, item| {
        express!(collection.extend([item]))
    })
}

#[cfg(test)]
mod tests {
    use gridly::prelude::Grid;
    use gridly_grids::VecGrid;
    use nom::character::complete::digit1;
    use nom_supreme::{
        final_parser::{final_parser, Location},
        ParserExt,
    };

    use super::*;

    #[test]
    fn windows_overlap() {
        let windows: Vec<[i32; 2]> = [1, 2, 3, 4].into_iter().streaming_windows().collect();
        assert_eq!(windows, [[1, 2], [2, 3], [3, 4]]);
    }

    #[test]
    fn windows_too_short() {
        let mut windows = [1].into_iter().streaming_windows::<2>();
        assert_eq!(windows.len(), 0);
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn grid_locations_row_major() {
        let grid = VecGrid::new_from_rows(["ab", "cd", "ef"].map(str::bytes)).unwrap();
        let locations: Vec<_> = grid_locations(&grid).collect();

        assert_eq!(locations.len(), 6);
        assert_eq!(locations[0], Row(0) + Column(0));
        assert_eq!(locations[3], Row(1) + Column(1));
        assert_eq!(grid.get(locations[5]).ok(), Some(&b'f'));
    }

    fn parse_number(input: &str) -> ITResult<&str, u32> {
        digit1.parse_from_str_cut().parse(input)
    }

    fn parse_numbers(input: &str) -> ITResult<&str, Vec<u32>> {
        split_parser(parse_number, ",").parse(input)
    }

    #[test]
    fn split_parser_collects_blocks() {
        let numbers: Result<Vec<u32>, ErrorTree<Location>> = final_parser(parse_numbers)("12,3,456");
        assert_eq!(numbers.unwrap(), [12, 3, 456]);
    }

    #[test]
    fn split_parser_rejects_partial_block() {
        let numbers: Result<Vec<u32>, ErrorTree<Location>> = final_parser(parse_numbers)("12,3x,4");
        assert!(numbers.is_err());
    }
}
