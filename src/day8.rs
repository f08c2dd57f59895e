use anyhow::Context;
use itertools::Itertools;
use nom::{
    character::complete::{char, digit1},
    Parser,
};
use nom_supreme::{error::ErrorTree, final_parser::final_parser, ParserExt};
use rayon::slice::ParallelSliceMut;

use crate::{
    library::{split_parser, Counter, ITResult},
    parser,
};

/// How many connections the elves make before measuring circuits
const CONNECTIONS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JunctionBox {
    x: i64,
    y: i64,
    z: i64,
}

impl JunctionBox {
    fn distance_squared(&self, other: &Self) -> i64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;

        dx * dx + dy * dy + dz * dz
    }
}

fn parse_coordinate(input: &str) -> ITResult<&str, i64> {
    digit1
        .opt_preceded_by(char('-'))
        .recognize()
        .parse_from_str_cut()
        .parse(input)
}

/// Parse something resembling "162,817,812"
fn parse_junction_box(input: &str) -> ITResult<&str, JunctionBox> {
    parser! {
        parse_coordinate => x,
        char(','),
        parse_coordinate => y,
        char(','),
        parse_coordinate => z;
        JunctionBox { x, y, z }
    }
    .parse(input)
}

#[derive(Debug)]
pub struct Input {
    boxes: Vec<JunctionBox>,
}

fn parse_input(input: &str) -> ITResult<&str, Input> {
    split_parser(parse_junction_box, "\n")
        .map(|boxes| Input { boxes })
        .parse(input)
}

impl TryFrom<&str> for Input {
    type Error = ErrorTree<nom_supreme::final_parser::Location>;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        final_parser(parse_input)(value.trim())
    }
}

/// Union-find over box indexes. Each circuit is identified by its root.
#[derive(Debug)]
struct Circuits {
    parents: Vec<usize>,
    sizes: Vec<usize>,
    count: usize,
}

impl Circuits {
    fn new(len: usize) -> Self {
        Self {
            parents: (0..len).collect(),
            sizes: vec![1; len],
            count: len,
        }
    }

    fn root(&mut self, mut node: usize) -> usize {
        while self.parents[node] != node {
            let grandparent = self.parents[self.parents[node]];
            self.parents[node] = grandparent;
            node = grandparent;
        }

        node
    }

    /// Join the circuits containing `a` and `b`. Returns false if they were
    /// already the same circuit.
    fn connect(&mut self, a: usize, b: usize) -> bool {
        let a = self.root(a);
        let b = self.root(b);

        if a == b {
            return false;
        }

        let (big, small) = match self.sizes[a] >= self.sizes[b] {
            true => (a, b),
            false => (b, a),
        };

        self.parents[small] = big;
        self.sizes[big] += self.sizes[small];
        self.count -= 1;

        true
    }
}

/// Every pair of boxes, closest first. Equally distant pairs stay in input
/// order.
fn pairs_by_distance(boxes: &[JunctionBox]) -> Vec<(usize, usize)> {
    let mut pairs = (0..boxes.len())
        .tuple_combinations()
        .map(|(a, b)| (boxes[a].distance_squared(&boxes[b]), a, b))
        .collect_vec();

    pairs.par_sort_unstable();

    pairs.into_iter().map(|(_, a, b)| (a, b)).collect()
}

/// Make the `connections` closest connections, then multiply together the
/// sizes of the three largest circuits.
pub fn largest_circuits_product(input: &Input, connections: usize) -> anyhow::Result<usize> {
    let mut circuits = Circuits::new(input.boxes.len());

    pairs_by_distance(&input.boxes)
        .into_iter()
        .take(connections)
        .for_each(|(a, b)| {
            circuits.connect(a, b);
        });

    log::debug!("{} circuits after {connections} connections", circuits.count);

    let circuit_sizes: Counter<usize> = (0..input.boxes.len())
        .map(|node| circuits.root(node))
        .collect();

    let [a, b, c] = circuit_sizes
        .top::<3>()
        .with_context(|| format!("only {} circuits were formed", circuit_sizes.len()))?;

    Ok(a.1.get() * b.1.get() * c.1.get())
}

pub fn part1(input: Input) -> anyhow::Result<usize> {
    largest_circuits_product(&input, CONNECTIONS)
}

pub fn part2(input: Input) -> anyhow::Result<i64> {
    let boxes = &input.boxes;
    let mut circuits = Circuits::new(boxes.len());

    pairs_by_distance(boxes)
        .into_iter()
        .find(|&(a, b)| circuits.connect(a, b) && circuits.count == 1)
        .map(|(a, b)| boxes[a].x * boxes[b].x)
        .context("the junction boxes never formed a single circuit")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE: &str = "\
162,817,812
57,618,57
906,360,560
592,479,940
352,342,300
466,668,158
542,29,236
431,825,988
739,650,466
52,470,668
216,146,977
819,987,18
117,168,530
805,96,715
346,949,466
970,615,88
941,993,340
862,61,35
984,92,344
425,690,689
";

    #[test]
    fn part1_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(largest_circuits_product(&input, 10).unwrap(), 40);
    }

    #[test]
    fn part2_example() {
        let input = Input::try_from(EXAMPLE).unwrap();
        assert_eq!(part2(input).unwrap(), 25272);
    }

    #[test]
    fn closest_pair_first() {
        let input = Input::try_from(EXAMPLE).unwrap();
        let pairs = pairs_by_distance(&input.boxes);
        assert_eq!(pairs[0], (0, 19));
        assert_eq!(pairs.len(), 20 * 19 / 2);
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let input = Input::try_from("0,0,0\n0,0,5\n10,0,0\n10,0,5\n").unwrap();
        let pairs = pairs_by_distance(&input.boxes);
        assert_eq!(pairs[..4], [(0, 1), (2, 3), (0, 2), (1, 3)]);
    }

    // Both pairs are 3 apart, so the one listed later completes the circuit
    #[rstest]
    #[case("0,0,0\n3,0,0\n6,0,0\n", 18)]
    #[case("6,0,0\n3,0,0\n0,0,0\n", 0)]
    fn tied_final_connection(#[case] input: &str, #[case] expected: i64) {
        let input = Input::try_from(input).unwrap();
        assert_eq!(part2(input).unwrap(), expected);
    }

    #[test]
    fn too_few_circuits() {
        let input = Input::try_from("0,0,0\n1,0,0\n5,5,5\n").unwrap();
        assert!(largest_circuits_product(&input, 1).is_err());
    }

    #[test]
    fn lone_box_never_completes() {
        let input = Input::try_from("1,2,3\n").unwrap();
        assert!(part2(input).is_err());
    }

    #[test]
    fn connecting_circuits() {
        let mut circuits = Circuits::new(4);
        assert!(circuits.connect(0, 1));
        assert!(circuits.connect(2, 3));
        assert!(!circuits.connect(1, 0));
        assert!(circuits.connect(1, 3));
        assert_eq!(circuits.count, 1);
        assert_eq!(circuits.root(0), circuits.root(2));
    }
}
