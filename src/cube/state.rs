//! The cube value type and its state transitions.
//!
//! A cube of size `n` stores `6 * n * n` facelets, face after face in
//! `Face::ALL` order, each face row-major. Twisting at row `r` turns every
//! layer from `r` up to `n - 1`; layer 0 is the fixed reference layer and is
//! never turned.

use super::{Axis, Color, CubeError, Direction, FACES, Face, StatePool};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cube {
    size: usize,
    facelets: Vec<Color>,
    /// Number of twists applied since the search root.
    twists: u32,
    /// Depth limit of the search pass this cube belongs to.
    bound: u32,
}

impl Cube {
    /// Create a solved cube: face `i` is painted with color `i`.
    pub fn solved(size: usize) -> Self {
        let area = size * size;
        let mut facelets = Vec::with_capacity(FACES * area);
        for color in Color::ALL {
            facelets.extend(std::iter::repeat_n(color, area));
        }

        Self {
            size,
            facelets,
            twists: 0,
            bound: 0,
        }
    }

    /// Create a scrambled cube by applying `twist_count` random twists to a
    /// solved one. The same seed always produces the same cube.
    ///
    /// The scrambling twists are not counted: the result has `twists() == 0`.
    pub fn scrambled(size: usize, twist_count: u32, seed: u64) -> Result<Self, CubeError> {
        if size < 2 {
            return Err(CubeError::InvalidSize(size));
        }

        let mut cube = Cube::solved(size);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for _ in 0..twist_count {
            let axis = Axis::ALL[rng.random_range(0..Axis::ALL.len())];
            let row = rng.random_range(1..size);
            let direction = if rng.random_bool(0.5) {
                Direction::Positive
            } else {
                Direction::Negative
            };
            cube.twist(axis, row, direction);
        }

        cube.twists = 0;
        cube.check_consistency()?;
        Ok(cube)
    }

    /// Build a cube from raw facelets in storage order.
    pub(crate) fn from_facelets(size: usize, facelets: Vec<Color>) -> Self {
        debug_assert_eq!(facelets.len(), FACES * size * size);
        Self {
            size,
            facelets,
            twists: 0,
            bound: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn twists(&self) -> u32 {
        self.twists
    }

    pub fn bound(&self) -> u32 {
        self.bound
    }

    pub fn set_bound(&mut self, bound: u32) {
        self.bound = bound;
    }

    pub fn facelets(&self) -> &[Color] {
        &self.facelets
    }

    pub fn facelet(&self, face: Face, row: usize, column: usize) -> Color {
        self.facelets[self.cell(face, row, column)]
    }

    /// Number of cubes `generate_children` returns for a cube of this size.
    pub fn children_per_state(size: usize) -> usize {
        Axis::ALL.len() * size.saturating_sub(1) * Direction::ALL.len()
    }

    /// Deep-copy this cube into `target`, reusing the target's storage.
    pub fn copy_into(&self, target: &mut Cube) {
        target.size = self.size;
        target.twists = self.twists;
        target.bound = self.bound;
        target.facelets.clone_from(&self.facelets);
    }

    /// True when every face is a single color.
    pub fn is_solved(&self) -> bool {
        let area = self.size * self.size;
        self.facelets
            .chunks_exact(area)
            .all(|face| face.iter().all(|&color| color == face[0]))
    }

    /// True when the facelet storage matches the declared size. Cubes that come
    /// off the wire are checked with this before being searched.
    pub fn is_well_formed(&self) -> bool {
        self.size >= 2 && self.facelets.len() == FACES * self.size * self.size
    }

    /// Check that every color covers exactly `size * size` cells.
    ///
    /// This only detects lost or duplicated facelets; it does not prove the
    /// state is reachable from the solved cube.
    pub fn check_consistency(&self) -> Result<(), CubeError> {
        let mut counts = [0usize; FACES];
        for color in &self.facelets {
            counts[color.index()] += 1;
        }

        let area = self.size * self.size;
        if counts.iter().all(|&count| count == area) {
            Ok(())
        } else {
            Err(CubeError::Inconsistent {
                size: self.size,
                counts,
            })
        }
    }

    /// Twist this cube in place, turning layers `row..size` about `axis`.
    ///
    /// # Panics
    /// If `row` is not in `[1, size - 1]`.
    pub fn twist(&mut self, axis: Axis, row: usize, direction: Direction) {
        assert!(
            row >= 1 && row < self.size,
            "twist {:?} row {} out of range [1, {}] for cube of size {}",
            axis,
            row,
            self.size.saturating_sub(1),
            self.size
        );

        match axis {
            Axis::X => self.twist_x(row, direction),
            Axis::Y => self.twist_y(row, direction),
            Axis::Z => self.twist_z(row, direction),
        }

        self.twists += 1;
    }

    /// All cubes one twist away from this one, taken from `pool`.
    #[allow(dead_code)]
    pub fn generate_children(&self, pool: &mut StatePool) -> Vec<Cube> {
        let mut children = Vec::with_capacity(Cube::children_per_state(self.size));
        self.generate_children_into(pool, &mut children);
        children
    }

    /// Like `generate_children`, appending into an existing buffer.
    pub fn generate_children_into(&self, pool: &mut StatePool, out: &mut Vec<Cube>) {
        for axis in Axis::ALL {
            for row in 1..self.size {
                for direction in Direction::ALL {
                    let mut child = pool.acquire();
                    self.copy_into(&mut child);
                    child.twist(axis, row, direction);
                    out.push(child);
                }
            }
        }
    }

    fn cell(&self, face: Face, row: usize, column: usize) -> usize {
        face.index() * self.size * self.size + row * self.size + column
    }

    /// `a <- b <- c <- d <- a`
    fn cycle(&mut self, [a, b, c, d]: [usize; 4]) {
        let tmp = self.facelets[a];
        self.facelets[a] = self.facelets[b];
        self.facelets[b] = self.facelets[c];
        self.facelets[c] = self.facelets[d];
        self.facelets[d] = tmp;
    }

    /// Quarter-turn a whole face. Positive moves cell (r, c) to (c, n-1-r).
    fn rotate(&mut self, face: Face, direction: Direction) {
        let n = self.size;
        for r in 0..n / 2 {
            for c in r..n - 1 - r {
                let p0 = self.cell(face, r, c);
                let p1 = self.cell(face, c, n - 1 - r);
                let p2 = self.cell(face, n - 1 - r, n - 1 - c);
                let p3 = self.cell(face, n - 1 - c, r);
                match direction {
                    Direction::Positive => self.cycle([p3, p2, p1, p0]),
                    Direction::Negative => self.cycle([p0, p1, p2, p3]),
                }
            }
        }
    }

    fn twist_x(&mut self, first_row: usize, direction: Direction) {
        let n = self.size;
        for row in first_row..n {
            for column in 0..n {
                let left = self.cell(Face::Left, row, column);
                let front = self.cell(Face::Front, row, column);
                let right = self.cell(Face::Right, row, column);
                let back = self.cell(Face::Back, row, column);
                match direction {
                    Direction::Positive => self.cycle([back, right, front, left]),
                    Direction::Negative => self.cycle([left, front, right, back]),
                }
            }
        }
        self.rotate(Face::Bottom, direction);
    }

    fn twist_y(&mut self, first_column: usize, direction: Direction) {
        let n = self.size;
        for row in 0..n {
            for column in first_column..n {
                let top = self.cell(Face::Top, row, column);
                let front = self.cell(Face::Front, row, column);
                let bottom = self.cell(Face::Bottom, row, column);
                // the back face is seen mirrored from the front
                let back = self.cell(Face::Back, n - 1 - row, n - 1 - column);
                match direction {
                    Direction::Positive => self.cycle([top, front, bottom, back]),
                    Direction::Negative => self.cycle([top, back, bottom, front]),
                }
            }
        }
        self.rotate(Face::Right, direction);
    }

    fn twist_z(&mut self, first_row: usize, direction: Direction) {
        let n = self.size;
        for row in first_row..n {
            for column in 0..n {
                let top = self.cell(Face::Top, n - 1 - row, column);
                let right = self.cell(Face::Right, column, row);
                let bottom = self.cell(Face::Bottom, row, n - 1 - column);
                let left = self.cell(Face::Left, n - 1 - column, n - 1 - row);
                match direction {
                    Direction::Positive => self.cycle([top, left, bottom, right]),
                    Direction::Negative => self.cycle([top, right, bottom, left]),
                }
            }
        }
        self.rotate(Face::Back, direction.reversed());
    }
}

impl fmt::Display for Cube {
    /// Unfolded net: top, then left/front/right/back side by side, then bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size;
        writeln!(f, "Cube of size {}, solved = {}", n, self.is_solved())?;

        let indent = " ".repeat(n * 3);
        for row in 0..n {
            write!(f, "{}", indent)?;
            for column in 0..n {
                write!(f, " {} ", self.facelet(Face::Top, row, column))?;
            }
            writeln!(f)?;
        }

        for row in 0..n {
            for face in [Face::Left, Face::Front, Face::Right, Face::Back] {
                for column in 0..n {
                    write!(f, " {} ", self.facelet(face, row, column))?;
                }
            }
            writeln!(f)?;
        }

        for row in 0..n {
            write!(f, "{}", indent)?;
            for column in 0..n {
                write!(f, " {} ", self.facelet(Face::Bottom, row, column))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
