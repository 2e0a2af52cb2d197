//! Configuration for building the cube to solve

#![allow(dead_code)]

use crate::cube::{Cube, CubeError, load_cube_file};
use std::path::PathBuf;

/// Where the starting cube comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CubeSource {
    /// A solved cube scrambled with seeded random twists
    Scrambled,
    /// A cube read from a text file
    File(PathBuf),
}

/// Puzzle configuration
#[derive(Debug, Clone)]
pub struct SolveConfig {
    /// Edge length of the cube
    pub size: usize,
    /// Number of random scrambling twists
    pub twists: u32,
    /// Seed for the scrambling random number generator
    pub seed: u64,
    /// Starting cube source
    pub source: CubeSource,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            size: 3,
            twists: 11,
            seed: 0,
            source: CubeSource::Scrambled,
        }
    }
}

impl SolveConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_twists(mut self, twists: u32) -> Self {
        self.twists = twists;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = CubeSource::File(path.into());
        self
    }

    pub fn with_file_option(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.source = CubeSource::File(path);
        }
        self
    }

    /// Build the starting cube.
    pub fn build_cube(&self) -> Result<Cube, CubeError> {
        match &self.source {
            CubeSource::Scrambled => Cube::scrambled(self.size, self.twists, self.seed),
            CubeSource::File(path) => {
                let cube = load_cube_file(path)?;
                cube.check_consistency()?;
                Ok(cube)
            }
        }
    }
}
