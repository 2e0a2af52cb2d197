//! Bounded free list of cubes for the search hot loop.

#![allow(dead_code)]

use super::Cube;

/// Maximum number of idle cubes a pool keeps around.
pub const DEFAULT_POOL_CAPACITY: usize = 10 * 1024;

/// Spare child buffers kept for reuse; one per recursion level is plenty.
const MAX_SPARE_BATCHES: usize = 64;

/// Reuse pool for `Cube` instances.
///
/// Each search frame (the coordinator's own loop, or one worker) owns its own
/// pool, so there is no locking. When the pool is full, released cubes are
/// simply dropped.
#[derive(Debug)]
pub struct StatePool {
    cube_size: usize,
    capacity: usize,
    free: Vec<Cube>,
    batches: Vec<Vec<Cube>>,
}

impl StatePool {
    pub fn new(cube_size: usize) -> Self {
        Self::with_capacity(cube_size, DEFAULT_POOL_CAPACITY)
    }

    pub fn with_capacity(cube_size: usize, capacity: usize) -> Self {
        Self {
            cube_size,
            capacity,
            free: Vec::new(),
            batches: Vec::new(),
        }
    }

    /// Take a cube from the pool, allocating a solved one if the pool is empty.
    /// The returned cube's contents are meant to be overwritten with `copy_into`.
    pub fn acquire(&mut self) -> Cube {
        self.free
            .pop()
            .unwrap_or_else(|| Cube::solved(self.cube_size))
    }

    /// Give a cube back. Dropped if the pool is already at capacity.
    pub fn release(&mut self, cube: Cube) {
        if self.free.len() < self.capacity {
            self.free.push(cube);
        }
    }

    /// Take an empty child buffer.
    pub fn take_batch(&mut self) -> Vec<Cube> {
        self.batches.pop().unwrap_or_default()
    }

    /// Return a child buffer. Any cubes still in it are released first.
    pub fn return_batch(&mut self, mut batch: Vec<Cube>) {
        for cube in batch.drain(..) {
            self.release(cube);
        }
        if self.batches.len() < MAX_SPARE_BATCHES {
            self.batches.push(batch);
        }
    }

    /// Number of idle cubes currently held.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cube_size(&self) -> usize {
        self.cube_size
    }
}
