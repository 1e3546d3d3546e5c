use glam::Vec2;

/// Populations at or below this size always use the all-pairs pass.
pub const GRID_MIN_PARTICLES: usize = 64;

/// Uniform 2D hash grid for candidate-pair queries.
///
/// Uses counting sort for O(N) construction: count particles per cell -> prefix sum -> scatter.
/// Hash collisions only add candidates; callers still do the distance check.
pub struct PairGrid {
    cell_size: f32,
    inv_cell_size: f32,
    table_size: usize,
    /// cell_count[hash] = number of particles in cell (reused as scatter offsets)
    cell_count: Vec<u32>,
    /// cell_start[hash] = index where particles for this cell begin in sorted_indices
    cell_start: Vec<u32>,
    sorted_indices: Vec<u32>,
    particle_hashes: Vec<u32>,
}

impl PairGrid {
    /// `table_size` is rounded up to a power of two.
    pub fn new(cell_size: f32, table_size: usize, max_particles: usize) -> Self {
        let table_size = table_size.max(1).next_power_of_two();
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            table_size,
            cell_count: vec![0u32; table_size],
            cell_start: vec![0u32; table_size],
            sorted_indices: vec![0u32; max_particles],
            particle_hashes: vec![0u32; max_particles],
        }
    }

    /// Sized for a population: twice as many buckets as particles, at least 64.
    pub fn for_population(cell_size: f32, count: usize) -> Self {
        Self::new(cell_size, (count * 2).max(64), count)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Rebuild from current positions.
    pub fn build(&mut self, positions: &[Vec2]) {
        let count = positions.len();
        if self.sorted_indices.len() < count {
            self.sorted_indices.resize(count, 0);
            self.particle_hashes.resize(count, 0);
        }

        self.cell_count.fill(0);

        for (i, &pos) in positions.iter().enumerate() {
            let (cx, cy) = self.cell_coords(pos);
            let h = self.hash_cell(cx, cy);
            self.particle_hashes[i] = h as u32;
            self.cell_count[h] += 1;
        }

        self.cell_start[0] = 0;
        for k in 1..self.table_size {
            self.cell_start[k] = self.cell_start[k - 1] + self.cell_count[k - 1];
        }

        self.cell_count.fill(0);

        for i in 0..count {
            let h = self.particle_hashes[i] as usize;
            let idx = self.cell_start[h] + self.cell_count[h];
            self.sorted_indices[idx as usize] = i as u32;
            self.cell_count[h] += 1;
        }
    }

    /// Visit every particle in the 3x3 block of cells around `pos`.
    /// A particle may be visited more than once when two cells share a bucket.
    pub fn query_neighbors<F: FnMut(usize)>(&self, pos: Vec2, mut callback: F) {
        let (cx, cy) = self.cell_coords(pos);
        for dx in -1..=1_i32 {
            for dy in -1..=1_i32 {
                let h = self.hash_cell(cx.wrapping_add(dx), cy.wrapping_add(dy));
                let start = self.cell_start[h] as usize;
                let end = start + self.cell_count[h] as usize;
                for idx in start..end {
                    callback(self.sorted_indices[idx] as usize);
                }
            }
        }
    }

    #[inline]
    fn hash_cell(&self, cx: i32, cy: i32) -> usize {
        let h = (cx as u32).wrapping_mul(73856093) ^ (cy as u32).wrapping_mul(19349663);
        (h as usize) & (self.table_size - 1)
    }

    #[inline]
    fn cell_coords(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x * self.inv_cell_size).floor() as i32,
            (pos.y * self.inv_cell_size).floor() as i32,
        )
    }
}
