use hashbrown::HashMap;
use timecube_core::PointCloud;

#[derive(Debug, Clone, Copy)]
struct CellEntry {
    index: u32,
    position: [f32; 3],
}

/// Uniform spatial hash over a point cloud.
///
/// Every point is bucketed into the cell at componentwise
/// `floor(position / cell_size)`. Cell keys are integer coordinate triples,
/// so distinct cells can never collide. Cells store the point's index and
/// position together; queries never have to reach back into the cloud.
///
/// The grid is built in one O(N) pass and never updated incrementally:
/// clouds are static for the lifetime of a session, and reordering
/// operations (depth sort, shuffle) shift indices, so callers rebuild the
/// grid wholesale whenever the backing cloud is replaced.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cells: HashMap<(i32, i32, i32), Vec<CellEntry>>,
    cell_size: f32,
    len: usize,
}

/// Borrowed view of one occupied cell.
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    key: (i32, i32, i32),
    entries: &'a [CellEntry],
}

impl CellView<'_> {
    pub fn key(&self) -> (i32, i32, i32) {
        self.key
    }

    /// Position of the cell's first (lowest-index) point, used as the
    /// cell's representative for approximate depth sorting.
    pub fn representative(&self) -> [f32; 3] {
        self.entries[0].position
    }

    /// Point indices in this cell, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.index as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cell_coords(p: [f32; 3], cell_size: f32) -> (i32, i32, i32) {
    (
        (p[0] / cell_size).floor() as i32,
        (p[1] / cell_size).floor() as i32,
        (p[2] / cell_size).floor() as i32,
    )
}

fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

impl SpatialGrid {
    /// Bucket all points of `cloud` into cells of edge length `cell_size`.
    ///
    /// Non-finite positions are skipped, matching how the bounding box
    /// treats them.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not finite and positive.
    pub fn build(cloud: &PointCloud, cell_size: f32) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "cell_size must be > 0 and finite"
        );

        let mut cells: HashMap<(i32, i32, i32), Vec<CellEntry>> = HashMap::new();
        let mut len = 0usize;

        for i in 0..cloud.len() {
            let p = cloud.point(i);
            if !p.iter().all(|v| v.is_finite()) {
                continue;
            }

            let key = cell_coords(p, cell_size);
            cells.entry(key).or_default().push(CellEntry {
                index: i as u32,
                position: p,
            });
            len += 1;
        }

        Self {
            cells,
            cell_size,
            len,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of indexed points (non-finite positions excluded).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Point indices stored in the cell containing `position`, in ascending
    /// index order. Empty if the cell is unoccupied.
    pub fn cell_indices(&self, position: [f32; 3]) -> Vec<usize> {
        if !position.iter().all(|v| v.is_finite()) {
            return Vec::new();
        }
        match self.cells.get(&cell_coords(position, self.cell_size)) {
            Some(entries) => entries.iter().map(|e| e.index as usize).collect(),
            None => Vec::new(),
        }
    }

    /// Index of the closest point to `query` strictly within `max_distance`,
    /// or `None` if the 3x3x3 cell neighborhood holds nothing that close.
    ///
    /// Only the query's cell and its 26 neighbors are scanned, so the bound
    /// is also a correctness bound: callers must keep `max_distance` on the
    /// order of one cell, or a true nearest neighbor two cells away would be
    /// missed. [`nearest_in_cell_range`](Self::nearest_in_cell_range) bakes
    /// in the safe default.
    ///
    /// A miss is a valid result, not an error; the slice sampler renders it
    /// as a blank pixel.
    ///
    /// Ties in distance resolve to the first point encountered in scan
    /// order: cells in ascending (dx, dy, dz) offset order, points within a
    /// cell in ascending index order. Build order makes this deterministic.
    pub fn nearest_neighbor(&self, query: [f32; 3], max_distance: f32) -> Option<usize> {
        if !query.iter().all(|v| v.is_finite()) {
            return None;
        }

        let (cx, cy, cz) = cell_coords(query, self.cell_size);
        let mut best: Option<u32> = None;
        let mut best_sq = max_distance * max_distance;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = (cx + dx, cy + dy, cz + dz);
                    let Some(entries) = self.cells.get(&key) else {
                        continue;
                    };
                    for entry in entries {
                        let d_sq = squared_distance(query, entry.position);
                        if d_sq < best_sq {
                            best_sq = d_sq;
                            best = Some(entry.index);
                        }
                    }
                }
            }
        }

        best.map(|i| i as usize)
    }

    /// [`nearest_neighbor`](Self::nearest_neighbor) with the default bound
    /// of one cell size. An unbounded search across a sparse region would
    /// happily return a point from the far side of a data gap; one cell is
    /// the largest radius the 27-cell scan answers exactly.
    pub fn nearest_in_cell_range(&self, query: [f32; 3]) -> Option<usize> {
        self.nearest_neighbor(query, self.cell_size)
    }

    /// Iterate over occupied cells in arbitrary (hash) order.
    ///
    /// The cell-bucket depth sorter consumes this; it imposes its own
    /// deterministic order by sorting the cells it collects, so the hash
    /// order here is not a stability hazard.
    pub fn iter_cells(&self) -> impl Iterator<Item = CellView<'_>> {
        self.cells.iter().map(|(key, entries)| CellView {
            key: *key,
            entries,
        })
    }

    /// Nearest point in the 3x3x3 neighborhood with no distance bound.
    ///
    /// Explicit opt-in for callers that prefer a far match over a blank
    /// result. Still limited to the 27 surrounding cells; everything
    /// farther is invisible to this query.
    pub fn nearest_in_neighborhood_unbounded(&self, query: [f32; 3]) -> Option<usize> {
        self.nearest_neighbor(query, f32::INFINITY)
    }
}
