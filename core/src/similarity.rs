use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Compressed sparse column matrix, the on-disk layout of the term
/// similarity matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CscMatrix {
    /// (rows, cols)
    pub shape: (usize, usize),
    /// Column `j` occupies `indices[indptr[j]..indptr[j + 1]]`.
    pub indptr: Vec<usize>,
    /// Row index of each stored value.
    pub indices: Vec<TermId>,
    pub data: Vec<f32>,
}

impl CscMatrix {
    /// Build from (row, col, value) triplets. Later duplicates overwrite earlier ones.
    pub fn from_triplets(shape: (usize, usize), triplets: &[(TermId, TermId, f32)]) -> Self {
        let mut columns: Vec<BTreeMap<TermId, f32>> = vec![BTreeMap::new(); shape.1];
        for &(row, col, value) in triplets {
            if let Some(column) = columns.get_mut(col as usize) {
                column.insert(row, value);
            }
        }
        let mut indptr = Vec::with_capacity(shape.1 + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for column in columns {
            for (row, value) in column {
                indices.push(row);
                data.push(value);
            }
            indptr.push(indices.len());
        }
        Self { shape, indptr, indices, data }
    }

    /// Check the structural invariants of the compressed layout.
    pub fn validate(&self) -> Result<(), String> {
        let (rows, cols) = self.shape;
        if self.indptr.len() != cols + 1 {
            return Err(format!("indptr has {} entries, expected {}", self.indptr.len(), cols + 1));
        }
        if self.indptr[0] != 0 {
            return Err("indptr does not start at 0".into());
        }
        if self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err("indptr is not non-decreasing".into());
        }
        let nnz = self.indptr[cols];
        if self.indices.len() != nnz || self.data.len() != nnz {
            return Err(format!(
                "expected {nnz} stored values, found {} indices and {} data",
                self.indices.len(),
                self.data.len()
            ));
        }
        if let Some(row) = self.indices.iter().find(|&&r| r as usize >= rows) {
            return Err(format!("row index {row} out of bounds for {rows} rows"));
        }
        Ok(())
    }

    /// Iterate stored (row, col, value) entries column by column.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, TermId, f32)> + '_ {
        self.indptr.windows(2).enumerate().flat_map(move |(col, w)| {
            (w[0]..w[1]).map(move |k| (self.indices[k], col as TermId, self.data[k]))
        })
    }
}

/// Persisted form of the term similarity matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparseTermSimilarityMatrix {
    pub matrix: CscMatrix,
}

/// Dictionary-of-keys sparse matrix: constant time cell lookup and
/// enumeration of stored coordinates.
#[derive(Debug, Clone, Default)]
pub struct DokMatrix {
    shape: (usize, usize),
    cells: HashMap<(TermId, TermId), f32>,
}

impl DokMatrix {
    pub fn new(shape: (usize, usize)) -> Self {
        Self { shape, cells: HashMap::new() }
    }

    pub fn shape(&self) -> (usize, usize) { self.shape }

    /// Number of stored non-zero cells.
    pub fn nnz(&self) -> usize { self.cells.len() }

    pub fn get(&self, row: TermId, col: TermId) -> f32 {
        self.cells.get(&(row, col)).copied().unwrap_or(0.0)
    }

    /// Store a value; zero removes the cell.
    pub fn set(&mut self, row: TermId, col: TermId, value: f32) {
        if value == 0.0 {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    /// Coordinates of all non-zero cells, in (row, col) order.
    pub fn nonzero(&self) -> Vec<(TermId, TermId)> {
        let mut coords: Vec<(TermId, TermId)> = self.cells.keys().copied().collect();
        coords.sort_unstable();
        coords
    }
}

impl From<&CscMatrix> for DokMatrix {
    fn from(csc: &CscMatrix) -> Self {
        let mut dok = DokMatrix::new(csc.shape);
        for (row, col, value) in csc.iter() {
            dok.set(row, col, value);
        }
        dok
    }
}
