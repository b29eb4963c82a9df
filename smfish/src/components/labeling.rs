//! Connected component labeling of 2-D and 3-D masks using union-find.

use ndarray::{ArrayD, ArrayViewD, Dimension};
use serde::{Deserialize, Serialize};

use crate::image::LabelImage;

/// Pixel connectivity for connected component labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Neighbours share a face: 4 in 2-D, 6 in 3-D.
    Face,
    /// Neighbours share a face, edge or corner: 8 in 2-D, 26 in 3-D.
    #[default]
    Full,
}

/// Label image together with its number of components.
#[derive(Debug, Clone, PartialEq)]
pub struct Labeling {
    /// 0 for background, `1..=count` for components.
    pub labels: LabelImage,
    pub count: usize,
}

/// Label the connected `true` regions of `mask`.
///
/// Components are numbered in raster order of their first pixel.
pub fn label_mask(mask: &ArrayViewD<'_, bool>, connectivity: Connectivity) -> Labeling {
    let shape = mask.shape().to_vec();
    let strides = row_major_strides(&shape);
    let offsets = backward_offsets(shape.len(), connectivity);

    let mut provisional = vec![0u32; mask.len()];
    let mut union_find = UnionFind::new();
    let mut neighbours = Vec::with_capacity(offsets.len());

    for (linear, (index, &on)) in mask.indexed_iter().enumerate() {
        if !on {
            continue;
        }
        let coord = index.slice();

        neighbours.clear();
        for offset in &offsets {
            if let Some(neighbour) = offset_index(coord, &shape, &strides, offset, linear) {
                let label = provisional[neighbour];
                if label != 0 {
                    neighbours.push(label);
                }
            }
        }

        provisional[linear] = match neighbours.split_first() {
            None => union_find.make_set(),
            Some((&first, rest)) => {
                for &other in rest {
                    union_find.union(first, other);
                }
                first
            }
        };
    }

    let (mapping, count) = union_find.sequential_labels();
    let labels = ArrayD::from_shape_fn(mask.raw_dim(), |index| {
        let linear: usize = index
            .slice()
            .iter()
            .zip(&strides)
            .map(|(c, s)| c * s)
            .sum();
        mapping[provisional[linear] as usize]
    });

    Labeling { labels, count }
}

fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

/// Neighbour offsets already visited by a raster scan: the first non-zero
/// component is -1.
fn backward_offsets(ndim: usize, connectivity: Connectivity) -> Vec<Vec<isize>> {
    let total = 3usize.pow(ndim as u32);
    let mut offsets = Vec::new();
    for code in 0..total {
        let mut rest = code;
        let mut offset = vec![0isize; ndim];
        for axis in (0..ndim).rev() {
            offset[axis] = (rest % 3) as isize - 1;
            rest /= 3;
        }

        let first_nonzero = offset.iter().find(|&&d| d != 0);
        if first_nonzero != Some(&-1) {
            continue;
        }
        if connectivity == Connectivity::Face && offset.iter().filter(|&&d| d != 0).count() != 1 {
            continue;
        }
        offsets.push(offset);
    }
    offsets
}

#[inline]
fn offset_index(
    coord: &[usize],
    shape: &[usize],
    strides: &[usize],
    offset: &[isize],
    linear: usize,
) -> Option<usize> {
    let mut target = linear as isize;
    for axis in 0..coord.len() {
        let moved = coord[axis] as isize + offset[axis];
        if moved < 0 || moved >= shape[axis] as isize {
            return None;
        }
        target += offset[axis] * strides[axis] as isize;
    }
    Some(target as usize)
}

// ============================================================================
// Union-Find
// ============================================================================

/// Union-find over provisional labels `1..`; slot 0 is background.
#[derive(Debug)]
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        Self { parent: vec![0] }
    }

    #[inline]
    fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    #[inline]
    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut current = label;
        while current != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }

        root
    }

    /// Merge two sets, keeping the smaller label as root.
    #[inline]
    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            let (smaller, larger) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[larger as usize] = smaller;
        }
    }

    /// Map every provisional label to `1..=count` in order of its root.
    fn sequential_labels(&mut self) -> (Vec<u32>, usize) {
        let len = self.parent.len();
        let mut mapping = vec![0u32; len];
        let mut count = 0u32;

        for label in 1..len as u32 {
            let root = self.find(label);
            if mapping[root as usize] == 0 {
                count += 1;
                mapping[root as usize] = count;
            }
            mapping[label as usize] = mapping[root as usize];
        }

        (mapping, count as usize)
    }
}
