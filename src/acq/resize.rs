//! Changing the encoding size (target resolution) of 2D acquisitions.
//!
//! Shrinking the encoding size by a factor stretches the normalized k-space
//! coordinates by the same factor. Nodes that leave `[-0.5, 0.5)` in x or y are
//! no longer representable and are dropped together with their samples. The
//! remaining samples are scaled by `1 / (fac_x * fac_y)` to account for the
//! changed grid density.

use super::{AcqData, undersampling::select_rows};
use crate::{AcqDataError, trajectory::Trajectory};

/// What survives of one echo after rescaling.
struct EchoCrop {
    /// surviving node indices, ascending
    nodes: Vec<usize>,
    /// surviving rows of the data cells
    rows: Vec<usize>,
    /// new subsample indices (positions in the cropped node list)
    subsample_indices: Vec<usize>,
}

impl<T: Trajectory + Clone> AcqData<T> {
    /// Copy of the store with a new 2D encoding size.
    ///
    /// `encoding_size` contains the new x and y size and optionally a new size
    /// of the third axis, which is otherwise kept. See
    /// [`AcqData::change_encoding_size_2d_in_place`].
    pub fn change_encoding_size_2d(&self, encoding_size: &[usize]) -> Result<Self, AcqDataError> {
        let mut resized = self.clone();
        resized.change_encoding_size_2d_in_place(encoding_size)?;
        Ok(resized)
    }
}

impl<T: Trajectory> AcqData<T> {
    /// Rescales every trajectory to a new 2D encoding size, dropping nodes that
    /// fall outside of k-space and the samples acquired at them.
    ///
    /// All echoes are checked before anything is modified: on error the store
    /// is left unchanged.
    pub fn change_encoding_size_2d_in_place(
        &mut self,
        encoding_size: &[usize],
    ) -> Result<(), AcqDataError> {
        let new_size = self.target_encoding_size(encoding_size)?;
        let fac = [
            self.encoding_size[0] as f64 / new_size[0] as f64,
            self.encoding_size[1] as f64 / new_size[1] as f64,
        ];

        let crops = self
            .traj
            .iter()
            .zip(&self.subsample_indices)
            .enumerate()
            .map(|(echo, (traj, indices))| crop_echo(echo, traj, indices, fac))
            .collect::<Result<Vec<_>, _>>()?;

        for (echo, (traj, crop)) in self.traj.iter_mut().zip(&crops).enumerate() {
            log::debug!(
                "echo {echo}: {} of {} nodes inside the new encoding",
                crop.nodes.len(),
                traj.num_nodes()
            );
            for node in traj.nodes_mut().iter_mut() {
                node[0] *= fac[0];
                node[1] *= fac[1];
            }
            if crop.nodes.len() != traj.num_nodes() {
                traj.retain_indices(&crop.nodes);
            }
        }

        let scale = 1.0 / (fac[0] * fac[1]);
        for ((echo, _, _), cell) in self.kdata.indexed_iter_mut() {
            *cell = select_rows(cell, &crops[echo].rows).mapv_into(|value| value * scale);
        }

        self.subsample_indices = crops.into_iter().map(|crop| crop.subsample_indices).collect();
        self.encoding_size = new_size;
        Ok(())
    }

    fn target_encoding_size(&self, encoding_size: &[usize]) -> Result<[usize; 3], AcqDataError> {
        let new_size = match *encoding_size {
            [nx, ny] => [nx, ny, self.encoding_size[2]],
            [nx, ny, nz] => [nx, ny, nz],
            _ => {
                return Err(AcqDataError::ShapeMismatch(format!(
                    "2D encoding size needs 2 or 3 entries, got {encoding_size:?}"
                )));
            }
        };
        if new_size[0] == 0 || new_size[1] == 0 {
            return Err(AcqDataError::ShapeMismatch(format!(
                "encoding size {encoding_size:?} is not two-dimensional"
            )));
        }
        if self.encoding_size[0] == 0 || self.encoding_size[1] == 0 {
            return Err(AcqDataError::ShapeMismatch(format!(
                "current encoding size {:?} is unknown, cannot rescale",
                self.encoding_size
            )));
        }
        Ok(new_size)
    }
}

fn crop_echo<T: Trajectory>(
    echo: usize,
    traj: &T,
    subsample_indices: &[usize],
    fac: [f64; 2],
) -> Result<EchoCrop, AcqDataError> {
    let inside = |k: f64| (-0.5..0.5).contains(&k);

    // new position of every old node, if it survives
    let mut position = vec![None; traj.num_nodes()];
    let mut nodes = Vec::new();
    for (idx, node) in traj.nodes().iter().enumerate() {
        if inside(node[0] * fac[0]) && inside(node[1] * fac[1]) {
            position[idx] = Some(nodes.len());
            nodes.push(idx);
        }
    }

    let (rows, subsample_indices): (Vec<_>, Vec<_>) = subsample_indices
        .iter()
        .enumerate()
        .filter_map(|(row, &node)| position[node].map(|new_idx| (row, new_idx)))
        .unzip();

    if rows.is_empty() {
        return Err(AcqDataError::DegenerateInput(format!(
            "no samples of echo {echo} remain after rescaling by {fac:?}"
        )));
    }

    Ok(EchoCrop {
        nodes,
        rows,
        subsample_indices,
    })
}
