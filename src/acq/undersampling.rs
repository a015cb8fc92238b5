use std::collections::HashMap;

use ndarray::{Array2, Axis as NdAxis};

use super::AcqData;
use crate::{AcqDataError, trajectory::Trajectory};

impl<T: Trajectory + Clone> AcqData<T> {
    /// Turns undersampled data into fully sampled data on a smaller trajectory.
    ///
    /// Every echo's trajectory keeps only the nodes listed in its subsample
    /// indices (in that order) and is no longer Cartesian. Subsample indices
    /// become `0..n`. The data cube is unchanged, `self` is not touched.
    ///
    /// All coils, slices and repetitions of an echo share one sampling pattern.
    pub fn convert_undersampled_data(&self) -> Self {
        let mut converted = self.clone();

        for (echo, (traj, indices)) in converted
            .traj
            .iter_mut()
            .zip(converted.subsample_indices.iter_mut())
            .enumerate()
        {
            traj.retain_indices(indices);
            traj.set_cartesian(false);
            log::debug!("echo {echo}: trajectory reduced to {} acquired nodes", indices.len());
            *indices = (0..indices.len()).collect();
        }

        converted
    }

    /// Retrospectively undersamples the data.
    ///
    /// `pattern[echo]` lists the nodes (indices into the echo's full trajectory)
    /// to keep, in the order the rows should appear. Every listed node must
    /// already be present in the data.
    pub fn undersample(&self, pattern: &[Vec<usize>]) -> Result<Self, AcqDataError> {
        if pattern.len() != self.num_echoes() {
            return Err(AcqDataError::ShapeMismatch(format!(
                "sampling pattern for {} echoes, data has {}",
                pattern.len(),
                self.num_echoes()
            )));
        }

        // Rows of the current cells to keep, per echo
        let mut rows = Vec::with_capacity(pattern.len());
        for (echo, (nodes, indices)) in pattern.iter().zip(&self.subsample_indices).enumerate() {
            let position: HashMap<usize, usize> =
                indices.iter().enumerate().map(|(row, &node)| (node, row)).collect();
            let echo_rows = nodes
                .iter()
                .map(|node| {
                    position.get(node).copied().ok_or_else(|| {
                        AcqDataError::ShapeMismatch(format!(
                            "node {node} of echo {echo} was not acquired"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(echo_rows);
        }

        let mut sampled = self.clone();
        for ((echo, _, _), cell) in sampled.kdata.indexed_iter_mut() {
            *cell = select_rows(cell, &rows[echo]);
        }
        sampled.subsample_indices = pattern.to_vec();
        sampled.validate()?;

        Ok(sampled)
    }
}

pub(crate) fn select_rows<A: Clone>(cell: &Array2<A>, rows: &[usize]) -> Array2<A> {
    cell.select(NdAxis(0), rows)
}

#[cfg(test)]
mod tests {
    use super::super::tests::labeled_cube;
    use super::*;
    use crate::{AcqDataBuilder, CustomTrajectory};

    fn undersampled_store() -> AcqData<CustomTrajectory> {
        let mut traj =
            CustomTrajectory::from_nodes_2d(&[[-0.5, 0.0], [-0.25, 0.1], [0.0, 0.2], [0.25, 0.3]]);
        traj.set_cartesian(true);
        AcqDataBuilder::new(vec![traj], labeled_cube(&[2], 2, 1, 1))
            .subsample_indices(vec![vec![0, 2]])
            .build()
            .unwrap()
    }

    #[test]
    fn convert_keeps_acquired_nodes() {
        let acq = undersampled_store();
        let converted = acq.convert_undersampled_data();

        let traj = converted.trajectory(0).unwrap();
        assert_eq!(traj.nodes(), &[[-0.5, 0.0, 0.0], [0.0, 0.2, 0.0]]);
        assert!(!traj.is_cartesian());
        assert_eq!(converted.subsample_indices(), &[vec![0usize, 1]]);
        assert_eq!(converted.cube(), acq.cube());

        // source untouched
        assert_eq!(acq.trajectory(0).unwrap().num_nodes(), 4);
        assert!(acq.trajectory(0).unwrap().is_cartesian());
        assert_eq!(acq.subsample_indices(), &[vec![0usize, 2]]);
    }

    #[test]
    fn undersample_selects_rows() {
        let traj = CustomTrajectory::cartesian_2d(2, 2, 1.0);
        let full = AcqData::from_single_trajectory(traj, labeled_cube(&[4, 4], 1, 1, 2)).unwrap();

        let sampled = full.undersample(&[vec![3, 1], vec![0]]).unwrap();
        assert_eq!(sampled.num_samples(0).unwrap(), 2);
        assert_eq!(sampled.num_samples(1).unwrap(), 1);
        assert_eq!(sampled.kdata(0, 0, 0, 1).unwrap(), vec![
            full.cube()[[0, 0, 1]][[3, 0]],
            full.cube()[[0, 0, 1]][[1, 0]],
        ]);

        // nodes that are no longer present cannot be selected again
        assert!(matches!(
            sampled.undersample(&[vec![0], vec![0]]),
            Err(AcqDataError::ShapeMismatch(_))
        ));
        assert!(full.undersample(&[vec![0]]).is_err());
    }
}
