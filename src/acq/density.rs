use super::AcqData;
use crate::{
    AcqDataError, PlanError,
    trajectory::{Node, Trajectory},
};

/// Parameters handed to the [`NufftPlanner`] for density estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NufftParams {
    /// grid oversampling factor
    pub oversampling: f64,
    /// half width of the interpolation kernel in grid points
    pub kernel_size: usize,
    /// iterations of the density estimation
    pub iterations: usize,
}

impl Default for NufftParams {
    fn default() -> Self {
        Self {
            oversampling: 2.0,
            kernel_size: 2,
            iterations: 10,
        }
    }
}

/// Non-uniform FFT engine, used to estimate sampling density.
///
/// Implementations wrap an external NUFFT library. Degenerate node sets (empty,
/// duplicated nodes, ...) should be reported as [`PlanError::DegenerateNodes`].
pub trait NufftPlanner {
    type Plan;

    /// Plans a transform between `nodes` (of which the first `dims` components
    /// are used) and an image of `shape`.
    fn plan(
        &self,
        nodes: &[Node],
        dims: usize,
        shape: &[usize],
        params: &NufftParams,
    ) -> Result<Self::Plan, PlanError>;

    /// Density compensation estimate for every node of the plan.
    fn estimate_density(
        &self,
        plan: &mut Self::Plan,
        params: &NufftParams,
    ) -> Result<Vec<f64>, PlanError>;
}

impl<T: Trajectory> AcqData<T> {
    /// Density compensation weights for the acquired nodes of every echo.
    ///
    /// The weights are the square root of the planner's density estimate, so
    /// they can be applied symmetrically in the forward and adjoint operator.
    /// Errors of the planner are returned with the echo they occurred for.
    pub fn sampling_density<P: NufftPlanner>(
        &self,
        planner: &P,
        shape: &[usize],
    ) -> Result<Vec<Vec<f64>>, AcqDataError> {
        let params = NufftParams::default();

        self.traj
            .iter()
            .zip(&self.subsample_indices)
            .enumerate()
            .map(|(echo, (traj, indices))| {
                let nodes: Vec<Node> = indices.iter().map(|&i| traj.nodes()[i]).collect();
                let wrap = |source| AcqDataError::DensityEstimation { echo, source };

                let mut plan = planner.plan(&nodes, traj.dims(), shape, &params).map_err(wrap)?;
                let density = planner.estimate_density(&mut plan, &params).map_err(wrap)?;
                if density.len() != nodes.len() {
                    return Err(AcqDataError::ShapeMismatch(format!(
                        "density estimate of echo {echo} has {} values for {} nodes",
                        density.len(),
                        nodes.len()
                    )));
                }

                let negative = density.iter().filter(|&&w| w < 0.0 || w.is_nan()).count();
                if negative > 0 {
                    log::warn!("echo {echo}: {negative} negative or NaN density values set to zero");
                }
                Ok(density.into_iter().map(|w| w.max(0.0).sqrt()).collect())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::labeled_cube;
    use super::*;
    use crate::{AcqDataBuilder, CustomTrajectory};

    /// Counts the nodes within one grid cell of every node and returns the
    /// inverse count. Rejects duplicate nodes.
    struct NeighbourCount;

    impl NufftPlanner for NeighbourCount {
        type Plan = (Vec<Node>, f64);

        fn plan(
            &self,
            nodes: &[Node],
            _dims: usize,
            shape: &[usize],
            _params: &NufftParams,
        ) -> Result<Self::Plan, PlanError> {
            if nodes.is_empty() {
                return Err(PlanError::DegenerateNodes("no nodes".to_string()));
            }
            for (i, a) in nodes.iter().enumerate() {
                if nodes[i + 1..].contains(a) {
                    return Err(PlanError::DegenerateNodes(format!("node {i} is duplicated")));
                }
            }
            Ok((nodes.to_vec(), 1.0 / shape[0] as f64))
        }

        fn estimate_density(
            &self,
            plan: &mut Self::Plan,
            _params: &NufftParams,
        ) -> Result<Vec<f64>, PlanError> {
            let (nodes, radius) = plan;
            Ok(nodes
                .iter()
                .map(|a| {
                    let count = nodes
                        .iter()
                        .filter(|b| (a[0] - b[0]).abs() <= *radius && (a[1] - b[1]).abs() <= *radius)
                        .count();
                    1.0 / count as f64
                })
                .collect())
        }
    }

    #[test]
    fn one_weight_per_acquired_node() {
        let traj = CustomTrajectory::cartesian_2d(4, 4, 1.0);
        let acq = AcqDataBuilder::from_single_trajectory(traj, labeled_cube(&[16, 3], 1, 1, 1))
            .subsample_indices(vec![(0..16).collect(), vec![0, 5, 15]])
            .build()
            .unwrap();

        let weights = acq.sampling_density(&NeighbourCount, &[4, 4]).unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].len(), 16);
        assert_eq!(weights[1].len(), 3);
        assert!(weights.iter().flatten().all(|&w| w >= 0.0));

        // corner node of the full grid sees 4 neighbours (itself included)
        assert_eq!(weights[0][0], 0.5);
        // sparse echo: nodes 0 and 5 touch, node 15 is alone
        assert_eq!(weights[1], vec![0.5f64.sqrt(), 0.5f64.sqrt(), 1.0]);
    }

    #[test]
    fn planner_errors_are_propagated() {
        let traj = CustomTrajectory::from_nodes_2d(&[[0.0, 0.0], [0.1, 0.1], [0.0, 0.0]]);
        let acq = AcqData::from_single_trajectory(traj, labeled_cube(&[3, 3], 1, 1, 1)).unwrap();

        match acq.sampling_density(&NeighbourCount, &[8, 8]) {
            Err(AcqDataError::DensityEstimation {
                echo: 0,
                source: PlanError::DegenerateNodes(_),
            }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
