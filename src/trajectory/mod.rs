//! Sampling trajectories as seen by a store.
//!
//! Geometry generators (Cartesian, EPI, radial, spiral, ...) live outside of
//! this crate and only need to implement [`Trajectory`]. [`CustomTrajectory`]
//! is a plain node list for everything else.

mod custom;

pub use custom::CustomTrajectory;

/// k-space coordinate, normalized to `[-0.5, 0.5)` per axis for a fully sampled
/// grid. 2D trajectories keep the third component at zero.
pub type Node = [f64; 3];

pub trait Trajectory {
    /// k-space nodes in acquisition order
    fn nodes(&self) -> &[Node];
    /// Readout time of every node, same length as [`Trajectory::nodes`]
    fn times(&self) -> &[f64];
    fn nodes_mut(&mut self) -> &mut Vec<Node>;
    fn times_mut(&mut self) -> &mut Vec<f64>;

    fn num_profiles(&self) -> usize;
    fn num_samples_per_profile(&self) -> usize;
    /// Number of meaningful node components: 2 or 3
    fn dims(&self) -> usize;

    /// True while the nodes still describe the regular grid the trajectory was
    /// designed with.
    fn is_cartesian(&self) -> bool;
    fn set_cartesian(&mut self, cartesian: bool);

    fn num_nodes(&self) -> usize {
        self.nodes().len()
    }

    /// Keep only the nodes (and readout times) at `indices`, in that order.
    ///
    /// Indices must be in range, callers validate them beforehand.
    fn retain_indices(&mut self, indices: &[usize]) {
        let nodes: Vec<Node> = indices.iter().map(|&i| self.nodes()[i]).collect();
        let times: Vec<f64> = indices.iter().map(|&i| self.times()[i]).collect();
        *self.nodes_mut() = nodes;
        *self.times_mut() = times;
    }
}
