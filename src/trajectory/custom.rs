use serde::{Deserialize, Serialize};

use super::{Node, Trajectory};
use crate::AcqDataError;

/// Trajectory given by an explicit list of nodes and readout times.
///
/// Nodes are grouped into `num_profiles` readouts of `samples_per_profile`
/// nodes each, profile after profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrajectory")]
pub struct CustomTrajectory {
    nodes: Vec<Node>,
    times: Vec<f64>,
    num_profiles: usize,
    samples_per_profile: usize,
    dims: usize,
    cartesian: bool,
}

/// Unchecked field set, deserialized first and then validated by
/// [`CustomTrajectory::new`].
#[derive(Deserialize)]
struct RawTrajectory {
    nodes: Vec<Node>,
    times: Vec<f64>,
    num_profiles: usize,
    samples_per_profile: usize,
    dims: usize,
    cartesian: bool,
}

impl TryFrom<RawTrajectory> for CustomTrajectory {
    type Error = AcqDataError;

    fn try_from(raw: RawTrajectory) -> Result<Self, Self::Error> {
        let mut traj = Self::new(
            raw.nodes,
            raw.times,
            raw.num_profiles,
            raw.samples_per_profile,
            raw.dims,
        )?;
        traj.cartesian = raw.cartesian;
        Ok(traj)
    }
}

impl CustomTrajectory {
    pub fn new(
        nodes: Vec<Node>,
        times: Vec<f64>,
        num_profiles: usize,
        samples_per_profile: usize,
        dims: usize,
    ) -> Result<Self, AcqDataError> {
        if !(2..=3).contains(&dims) {
            return Err(AcqDataError::ShapeMismatch(format!(
                "trajectory must be 2D or 3D, got {dims} dimensions"
            )));
        }
        if nodes.len() != times.len() {
            return Err(AcqDataError::ShapeMismatch(format!(
                "{} nodes but {} readout times",
                nodes.len(),
                times.len()
            )));
        }
        if num_profiles * samples_per_profile != nodes.len() {
            return Err(AcqDataError::ShapeMismatch(format!(
                "{num_profiles} profiles x {samples_per_profile} samples does not match {} nodes",
                nodes.len()
            )));
        }

        Ok(Self {
            nodes,
            times,
            num_profiles,
            samples_per_profile,
            dims,
            cartesian: false,
        })
    }

    /// Single-profile 2D trajectory with zeroed readout times, handy for
    /// node sets that carry no readout structure.
    pub fn from_nodes_2d(nodes: &[[f64; 2]]) -> Self {
        Self {
            nodes: nodes.iter().map(|&[x, y]| [x, y, 0.0]).collect(),
            times: vec![0.0; nodes.len()],
            num_profiles: 1,
            samples_per_profile: nodes.len(),
            dims: 2,
            cartesian: false,
        }
    }

    /// Fully sampled 2D Cartesian grid of `nx` readout samples by `ny` phase
    /// encoding lines. Node `x + nx * y` sits at `((x - nx/2) / nx, (y - ny/2) / ny)`.
    pub fn cartesian_2d(nx: usize, ny: usize, dwell_time: f64) -> Self {
        let mut nodes = Vec::with_capacity(nx * ny);
        let mut times = Vec::with_capacity(nx * ny);
        for y in 0..ny {
            for x in 0..nx {
                nodes.push([
                    (x as f64 - (nx / 2) as f64) / nx as f64,
                    (y as f64 - (ny / 2) as f64) / ny as f64,
                    0.0,
                ]);
                times.push(x as f64 * dwell_time);
            }
        }

        Self {
            nodes,
            times,
            num_profiles: ny,
            samples_per_profile: nx,
            dims: 2,
            cartesian: true,
        }
    }
}

impl Trajectory for CustomTrajectory {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn times(&self) -> &[f64] {
        &self.times
    }

    fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    fn times_mut(&mut self) -> &mut Vec<f64> {
        &mut self.times
    }

    fn num_profiles(&self) -> usize {
        self.num_profiles
    }

    fn num_samples_per_profile(&self) -> usize {
        self.samples_per_profile
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn is_cartesian(&self) -> bool {
        self.cartesian
    }

    fn set_cartesian(&mut self, cartesian: bool) {
        self.cartesian = cartesian;
    }

    fn retain_indices(&mut self, indices: &[usize]) {
        self.nodes = indices.iter().map(|&i| self.nodes[i]).collect();
        self.times = indices.iter().map(|&i| self.times[i]).collect();
        // A pruned node list no longer splits into the original readouts
        self.num_profiles = 1;
        self.samples_per_profile = self.nodes.len();
    }
}
