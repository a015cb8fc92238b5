//! The acquisition data store and the transforms defined on it.
//!
//! [`AcqData`] owns one trajectory per echo and a cube of k-space data indexed
//! by `[echo, slice, repetition]`. Every cell of the cube is a
//! `[samples x coils]` matrix holding the samples that were actually acquired
//! for that echo: row `i` belongs to node `subsample_indices[echo][i]` of the
//! echo's trajectory.

mod density;
mod indexing;
mod resize;
#[cfg(feature = "snapshot")]
mod snapshot;
mod undersampling;

pub use density::{NufftParams, NufftPlanner};

use ndarray::{Array2, Array3};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    AcqDataError,
    params::SeqParams,
    trajectory::Trajectory,
};

/// Data cube type: `[echo, slice, repetition]` -> `[samples x coils]`
pub type KDataCube = Array3<Array2<Complex64>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcqData<T> {
    pub(crate) params: SeqParams,
    pub(crate) traj: Vec<T>,
    pub(crate) kdata: KDataCube,
    pub(crate) subsample_indices: Vec<Vec<usize>>,
    pub(crate) encoding_size: [usize; 3],
    /// field of view in mm
    pub(crate) fov: [f64; 3],
}

impl<T: Trajectory> AcqData<T> {
    /// Store with one trajectory per echo, all samples of every trajectory
    /// acquired and no further metadata. Use [`AcqDataBuilder`] for the rest.
    pub fn new(traj: Vec<T>, kdata: KDataCube) -> Result<Self, AcqDataError> {
        AcqDataBuilder::new(traj, kdata).build()
    }

    /// Store where every echo was acquired with (a copy of) the same trajectory.
    pub fn from_single_trajectory(traj: T, kdata: KDataCube) -> Result<Self, AcqDataError>
    where
        T: Clone,
    {
        AcqDataBuilder::from_single_trajectory(traj, kdata).build()
    }

    pub fn num_echoes(&self) -> usize {
        self.kdata.dim().0
    }

    pub fn num_slices(&self) -> usize {
        self.kdata.dim().1
    }

    pub fn num_reps(&self) -> usize {
        self.kdata.dim().2
    }

    pub fn num_coils(&self) -> usize {
        self.kdata.first().map_or(0, |cell| cell.ncols())
    }

    /// Number of acquired samples of an echo
    pub fn num_samples(&self, echo: usize) -> Result<usize, AcqDataError> {
        AcqDataError::check_index(crate::Axis::Echo, echo, self.num_echoes())?;
        Ok(self.subsample_indices[echo].len())
    }

    pub fn params(&self) -> &SeqParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut SeqParams {
        &mut self.params
    }

    pub fn trajectories(&self) -> &[T] {
        &self.traj
    }

    pub fn cube(&self) -> &KDataCube {
        &self.kdata
    }

    pub fn subsample_indices(&self) -> &[Vec<usize>] {
        &self.subsample_indices
    }

    pub fn encoding_size(&self) -> [usize; 3] {
        self.encoding_size
    }

    pub fn fov(&self) -> [f64; 3] {
        self.fov
    }

    /// Checks every structural invariant of the store.
    pub fn validate(&self) -> Result<(), AcqDataError> {
        let (num_echoes, num_slices, num_reps) = self.kdata.dim();
        if num_echoes == 0 || num_slices == 0 || num_reps == 0 {
            return Err(AcqDataError::ShapeMismatch(format!(
                "data cube must not be empty, got [{num_echoes}, {num_slices}, {num_reps}]"
            )));
        }
        if self.traj.len() != num_echoes {
            return Err(AcqDataError::ShapeMismatch(format!(
                "{} trajectories for {num_echoes} echoes",
                self.traj.len()
            )));
        }
        if self.subsample_indices.len() != num_echoes {
            return Err(AcqDataError::ShapeMismatch(format!(
                "{} subsample index sets for {num_echoes} echoes",
                self.subsample_indices.len()
            )));
        }

        let num_coils = self.num_coils();
        if num_coils == 0 {
            return Err(AcqDataError::ShapeMismatch("data has no coils".to_string()));
        }

        for (echo, (traj, indices)) in self.traj.iter().zip(&self.subsample_indices).enumerate() {
            if traj.times().len() != traj.num_nodes() {
                return Err(AcqDataError::ShapeMismatch(format!(
                    "trajectory of echo {echo} has {} nodes but {} readout times",
                    traj.num_nodes(),
                    traj.times().len()
                )));
            }
            check_subsample_indices(echo, indices, traj.num_nodes())?;
        }

        for ((echo, slice, rep), cell) in self.kdata.indexed_iter() {
            let expected = self.subsample_indices[echo].len();
            if cell.nrows() != expected || cell.ncols() != num_coils {
                return Err(AcqDataError::ShapeMismatch(format!(
                    "kdata[{echo}, {slice}, {rep}] is {}x{}, expected {expected}x{num_coils}",
                    cell.nrows(),
                    cell.ncols()
                )));
            }
        }

        Ok(())
    }
}

fn check_subsample_indices(
    echo: usize,
    indices: &[usize],
    num_nodes: usize,
) -> Result<(), AcqDataError> {
    let mut seen = vec![false; num_nodes];
    for &idx in indices {
        if idx >= num_nodes {
            return Err(AcqDataError::ShapeMismatch(format!(
                "subsample index {idx} of echo {echo} exceeds {num_nodes} trajectory nodes"
            )));
        }
        if std::mem::replace(&mut seen[idx], true) {
            return Err(AcqDataError::ShapeMismatch(format!(
                "subsample index {idx} of echo {echo} occurs twice"
            )));
        }
    }
    Ok(())
}

/// Constructs an [`AcqData`] with optional metadata and shape expectations.
///
/// # Examples
/// ```
/// use acqdata::{AcqDataBuilder, CustomTrajectory};
/// use ndarray::{Array2, Array3};
/// use num_complex::Complex64;
///
/// let traj = CustomTrajectory::from_nodes_2d(&[[-0.25, 0.0], [0.0, 0.0], [0.25, 0.0]]);
/// // two of the three nodes were acquired, with a single coil
/// let kdata = Array3::from_elem((1, 1, 1), Array2::from_elem((2, 1), Complex64::new(1.0, 0.0)));
///
/// let acq = AcqDataBuilder::new(vec![traj], kdata)
///     .subsample_indices(vec![vec![0, 2]])
///     .encoding_size([3, 1, 1])
///     .fov([200.0, 200.0, 5.0])
///     .build()
///     .unwrap();
/// assert_eq!(acq.num_samples(0).unwrap(), 2);
/// ```
pub struct AcqDataBuilder<T> {
    traj: Vec<T>,
    kdata: KDataCube,
    params: SeqParams,
    subsample_indices: Option<Vec<Vec<usize>>>,
    encoding_size: [usize; 3],
    fov: [f64; 3],
    num_echoes: Option<usize>,
    num_coils: Option<usize>,
    num_slices: Option<usize>,
    num_reps: Option<usize>,
}

impl<T: Trajectory> AcqDataBuilder<T> {
    pub fn new(traj: Vec<T>, kdata: KDataCube) -> Self {
        Self {
            traj,
            kdata,
            params: SeqParams::default(),
            subsample_indices: None,
            encoding_size: [0; 3],
            fov: [0.0; 3],
            num_echoes: None,
            num_coils: None,
            num_slices: None,
            num_reps: None,
        }
    }

    pub fn from_single_trajectory(traj: T, kdata: KDataCube) -> Self
    where
        T: Clone,
    {
        let traj = vec![traj; kdata.dim().0];
        Self::new(traj, kdata)
    }

    pub fn params(mut self, params: SeqParams) -> Self {
        self.params = params;
        self
    }

    /// Indices into each echo's full node set of the samples present in the
    /// data cube. Defaults to all nodes.
    pub fn subsample_indices(mut self, indices: Vec<Vec<usize>>) -> Self {
        self.subsample_indices = Some(indices);
        self
    }

    pub fn encoding_size(mut self, encoding_size: [usize; 3]) -> Self {
        self.encoding_size = encoding_size;
        self
    }

    pub fn fov(mut self, fov: [f64; 3]) -> Self {
        self.fov = fov;
        self
    }

    pub fn num_echoes(mut self, n: usize) -> Self {
        self.num_echoes = Some(n);
        self
    }

    pub fn num_coils(mut self, n: usize) -> Self {
        self.num_coils = Some(n);
        self
    }

    pub fn num_slices(mut self, n: usize) -> Self {
        self.num_slices = Some(n);
        self
    }

    pub fn num_reps(mut self, n: usize) -> Self {
        self.num_reps = Some(n);
        self
    }

    pub fn build(self) -> Result<AcqData<T>, AcqDataError> {
        let subsample_indices = match self.subsample_indices {
            Some(indices) => indices,
            None => self.traj.iter().map(|t| (0..t.num_nodes()).collect()).collect(),
        };

        let acq = AcqData {
            params: self.params,
            traj: self.traj,
            kdata: self.kdata,
            subsample_indices,
            encoding_size: self.encoding_size,
            fov: self.fov,
        };
        acq.validate()?;

        let counts = [
            ("echoes", self.num_echoes, acq.num_echoes()),
            ("coils", self.num_coils, acq.num_coils()),
            ("slices", self.num_slices, acq.num_slices()),
            ("repetitions", self.num_reps, acq.num_reps()),
        ];
        for (name, expected, actual) in counts {
            if let Some(expected) = expected
                && expected != actual
            {
                return Err(AcqDataError::ShapeMismatch(format!(
                    "expected {expected} {name}, data contains {actual}"
                )));
            }
        }

        if acq.encoding_size == [0; 3] {
            log::debug!("acquisition data built without encoding size");
        }
        Ok(acq)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::CustomTrajectory;

    /// Cube whose entries encode their position: `echo + 10 * coil + 100 * row`
    /// as real part, `slice + 10 * rep` as imaginary part.
    pub(crate) fn labeled_cube(
        samples: &[usize],
        num_coils: usize,
        num_slices: usize,
        num_reps: usize,
    ) -> KDataCube {
        Array3::from_shape_fn((samples.len(), num_slices, num_reps), |(echo, slice, rep)| {
            Array2::from_shape_fn((samples[echo], num_coils), |(row, coil)| {
                Complex64::new(
                    (echo + 10 * coil + 100 * row) as f64,
                    (slice + 10 * rep) as f64,
                )
            })
        })
    }

    #[test]
    fn default_indices_cover_all_nodes() {
        let traj = CustomTrajectory::cartesian_2d(4, 2, 1.0);
        let acq = AcqData::from_single_trajectory(traj, labeled_cube(&[8, 8], 2, 3, 1)).unwrap();
        assert_eq!(acq.num_echoes(), 2);
        assert_eq!(acq.num_coils(), 2);
        assert_eq!(acq.num_slices(), 3);
        assert_eq!(acq.num_reps(), 1);
        assert_eq!(acq.subsample_indices()[1], (0..8).collect::<Vec<usize>>());
    }

    #[test]
    fn rejects_inconsistent_stores() {
        let traj = CustomTrajectory::cartesian_2d(2, 2, 1.0);

        // row count does not match the default indices
        let err = AcqData::from_single_trajectory(traj.clone(), labeled_cube(&[3], 1, 1, 1));
        assert!(matches!(err, Err(AcqDataError::ShapeMismatch(_))));

        // index out of range
        let err = AcqDataBuilder::from_single_trajectory(traj.clone(), labeled_cube(&[2], 1, 1, 1))
            .subsample_indices(vec![vec![0, 4]])
            .build();
        assert!(matches!(err, Err(AcqDataError::ShapeMismatch(_))));

        // duplicate index
        let err = AcqDataBuilder::from_single_trajectory(traj.clone(), labeled_cube(&[2], 1, 1, 1))
            .subsample_indices(vec![vec![1, 1]])
            .build();
        assert!(matches!(err, Err(AcqDataError::ShapeMismatch(_))));

        // trajectory count
        let err = AcqData::new(vec![traj.clone()], labeled_cube(&[4, 4], 1, 1, 1));
        assert!(matches!(err, Err(AcqDataError::ShapeMismatch(_))));

        // explicit count expectations
        let err = AcqDataBuilder::from_single_trajectory(traj, labeled_cube(&[4], 2, 1, 1))
            .num_coils(4)
            .build();
        assert!(matches!(err, Err(AcqDataError::ShapeMismatch(_))));
    }

    #[test]
    fn readout_times_follow_nodes() {
        let traj = CustomTrajectory::cartesian_2d(2, 2, 1.0);
        let mut acq = AcqData::from_single_trajectory(traj, labeled_cube(&[4], 1, 1, 1)).unwrap();
        acq.trajectory_mut(0).unwrap().times_mut().truncate(1);
        assert!(matches!(acq.validate(), Err(AcqDataError::ShapeMismatch(_))));
    }
}
