//! Views into the data cube: single columns, multi-echo / multi-coil
//! concatenations, single profiles and zero-filled Cartesian k-space.

use ndarray::{Array2, Array5, ShapeBuilder};
use num_complex::Complex64;

use super::AcqData;
use crate::{AcqDataError, Axis, trajectory::Trajectory};

impl<T: Trajectory> AcqData<T> {
    pub fn trajectory(&self, echo: usize) -> Result<&T, AcqDataError> {
        self.traj.get(echo).ok_or(AcqDataError::IndexError {
            axis: Axis::Echo,
            index: echo,
            len: self.traj.len(),
        })
    }

    /// Mutable access to the trajectory of an echo.
    ///
    /// Changing the node count of the trajectory breaks the store invariants,
    /// use the transforms for that.
    pub fn trajectory_mut(&mut self, echo: usize) -> Result<&mut T, AcqDataError> {
        let len = self.traj.len();
        self.traj.get_mut(echo).ok_or(AcqDataError::IndexError {
            axis: Axis::Echo,
            index: echo,
            len,
        })
    }

    fn cell(&self, echo: usize, slice: usize, rep: usize) -> Result<&Array2<Complex64>, AcqDataError> {
        AcqDataError::check_index(Axis::Echo, echo, self.num_echoes())?;
        AcqDataError::check_index(Axis::Slice, slice, self.num_slices())?;
        AcqDataError::check_index(Axis::Repetition, rep, self.num_reps())?;
        Ok(&self.kdata[[echo, slice, rep]])
    }

    /// Samples of one coil for a single echo, slice and repetition.
    pub fn kdata(
        &self,
        echo: usize,
        coil: usize,
        slice: usize,
        rep: usize,
    ) -> Result<Vec<Complex64>, AcqDataError> {
        let cell = self.cell(echo, slice, rep)?;
        AcqDataError::check_index(Axis::Coil, coil, cell.ncols())?;
        Ok(cell.column(coil).to_vec())
    }

    /// Samples of one coil, all echoes concatenated in echo order.
    pub fn multi_echo_data(
        &self,
        coil: usize,
        slice: usize,
        rep: usize,
    ) -> Result<Vec<Complex64>, AcqDataError> {
        let mut data = Vec::new();
        for echo in 0..self.num_echoes() {
            data.extend(self.kdata(echo, coil, slice, rep)?);
        }
        Ok(data)
    }

    /// All coils of one echo, flattened column-major: the samples of coil 0,
    /// then coil 1, ...
    pub fn multi_coil_data(
        &self,
        echo: usize,
        slice: usize,
        rep: usize,
    ) -> Result<Vec<Complex64>, AcqDataError> {
        let cell = self.cell(echo, slice, rep)?;
        Ok(cell.t().iter().copied().collect())
    }

    /// All coils and echoes of one slice and repetition.
    ///
    /// Ordered by coil first, then echo: the result is the column-major
    /// flattening of a `[total samples x coils]` matrix whose column `c` is
    /// `multi_echo_data(c, slice, rep)`.
    pub fn multi_coil_multi_echo_data(
        &self,
        slice: usize,
        rep: usize,
    ) -> Result<Vec<Complex64>, AcqDataError> {
        AcqDataError::check_index(Axis::Slice, slice, self.num_slices())?;
        AcqDataError::check_index(Axis::Repetition, rep, self.num_reps())?;

        let total: usize = self.subsample_indices.iter().map(Vec::len).sum();
        let mut data = Vec::with_capacity(total * self.num_coils());
        for coil in 0..self.num_coils() {
            for echo in 0..self.num_echoes() {
                data.extend(self.kdata[[echo, slice, rep]].column(coil).iter().copied());
            }
        }
        Ok(data)
    }

    /// Samples of a single profile (readout) as a `[samples per profile x coils]`
    /// matrix.
    ///
    /// The multi-coil data of the echo is read as a column-major
    /// `[samples per profile, profiles, coils]` array, or as
    /// `[samples per profile, profiles, slices, coils]` for 3D trajectories
    /// spanning several slices.
    pub fn profile_data(
        &self,
        echo: usize,
        slice: usize,
        rep: usize,
        profile: usize,
    ) -> Result<Array2<Complex64>, AcqDataError> {
        let traj = self.trajectory(echo)?;
        let num_samples = traj.num_samples_per_profile();
        let num_profiles = traj.num_profiles();
        AcqDataError::check_index(Axis::Profile, profile, num_profiles)?;

        let data = self.multi_coil_data(echo, slice, rep)?;
        let num_coils = self.num_coils();
        let num_slices = if traj.dims() == 2 || self.num_slices() == 1 {
            1
        } else {
            self.num_slices()
        };
        let slice_offset = if num_slices == 1 { 0 } else { slice };

        let expected = num_samples * num_profiles * num_slices * num_coils;
        if data.len() != expected {
            return Err(AcqDataError::ShapeMismatch(format!(
                "echo {echo} holds {} values, expected {num_samples} samples x {num_profiles} profiles x {num_slices} slices x {num_coils} coils",
                data.len()
            )));
        }

        Ok(Array2::from_shape_fn((num_samples, num_coils), |(s, c)| {
            data[s + num_samples * (profile + num_profiles * (slice_offset + num_slices * c))]
        }))
    }

    /// Zero-filled Cartesian k-space of all echoes and coils, shaped
    /// `[nx, ny, nz, echoes, coils]` after the encoding size.
    ///
    /// Node `i` of a trajectory lands at `x + nx * (y + ny * z) == i`, so every
    /// trajectory must be Cartesian with exactly `nx * ny * nz` nodes.
    pub fn kdata_cart(&self, slice: usize, rep: usize) -> Result<Array5<Complex64>, AcqDataError> {
        AcqDataError::check_index(Axis::Slice, slice, self.num_slices())?;
        AcqDataError::check_index(Axis::Repetition, rep, self.num_reps())?;

        let [nx, ny, nz] = self.encoding_size;
        let nz = nz.max(1);
        let grid_size = nx * ny * nz;
        let mut cart = Array5::zeros((nx, ny, nz, self.num_echoes(), self.num_coils()).f());

        for (echo, traj) in self.traj.iter().enumerate() {
            if !traj.is_cartesian() {
                return Err(AcqDataError::ShapeMismatch(format!(
                    "trajectory of echo {echo} is not Cartesian"
                )));
            }
            if traj.num_nodes() != grid_size {
                return Err(AcqDataError::ShapeMismatch(format!(
                    "trajectory of echo {echo} has {} nodes, encoding size {:?} needs {grid_size}",
                    traj.num_nodes(),
                    self.encoding_size
                )));
            }

            let cell = &self.kdata[[echo, slice, rep]];
            for (row, &node) in self.subsample_indices[echo].iter().enumerate() {
                let (x, y, z) = (node % nx, (node / nx) % ny, node / (nx * ny));
                for (coil, &value) in cell.row(row).iter().enumerate() {
                    cart[[x, y, z, echo, coil]] = value;
                }
            }
        }

        Ok(cart)
    }
}
