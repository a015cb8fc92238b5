//! MR acquisition data: k-space samples together with the trajectories they
//! were acquired on.
//!
//! An [`AcqData`] store is built once from trajectories and a data cube and
//! then transformed into new stores:
//! - [`AcqData::convert_undersampled_data`] turns undersampled data into fully
//!   sampled data on a reduced trajectory,
//! - [`AcqData::change_encoding_size_2d`] changes the target resolution,
//! - [`AcqData::sampling_density`] estimates density compensation weights with
//!   an external [`NufftPlanner`].
//!
//! All indices (echo, coil, slice, repetition, profile, node) are zero-based.
//!
//! # Examples
//! ```
//! use acqdata::{AcqDataBuilder, CustomTrajectory, Trajectory};
//! use ndarray::{Array2, Array3};
//! use num_complex::Complex64;
//!
//! // 4x4 Cartesian grid, 2 coils, every second phase encoding line acquired
//! let traj = CustomTrajectory::cartesian_2d(4, 4, 1e-5);
//! let acquired: Vec<usize> = (0..16).filter(|i| (i / 4) % 2 == 0).collect();
//! let kdata = Array3::from_elem((1, 1, 1), Array2::from_elem((8, 2), Complex64::new(1.0, 0.0)));
//!
//! let acq = AcqDataBuilder::from_single_trajectory(traj, kdata)
//!     .subsample_indices(vec![acquired])
//!     .encoding_size([4, 4, 1])
//!     .build()
//!     .unwrap();
//!
//! let converted = acq.convert_undersampled_data();
//! assert_eq!(converted.trajectory(0).unwrap().nodes().len(), 8);
//! ```

mod acq;
mod error;
mod params;
mod trajectory;

// =====================================
// Public API of acqdata
// =====================================

pub use acq::{AcqData, AcqDataBuilder, KDataCube, NufftParams, NufftPlanner};
pub use error::*;
pub use params::{ParamValue, SeqParams};
pub use trajectory::{CustomTrajectory, Node, Trajectory};
