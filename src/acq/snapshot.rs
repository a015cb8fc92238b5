//! Compact binary snapshots of a store: MessagePack, compressed with zstd.

use serde::{Serialize, de::DeserializeOwned};

use super::AcqData;
use crate::{AcqDataError, SnapshotError, trajectory::Trajectory};

/// Inverse of [`compress`], any malformed frame is a decompression error.
fn decompress(bytes: &[u8]) -> Result<Vec<u8>, SnapshotError> {
    use ruzstd::{decoding::StreamingDecoder, io::Read};

    let mut raw = Vec::new();
    StreamingDecoder::new(bytes)
        .map_err(std::io::Error::other)?
        .read_to_end(&mut raw)?;
    Ok(raw)
}

fn compress(raw: &[u8]) -> Vec<u8> {
    // ruzstd 0.8 only implements the `Uncompressed` and `Fastest` levels
    ruzstd::encoding::compress_to_vec(raw, ruzstd::encoding::CompressionLevel::Fastest)
}

impl<T: Trajectory + Serialize> AcqData<T> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, AcqDataError> {
        let raw = rmp_serde::to_vec(self).map_err(SnapshotError::SerializationError)?;
        log::debug!("snapshot: {} bytes before compression", raw.len());
        Ok(compress(&raw))
    }
}

impl<T: Trajectory + DeserializeOwned> AcqData<T> {
    /// Restores a store written by [`AcqData::to_bytes`] and checks its
    /// invariants.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AcqDataError> {
        let raw = decompress(bytes)?;
        let acq: Self = rmp_serde::from_slice(&raw).map_err(SnapshotError::DeserializationError)?;
        acq.validate()?;
        Ok(acq)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::labeled_cube;
    use super::*;
    use crate::{AcqDataBuilder, CustomTrajectory, SeqParams};

    #[test]
    fn restores_store() {
        let mut params = SeqParams::new();
        params.insert("TE", vec![4.6, 9.2]);
        let traj = CustomTrajectory::cartesian_2d(4, 2, 1e-5);
        let acq = AcqDataBuilder::from_single_trajectory(traj, labeled_cube(&[3, 8], 2, 2, 2))
            .params(params)
            .subsample_indices(vec![vec![7, 1, 4], (0..8).collect()])
            .encoding_size([4, 2, 1])
            .fov([256.0, 128.0, 5.0])
            .build()
            .unwrap();

        let bytes = acq.to_bytes().unwrap();
        let restored = AcqData::<CustomTrajectory>::from_bytes(&bytes).unwrap();

        assert_eq!(restored.params(), acq.params());
        assert_eq!(restored.trajectories(), acq.trajectories());
        assert_eq!(restored.cube(), acq.cube());
        assert_eq!(restored.subsample_indices(), acq.subsample_indices());
        assert_eq!(restored.encoding_size(), acq.encoding_size());
        assert_eq!(restored.fov(), acq.fov());
    }

    #[test]
    fn rejects_inconsistent_trajectory() {
        let traj = CustomTrajectory::cartesian_2d(2, 2, 1e-5);
        let mut acq = AcqData::from_single_trajectory(traj, labeled_cube(&[4], 1, 1, 1)).unwrap();
        acq.trajectory_mut(0).unwrap().times_mut().truncate(1);

        let bytes = acq.to_bytes().unwrap();
        assert!(matches!(
            AcqData::<CustomTrajectory>::from_bytes(&bytes),
            Err(AcqDataError::Snapshot(SnapshotError::DeserializationError(_)))
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            AcqData::<CustomTrajectory>::from_bytes(&[1, 2, 3, 4]),
            Err(AcqDataError::Snapshot(SnapshotError::DecompressionError(_)))
        ));
    }
}
