//! Persisting and reloading the assembled XY data.
//!
//! A cache miss (no file, unreadable file, misaligned arrays) is never an
//! error: callers rebuild instead.

use std::{fs::File, io::BufReader, path::Path};

use ndarray::Array2;

use crate::{io, matrix::XyPair, CoproError, Result};

/// Load a previously saved XY file. `None` on any kind of miss.
pub fn load(path: &Path) -> Option<XyPair> {
    if !path.is_file() {
        tracing::info!("no XY data at {}, building from scratch", path.display());
        return None;
    }
    match io::read_xy(path) {
        Ok(xy) => {
            tracing::debug!("loaded {} rows x {} columns from {}", xy.len(), xy.n_columns(), path.display());
            Some(xy)
        }
        Err(err) => {
            tracing::info!("ignoring unreadable XY data at {}: {err:#}", path.display());
            None
        }
    }
}

/// Save `xy` to `path`, atomically replacing any previous file.
pub fn save(path: &Path, xy: &XyPair) -> Result<()> {
    io::write_xy(path, xy).map_err(|err| cache_error(path, err))
}

/// Save a projection sample matrix as a single `.npy` file.
pub fn save_samples(path: &Path, x: &Array2<f64>) -> Result<()> {
    let mut pending = io::PendingWrite::open(path).map_err(|err| cache_error(path, err))?;
    io::write_f64_2d(&mut pending, x)
        .and_then(|()| pending.commit())
        .map_err(|err| cache_error(path, err))
}

/// Load a sample matrix written by [`save_samples`]. `None` on any kind of miss.
pub fn load_samples(path: &Path) -> Option<Array2<f64>> {
    let Ok(file) = File::open(path) else {
        tracing::info!("no X data at {}, building from scratch", path.display());
        return None;
    };
    match io::read_f64_2d(&mut BufReader::new(file)) {
        Ok(x) => Some(x),
        Err(err) => {
            tracing::info!("ignoring unreadable samples at {}: {err:#}", path.display());
            None
        }
    }
}

fn cache_error(path: &Path, err: anyhow::Error) -> CoproError {
    CoproError::Cache { path: path.to_path_buf(), message: format!("{err:#}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::fs;

    fn pair() -> XyPair {
        XyPair::try_new(
            array![[1.0, 2000.0, 0.1], [2.0, 2000.0, 0.2], [1.0, 2001.0, f64::MIN_POSITIVE]],
            array![false, true, false],
        ).unwrap()
    }

    #[test]
    fn save_then_load_returns_equal_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OUT").join("XY.npz");
        save(&path, &pair()).unwrap();
        assert_eq!(load(&path), Some(pair()));
        assert_eq!(load(&path), load(&path));
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("XY.npz");
        save(&path, &pair()).unwrap();

        let smaller = XyPair::try_new(array![[9.0]], array![true]).unwrap();
        save(&path, &smaller).unwrap();
        assert_eq!(load(&path), Some(smaller));
    }

    #[test]
    fn missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load(&dir.path().join("XY.npz")), None);
    }

    #[test]
    fn malformed_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("XY.npz");
        fs::write(&path, b"PK\x03\x04 definitely not a zip").unwrap();
        assert_eq!(load(&path), None);
    }

    #[test]
    fn unwritable_target_is_a_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("OUT");
        fs::write(&blocker, b"file, not a directory").unwrap();
        let err = save(&blocker.join("XY.npz"), &pair()).unwrap_err();
        assert!(matches!(err, CoproError::Cache { .. }));
    }

    #[test]
    fn samples_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("X.npy");
        let x = array![[0.5, 1.0], [1.5, 2.0]];
        save_samples(&path, &x).unwrap();
        assert_eq!(load_samples(&path), Some(x));
        assert_eq!(load_samples(&dir.path().join("absent.npy")), None);
        fs::write(&path, b"\x93NUMPY garbage").unwrap();
        assert_eq!(load_samples(&path), None);
    }
}
