//! `.npz` archives holding the `X` and `Y` arrays.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::matrix::XyPair;
use super::{npy, PendingWrite};

const X_MEMBER: &str = "X.npy";
const Y_MEMBER: &str = "Y.npy";

/// Write `xy` to `path` atomically, replacing any existing file.
pub(crate) fn write_xy(path: &Path, xy: &XyPair) -> Result<()> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(PendingWrite::open(path)?);

    zip.start_file(X_MEMBER, options)
        .context("[io::npz] Failed to start X member")?;
    npy::write_f64_2d(&mut zip, &xy.x)?;

    zip.start_file(Y_MEMBER, options)
        .context("[io::npz] Failed to start Y member")?;
    npy::write_bool_1d(&mut zip, &xy.y)?;

    zip.finish()
        .context("[io::npz] Failed to finish archive")?
        .commit()
}

/// Read the `X` and `Y` arrays from `path`.
pub(crate) fn read_xy(path: &Path) -> Result<XyPair> {
    let file = File::open(path)
        .with_context(|| format!("[io::npz] Failed to open {}", path.display()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("[io::npz] Not a zip archive: {}", path.display()))?;

    let x = {
        let mut member = archive.by_name(X_MEMBER)
            .with_context(|| format!("[io::npz] Missing {X_MEMBER} in {}", path.display()))?;
        npy::read_f64_2d(&mut member)?
    };
    let y = {
        let mut member = archive.by_name(Y_MEMBER)
            .with_context(|| format!("[io::npz] Missing {Y_MEMBER} in {}", path.display()))?;
        npy::read_bool_1d(&mut member)?
    };

    let (nx, ny) = (x.nrows(), y.len());
    XyPair::try_new(x, y)
        .with_context(|| format!("[io::npz] X has {nx} rows but Y has {ny}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    fn pair() -> XyPair {
        XyPair::try_new(array![[1.0, 2000.0, 0.5], [2.0, 2000.0, 0.75]], array![true, false]).unwrap()
    }

    #[test]
    fn archive_has_x_and_y_members() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("XY.npz");
        write_xy(&path, &pair()).unwrap();

        let archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(names, vec![X_MEMBER, Y_MEMBER]);
        assert_eq!(read_xy(&path).unwrap(), pair());
    }

    #[test]
    fn missing_member_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("XY.npz");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        zip.start_file(X_MEMBER, SimpleFileOptions::default()).unwrap();
        npy::write_f64_2d(&mut zip, &pair().x).unwrap();
        zip.finish().unwrap();

        let err = read_xy(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Missing Y.npy"));
    }

    #[test]
    fn row_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("XY.npz");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        zip.start_file(X_MEMBER, SimpleFileOptions::default()).unwrap();
        npy::write_f64_2d(&mut zip, &pair().x).unwrap();
        zip.start_file(Y_MEMBER, SimpleFileOptions::default()).unwrap();
        npy::write_bool_1d(&mut zip, &array![true]).unwrap();
        zip.finish().unwrap();

        assert!(read_xy(&path).unwrap_err().to_string().contains("X has 2 rows but Y has 1"));
    }

    #[test]
    fn non_zip_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("XY.npz");
        File::create(&path).unwrap().write_all(b"garbage").unwrap();
        assert!(read_xy(&path).is_err());
    }
}
