//! NumPy `.npy` arrays (format version 1.0 on write, 1.0 to 3.0 on read).

use std::{io::{Read, Write}, sync::LazyLock};

use anyhow::{bail, ensure, Context, Result};
use ndarray::{Array1, Array2, ShapeBuilder};
use regex::Regex;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGN: usize = 64;

const F64: &str = "<f8";
const BOOL: &str = "|b1";

static DESCR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'descr'\s*:\s*'([^']*)'").unwrap());
static FORTRAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'fortran_order'\s*:\s*(True|False)").unwrap());
static SHAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'shape'\s*:\s*\(([^)]*)\)").unwrap());

#[derive(Debug, PartialEq)]
struct Header {
    descr: String,
    fortran_order: bool,
    shape: Vec<usize>,
}

impl Header {
    fn len(&self) -> Result<usize> {
        self.shape.iter()
            .try_fold(1usize, |n, &d| n.checked_mul(d))
            .context("[io::npy] Array shape overflows")
    }
}

/// Write a 2-D float array as `<f8`, C order.
pub(crate) fn write_f64_2d<W: Write>(writer: &mut W, array: &Array2<f64>) -> Result<()> {
    write_header(writer, F64, &[array.nrows(), array.ncols()])?;
    let mut bytes = Vec::with_capacity(array.len() * 8);
    for value in array.iter() {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    writer.write_all(&bytes).context("[io::npy] Failed to write data")
}

/// Write a 1-D boolean array as `|b1`.
pub(crate) fn write_bool_1d<W: Write>(writer: &mut W, array: &Array1<bool>) -> Result<()> {
    write_header(writer, BOOL, &[array.len()])?;
    let bytes: Vec<u8> = array.iter().map(|&b| u8::from(b)).collect();
    writer.write_all(&bytes).context("[io::npy] Failed to write data")
}

/// Read a 2-D `<f8` array in either memory order.
pub(crate) fn read_f64_2d<R: Read>(reader: &mut R) -> Result<Array2<f64>> {
    let header = read_header(reader)?;
    ensure!(header.descr == F64, "[io::npy] Expected dtype {F64}, found {}", header.descr);
    let &[nrows, ncols] = header.shape.as_slice() else {
        bail!("[io::npy] Expected a 2-D array, found shape {:?}", header.shape);
    };

    let data: Vec<f64> = read_data(reader, header.len()? * 8)?
        .chunks_exact(8)
        .map(|chunk| {
            let mut b8 = [0u8; 8];
            b8.copy_from_slice(chunk);
            f64::from_le_bytes(b8)
        })
        .collect();

    let array = if header.fortran_order {
        Array2::from_shape_vec((nrows, ncols).f(), data)?.as_standard_layout().into_owned()
    } else {
        Array2::from_shape_vec((nrows, ncols), data)?
    };
    Ok(array)
}

/// Read a 1-D `|b1` array.
pub(crate) fn read_bool_1d<R: Read>(reader: &mut R) -> Result<Array1<bool>> {
    let header = read_header(reader)?;
    ensure!(header.descr == BOOL, "[io::npy] Expected dtype {BOOL}, found {}", header.descr);
    ensure!(header.shape.len() == 1, "[io::npy] Expected a 1-D array, found shape {:?}", header.shape);

    read_data(reader, header.len()?)?
        .into_iter()
        .map(|b| match b {
            0 => Ok(false),
            1 => Ok(true),
            other => bail!("[io::npy] Invalid boolean byte {other:#04x}"),
        })
        .collect()
}

fn write_header<W: Write>(writer: &mut W, descr: &str, shape: &[usize]) -> Result<()> {
    let shape = match shape {
        [n] => format!("({n},)"),
        dims => format!("({})", dims.iter().map(usize::to_string).collect::<Vec<_>>().join(", ")),
    };
    let mut dict = format!("{{'descr': '{descr}', 'fortran_order': False, 'shape': {shape}, }}");

    // magic (6) + version (2) + length (2) + dict, padded with spaces and ended by '\n'
    let unpadded = MAGIC.len() + 4 + dict.len() + 1;
    dict.push_str(&" ".repeat((ALIGN - unpadded % ALIGN) % ALIGN));
    dict.push('\n');
    let len = u16::try_from(dict.len()).context("[io::npy] Header too long")?;

    writer.write_all(MAGIC).context("[io::npy] Failed to write magic bytes")?;
    writer.write_all(&[1, 0]).context("[io::npy] Failed to write version")?;
    writer.write_all(&len.to_le_bytes()).context("[io::npy] Failed to write header length")?;
    writer.write_all(dict.as_bytes()).context("[io::npy] Failed to write header")?;
    Ok(())
}

fn read_header<R: Read>(reader: &mut R) -> Result<Header> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)
        .context("[io::npy] Failed to read magic bytes")?;
    ensure!(&magic == MAGIC, "[io::npy] Invalid magic: not a .npy file");

    let mut version = [0u8; 2];
    reader.read_exact(&mut version)
        .context("[io::npy] Failed to read version")?;
    let len = match version[0] {
        1 => {
            let mut b2 = [0u8; 2];
            reader.read_exact(&mut b2).context("[io::npy] Failed to read header length")?;
            u16::from_le_bytes(b2) as usize
        }
        2 | 3 => {
            let mut b4 = [0u8; 4];
            reader.read_exact(&mut b4).context("[io::npy] Failed to read header length")?;
            u32::from_le_bytes(b4) as usize
        }
        major => bail!("[io::npy] Unsupported format version {major}.{}", version[1]),
    };

    let dict = String::from_utf8(read_data(reader, len)?)
        .context("[io::npy] Header is not valid text")?;

    let descr = DESCR.captures(&dict)
        .map(|c| c[1].to_string())
        .context("[io::npy] Header has no 'descr'")?;
    let fortran_order = FORTRAN.captures(&dict)
        .map(|c| &c[1] == "True")
        .context("[io::npy] Header has no 'fortran_order'")?;
    let shape = SHAPE.captures(&dict)
        .context("[io::npy] Header has no 'shape'")?[1]
        .split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| dim.parse::<usize>().with_context(|| format!("[io::npy] Invalid dimension {dim:?}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(Header { descr, fortran_order, shape })
}

/// Read exactly `len` bytes without trusting `len` for the allocation.
fn read_data<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut data)
        .context("[io::npy] Failed to read data")?;
    ensure!(data.len() == len, "[io::npy] Truncated data: expected {len} bytes, found {}", data.len());
    Ok(data)
}
