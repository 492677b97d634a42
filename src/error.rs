use std::fmt;
use std::io;

/// Every way the encoding pipeline can fail, from config ingestion through
/// the final Bloom-indexing stage. Mirrors the model repo's `CliError`
/// shape (a flat enum with `Display` + `From` glue) rather than a
/// `thiserror` derive, since the teacher stack never pulled in `thiserror`.
#[derive(Debug)]
pub enum PprlError {
    /// `dataset` and `size` do not list the same number of entries.
    ConfigSizeMismatch,
    /// `num_field` is absent or zero.
    MissingFieldCount,
    /// A `size` token failed to parse as an unsigned integer.
    InvalidSize,
    /// An `ignore` token failed to parse, was negative, was `>= num_field`,
    /// or the ignore list itself has `num_field` or more entries.
    InvalidIgnore,
    /// `floor(Mb * w[i])` already summed past `Mb` before remainder
    /// redistribution.
    BitOverflow,
    /// Bit redistribution finished without `sum(m) == Mb`.
    BitRedistributionFailed,
    Io(io::Error),
    Json(serde_json::Error),
    Flag(docopt::Error),
}

impl fmt::Display for PprlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PprlError::ConfigSizeMismatch => {
                write!(f, "#size should equal to #dataset")
            }
            PprlError::MissingFieldCount => write!(f, "missing or invalid num_field"),
            PprlError::InvalidSize => write!(f, "invalid size value"),
            PprlError::InvalidIgnore => write!(f, "invalid ignore index"),
            PprlError::BitOverflow => {
                write!(f, "#bit larger than predefined #bit of bloom filter")
            }
            PprlError::BitRedistributionFailed => {
                write!(f, "failed to redistribute remaining bits")
            }
            PprlError::Io(e) => e.fmt(f),
            PprlError::Json(e) => e.fmt(f),
            PprlError::Flag(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for PprlError {}

impl From<io::Error> for PprlError {
    fn from(err: io::Error) -> PprlError {
        PprlError::Io(err)
    }
}

impl From<serde_json::Error> for PprlError {
    fn from(err: serde_json::Error) -> PprlError {
        PprlError::Json(err)
    }
}

impl From<docopt::Error> for PprlError {
    fn from(err: docopt::Error) -> PprlError {
        PprlError::Flag(err)
    }
}

pub type CliResult<T> = Result<T, PprlError>;
