//! Cover image naming.
//!
//! Uploaded covers are stored as `<PREFIX>_<basename>` where the prefix is six
//! random uppercase alphanumerics. Collisions are not checked.

use rand::Rng;
use rand::seq::SliceRandom;

const PREFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Number of random characters prepended to uploaded filenames.
pub const COVER_PREFIX_LEN: usize = 6;

/// Raised when an upload carries no usable filename.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("file name must not be empty")]
pub struct CoverNameError;

/// Strip directory components and surrounding whitespace from a client name.
fn basename(original: &str) -> Option<&str> {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    match name {
        "" | "." | ".." => None,
        other => Some(other),
    }
}

/// Build a stored cover filename from the client-supplied name.
///
/// # Examples
/// ```
/// use bookshelf::domain::cover_filename;
///
/// let mut rng = rand::thread_rng();
/// let name = cover_filename("../covers/dune.png", &mut rng).unwrap();
/// assert!(name.ends_with("_dune.png"));
/// assert_eq!(name.len(), "ABCDEF_dune.png".len());
/// ```
pub fn cover_filename<R>(original: &str, rng: &mut R) -> Result<String, CoverNameError>
where
    R: Rng + ?Sized,
{
    let name = basename(original).ok_or(CoverNameError)?;
    let prefix: String = (0..COVER_PREFIX_LEN)
        .filter_map(|_| PREFIX_ALPHABET.choose(&mut *rng).copied().map(char::from))
        .collect();
    Ok(format!("{prefix}_{name}"))
}
