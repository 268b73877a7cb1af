//! Out-of-bound index mapping for filters and interpolation.

/// How samples beyond the image border are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderMode {
    /// Repeat the edge sample.
    Nearest,
    /// Reflect about the edge sample, which is not repeated.
    Mirror,
    /// Reflect about the outer edge, repeating the edge sample.
    Symmetric,
}

impl BorderMode {
    /// Map a possibly out-of-bound index into `[0, len)`.
    pub fn index(self, index: isize, len: usize) -> usize {
        match self {
            Self::Nearest => nearest_index(index, len),
            Self::Mirror => mirror_index(index, len),
            Self::Symmetric => symmetric_index(index, len),
        }
    }
}

/// Map an index into `[0, len)` by mirroring about the edge samples,
/// i.e. `d c b | a b c d | c b a`.
pub fn mirror_index(index: isize, len: usize) -> usize {
    let len = len as isize;
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let index = index.rem_euclid(period);
    let index = if index < len { index } else { period - index };
    index as usize
}

/// Map an index into `[0, len)` by reflecting about the outer edges,
/// i.e. `c b a | a b c | c b a`.
pub fn symmetric_index(index: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let index = index.rem_euclid(period);
    let index = if index < len { index } else { period - 1 - index };
    index as usize
}

/// Map an index into `[0, len)` by repeating the edge samples.
pub fn nearest_index(index: isize, len: usize) -> usize {
    index.clamp(0, len as isize - 1) as usize
}
