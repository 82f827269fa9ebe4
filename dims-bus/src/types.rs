use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Opaque key naming one unit of work (the image URL).
pub type Identifier = String;

/// Final mapping of identifier to outcome. Ordered by key so reports are stable.
pub type ResultMap = BTreeMap<Identifier, FetchOutcome>;

/// Pixel size of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Result of fetching and decoding a single identifier.
///
/// `Failure` covers every per-item problem (network, status, timeout, oversize body,
/// undecodable bytes). It is a terminal outcome, not an error to recover from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(Dimensions),
    Failure,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}
