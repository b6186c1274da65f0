use std::fmt;
use std::sync::Arc;

/// Identifier of a logical asset, e.g. `"trefoil.png"` or `"terrain.bin"`.
///
/// The identifier doubles as the path suffix appended to the asset base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(Arc<str>);

impl AssetId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// How the fetched bytes are prepared before they reach the engine.
///
/// Chosen by the caller at declaration time; never inferred from the identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AssetKind {
    /// Opaque bytes, transferred as-is.
    Binary,
    /// Raster image, decoded host-side into an annotated pixel buffer.
    Image,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AssetStatus {
    Pending,
    Succeeded,
    Failed,
}

impl AssetStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, AssetStatus::Pending)
    }
}

/// One declared asset and its lifecycle status.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub id: AssetId,
    pub kind: AssetKind,
    pub status: AssetStatus,
}

impl AssetRequest {
    pub fn new(id: impl Into<AssetId>, kind: AssetKind) -> Self {
        Self {
            id: id.into(),
            kind,
            status: AssetStatus::Pending,
        }
    }
}
