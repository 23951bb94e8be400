//! Error types for diagram construction.

/// Errors that can occur while building a Voronoi diagram or mutating a cell.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VoronoiError {
    /// The box corners are not strictly ordered on some axis.
    #[error("invalid bounds on axis {axis}: min {min} must be < max {max}")]
    InvalidBounds { axis: usize, min: f64, max: f64 },

    #[error("bounds contain non-finite coordinates")]
    NonFiniteBounds,

    #[error("no sites provided")]
    NoSites,

    /// A site has a NaN or infinite coordinate.
    #[error("site {index} has non-finite coordinates")]
    InvalidSite { index: usize },

    #[error("site {index} at {site:?} lies outside the bounds")]
    SiteOutOfBounds { index: usize, site: [f64; 3] },

    /// Two sites coincide, so their bisector has no defined normal.
    #[error("sites {a:?} and {b:?} coincide, bisector is undefined")]
    DegenerateBisector { a: [f64; 3], b: [f64; 3] },

    #[error("cell is finalized and can no longer be clipped")]
    CellFinalized,

    /// A cell lost all of its faces although its site is in bounds.
    #[error("cell of site {site:?} became empty while clipping")]
    EmptyCell { site: [f64; 3] },
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
