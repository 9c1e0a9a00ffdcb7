use thiserror::Error;

/// Convenient result alias for the searoute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Absence of a route is not an error for the search family: single-objective
/// searches return an empty path and bidirectional search returns `None`.
/// These variants cover caller mistakes rejected at the API boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when coordinates (or a cell) do not belong to the searched grid.
    #[error("cell ({x}, {y}) is outside the grid")]
    CellOutOfBounds { x: i32, y: i32 },

    /// Raised when a route endpoint is land or otherwise blocked.
    #[error("cell ({x}, {y}) is not traversable")]
    NotTraversable { x: i32, y: i32 },

    /// Raised by request-level planning when no route connects the endpoints.
    #[error("no route found between {start:?} and {goal:?}")]
    RouteNotFound { start: (i32, i32), goal: (i32, i32) },

    /// Raised when objective weights fail validation.
    #[error("invalid objective weights: {message}")]
    InvalidWeights { message: String },

    /// Raised when vessel or optimizer configuration fails validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when a grid cannot be constructed with the requested shape.
    #[error("invalid grid: {message}")]
    InvalidGrid { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
