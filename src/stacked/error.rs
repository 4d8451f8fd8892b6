use thiserror::Error;
#[derive(Debug, Error)]
pub enum StackError {
    #[error("missing required parameter `{0}` for this input")]
    MissingParameter(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("window [{start}, {end}] s lies outside the recording bounds [{min}, {max}] s")]
    WindowOutOfRange {
        start: f64,
        end: f64,
        min: f64,
        max: f64,
    },
    #[error("invalid window [{start}, {end}] s: {reason}")]
    InvalidWindow {
        start: f64,
        end: f64,
        reason: &'static str,
    },
    #[error("unrecognized option `{0}`")]
    UnrecognizedOption(String),
    #[error("tile {index} does not exist; figure has {tiles} tiles")]
    TileOutOfRange { index: usize, tiles: usize },
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for StackError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        StackError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for StackError {
    fn from(value: image::ImageError) -> Self {
        StackError::Plot(value.to_string())
    }
}
