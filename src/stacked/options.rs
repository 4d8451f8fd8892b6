use serde::Deserialize;
use serde_json::{Map, Value};
use crate::stacked::StackError;
/// Option names accepted by [`StackedOptions::from_json`] and
/// [`StackedOptions::from_pairs`].
pub const KNOWN_OPTIONS: &[&str] = &[
    "window",
    "sample_rate",
    "channel_labels",
    "tile",
    "scale",
    "scale_bar",
    "color",
    "scale_bar_color",
    "reference_channels",
    "line_width",
];
/// Display options for one stacked plot. Every field is optional.
///
/// ```
/// use eegstack::StackedOptions;
/// let opts = StackedOptions {
///     window: Some([10.0, 14.0]),
///     scale: Some(50.0),
///     ..StackedOptions::default()
/// };
/// assert!(opts.color.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackedOptions {
    /// `[start, end]` in seconds; the whole recording when absent.
    pub window: Option<[f64; 2]>,
    /// Required when the input is a bare matrix.
    pub sample_rate: Option<f64>,
    /// Labels for a bare matrix; numbered from 1 when absent.
    pub channel_labels: Option<Vec<String>>,
    /// Draw into this tile of the current figure instead of a new figure.
    pub tile: Option<usize>,
    /// Fixed spacing between channels in the recording's unit (µV).
    pub scale: Option<f64>,
    /// Scale-bar length; defaults to `scale`, else the rounded auto range.
    pub scale_bar: Option<f64>,
    /// One RGB colour for every trace.
    pub color: Option<[u8; 3]>,
    pub scale_bar_color: Option<[u8; 3]>,
    /// 0-based channel indices drawn dimmed.
    pub reference_channels: Option<Vec<usize>>,
    pub line_width: Option<u32>,
}
impl StackedOptions {
    pub fn from_json(text: &str) -> Result<Self, StackError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Self::from_map(map),
            other => Err(StackError::InvalidInput(format!(
                "options must be a JSON object, got {other}"
            ))),
        }
    }
    /// Build from name/value pairs, rejecting names outside [`KNOWN_OPTIONS`].
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, StackError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let map: Map<String, Value> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        Self::from_map(map)
    }
    pub fn from_map(map: Map<String, Value>) -> Result<Self, StackError> {
        if let Some(unknown) = map.keys().find(|k| !KNOWN_OPTIONS.contains(&k.as_str())) {
            return Err(StackError::UnrecognizedOption(unknown.clone()));
        }
        let opts: Self = serde_json::from_value(Value::Object(map))?;
        opts.validate()?;
        Ok(opts)
    }
    pub fn validate(&self) -> Result<(), StackError> {
        if let Some(scale) = self.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(StackError::InvalidInput(format!(
                    "scale must be positive, got {scale}"
                )));
            }
        }
        if let Some(bar) = self.scale_bar {
            if !bar.is_finite() || bar < 0.0 {
                return Err(StackError::InvalidInput(format!(
                    "scale bar length must be non-negative, got {bar}"
                )));
            }
        }
        if self.line_width == Some(0) {
            return Err(StackError::InvalidInput("line width must be at least 1".into()));
        }
        Ok(())
    }
}
