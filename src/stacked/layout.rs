use ndarray::Array1;
use plotters::style::RGBColor;
use crate::stacked::offset;
use crate::stacked::recording::{normalize, SignalInput};
use crate::stacked::window::trim;
use crate::stacked::{StackError, StackedOptions};
/// Opacity of reference channels.
pub const REFERENCE_ALPHA: f64 = 0.1;
pub const DEFAULT_LINE_WIDTH: u32 = 1;
pub const DEFAULT_BAR_COLOR: RGBColor = RGBColor(0, 0, 0);
/// Horizontal gap between the window edge and the scale-bar annotation, as a
/// fraction of the window length.
pub const BAR_LABEL_GAP: f64 = 0.01;
/// One channel ready to be drawn.
#[derive(Clone, Debug)]
pub struct Trace {
    pub channel: usize,
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub opacity: f64,
    pub width: u32,
    pub reference: bool,
}
/// Y-axis tick at a channel baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBar {
    pub x: f64,
    pub from: f64,
    pub to: f64,
    pub length: f64,
    pub color: RGBColor,
    pub label: String,
    /// Anchor of the annotation text, right of the window.
    pub label_at: (f64, f64),
}
/// Everything one stacked plot puts on a tile.
#[derive(Clone, Debug)]
pub struct StackedLayout {
    pub title: String,
    pub window: (f64, f64),
    pub step: f64,
    /// Drawing order: primary channels first, references after.
    pub traces: Vec<Trace>,
    /// Bottom to top.
    pub ticks: Vec<Tick>,
    pub scale_bar: ScaleBar,
}
impl StackedLayout {
    /// Vertical extent of traces and scale bar.
    pub fn y_bounds(&self) -> (f64, f64) {
        let ys = self
            .traces
            .iter()
            .flat_map(|t| t.points.iter().map(|p| p.1))
            .chain([self.scale_bar.from, self.scale_bar.to]);
        ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        })
    }
    pub fn trace(&self, channel: usize) -> Option<&Trace> {
        self.traces.iter().find(|t| t.channel == channel)
    }
}
/// Build the stacked layout without touching any drawing surface.
pub fn layout(
    input: SignalInput,
    options: &StackedOptions,
    palette: &[RGBColor],
) -> Result<StackedLayout, StackError> {
    options.validate()?;
    if palette.is_empty() {
        return Err(StackError::InvalidInput("colour palette is empty".into()));
    }
    let recording = normalize(
        input,
        options.sample_rate,
        options.channel_labels.clone(),
    )?;
    let trimmed = trim(&recording, options.window)?;
    let n = trimmed.num_channels();
    let refs = options.reference_channels.clone().unwrap_or_default();
    if let Some(&bad) = refs.iter().find(|&&idx| idx >= n) {
        return Err(StackError::InvalidInput(format!(
            "reference channel {bad} does not exist ({n} channels)"
        )));
    }
    let offsets = offset::compute(&trimmed.data, options.scale, options.scale_bar)?;
    let mut data = trimmed.data;
    offset::apply(&mut data, offsets.step);
    let times = Array1::linspace(trimmed.start, trimmed.end, data.ncols());
    let width = options.line_width.unwrap_or(DEFAULT_LINE_WIDTH);
    let color = options.color.map(|[r, g, b]| RGBColor(r, g, b));
    let make_trace = |channel: usize, reference: bool| {
        let points = times
            .iter()
            .zip(data.row(channel).iter())
            .map(|(&t, &v)| (t, v))
            .collect();
        Trace {
            channel,
            label: trimmed.labels[channel].clone(),
            points,
            color: color.unwrap_or(palette[channel % palette.len()]),
            opacity: if reference { REFERENCE_ALPHA } else { 1.0 },
            width,
            reference,
        }
    };
    let mut traces: Vec<Trace> = (0..n)
        .filter(|idx| !refs.contains(idx))
        .map(|idx| make_trace(idx, false))
        .collect();
    let mut dimmed: Vec<usize> = refs.clone();
    dimmed.sort_unstable();
    dimmed.dedup();
    traces.extend(dimmed.into_iter().map(|idx| make_trace(idx, true)));
    let ticks: Vec<Tick> = offset::tick_positions(offsets.step, n)
        .into_iter()
        .zip((0..n).rev())
        .map(|(position, idx)| Tick {
            position,
            label: trimmed.labels[idx].clone(),
        })
        .collect();
    let from = if n >= 2 {
        ticks[n - 2].position
    } else {
        ticks[0].position
    };
    let bar_color = options
        .scale_bar_color
        .map(|[r, g, b]| RGBColor(r, g, b))
        .unwrap_or(DEFAULT_BAR_COLOR);
    let span = (trimmed.end - trimmed.start).max(f64::EPSILON);
    let scale_bar = ScaleBar {
        x: trimmed.end,
        from,
        to: from + offsets.bar_length,
        length: offsets.bar_length,
        color: bar_color,
        label: format!("{} µV", format_length(offsets.bar_length)),
        label_at: (
            trimmed.end + BAR_LABEL_GAP * span,
            from + offsets.bar_length / 2.0,
        ),
    };
    Ok(StackedLayout {
        title: format!("Window {:.3} - {:.3} s", trimmed.start, trimmed.end),
        window: (trimmed.start, trimmed.end),
        step: offsets.step,
        traces,
        ticks,
        scale_bar,
    })
}
fn format_length(length: f64) -> String {
    if length.fract() == 0.0 {
        format!("{length:.0}")
    } else {
        format!("{length}")
    }
}
