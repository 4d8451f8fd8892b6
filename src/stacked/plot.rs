use std::io::Cursor;
use std::path::Path;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::coord::Shift;
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use crate::stacked::error::StackError;
use crate::stacked::figure::{Figure, Tile};
/// Default per-channel trace colours, cycled by channel index.
pub const DEFAULT_PALETTE: [RGBColor; 7] = [
    RGBColor(0, 114, 189),
    RGBColor(217, 83, 25),
    RGBColor(237, 177, 32),
    RGBColor(126, 47, 142),
    RGBColor(119, 172, 48),
    RGBColor(77, 190, 238),
    RGBColor(162, 20, 47),
];
// Extra x room right of the last window for the scale-bar label.
const LABEL_ROOM: f64 = 0.12;
// Extra x room left of the first window for the channel labels.
const TICK_ROOM: f64 = 0.08;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub palette: Vec<RGBColor>,
    pub title_size: f64,
    pub label_size: f64,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            background: WHITE,
            foreground: BLACK,
            palette: DEFAULT_PALETTE.to_vec(),
            title_size: 16.0,
            label_size: 12.0,
        }
    }
}
pub fn render_png(figure: &Figure) -> Result<Vec<u8>, StackError> {
    let (width, height) = (figure.style.width, figure.style.height);
    let mut buffer = vec![0u8; rgb_buffer_len(width, height)?];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, figure)?;
    }
    encode_png(&buffer, width, height)
}
fn rgb_buffer_len(width: u32, height: u32) -> Result<usize, StackError> {
    if width == 0 || height == 0 {
        return Err(StackError::InvalidInput(format!(
            "image size {width}x{height} has no pixels"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| {
            StackError::InvalidInput(format!("image size {width}x{height} is too large"))
        })
}
pub fn render_svg(figure: &Figure) -> Result<String, StackError> {
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, (figure.style.width, figure.style.height))
            .into_drawing_area();
        draw_figure(&root, figure)?;
    }
    Ok(out)
}
/// Write `figure` as PNG or SVG depending on the file extension.
pub fn save_figure(figure: &Figure, path: &Path) -> Result<(), StackError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => std::fs::write(path, render_png(figure)?)?,
        Some("svg") => std::fs::write(path, render_svg(figure)?)?,
        _ => {
            return Err(StackError::InvalidInput(format!(
                "cannot tell the image format of {}; use .png or .svg",
                path.display()
            )))
        }
    }
    log::info!("wrote {}", path.display());
    Ok(())
}
fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<(), StackError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&figure.style.background)?;
    let (rows, cols) = figure.shape();
    let areas = root.split_evenly((rows, cols));
    for (area, tile) in areas.iter().zip(figure.tiles()) {
        if !tile.is_empty() {
            draw_tile(area, tile, &figure.style)?;
        }
    }
    root.present()?;
    Ok(())
}
/// One chart per tile. The y axis carries no numbers: each channel baseline
/// of the most recent layer gets a short mark and its label instead.
fn draw_tile<DB>(
    area: &DrawingArea<DB, Shift>,
    tile: &Tile,
    style: &PlotStyle,
) -> Result<(), StackError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let Some(top) = tile.layers.last() else {
        return Ok(());
    };
    let (x0, x1) = tile
        .layers
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), l| {
            (lo.min(l.window.0), hi.max(l.window.1))
        });
    let span = (x1 - x0).max(f64::EPSILON);
    let x_start = x0 - span * TICK_ROOM;
    let x_end = x1 + span * LABEL_ROOM;
    let (y0, y1) = tile
        .layers
        .iter()
        .map(|l| l.y_bounds())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a), hi.max(b))
        });
    let pad = ((y1 - y0) * 0.05).max(1.0);
    let font = |size: f64| ("sans-serif", size).into_font().color(&style.foreground);
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(&top.title, font(style.title_size))
        .set_label_area_size(LabelAreaPosition::Left, 10)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .build_cartesian_2d(x_start..x_end, (y0 - pad)..(y1 + pad))?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time (s)")
        .x_label_formatter(&|x| format!("{x:.2}"))
        .y_labels(0)
        .axis_style(&style.foreground)
        .label_style(font(style.label_size))
        .draw()?;
    let mark = span * 0.01;
    chart.draw_series(top.ticks.iter().map(|t| {
        PathElement::new(
            vec![(x0 - mark, t.position), (x0, t.position)],
            style.foreground.stroke_width(1),
        )
    }))?;
    let tick_font = font(style.label_size).pos(Pos::new(HPos::Right, VPos::Center));
    chart.draw_series(top.ticks.iter().map(|t| {
        Text::new(t.label.clone(), (x0 - 2.0 * mark, t.position), tick_font.clone())
    }))?;
    for layer in &tile.layers {
        for trace in &layer.traces {
            let line = trace.color.mix(trace.opacity).stroke_width(trace.width);
            chart.draw_series(LineSeries::new(trace.points.iter().copied(), line))?;
        }
        let bar = &layer.scale_bar;
        chart.draw_series(LineSeries::new(
            [(bar.x, bar.from), (bar.x, bar.to)],
            bar.color.stroke_width(2),
        ))?;
        chart.draw_series(std::iter::once(Text::new(
            bar.label.clone(),
            bar.label_at,
            ("sans-serif", style.label_size).into_font().color(&bar.color),
        )))?;
    }
    Ok(())
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, StackError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| StackError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
