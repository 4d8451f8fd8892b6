//! JSON-described batches of stacked plots.
//!
//! A job lays several recordings (one per processing stage, movement type, ...)
//! out on a grid of tiles and writes the result to one image.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use serde_json::{Map, Value};
use crate::stacked::{
    plot_stacked, save_figure, Figures, PlotStyle, Recording, StackError, StackedOptions,
};
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// `.png` or `.svg`.
    pub output: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "one")]
    pub rows: usize,
    #[serde(default = "one")]
    pub cols: usize,
    pub panels: Vec<Panel>,
}
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Panel {
    pub tile: usize,
    /// Drawn in order; every layer after the first is overlaid.
    pub layers: Vec<Layer>,
}
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layer {
    pub recording: PathBuf,
    /// Extra channels (e.g. EOG) appended and drawn as references.
    #[serde(default)]
    pub references: Option<PathBuf>,
    /// Centre the window on an event instead of giving one explicitly; a
    /// layer may not set both.
    #[serde(default)]
    pub event: Option<EventWindow>,
    /// Raw option map, checked against the stacked plot's known options.
    #[serde(default)]
    pub options: Map<String, Value>,
}
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventWindow {
    #[serde(rename = "type")]
    pub kind: String,
    /// Which occurrence of the event type, counting from 0.
    #[serde(default)]
    pub index: usize,
    pub before: f64,
    pub after: f64,
}
fn default_width() -> u32 {
    1600
}
fn default_height() -> u32 {
    1000
}
fn one() -> usize {
    1
}
impl Job {
    pub fn load(path: &Path) -> Result<Self, StackError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
    /// Draw every panel. Relative paths resolve against `base_dir`.
    pub fn run(&self, base_dir: &Path) -> Result<Figures, StackError> {
        let style = PlotStyle {
            width: self.width,
            height: self.height,
            ..PlotStyle::default()
        };
        let mut figures = Figures::new(style);
        figures.tiled(self.rows, self.cols);
        for panel in &self.panels {
            for (idx, layer) in panel.layers.iter().enumerate() {
                if let Some(figure) = figures.current_mut() {
                    figure.hold(panel.tile, idx > 0)?;
                }
                let (recording, options) = layer.prepare(base_dir, panel.tile)?;
                log::info!(
                    "tile {}: {} ({} channels)",
                    panel.tile,
                    layer.recording.display(),
                    recording.num_channels()
                );
                plot_stacked(&mut figures, recording, &options)?;
            }
        }
        Ok(figures)
    }
    pub fn output_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.output)
    }
}
impl Layer {
    fn prepare(
        &self,
        base_dir: &Path,
        tile: usize,
    ) -> Result<(Recording, StackedOptions), StackError> {
        let mut options = StackedOptions::from_map(self.options.clone())?;
        options.tile = Some(tile);
        let mut recording = Recording::load_json(base_dir.join(&self.recording))?;
        if let Some(path) = &self.references {
            let aux = Recording::load_json(base_dir.join(path))?;
            let added = recording.append_channels(&aux)?;
            options
                .reference_channels
                .get_or_insert_with(Vec::new)
                .extend(added);
        }
        if let Some(event) = &self.event {
            if options.window.is_some() {
                return Err(StackError::InvalidInput(format!(
                    "layer {} sets both an event and a window",
                    self.recording.display()
                )));
            }
            let found = recording
                .events_of(&event.kind)
                .nth(event.index)
                .ok_or_else(|| {
                    StackError::InvalidInput(format!(
                        "{} has no event #{} of type `{}`",
                        self.recording.display(),
                        event.index,
                        event.kind
                    ))
                })?;
            options.window = Some(Recording::window_around(
                found.latency,
                event.before,
                event.after,
            ));
        }
        Ok((recording, options))
    }
}
/// Run a job file and write its image next to it.
pub fn run_file(path: &Path) -> Result<PathBuf, StackError> {
    let job = Job::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let figures = job.run(base_dir)?;
    let output = job.output_path(base_dir);
    if let Some(figure) = figures.current() {
        save_figure(figure, &output)?;
    }
    Ok(output)
}
