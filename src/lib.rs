//! Stacked multi-channel EEG plots.
//!
//! A recording (or a bare `channels x samples` matrix plus its sample rate) is
//! trimmed to a display window, each channel is shifted onto its own baseline,
//! and the traces are drawn on one axis with channel-labelled ticks and a
//! calibrated scale bar. Plots land on tiles of a [`Figure`], where repeated
//! calls with hold enabled overlay e.g. raw and cleaned signals.
//!
//! ```
//! use eegstack::{plot_stacked, Figures, StackedOptions};
//! use ndarray::Array2;
//!
//! let data = Array2::from_shape_fn((4, 500), |(c, t)| ((t + c * 7) as f64 * 0.05).sin() * 20.0);
//! let mut figures = Figures::default();
//! let options = StackedOptions {
//!     sample_rate: Some(250.0),
//!     window: Some([0.5, 1.5]),
//!     reference_channels: Some(vec![3]),
//!     ..StackedOptions::default()
//! };
//! let layout = plot_stacked(&mut figures, data, &options).unwrap();
//! assert_eq!(layout.ticks.len(), 4);
//! ```
pub mod job;
pub mod stacked;
pub use job::{run_file, Job};
pub use stacked::{
    layout, normalize, plot_stacked, render_png, render_svg, save_figure, trim, Event, Figure,
    Figures, PlotStyle, Recording, SignalInput, StackError, StackedLayout, StackedOptions, Tile,
    KNOWN_OPTIONS,
};
