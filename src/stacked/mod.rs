pub mod error;
pub mod figure;
pub mod layout;
pub mod offset;
pub mod options;
pub mod plot;
pub mod recording;
pub mod window;
pub use error::StackError;
pub use figure::{plot_stacked, Figure, Figures, Tile};
pub use layout::{layout, ScaleBar, StackedLayout, Tick, Trace};
pub use offset::Offsets;
pub use options::{StackedOptions, KNOWN_OPTIONS};
pub use plot::{render_png, render_svg, save_figure, PlotStyle, DEFAULT_PALETTE};
pub use recording::{normalize, Event, Recording, RecordingFile, SignalInput};
pub use window::{trim, Trimmed};
