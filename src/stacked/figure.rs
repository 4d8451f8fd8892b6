use crate::stacked::layout::{layout, StackedLayout};
use crate::stacked::plot::PlotStyle;
use crate::stacked::recording::SignalInput;
use crate::stacked::{StackError, StackedOptions};
/// One subplot. With hold on, successive plots accumulate as layers.
#[derive(Clone, Debug, Default)]
pub struct Tile {
    pub hold: bool,
    pub layers: Vec<StackedLayout>,
}
impl Tile {
    pub fn add(&mut self, layout: StackedLayout) {
        if !self.hold {
            self.layers.clear();
        }
        self.layers.push(layout);
    }
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
/// A grid of tiles rendered into one image.
#[derive(Clone, Debug)]
pub struct Figure {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
    pub style: PlotStyle,
}
impl Figure {
    pub fn new(style: PlotStyle) -> Self {
        Self::grid(1, 1, style)
    }
    /// Row-major grid; tile `i` sits at row `i / cols`, column `i % cols`.
    pub fn grid(rows: usize, cols: usize, style: PlotStyle) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            tiles: vec![Tile::default(); rows * cols],
            style,
        }
    }
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
    pub fn tile(&self, index: usize) -> Result<&Tile, StackError> {
        self.tiles.get(index).ok_or(StackError::TileOutOfRange {
            index,
            tiles: self.tiles.len(),
        })
    }
    pub fn tile_mut(&mut self, index: usize) -> Result<&mut Tile, StackError> {
        let tiles = self.tiles.len();
        self.tiles
            .get_mut(index)
            .ok_or(StackError::TileOutOfRange { index, tiles })
    }
    /// Keep (or stop keeping) earlier plots on a tile.
    pub fn hold(&mut self, index: usize, on: bool) -> Result<(), StackError> {
        self.tile_mut(index)?.hold = on;
        Ok(())
    }
}
/// All figures of a session plus the current one.
#[derive(Debug, Default)]
pub struct Figures {
    figures: Vec<Figure>,
    current: Option<usize>,
    style: PlotStyle,
}
impl Figures {
    pub fn new(style: PlotStyle) -> Self {
        Self {
            figures: Vec::new(),
            current: None,
            style,
        }
    }
    pub fn style(&self) -> &PlotStyle {
        &self.style
    }
    /// Open a fresh single-tile figure and make it current.
    pub fn new_figure(&mut self) -> &mut Figure {
        self.push(Figure::new(self.style.clone()))
    }
    /// Open a fresh `rows x cols` figure and make it current.
    pub fn tiled(&mut self, rows: usize, cols: usize) -> &mut Figure {
        self.push(Figure::grid(rows, cols, self.style.clone()))
    }
    pub fn current(&self) -> Option<&Figure> {
        self.current.and_then(|idx| self.figures.get(idx))
    }
    pub fn current_mut(&mut self) -> Option<&mut Figure> {
        self.current.and_then(|idx| self.figures.get_mut(idx))
    }
    pub fn iter(&self) -> impl Iterator<Item = &Figure> {
        self.figures.iter()
    }
    pub fn len(&self) -> usize {
        self.figures.len()
    }
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
    fn push(&mut self, figure: Figure) -> &mut Figure {
        self.figures.push(figure);
        let idx = self.figures.len() - 1;
        self.current = Some(idx);
        &mut self.figures[idx]
    }
}
/// Draw a stacked multi-channel plot.
///
/// The layout is computed and validated first. Only then is a surface
/// acquired: tile `options.tile` of the current figure, or a new figure when
/// no tile is requested. Errors raised after that point leave earlier layers
/// of the surface as they were; nothing is rolled back.
pub fn plot_stacked(
    figures: &mut Figures,
    input: impl Into<SignalInput>,
    options: &StackedOptions,
) -> Result<StackedLayout, StackError> {
    let stacked = layout(input.into(), options, &figures.style().palette)?;
    let tile = match options.tile {
        Some(index) => {
            let figure = match figures.current {
                Some(_) => figures.current_mut(),
                None => Some(figures.new_figure()),
            };
            figure
                .ok_or(StackError::TileOutOfRange { index, tiles: 0 })?
                .tile_mut(index)?
        }
        None => figures.new_figure().tile_mut(0)?,
    };
    tile.add(stacked.clone());
    Ok(stacked)
}
