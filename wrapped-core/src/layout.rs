use crate::{LayoutConfig, Result};

/// Canvas geometry for a given number of albums, computed before anything is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub count: usize,
    pub rows: u32,
    pub width: u32,
    pub height: u32,
    cell_width: u32,
    cell_height: u32,
    padding: u32,
    columns: u32,
    title_band: u32,
    caption_band: u32,
}

/// The top-left corner of a cell's thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub x: u32,
    pub y: u32,
}

impl Layout {
    /// `config` must have passed [`LayoutConfig::validate`]. Fails when `count`
    /// albums need a canvas taller than drawing coordinates allow.
    pub fn compute(count: usize, config: &LayoutConfig) -> Result<Self> {
        let columns = config.columns.max(1);
        let rows = u32::try_from(count.div_ceil(columns as usize)).unwrap_or(u32::MAX);
        let (width, height) = config.canvas_size(rows)?;

        Ok(Self {
            count,
            rows,
            width,
            height,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            padding: config.padding,
            columns,
            title_band: config.title_band,
            caption_band: config.caption_band,
        })
    }

    /// Where the `index`th album goes, in closed form.
    pub fn cell(&self, index: usize) -> CellPlacement {
        let column = index as u32 % self.columns;
        let row = index as u32 / self.columns;
        CellPlacement {
            x: self.padding + column * (self.cell_width + self.padding),
            y: self.title_band
                + self.padding
                + row * (self.cell_height + self.padding + self.caption_band),
        }
    }

    /// Walk the grid with a cursor, one placement per album, wrapping to a new row
    /// whenever the next cell would run past the right edge.
    pub fn cells(&self) -> Cells {
        Cells {
            layout: *self,
            x: self.padding,
            y: self.title_band + self.padding,
            remaining: self.count,
        }
    }
}

/// Iterator over cell placements in collection order.
#[derive(Debug, Clone)]
pub struct Cells {
    layout: Layout,
    x: u32,
    y: u32,
    remaining: usize,
}
impl Iterator for Cells {
    type Item = CellPlacement;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let placement = CellPlacement {
            x: self.x,
            y: self.y,
        };

        let layout = &self.layout;
        let step = layout.cell_width + layout.padding;
        self.x += step;
        if layout.width - self.x < step {
            self.x = layout.padding;
            self.y += layout.cell_height + layout.padding + layout.caption_band;
        }

        Some(placement)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
impl ExactSizeIterator for Cells {}
