//! Procedural pages standing in for captured screens.

use std::collections::HashMap;

use elastic_core::Snapshot;
use image::{Rgba, RgbaImage};

const PALETTE: [[u8; 3]; 5] = [
    [0xf4, 0xf1, 0xea],
    [0xdd, 0xea, 0xf7],
    [0xe6, 0xf4, 0xe1],
    [0xf7, 0xe3, 0xe0],
    [0xec, 0xe4, 0xf6],
];

const HEADER: u32 = 56;
const LINE_PITCH: u32 = 22;
const MARGIN: u32 = 20;

/// Base colour of page `index`, also used to clear behind it.
pub fn page_color(index: usize) -> [u8; 3] {
    PALETTE[index % PALETTE.len()]
}

/// Draws page `index` at `width x height` pixels: a header band and rows of
/// "text" bars whose lengths vary with the index.
pub fn render_page(index: usize, width: u32, height: u32) -> RgbaImage {
    let [r, g, b] = page_color(index);
    let base = Rgba([r, g, b, 255]);
    let header = Rgba([darken(r, 70), darken(g, 70), darken(b, 70), 255]);
    let ink = Rgba([darken(r, 150), darken(g, 150), darken(b, 150), 255]);

    RgbaImage::from_fn(width, height, |x, y| {
        if y < HEADER.min(height) {
            return header;
        }
        let row = (y - HEADER) / LINE_PITCH;
        let in_bar = (y - HEADER) % LINE_PITCH >= LINE_PITCH - 8;
        let percent = 40 + ((row as usize * 37 + index * 11) % 60) as u32;
        let len = width.saturating_sub(2 * MARGIN) * percent / 100;
        if in_bar && x >= MARGIN && x < MARGIN + len {
            ink
        } else {
            base
        }
    })
}

fn darken(c: u8, by: u8) -> u8 {
    c.saturating_sub(by)
}

/// Rendered pages for the current window size.
#[derive(Default)]
pub struct PageCache {
    size: (u32, u32),
    pages: HashMap<usize, Snapshot>,
}

impl PageCache {
    /// Drops every page when the size changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size != (width, height) {
            self.size = (width, height);
            self.pages.clear();
        }
    }

    pub fn get(&mut self, index: usize) -> Snapshot {
        let (w, h) = self.size;
        self.pages
            .entry(index)
            .or_insert_with(|| {
                log::debug!("rendering page {index} at {w}x{h}");
                Snapshot::new(render_page(index, w, h))
            })
            .clone()
    }
}
