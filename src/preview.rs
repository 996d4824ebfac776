use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use gba_dns::palette::{BANK_COUNT, COLORS_PER_BANK};
use gba_dns::PaletteBuffer;

const SWATCH: usize = 8;
const PANEL_W: usize = COLORS_PER_BANK * SWATCH; // 128
const PANEL_H: usize = BANK_COUNT * SWATCH; // 256
const GAP: usize = 16;
const WIN_W: usize = PANEL_W * 2 + GAP;
const WIN_H: usize = PANEL_H;
const BG_COLOR: u32 = 0x001A1A2E;
const DIVIDER_COLOR: u32 = 0x00404060;

/// Source palette on the left, what the hardware receives on the right.
pub struct PaletteViewer {
    pub window: Window,
    buf: Vec<u32>,
}

impl PaletteViewer {
    pub fn new(scale: Scale) -> Result<Self, minifb::Error> {
        let window = Window::new(
            "GBA DNS",
            WIN_W,
            WIN_H,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )?;
        Ok(PaletteViewer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
        })
    }

    pub fn update(&mut self, source: &PaletteBuffer, transferred: &PaletteBuffer, title: &str) {
        self.buf.fill(BG_COLOR);
        draw_palette(&mut self.buf, WIN_W, 0, source);
        draw_palette(&mut self.buf, WIN_W, PANEL_W + GAP, transferred);

        // Divider between background and sprite banks
        let y = PANEL_H / 2;
        for x in 0..WIN_W {
            self.buf[y * WIN_W + x] = DIVIDER_COLOR;
        }

        self.window.set_title(title);
        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }
}

fn draw_palette(buf: &mut [u32], buf_w: usize, x0: usize, palette: &PaletteBuffer) {
    for bank in 0..BANK_COUNT {
        for idx in 0..COLORS_PER_BANK {
            let color = palette.get(bank, idx).to_rgb888();
            // One-pixel border keeps neighbouring swatches apart
            for row in 1..SWATCH {
                for col in 1..SWATCH {
                    let px = x0 + idx * SWATCH + col;
                    let py = bank * SWATCH + row;
                    if px < buf_w && py * buf_w + px < buf.len() {
                        buf[py * buf_w + px] = color;
                    }
                }
            }
        }
    }
}
