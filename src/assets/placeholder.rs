//! Generated stand-in image for photos that failed to load

use super::PhotoTexture;

pub const PLACEHOLDER_SIZE: u32 = 512;

const BACKGROUND: [u8; 4] = [0xF0, 0xF0, 0xF0, 0xFF];
const BORDER: [u8; 4] = [0xFF, 0x44, 0x44, 0xFF];
const HEADLINE: [u8; 4] = [0xCC, 0x00, 0x00, 0xFF];
const CAPTION: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];
const BORDER_WIDTH: u32 = 20;

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;

/// 5x7 glyph rows, most significant of the low five bits is the leftmost pixel
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        ' ' => [0x00; 7],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}

struct Canvas {
    size: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(size: u32, fill: [u8; 4]) -> Self {
        let pixels = fill
            .iter()
            .copied()
            .cycle()
            .take((size * size * 4) as usize)
            .collect();
        Self { size, pixels }
    }

    fn fill_rect(&mut self, x0: u32, y0: u32, w: u32, h: u32, color: [u8; 4]) {
        let x1 = (x0 + w).min(self.size);
        let y1 = (y0 + h).min(self.size);
        for y in y0.min(self.size)..y1 {
            for x in x0.min(self.size)..x1 {
                let i = ((y * self.size + x) * 4) as usize;
                self.pixels[i..i + 4].copy_from_slice(&color);
            }
        }
    }

    /// Draw `text` horizontally centred with its vertical middle at `center_y`
    fn text(&mut self, text: &str, center_y: u32, scale: u32, color: [u8; 4]) {
        let advance = (GLYPH_W + 1) * scale;
        let count = text.chars().count() as u32;
        if count == 0 {
            return;
        }
        let width = count * advance - scale;
        let x_start = self.size.saturating_sub(width) / 2;
        let y_start = center_y.saturating_sub(GLYPH_H * scale / 2);

        for (n, c) in text.chars().enumerate() {
            let rows = glyph(c);
            let gx = x_start + n as u32 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                        self.fill_rect(gx + col * scale, y_start + row as u32 * scale, scale, scale, color);
                    }
                }
            }
        }
    }
}

/// Trim `path` from the left so it fits `max_chars`
fn fit_caption(path: &str, max_chars: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_chars {
        path.to_string()
    } else {
        let keep = max_chars.saturating_sub(3);
        let tail: String = chars[chars.len() - keep..].iter().collect();
        format!("...{}", tail)
    }
}

/// Light grey card with a red border, a headline and the expected path
pub fn placeholder_image(path: &str) -> PhotoTexture {
    let size = PLACEHOLDER_SIZE;
    let mut canvas = Canvas::new(size, BACKGROUND);

    canvas.fill_rect(0, 0, size, BORDER_WIDTH, BORDER);
    canvas.fill_rect(0, size - BORDER_WIDTH, size, BORDER_WIDTH, BORDER);
    canvas.fill_rect(0, 0, BORDER_WIDTH, size, BORDER);
    canvas.fill_rect(size - BORDER_WIDTH, 0, BORDER_WIDTH, size, BORDER);

    canvas.text("IMAGE MISSING", 150, 6, HEADLINE);

    let caption_scale = 2;
    let usable = size - 2 * BORDER_WIDTH;
    let max_chars = (usable / ((GLYPH_W + 1) * caption_scale)) as usize;
    canvas.text(&fit_caption(path, max_chars), 300, caption_scale, CAPTION);

    PhotoTexture {
        width: size,
        height: size,
        pixels: canvas.pixels,
    }
}
