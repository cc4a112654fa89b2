use super::raster::blend_pixel;
use super::transform::Viewport;

pub const GLYPH_WIDTH: i32 = 3;
pub const GLYPH_HEIGHT: i32 = 5;

const FIRST_PRINTABLE: u32 = 0x20;
const FALLBACK_CHAR: char = '?';

/// 3x5 bitmap glyphs for `' '..='~'`, one row per 3-bit group, top row in the
/// high bits.
const GLYPHS: [u16; 95] = [
    0x0000, 0x2482, 0x5a00, 0x5f7d, 0x7ddf, 0x52a5, 0x2aab, 0x2400, //
    0x1491, 0x4494, 0x0aa8, 0x05d0, 0x0014, 0x01c0, 0x0002, 0x12a4, //
    0x7b6f, 0x2c97, 0x73e7, 0x73cf, 0x5bc9, 0x79cf, 0x79ef, 0x7292, //
    0x7bef, 0x7bcf, 0x0410, 0x0414, 0x1511, 0x0e38, 0x4454, 0x72c2, //
    0x7be7, 0x2bed, 0x6bae, 0x7927, 0x6b6e, 0x79a7, 0x79a4, 0x796f, //
    0x5bed, 0x7497, 0x726f, 0x5bad, 0x4927, 0x5fed, 0x5ffd, 0x7b6f, //
    0x6ba4, 0x7b79, 0x6bad, 0x79cf, 0x7492, 0x5b6f, 0x5b6a, 0x5bfd, //
    0x5aad, 0x5a92, 0x72a7, 0x6926, 0x4889, 0x324b, 0x2a00, 0x0007, //
    0x4400, 0x0e7f, 0x49ae, 0x0f27, 0x13ef, 0x0fa7, 0x39a4, 0x0f79, //
    0x49ad, 0x2092, 0x106a, 0x4bad, 0x4927, 0x0ded, 0x0d6d, 0x0f6f, //
    0x0d74, 0x0f79, 0x0d64, 0x0f8f, 0x2e93, 0x0b6f, 0x0b6a, 0x0b7a, //
    0x0a95, 0x0b79, 0x0e57, 0x3593, 0x2492, 0x64d6, 0x0780,
];

fn glyph_bits(ch: char) -> Option<u16> {
    let code = ch as u32;
    let index = code.checked_sub(FIRST_PRINTABLE)? as usize;
    GLYPHS.get(index).copied()
}

/// Glyph to draw for `ch`; `None` means the character takes no cell.
///
/// Letters outside the bitmap range draw as `?`; symbols such as emoji and
/// variation selectors are dropped.
fn resolve_glyph(ch: char) -> Option<u16> {
    match glyph_bits(ch) {
        Some(bits) => Some(bits),
        None if ch.is_alphanumeric() => glyph_bits(FALLBACK_CHAR),
        None => None,
    }
}

pub fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale.max(1)
}

pub fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale.max(1)
}

pub fn text_width(text: &str, scale: i32) -> i32 {
    let cells = text.chars().filter(|ch| resolve_glyph(*ch).is_some()).count() as i32;
    cells * glyph_advance(scale)
}

pub(crate) fn draw_text(
    frame: &mut [u8],
    viewport: Viewport,
    mut x: i32,
    y: i32,
    text: &str,
    color: [u8; 4],
    scale: i32,
) {
    if viewport.is_empty() {
        return;
    }
    let scale = scale.max(1);
    for ch in text.chars() {
        let Some(bits) = resolve_glyph(ch) else {
            continue;
        };
        draw_glyph(frame, viewport, x, y, bits, color, scale);
        x += glyph_advance(scale);
    }
}

fn draw_glyph(
    frame: &mut [u8],
    viewport: Viewport,
    x: i32,
    y: i32,
    bits: u16,
    color: [u8; 4],
    scale: i32,
) {
    for row in 0..GLYPH_HEIGHT {
        let shift = (GLYPH_HEIGHT - 1 - row) * GLYPH_WIDTH;
        let row_bits = (bits >> shift) & 0b111;
        for col in 0..GLYPH_WIDTH {
            if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            let cell_x = x + col * scale;
            let cell_y = y + row * scale;
            for sy in 0..scale {
                for sx in 0..scale {
                    blend_pixel(frame, viewport, cell_x + sx, cell_y + sy, color, 1.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_printable_ascii() {
        assert!(glyph_bits(' ').is_some());
        assert!(glyph_bits('~').is_some());
        assert!(glyph_bits('\u{7f}').is_none());
        assert_eq!(glyph_bits(' '), Some(0));
    }

    #[test]
    fn emoji_take_no_cell_and_accented_letters_fall_back() {
        assert_eq!(text_width("\u{1F6D2} Shop", 1), text_width(" Shop", 1));
        assert_eq!(resolve_glyph('\u{1edb}'), glyph_bits('?'));
    }

    #[test]
    fn drawing_zero_draws_its_outline() {
        let viewport = Viewport {
            width: 4,
            height: 5,
        };
        let mut frame = vec![0u8; 4 * 5 * 4];
        draw_text(&mut frame, viewport, 0, 0, "0", [255, 255, 255, 255], 1);

        let lit = |x: usize, y: usize| frame[(y * 4 + x) * 4] == 255;
        assert!(lit(0, 0) && lit(1, 0) && lit(2, 0));
        assert!(lit(0, 2) && !lit(1, 2) && lit(2, 2));
        assert!(!lit(3, 0));
    }
}
