//! Five-row block glyphs for the headline percentage.

pub const GLYPH_HEIGHT: u16 = 5;

const BLANK: [&str; 5] = ["   ", "   ", "   ", "   ", "   "];

fn glyph(c: char) -> [&'static str; 5] {
    match c {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => ["██ ", " █ ", " █ ", " █ ", "███"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        '.' => [" ", " ", " ", " ", "█"],
        '-' => ["   ", "   ", "███", "   ", "   "],
        _ => BLANK,
    }
}

/// Rows of `text` in block glyphs, one space between glyphs
pub fn render_big(text: &str) -> Vec<String> {
    (0..GLYPH_HEIGHT as usize)
        .map(|row| {
            text.chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Display columns taken by [`render_big`]
pub fn big_width(text: &str) -> usize {
    let glyphs: usize = text.chars().map(|c| glyph(c)[0].chars().count()).sum();
    glyphs + text.chars().count().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_have_equal_width() {
        let rows = render_big("100.0123456789");
        assert_eq!(rows.len(), GLYPH_HEIGHT as usize);
        let width = big_width("100.0123456789");
        for row in rows {
            assert_eq!(row.chars().count(), width);
        }
    }

    #[test]
    fn width_of_simple_values() {
        assert_eq!(big_width("7"), 3);
        assert_eq!(big_width("42"), 7);
        assert_eq!(big_width("4.2"), 9);
        assert_eq!(big_width(""), 0);
    }

    #[test]
    fn decimal_point_sits_on_baseline() {
        let rows = render_big(".");
        assert_eq!(rows, vec![" ", " ", " ", " ", "█"]);
    }
}
