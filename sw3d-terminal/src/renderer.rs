/// Blits framebuffers to the terminal using half-block cells
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use sw3d_core::{Color as Rgb, Framebuffer};

/// Upper pixel in the foreground, lower pixel in the background
const HALF_BLOCK: char = '▀';

/// Draws two framebuffer rows per terminal row, cropped to the terminal size
pub struct FrameBlitter {
    columns: usize,
    rows: usize,
    /// Terminal rows reserved above the image
    top_margin: u16,
}

impl FrameBlitter {
    pub fn new(columns: usize, rows: usize, top_margin: u16) -> Self {
        Self {
            columns,
            rows,
            top_margin,
        }
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.columns = columns;
        self.rows = rows;
    }

    /// Terminal rows available for the image
    fn image_rows(&self) -> usize {
        self.rows.saturating_sub(self.top_margin as usize)
    }

    pub fn draw<W: Write>(&self, frame: &Framebuffer, writer: &mut W) -> std::io::Result<()> {
        let width = frame.width().min(self.columns);
        let cell_rows = ((frame.height() + 1) / 2).min(self.image_rows());

        for row in 0..cell_rows {
            writer.queue(MoveTo(0, self.top_margin + row as u16))?;
            let upper_y = row * 2;
            let lower_y = upper_y + 1;

            for x in 0..width {
                let upper = frame.pixel(x, upper_y);
                // Odd heights leave the last lower half empty
                let lower = if lower_y < frame.height() {
                    frame.pixel(x, lower_y)
                } else {
                    sw3d_core::BACKGROUND
                };

                writer.queue(SetForegroundColor(terminal_color(upper)))?;
                writer.queue(SetBackgroundColor(terminal_color(lower)))?;
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn terminal_color(packed: u32) -> Color {
    let Rgb { r, g, b } = Rgb::unpack(packed);
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_blocks(output: &[u8]) -> usize {
        String::from_utf8_lossy(output).matches(HALF_BLOCK).count()
    }

    #[test]
    fn test_two_pixel_rows_per_cell() {
        let frame = Framebuffer::new(4, 6);
        let mut output = Vec::new();
        FrameBlitter::new(80, 24, 1).draw(&frame, &mut output).unwrap();
        assert_eq!(count_blocks(&output), 4 * 3);
    }

    #[test]
    fn test_crops_to_terminal() {
        let frame = Framebuffer::new(10, 9);
        let mut output = Vec::new();
        let mut blitter = FrameBlitter::new(80, 24, 1);
        blitter.resize(6, 3);
        blitter.draw(&frame, &mut output).unwrap();
        // 6 columns, 3 rows minus the margin row
        assert_eq!(count_blocks(&output), 6 * 2);
    }

    #[test]
    fn test_colors_unpack() {
        assert_eq!(
            terminal_color(Rgb::new(1, 2, 3).pack()),
            Color::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
