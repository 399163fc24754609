//! Reference 5x7 LED matrix
//!
//! Rasterizes render commands into an on/off bitmap and owns the glyph
//! shapes for the end-of-round verdict.

use glam::IVec2;

use super::{Frame, RenderCommand};
use crate::consts::{MATRIX_HEIGHT, MATRIX_WIDTH};

const WIDTH: usize = MATRIX_WIDTH as usize;
const HEIGHT: usize = MATRIX_HEIGHT as usize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedMatrix {
    /// `pixels[y][x]`, y = 0 is the top row
    pixels: [[bool; WIDTH]; HEIGHT],
    /// Text currently scrolling, if any
    text: Option<String>,
}

impl LedMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay a frame on top of the current contents
    pub fn apply(&mut self, frame: &Frame) {
        for command in frame {
            self.execute(command);
        }
    }

    pub fn execute(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::Clear => {
                self.pixels = Default::default();
                self.text = None;
            }
            RenderCommand::SetPixel { at, on } => self.set(*at, *on),
            RenderCommand::DrawBox { from, to, on } => self.draw_box(*from, *to, *on),
            RenderCommand::DrawLine { from, to, on } => self.draw_line(*from, *to, *on),
            RenderCommand::Text(text) => self.text = Some(text.clone()),
            RenderCommand::Verdict { defeated: true } => self.draw_skull(),
            RenderCommand::Verdict { defeated: false } => self.draw_trophy(),
        }
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        Self::index(IVec2::new(x, y))
            .map(|(x, y)| self.pixels[y][x])
            .unwrap_or(false)
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().flatten().filter(|&&p| p).count()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// One line per matrix row, `#` for lit pixels
    pub fn to_ascii(&self) -> String {
        self.pixels
            .iter()
            .map(|row| row.iter().map(|&p| if p { '#' } else { '.' }).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn index(at: IVec2) -> Option<(usize, usize)> {
        let inside = (0..MATRIX_WIDTH).contains(&at.x) && (0..MATRIX_HEIGHT).contains(&at.y);
        inside.then(|| (at.x as usize, at.y as usize))
    }

    fn set(&mut self, at: IVec2, on: bool) {
        if let Some((x, y)) = Self::index(at) {
            self.pixels[y][x] = on;
        }
    }

    fn draw_box(&mut self, from: IVec2, to: IVec2, on: bool) {
        let min = from.min(to);
        let max = from.max(to);
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                self.set(IVec2::new(x, y), on);
            }
        }
    }

    /// Bresenham line, endpoints included
    fn draw_line(&mut self, from: IVec2, to: IVec2, on: bool) {
        let delta = (to - from).abs();
        let step = (to - from).signum();
        let mut at = from;
        let mut err = delta.x - delta.y;
        loop {
            self.set(at, on);
            if at == to {
                break;
            }
            let e2 = 2 * err;
            if e2 > -delta.y {
                err -= delta.y;
                at.x += step.x;
            }
            if e2 < delta.x {
                err += delta.x;
                at.y += step.y;
            }
        }
    }

    fn draw_skull(&mut self) {
        let p = IVec2::new;
        self.draw_box(p(3, 2), p(1, 3), true);
        self.draw_line(p(3, 0), p(1, 0), true);
        self.draw_line(p(4, 1), p(4, 2), true);
        self.draw_line(p(0, 1), p(0, 2), true);
        self.draw_line(p(1, 5), p(3, 5), true);
        for at in [p(2, 1), p(0, 6), p(0, 4), p(4, 6), p(4, 4)] {
            self.set(at, true);
        }
    }

    fn draw_trophy(&mut self) {
        let p = IVec2::new;
        self.draw_box(p(4, 1), p(0, 2), true);
        self.draw_line(p(3, 3), p(1, 5), true);
        self.draw_line(p(2, 3), p(2, 5), true);
        self.draw_line(p(1, 3), p(3, 5), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_clips_off_matrix_rows() {
        let mut frame = Frame::new();
        frame.fill_box(IVec2::new(1, -1), IVec2::new(2, 0));
        let mut matrix = LedMatrix::new();
        matrix.apply(&frame);

        assert_eq!(matrix.lit_count(), 2);
        assert!(matrix.get(1, 0));
        assert!(matrix.get(2, 0));
    }

    #[test]
    fn test_diagonal_line() {
        let mut frame = Frame::new();
        frame.line(IVec2::new(3, 3), IVec2::new(1, 5));
        let mut matrix = LedMatrix::new();
        matrix.apply(&frame);

        assert!(matrix.get(3, 3));
        assert!(matrix.get(2, 4));
        assert!(matrix.get(1, 5));
        assert_eq!(matrix.lit_count(), 3);
    }

    #[test]
    fn test_verdict_glyphs_differ() {
        let mut skull = LedMatrix::new();
        skull.execute(&RenderCommand::Verdict { defeated: true });
        let mut trophy = LedMatrix::new();
        trophy.execute(&RenderCommand::Verdict { defeated: false });

        assert_ne!(skull, trophy);
        assert_eq!(
            trophy.to_ascii(),
            ".....\n#####\n#####\n.###.\n..#..\n.###.\n....."
        );
    }

    #[test]
    fn test_clear_resets_text_and_pixels() {
        let mut matrix = LedMatrix::new();
        let mut frame = Frame::new();
        frame.text("3");
        frame.pixel(0, 0, true);
        matrix.apply(&frame);
        assert_eq!(matrix.text(), Some("3"));

        matrix.execute(&RenderCommand::Clear);
        assert_eq!(matrix.text(), None);
        assert_eq!(matrix.lit_count(), 0);
    }
}
