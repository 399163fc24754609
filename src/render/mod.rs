//! Render commands
//!
//! The simulation describes each frame as a list of drawing commands in
//! matrix coordinates. Display drivers replay them; `LedMatrix` is the
//! reference rasterizer used by the host demo and tests.

pub mod matrix;

pub use matrix::LedMatrix;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// One drawing operation for the display driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Turn every pixel off
    Clear,
    SetPixel { at: IVec2, on: bool },
    /// Filled box between two corners (inclusive, any order)
    DrawBox { from: IVec2, to: IVec2, on: bool },
    DrawLine { from: IVec2, to: IVec2, on: bool },
    /// Short text string (countdown digit)
    Text(String),
    /// End-of-round glyph: skull when `defeated`, trophy otherwise
    Verdict { defeated: bool },
}

/// Commands produced by one tick, in draw order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    commands: Vec<RenderCommand>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.push(RenderCommand::Clear);
    }

    pub fn pixel(&mut self, x: i32, y: i32, on: bool) {
        self.commands.push(RenderCommand::SetPixel {
            at: IVec2::new(x, y),
            on,
        });
    }

    pub fn fill_box(&mut self, from: IVec2, to: IVec2) {
        self.commands.push(RenderCommand::DrawBox { from, to, on: true });
    }

    pub fn line(&mut self, from: IVec2, to: IVec2) {
        self.commands.push(RenderCommand::DrawLine { from, to, on: true });
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.commands.push(RenderCommand::Text(text.into()));
    }

    pub fn verdict(&mut self, defeated: bool) {
        self.commands.push(RenderCommand::Verdict { defeated });
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }
}

impl<'a> IntoIterator for &'a Frame {
    type Item = &'a RenderCommand;
    type IntoIter = std::slice::Iter<'a, RenderCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
