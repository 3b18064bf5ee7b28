use crossterm::event::Event;
use std::io::Write;

pub mod backdrop;
pub mod canvas;
pub mod fireworks;
pub mod hud;
pub mod sound;

/// A full-screen scene driven by the terminal loop.
///
/// `width` and `height` are in sub-pixels: one column by half a row.
pub trait Effect {
    fn update(&mut self, dt: f32);
    fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()>;
    fn handle_event(&mut self, _event: &Event) {}
    fn resize(&mut self, width: usize, height: usize);
}
