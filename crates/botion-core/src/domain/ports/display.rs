use core::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    /// Roughly 6 px wide glyphs, 20 columns on a 128 px panel.
    Small,
    /// Roughly twice the small size.
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    /// Lit pixels.
    Foreground,
    /// Unlit pixels.
    Background,
}

/// A monochrome text surface with an off-screen frame.
///
/// Drawing calls only touch the frame; nothing is visible until
/// [`DisplaySurface::present`] is called.
pub trait DisplaySurface {
    type Error: Debug;

    /// Width of the panel in pixels.
    fn width(&self) -> i32;

    /// Blank the frame.
    fn clear(&mut self);

    /// Move the text cursor. `y` is the top of the next line.
    fn set_cursor(&mut self, x: i32, y: i32);

    fn set_text_size(&mut self, size: TextSize);

    fn set_ink(&mut self, ink: Ink);

    /// Draw `text` at the cursor and move the cursor to the start of the next line.
    fn println(&mut self, text: &str);

    /// Push the frame to the panel.
    fn present(&mut self) -> Result<(), Self::Error>;
}
