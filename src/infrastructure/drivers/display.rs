//! SSD1306 128×64 OLED over I2C, drawn through `embedded-graphics`.

use botion_core::domain::ports::{DisplaySurface, Ink, TextSize};
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use esp_hal::Blocking;
use esp_hal::i2c::master::I2c;
use log::{info, warn};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

type Panel = Ssd1306<
    I2CInterface<I2c<'static, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFault {
    /// The controller did not answer the init sequence.
    Init,
    /// The frame could not be sent.
    Flush,
}

pub struct OledSurface {
    panel: Panel,
    cursor: Point,
    font: &'static MonoFont<'static>,
    color: BinaryColor,
}

impl OledSurface {
    /// Initialise the panel at `address` and blank it.
    pub fn new(i2c: I2c<'static, Blocking>, address: u8) -> Result<Self, DisplayFault> {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel.init().map_err(|e| {
            warn!("display: init failed: {:?}", e);
            DisplayFault::Init
        })?;
        panel.clear_buffer();
        panel.flush().map_err(|_| DisplayFault::Flush)?;
        info!("display: ready at {:#04x}", address);

        Ok(Self {
            panel,
            cursor: Point::zero(),
            font: &FONT_6X10,
            color: BinaryColor::On,
        })
    }
}

impl DisplaySurface for OledSurface {
    type Error = DisplayFault;

    #[allow(clippy::cast_possible_wrap)]
    fn width(&self) -> i32 {
        self.panel.size().width as i32
    }

    fn clear(&mut self) {
        self.panel.clear_buffer();
        self.cursor = Point::zero();
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn set_text_size(&mut self, size: TextSize) {
        self.font = match size {
            TextSize::Small => &FONT_6X10,
            TextSize::Large => &FONT_9X15,
        };
    }

    fn set_ink(&mut self, ink: Ink) {
        self.color = match ink {
            Ink::Foreground => BinaryColor::On,
            Ink::Background => BinaryColor::Off,
        };
    }

    #[allow(clippy::cast_possible_wrap)]
    fn println(&mut self, text: &str) {
        let style = MonoTextStyle::new(self.font, self.color);
        // Drawing into the frame buffer cannot fail; pixels off the panel are clipped.
        let _ = Text::with_baseline(text, self.cursor, style, Baseline::Top).draw(&mut self.panel);
        let line_height = self.font.character_size.height as i32;
        self.cursor = Point::new(0, self.cursor.y + line_height);
    }

    fn present(&mut self) -> Result<(), DisplayFault> {
        self.panel.flush().map_err(|e| {
            warn!("display: flush failed: {:?}", e);
            DisplayFault::Flush
        })
    }
}
