use esp_hal::gpio::{Input, InputConfig, InputPin, Pull};

/// Configure the push button pin. The button shorts the pin to ground.
pub fn open_button(pin: impl InputPin + 'static) -> Input<'static> {
    Input::new(pin, InputConfig::default().with_pull(Pull::Up))
}
