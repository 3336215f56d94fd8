//! Radio reset line
//!
//! Wraps any `embedded-hal` output (embassy-rp's `Output` in the firmware)
//! so the driver's reset sequence can drive it.

use embedded_hal::digital::OutputPin as HalOutputPin;
use rakwan_hal::OutputPin;

/// Reset pin adapter
///
/// Tracks the last level written, since `embedded-hal` only exposes the
/// output state through `&mut self`.
pub struct ResetPin<P> {
    pin: P,
    high: bool,
}

impl<P: HalOutputPin> ResetPin<P> {
    /// Wrap an output pin that is currently driven `initial_high`
    pub fn new(pin: P, initial_high: bool) -> Self {
        Self {
            pin,
            high: initial_high,
        }
    }

    /// Release the underlying pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

// RP2040 GPIO writes are infallible
impl<P: HalOutputPin> OutputPin for ResetPin<P> {
    fn set_high(&mut self) {
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
