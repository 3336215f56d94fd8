//! UART halves for the radio link
//!
//! RP2040 has two UART peripherals (UART0 and UART1). The firmware splits
//! a buffered UART into its halves and wraps them here so the driver sees
//! the non-blocking `rakwan-hal` interface.

use embedded_io::{Read, ReadReady, Write};
use rakwan_hal::{UartError, UartRx, UartTx};

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Determine which UART can use a given GPIO pin
///
/// RP2040 has specific pin mappings for each UART.
pub fn gpio_to_uart(gpio: u8) -> Option<UartId> {
    // UART0: GPIO 0/1, 12/13, 16/17, 28/29
    // UART1: GPIO 4/5, 8/9, 20/21, 24/25
    match gpio {
        0 | 1 | 12 | 13 | 16 | 17 | 28 | 29 => Some(UartId::Uart0),
        4 | 5 | 8 | 9 | 20 | 21 | 24 | 25 => Some(UartId::Uart1),
        _ => None,
    }
}

/// Resolve the UART for a TX/RX pin pair
///
/// Both pins must belong to the same peripheral, TX on an even pin of a
/// pair and RX on the odd one.
pub fn uart_for_pins(tx: u8, rx: u8) -> Option<UartId> {
    let id = gpio_to_uart(tx)?;
    if gpio_to_uart(rx) != Some(id) || tx % 2 != 0 || rx % 2 != 1 {
        return None;
    }
    Some(id)
}

/// Receive half over an `embedded-io` reader
pub struct IoRx<T> {
    inner: T,
}

impl<T: Read + ReadReady> IoRx<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Read + ReadReady> UartRx for IoRx<T> {
    type Error = UartError;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready().map_err(|_| UartError::Line)? {
            return Ok(None);
        }

        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(_) => Err(UartError::Overrun),
        }
    }
}

/// Transmit half over an `embedded-io` writer
pub struct IoTx<T> {
    inner: T,
}

impl<T: Write> IoTx<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Write> UartTx for IoTx<T> {
    type Error = UartError;

    // The buffered writer blocks until there is room, so it is always
    // able to accept a command.
    fn is_writable(&self) -> bool {
        true
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data).map_err(|_| UartError::Write)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush().map_err(|_| UartError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_to_uart() {
        assert_eq!(gpio_to_uart(0), Some(UartId::Uart0));
        assert_eq!(gpio_to_uart(5), Some(UartId::Uart1));
        assert_eq!(gpio_to_uart(2), None);
    }

    #[test]
    fn test_uart_for_pins() {
        assert_eq!(uart_for_pins(0, 1), Some(UartId::Uart0));
        assert_eq!(uart_for_pins(8, 9), Some(UartId::Uart1));
        // Swapped roles
        assert_eq!(uart_for_pins(1, 0), None);
        // Mixed peripherals
        assert_eq!(uart_for_pins(0, 5), None);
    }
}
