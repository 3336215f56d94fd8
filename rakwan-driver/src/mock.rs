//! Scripted UART for host tests
//!
//! Both halves share one wire. Writes are logged; when a complete command
//! line matches a scripted exchange, its reply is queued for the receive
//! half as if the radio had answered.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use rakwan_hal::{OutputPin, UartError, UartRx, UartTx};
use rakwan_protocol::{DataEvent, RxPacket};

use crate::config::DriverConfig;
use crate::ingest::Ingest;
use crate::radio::Radio;

pub type TestRadio = Radio<NoopRawMutex, MockTx>;

#[derive(Default)]
struct WireState {
    inbound: VecDeque<u8>,
    written: Vec<u8>,
    line: Vec<u8>,
    commands: Vec<String>,
    script: Vec<(String, Vec<u8>)>,
    unwritable: bool,
    fail_writes: bool,
    fail_reads: usize,
}

#[derive(Clone, Default)]
pub struct Wire {
    state: Rc<RefCell<WireState>>,
}

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn halves(&self) -> (MockTx, MockRx) {
        (
            MockTx {
                state: self.state.clone(),
            },
            MockRx {
                state: self.state.clone(),
            },
        )
    }

    /// Reply with `reply` when `command` is written
    pub fn expect(&self, command: &str, reply: &[u8]) {
        self.state
            .borrow_mut()
            .script
            .push((command.into(), reply.to_vec()));
    }

    /// Bytes arriving from the radio unprompted
    pub fn inject(&self, bytes: &[u8]) {
        self.state.borrow_mut().inbound.extend(bytes);
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.borrow().commands.clone()
    }

    pub fn written(&self) -> Vec<u8> {
        self.state.borrow().written.clone()
    }

    pub fn set_writable(&self, writable: bool) {
        self.state.borrow_mut().unwritable = !writable;
    }

    pub fn fail_writes(&self) {
        self.state.borrow_mut().fail_writes = true;
    }

    pub fn fail_next_reads(&self, count: usize) {
        self.state.borrow_mut().fail_reads = count;
    }
}

pub struct MockTx {
    state: Rc<RefCell<WireState>>,
}

impl UartTx for MockTx {
    type Error = UartError;

    fn is_writable(&self) -> bool {
        !self.state.borrow().unwritable
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(UartError::Write);
        }

        for &byte in data {
            state.written.push(byte);
            state.line.push(byte);
            if state.line.ends_with(b"\r\n") {
                let len = state.line.len() - 2;
                let command = String::from_utf8_lossy(&state.line[..len]).into_owned();
                state.line.clear();

                if let Some(pos) = state.script.iter().position(|(c, _)| *c == command) {
                    let (_, reply) = state.script.remove(pos);
                    state.inbound.extend(reply);
                }
                state.commands.push(command);
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct MockRx {
    state: Rc<RefCell<WireState>>,
}

impl UartRx for MockRx {
    type Error = UartError;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_reads > 0 {
            state.fail_reads -= 1;
            return Err(UartError::Overrun);
        }
        Ok(state.inbound.pop_front())
    }
}

/// Reset line that records every level written
#[derive(Default)]
pub struct MockPin {
    pub levels: Vec<bool>,
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.levels.push(true);
    }

    fn set_low(&mut self) {
        self.levels.push(false);
    }

    fn is_set_high(&self) -> bool {
        self.levels.last().copied().unwrap_or(true)
    }
}

/// Short timings so tests finish quickly
pub fn test_config() -> DriverConfig {
    use embassy_time::Duration;

    DriverConfig {
        poll_interval: Duration::from_millis(1),
        lock_timeout: Duration::from_millis(200),
        read_timeout: Duration::from_millis(10),
        backoff: Duration::from_millis(1),
    }
}

pub fn setup() -> (Wire, TestRadio, MockRx) {
    let wire = Wire::new();
    let (tx, rx) = wire.halves();
    (wire, Radio::new(tx, test_config()), rx)
}

/// Run `test` with the ingestion loop alongside it
pub fn with_ingest<F: core::future::Future>(radio: &TestRadio, rx: MockRx, test: F) -> F::Output {
    let mut ingest = Ingest::new(radio, rx);
    embassy_futures::block_on(async {
        match select(ingest.run(), test).await {
            Either::First(_) => unreachable!("ingestion loop returned"),
            Either::Second(output) => output,
        }
    })
}

thread_local! {
    static DELIVERED: RefCell<Vec<(String, Option<RxPacket>)>> = const { RefCell::new(Vec::new()) };
}

/// Event callback that records every delivery on the current thread
pub fn record_event(event: &DataEvent<'_>) {
    DELIVERED.with(|d| {
        d.borrow_mut()
            .push((event.raw.into(), event.packet.clone()))
    });
}

/// Events delivered to [`record_event`] so far
pub fn delivered() -> Vec<(String, Option<RxPacket>)> {
    DELIVERED.with(|d| d.borrow().clone())
}
