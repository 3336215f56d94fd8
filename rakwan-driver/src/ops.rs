//! LoRaWAN operations
//!
//! Each operation is one transaction with its own timeout and result
//! interpretation. Several settings are applied as independent
//! transactions; there is no multi-command atomicity.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;
use heapless::String;
use rakwan_core::config::{LorawanConfig, MAX_APP_PORT, MIN_APP_PORT};
use rakwan_core::state::Outcome;
use rakwan_hal::UartTx;
use rakwan_protocol::event::JOIN_FAILED_MARKER;
use rakwan_protocol::{at, AppKey, Eui, EvtKind, Region, MAX_PAYLOAD};

use crate::error::Error;
use crate::radio::{Completion, Radio};
use crate::response::Response;

/// Version query timeout
pub const VERSION_TIMEOUT: Duration = Duration::from_millis(2000);

/// Confirmed uplink timeout (waits for the network acknowledgement)
pub const CONFIRMED_SEND_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Unconfirmed uplink timeout
pub const UNCONFIRMED_SEND_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Credential and region setter timeout
pub const SETTER_TIMEOUT: Duration = Duration::from_millis(2000);

/// Raw command timeout
pub const RAW_TIMEOUT: Duration = Duration::from_millis(5000);

/// Response capacity for short replies
const SHORT_RESPONSE: usize = 128;

/// Response capacity for join and send, which may carry events
const LONG_RESPONSE: usize = 256;

/// Response capacity for raw commands
pub const RAW_RESPONSE: usize = 512;

impl<M: RawMutex, T: UartTx> Radio<M, T> {
    /// Query the module firmware version
    ///
    /// Fails with [`Error::ParseError`] if the response has no version or
    /// it does not fit in `V` bytes.
    pub async fn version<const V: usize>(&self) -> Result<String<V>, Error> {
        let response = self
            .execute::<SHORT_RESPONSE>(at::VERSION_QUERY, VERSION_TIMEOUT)
            .await?;

        let text = response.as_str().ok_or(Error::ParseError)?;
        let version = at::parse_version(text).ok_or(Error::ParseError)?;

        let mut out = String::new();
        out.push_str(version).map_err(|_| Error::ParseError)?;
        Ok(out)
    }

    /// Start an OTAA join and wait for the result
    ///
    /// Succeeds only when both the `OK` acknowledgement and `+EVT:JOINED`
    /// arrive within `timeout`, in either order.
    pub async fn join(&self, timeout: Duration) -> Result<(), Error> {
        let transaction = self
            .transact_until::<LONG_RESPONSE>(
                at::JOIN,
                timeout,
                Completion::Event {
                    success: EvtKind::Joined,
                    failure: EvtKind::JoinFailed,
                },
            )
            .await?;

        match transaction.outcome {
            Outcome::Success => {
                info!("radio: joined");
                Ok(())
            }
            Outcome::ProtocolError if transaction.response.contains(JOIN_FAILED_MARKER) => {
                warn!("radio: join failed");
                Err(Error::JoinFailed)
            }
            Outcome::ProtocolError => Err(Error::ProtocolError),
            Outcome::Timeout => Err(Error::ResponseTimeout),
        }
    }

    /// Send an uplink that requests an acknowledgement
    pub async fn send_confirmed(&self, port: u8, data: &[u8]) -> Result<(), Error> {
        self.send(port, data, CONFIRMED_SEND_TIMEOUT).await
    }

    /// Send an uplink without acknowledgement
    pub async fn send_unconfirmed(&self, port: u8, data: &[u8]) -> Result<(), Error> {
        self.send(port, data, UNCONFIRMED_SEND_TIMEOUT).await
    }

    // Validation happens before the lock is taken, so a rejected payload
    // never touches the transport.
    async fn send(&self, port: u8, data: &[u8], timeout: Duration) -> Result<(), Error> {
        if data.is_empty() {
            return Err(Error::EmptyPayload);
        }
        if data.len() > MAX_PAYLOAD {
            return Err(Error::PayloadTooLarge);
        }
        if !(MIN_APP_PORT..=MAX_APP_PORT).contains(&port) {
            return Err(Error::InvalidPort);
        }

        let command = at::send(port, data)?;
        self.execute::<LONG_RESPONSE>(&command, timeout).await?;
        Ok(())
    }

    pub async fn set_dev_eui(&self, eui: &Eui) -> Result<(), Error> {
        self.set(&at::set_dev_eui(eui)?).await
    }

    pub async fn set_app_eui(&self, eui: &Eui) -> Result<(), Error> {
        self.set(&at::set_app_eui(eui)?).await
    }

    pub async fn set_app_key(&self, key: &AppKey) -> Result<(), Error> {
        self.set(&at::set_app_key(key)?).await
    }

    pub async fn set_region(&self, region: Region) -> Result<(), Error> {
        self.set(&at::set_band(region)?).await
    }

    /// Apply credentials and region, stopping at the first failure
    pub async fn configure(&self, config: &LorawanConfig) -> Result<(), Error> {
        self.set_dev_eui(&config.dev_eui).await?;
        self.set_app_eui(&config.app_eui).await?;
        self.set_app_key(&config.app_key).await?;
        self.set_region(config.region).await?;
        info!("radio: configured for {}", config.region.name());
        Ok(())
    }

    /// Send a raw AT command and return the full response
    pub async fn at(&self, command: &str) -> Result<Response<RAW_RESPONSE>, Error> {
        if command.len() > at::MAX_COMMAND_LEN {
            return Err(Error::CommandTooLong);
        }
        self.execute::<RAW_RESPONSE>(command, RAW_TIMEOUT).await
    }

    async fn set(&self, command: &str) -> Result<(), Error> {
        self.execute::<SHORT_RESPONSE>(command, SETTER_TIMEOUT)
            .await
            .map(|_| ())
    }
}
