//! High-level zone control interface

use bytes::Bytes;
use tracing::{debug, error, info, warn};

use rnet_core::constants::zone_info;
use rnet_core::{Command, Fields, Session, SessionState};
use rnet_transport::{TcpTransport, Transport};
use rnet_types::{volume_to_device, ZoneField, ZoneInfo};

use crate::config::Config;
use crate::error::Result;
use crate::link::Link;

/// Russound RNET client
///
/// High-level interface for controlling the zones of one or more chained
/// RNET controllers. Controller and zone ids are 1-based; source indexes are
/// 0-based and sent as given.
///
/// All methods take `&self`: share the client with `Arc` and call it from
/// as many tasks as needed. Commands are serialized on the single socket.
///
/// # Examples
///
/// ```no_run
/// use russound::Russound;
///
/// #[tokio::main]
/// async fn main() -> russound::Result<()> {
///     let client = Russound::new("192.168.1.250", 9621);
///
///     client.connect().await?;
///
///     client.set_power(1, 1, 1).await?;
///     client.set_volume(1, 1, 40).await?;
///
///     if let Some(volume) = client.get_volume(1, 1).await? {
///         println!("Zone 1 volume: {}", volume);
///     }
///
///     client.close().await?;
///     Ok(())
/// }
/// ```
pub struct Russound {
    link: Link,
    session: Session,
    config: Config,
}

impl Russound {
    /// Create a client for the controller at `host:port` (TCP transport)
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_config(host, port, Config::default())
    }

    /// Create a client with custom timing or keypad id
    pub fn with_config(host: impl Into<String>, port: u16, config: Config) -> Self {
        let transport = TcpTransport::new(host, port).with_connect_timeout(config.connect_timeout);
        Self::with_transport(Box::new(transport), config)
    }

    /// Create a client over any transport
    pub fn with_transport(transport: Box<dyn Transport>, config: Config) -> Self {
        Self {
            link: Link::new(transport, config.clone()),
            session: Session::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Check if connected
    ///
    /// Best effort: while another task is mid-exchange the session state
    /// alone decides.
    pub fn is_connected(&self) -> bool {
        if !self.session.is_connected() {
            return false;
        }

        match self.link.try_lock() {
            Ok(channel) => channel.transport().is_connected(),
            Err(_) => true,
        }
    }

    /// Connect to the controller
    ///
    /// A failed attempt leaves the client unconnected and may be retried.
    /// A closed client cannot be reconnected.
    pub async fn connect(&self) -> Result<()> {
        let mut channel = self.link.lock().await;

        match self.session.state() {
            SessionState::Connected => return Err(rnet_transport::Error::AlreadyConnected.into()),
            SessionState::Closed => {
                return Err(rnet_core::Error::InvalidSessionState(
                    "client was closed, create a new one".into(),
                )
                .into());
            }
            SessionState::Unconnected => {}
        }

        let addr = channel.transport().remote_addr();
        info!("Connecting to {}...", addr);

        if let Err(e) = channel.transport_mut().connect().await {
            error!("Couldn't connect to {}: {}", addr, e);
            return Err(e.into());
        }

        self.session.open()?;

        info!("Connected to {}", addr);
        Ok(())
    }

    /// Close the connection
    ///
    /// The client is unusable afterwards.
    pub async fn close(&self) -> Result<()> {
        let mut channel = self.link.lock().await;

        if self.session.is_closed() {
            return Ok(());
        }

        info!("Disconnecting from {}...", channel.transport().remote_addr());

        let result = channel.transport_mut().disconnect().await;
        self.session.close();
        result?;

        info!("Disconnected");
        Ok(())
    }

    /// Switch a zone on (1) or off (0)
    pub async fn set_power(&self, controller: u8, zone: u8, power: u8) -> Result<()> {
        let power = power_flag(power)?;
        let fields = self.fields(controller, zone).with_parameter(power);

        self.execute(Command::SetPower, &fields).await?;
        Ok(())
    }

    /// Set zone volume (0-100)
    ///
    /// The controller works in steps of two, odd volumes round down.
    pub async fn set_volume(&self, controller: u8, zone: u8, volume: u8) -> Result<()> {
        if volume > rnet_types::zone::MAX_VOLUME {
            return Err(rnet_core::Error::invalid("volume", volume, "must be 0-100").into());
        }
        let fields = self
            .fields(controller, zone)
            .with_parameter(volume_to_device(volume));

        self.execute(Command::SetVolume, &fields).await?;
        Ok(())
    }

    /// Select the source of a zone (0-based source index)
    pub async fn set_source(&self, controller: u8, zone: u8, source: u8) -> Result<()> {
        let fields = self.fields(controller, zone).with_parameter(source);

        self.execute(Command::SetSource, &fields).await?;
        Ok(())
    }

    /// Switch every zone on (1) or off (0)
    ///
    /// Not every controller model honours "all on".
    pub async fn all_on_off(&self, power: u8) -> Result<()> {
        let fields = Fields::default()
            .with_keypad(self.config.keypad)
            .with_parameter(power_flag(power)?);

        self.execute(Command::AllOnOff, &fields).await?;
        Ok(())
    }

    /// Toggle mute on a zone
    ///
    /// RNET has no explicit mute state to set, this emulates the keypad's
    /// mute button.
    pub async fn toggle_mute(&self, controller: u8, zone: u8) -> Result<()> {
        let fields = self.fields(controller, zone);

        self.execute(Command::ToggleMute, &fields).await?;
        Ok(())
    }

    /// Get power, source and volume of a zone
    ///
    /// Returns `None` when the controller did not answer in time.
    pub async fn get_zone_info(&self, controller: u8, zone: u8) -> Result<Option<ZoneInfo>> {
        let fields = self.fields(controller, zone);

        let Some(reply) = self.execute(Command::RequestZoneInfo, &fields).await? else {
            warn!(
                "Did not receive zone info for controller {} zone {}",
                controller, zone
            );
            return Ok(None);
        };

        let payload = reply.get(zone_info::PAYLOAD_OFFSET..).unwrap_or_default();
        let info = ZoneInfo::from_payload(payload)?;

        debug!("Controller {} zone {}: {}", controller, zone, info);

        Ok(Some(info))
    }

    /// Get a single zone attribute
    pub async fn get_zone_field(
        &self,
        controller: u8,
        zone: u8,
        field: ZoneField,
    ) -> Result<Option<u8>> {
        let info = self.get_zone_info(controller, zone).await?;
        Ok(info.map(|info| info.get(field)))
    }

    /// Get zone power (0 = off, 1 = on)
    pub async fn get_power(&self, controller: u8, zone: u8) -> Result<Option<u8>> {
        self.get_zone_field(controller, zone, ZoneField::Power).await
    }

    /// Get the 0-based source index of a zone
    pub async fn get_source(&self, controller: u8, zone: u8) -> Result<Option<u8>> {
        self.get_zone_field(controller, zone, ZoneField::Source).await
    }

    /// Get zone volume (0-100)
    pub async fn get_volume(&self, controller: u8, zone: u8) -> Result<Option<u8>> {
        self.get_zone_field(controller, zone, ZoneField::Volume).await
    }

    // Helper methods

    fn fields(&self, controller: u8, zone: u8) -> Fields {
        Fields::zone(controller, zone).with_keypad(self.config.keypad)
    }

    /// Build, then run one locked exchange
    ///
    /// Arguments are validated before the lock is taken, so bad input never
    /// reaches the socket.
    async fn execute(&self, command: Command, fields: &Fields) -> Result<Option<Bytes>> {
        let message = command.build(fields)?;
        let signature = command.signature(fields)?;

        let mut channel = self.link.lock().await;

        self.session.ensure_connected()?;

        debug!(
            controller = ?fields.controller,
            zone = ?fields.zone,
            parameter = ?fields.parameter,
            "Sending {}",
            command
        );

        Ok(channel.exchange(&message, signature.as_ref()).await)
    }
}

fn power_flag(power: u8) -> Result<u8> {
    match power {
        0 | 1 => Ok(power),
        _ => Err(rnet_core::Error::invalid("power", power, "must be 0 or 1").into()),
    }
}
