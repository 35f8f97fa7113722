//! Simulated RNET controller shared by the integration tests
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use parking_lot::Mutex;
use rnet_core::checksum;
use rnet_core::constants::{events, END_OF_MESSAGE};
use russound::{Config, Transport};

/// Timing short enough to keep the suite fast
pub fn fast_config() -> Config {
    Config::default()
        .with_min_delay(Duration::from_millis(5))
        .with_poll_delay(Duration::from_millis(5))
}

/// What the transport saw, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Send(Vec<u8>),
    Receive,
}

/// State of one zone, in device units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneState {
    pub power: u8,
    pub source: u8,
    pub level: u8,
    pub muted: bool,
}

/// Behaviour of the simulated controller
#[derive(Debug, Default)]
pub struct Device {
    /// Zones keyed by 0-based (controller, zone)
    pub zones: HashMap<(u8, u8), ZoneState>,

    /// Frames rejected for a bad checksum or unknown layout
    pub rejected: usize,

    /// Precede every reply with the reply for a neighbouring zone
    pub noise: bool,

    /// Never answer queries
    pub silent: bool,
}

impl Device {
    pub fn zone(&self, controller: u8, zone: u8) -> ZoneState {
        self.zones
            .get(&(controller - 1, zone - 1))
            .copied()
            .unwrap_or_default()
    }

    /// Apply one complete frame, returning the bytes the controller answers with
    pub fn handle(&mut self, frame: &[u8]) -> Vec<u8> {
        if !checksum::verify(frame) {
            self.rejected += 1;
            return Vec::new();
        }

        let body = &frame[..frame.len() - 2];

        match body.len() {
            20 if body[12] == 0xF1 => {
                self.apply_event(body);
                Vec::new()
            }
            15 if body[7] == 0x01 => self.answer_query(body),
            _ => {
                self.rejected += 1;
                Vec::new()
            }
        }
    }

    fn apply_event(&mut self, body: &[u8]) {
        let controller = body[1];

        match body[13] {
            events::POWER => self.zones.entry((controller, body[17])).or_default().power = body[15],
            events::VOLUME => self.zones.entry((controller, body[17])).or_default().level = body[15],
            events::SOURCE => self.zones.entry((controller, body[5])).or_default().source = body[17],
            events::ALL_ON_OFF => {
                for zone in 0..6 {
                    self.zones.entry((0, zone)).or_default().power = body[16];
                }
            }
            events::KEY_PRESS if body[17] == events::KEY_MUTE => {
                let state = self.zones.entry((controller, body[5])).or_default();
                state.muted = !state.muted;
            }
            _ => self.rejected += 1,
        }
    }

    fn answer_query(&mut self, body: &[u8]) -> Vec<u8> {
        if self.silent {
            return Vec::new();
        }

        let (controller, keypad, zone) = (body[1], body[6], body[11]);
        let mut out = Vec::new();

        if self.noise {
            let other = (zone + 1) % 6;
            let state = self.zones.get(&(controller, other)).copied().unwrap_or_default();
            out.extend(zone_info_reply(controller, other, keypad, state));
        }

        let state = self.zones.get(&(controller, zone)).copied().unwrap_or_default();
        out.extend(zone_info_reply(controller, zone, keypad, state));
        out
    }
}

/// Zone info reply as sent by a controller (0-based ids)
pub fn zone_info_reply(controller: u8, zone: u8, keypad: u8, state: ZoneState) -> Vec<u8> {
    let mut frame = vec![
        0xF0, 0x00, 0x00, keypad, controller, 0x00, 0x7F, 0x00, 0x00, 0x04, 0x02, 0x00, zone,
        0x07, 0x00, 0x00, 0x01, 0x00, 0x0C, 0x00, state.power, state.source, state.level,
        0x0A, 0x0A, 0x00, 0x0A, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];
    frame.push(checksum::calculate(&frame));
    frame.push(END_OF_MESSAGE);
    frame
}

/// Split a byte stream into complete frames, keeping any partial tail
pub fn split_frames(buffer: &mut Vec<u8>) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    while let Some(end) = buffer.iter().position(|&b| b == END_OF_MESSAGE) {
        frames.push(buffer.drain(..=end).collect());
    }
    frames
}

/// In-memory transport wired to a simulated controller
pub struct FakeTransport {
    device: Arc<Mutex<Device>>,
    log: Arc<Mutex<Vec<Event>>>,
    outbox: VecDeque<u8>,
    chunk: usize,
    connected: bool,
}

/// Handles kept by the test to inspect the fake after the client owns it
#[derive(Clone)]
pub struct Probe {
    pub device: Arc<Mutex<Device>>,
    pub log: Arc<Mutex<Vec<Event>>>,
}

impl Probe {
    pub fn sends(&self) -> Vec<Vec<u8>> {
        self.log
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Send(frame) => Some(frame.clone()),
                Event::Receive => None,
            })
            .collect()
    }
}

impl FakeTransport {
    /// Replies are handed out `chunk` bytes per read
    pub fn new(chunk: usize) -> (Self, Probe) {
        let device = Arc::new(Mutex::new(Device::default()));
        let log = Arc::new(Mutex::new(Vec::new()));
        let transport = Self {
            device: device.clone(),
            log: log.clone(),
            outbox: VecDeque::new(),
            chunk,
            connected: false,
        };
        (transport, Probe { device, log })
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn connect(&mut self) -> rnet_transport::Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> rnet_transport::Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(&mut self, data: &[u8]) -> rnet_transport::Result<()> {
        if !self.connected {
            return Err(rnet_transport::Error::NotConnected);
        }
        self.log.lock().push(Event::Send(data.to_vec()));
        let reply = self.device.lock().handle(data);
        self.outbox.extend(reply);
        Ok(())
    }

    fn try_receive(&mut self) -> rnet_transport::Result<BytesMut> {
        self.log.lock().push(Event::Receive);
        let n = self.chunk.min(self.outbox.len());
        let chunk: Vec<u8> = self.outbox.drain(..n).collect();
        Ok(BytesMut::from(&chunk[..]))
    }

    fn remote_addr(&self) -> String {
        "fake-controller".into()
    }
}
