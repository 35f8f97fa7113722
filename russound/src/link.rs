//! Serialized command exchange over a single transport
//!
//! The controller cannot tell replies apart by request, so exactly one
//! exchange may be in flight on the socket. [`Link`] owns the transport
//! behind an async mutex; holding a [`Channel`] guard is the only way to touch
//! the socket, and the guard is held for the full send, delay, poll sequence.

use std::time::Duration;

use bytes::Bytes;
use rnet_core::{Message, Reassembler, Signature};
use rnet_transport::Transport;
use tokio::sync::{Mutex, MutexGuard, TryLockError};
use tokio::time::{sleep, Instant};
use tracing::{debug, trace, warn};

use crate::config::Config;

/// Lock-guarded owner of the transport
pub(crate) struct Link {
    channel: Mutex<Channel>,
}

impl Link {
    pub(crate) fn new(transport: Box<dyn Transport>, config: Config) -> Self {
        Self {
            channel: Mutex::new(Channel {
                transport,
                last_send: None,
                config,
            }),
        }
    }

    /// Wait for exclusive use of the transport
    pub(crate) async fn lock(&self) -> MutexGuard<'_, Channel> {
        self.channel.lock().await
    }

    /// Take the transport only if no exchange is running
    pub(crate) fn try_lock(&self) -> Result<MutexGuard<'_, Channel>, TryLockError> {
        self.channel.try_lock()
    }
}

/// Exclusive access to the transport for one exchange
pub(crate) struct Channel {
    transport: Box<dyn Transport>,
    last_send: Option<Instant>,
    config: Config,
}

impl Channel {
    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn transport_mut(&mut self) -> &mut dyn Transport {
        self.transport.as_mut()
    }

    /// Send a message and collect the reply matching `signature`
    ///
    /// Without a signature the socket is drained and `None` returned.
    pub(crate) async fn exchange(
        &mut self,
        message: &Message,
        signature: Option<&Signature>,
    ) -> Option<Bytes> {
        self.send_command(message).await;
        self.receive_response(signature).await
    }

    /// Write one message, keeping at least `min_delay` since the previous one
    ///
    /// Write failures are logged, not returned: the exchange still runs its
    /// receive step, which then finds nothing.
    pub(crate) async fn send_command(&mut self, message: &Message) {
        if let Some(wait) = self.throttle() {
            trace!("Throttling for {:?}", wait);
            sleep(wait).await;
        }

        trace!("Sending {}", message);

        if let Err(e) = self.transport.send(message.as_ref()).await {
            if e.is_connection_reset() {
                warn!("Connection to {} reset while sending: {}", self.transport.remote_addr(), e);
            } else {
                warn!("Failed to send message to {}: {}", self.transport.remote_addr(), e);
            }
        }

        self.last_send = Some(Instant::now());
    }

    /// Poll the transport for a reply
    ///
    /// Waits `min_delay`, then makes up to `read_attempts` non-blocking reads
    /// (`drain_attempts` when no signature is given), sleeping `poll_delay`
    /// between them.
    pub(crate) async fn receive_response(&mut self, signature: Option<&Signature>) -> Option<Bytes> {
        sleep(self.config.min_delay).await;

        let mut reassembler = signature
            .map(|signature| Reassembler::new(signature.clone()).with_min_trailing(self.config.min_trailing));

        let attempts = if reassembler.is_some() {
            self.config.read_attempts
        } else {
            self.config.drain_attempts
        };

        for attempt in 1..=attempts {
            match self.transport.try_receive() {
                Ok(chunk) if chunk.is_empty() => {}
                Ok(chunk) => match reassembler.as_mut() {
                    Some(reassembler) => {
                        if let Some(reply) = reassembler.feed(&chunk) {
                            debug!(attempt, len = reply.len(), "Matched reply");
                            return Some(reply);
                        }
                    }
                    None => trace!("Drained {} bytes", chunk.len()),
                },
                Err(e) => {
                    warn!("Read from {} failed: {}", self.transport.remote_addr(), e);
                    return None;
                }
            }

            if attempt < attempts {
                sleep(self.config.poll_delay).await;
            }
        }

        None
    }

    /// Remaining time before the next send is allowed
    fn throttle(&self) -> Option<Duration> {
        let elapsed = self.last_send?.elapsed();
        self.config.min_delay.checked_sub(elapsed).filter(|wait| !wait.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::BytesMut;
    use rnet_core::{Command, Fields};
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Transport replaying canned reads and recording sends
    #[derive(Default)]
    struct Script {
        sent: Arc<parking_lot::Mutex<Vec<(Instant, Vec<u8>)>>>,
        reads: VecDeque<rnet_transport::Result<Vec<u8>>>,
        fail_send: bool,
    }

    #[async_trait]
    impl Transport for Script {
        async fn connect(&mut self) -> rnet_transport::Result<()> {
            Ok(())
        }

        async fn disconnect(&mut self) -> rnet_transport::Result<()> {
            Ok(())
        }

        fn is_connected(&self) -> bool {
            true
        }

        async fn send(&mut self, data: &[u8]) -> rnet_transport::Result<()> {
            if self.fail_send {
                return Err(rnet_transport::Error::ConnectionClosed);
            }
            self.sent.lock().push((Instant::now(), data.to_vec()));
            Ok(())
        }

        fn try_receive(&mut self) -> rnet_transport::Result<BytesMut> {
            match self.reads.pop_front() {
                Some(Ok(chunk)) => Ok(BytesMut::from(&chunk[..])),
                Some(Err(e)) => Err(e),
                None => Ok(BytesMut::new()),
            }
        }

        fn remote_addr(&self) -> String {
            "script".into()
        }
    }

    fn fast_config() -> Config {
        Config::default()
            .with_min_delay(Duration::from_millis(20))
            .with_poll_delay(Duration::from_millis(1))
    }

    fn zone_info_reply() -> Vec<u8> {
        let mut frame = vec![
            0xF0, 0x00, 0x00, 0x70, 0x00, 0x00, 0x7F, 0x00, 0x00, 0x04, 0x02, 0x00, 0x00, 0x07,
            0x00, 0x00, 0x01, 0x00, 0x0C, 0x00, 0x01, 0x02, 0x10, 0x00,
        ];
        frame.push(rnet_core::checksum::calculate(&frame));
        frame.push(0xF7);
        frame
    }

    fn request() -> (Message, Signature) {
        let fields = Fields::zone(1, 1);
        let message = Command::RequestZoneInfo.build(&fields).unwrap();
        let signature = Command::RequestZoneInfo.signature(&fields).unwrap().unwrap();
        (message, signature)
    }

    #[tokio::test]
    async fn test_exchange_matches_fragmented_reply() {
        let reply = zone_info_reply();
        let script = Script {
            reads: VecDeque::from(vec![
                Ok(Vec::new()),
                Ok(reply[..9].to_vec()),
                Ok(Vec::new()),
                Ok(reply[9..].to_vec()),
            ]),
            ..Script::default()
        };
        let link = Link::new(Box::new(script), fast_config());
        let (message, signature) = request();

        let found = link.lock().await.exchange(&message, Some(&signature)).await;
        assert_eq!(found.as_deref(), Some(&reply[..]));
    }

    #[tokio::test]
    async fn test_exchange_gives_up_after_budget() {
        let reply = zone_info_reply();
        let mut reads: VecDeque<_> = (0..3).map(|_| Ok(Vec::new())).collect();
        reads.push_back(Ok(reply));

        let script = Script {
            reads,
            ..Script::default()
        };
        let link = Link::new(Box::new(script), fast_config().with_read_attempts(3));
        let (message, signature) = request();

        assert!(link.lock().await.exchange(&message, Some(&signature)).await.is_none());
    }

    #[tokio::test]
    async fn test_drain_reads_once() {
        let script = Script {
            reads: VecDeque::from(vec![Ok(zone_info_reply()), Ok(zone_info_reply())]),
            ..Script::default()
        };
        let link = Link::new(Box::new(script), fast_config());
        let (message, _) = request();

        assert!(link.lock().await.exchange(&message, None).await.is_none());
    }

    #[tokio::test]
    async fn test_drain_skips_poll_delay() {
        let config = fast_config().with_poll_delay(Duration::from_millis(500));
        let link = Link::new(Box::new(Script::default()), config);
        let (message, _) = request();

        let start = Instant::now();
        assert!(link.lock().await.exchange(&message, None).await.is_none());
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_no_sleep_after_last_attempt() {
        let config = fast_config()
            .with_poll_delay(Duration::from_millis(50))
            .with_read_attempts(3);
        let link = Link::new(Box::new(Script::default()), config);
        let (message, signature) = request();

        let start = Instant::now();
        assert!(link.lock().await.exchange(&message, Some(&signature)).await.is_none());

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(120));
        assert!(elapsed < Duration::from_millis(170));
    }

    #[tokio::test]
    async fn test_read_error_ends_exchange() {
        let script = Script {
            reads: VecDeque::from(vec![
                Err(rnet_transport::Error::ConnectionClosed),
                Ok(zone_info_reply()),
            ]),
            ..Script::default()
        };
        let link = Link::new(Box::new(script), fast_config());
        let (message, signature) = request();

        assert!(link.lock().await.exchange(&message, Some(&signature)).await.is_none());
    }

    #[tokio::test]
    async fn test_send_failure_is_contained() {
        let script = Script {
            fail_send: true,
            reads: VecDeque::from(vec![Ok(zone_info_reply())]),
            ..Script::default()
        };
        let link = Link::new(Box::new(script), fast_config());
        let (message, signature) = request();

        // The receive step still runs
        let found = link.lock().await.exchange(&message, Some(&signature)).await;
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_sends_are_spaced() {
        let script = Script::default();
        let sent = script.sent.clone();
        let link = Link::new(Box::new(script), fast_config());
        let (message, _) = request();

        {
            let mut channel = link.lock().await;
            channel.send_command(&message).await;
            channel.send_command(&message).await;
            channel.send_command(&message).await;
        }

        let sent = sent.lock();
        assert_eq!(sent.len(), 3);
        for pair in sent.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= Duration::from_millis(20));
        }
        assert_eq!(sent[0].1, message.as_ref());
    }

    #[tokio::test]
    async fn test_try_lock_fails_while_exchanging() {
        let link = Link::new(Box::new(Script::default()), fast_config());

        let guard = link.lock().await;
        assert!(link.try_lock().is_err());
        drop(guard);
        assert!(link.try_lock().is_ok());
    }
}
