//! # Reliable Publisher
//!
//! `ReliablePublisher` pushes serialized documents of one data source to the
//! broker. Delivery is at-least-once: a publish that fails with a
//! communication error is retried after a backoff wait and a reconnect, for as
//! long as it takes or until the caller cancels.
//!
//! ```text
//!             publish ok
//! Attempting ───────────► Success
//!    ▲   │ communication error
//!    │   ▼
//!    │ Backoff ──► Reconnecting ─┐
//!    └───────────────────────────┘
//! ```
//!
//! Any other session error ends the call immediately.

use core::fmt::Write;
use core::future::Future;
use core::pin::pin;

use embedded_hal_async::delay::DelayNs;
use futures::future::{Either, select};
use heapless::String;
use rand_core::RngCore;
use uuid::{Builder, Uuid};

use crate::backoff::Backoff;
use crate::config::SinkConfig;
use crate::error::{ConfigError, ConnectReasonCode, ErrorKind, SessionError, SinkError};
use crate::queue::SinkRequestReceiver;
use crate::session::{
    ConnectionSettings, PublishMessage, QoS, SOURCE_ID_PROPERTY, SessionClient, UserProperty,
};
use crate::topic::{MAX_TOPIC_LEN, derive_topic};

/// Maximum length for a client id, supplied or generated.
pub const MAX_CLIENT_ID_LEN: usize = 64;

/// Maximum length for the sink identifier.
pub const MAX_ID_LEN: usize = 512;

/// Publishes the data of a single source to its derived topic.
///
/// `C` is the broker session, `D` the delay provider used for backoff waits
/// (`embassy_time::Delay` on Embassy targets).
pub struct ReliablePublisher<'a, C, D> {
    session: C,
    delay: D,
    config: SinkConfig<'a>,
    client_id: String<MAX_CLIENT_ID_LEN>,
    topic: String<MAX_TOPIC_LEN>,
    id: String<MAX_ID_LEN>,
}

impl<'a, C, D> ReliablePublisher<'a, C, D>
where
    C: SessionClient,
    D: DelayNs,
{
    /// Creates a publisher.
    ///
    /// The topic and the identifier are computed here and never change. When
    /// the config carries no client id, a random UUID drawn from `rng` is used.
    pub fn new(
        session: C,
        delay: D,
        config: SinkConfig<'a>,
        rng: &mut impl RngCore,
    ) -> Result<Self, ConfigError> {
        let client_id = match config.client_id {
            Some(supplied) => {
                let mut client_id = String::new();
                client_id
                    .push_str(supplied)
                    .map_err(|_| ConfigError::ClientIdTooLong)?;
                client_id
            }
            None => random_client_id(rng)?,
        };

        let topic = derive_topic(config.base_topic, config.source_id, config.replacements)?;

        let mut id = String::new();
        write!(id, "{}-{}-{}-{}", client_id, config.host, config.port, topic)
            .map_err(|_| ConfigError::IdTooLong)?;

        Ok(Self {
            session,
            delay,
            config,
            client_id,
            topic,
            id,
        })
    }

    /// Stable identifier `"{client_id}-{host}-{port}-{topic}"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn source_id(&self) -> &'a str {
        self.config.source_id
    }

    /// Opens the broker session unless it is already connected.
    ///
    /// A refused connection is returned as [`SinkError::ConnectionRefused`]
    /// and is not retried here.
    pub async fn connect(&mut self) -> Result<(), SinkError<C::Error>> {
        if self.session.is_connected() {
            debug!("sink '{}' already connected", self.id.as_str());
            return Ok(());
        }

        let config = self.config;
        info!("MQTT SAT token file location: '{:?}'", config.sat_file);
        info!("CA cert file location: '{:?}'", config.ca_file);
        info!("Password file location: '{:?}'", config.password_file);

        let settings = ConnectionSettings {
            host: config.host,
            port: config.port,
            client_id: self.client_id.as_str(),
            use_tls: config.use_tls,
            username: config.username,
            password_file: config.password_file,
            sat_file: config.sat_file,
            ca_file: config.ca_file,
        };

        let code = self
            .session
            .connect(&settings)
            .await
            .map_err(SinkError::Session)?;
        if code != ConnectReasonCode::Success {
            error!(
                "failed to connect to the MQTT broker {}:{}, code {:?}",
                config.host, config.port, code
            );
            return Err(SinkError::ConnectionRefused(code));
        }

        info!("connected to the MQTT broker {}:{}", config.host, config.port);
        Ok(())
    }

    /// Publishes `payload` and resolves once the broker acknowledged it.
    ///
    /// Communication failures are retried indefinitely. `cancel` is raced
    /// against the whole delivery, including backoff waits and in-flight
    /// publishes; when it resolves first the call returns
    /// [`SinkError::Cancelled`].
    pub async fn push_data<F>(
        &mut self,
        payload: &[u8],
        cancel: F,
    ) -> Result<(), SinkError<C::Error>>
    where
        F: Future<Output = ()>,
    {
        let outcome = {
            let delivery = pin!(self.publish_until_acknowledged(payload));
            let cancel = pin!(cancel);
            match select(delivery, cancel).await {
                Either::Left((result, _)) => Some(result),
                Either::Right(((), _)) => None,
            }
        };

        outcome.unwrap_or_else(|| {
            warn!(
                "publish to '{}' cancelled before acknowledgement",
                self.topic.as_str()
            );
            Err(SinkError::Cancelled)
        })
    }

    /// Delivers queued requests in arrival order until `stop` resolves.
    ///
    /// Returns `Ok(())` when stopped while idle. A stop that interrupts a
    /// delivery surfaces as [`SinkError::Cancelled`].
    pub async fn run<const DEPTH: usize, F>(
        &mut self,
        requests: SinkRequestReceiver<'_, '_, DEPTH>,
        stop: F,
    ) -> Result<(), SinkError<C::Error>>
    where
        F: Future<Output = ()>,
    {
        let mut stop = pin!(stop);
        loop {
            let receive = pin!(requests.receive());
            let request = match select(receive, stop.as_mut()).await {
                Either::Left((request, _)) => request,
                Either::Right(((), _)) => {
                    debug!("sink '{}' stopped", self.id.as_str());
                    return Ok(());
                }
            };
            self.push_data(request.payload, stop.as_mut()).await?;
        }
    }

    async fn publish_until_acknowledged(
        &mut self,
        payload: &[u8],
    ) -> Result<(), SinkError<C::Error>> {
        let mut backoff = Backoff::new(
            self.config.initial_backoff.as_millis(),
            self.config.max_backoff.as_millis(),
        );
        let properties = [UserProperty::new(SOURCE_ID_PROPERTY, self.config.source_id)];
        let message = PublishMessage {
            topic: self.topic.as_str(),
            qos: QoS::AtLeastOnce,
            payload,
            user_properties: &properties,
        };

        loop {
            match self.session.publish(&message).await {
                Ok(()) => {
                    trace!("published data to MQTT broker, topic: '{}'", message.topic);
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Communication => {
                    error!(
                        "error publishing data to MQTT broker, topic: '{}', reconnecting: {:?}",
                        message.topic, err
                    );
                    let wait_ms = u32::try_from(backoff.current_ms()).unwrap_or(u32::MAX);
                    self.delay.delay_ms(wait_ms).await;
                    backoff.advance();

                    if let Err(err) = self.session.reconnect().await {
                        warn!("reconnect to the MQTT broker failed: {:?}", err);
                    }
                }
                Err(err) => return Err(SinkError::Session(err)),
            }
        }
    }
}

fn random_client_id(rng: &mut impl RngCore) -> Result<String<MAX_CLIENT_ID_LEN>, ConfigError> {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    let uuid = Builder::from_random_bytes(bytes).into_uuid();

    let mut client_id = String::new();
    client_id
        .push_str(uuid.hyphenated().encode_lower(&mut Uuid::encode_buffer()))
        .map_err(|_| ConfigError::ClientIdTooLong)?;
    Ok(client_id)
}
