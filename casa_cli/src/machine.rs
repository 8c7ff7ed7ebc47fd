//! The spinning machine: owns the session, runs the reel animation as a
//! cancellable task and reports progress over a channel.

use std::sync::Arc;
use std::time::Duration;

use casa_core::{
    draw_reels, EngineParams, ProvablyFairRng, Reels, SessionState, SpinError, SpinResolution,
};
use casa_shared::{SessionView, SpinLogEntry};
use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::view::session_view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    pub duration: Duration,
    pub interval: Duration,
    /// Pause between the reels landing and the result being announced.
    pub settle: Duration,
}

impl AnimationConfig {
    pub fn frames(&self) -> u32 {
        let interval = self.interval.as_millis().max(1);
        u32::try_from(self.duration.as_millis() / interval).unwrap_or(u32::MAX)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(2000),
            interval: Duration::from_millis(100),
            settle: Duration::from_millis(500),
        }
    }
}

/// Where final reel outcomes come from. Animation frames never use this.
pub enum DrawSource {
    Entropy(StdRng),
    /// Each resolved spin draws from the HMAC stream with the next nonce.
    /// The counter survives session resets so no nonce is ever reused.
    Seeded {
        server_seed: String,
        client_seed: String,
        next_nonce: u64,
    },
}

impl DrawSource {
    pub fn entropy() -> Self {
        DrawSource::Entropy(StdRng::from_entropy())
    }

    pub fn seeded(server_seed: impl Into<String>, client_seed: impl Into<String>) -> Self {
        DrawSource::Seeded {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            next_nonce: 1,
        }
    }

    pub fn server_seed_hash(&self) -> Option<String> {
        match self {
            DrawSource::Entropy(_) => None,
            DrawSource::Seeded { server_seed, .. } => {
                Some(casa_core::derive_hash_hex(server_seed.as_bytes()))
            }
        }
    }

    /// Resolve a spin into `session`, returning the nonce used when seeded.
    fn spin(
        &mut self,
        session: &mut SessionState,
        params: &EngineParams,
    ) -> Result<(SpinResolution, Option<u64>), SpinError> {
        match self {
            DrawSource::Entropy(rng) => Ok((session.spin(params, rng)?, None)),
            DrawSource::Seeded {
                server_seed,
                client_seed,
                next_nonce,
            } => {
                let nonce = *next_nonce;
                let mut rng = ProvablyFairRng::new(server_seed.as_str(), client_seed.as_str(), nonce);
                let resolution = session.spin(params, &mut rng)?;
                *next_nonce += 1;
                Ok((resolution, Some(nonce)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MachineEvent {
    /// Throwaway reels shown while spinning.
    Frame([String; 3]),
    Landed([String; 3]),
    Resolved { entry: SpinLogEntry, message: String },
    Busted,
}

/// An event stamped with the session generation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineMessage {
    pub generation: u64,
    pub event: MachineEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinStatus {
    Started,
    /// A spin was already in flight; nothing happened.
    Busy,
}

struct Inner {
    session: SessionState,
    source: DrawSource,
    // bumped by reset so a task cancelled mid-flight can tell its session is gone
    generation: u64,
}

pub struct SpinController {
    params: Arc<EngineParams>,
    inner: Arc<Mutex<Inner>>,
    animation: AnimationConfig,
    events: mpsc::UnboundedSender<MachineMessage>,
    in_flight: Option<JoinHandle<()>>,
    // mirrors Inner::generation for filtering messages without the lock
    generation: u64,
}

impl SpinController {
    pub fn new(
        params: EngineParams,
        source: DrawSource,
        animation: AnimationConfig,
        events: mpsc::UnboundedSender<MachineMessage>,
    ) -> Self {
        Self {
            params: Arc::new(params),
            inner: Arc::new(Mutex::new(Inner {
                session: SessionState::new(),
                source,
                generation: 0,
            })),
            animation,
            events,
            in_flight: None,
            generation: 0,
        }
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Unwrap a message, dropping it if it was sent before the last reset.
    pub fn accept(&self, message: MachineMessage) -> Option<MachineEvent> {
        if message.generation == self.generation {
            Some(message.event)
        } else {
            debug!(generation = message.generation, "dropping stale machine event");
            None
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Change the bet. Ignored while the reels are turning.
    pub async fn set_bet(&self, bet: i64) -> bool {
        if self.is_spinning() {
            debug!(bet, "bet change ignored while spinning");
            return false;
        }
        self.inner.lock().await.session.set_bet(bet);
        true
    }

    pub async fn request_spin(&mut self) -> Result<SpinStatus, SpinError> {
        if self.is_spinning() {
            debug!("spin already in flight");
            return Ok(SpinStatus::Busy);
        }
        let generation = {
            let inner = self.inner.lock().await;
            inner.session.validate_bet()?;
            inner.generation
        };
        let task = SpinTask {
            params: Arc::clone(&self.params),
            inner: Arc::clone(&self.inner),
            animation: self.animation,
            events: self.events.clone(),
            generation,
        };
        self.in_flight = Some(tokio::spawn(task.run()));
        Ok(SpinStatus::Started)
    }

    /// Cancel any spin in flight and start the session over.
    pub async fn reset(&mut self) {
        self.cancel();
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        self.generation = inner.generation;
        inner.session.reset();
    }

    pub async fn view(&self) -> SessionView {
        let inner = self.inner.lock().await;
        session_view(&inner.session, &self.params, self.is_spinning())
    }

    pub async fn session(&self) -> SessionState {
        self.inner.lock().await.session.clone()
    }

    pub async fn server_seed_hash(&self) -> Option<String> {
        self.inner.lock().await.source.server_seed_hash()
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                info!("cancelling spin in flight");
            }
            handle.abort();
        }
    }
}

impl Drop for SpinController {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct SpinTask {
    params: Arc<EngineParams>,
    inner: Arc<Mutex<Inner>>,
    animation: AnimationConfig,
    events: mpsc::UnboundedSender<MachineMessage>,
    generation: u64,
}

impl SpinTask {
    fn send(&self, event: MachineEvent) -> bool {
        let message = MachineMessage {
            generation: self.generation,
            event,
        };
        self.events.send(message).is_ok()
    }

    async fn run(self) {
        let mut cosmetic = StdRng::from_entropy();
        let mut ticker = tokio::time::interval(self.animation.interval);
        ticker.tick().await;
        for _ in 0..self.animation.frames() {
            ticker.tick().await;
            let reels = draw_reels(&self.params.table, &mut cosmetic);
            if !self.send(MachineEvent::Frame(reel_ids(&reels))) {
                // nobody is watching any more
                return;
            }
        }

        let (resolution, nonce, message, busted) = {
            let mut inner = self.inner.lock().await;
            if inner.generation != self.generation {
                debug!("session reset during spin");
                return;
            }
            let Inner {
                session, source, ..
            } = &mut *inner;
            match source.spin(session, &self.params) {
                Ok((res, nonce)) => {
                    let message = session.result_message().unwrap_or_default();
                    (res, nonce, message, session.is_busted())
                }
                Err(err) => {
                    // the bet was checked at request time and is locked since
                    warn!(%err, "spin rejected at resolution");
                    return;
                }
            }
        };
        info!(
            play = resolution.new_play_count,
            winnings = resolution.winnings,
            balance = resolution.new_balance,
            ?nonce,
            "spin landed"
        );
        self.send(MachineEvent::Landed(reel_ids(&resolution.reels)));
        tokio::time::sleep(self.animation.settle).await;

        let entry = SpinLogEntry {
            play: resolution.new_play_count,
            ts: Utc::now(),
            reels: reel_ids(&resolution.reels),
            bet: resolution.bet,
            winnings: resolution.winnings,
            balance: resolution.new_balance,
            jackpot_probability: resolution.probability_sample,
            nonce,
        };
        self.send(MachineEvent::Resolved { entry, message });
        if busted {
            self.send(MachineEvent::Busted);
        }
    }
}

pub fn reel_ids(reels: &Reels) -> [String; 3] {
    std::array::from_fn(|i| reels[i].id.clone())
}
