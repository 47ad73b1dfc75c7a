//! Scripted upstream used by the sync and handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::player_api::{FetchError, PlayerSource};
use crate::models::player::PlayerStats;

#[derive(Debug, Clone)]
pub enum Scripted {
    Found { name: String, level: i32 },
    NotFound,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start(String),
    End(String),
}

pub struct ScriptedSource {
    script: Mutex<HashMap<String, Scripted>>,
    fallback: Scripted,
    delay: Duration,
    gate: Option<Arc<Semaphore>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    events: Mutex<Vec<Event>>,
}

impl ScriptedSource {
    /// Unscripted uids answer with `fallback`.
    pub fn new(fallback: Scripted) -> Self {
        Self {
            script: Mutex::new(HashMap::new()),
            fallback,
            delay: Duration::ZERO,
            gate: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every fetch waits for a permit on `gate` before answering.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn found(self, uid: &str, name: &str, level: i32) -> Self {
        self.set(uid, Scripted::Found { name: name.to_string(), level });
        self
    }

    pub fn set(&self, uid: &str, outcome: Scripted) {
        self.script.lock().unwrap().insert(uid.to_string(), outcome);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.events().iter().filter(|e| matches!(e, Event::Start(_))).count()
    }
}

pub fn stats(uid: &str, name: &str, level: i32) -> PlayerStats {
    PlayerStats {
        uid: uid.to_string(),
        name: name.to_string(),
        level,
        exp: level as i64 * 1000,
        region: "SG".to_string(),
        likes: 10,
        last_update: "2024-06-01 12:00:00".to_string(),
    }
}

#[async_trait]
impl PlayerSource for ScriptedSource {
    async fn fetch_player(&self, uid: &str) -> Result<Option<PlayerStats>, FetchError> {
        self.events.lock().unwrap().push(Event::Start(uid.to_string()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.map_err(|e| FetchError::Malformed(e.to_string()))?;
        }

        let outcome = self
            .script
            .lock()
            .unwrap()
            .get(uid)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone());

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(Event::End(uid.to_string()));

        match outcome {
            Scripted::Found { name, level } => Ok(Some(stats(uid, &name, level))),
            Scripted::NotFound => Ok(None),
            Scripted::Fail => Err(FetchError::Status(503)),
        }
    }
}
