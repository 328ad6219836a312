//! Scripted adapters for driving the orchestrator without a network.

use snmp_scan::scan::{Adapter, Credential, Device, OidSet, Outcome, Values};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What a scripted device does when polled.
#[derive(Debug, Clone)]
pub enum Script {
    /// Answer with these OID/value pairs after `delay`.
    Answer {
        delay: Duration,
        values: Vec<(String, String)>,
    },
    /// Fail with `message` after `delay`.
    Fail { delay: Duration, message: String },
    /// Panic inside the poll task.
    Panic,
}

impl Script {
    /// Immediate answer.
    pub fn answer(values: &[(&str, &str)]) -> Self {
        Self::answer_after(Duration::ZERO, values)
    }

    /// Answer after `delay`.
    pub fn answer_after(delay: Duration, values: &[(&str, &str)]) -> Self {
        Script::Answer {
            delay,
            values: values
                .iter()
                .map(|(oid, value)| (oid.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Immediate failure.
    pub fn fail(message: &str) -> Self {
        Self::fail_after(Duration::ZERO, message)
    }

    /// Failure after `delay`.
    pub fn fail_after(delay: Duration, message: &str) -> Self {
        Script::Fail {
            delay,
            message: message.to_string(),
        }
    }
}

/// Adapter whose behaviour per device address is scripted up front.
///
/// Unscripted devices fail with `"unscripted device"`. Tracks call counts
/// and the peak number of polls in flight.
#[derive(Default)]
pub struct ScriptedAdapter {
    scripts: HashMap<String, Script>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the device whose address is `address`.
    pub fn script(mut self, address: &str, script: Script) -> Self {
        self.scripts.insert(address.to_string(), script);
        self
    }

    /// How many times `address` was polled.
    pub fn calls(&self, address: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    /// Total polls across all devices.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Highest number of polls observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Adapter for ScriptedAdapter {
    async fn poll(&self, device: &Device, _: &Credential, _: &OidSet) -> Outcome {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(device.address().to_string())
            .or_default() += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let outcome = match self.scripts.get(device.address()) {
            None => Outcome::failure("unscripted device"),
            Some(Script::Panic) => {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                panic!("scripted panic for {}", device.address());
            }
            Some(Script::Answer { delay, values }) => {
                tokio::time::sleep(*delay).await;
                Outcome::Success {
                    values: values.iter().cloned().collect::<Values>(),
                }
            }
            Some(Script::Fail { delay, message }) => {
                tokio::time::sleep(*delay).await;
                Outcome::failure(message.clone())
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}
