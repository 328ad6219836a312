//! Per-device and per-batch scan results.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// OID text to value text, in the order the agent returned them.
///
/// Inserting an OID that is already present replaces its value in place,
/// so an agent that repeats a varbind yields one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values {
    entries: Vec<(String, String)>,
}

impl Values {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `oid`.
    pub fn insert(&mut self, oid: impl Into<String>, value: impl Into<String>) {
        let oid = oid.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == oid) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((oid, value)),
        }
    }

    /// Value for `oid`, if present.
    pub fn get(&self, oid: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == oid)
            .map(|(_, value)| value.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (oid, value) in iter {
            values.insert(oid, value);
        }
        values
    }
}

impl Serialize for Values {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (oid, value) in &self.entries {
            map.serialize_entry(oid, value)?;
        }
        map.end()
    }
}

/// The record written for one device.
///
/// Either carries values or an error, never both: the only constructors are
/// [`success`](Self::success) and [`failure`](Self::failure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollResult {
    #[serde(rename = "IP")]
    device: String,
    #[serde(rename = "OIDs")]
    values: Values,
    #[serde(rename = "Error", skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl PollResult {
    /// A device that answered without an error status.
    pub fn success(device: impl Into<String>, values: Values) -> Self {
        Self {
            device: device.into(),
            values,
            error: None,
        }
    }

    /// A device that could not be polled.
    pub fn failure(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            values: Values::new(),
            error: Some(message.into()),
        }
    }

    /// The device address as given in the input.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Values read from the device; empty on failure.
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// The failure description, if the poll failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the poll failed.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Results of one batch, index-aligned with the device list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BatchResult {
    results: Vec<PollResult>,
}

impl BatchResult {
    pub(crate) fn new(results: Vec<PollResult>) -> Self {
        Self { results }
    }

    /// Results in device order.
    pub fn as_slice(&self) -> &[PollResult] {
        &self.results
    }

    /// Iterate results in device order.
    pub fn iter(&self) -> std::slice::Iter<'_, PollResult> {
        self.results.iter()
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the batch had no devices.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of devices whose poll failed.
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Take the results.
    pub fn into_vec(self) -> Vec<PollResult> {
        self.results
    }
}

impl FromIterator<PollResult> for BatchResult {
    fn from_iter<I: IntoIterator<Item = PollResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a PollResult;
    type IntoIter = std::slice::Iter<'a, PollResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
