use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

/// Record is a named set of typed attributes stored under one URN.
///
/// Each attribute lives at the physical key `<urn>:<attribute>` as JSON.
/// `set` only buffers; nothing reaches the store until `flush`, which writes
/// all buffered attributes in a single `batch_set`. Reads see buffered
/// writes first. Dropping a record with unflushed writes discards them.
///
/// A record does no locking of its own: two handles on the same URN that
/// flush the same attribute race, and the later flush wins.
pub struct Record {
    kv: Arc<dyn KVStore>,
    urn: String,
    buffered: BTreeMap<String, Vec<u8>>,
}

impl Record {
    pub fn open(kv: Arc<dyn KVStore>, urn: impl Into<String>) -> Self {
        Self {
            kv,
            urn: urn.into(),
            buffered: BTreeMap::new(),
        }
    }

    pub fn urn(&self) -> &str {
        &self.urn
    }

    fn key(&self, attribute: &str) -> String {
        format!("{}:{}", self.urn, attribute)
    }

    /// Read an attribute. Returns None if it has never been set.
    pub fn get<T: DeserializeOwned>(&self, attribute: &str) -> Result<Option<T>, KVError> {
        if let Some(bytes) = self.buffered.get(attribute) {
            return Ok(Some(serde_json::from_slice(bytes)?));
        }
        match self.kv.get(&self.key(attribute))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Read an attribute, falling back to `default` when unset.
    pub fn get_or<T: DeserializeOwned>(&self, attribute: &str, default: T) -> Result<T, KVError> {
        Ok(self.get(attribute)?.unwrap_or(default))
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(
        &self,
        attribute: &str,
    ) -> Result<T, KVError> {
        Ok(self.get(attribute)?.unwrap_or_default())
    }

    /// Buffer a new value for an attribute.
    pub fn set<T: Serialize + ?Sized>(&mut self, attribute: &str, value: &T) -> Result<(), KVError> {
        let bytes = serde_json::to_vec(value)?;
        self.buffered.insert(attribute.to_string(), bytes);
        Ok(())
    }

    /// Whether there are buffered writes not yet flushed.
    pub fn is_dirty(&self) -> bool {
        !self.buffered.is_empty()
    }

    /// Commit all buffered writes in one batch.
    ///
    /// The buffer is emptied whether or not the batch succeeds. After a
    /// failed flush, reads fall through to the store again and the failed
    /// writes are never committed by a later flush.
    pub fn flush(&mut self) -> Result<(), KVError> {
        if self.buffered.is_empty() {
            return Ok(());
        }

        let buffered = std::mem::take(&mut self.buffered);
        let keys: Vec<String> = buffered.keys().map(|a| self.key(a)).collect();
        let entries: Vec<(&str, &[u8])> = keys
            .iter()
            .zip(buffered.values())
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        self.kv.batch_set(&entries)?;

        debug!("record {}: flushed {} attributes", self.urn, entries.len());
        Ok(())
    }
}
