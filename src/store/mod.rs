//! Parameter Store - ordered, typed key/value table
//!
//! Keys are kept in insertion order; re-setting a key moves it to the end.
//! Reading `NAME_ERR` (suffix matched case-insensitively) returns the
//! uncertainty paired with `NAME`.
//!
//! # Example
//!
//! ```rust
//! use pulsar_params::{ParameterStore, ParameterValue};
//!
//! # fn main() -> pulsar_params::Result<()> {
//! let mut store = ParameterStore::new();
//! store.set("PSRJ", "J0534+2200");
//! store.set_with_error("F0", 29.946, 1.2e-10)?;
//!
//! assert_eq!(store.get("F0")?, Some(ParameterValue::Float64(29.946)));
//! assert_eq!(store.get("F0_ERR")?, Some(ParameterValue::Float64(1.2e-10)));
//! assert_eq!(store.get("NOPE")?, None);
//! # Ok(())
//! # }
//! ```

mod entry;

pub use entry::ParameterEntry;

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::par::{self, ParFileParser, TempoParser};
use crate::{Error, ParameterKind, ParameterValue, Result};

/// Key suffix selecting the uncertainty of a parameter.
pub const ERROR_SUFFIX: &str = "_ERR";

/// Split `NAME_ERR` into (`NAME`, true); any other key into (key, false).
fn split_error_suffix(key: &str) -> (&str, bool) {
    let cut = key.len().saturating_sub(ERROR_SUFFIX.len());
    if key.len() >= ERROR_SUFFIX.len()
        && key.is_char_boundary(cut)
        && key[cut..].eq_ignore_ascii_case(ERROR_SUFFIX)
    {
        (&key[..cut], true)
    } else {
        (key, false)
    }
}

/// Typed parameter store.
///
/// ## Design
///
/// `order` holds the names in insertion order and `table` maps each name to
/// its entry. Both always hold the same set of names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    order: Vec<String>,
    table: HashMap<String, ParameterEntry>,
}

impl ParameterStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store by reading a TEMPO-style parameter file.
    ///
    /// # Errors
    ///
    /// Returns an IO-kind error if `path` is not a file or cannot be parsed.
    pub fn from_par_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ParFile {
                path: path.to_path_buf(),
                reason: "input does not point to a file".to_string(),
            });
        }

        let mut store = Self::new();
        store.load(path)?;
        Ok(store)
    }

    /// Get the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check if a parameter exists (no `_ERR` handling).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Get the kind of a parameter.
    #[must_use]
    pub fn kind(&self, key: &str) -> Option<ParameterKind> {
        self.table.get(key).map(ParameterEntry::kind)
    }

    /// Borrow the full entry for a parameter.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&ParameterEntry> {
        self.table.get(key)
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterEntry> + '_ {
        self.order.iter().filter_map(|name| self.table.get(name))
    }

    /// Get a value by key.
    ///
    /// A key ending in `_ERR` (any case) returns the uncertainty of the base
    /// parameter instead of its main value. Returns `None` if the base
    /// parameter doesn't exist.
    ///
    /// # Errors
    ///
    /// - `NotFound` if an uncertainty is requested but none was stored
    /// - `UnsupportedOperation` if an uncertainty is requested for a `Text`
    ///   or `UInt32` parameter
    /// - `Internal` if the entry is inconsistent
    pub fn get(&self, key: &str) -> Result<Option<ParameterValue>> {
        let (base, want_error) = split_error_suffix(key);
        let Some(entry) = self.table.get(base) else {
            return Ok(None);
        };

        let value = if want_error {
            entry.checked_error()?
        } else {
            entry.checked_main()?
        };
        Ok(Some(value.clone()))
    }

    /// Get the uncertainty of a parameter.
    ///
    /// Equivalent to `get` with `_ERR` appended to `key`.
    ///
    /// # Errors
    ///
    /// See [`ParameterStore::get`].
    pub fn get_error(&self, key: &str) -> Result<Option<ParameterValue>> {
        match self.table.get(key) {
            Some(entry) => Ok(Some(entry.checked_error()?.clone())),
            None => Ok(None),
        }
    }

    /// Set a value for a key.
    ///
    /// An existing parameter of the same name is removed first, so the key
    /// moves to the end of the order. The uncertainty slot is left empty.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParameterValue>) {
        self.insert_entry(ParameterEntry::new(key, value));
    }

    /// Set a value whose kind is only known at runtime.
    ///
    /// # Errors
    ///
    /// Returns `TypeError` if the value has no matching kind; the store is
    /// left unchanged.
    pub fn set_dynamic(&mut self, key: impl Into<String>, value: &serde_json::Value) -> Result<()> {
        let value = ParameterValue::from_json(value)?;
        self.set(key, value);
        Ok(())
    }

    /// Set a value together with its uncertainty.
    ///
    /// # Errors
    ///
    /// See [`ParameterEntry::with_error`]; the store is left unchanged.
    pub fn set_with_error(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParameterValue>,
        error: impl Into<ParameterValue>,
    ) -> Result<()> {
        let entry = ParameterEntry::with_error(key, value, error)?;
        self.insert_entry(entry);
        Ok(())
    }

    /// Insert a complete entry, replacing any parameter of the same name.
    pub fn insert_entry(&mut self, entry: ParameterEntry) {
        let name = entry.name().to_string();
        if self.table.remove(&name).is_some() {
            self.order.retain(|k| k != &name);
            debug!(key = %name, "replacing parameter");
        }
        self.order.push(name.clone());
        self.table.insert(name, entry);
    }

    /// Remove a parameter, returning its entry.
    pub fn remove(&mut self, key: &str) -> Option<ParameterEntry> {
        let entry = self.table.remove(key)?;
        self.order.retain(|k| k != key);
        Some(entry)
    }

    /// Clear all parameters.
    pub fn clear(&mut self) {
        self.order.clear();
        self.table.clear();
    }

    /// Get the parameter names in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Get the main value of every parameter, in key order.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the key order and the table disagree
    /// - `Internal` if an entry is inconsistent
    pub fn values(&self) -> Result<Vec<ParameterValue>> {
        self.order
            .iter()
            .map(|key| {
                let entry = self
                    .table
                    .get(key)
                    .ok_or_else(|| Error::NotFound(format!("could not find '{key}' in store")))?;
                entry.checked_main().cloned()
            })
            .collect()
    }

    /// Get (name, main value) pairs in key order.
    ///
    /// # Errors
    ///
    /// See [`ParameterStore::values`].
    pub fn items(&self) -> Result<Vec<(String, ParameterValue)>> {
        let keys = self.keys();
        let values = self.values()?;
        Ok(keys.into_iter().zip(values).collect())
    }

    /// Get the main values as a map (uncertainties are not included).
    ///
    /// # Errors
    ///
    /// See [`ParameterStore::values`].
    pub fn as_map(&self) -> Result<HashMap<String, ParameterValue>> {
        Ok(self.items()?.into_iter().collect())
    }

    /// Export the main values as a JSON object.
    ///
    /// # Errors
    ///
    /// See [`ParameterStore::values`].
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let object = self
            .items()?
            .into_iter()
            .map(|(key, value)| (key, value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        Ok(serde_json::Value::Object(object))
    }

    /// Replace the contents with a TEMPO-style parameter file.
    ///
    /// # Errors
    ///
    /// See [`ParameterStore::load_with`].
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.load_with(&TempoParser::default(), path)
    }

    /// Replace the contents with the result of `parser`.
    ///
    /// The current contents are discarded only once parsing has succeeded.
    ///
    /// # Errors
    ///
    /// Returns `ParFile` if the parser fails or finds no parameters.
    pub fn load_with<T, P>(&mut self, parser: &T, path: P) -> Result<()>
    where
        T: ParFileParser + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let parsed = parser.parse_file(path).map_err(|e| match e {
            Error::ParFile { .. } => e,
            other => Error::ParFile {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;

        if parsed.is_empty() {
            return Err(Error::ParFile {
                path: path.to_path_buf(),
                reason: "no parameters found".to_string(),
            });
        }

        info!(path = %path.display(), parameters = parsed.len(), "loaded parameter file");
        *self = parsed;
        Ok(())
    }

    /// Render the store as TEMPO-style parameter file text.
    #[must_use]
    pub fn to_par_string(&self) -> String {
        par::writer::render(self)
    }

    /// Write the store to a TEMPO-style parameter file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn write_par_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_par_string())?;
        info!(path = %path.display(), parameters = self.len(), "wrote parameter file");
        Ok(())
    }
}

impl From<Vec<ParameterEntry>> for ParameterStore {
    fn from(entries: Vec<ParameterEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl FromIterator<ParameterEntry> for ParameterStore {
    fn from_iter<I: IntoIterator<Item = ParameterEntry>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl Extend<ParameterEntry> for ParameterStore {
    fn extend<I: IntoIterator<Item = ParameterEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert_entry(entry);
        }
    }
}

impl TryFrom<&Path> for ParameterStore {
    type Error = Error;

    fn try_from(path: &Path) -> Result<Self> {
        Self::from_par_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_split_error_suffix() {
        assert_eq!(split_error_suffix("F0_ERR"), ("F0", true));
        assert_eq!(split_error_suffix("f0_err"), ("f0", true));
        assert_eq!(split_error_suffix("F0_Err"), ("F0", true));
        assert_eq!(split_error_suffix("F0"), ("F0", false));
        assert_eq!(split_error_suffix("ERR"), ("ERR", false));
        assert_eq!(split_error_suffix("_ERR"), ("", true));
    }

    #[test]
    fn test_split_error_suffix_multibyte() {
        // Four bytes from the end falls inside the 'é'
        assert_eq!(split_error_suffix("é_ER"), ("é_ER", false));
    }

    #[test]
    fn test_store_default() {
        let store = ParameterStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.keys().is_empty());
        assert!(store.values().unwrap().is_empty());
    }

    #[test]
    fn test_set_get_each_kind() {
        let mut store = ParameterStore::new();
        store.set("F0", 1.5);
        store.set("F", vec![1.0, -2.0]);
        store.set("PSRJ", "J0534+2200");
        store.set("EPHVER", 5u32);

        assert_eq!(store.get("F0").unwrap(), Some(ParameterValue::Float64(1.5)));
        assert_eq!(
            store.get("F").unwrap(),
            Some(ParameterValue::Float64Vector(vec![1.0, -2.0]))
        );
        assert_eq!(
            store.get("PSRJ").unwrap(),
            Some(ParameterValue::Text("J0534+2200".into()))
        );
        assert_eq!(store.get("EPHVER").unwrap(), Some(ParameterValue::UInt32(5)));
    }

    #[test]
    fn test_reset_moves_key_to_end() {
        let mut store = ParameterStore::new();
        store.set("A", 1);
        store.set("B", 2);
        store.set("A", 3);

        assert_eq!(store.keys(), vec!["B".to_string(), "A".to_string()]);
        assert_eq!(store.get("A").unwrap(), Some(ParameterValue::UInt32(3)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reset_clears_previous_error() {
        let mut store = ParameterStore::new();
        store.set_with_error("F0", 1.5, 0.1).unwrap();
        store.set("F0", 2.5);

        assert_eq!(store.get("F0_ERR").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut store = ParameterStore::new();
        store.set("f0", 1.0);
        assert_eq!(store.get("F0").unwrap(), None);
        assert!(store.contains("f0"));
    }

    #[test]
    fn test_error_suffix_on_text_and_uint() {
        let mut store = ParameterStore::new();
        store.set("NAME", "str");
        store.set("NITS", 3u32);

        assert_eq!(
            store.get("NAME_ERR").unwrap_err().kind(),
            ErrorKind::UnsupportedOperation
        );
        assert_eq!(
            store.get("NITS_err").unwrap_err().kind(),
            ErrorKind::UnsupportedOperation
        );
    }

    #[test]
    fn test_error_suffix_missing_companion() {
        let mut store = ParameterStore::new();
        store.set("F0", 1.5);
        assert_eq!(store.get("F0_ERR").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_error_suffix_missing_base_is_none() {
        let store = ParameterStore::new();
        assert_eq!(store.get("F0_ERR").unwrap(), None);
        assert_eq!(store.get_error("F0").unwrap(), None);
    }

    #[test]
    fn test_vector_error() {
        let mut store = ParameterStore::new();
        store
            .set_with_error("F", vec![29.9, -3.7e-10], vec![1e-10, 1e-18])
            .unwrap();

        assert_eq!(
            store.get("F_ERR").unwrap(),
            Some(ParameterValue::Float64Vector(vec![1e-10, 1e-18]))
        );
        assert_eq!(store.get_error("F").unwrap(), store.get("F_ERR").unwrap());
    }

    #[test]
    fn test_set_with_error_failure_leaves_store_unchanged() {
        let mut store = ParameterStore::new();
        store.set("F0", 1.0);
        store.set("PSRJ", "J0000+0000");

        assert!(store.set_with_error("F0", 2.0, "bad").is_err());
        assert_eq!(store.keys(), vec!["F0".to_string(), "PSRJ".to_string()]);
        assert_eq!(store.get("F0").unwrap(), Some(ParameterValue::Float64(1.0)));
    }

    #[test]
    fn test_set_dynamic() {
        let mut store = ParameterStore::new();
        store.set_dynamic("X", &json!(-5)).unwrap();
        store.set_dynamic("Y", &json!(7)).unwrap();

        assert_eq!(store.get("X").unwrap(), Some(ParameterValue::Float64(-5.0)));
        assert_eq!(store.get("Y").unwrap(), Some(ParameterValue::UInt32(7)));
    }

    #[test]
    fn test_set_dynamic_rejection_keeps_existing() {
        let mut store = ParameterStore::new();
        store.set("Y", 1.0);

        let err = store.set_dynamic("Y", &json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(store.get("Y").unwrap(), Some(ParameterValue::Float64(1.0)));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = ParameterStore::new();
        store.set("A", 1.0);
        store.set("B", 2.0);

        let removed = store.remove("A").unwrap();
        assert_eq!(removed.name(), "A");
        assert!(store.remove("A").is_none());
        assert_eq!(store.keys(), vec!["B".to_string()]);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_items_match_keys_and_values() {
        let mut store = ParameterStore::new();
        store.set("RAJ", "05:34:31.97");
        store.set("F0", 29.946);
        store.set("NITS", 1u32);

        let items = store.items().unwrap();
        let zipped: Vec<_> = store.keys().into_iter().zip(store.values().unwrap()).collect();
        assert_eq!(items, zipped);
    }

    #[test]
    fn test_as_map_and_json() {
        let mut store = ParameterStore::new();
        store.set("F", vec![1.0, 2.0]);
        store.set("UNITS", "TDB");

        let map = store.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["UNITS"], ParameterValue::Text("TDB".into()));

        assert_eq!(store.to_json().unwrap(), json!({"F": [1.0, 2.0], "UNITS": "TDB"}));
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let mut store = ParameterStore::new();
        store.set("A", 1.0);
        let keys = store.keys();
        store.set("B", 2.0);
        assert_eq!(keys, vec!["A".to_string()]);
    }

    #[test]
    fn test_from_entries_later_duplicate_wins() {
        let store = ParameterStore::from(vec![
            ParameterEntry::new("A", 1.0),
            ParameterEntry::new("B", 2.0),
            ParameterEntry::new("A", 3.0),
        ]);
        assert_eq!(store.keys(), vec!["B".to_string(), "A".to_string()]);
        assert_eq!(store.get("A").unwrap(), Some(ParameterValue::Float64(3.0)));
    }

    #[test]
    fn test_iter_follows_key_order() {
        let mut store = ParameterStore::new();
        store.set("B", 1.0);
        store.set("A", 2.0);
        let names: Vec<_> = store.iter().map(ParameterEntry::name).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_inconsistent_entry_is_internal() {
        let entry: ParameterEntry =
            serde_json::from_str(r#"{"name":"F0","main":{"Float64":1.0},"error":{"UInt32":1}}"#)
                .unwrap();
        let mut store = ParameterStore::new();
        store.insert_entry(entry);

        assert_eq!(store.get("F0").unwrap_err().kind(), ErrorKind::Internal);
        assert_eq!(store.values().unwrap_err().kind(), ErrorKind::Internal);
    }
}
