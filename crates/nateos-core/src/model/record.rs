// ── Records and per-domain state ──
//
// A record is the loosely-typed field set of one entry. Decoding applies
// stored defaults and keeps any extra fields the remote returns.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FailureCause, RemoteFailure};
use crate::model::domain::{DomainDescriptor, Shape};
use crate::model::field::FieldDefault;

/// One configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Fill stored defaults for fields the record lacks (or has as `null`).
    fn with_defaults(mut self, descriptor: &DomainDescriptor) -> Self {
        for field in descriptor.fields {
            if let FieldDefault::Stored(scalar) = field.default {
                let slot = self.0.entry(field.name).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = scalar.to_value();
                }
            }
        }
        self
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Decoded representation of one domain, shaped like its descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DomainState {
    Keyed(BTreeMap<String, Record>),
    List(Vec<Record>),
    Single(Record),
}

impl DomainState {
    /// State shown for a domain that has never loaded.
    pub fn empty(descriptor: &DomainDescriptor) -> Self {
        match descriptor.shape {
            Shape::MapByKey => Self::Keyed(BTreeMap::new()),
            Shape::OrderedList => Self::List(Vec::new()),
            Shape::Singleton => Self::Single(Record::new().with_defaults(descriptor)),
        }
    }

    /// Decode a remote document according to the descriptor's shape.
    pub fn decode(descriptor: &DomainDescriptor, document: Value) -> Result<Self, RemoteFailure> {
        let state = match (descriptor.shape, document) {
            (Shape::MapByKey, Value::Object(entries)) => Self::Keyed(
                entries
                    .into_iter()
                    .map(|(key, value)| {
                        let record = decode_record(descriptor, value, &key)?;
                        Ok((key, record))
                    })
                    .collect::<Result<_, RemoteFailure>>()?,
            ),
            (Shape::OrderedList, Value::Array(entries)) => Self::List(
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, value)| decode_record(descriptor, value, &index.to_string()))
                    .collect::<Result<_, RemoteFailure>>()?,
            ),
            (Shape::Singleton, value @ Value::Object(_)) => {
                Self::Single(decode_record(descriptor, value, descriptor.resource_path)?)
            }
            (shape, other) => {
                return Err(decode_failure(format!(
                    "{}: expected {} document, got {}",
                    descriptor.id,
                    expected_json(shape),
                    json_type(&other)
                )));
            }
        };
        Ok(state)
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Keyed(map) => map.len(),
            Self::List(list) => list.len(),
            Self::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up an entry by map key or list position.
    pub fn get(&self, key: &str) -> Option<&Record> {
        match self {
            Self::Keyed(map) => map.get(key),
            Self::List(list) => key.parse::<usize>().ok().and_then(|i| list.get(i)),
            Self::Single(_) => None,
        }
    }

    pub fn single(&self) -> Option<&Record> {
        match self {
            Self::Single(record) => Some(record),
            _ => None,
        }
    }

    /// Entries in display order: natural key order for maps, position for
    /// lists, one keyless row for singletons.
    pub fn rows(&self) -> Vec<(String, &Record)> {
        match self {
            Self::Keyed(map) => {
                let mut rows: Vec<_> = map.iter().map(|(k, r)| (k.clone(), r)).collect();
                rows.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
                rows
            }
            Self::List(list) => list
                .iter()
                .enumerate()
                .map(|(i, r)| (i.to_string(), r))
                .collect(),
            Self::Single(record) => vec![(String::new(), record)],
        }
    }
}

/// Numeric keys (VLAN ids) sort numerically, everything else lexically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn decode_record(
    descriptor: &DomainDescriptor,
    value: Value,
    at: &str,
) -> Result<Record, RemoteFailure> {
    match value {
        Value::Object(map) => Ok(Record(map).with_defaults(descriptor)),
        other => Err(decode_failure(format!(
            "{} entry {at}: expected object, got {}",
            descriptor.id,
            json_type(&other)
        ))),
    }
}

fn decode_failure(message: String) -> RemoteFailure {
    RemoteFailure {
        cause: FailureCause::Decode,
        message,
    }
}

fn expected_json(shape: Shape) -> &'static str {
    match shape {
        Shape::MapByKey | Shape::Singleton => "object",
        Shape::OrderedList => "array",
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
