//! Validator response payload
//!
//! The `errors` list is loosely typed: each entry maps a severity to either a
//! single message or a list of messages. It is flattened into
//! `(severity, message)` pairs right after deserialization.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// Result value reported for a valid Jenkinsfile
pub const SUCCESS: &str = "success";

#[derive(Debug, Default, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    data: Option<ValidationData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidationData {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<ErrorEntry>>,
}

/// One or several messages reported under a severity
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Messages {
    One(String),
    Many(Vec<String>),
}

impl Messages {
    fn into_vec(self) -> Vec<String> {
        match self {
            Messages::One(message) => vec![message],
            Messages::Many(messages) => messages,
        }
    }
}

/// Severity → messages entry, in payload key order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorEntry(pub Vec<(String, Messages)>);

impl<'de> Deserialize<'de> for ErrorEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = ErrorEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping severities to messages")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut pairs = Vec::new();
                while let Some((severity, messages)) = map.next_entry::<String, Messages>()? {
                    pairs.push((severity, messages));
                }
                Ok(ErrorEntry(pairs))
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

impl ValidationResponse {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// `data`, with a missing or null value read as an empty object
    pub fn data(&self) -> ValidationDataRef<'_> {
        ValidationDataRef(self.data.as_ref())
    }

    /// Flatten all errors into `(severity, message)` pairs in payload order
    pub fn into_messages(self) -> Vec<(String, String)> {
        self.data
            .and_then(|data| data.errors)
            .unwrap_or_default()
            .into_iter()
            .flat_map(|entry| entry.0)
            .flat_map(|(severity, messages)| {
                messages
                    .into_vec()
                    .into_iter()
                    .map(move |message| (severity.clone(), message))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ValidationDataRef<'a>(Option<&'a ValidationData>);

impl<'a> ValidationDataRef<'a> {
    pub fn result(&self) -> Option<&'a str> {
        self.0.and_then(|data| data.result.as_deref())
    }
}
