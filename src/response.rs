//! Response validation.
//!
//! The service answers 200 even when it logically refuses a request; the
//! refusal rides in a `[{"result": false, "cause": ...}]` envelope glued to
//! the front of the payload. Mutating endpoints answer with a flat
//! `{"msg": ..., "data": ...}` pair instead.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::ClientError;

#[derive(Debug, Default, Deserialize)]
struct ResultFlag {
    #[serde(default)]
    result: Option<bool>,
    #[serde(default, deserialize_with = "empty_as_none")]
    cause: Option<String>,
}

/// Deserializes `body` into `T` after checking the result envelope.
///
/// A well-formed body whose envelope says `result: false` fails with
/// [`ClientError::RemoteRejected`]; a body that does not deserialize into
/// `T` fails with [`ClientError::MalformedResponse`]. Records without a
/// `result` field pass through untouched.
pub(crate) fn parse_validated<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    if let Ok(flags) = serde_json::from_str::<Vec<ResultFlag>>(body) {
        if let Some(flag) = flags.first() {
            if flag.result == Some(false) {
                return Err(ClientError::RemoteRejected {
                    cause: flag
                        .cause
                        .clone()
                        .unwrap_or_else(|| "no cause given".to_string()),
                });
            }
        }
    }
    Ok(serde_json::from_str(body)?)
}

/// The `{msg, data}` pair returned by the handshake and comment-write
/// endpoints. An empty `data` string means "absent", never a legitimate
/// empty value, so it deserializes straight to `None`.
#[derive(Debug, Deserialize)]
pub(crate) struct KeyEnvelope {
    #[serde(default, alias = "Msg")]
    #[allow(dead_code)]
    pub msg: Option<String>,
    #[serde(default, alias = "Data", deserialize_with = "empty_as_none")]
    pub data: Option<String>,
}

impl KeyEnvelope {
    pub(crate) fn parse(body: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(body)?)
    }
}

fn empty_as_none<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let s = Option::<String>::deserialize(de)?;
    Ok(s.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        name: String,
    }

    #[test]
    fn rejected_envelope_surfaces_cause() {
        let body = r#"[{"result": false, "cause": "use after 10 minutes"}]"#;
        let err = parse_validated::<Vec<Item>>(body).unwrap_err();
        match err {
            ClientError::RemoteRejected { cause } => assert_eq!(cause, "use after 10 minutes"),
            other => panic!("expected RemoteRejected, got {other:?}"),
        }
    }

    #[test]
    fn rejected_without_cause_still_rejects() {
        let err = parse_validated::<Vec<Item>>(r#"[{"result": false}]"#).unwrap_err();
        assert!(matches!(err, ClientError::RemoteRejected { .. }));
    }

    #[test]
    fn plain_records_pass_through() {
        let items: Vec<Item> = parse_validated(r#"[{"name": "a"}, {"name": "b"}]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "a");
    }

    #[test]
    fn garbage_is_malformed() {
        let err = parse_validated::<Vec<Item>>("<html>busy</html>").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn empty_data_reads_as_absent() {
        let env = KeyEnvelope::parse(r#"{"msg": "ok", "data": ""}"#).unwrap();
        assert_eq!(env.data, None);
        let env = KeyEnvelope::parse(r#"{"msg": "ok", "data": "a1b2"}"#).unwrap();
        assert_eq!(env.data.as_deref(), Some("a1b2"));
        let env = KeyEnvelope::parse(r#"{}"#).unwrap();
        assert_eq!(env.data, None);
    }
}
