//! Resolution of a single record from one of several identifying attributes.
//!
//! Data sources accept a handful of mutually exclusive lookup keys (numeric
//! id, uuid, name, email, ...). The numeric id is served by the panel's
//! single-object endpoint; every other key is matched client side against
//! the full listing because the Application API offers no filter for them.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::api::ApiError;

/// Backing operations a record type can be resolved against.
#[async_trait]
pub trait RecordSource: Send + Sync {
    type Record: Send;

    async fn fetch_by_id(&self, id: i32) -> Result<Self::Record, ApiError>;

    /// Complete listing in the panel's order.
    async fn fetch_all(&self) -> Result<Vec<Self::Record>, ApiError>;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("One of {} must be specified", quoted(.fields))]
    MissingAttribute { fields: Vec<&'static str> },

    #[error("no record matched {field} = {value}")]
    NotFound { field: &'static str, value: KeyValue },

    #[error(transparent)]
    Backend(#[from] ApiError),
}

fn quoted(fields: &[&'static str]) -> String {
    fields
        .iter()
        .map(|f| format!("'{}'", f))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Candidate value of an alternate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    Int(i64),
    Str(String),
}

impl KeyValue {
    /// Zero and the empty string count as "not supplied".
    pub fn is_populated(&self) -> bool {
        match self {
            KeyValue::Int(v) => *v != 0,
            KeyValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn matches_str(&self, candidate: &str) -> bool {
        matches!(self, KeyValue::Str(s) if s == candidate)
    }

    pub fn matches_opt_str(&self, candidate: Option<&str>) -> bool {
        candidate.is_some_and(|c| self.matches_str(c))
    }

    pub fn matches_int(&self, candidate: i64) -> bool {
        matches!(self, KeyValue::Int(v) if *v == candidate)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Int(v) => write!(f, "{}", v),
            KeyValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        KeyValue::Str(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::Str(value.to_string())
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        KeyValue::Int(value)
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        KeyValue::Int(value.into())
    }
}

struct LookupKey<R> {
    name: &'static str,
    value: Option<KeyValue>,
    matches: fn(&R, &KeyValue) -> bool,
}

/// Candidate identifying values for one record, in priority order.
///
/// The primary id always comes first. Alternate keys are tried in the order
/// they were added; only the first populated one is used.
pub struct LookupRequest<R> {
    id: Option<i32>,
    keys: Vec<LookupKey<R>>,
}

impl<R> LookupRequest<R> {
    pub fn new(id: Option<i32>) -> Self {
        Self {
            id,
            keys: Vec::new(),
        }
    }

    pub fn key<V: Into<KeyValue>>(
        mut self,
        name: &'static str,
        value: Option<V>,
        matches: fn(&R, &KeyValue) -> bool,
    ) -> Self {
        self.keys.push(LookupKey {
            name,
            value: value.map(Into::into),
            matches,
        });
        self
    }

    /// Every key this request can be resolved by, id first.
    pub fn fields(&self) -> Vec<&'static str> {
        std::iter::once("id")
            .chain(self.keys.iter().map(|k| k.name))
            .collect()
    }

    fn populated_id(&self) -> Option<i32> {
        self.id.filter(|id| *id != 0)
    }

    fn populated_key(&self) -> Option<(&LookupKey<R>, &KeyValue)> {
        self.keys.iter().find_map(|key| match &key.value {
            Some(value) if value.is_populated() => Some((key, value)),
            _ => None,
        })
    }
}

/// Resolve exactly one record.
///
/// Issues at most one round trip: `fetch_by_id` when the id is set,
/// otherwise one `fetch_all` scanned in listing order. The first match
/// wins, so duplicate names resolve to whichever the panel lists first.
pub async fn resolve<S>(
    source: &S,
    request: &LookupRequest<S::Record>,
) -> Result<S::Record, LookupError>
where
    S: RecordSource + ?Sized,
{
    if let Some(id) = request.populated_id() {
        tracing::debug!(id, "Resolving record by id");
        return Ok(source.fetch_by_id(id).await?);
    }

    let (key, value) = request
        .populated_key()
        .ok_or_else(|| LookupError::MissingAttribute {
            fields: request.fields(),
        })?;

    tracing::debug!(field = key.name, %value, "Resolving record from full listing");

    source
        .fetch_all()
        .await?
        .into_iter()
        .find(|record| (key.matches)(record, value))
        .ok_or_else(|| LookupError::NotFound {
            field: key.name,
            value: value.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Machine {
        id: i32,
        uuid: String,
        name: String,
        slot: i64,
    }

    fn machine(id: i32, uuid: &str, name: &str) -> Machine {
        Machine {
            id,
            uuid: uuid.to_string(),
            name: name.to_string(),
            slot: i64::from(id) * 10,
        }
    }

    #[derive(Default)]
    struct FakeSource {
        records: Vec<Machine>,
        by_id_calls: AtomicUsize,
        all_calls: AtomicUsize,
        fail: bool,
    }

    impl FakeSource {
        fn with(records: Vec<Machine>) -> Self {
            Self {
                records,
                ..Default::default()
            }
        }

        fn calls(&self) -> (usize, usize) {
            (
                self.by_id_calls.load(Ordering::SeqCst),
                self.all_calls.load(Ordering::SeqCst),
            )
        }
    }

    fn backend_error(message: &str) -> ApiError {
        ApiError::Api {
            status: 500,
            message: message.to_string(),
            details: None,
        }
    }

    #[async_trait]
    impl RecordSource for FakeSource {
        type Record = Machine;

        async fn fetch_by_id(&self, id: i32) -> Result<Machine, ApiError> {
            self.by_id_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(backend_error("panel unreachable"));
            }
            self.records
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .ok_or_else(|| ApiError::Api {
                    status: 404,
                    message: "The requested resource could not be found on the server.".into(),
                    details: None,
                })
        }

        async fn fetch_all(&self) -> Result<Vec<Machine>, ApiError> {
            self.all_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(backend_error("panel unreachable"));
            }
            Ok(self.records.clone())
        }
    }

    fn request(
        id: Option<i32>,
        uuid: Option<&str>,
        name: Option<&str>,
    ) -> LookupRequest<Machine> {
        LookupRequest::new(id)
            .key("uuid", uuid, |m: &Machine, v: &KeyValue| v.matches_str(&m.uuid))
            .key("name", name, |m: &Machine, v: &KeyValue| v.matches_str(&m.name))
    }

    fn fleet() -> Vec<Machine> {
        vec![
            machine(1, "aaaa", "prod-1"),
            machine(2, "bbbb", "prod-2"),
            machine(3, "cccc", "prod-1"),
        ]
    }

    #[tokio::test]
    async fn resolves_by_id_with_single_fetch() {
        let source = FakeSource::with(fleet());

        let found = resolve(&source, &request(Some(2), None, None)).await.unwrap();

        assert_eq!(found.name, "prod-2");
        assert_eq!(source.calls(), (1, 0));
    }

    #[tokio::test]
    async fn resolves_each_alternate_key() {
        let source = FakeSource::with(fleet());

        let by_uuid = resolve(&source, &request(None, Some("bbbb"), None))
            .await
            .unwrap();
        assert_eq!(by_uuid.id, 2);

        let by_name = resolve(&source, &request(None, None, Some("prod-2")))
            .await
            .unwrap();
        assert_eq!(by_name.id, 2);

        assert_eq!(source.calls(), (0, 2));
    }

    #[tokio::test]
    async fn id_takes_priority_over_name() {
        let source = FakeSource::with(fleet());

        let found = resolve(&source, &request(Some(2), None, Some("prod-1")))
            .await
            .unwrap();

        assert_eq!(found.id, 2);
        assert_eq!(source.calls(), (1, 0));
    }

    #[tokio::test]
    async fn earlier_alternate_wins_over_later_one() {
        let source = FakeSource::with(fleet());

        let found = resolve(&source, &request(None, Some("cccc"), Some("prod-2")))
            .await
            .unwrap();

        assert_eq!(found.id, 3);
    }

    #[tokio::test]
    async fn duplicate_names_resolve_to_first_listed() {
        let source = FakeSource::with(fleet());

        let found = resolve(&source, &request(None, None, Some("prod-1")))
            .await
            .unwrap();

        assert_eq!(found.id, 1);
    }

    #[tokio::test]
    async fn missing_attribute_makes_no_backend_call() {
        let source = FakeSource::with(fleet());

        let err = resolve(&source, &request(None, None, None))
            .await
            .unwrap_err();

        match err {
            LookupError::MissingAttribute { fields } => {
                assert_eq!(fields, vec!["id", "uuid", "name"]);
            }
            other => panic!("Expected MissingAttribute, got {:?}", other),
        }
        assert_eq!(source.calls(), (0, 0));
    }

    #[tokio::test]
    async fn zero_and_empty_values_count_as_absent() {
        let source = FakeSource::with(fleet());

        let err = resolve(&source, &request(Some(0), Some(""), None))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::MissingAttribute { .. }));
        assert_eq!(
            err.to_string(),
            "One of 'id', 'uuid', 'name' must be specified"
        );
        assert_eq!(source.calls(), (0, 0));
    }

    #[tokio::test]
    async fn unmatched_key_reports_not_found() {
        let source = FakeSource::with(fleet());

        let err = resolve(&source, &request(None, None, Some("staging")))
            .await
            .unwrap_err();

        match err {
            LookupError::NotFound { field, value } => {
                assert_eq!(field, "name");
                assert_eq!(value, KeyValue::from("staging"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn matching_is_case_sensitive() {
        let source = FakeSource::with(fleet());

        let err = resolve(&source, &request(None, None, Some("PROD-1")))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::NotFound { .. }));
    }

    #[tokio::test]
    async fn numeric_alternate_keys_compare_exactly() {
        let source = FakeSource::with(fleet());
        let request = LookupRequest::new(None).key(
            "slot",
            Some(30_i64),
            |m: &Machine, v: &KeyValue| v.matches_int(m.slot),
        );

        let found = resolve(&source, &request).await.unwrap();
        assert_eq!(found.id, 3);
    }

    #[tokio::test]
    async fn backend_failures_pass_through_verbatim() {
        let source = FakeSource {
            records: fleet(),
            fail: true,
            ..Default::default()
        };

        let by_id = resolve(&source, &request(Some(1), None, None))
            .await
            .unwrap_err();
        assert!(matches!(by_id, LookupError::Backend(_)));
        assert_eq!(
            by_id.to_string(),
            "API returned error (HTTP 500): panel unreachable"
        );

        let by_name = resolve(&source, &request(None, None, Some("prod-1")))
            .await
            .unwrap_err();
        assert!(matches!(by_name, LookupError::Backend(_)));
    }

    #[tokio::test]
    async fn fetch_by_id_not_found_is_a_backend_error() {
        let source = FakeSource::with(fleet());

        let err = resolve(&source, &request(Some(42), None, None))
            .await
            .unwrap_err();

        match err {
            LookupError::Backend(api) => assert!(api.is_not_found()),
            other => panic!("Expected Backend, got {:?}", other),
        }
    }
}
