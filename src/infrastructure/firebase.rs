//! Firebase backend: Identity Toolkit for credentials, Firestore for records.
//!
//! Both services are reached over their REST APIs with a blocking client.
//! Every request carries the configured timeout; nothing is retried.

use crate::domain::{FarmerStore, RecordUpdate, StoreError, StoreResult, UserRecord};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Number, Value, json};
use std::time::Duration;
use tracing::debug;

const IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const COLLECTION: &str = "farmers";
const EMAIL_DOMAIN: &str = "agrismart.com";

/// Record fields stored as Firestore timestamps rather than strings.
const TIMESTAMP_FIELDS: [&str; 3] = ["created_at", "last_login", "updated_at"];

/// Identity Toolkit errors that mean "wrong or unknown credential".
const REJECTED_CREDENTIALS: [&str; 4] = [
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "USER_DISABLED",
];

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub api_key: SecretString,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    #[serde(rename = "localId")]
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    fields: Map<String, Value>,
}

pub struct FirebaseStore {
    client: Client,
    project_id: String,
    api_key: SecretString,
}

impl FirebaseStore {
    pub fn new(config: FirebaseConfig) -> StoreResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            project_id: config.project_id,
            api_key: config.api_key,
        })
    }

    fn document_url(&self, mobile: &str) -> String {
        format!("{}/{mobile}", self.collection_url())
    }

    fn collection_url(&self) -> String {
        format!(
            "{FIRESTORE_URL}/projects/{}/databases/(default)/documents/{COLLECTION}",
            self.project_id
        )
    }

    fn key(&self) -> (&'static str, &str) {
        ("key", self.api_key.expose_secret())
    }

    /// Calls an Identity Toolkit `accounts:*` endpoint and returns the uid.
    fn identity_call(&self, endpoint: &str, mobile: &str, secret: &SecretString) -> StoreResult<String> {
        let url = format!("{IDENTITY_URL}/accounts:{endpoint}");
        let body = json!({
            "email": email_for(mobile),
            "password": secret.expose_secret(),
            "returnSecureToken": true,
        });
        debug!(endpoint, mobile, "identity toolkit request");
        let response = self.client.post(url).query(&[self.key()]).json(&body).send()?;

        let status = response.status();
        if status.is_success() {
            let identity: IdentityResponse = response.json()?;
            return Ok(identity.local_id);
        }
        let text = response.text()?;
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) if status.is_client_error() => Err(StoreError::Identity(body.error.message)),
            _ => Err(StoreError::Http {
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}

impl FarmerStore for FirebaseStore {
    fn create_credential(&mut self, mobile: &str, secret: &SecretString) -> StoreResult<String> {
        self.identity_call("signUp", mobile, secret)
            .map_err(|err| signup_error(mobile, err))
    }

    fn verify_credential(
        &mut self,
        mobile: &str,
        secret: &SecretString,
    ) -> StoreResult<Option<UserRecord>> {
        match self.identity_call("signInWithPassword", mobile, secret) {
            Ok(_) => self.get_record(mobile),
            Err(StoreError::Identity(message)) if is_rejected_credential(&message) => {
                debug!(mobile, message, "credential rejected");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn record_exists(&mut self, mobile: &str) -> StoreResult<bool> {
        Ok(self.get_record(mobile)?.is_some())
    }

    fn create_record(&mut self, mobile: &str, record: &UserRecord) -> StoreResult<()> {
        let Value::Object(fields) = serde_json::to_value(record)? else {
            return Err(StoreError::Decode("record did not serialize to an object".to_string()));
        };
        let body = json!({ "fields": encode_fields(&fields) });
        let response = self
            .client
            .post(self.collection_url())
            .query(&[self.key(), ("documentId", mobile)])
            .json(&body)
            .send()?;

        if response.status() == StatusCode::CONFLICT {
            return Err(StoreError::AlreadyExists(mobile.to_string()));
        }
        check(response)?;
        Ok(())
    }

    fn update_record(&mut self, mobile: &str, update: &RecordUpdate) -> StoreResult<()> {
        let fields = update.fields();
        let mut query: Vec<(&str, &str)> = vec![self.key(), ("currentDocument.exists", "true")];
        query.extend(fields.keys().map(|k| ("updateMask.fieldPaths", k.as_str())));

        let body = json!({ "fields": encode_fields(&fields) });
        let response = self
            .client
            .patch(self.document_url(mobile))
            .query(&query)
            .json(&body)
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(mobile.to_string()));
        }
        check(response)?;
        Ok(())
    }

    fn get_record(&mut self, mobile: &str) -> StoreResult<Option<UserRecord>> {
        let response = self
            .client
            .get(self.document_url(mobile))
            .query(&[self.key()])
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let document: Document = check(response)?.json()?;
        let plain = decode_fields(&document.fields)?;
        Ok(Some(serde_json::from_value(Value::Object(plain))?))
    }

    fn describe(&self) -> String {
        format!("Firebase ({})", self.project_id)
    }
}

fn check(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::Http {
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        })
    }
}

/// Identity account email for a mobile number.
pub fn email_for(mobile: &str) -> String {
    format!("{mobile}@{EMAIL_DOMAIN}")
}

/// Identity Toolkit messages look like `INVALID_PASSWORD` or
/// `INVALID_PASSWORD : some detail`.
fn is_rejected_credential(message: &str) -> bool {
    REJECTED_CREDENTIALS.contains(&error_code(message))
}

fn error_code(message: &str) -> &str {
    message.split(':').next().unwrap_or_default().trim()
}

/// An `EMAIL_EXISTS` answer to `accounts:signUp` means the mobile number
/// already holds a credential.
fn signup_error(mobile: &str, err: StoreError) -> StoreError {
    match err {
        StoreError::Identity(message) if error_code(&message) == "EMAIL_EXISTS" => {
            StoreError::AlreadyExists(mobile.to_string())
        }
        other => other,
    }
}

/// Converts plain JSON fields into Firestore typed values.
pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| {
            let timestamp = TIMESTAMP_FIELDS.contains(&key.as_str());
            (key.clone(), encode_value(value, timestamp))
        })
        .collect()
}

fn encode_value(value: &Value, timestamp: bool) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) if timestamp => json!({ "timestampValue": s }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(|v| encode_value(v, false)).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Converts Firestore typed values back into plain JSON fields.
pub fn decode_fields(fields: &Map<String, Value>) -> StoreResult<Map<String, Value>> {
    fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
        .collect()
}

fn decode_value(value: &Value) -> StoreResult<Value> {
    let unexpected = || StoreError::Decode(format!("unsupported Firestore value: {value}"));
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Err(unexpected());
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner.as_bool().map(Value::Bool).ok_or_else(unexpected),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(|n| Value::Number(n.into()))
            .ok_or_else(unexpected),
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(unexpected),
        "stringValue" | "timestampValue" => {
            inner.as_str().map(|s| Value::String(s.to_string())).ok_or_else(unexpected)
        }
        "arrayValue" => {
            let values = inner.get("values").and_then(Value::as_array);
            let decoded = values
                .map(|items| items.iter().map(decode_value).collect::<StoreResult<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(decoded))
        }
        "mapValue" => {
            let empty = Map::new();
            let fields = inner.get("fields").and_then(Value::as_object).unwrap_or(&empty);
            Ok(Value::Object(decode_fields(fields)?))
        }
        _ => Err(unexpected()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Profile, Season, SoilType};
    use chrono::{TimeZone, Utc};

    fn store() -> FirebaseStore {
        FirebaseStore::new(FirebaseConfig {
            project_id: "agrismart-test".to_string(),
            api_key: SecretString::from("test-key".to_string()),
            timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let store = store();
        assert_eq!(
            store.document_url("9876543210"),
            "https://firestore.googleapis.com/v1/projects/agrismart-test/databases/(default)/documents/farmers/9876543210"
        );
        assert_eq!(store.describe(), "Firebase (agrismart-test)");
    }

    #[test]
    fn test_email_for() {
        assert_eq!(email_for("9876543210"), "9876543210@agrismart.com");
    }

    #[test]
    fn test_rejected_credentials() {
        assert!(is_rejected_credential("INVALID_PASSWORD"));
        assert!(is_rejected_credential("INVALID_LOGIN_CREDENTIALS"));
        assert!(is_rejected_credential("USER_DISABLED : The user account has been disabled"));
        assert!(!is_rejected_credential("TOO_MANY_ATTEMPTS_TRY_LATER"));
        assert!(!is_rejected_credential("EMAIL_EXISTS"));
    }

    #[test]
    fn test_existing_email_maps_to_already_exists() {
        let err = signup_error("9988776655", StoreError::Identity("EMAIL_EXISTS".to_string()));
        assert!(matches!(err, StoreError::AlreadyExists(mobile) if mobile == "9988776655"));

        let err = signup_error(
            "9988776655",
            StoreError::Identity("WEAK_PASSWORD : Password should be at least 6 characters".to_string()),
        );
        assert!(matches!(err, StoreError::Identity(message) if message.starts_with("WEAK_PASSWORD")));

        let err = signup_error("9988776655", StoreError::Http { status: 503, body: String::new() });
        assert!(matches!(err, StoreError::Http { status: 503, .. }));
    }

    #[test]
    fn test_encode_typed_values() {
        let fields = RecordUpdate::profile(
            Profile {
                name: "Asha".to_string(),
                land_size: 2.0,
                soil_type: SoilType::Clay,
                previous_crop: None,
            },
            Season::Winter,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        )
        .fields();
        let encoded = encode_fields(&fields);

        assert_eq!(encoded["name"], json!({ "stringValue": "Asha" }));
        assert_eq!(encoded["land_size"], json!({ "doubleValue": 2.0 }));
        assert_eq!(encoded["previous_crop"], json!({ "nullValue": null }));
        assert_eq!(encoded["profile_completed"], json!({ "booleanValue": true }));
        assert_eq!(encoded["updated_at"], json!({ "timestampValue": "2024-01-02T03:04:05Z" }));
    }

    #[test]
    fn test_record_survives_firestore_encoding() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let mut record = UserRecord::new("9876543210", "abc123", "uid-42", now);
        record.apply(&RecordUpdate::profile(
            Profile {
                name: "Ravi".to_string(),
                land_size: 3.5,
                soil_type: SoilType::Peaty,
                previous_crop: Some("Rubber".to_string()),
            },
            Season::Monsoon,
            now,
        ));

        let Value::Object(plain) = serde_json::to_value(&record).unwrap() else {
            panic!("record is not an object");
        };
        let decoded = decode_fields(&encode_fields(&plain)).unwrap();
        let back: UserRecord = serde_json::from_value(Value::Object(decoded)).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_decode_firestore_shapes() {
        let fields = json!({
            "count": { "integerValue": "7" },
            "tags": { "arrayValue": {} },
            "nested": { "mapValue": { "fields": { "ok": { "booleanValue": true } } } },
            "seen": { "timestampValue": "2024-06-01T08:00:00.123456Z" }
        });
        let decoded = decode_fields(fields.as_object().unwrap()).unwrap();
        assert_eq!(decoded["count"], json!(7));
        assert_eq!(decoded["tags"], json!([]));
        assert_eq!(decoded["nested"], json!({ "ok": true }));
        assert_eq!(decoded["seen"], json!("2024-06-01T08:00:00.123456Z"));
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let fields = json!({ "where": { "geoPointValue": { "latitude": 1.0 } } });
        assert!(matches!(
            decode_fields(fields.as_object().unwrap()),
            Err(StoreError::Decode(_))
        ));
    }
}
