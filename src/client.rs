//! Blocking HTTP client for the Ecobee consumer web API.
//!
//! - Blocking client using `ureq` (no async).
//! - Uses the wire models in `crate::models::ecobee`.
//! - Covers the endpoints the voice commands need: register (login),
//!   summary (device discovery), thermostat (state query), update (control).
//!
//! Authentication
//! - Performs a username/password login against `/ecobee/register` and keeps
//!   the returned token for the lifetime of the client. The service expires
//!   sessions server-side; expiry is detected reactively via error code 313,
//!   at which point the client logs in again and replays the request once.
//!
//! The client assumes single-owner use; token and device-id state live in
//! `RefCell`s, so sharing across threads is rejected at compile time.

use log::info;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::cell::RefCell;

use crate::models::ecobee::{
    HvacMode, RegisterResponse, SummaryResponse, ThermostatResponse, ThermostatState,
};
use crate::units;

pub const DEFAULT_BASE_URL: &str = "https://www.ecobee.com/home";

/// Fixed client identifier sent as the User-Agent on every request.
const CLIENT_IDENT: &str = "ecobee-voice";

/// The service's well-known "session expired" error number.
const SESSION_EXPIRED_CODE: i64 = 313;

#[derive(Debug)]
pub enum EcobeeClientError {
    /// Login failed to yield a token, or a re-login after session expiry
    /// did not recover the session.
    Auth(String),
    /// The device listing succeeded but contained no usable identifier.
    Discovery(String),
    /// A structured error returned by the service (other than expiry).
    Service { message: String, code: i64 },
    /// Network/connection failure or a malformed response body.
    Transport(String),
    /// A well-formed response whose payload did not match the expected shape.
    Json(String),
    /// Caller passed an unsupported mode value.
    InvalidArgument(String),
}

impl core::fmt::Display for EcobeeClientError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EcobeeClientError::Auth(s) => write!(f, "auth error: {}", s),
            EcobeeClientError::Discovery(s) => write!(f, "discovery error: {}", s),
            EcobeeClientError::Service { message, code } => {
                write!(f, "ecobee error: {} ({})", message, code)
            }
            EcobeeClientError::Transport(s) => write!(f, "transport error: {}", s),
            EcobeeClientError::Json(s) => write!(f, "json error: {}", s),
            EcobeeClientError::InvalidArgument(s) => write!(f, "invalid argument: {}", s),
        }
    }
}

impl std::error::Error for EcobeeClientError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Structured error extracted from a response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
    pub code: i64,
}

/// Decoded response from one request. Constructed per call and consumed
/// immediately; never retained.
#[derive(Debug)]
pub struct ServiceResponse {
    pub payload: Value,
    pub error: Option<ApiError>,
}

impl ServiceResponse {
    fn from_body(body: &str) -> Result<Self, EcobeeClientError> {
        let payload: Value = serde_json::from_str(body)
            .map_err(|e| EcobeeClientError::Transport(format!("malformed response body: {}", e)))?;
        let error = payload.get("error").and_then(Value::as_str).map(|msg| ApiError {
            message: msg.to_string(),
            code: payload.get("errorNumber").and_then(Value::as_i64).unwrap_or(0),
        });
        Ok(ServiceResponse { payload, error })
    }

    fn is_session_expired(&self) -> bool {
        matches!(&self.error, Some(e) if e.code == SESSION_EXPIRED_CODE)
    }
}

/// One request/response exchange with the service. The production
/// implementation is [`HttpTransport`]; the trait seam exists so the retry
/// and discovery policies can be exercised against scripted responses.
///
/// Callers pass fully-formed fields; the session token is merged in by
/// [`EcobeeClient`] before the transport sees them.
pub trait Transport {
    fn request(
        &self,
        method: Method,
        path: &str,
        fields: &Map<String, Value>,
    ) -> Result<ServiceResponse, EcobeeClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn request(
        &self,
        method: Method,
        path: &str,
        fields: &Map<String, Value>,
    ) -> Result<ServiceResponse, EcobeeClientError> {
        (**self).request(method, path, fields)
    }
}

/// `ureq`-backed transport. The base URL is explicit construction-time
/// configuration rather than process-wide state.
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpTransport {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn parse_response(resp: Result<ureq::Response, ureq::Error>) -> Result<ServiceResponse, EcobeeClientError> {
        match resp {
            Ok(r) => {
                let body = r
                    .into_string()
                    .map_err(|e| EcobeeClientError::Transport(e.to_string()))?;
                ServiceResponse::from_body(&body)
            }
            Err(ureq::Error::Transport(t)) => Err(EcobeeClientError::Transport(t.to_string())),
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string().unwrap_or_else(|_| String::from("<no body>"));
                Err(EcobeeClientError::Transport(format!("http {}: {}", status, body)))
            }
        }
    }
}

/// Escape a string for use as a URL query string; RFC 3986 unreserved
/// characters pass through.
fn uri_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

impl Transport for HttpTransport {
    // The service wants fields as JSON text in both directions: POSTed as the
    // request body, or URI-escaped into the query string for GETs.
    fn request(
        &self,
        method: Method,
        path: &str,
        fields: &Map<String, Value>,
    ) -> Result<ServiceResponse, EcobeeClientError> {
        match method {
            Method::Get => {
                let mut url = self.url(path);
                if !fields.is_empty() {
                    let encoded = serde_json::to_string(fields)
                        .map_err(|e| EcobeeClientError::Json(e.to_string()))?;
                    url.push(if url.contains('?') { '&' } else { '?' });
                    url.push_str(&uri_escape(&encoded));
                }
                let resp = self
                    .agent
                    .get(&url)
                    .set("User-Agent", CLIENT_IDENT)
                    .set("Content-type", "application/x-www-form-urlencoded")
                    .call();
                Self::parse_response(resp)
            }
            Method::Post => {
                let body = serde_json::to_string(fields)
                    .map_err(|e| EcobeeClientError::Json(e.to_string()))?;
                let resp = self
                    .agent
                    .post(&self.url(path))
                    .set("User-Agent", CLIENT_IDENT)
                    .send_string(&body);
                Self::parse_response(resp)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
struct Session {
    token: Option<String>,
}

fn decode_payload<T: DeserializeOwned>(payload: Value) -> Result<T, EcobeeClientError> {
    serde_path_to_error::deserialize(payload).map_err(|e| EcobeeClientError::Json(e.to_string()))
}

/// Session-aware client for one thermostat.
///
/// The device identifier is discovered from the account's thermostat listing
/// on first use and cached for the lifetime of the client; if the underlying
/// device changes identity the client must be reconstructed.
pub struct EcobeeClient<T: Transport> {
    transport: T,
    credentials: Credentials,
    session: RefCell<Session>,
    device_id: RefCell<Option<String>>,
}

impl EcobeeClient<HttpTransport> {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(credentials: Credentials, base_url: &str) -> Self {
        Self::with_transport(HttpTransport::new(base_url), credentials)
    }
}

impl<T: Transport> EcobeeClient<T> {
    pub fn with_transport(transport: T, credentials: Credentials) -> Self {
        EcobeeClient {
            transport,
            credentials,
            session: RefCell::new(Session::default()),
            device_id: RefCell::new(None),
        }
    }

    /// Clone the caller's fields with the current session token merged in,
    /// when one is held.
    fn merged_fields(&self, fields: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = fields.clone();
        if let Some(token) = self.session.borrow().token.as_ref() {
            merged.insert("token".to_string(), Value::String(token.clone()));
        }
        merged
    }

    /// Log in and store the returned session token. Exempt from the
    /// expiry-retry policy: a failure here is terminal.
    fn login(&self) -> Result<(), EcobeeClientError> {
        let mut fields = Map::new();
        fields.insert("userName".to_string(), Value::String(self.credentials.username.clone()));
        fields.insert("password".to_string(), Value::String(self.credentials.password.clone()));

        let resp = self
            .transport
            .request(Method::Post, "/ecobee/register", &self.merged_fields(&fields))?;
        if let Some(err) = &resp.error {
            return Err(EcobeeClientError::Auth(format!("{} ({})", err.message, err.code)));
        }

        let reg: RegisterResponse = decode_payload(resp.payload)?;
        match reg.token {
            Some(token) if !token.is_empty() => {
                self.session.borrow_mut().token = Some(token);
                Ok(())
            }
            _ => Err(EcobeeClientError::Auth(
                "login response did not contain a token".to_string(),
            )),
        }
    }

    /// Issue one logical request, recovering from a session expiry by logging
    /// in again and replaying the call. The retry budget is exactly one; a
    /// second expiry for the same call is terminal.
    fn call(
        &self,
        method: Method,
        path: &str,
        fields: &Map<String, Value>,
    ) -> Result<ServiceResponse, EcobeeClientError> {
        let mut retried = false;
        loop {
            let resp = self.transport.request(method, path, &self.merged_fields(fields))?;
            if resp.is_session_expired() {
                if retried {
                    return Err(EcobeeClientError::Auth(
                        "session still expired after re-login".to_string(),
                    ));
                }
                info!("Ecobee session expired, logging in again");
                retried = true;
                self.login()?;
                continue;
            }
            return match resp.error {
                Some(err) => Err(EcobeeClientError::Service {
                    message: err.message,
                    code: err.code,
                }),
                None => Ok(ServiceResponse {
                    payload: resp.payload,
                    error: None,
                }),
            };
        }
    }

    /// Return the cached thermostat identifier, logging in and querying the
    /// account summary to fill it on first use.
    fn device_id(&self) -> Result<String, EcobeeClientError> {
        if let Some(id) = self.device_id.borrow().as_ref() {
            return Ok(id.clone());
        }

        if self.session.borrow().token.is_none() {
            self.login()?;
        }

        let mut fields = Map::new();
        fields.insert("selection".to_string(), json!({}));
        let resp = self.call(Method::Get, "/ecobee/summary", &fields)?;
        let summary: SummaryResponse = decode_payload(resp.payload)?;

        let id = summary
            .descriptors
            .into_iter()
            .next()
            .and_then(|d| d.thermostat_identifier)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                EcobeeClientError::Discovery(
                    "logged in but the account listed no thermostat identifier".to_string(),
                )
            })?;

        *self.device_id.borrow_mut() = Some(id.clone());
        Ok(id)
    }

    /// The csv-criteria selection addressing the cached thermostat.
    fn selection(&self) -> Result<Value, EcobeeClientError> {
        let id = self.device_id()?;
        Ok(json!({ "criteria": "csv", "criteriaData": id }))
    }

    /// Query the current thermostat state.
    pub fn get_state(&self) -> Result<ThermostatState, EcobeeClientError> {
        let mut fields = Map::new();
        fields.insert("selection".to_string(), self.selection()?);
        let resp = self.call(Method::Get, "/ecobee/thermostat", &fields)?;
        let decoded: ThermostatResponse = decode_payload(resp.payload)?;

        let record = decoded
            .thermostats
            .into_iter()
            .next()
            .ok_or_else(|| EcobeeClientError::Service {
                message: "thermostat query returned no records".to_string(),
                code: 0,
            })?;

        let mode = HvacMode::parse(&record.hvac_mode).ok_or_else(|| EcobeeClientError::Service {
            message: "could not determine current system".to_string(),
            code: 0,
        })?;

        let aux = record.auxiliary;
        let heat_hold_temp_f = units::service_units_to_fahrenheit(aux.heat_hold_temp);
        let cool_hold_temp_f = units::service_units_to_fahrenheit(aux.cool_hold_temp);
        Ok(ThermostatState {
            hvac_mode: mode,
            cool_hold_temp_f,
            heat_hold_temp_f,
            room_temp_f: units::service_units_to_fahrenheit(aux.current_temp),
            humidity_percent: aux.current_humidity,
            hold_temp_f: match mode {
                HvacMode::Heat => Some(heat_hold_temp_f),
                HvacMode::Cool => Some(cool_hold_temp_f),
                HvacMode::Off => None,
            },
        })
    }

    /// Set a permanent hold at the given temperature and switch the system
    /// to the matching mode. The mode must be heat or cool.
    pub fn set_hold_temperature(&self, deg_f: f64, mode: HvacMode) -> Result<(), EcobeeClientError> {
        let temp_field = match mode {
            HvacMode::Heat => "holdHeatTemp",
            HvacMode::Cool => "holdCoolTemp",
            HvacMode::Off => {
                return Err(EcobeeClientError::InvalidArgument(
                    "cannot hold a temperature with the system off".to_string(),
                ));
            }
        };

        let mut fields = Map::new();
        fields.insert("selection".to_string(), self.selection()?);
        fields.insert("holdType".to_string(), Value::String("holdPermanently".to_string()));
        fields.insert("hold".to_string(), Value::Bool(true));
        fields.insert("hvacMode".to_string(), Value::String(mode.as_str().to_string()));
        fields.insert(
            temp_field.to_string(),
            Value::from(units::fahrenheit_to_service_units(deg_f)),
        );
        self.call(Method::Post, "/ecobee/update", &fields)?;
        Ok(())
    }

    /// Turn the system off. The device keeps its holds and schedule.
    pub fn turn_off(&self) -> Result<(), EcobeeClientError> {
        let mut fields = Map::new();
        fields.insert("selection".to_string(), self.selection()?);
        fields.insert("hvacMode".to_string(), Value::String("off".to_string()));
        self.call(Method::Post, "/ecobee/update", &fields)?;
        Ok(())
    }

    /// Turn the system on in the given mode; the device resumes its last
    /// hold or schedule. The mode must be heat or cool.
    pub fn turn_on(&self, mode: HvacMode) -> Result<(), EcobeeClientError> {
        if mode == HvacMode::Off {
            return Err(EcobeeClientError::InvalidArgument(
                "turning on requires heat or cool".to_string(),
            ));
        }

        let mut fields = Map::new();
        fields.insert("selection".to_string(), self.selection()?);
        fields.insert("hvacMode".to_string(), Value::String(mode.as_str().to_string()));
        self.call(Method::Post, "/ecobee/update", &fields)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn recovers_from_expiry_with_exactly_one_retry() {
        let transport = ScriptedTransport::new(vec![
            expired(),
            register_ok("tok-2"),
            thermostat_ok("heat", 760, 680, 702, 41),
        ]);
        let client = seeded_client(&transport);

        let state = client.get_state().expect("recovered after re-login");
        assert_eq!(state.hvac_mode, HvacMode::Heat);

        assert_eq!(transport.call_count(), 3);
        assert_eq!(
            transport.paths(),
            vec!["/ecobee/thermostat", "/ecobee/register", "/ecobee/thermostat"]
        );
        // The replayed call carries the fresh token.
        let calls = transport.calls.borrow();
        assert_eq!(calls[2].fields.get("token"), Some(&Value::from("tok-2")));
    }

    #[test]
    fn second_expiry_is_terminal() {
        let transport = ScriptedTransport::new(vec![expired(), register_ok("tok-2"), expired()]);
        let client = seeded_client(&transport);

        let err = client.get_state().expect_err("retry budget is one");
        assert!(matches!(err, EcobeeClientError::Auth(_)));
        // One failed query, one login, one replay. No further attempts.
        assert_eq!(transport.call_count(), 3);
    }

    #[test]
    fn failed_relogin_is_terminal() {
        let transport = ScriptedTransport::new(vec![expired(), service_error("bad credentials", 1)]);
        let client = seeded_client(&transport);

        let err = client.get_state().expect_err("login failure propagates");
        assert!(matches!(err, EcobeeClientError::Auth(_)));
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn non_expiry_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![service_error("internal error", 500)]);
        let client = seeded_client(&transport);

        let err = client.get_state().expect_err("service error propagates");
        match err {
            EcobeeClientError::Service { message, code } => {
                assert_eq!(message, "internal error");
                assert_eq!(code, 500);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn discovery_runs_once_and_is_memoized() {
        let transport = ScriptedTransport::new(vec![
            register_ok("tok-1"),
            summary_ok("tstat-1"),
            thermostat_ok("cool", 760, 680, 741, 38),
            thermostat_ok("cool", 760, 680, 739, 38),
        ]);
        let client = EcobeeClient::with_transport(&transport, credentials());

        client.get_state().expect("first query");
        client.get_state().expect("second query");

        assert_eq!(
            transport.paths(),
            vec![
                "/ecobee/register",
                "/ecobee/summary",
                "/ecobee/thermostat",
                "/ecobee/thermostat"
            ]
        );
        // The cached identifier addresses both queries.
        let calls = transport.calls.borrow();
        for call in calls.iter().filter(|c| c.path == "/ecobee/thermostat") {
            assert_eq!(
                call.fields.get("selection"),
                Some(&json!({ "criteria": "csv", "criteriaData": "tstat-1" }))
            );
        }
    }

    #[test]
    fn empty_listing_is_a_discovery_error() {
        let transport =
            ScriptedTransport::new(vec![register_ok("tok-1"), ok(json!({ "descriptors": [] }))]);
        let client = EcobeeClient::with_transport(&transport, credentials());

        let err = client.get_state().expect_err("no identifier listed");
        assert!(matches!(err, EcobeeClientError::Discovery(_)));
    }

    #[test]
    fn listing_without_identifier_is_a_discovery_error() {
        let transport =
            ScriptedTransport::new(vec![register_ok("tok-1"), ok(json!({ "descriptors": [{}] }))]);
        let client = EcobeeClient::with_transport(&transport, credentials());

        let err = client.get_state().expect_err("identifier field missing");
        assert!(matches!(err, EcobeeClientError::Discovery(_)));
    }

    #[test]
    fn login_without_token_is_an_auth_error() {
        let transport = ScriptedTransport::new(vec![ok(json!({}))]);
        let client = EcobeeClient::with_transport(&transport, credentials());

        let err = client.get_state().expect_err("no token in register response");
        assert!(matches!(err, EcobeeClientError::Auth(_)));
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn hold_temp_follows_mode() {
        for (mode, expected_hold) in [("heat", Some(68.0)), ("cool", Some(76.0)), ("off", None)] {
            let transport = ScriptedTransport::new(vec![thermostat_ok(mode, 760, 680, 702, 41)]);
            let client = seeded_client(&transport);
            let state = client.get_state().expect("query");
            assert_eq!(state.hold_temp_f, expected_hold, "mode {}", mode);
        }
    }

    #[test]
    fn state_converts_units() {
        let transport = ScriptedTransport::new(vec![thermostat_ok("heat", 760, 685, 702, 41)]);
        let client = seeded_client(&transport);

        let state = client.get_state().expect("query");
        assert_eq!(state.heat_hold_temp_f, 68.5);
        assert_eq!(state.cool_hold_temp_f, 76.0);
        assert_eq!(state.room_temp_f, 70.2);
        assert_eq!(state.humidity_percent, 41);
    }

    #[test]
    fn unknown_mode_is_a_service_error() {
        let transport = ScriptedTransport::new(vec![thermostat_ok("auto", 760, 680, 702, 41)]);
        let client = seeded_client(&transport);

        let err = client.get_state().expect_err("auto is not representable");
        match err {
            EcobeeClientError::Service { message, .. } => {
                assert_eq!(message, "could not determine current system");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn heat_hold_payload_shape() {
        let transport = ScriptedTransport::new(vec![ok(json!({}))]);
        let client = seeded_client(&transport);

        client.set_hold_temperature(72.0, HvacMode::Heat).expect("set hold");

        let calls = transport.calls.borrow();
        assert_eq!(calls[0].method, Method::Post);
        assert_eq!(calls[0].path, "/ecobee/update");
        let fields = &calls[0].fields;
        assert_eq!(fields.get("hvacMode"), Some(&Value::from("heat")));
        assert_eq!(fields.get("holdHeatTemp"), Some(&Value::from(720)));
        assert_eq!(fields.get("holdType"), Some(&Value::from("holdPermanently")));
        assert_eq!(fields.get("hold"), Some(&Value::Bool(true)));
        assert_eq!(fields.get("holdCoolTemp"), None);
        assert_eq!(fields.get("token"), Some(&Value::from("tok-1")));
    }

    #[test]
    fn cool_hold_payload_shape() {
        let transport = ScriptedTransport::new(vec![ok(json!({}))]);
        let client = seeded_client(&transport);

        client.set_hold_temperature(68.0, HvacMode::Cool).expect("set hold");

        let calls = transport.calls.borrow();
        let fields = &calls[0].fields;
        assert_eq!(fields.get("hvacMode"), Some(&Value::from("cool")));
        assert_eq!(fields.get("holdCoolTemp"), Some(&Value::from(680)));
        assert_eq!(fields.get("holdHeatTemp"), None);
    }

    #[test]
    fn off_mode_hold_is_rejected_before_any_request() {
        let transport = ScriptedTransport::new(vec![]);
        let client = seeded_client(&transport);

        let err = client
            .set_hold_temperature(72.0, HvacMode::Off)
            .expect_err("off cannot hold");
        assert!(matches!(err, EcobeeClientError::InvalidArgument(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn turn_off_payload_shape() {
        let transport = ScriptedTransport::new(vec![ok(json!({}))]);
        let client = seeded_client(&transport);

        client.turn_off().expect("turn off");

        let calls = transport.calls.borrow();
        let fields = &calls[0].fields;
        assert_eq!(calls[0].path, "/ecobee/update");
        assert_eq!(fields.get("hvacMode"), Some(&Value::from("off")));
        assert_eq!(fields.get("holdHeatTemp"), None);
        assert_eq!(fields.get("holdCoolTemp"), None);
        assert_eq!(fields.get("holdType"), None);
    }

    #[test]
    fn turn_on_sends_requested_mode() {
        let transport = ScriptedTransport::new(vec![ok(json!({}))]);
        let client = seeded_client(&transport);

        client.turn_on(HvacMode::Cool).expect("turn on");

        let calls = transport.calls.borrow();
        assert_eq!(calls[0].fields.get("hvacMode"), Some(&Value::from("cool")));
    }

    #[test]
    fn turn_on_off_is_rejected() {
        let transport = ScriptedTransport::new(vec![]);
        let client = seeded_client(&transport);

        let err = client.turn_on(HvacMode::Off).expect_err("off is not a turn-on mode");
        assert!(matches!(err, EcobeeClientError::InvalidArgument(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn response_body_error_extraction() {
        let resp = ServiceResponse::from_body(r#"{"error": "session expired", "errorNumber": 313}"#)
            .expect("well-formed body");
        assert!(resp.is_session_expired());
        assert_eq!(
            resp.error,
            Some(ApiError {
                message: "session expired".to_string(),
                code: 313
            })
        );

        let resp = ServiceResponse::from_body(r#"{"token": "abc"}"#).expect("well-formed body");
        assert!(resp.error.is_none());

        let err = ServiceResponse::from_body("not json").expect_err("malformed body");
        assert!(matches!(err, EcobeeClientError::Transport(_)));
    }

    #[test]
    fn uri_escape_covers_json_delimiters() {
        assert_eq!(uri_escape("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(uri_escape(r#"{"a":1}"#), "%7B%22a%22%3A1%7D");
    }
}
