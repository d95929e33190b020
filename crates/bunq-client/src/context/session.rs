//! Session user parsing and expiry bookkeeping

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::error::{BunqError, Result};
use crate::http::extract_object;

/// Longest session bunq grants; also used when the user record does not say
const MAX_SESSION_TIMEOUT_SECS: i64 = 7 * 24 * 60 * 60;

/// Sessions this close to expiry are renewed before use
const SESSION_EXPIRY_MARGIN_SECS: i64 = 30;

/// Kind of user a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKind {
    Person,
    Company,
    ApiKey,
}

impl UserKind {
    fn response_key(&self) -> &'static str {
        match self {
            Self::Person => "UserPerson",
            Self::Company => "UserCompany",
            Self::ApiKey => "UserApiKey",
        }
    }
}

/// User record returned by `session-server`
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: u64,
    pub kind: UserKind,
    pub display_name: Option<String>,
    pub session_timeout_secs: i64,
}

impl SessionUser {
    /// Pick the user object out of a `session-server` response
    pub fn from_items(items: &[Value]) -> Result<Self> {
        for kind in [UserKind::Person, UserKind::Company, UserKind::ApiKey] {
            if let Ok(record) = extract_object(items, kind.response_key()) {
                return Self::from_record(kind, &record);
            }
        }

        Err(BunqError::UnexpectedResponse(
            "Session response contains no user".to_string(),
        ))
    }

    fn from_record(kind: UserKind, record: &Value) -> Result<Self> {
        let id = record
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| BunqError::UnexpectedResponse("User without id".to_string()))?;

        // API-key users carry name and timeout on the user that issued the key
        let owner = match kind {
            UserKind::ApiKey => record
                .get("requested_by_user")
                .and_then(|u| u.get("UserPerson").or_else(|| u.get("UserCompany"))),
            _ => None,
        };

        let display_name = user_field(record, owner, "display_name")
            .and_then(Value::as_str)
            .map(str::to_string);
        let session_timeout_secs = user_field(record, owner, "session_timeout")
            .and_then(Value::as_i64)
            .filter(|secs| *secs > 0)
            .map_or(MAX_SESSION_TIMEOUT_SECS, |secs| secs.min(MAX_SESSION_TIMEOUT_SECS));

        Ok(Self {
            id,
            kind,
            display_name,
            session_timeout_secs,
        })
    }
}

fn user_field<'a>(record: &'a Value, owner: Option<&'a Value>, name: &str) -> Option<&'a Value> {
    record.get(name).or_else(|| owner.and_then(|o| o.get(name)))
}

/// Live session state
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub token: String,
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(token: String, user: SessionUser) -> Self {
        let expires_at = Utc::now() + Duration::seconds(user.session_timeout_secs);
        Self {
            token,
            user,
            expires_at,
        }
    }

    /// Whether the session should be renewed before the next request.
    ///
    /// The margin is capped at half the session lifetime so short sessions
    /// are still reused before they are renewed.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        let margin = SESSION_EXPIRY_MARGIN_SECS.min(self.user.session_timeout_secs / 2);
        now + Duration::seconds(margin) >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_session_user() {
        let items = vec![
            json!({"Id": {"id": 1}}),
            json!({"Token": {"id": 2, "token": "session"}}),
            json!({"UserPerson": {"id": 77, "display_name": "Jane Doe", "session_timeout": 3600}}),
        ];

        let user = SessionUser::from_items(&items).unwrap();
        assert_eq!(user.id, 77);
        assert_eq!(user.kind, UserKind::Person);
        assert_eq!(user.display_name.as_deref(), Some("Jane Doe"));
        assert_eq!(user.session_timeout_secs, 3600);
    }

    #[test]
    fn test_api_key_user_uses_owner_fields() {
        let items = vec![json!({"UserApiKey": {
            "id": 5,
            "requested_by_user": {"UserCompany": {"display_name": "ACME BV", "session_timeout": 600}}
        }})];

        let user = SessionUser::from_items(&items).unwrap();
        assert_eq!(user.id, 5);
        assert_eq!(user.kind, UserKind::ApiKey);
        assert_eq!(user.display_name.as_deref(), Some("ACME BV"));
        assert_eq!(user.session_timeout_secs, 600);
    }

    #[test]
    fn test_missing_timeout_uses_default() {
        let items = vec![json!({"UserCompany": {"id": 9}})];
        let user = SessionUser::from_items(&items).unwrap();
        assert_eq!(user.session_timeout_secs, MAX_SESSION_TIMEOUT_SECS);
        assert!(user.display_name.is_none());
    }

    #[test]
    fn test_no_user_is_an_error() {
        let items = vec![json!({"Token": {"token": "x"}})];
        assert!(SessionUser::from_items(&items).is_err());
    }

    #[test]
    fn test_oversized_timeout_is_clamped() {
        let items = vec![json!({"UserPerson": {"id": 3, "session_timeout": 10_000_000_000_000i64}})];

        let user = SessionUser::from_items(&items).unwrap();
        assert_eq!(user.session_timeout_secs, MAX_SESSION_TIMEOUT_SECS);

        let session = SessionContext::new("t".to_string(), user);
        assert!(!session.needs_refresh(Utc::now()));
    }

    fn session_with_timeout(secs: i64) -> SessionContext {
        let user = SessionUser {
            id: 1,
            kind: UserKind::Person,
            display_name: None,
            session_timeout_secs: secs,
        };
        SessionContext::new("t".to_string(), user)
    }

    #[test]
    fn test_short_session_is_reused_before_renewal() {
        let session = session_with_timeout(10);

        assert!(!session.needs_refresh(Utc::now()));
        assert!(session.needs_refresh(session.expires_at - Duration::seconds(5)));
    }

    #[test]
    fn test_needs_refresh_inside_margin() {
        let session = session_with_timeout(3600);

        assert!(!session.needs_refresh(Utc::now()));
        assert!(session.needs_refresh(session.expires_at - Duration::seconds(10)));
        assert!(session.needs_refresh(session.expires_at + Duration::seconds(1)));
    }
}
