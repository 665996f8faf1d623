/// 호출자 식별
/// 인증 계층이 넘겨주는 `x-jwt-payload` 헤더(base64 JSON)에서 사용자 id(`sub`)를 꺼낸다.
// region:    --- Imports
use crate::auction::model::UserId;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use tracing::debug;
// endregion: --- Imports

pub const AUTH_HEADER: &str = "x-jwt-payload";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub name: Option<String>,
}

/// 헤더 값 해석. 형식이 맞지 않으면 None
pub fn decode_user(header: &str) -> Option<CurrentUser> {
    let decoded = general_purpose::STANDARD.decode(header.trim()).ok()?;
    let json: Value = serde_json::from_slice(&decoded).ok()?;

    let sub = json.get("sub")?.as_str()?;
    if sub.is_empty() {
        return None;
    }
    Some(CurrentUser {
        user_id: sub.to_string(),
        name: json.get("name").and_then(Value::as_str).map(str::to_string),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(decode_user);

        user.ok_or_else(|| {
            debug!("{:<12} --> 인증 정보 없음", "Auth");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "로그인이 필요합니다.",
                    "code": "UNAUTHORIZED"
                })),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(json: &str) -> String {
        general_purpose::STANDARD.encode(json)
    }

    #[test]
    fn decodes_subject_and_name() {
        let user = decode_user(&encode(r#"{"sub":"u-1","name":"Kim"}"#)).unwrap();
        assert_eq!(user.user_id, "u-1");
        assert_eq!(user.name.as_deref(), Some("Kim"));
    }

    #[test]
    fn rejects_missing_subject_and_garbage() {
        assert!(decode_user(&encode(r#"{"name":"Kim"}"#)).is_none());
        assert!(decode_user(&encode(r#"{"sub":""}"#)).is_none());
        assert!(decode_user("not base64!").is_none());
    }
}
