//! Reqwest-backed Remote Data Gateway.
//!
//! Three operations, all bearer-authenticated, camelCase JSON on the wire:
//! profile lookup, child-list retrieval and child creation. Failures map to
//! [`GatewayError`]; the orchestrator handles every one locally.

use crate::config::GatewayConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smartkids_core::error::GatewayError;
use smartkids_core::gateway::RemoteGateway;
use smartkids_core::types::{Child, ChildDraft, ChildId, Credential, Gender, User};

pub struct HttpGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }
}

#[async_trait::async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch_profile(&self, credential: &Credential) -> Result<User, GatewayError> {
        tracing::debug!("GET /api/user/profile");
        let response = self
            .http
            .get(self.url("/api/user/profile"))
            .bearer_auth(credential.as_str())
            .send()
            .await
            .map_err(transport)?;
        let response = ok_or_rejected(response).await?;
        let dto: UserDto = response.json().await.map_err(decode)?;
        Ok(dto.into())
    }

    async fn fetch_roster(&self, credential: &Credential) -> Result<Vec<Child>, GatewayError> {
        tracing::debug!("GET /api/children");
        let response = self
            .http
            .get(self.url("/api/children"))
            .bearer_auth(credential.as_str())
            .send()
            .await
            .map_err(transport)?;
        let response = ok_or_rejected(response).await?;
        let dtos: Vec<ChildDto> = response.json().await.map_err(decode)?;
        Ok(dtos.into_iter().map(Child::from).collect())
    }

    async fn create_child(
        &self,
        credential: &Credential,
        draft: &ChildDraft,
    ) -> Result<Child, GatewayError> {
        tracing::debug!("POST /api/children");
        let response = self
            .http
            .post(self.url("/api/children"))
            .bearer_auth(credential.as_str())
            .json(&DraftDto::from(draft))
            .send()
            .await
            .map_err(transport)?;
        let response = ok_or_rejected(response).await?;
        let dto: ChildDto = response.json().await.map_err(decode)?;
        Ok(dto.into())
    }
}

fn transport(error: reqwest::Error) -> GatewayError {
    GatewayError::Transport(error.to_string())
}

fn decode(error: reqwest::Error) -> GatewayError {
    GatewayError::Decode(error.to_string())
}

/// Pass successes through; turn non-success responses into `Rejected`,
/// extracting the backend's `error` message field when one is present.
async fn ok_or_rejected(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| "request failed".to_string());
    Err(GatewayError::Rejected {
        status: status.as_u16(),
        message,
    })
}

// ----- wire DTOs ------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    name: String,
    #[serde(default)]
    profile_image_url: Option<String>,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            name: dto.name,
            profile_image_url: dto.profile_image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildDto {
    id: String,
    name: String,
    birth_date: NaiveDate,
    gender: Gender,
    #[serde(default)]
    profile_image_url: Option<String>,
}

impl From<ChildDto> for Child {
    fn from(dto: ChildDto) -> Self {
        Self {
            id: ChildId(dto.id),
            name: dto.name,
            birth_date: dto.birth_date,
            gender: dto.gender,
            profile_image_url: dto.profile_image_url,
        }
    }
}

/// Draft body for the create call; carries no id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftDto<'a> {
    name: &'a str,
    birth_date: NaiveDate,
    gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_image_url: Option<&'a str>,
}

impl<'a> From<&'a ChildDraft> for DraftDto<'a> {
    fn from(draft: &'a ChildDraft) -> Self {
        Self {
            name: &draft.name,
            birth_date: draft.birth_date,
            gender: draft.gender,
            profile_image_url: draft.profile_image_url.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_dto_decodes_camel_case_wire_format() {
        let json = r#"{
            "id": "17",
            "name": "김민준",
            "birthDate": "2015-03-15",
            "gender": "male",
            "profileImageUrl": "/api/placeholder/80/80"
        }"#;
        let child: Child = serde_json::from_str::<ChildDto>(json).unwrap().into();
        assert_eq!(child.id, ChildId::from("17"));
        assert_eq!(child.gender, Gender::Male);
        assert_eq!(
            child.birth_date,
            NaiveDate::from_ymd_opt(2015, 3, 15).unwrap()
        );
    }

    #[test]
    fn child_dto_tolerates_missing_avatar() {
        let json = r#"{"id":"1","name":"x","birthDate":"2016-07-22","gender":"female"}"#;
        let child: Child = serde_json::from_str::<ChildDto>(json).unwrap().into();
        assert!(child.profile_image_url.is_none());
    }

    #[test]
    fn draft_dto_serializes_without_id() {
        let draft = ChildDraft {
            name: "이하은".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2019, 2, 11).unwrap(),
            gender: Gender::Female,
            profile_image_url: None,
        };
        let value = serde_json::to_value(DraftDto::from(&draft)).unwrap();
        assert_eq!(value["name"], "이하은");
        assert_eq!(value["birthDate"], "2019-02-11");
        assert_eq!(value["gender"], "female");
        assert!(value.get("id").is_none());
        assert!(value.get("profileImageUrl").is_none());
    }

    #[test]
    fn error_body_message_is_optional() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"duplicate"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("duplicate"));
        let body: ErrorBody = serde_json::from_str(r#"{}"#).unwrap();
        assert!(body.error.is_none());
    }
}
