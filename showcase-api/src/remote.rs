//! Blocking `ureq` client for the CKAN action API.
//!
//! Every action is a `POST {address}/api/3/action/{name}` answered with the
//! envelope `{"success": bool, "result": ..., "error": {"__type": ..., ...}}`.
//! Action failures usually come back with a non-2xx status *and* an envelope,
//! so both paths go through the same decoding.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use showcase_core::{DatasetName, ShowcaseName, ShowcasePayload, ShowcaseRecord};

use crate::action::{actions, ActionApi, ImageDownloader};
use crate::error::ApiError;
use crate::multipart::MultipartBody;

const NOT_FOUND_ERROR: &str = "Not Found Error";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// HTTP agent settings shared by every request of one client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            user_agent: format!("showcase-sync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
    /// Validation errors list offending fields instead of a message.
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl ErrorBody {
    fn into_error(self, action: &str, status: u16) -> ApiError {
        let kind = self.kind.unwrap_or_else(|| "Unknown Error".to_owned());
        let message = match self.message {
            Some(message) => message,
            None if self.details.is_empty() => "no message".to_owned(),
            None => Value::Object(self.details).to_string(),
        };
        if kind == NOT_FOUND_ERROR {
            ApiError::NotFound {
                action: action.to_owned(),
                message,
            }
        } else {
            ApiError::Action {
                action: action.to_owned(),
                status,
                kind,
                message,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct NameOnly {
    name: String,
}

fn require<T>(action: &str, result: Option<T>) -> Result<T, ApiError> {
    result.ok_or_else(|| ApiError::MissingResult {
        action: action.to_owned(),
    })
}

// ---------------------------------------------------------------------------
// RemoteCkan
// ---------------------------------------------------------------------------

/// One remote catalog instance.
pub struct RemoteCkan {
    address: String,
    api_key: Option<String>,
    agent: ureq::Agent,
}

impl RemoteCkan {
    pub fn new(address: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_config(address, api_key, &ClientConfig::default())
    }

    pub fn with_config(
        address: impl Into<String>,
        api_key: Option<String>,
        config: &ClientConfig,
    ) -> Self {
        let address = address.into().trim_end_matches('/').to_owned();
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();
        Self {
            address,
            api_key: api_key.filter(|k| !k.is_empty()),
            agent,
        }
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/api/3/action/{action}", self.address)
    }

    fn post(&self, action: &str) -> ureq::Request {
        let request = self.agent.post(&self.action_url(action));
        match &self.api_key {
            Some(key) => request.set("Authorization", key),
            None => request,
        }
    }

    fn call<T: DeserializeOwned>(&self, action: &str, body: &Value) -> Result<Option<T>, ApiError> {
        tracing::debug!("{} {action}", self.address);
        let response = self.post(action).send_json(body);
        self.decode(action, response)
    }

    fn send_payload(
        &self,
        action: &str,
        mut payload: ShowcasePayload,
    ) -> Result<ShowcaseRecord, ApiError> {
        let result = match payload.image.image_upload.take() {
            None => self.call(action, &payload.to_json())?,
            Some(mut upload) => {
                let mut body = MultipartBody::new();
                for (key, value) in payload.form_fields() {
                    body.text(key, &value);
                }
                body.file("image_upload", &upload.file_name, &mut upload.file)
                    .map_err(|source| ApiError::Upload {
                        file_name: upload.file_name.clone(),
                        source,
                    })?;
                let (content_type, bytes) = body.finish();
                tracing::debug!(
                    "{} {action} (multipart, {} bytes)",
                    self.address,
                    bytes.len()
                );
                let response = self
                    .post(action)
                    .set("Content-Type", &content_type)
                    .send_bytes(&bytes);
                self.decode(action, response)?
            }
        };
        require(action, result)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        action: &str,
        response: Result<ureq::Response, ureq::Error>,
    ) -> Result<Option<T>, ApiError> {
        match response {
            Ok(response) => {
                let status = response.status();
                let envelope: Envelope<T> =
                    response.into_json().map_err(|source| ApiError::Decode {
                        action: action.to_owned(),
                        source,
                    })?;
                if envelope.success {
                    Ok(envelope.result)
                } else {
                    Err(envelope.error.unwrap_or_default().into_error(action, status))
                }
            }
            Err(ureq::Error::Status(status, response)) => {
                match response.into_json::<Envelope<Value>>() {
                    Ok(envelope) => Err(envelope.error.unwrap_or_default().into_error(action, status)),
                    Err(_) => Err(ApiError::Action {
                        action: action.to_owned(),
                        status,
                        kind: "HTTP Error".to_owned(),
                        message: "response is not an action envelope".to_owned(),
                    }),
                }
            }
            Err(ureq::Error::Transport(transport)) => Err(ApiError::Transport {
                url: self.action_url(action),
                source: Box::new(transport),
            }),
        }
    }
}

impl ActionApi for RemoteCkan {
    fn address(&self) -> &str {
        &self.address
    }

    fn list_showcases(&self) -> Result<Vec<ShowcaseName>, ApiError> {
        let listed: Option<Vec<NameOnly>> = self.call(actions::LIST, &json!({}))?;
        Ok(require(actions::LIST, listed)?
            .into_iter()
            .map(|s| ShowcaseName(s.name))
            .collect())
    }

    fn show_showcase(&self, id: &ShowcaseName) -> Result<ShowcaseRecord, ApiError> {
        let record = self.call(actions::SHOW, &json!({ "id": id }))?;
        require(actions::SHOW, record)
    }

    fn create_showcase(&self, payload: ShowcasePayload) -> Result<ShowcaseRecord, ApiError> {
        self.send_payload(actions::CREATE, payload)
    }

    fn update_showcase(&self, payload: ShowcasePayload) -> Result<ShowcaseRecord, ApiError> {
        self.send_payload(actions::UPDATE, payload)
    }

    fn list_showcase_datasets(
        &self,
        showcase_id: &ShowcaseName,
    ) -> Result<Vec<DatasetName>, ApiError> {
        let listed: Option<Vec<NameOnly>> =
            self.call(actions::PACKAGE_LIST, &json!({ "showcase_id": showcase_id }))?;
        Ok(require(actions::PACKAGE_LIST, listed)?
            .into_iter()
            .map(|p| DatasetName(p.name))
            .collect())
    }

    fn create_showcase_dataset_association(
        &self,
        showcase_id: &ShowcaseName,
        package_id: &DatasetName,
    ) -> Result<(), ApiError> {
        let body = json!({ "showcase_id": showcase_id, "package_id": package_id });
        self.call::<Value>(actions::ASSOCIATION_CREATE, &body)?;
        Ok(())
    }

    fn delete_showcase_dataset_association(
        &self,
        showcase_id: &ShowcaseName,
        package_id: &DatasetName,
    ) -> Result<(), ApiError> {
        let body = json!({ "showcase_id": showcase_id, "package_id": package_id });
        self.call::<Value>(actions::ASSOCIATION_DELETE, &body)?;
        Ok(())
    }
}

impl ImageDownloader for RemoteCkan {
    /// Plain GET on the shared agent; the API key is never sent along.
    fn open(&self, url: &str) -> Result<Box<dyn std::io::Read + Send>, ApiError> {
        tracing::debug!("GET {url}");
        match self.agent.get(url).call() {
            Ok(response) => Ok(Box::new(response.into_reader())),
            Err(ureq::Error::Status(status, _)) => Err(ApiError::Download {
                url: url.to_owned(),
                status,
            }),
            Err(ureq::Error::Transport(transport)) => Err(ApiError::Transport {
                url: url.to_owned(),
                source: Box::new(transport),
            }),
        }
    }
}
