use serde::Deserialize;

/// Konnect answers uniqueness violations with a 400 carrying this code.
const DATA_CONSTRAINT_CODE: i64 = 3;
const DATA_CONSTRAINT_MESSAGE: &str = "data constraint error";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("{body}")]
    BadRequest { status: u16, body: String },

    #[error("{body}")]
    Conflict { body: String },

    #[error("API error occurred: Status {status_code}: {message}")]
    Api {
        status_code: u16,
        message: String,
        body: String,
    },

    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Deserialize)]
struct ConstraintBody {
    code: Option<i64>,
    message: Option<String>,
}

impl SdkError {
    /// Maps a non-success HTTP answer to its error kind.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            404 => SdkError::NotFound(body),
            409 => SdkError::Conflict { body },
            400 => SdkError::BadRequest { status, body },
            _ => SdkError::Api {
                status_code: status,
                message: status_text(status).to_string(),
                body,
            },
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::NotFound(_) => Some(404),
            SdkError::BadRequest { status, .. } => Some(*status),
            SdkError::Conflict { .. } => Some(409),
            SdkError::Api { status_code, .. } => Some(*status_code),
            SdkError::Transport(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// A 409, or a 400 whose body is Konnect's data constraint error.
    pub fn is_conflict(&self) -> bool {
        match self {
            SdkError::Conflict { .. } => true,
            SdkError::Api { status_code, .. } if *status_code == 409 => true,
            SdkError::BadRequest { body, .. } | SdkError::Api { body, .. } => {
                is_data_constraint_error(body)
            }
            _ => false,
        }
    }
}

fn is_data_constraint_error(body: &str) -> bool {
    serde_json::from_str::<ConstraintBody>(body)
        .map(|b| {
            b.code == Some(DATA_CONSTRAINT_CODE)
                && b.message.as_deref() == Some(DATA_CONSTRAINT_MESSAGE)
        })
        .unwrap_or(false)
}

fn status_text(status: u16) -> &'static str {
    match status {
        401 => "Unauthorized",
        403 => "Forbidden",
        429 => "Too Many Requests",
        500..=599 => "Server Error",
        _ => "Unexpected Status",
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        SdkError::Transport(err.to_string())
    }
}

#[cfg(test)]
pub(crate) const DATA_CONSTRAINT_BODY: &str = r#"{
  "code": 3,
  "message": "data constraint error",
  "details": [
    {
      "@type": "type.googleapis.com/kong.admin.model.v1.ErrorDetail",
      "type": "ERROR_TYPE_REFERENCE",
      "field": "name",
      "messages": ["name (type: unique) constraint failed"]
    }
  ]
}"#;
