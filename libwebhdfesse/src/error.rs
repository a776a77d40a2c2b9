/*
   Copyright 2021 Ivan Boldyrev

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/
use std::fmt::Debug;

use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::transport::HttpResponse;

/**
 * Errors of WebHDFS calls.  The HTTP-derived variants carry the
 * response body as their message; transport failures are passed
 * through untouched.
 */
#[derive(Debug, Error)]
pub enum WebHdfsError<E: std::error::Error + Debug + 'static> {
    #[error("Bad request: {message}")]
    BadRequest { message: String },
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },
    #[error("File not found: {message}")]
    FileNotFound { message: String },
    #[error("Method not allowed: {message}")]
    MethodNotAllowed { message: String },
    #[error("WebHDFS error (HTTP {status}): {message}")]
    Generic { status: StatusCode, message: String },
    #[error("redirect without Location header")]
    MissingLocation,
    #[error("malformed response: {0}")]
    Json(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(E),
}

impl<E: std::error::Error + Debug + 'static> WebHdfsError<E> {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => WebHdfsError::BadRequest { message },
            401 => WebHdfsError::Unauthorized { message },
            404 => WebHdfsError::FileNotFound { message },
            405 => WebHdfsError::MethodNotAllowed { message },
            _ => WebHdfsError::Generic { status, message },
        }
    }

    pub(crate) fn from_response(resp: &HttpResponse) -> Self {
        Self::from_status(resp.status, resp.text())
    }

    /// HTTP status for errors reported by the server.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            WebHdfsError::BadRequest { .. } => Some(StatusCode::BAD_REQUEST),
            WebHdfsError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            WebHdfsError::FileNotFound { .. } => Some(StatusCode::NOT_FOUND),
            WebHdfsError::MethodNotAllowed { .. } => Some(StatusCode::METHOD_NOT_ALLOWED),
            WebHdfsError::Generic { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            WebHdfsError::BadRequest { message }
            | WebHdfsError::Unauthorized { message }
            | WebHdfsError::FileNotFound { message }
            | WebHdfsError::MethodNotAllowed { message }
            | WebHdfsError::Generic { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Decode the Java exception WebHDFS usually puts into an error body.
    pub fn remote_exception(&self) -> Option<RemoteException> {
        self.message()
            .and_then(|body| serde_json::from_str::<RemoteExceptionBody>(body).ok())
            .map(|body| body.remote_exception)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteException {
    pub exception: String,
    #[serde(default)]
    pub java_class_name: Option<String>,
    pub message: String,
}

#[derive(Deserialize)]
struct RemoteExceptionBody {
    #[serde(rename = "RemoteException")]
    remote_exception: RemoteException,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    type Error = WebHdfsError<io::Error>;

    #[test]
    fn test_status_mapping() {
        let msg = || "message".to_owned();
        assert!(matches!(
            Error::from_status(StatusCode::BAD_REQUEST, msg()),
            WebHdfsError::BadRequest { .. }
        ));
        assert!(matches!(
            Error::from_status(StatusCode::UNAUTHORIZED, msg()),
            WebHdfsError::Unauthorized { .. }
        ));
        assert!(matches!(
            Error::from_status(StatusCode::NOT_FOUND, msg()),
            WebHdfsError::FileNotFound { .. }
        ));
        assert!(matches!(
            Error::from_status(StatusCode::METHOD_NOT_ALLOWED, msg()),
            WebHdfsError::MethodNotAllowed { .. }
        ));
        assert!(matches!(
            Error::from_status(StatusCode::GATEWAY_TIMEOUT, msg()),
            WebHdfsError::Generic { status, .. } if status == StatusCode::GATEWAY_TIMEOUT
        ));
    }

    #[test]
    fn test_message_kept() {
        let err = Error::from_status(StatusCode::NOT_FOUND, "message".to_owned());
        assert_eq!(err.message(), Some("message"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "File not found: message");
    }

    #[test]
    fn test_transport_has_no_status() {
        let err = Error::Transport(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), None);
        assert_eq!(err.to_string(), "refused");
    }

    #[test]
    fn test_remote_exception() {
        let body = r#"{"RemoteException":{"exception":"FileNotFoundException","javaClassName":"java.io.FileNotFoundException","message":"File does not exist: /foo"}}"#;
        let err = Error::from_status(StatusCode::NOT_FOUND, body.to_owned());
        assert_eq!(
            err.remote_exception(),
            Some(RemoteException {
                exception: "FileNotFoundException".to_owned(),
                java_class_name: Some("java.io.FileNotFoundException".to_owned()),
                message: "File does not exist: /foo".to_owned(),
            })
        );
    }

    #[test]
    fn test_remote_exception_plain_body() {
        let err = Error::from_status(StatusCode::BAD_REQUEST, "oops".to_owned());
        assert_eq!(err.remote_exception(), None);
    }
}
