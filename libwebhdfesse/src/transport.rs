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
use std::time::Duration;

pub use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use thiserror::Error;
use tracing::debug;

/**
 * A single HTTP exchange as WebHDFS needs it.  Whether a redirect is
 * followed is decided per request: the two-phase writes must see the
 * NameNode's 307 themselves.
 */
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub follow_redirects: bool,
}

impl HttpRequest {
    pub fn new(method: Method, uri: String) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: None,
            follow_redirects: true,
        }
    }

    pub fn no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    pub fn with_body(mut self, content_type: &'static str, body: Vec<u8>) -> Self {
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|val| val.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/**
 * Sending HTTP requests.  This trait may implement different strategies
 * for connecting, including pooling, proxies, authentication, etc.
 * The client never retries on its own, and implementations should not
 * either: a failure is reported to the caller as is.
 */
pub trait HttpTransport {
    type Error: std::error::Error + Debug + Send + Sync + 'static;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, Self::Error>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    type Error = T::Error;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, Self::Error> {
        (**self).send(request)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request {0:?}: {1}")]
    Request(String, #[source] reqwest::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/**
 * Blocking transport built on reqwest.  It keeps two clients, as
 * reqwest fixes the redirect policy per client.
 */
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    follow: reqwest::blocking::Client,
    no_follow: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let builder = || {
            let builder = reqwest::blocking::Client::builder();
            // reqwest's blocking client has a 30 seconds default timeout.
            // We keep it unless asked otherwise.
            match timeout {
                Some(timeout) => builder.timeout(timeout),
                None => builder,
            }
        };
        Ok(Self {
            follow: builder().build()?,
            no_follow: builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()?,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    type Error = TransportError;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, Self::Error> {
        let client = if request.follow_redirects {
            &self.follow
        } else {
            &self.no_follow
        };

        let mut builder = client
            .request(request.method.clone(), &request.uri)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let req = builder
            .build()
            .map_err(|e| TransportError::Request(request.uri.clone(), e))?;

        let resp = client.execute(req)?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes()?.to_vec();
        debug!(%status, len = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
