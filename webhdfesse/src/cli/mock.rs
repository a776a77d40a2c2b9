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
//! Scripted transport for command tests.
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use libwebhdfesse::{
    transport::{header, HeaderMap, HeaderValue, HttpRequest, HttpResponse, HttpTransport, StatusCode},
    ClientConfig, WebHdfsClient,
};

pub(crate) const DATANODE: &str = "http://datanode:50075/webhdfs/v1/data";

/// Replays scripted responses in order and records every request.
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// "METHOD uri" of every request sent so far.
    pub(crate) fn sent(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|req| format!("{} {}", req.method, req.uri))
            .collect()
    }
}

impl HttpTransport for MockTransport {
    type Error = io::Error;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, io::Error> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::ConnectionRefused, "no response"))
    }
}

pub(crate) fn client(responses: Vec<HttpResponse>) -> WebHdfsClient<MockTransport> {
    WebHdfsClient::new(
        ClientConfig::new("nn", "50070", Some("hdfs".to_owned())),
        MockTransport {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(vec![]),
        },
    )
}

pub(crate) fn response(status: StatusCode, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: HeaderMap::new(),
        body: body.as_bytes().to_vec(),
    }
}

pub(crate) fn ok() -> HttpResponse {
    response(StatusCode::OK, r#"{"boolean":true}"#)
}

pub(crate) fn not_found() -> HttpResponse {
    response(
        StatusCode::NOT_FOUND,
        r#"{"RemoteException":{"exception":"FileNotFoundException","message":"File does not exist"}}"#,
    )
}

pub(crate) fn redirect() -> HttpResponse {
    let mut resp = response(StatusCode::TEMPORARY_REDIRECT, "");
    resp.headers
        .insert(header::LOCATION, HeaderValue::from_static(DATANODE));
    resp
}

pub(crate) fn status(file_type: &str) -> HttpResponse {
    response(
        StatusCode::OK,
        &format!(
            r#"{{"FileStatus":{{"owner":"hdfs","pathSuffix":"","type":"{}"}}}}"#,
            file_type
        ),
    )
}

pub(crate) fn uri(path_and_query: &str) -> String {
    format!(
        "http://nn:50070/webhdfs/v1/{}&user.name=hdfs",
        path_and_query
    )
}
