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
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, span, trace, Level};

use crate::error::WebHdfsError;
use crate::options::{AppendOptions, CreateOptions, MkdirsOptions, OpenOptions};
use crate::status::{FileStatusResponse, ListStatusResponse};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
use crate::uri::{ClientConfig, Operation};

const OCTET_STREAM: &str = "application/octet-stream";

pub type Result<V, E> = std::result::Result<V, WebHdfsError<E>>;

/**
 * WebHDFS client.  It holds nothing but the immutable config and the
 * transport, so one client can be shared by several threads.
 *
 * All paths are relative to the WebHDFS root and must not start with
 * '/': "user/hdfs/file.txt", not "/user/hdfs/file.txt".
 */
#[derive(Debug, Clone)]
pub struct WebHdfsClient<T: HttpTransport = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl WebHdfsClient<ReqwestTransport> {
    pub fn with_config(config: ClientConfig) -> std::result::Result<Self, TransportError> {
        Ok(Self::new(config, ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> WebHdfsClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn build_uri<K, V>(&self, path: &str, op: Operation, params: &[(K, V)]) -> String
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.config.build_uri(path, op, params)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, T::Error> {
        debug!(
            method = %request.method,
            uri = %request.uri,
            follow_redirects = request.follow_redirects,
            "sending request"
        );
        self.transport
            .send(request)
            .map_err(WebHdfsError::Transport)
    }

    fn expect_status(resp: HttpResponse, expected: StatusCode) -> Result<HttpResponse, T::Error> {
        if resp.status == expected {
            Ok(resp)
        } else {
            debug!(status = %resp.status, %expected, "unexpected status");
            Err(WebHdfsError::from_response(&resp))
        }
    }

    fn simple_call(
        &self,
        method: Method,
        path: &str,
        op: Operation,
        params: &[(impl AsRef<str>, impl AsRef<str>)],
    ) -> Result<HttpResponse, T::Error> {
        let request = HttpRequest::new(method, self.build_uri(path, op, params));
        Self::expect_status(self.send(&request)?, StatusCode::OK)
    }

    fn json_call<R: DeserializeOwned>(&self, path: &str, op: Operation) -> Result<R, T::Error> {
        const NO_PARAMS: &[(&str, &str)] = &[];
        let resp = self.simple_call(Method::GET, path, op, NO_PARAMS)?;
        serde_json::from_slice(&resp.body).map_err(WebHdfsError::Json)
    }

    /**
     * The WebHDFS write protocol.  The NameNode is asked first, and
     * it should answer with a 307 redirect to a DataNode; only then
     * the data is sent to the DataNode.  Nothing is sent to the
     * DataNode if the first step fails.
     */
    fn two_phase_write(
        &self,
        method: Method,
        path: &str,
        op: Operation,
        params: &[(impl AsRef<str>, impl AsRef<str>)],
        data: Vec<u8>,
        expected: StatusCode,
    ) -> Result<(), T::Error> {
        let span = span!(Level::DEBUG, "two_phase_write", %op, path);
        let _enter = span.enter();

        let init_request =
            HttpRequest::new(method.clone(), self.build_uri(path, op, params)).no_redirects();
        let init_resp =
            Self::expect_status(self.send(&init_request)?, StatusCode::TEMPORARY_REDIRECT)?;

        let location = init_resp
            .location()
            .ok_or(WebHdfsError::MissingLocation)?
            .to_owned();
        trace!(%location, "redirected to datanode");

        let request = HttpRequest::new(method, location).with_body(OCTET_STREAM, data);
        Self::expect_status(self.send(&request)?, expected)?;
        Ok(())
    }

    /**
     * Create a new file with the data.
     *
     * PUT http://<HOST>:<PORT>/webhdfs/v1/<PATH>?op=CREATE
     * [&overwrite=<true|false>][&blocksize=<LONG>][&replication=<SHORT>]
     * [&permission=<OCTAL>][&buffersize=<INT>]
     */
    pub fn create_file<D: Into<Vec<u8>>>(
        &self,
        path: &str,
        data: D,
        opts: &CreateOptions,
    ) -> Result<bool, T::Error> {
        self.two_phase_write(
            Method::PUT,
            path,
            Operation::Create,
            &opts.to_params(),
            data.into(),
            StatusCode::CREATED,
        )?;
        Ok(true)
    }

    /**
     * Append data to an existing file.  Not supported by Hadoop 1.x.
     *
     * POST http://<HOST>:<PORT>/webhdfs/v1/<PATH>?op=APPEND[&buffersize=<INT>]
     */
    pub fn append_file<D: Into<Vec<u8>>>(
        &self,
        path: &str,
        data: D,
        opts: &AppendOptions,
    ) -> Result<bool, T::Error> {
        self.two_phase_write(
            Method::POST,
            path,
            Operation::Append,
            &opts.to_params(),
            data.into(),
            StatusCode::OK,
        )?;
        Ok(true)
    }

    /**
     * Read file content.  The redirect to a DataNode is followed
     * transparently.
     *
     * GET http://<HOST>:<PORT>/webhdfs/v1/<PATH>?op=OPEN
     * [&offset=<LONG>][&length=<LONG>][&buffersize=<INT>]
     */
    pub fn read_file(&self, path: &str, opts: &OpenOptions) -> Result<Vec<u8>, T::Error> {
        let resp = self.simple_call(Method::GET, path, Operation::Open, &opts.to_params())?;
        Ok(resp.body)
    }

    /// PUT http://<HOST>:<PORT>/webhdfs/v1/<PATH>?op=MKDIRS[&permission=<OCTAL>]
    pub fn make_dir(&self, path: &str, opts: &MkdirsOptions) -> Result<bool, T::Error> {
        self.simple_call(Method::PUT, path, Operation::Mkdirs, &opts.to_params())?;
        Ok(true)
    }

    /// Rename a file or directory.  The `destination` is an absolute
    /// HDFS path, i.e. it does start with '/'.
    pub fn rename_file_dir(&self, path: &str, destination: &str) -> Result<bool, T::Error> {
        self.simple_call(
            Method::PUT,
            path,
            Operation::Rename,
            &[("destination", destination)],
        )?;
        Ok(true)
    }

    pub fn delete_file_dir(&self, path: &str, recursive: bool) -> Result<bool, T::Error> {
        self.simple_call(
            Method::DELETE,
            path,
            Operation::Delete,
            &[("recursive", recursive.to_string())],
        )?;
        Ok(true)
    }

    pub fn get_file_dir_status(&self, path: &str) -> Result<FileStatusResponse, T::Error> {
        self.json_call(path, Operation::GetFileStatus)
    }

    pub fn list_dir(&self, path: &str) -> Result<ListStatusResponse, T::Error> {
        self.json_call(path, Operation::ListStatus)
    }
}
