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
use std::fmt::{self, Display};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: &str = "50070";

// https://url.spec.whatwg.org/#path-percent-encode-set
// plus '%' itself, as HDFS paths are never percent-encoded, and the
// characters RFC 3986 doesn't allow in a path.  URL parsers take '\'
// for '/' in http URLs.
const PATH_PERCENT_ENCODE_SET: &AsciiSet = &CONTROLS
    // query percent-encode set
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    // path per se
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'\\')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'|');

// Values must not leak into the next parameter.
const QUERY_PERCENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'&')
    .add(b'%')
    .add(b'+');

/// WebHDFS REST operation, sent as the `op` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Append,
    Open,
    Mkdirs,
    Rename,
    Delete,
    GetFileStatus,
    ListStatus,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Append => "APPEND",
            Operation::Open => "OPEN",
            Operation::Mkdirs => "MKDIRS",
            Operation::Rename => "RENAME",
            Operation::Delete => "DELETE",
            Operation::GetFileStatus => "GETFILESTATUS",
            Operation::ListStatus => "LISTSTATUS",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
 * Where the NameNode's WebHDFS endpoint lives and who we are.  The
 * port is kept as a string, exactly as it goes into the URI.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: String,
    pub user_name: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT.to_owned(),
            user_name: None,
        }
    }
}

impl ClientConfig {
    pub fn new<H: Into<String>, P: Into<String>>(
        host: H,
        port: P,
        user_name: Option<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            user_name,
        }
    }

    pub fn base_uri(&self) -> String {
        format!("http://{}:{}/webhdfs/v1/", self.host, self.port)
    }

    /**
     * Build the request URI for the operation.
     *
     * The `path` is relative to the WebHDFS root, i.e. it has no
     * leading '/'.  It is percent-encoded, but '/' separators are
     * kept.  Parameters go in the order given, and `user.name` is
     * always the last one.
     */
    pub fn build_uri<K, V>(&self, path: &str, op: Operation, params: &[(K, V)]) -> String
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut uri = self.base_uri();
        uri.extend(utf8_percent_encode(path, PATH_PERCENT_ENCODE_SET));
        uri.push_str("?op=");
        uri.push_str(op.as_str());

        for (key, value) in params {
            push_param(&mut uri, key.as_ref(), value.as_ref());
        }

        if let Some(user_name) = &self.user_name {
            push_param(&mut uri, "user.name", user_name);
        }
        uri
    }
}

fn push_param(uri: &mut String, key: &str, value: &str) {
    uri.push('&');
    uri.push_str(key);
    uri.push('=');
    uri.extend(utf8_percent_encode(value, QUERY_PERCENT_ENCODE_SET));
}
