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
//! A client for the Hadoop WebHDFS REST API.
//!
//! Every call is a plain blocking HTTP exchange with a NameNode (and,
//! for writes, a DataNode it redirects to).  The HTTP layer itself is
//! pluggable through [`transport::HttpTransport`].
pub mod client;
pub mod error;
pub mod hdconfig;
pub mod options;
pub mod status;
pub mod transport;
pub mod uri;

pub use client::WebHdfsClient;
pub use error::WebHdfsError;
pub use uri::{ClientConfig, Operation};
