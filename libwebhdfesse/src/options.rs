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
//! Optional WebHDFS query parameters, one struct per operation.
//!
//! Known parameters are emitted in field order, then the `extra` ones
//! in the order they were added.  Nothing is validated here; that is
//! the server's job.
use std::borrow::Cow;

use crate::status::FsPermission;

pub type QueryParams = Vec<(Cow<'static, str>, String)>;

fn push_opt<T: ToString>(params: &mut QueryParams, key: &'static str, value: &Option<T>) {
    if let Some(value) = value {
        params.push((Cow::Borrowed(key), value.to_string()));
    }
}

fn push_extra(params: &mut QueryParams, extra: &[(String, String)]) {
    params.extend(
        extra
            .iter()
            .map(|(key, value)| (Cow::Owned(key.clone()), value.clone())),
    );
}

macro_rules! with_extra {
    ($name:ident) => {
        impl $name {
            /// Add a parameter unknown to this client version.
            pub fn with_param<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
                self.extra.push((key.into(), value.to_string()));
                self
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub overwrite: Option<bool>,
    pub blocksize: Option<u64>,
    pub replication: Option<u16>,
    pub permission: Option<FsPermission>,
    pub buffersize: Option<u32>,
    pub extra: Vec<(String, String)>,
}

impl CreateOptions {
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    pub fn blocksize(mut self, blocksize: u64) -> Self {
        self.blocksize = Some(blocksize);
        self
    }

    pub fn replication(mut self, replication: u16) -> Self {
        self.replication = Some(replication);
        self
    }

    pub fn permission(mut self, permission: FsPermission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn buffersize(mut self, buffersize: u32) -> Self {
        self.buffersize = Some(buffersize);
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        push_opt(&mut params, "overwrite", &self.overwrite);
        push_opt(&mut params, "blocksize", &self.blocksize);
        push_opt(&mut params, "replication", &self.replication);
        push_opt(&mut params, "permission", &self.permission);
        push_opt(&mut params, "buffersize", &self.buffersize);
        push_extra(&mut params, &self.extra);
        params
    }
}

with_extra!(CreateOptions);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendOptions {
    pub buffersize: Option<u32>,
    pub extra: Vec<(String, String)>,
}

impl AppendOptions {
    pub fn buffersize(mut self, buffersize: u32) -> Self {
        self.buffersize = Some(buffersize);
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        push_opt(&mut params, "buffersize", &self.buffersize);
        push_extra(&mut params, &self.extra);
        params
    }
}

with_extra!(AppendOptions);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenOptions {
    pub offset: Option<u64>,
    pub length: Option<u64>,
    pub buffersize: Option<u32>,
    pub extra: Vec<(String, String)>,
}

impl OpenOptions {
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn buffersize(mut self, buffersize: u32) -> Self {
        self.buffersize = Some(buffersize);
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        push_opt(&mut params, "offset", &self.offset);
        push_opt(&mut params, "length", &self.length);
        push_opt(&mut params, "buffersize", &self.buffersize);
        push_extra(&mut params, &self.extra);
        params
    }
}

with_extra!(OpenOptions);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MkdirsOptions {
    pub permission: Option<FsPermission>,
    pub extra: Vec<(String, String)>,
}

impl MkdirsOptions {
    pub fn permission(mut self, permission: FsPermission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        push_opt(&mut params, "permission", &self.permission);
        push_extra(&mut params, &self.extra);
        params
    }
}

with_extra!(MkdirsOptions);
