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
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unix-like permission bits, written in octal on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FsPermission(pub u16);

impl Display for FsPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

impl FromStr for FsPermission {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u16::from_str_radix(s, 8).map(FsPermission)
    }
}

/// Kind of a status entry.  Values this client does not know map to
/// `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Symlink,
    Unknown,
}

impl FileType {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "FILE" => FileType::File,
            "DIRECTORY" => FileType::Directory,
            "SYMLINK" => FileType::Symlink,
            _ => FileType::Unknown,
        }
    }
}

/**
 * A file or directory status as the server sends it.  Nothing is
 * validated: every known field is optional, and fields this client
 * does not know about (`fileId`, `childrenNum`, `storagePolicy`,
 * whatever newer Hadoop adds) are kept in `other`, so serializing a
 * status back gives the original JSON.
 */
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication: Option<u32>,
    /// Raw `type` value, see [`FileStatus::kind`].
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl FileStatus {
    pub fn kind(&self) -> FileType {
        self.file_type
            .as_deref()
            .map(FileType::from_wire)
            .unwrap_or(FileType::Unknown)
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == FileType::Directory
    }

    pub fn fs_permission(&self) -> Option<FsPermission> {
        self.permission.as_deref()?.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStatuses {
    #[serde(rename = "FileStatus")]
    pub file_status: Vec<FileStatus>,
}

/// Body of a GETFILESTATUS response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStatusResponse {
    #[serde(rename = "FileStatus")]
    pub file_status: FileStatus,
}

/// Body of a LISTSTATUS response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListStatusResponse {
    #[serde(rename = "FileStatuses")]
    pub file_statuses: FileStatuses,
}

impl ListStatusResponse {
    pub fn into_entries(self) -> Vec<FileStatus> {
        self.file_statuses.file_status
    }
}
