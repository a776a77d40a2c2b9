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
use std::path::{Path, PathBuf};

use super::{absolute_path, describe, hdfs_path, is_not_found, Command};
use anyhow::{Context, Result};
use libwebhdfesse::{
    options::{AppendOptions, CreateOptions},
    transport::HttpTransport,
    WebHdfsClient, WebHdfsError,
};
use structopt::StructOpt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, StructOpt)]
#[structopt(name = "put", about = "Copy a local file to HDFS")]
pub struct PutArgs {
    #[structopt(short = "f", help = "Overwrite the destination if it already exists")]
    force: bool,
    #[structopt(long, help = "Replication factor of the new file")]
    replication: Option<u16>,
    #[structopt(long, help = "Block size of the new file")]
    blocksize: Option<u64>,
    #[structopt(name = "localsrc", parse(from_os_str))]
    src: PathBuf,
    #[structopt(name = "dst")]
    dst: String,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "appendToFile",
    about = "Append local files to a HDFS file, creating it if needed"
)]
pub struct AppendArgs {
    #[structopt(name = "localsrc", parse(from_os_str), required = true)]
    srcs: Vec<PathBuf>,
    #[structopt(name = "dst")]
    dst: String,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct PutError(String);

pub struct Put<'a, T: HttpTransport> {
    hdfs: &'a WebHdfsClient<T>,
}

impl<'a, T: HttpTransport> Put<'a, T> {
    pub fn new(hdfs: &'a WebHdfsClient<T>) -> Self {
        Self { hdfs }
    }

    /// Destination directory gets the source's name appended.
    fn target(&self, src: &Path, dst: &str) -> Result<String, WebHdfsError<T::Error>> {
        let into_dir = match self.hdfs.get_file_dir_status(hdfs_path(dst)) {
            Ok(status) => status.file_status.is_dir(),
            Err(e) if is_not_found(&e) => false,
            Err(e) => return Err(e),
        };
        Ok(match src.file_name() {
            Some(name) if into_dir => format!(
                "{}/{}",
                hdfs_path(dst).trim_end_matches('/'),
                name.to_string_lossy()
            ),
            _ => hdfs_path(dst).to_owned(),
        })
    }

    fn put(&self, src: &Path, data: Vec<u8>, args: &PutArgs) -> Result<(), PutError> {
        let target = self
            .target(src, &args.dst)
            .map_err(|e| PutError(describe("put", &absolute_path(&args.dst), &e)))?;
        debug!(%target, len = data.len(), "uploading");

        let opts = CreateOptions {
            overwrite: Some(args.force),
            replication: args.replication,
            blocksize: args.blocksize,
            ..Default::default()
        };
        self.hdfs
            .create_file(&target, data, &opts)
            .map(drop)
            .map_err(|e| PutError(describe("put", &absolute_path(&target), &e)))
    }
}

impl<'a, T: HttpTransport> Command for Put<'a, T> {
    type Args = PutArgs;
    type Error = anyhow::Error;

    fn run(&mut self, args: Self::Args) -> Result<i32> {
        let data = std::fs::read(&args.src)
            .with_context(|| format!("put: `{}'", args.src.display()))?;
        match self.put(&args.src, data, &args) {
            Ok(()) => Ok(0),
            Err(e) => {
                eprintln!("{}", e);
                Ok(1)
            }
        }
    }
}

pub struct AppendToFile<'a, T: HttpTransport> {
    hdfs: &'a WebHdfsClient<T>,
}

impl<'a, T: HttpTransport> AppendToFile<'a, T> {
    pub fn new(hdfs: &'a WebHdfsClient<T>) -> Self {
        Self { hdfs }
    }

    /// Only a missing file is created; any other status error is
    /// reported as is.
    fn append(&self, data: Vec<u8>, dst: &str) -> Result<(), PutError> {
        let path = hdfs_path(dst);
        let res = match self.hdfs.get_file_dir_status(path) {
            Ok(_) => self.hdfs.append_file(path, data, &AppendOptions::default()),
            Err(e) if is_not_found(&e) => {
                debug!(path, "creating missing file");
                self.hdfs.create_file(path, data, &CreateOptions::default())
            }
            Err(e) => Err(e),
        };
        res.map(drop)
            .map_err(|e| PutError(describe("appendToFile", &absolute_path(dst), &e)))
    }
}

impl<'a, T: HttpTransport> Command for AppendToFile<'a, T> {
    type Args = AppendArgs;
    type Error = anyhow::Error;

    fn run(&mut self, args: Self::Args) -> Result<i32> {
        let mut data = vec![];
        for src in args.srcs.iter() {
            data.extend(
                std::fs::read(src)
                    .with_context(|| format!("appendToFile: `{}'", src.display()))?,
            );
        }
        match self.append(data, &args.dst) {
            Ok(()) => Ok(0),
            Err(e) => {
                eprintln!("{}", e);
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::mock::{client, not_found, ok, redirect, response, status, uri, DATANODE};
    use libwebhdfesse::transport::StatusCode;

    fn put_args(dst: &str) -> PutArgs {
        PutArgs {
            force: false,
            replication: None,
            blocksize: None,
            src: PathBuf::from("local/example.txt"),
            dst: dst.to_owned(),
        }
    }

    fn created() -> libwebhdfesse::transport::HttpResponse {
        response(StatusCode::CREATED, "")
    }

    #[test]
    fn test_put_into_dir() {
        let hdfs = client(vec![status("DIRECTORY"), redirect(), created()]);
        let args = put_args("/user/hdfs/");
        Put::new(&hdfs)
            .put(&args.src, b"data".to_vec(), &args)
            .unwrap();
        let sent = hdfs.transport().sent();
        assert_eq!(
            sent[1],
            "PUT ".to_owned() + &uri("user/hdfs/example.txt?op=CREATE&overwrite=false")
        );
        assert_eq!(sent[2], format!("PUT {}", DATANODE));
    }

    #[test]
    fn test_put_new_name() {
        let hdfs = client(vec![not_found(), redirect(), created()]);
        let mut args = put_args("/user/hdfs/renamed.txt");
        args.force = true;
        args.replication = Some(2);
        Put::new(&hdfs)
            .put(&args.src, b"data".to_vec(), &args)
            .unwrap();
        assert_eq!(
            hdfs.transport().sent()[1],
            "PUT ".to_owned()
                + &uri("user/hdfs/renamed.txt?op=CREATE&overwrite=true&replication=2")
        );
    }

    #[test]
    fn test_put_status_error_stops() {
        let hdfs = client(vec![response(StatusCode::UNAUTHORIZED, "denied")]);
        let args = put_args("/user/hdfs/");
        let err = Put::new(&hdfs)
            .put(&args.src, b"data".to_vec(), &args)
            .unwrap_err();
        assert_eq!(err.to_string(), "put: `/user/hdfs/': Unauthorized: denied");
        assert_eq!(hdfs.transport().sent().len(), 1);
    }

    #[test]
    fn test_append_existing() {
        let hdfs = client(vec![status("FILE"), redirect(), ok()]);
        AppendToFile::new(&hdfs)
            .append(b"data".to_vec(), "/user/hdfs/log")
            .unwrap();
        let sent = hdfs.transport().sent();
        assert_eq!(sent[1], "POST ".to_owned() + &uri("user/hdfs/log?op=APPEND"));
        assert_eq!(sent[2], format!("POST {}", DATANODE));
    }

    #[test]
    fn test_append_creates_missing() {
        let hdfs = client(vec![not_found(), redirect(), created()]);
        AppendToFile::new(&hdfs)
            .append(b"data".to_vec(), "/user/hdfs/log")
            .unwrap();
        assert_eq!(
            hdfs.transport().sent()[1],
            "PUT ".to_owned() + &uri("user/hdfs/log?op=CREATE")
        );
    }

    #[test]
    fn test_append_status_error_not_appended() {
        let hdfs = client(vec![response(StatusCode::GATEWAY_TIMEOUT, "")]);
        let res = AppendToFile::new(&hdfs).append(b"data".to_vec(), "/user/hdfs/log");
        assert!(res.is_err());
        assert_eq!(hdfs.transport().sent().len(), 1);
    }
}
