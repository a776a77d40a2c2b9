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
use std::io::Write;

use super::{absolute_path, describe, hdfs_path, Command};
use libwebhdfesse::{options::OpenOptions, transport::HttpTransport, WebHdfsClient};
use structopt::StructOpt;
use thiserror::Error;

#[derive(Debug, StructOpt)]
#[structopt(name = "cat", about = "Copy files content to stdout")]
pub struct CatArgs {
    #[structopt(long, help = "Start reading at this byte offset")]
    offset: Option<u64>,
    #[structopt(long, help = "Read at most this number of bytes")]
    length: Option<u64>,
    #[structopt(name = "src", required = true)]
    srcs: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CatError {
    #[error("{0}")]
    Fs(String),
    #[error(transparent)]
    LocalIo(std::io::Error),
}

pub struct Cat<'a, T: HttpTransport> {
    hdfs: &'a WebHdfsClient<T>,
}

impl<'a, T: HttpTransport> Cat<'a, T> {
    pub fn new(hdfs: &'a WebHdfsClient<T>) -> Self {
        Self { hdfs }
    }

    fn cat<W: Write>(&self, out: &mut W, src: &str, opts: &OpenOptions) -> Result<(), CatError> {
        let data = self
            .hdfs
            .read_file(hdfs_path(src), opts)
            .map_err(|e| CatError::Fs(describe("cat", &absolute_path(src), &e)))?;
        out.write_all(&data).map_err(CatError::LocalIo)?;
        out.flush().map_err(CatError::LocalIo)
    }
}

impl<'a, T: HttpTransport> Command for Cat<'a, T> {
    type Args = CatArgs;
    type Error = CatError;

    fn run(&mut self, args: Self::Args) -> Result<i32, Self::Error> {
        let opts = OpenOptions {
            offset: args.offset,
            length: args.length,
            ..Default::default()
        };
        let stdout_obj = std::io::stdout();
        let mut stdout = stdout_obj.lock();

        let mut has_err = false;
        for src in args.srcs.iter() {
            match self.cat(&mut stdout, src, &opts) {
                Ok(()) => {}
                Err(CatError::LocalIo(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => break,
                Err(e) => {
                    has_err = true;
                    eprintln!("{}", e);
                }
            }
        }
        Ok(if has_err { 1 } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::mock::{client, not_found, response, uri};
    use libwebhdfesse::transport::StatusCode;

    #[test]
    fn test_cat_range() {
        let hdfs = client(vec![response(StatusCode::OK, "0101")]);
        let opts = OpenOptions::default().offset(4).length(4);
        let mut out = vec![];
        Cat::new(&hdfs).cat(&mut out, "/data", &opts).unwrap();
        assert_eq!(out, b"0101");
        assert_eq!(
            hdfs.transport().sent(),
            ["GET ".to_owned() + &uri("data?op=OPEN&offset=4&length=4")]
        );
    }

    #[test]
    fn test_cat_missing() {
        let hdfs = client(vec![not_found()]);
        let mut out = vec![];
        let res = Cat::new(&hdfs).cat(&mut out, "/data", &OpenOptions::default());
        assert!(matches!(res, Err(CatError::Fs(_))));
        assert!(out.is_empty());
    }
}
