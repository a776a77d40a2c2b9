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
pub mod cat;
pub mod ls;
mod ls_output;
pub mod mkdir;
#[cfg(test)]
mod mock;
pub mod mv;
pub mod put;
pub mod rm;
pub mod stat;

use std::error::Error;
use std::fmt::Debug;

use libwebhdfesse::WebHdfsError;

pub trait Command {
    type Args;
    type Error;

    /// Run command, returning the process exit code.
    fn run(&mut self, args: Self::Args) -> Result<i32, Self::Error>;
}

/// WebHDFS paths go without the leading '/'.  Relative paths are not
/// resolved against a home directory.
pub(crate) fn hdfs_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

pub(crate) fn absolute_path(path: &str) -> String {
    format!("/{}", hdfs_path(path))
}

pub(crate) fn basename(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

pub(crate) fn is_not_found<E: Error + Debug + 'static>(e: &WebHdfsError<E>) -> bool {
    matches!(e, WebHdfsError::FileNotFound { .. })
}

/// Format an error the way `hdfs dfs` does: the server's own message
/// if there is one.
pub(crate) fn describe<E: Error + Debug + 'static>(
    cmd: &str,
    path: &str,
    e: &WebHdfsError<E>,
) -> String {
    match e.remote_exception() {
        Some(remote) => format!("{}: {}", cmd, remote.message),
        None if is_not_found(e) => format!("{}: `{}': No such file or directory", cmd, path),
        None => format!("{}: `{}': {}", cmd, path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libwebhdfesse::transport::StatusCode;

    type HdfsError = WebHdfsError<std::io::Error>;

    #[test]
    fn test_hdfs_path() {
        assert_eq!(hdfs_path("/user/hdfs"), "user/hdfs");
        assert_eq!(hdfs_path("user/hdfs"), "user/hdfs");
        assert_eq!(hdfs_path("/"), "");
        assert_eq!(absolute_path("user/hdfs"), "/user/hdfs");
        assert_eq!(absolute_path("/user/hdfs"), "/user/hdfs");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/user/hdfs/file.txt"), "file.txt");
        assert_eq!(basename("dir/"), "dir");
        assert_eq!(basename("file"), "file");
    }

    #[test]
    fn test_describe() {
        let e = HdfsError::from_status(StatusCode::NOT_FOUND, String::new());
        assert_eq!(
            describe("rm", "/x", &e),
            "rm: `/x': No such file or directory"
        );

        let e = HdfsError::from_status(
            StatusCode::FORBIDDEN,
            r#"{"RemoteException":{"exception":"AccessControlException","message":"Permission denied"}}"#
                .to_owned(),
        );
        assert_eq!(describe("mkdir", "/x", &e), "mkdir: Permission denied");
    }
}
