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
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use xml::reader::{EventReader, XmlEvent};

use crate::uri::ClientConfig;

pub const HTTP_ADDRESS_KEY: &str = "dfs.namenode.http-address";

/// Try to get path to config from the environment.  It is the
/// "hdfs-site.xml" either from HADOOP_CONF_DIR default variable or
/// "/etc/hadoop/conf" directory.
pub fn get_config_path() -> PathBuf {
    let conf_dir = std::env::var("HADOOP_CONF_DIR");
    let path = match conf_dir {
        Ok(dir) => PathBuf::from(dir),
        Err(std::env::VarError::NotUnicode(raw_string)) => {
            warn!("HADOOP_CONF_DIR is not valid Unicode, using it anyway");
            PathBuf::from(raw_string)
        }
        Err(std::env::VarError::NotPresent) => {
            debug!("HADOOP_CONF_DIR is not set, using /etc/hadoop/conf");
            PathBuf::from("/etc/hadoop/conf")
        }
    };

    path.join("hdfs-site.xml")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open config {:?}: {:?}", .1, .0)]
    Io(io::Error, PathBuf),
    // TODO: xml Error has ErrorKind::Io(std::io::Error).
    #[error("failed to read config {:?}: {:?}", .1, .0)]
    Xml(xml::reader::Error, PathBuf),
}

/// Load the XML Hadoop/HDFS config and return properties' name/values as dict.
/// It performs only minimal validation.
pub fn load_config_as_dict(config_path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let buf = io::BufReader::new(
        std::fs::File::open(config_path).map_err(|e| ConfigError::Io(e, config_path.to_owned()))?,
    );

    read_config_as_dict(buf, config_path)
}

pub fn read_config_as_dict<R: Read>(
    r: R,
    config_path: &Path,
) -> Result<HashMap<String, String>, ConfigError> {
    let parser = EventReader::new(r);

    let mut elt = None;
    let mut key = None;
    let mut val = None;

    let mut res = HashMap::new();

    for e in parser {
        match e.map_err(|e| ConfigError::Xml(e, config_path.to_owned()))? {
            XmlEvent::StartElement { name, .. } => {
                elt = Some(name.to_string());
            }
            XmlEvent::EndElement { name } => {
                if name.to_string() == "property" {
                    if let Some((k, v)) = key.take().zip(val.take()) {
                        res.insert(k, v);
                    }
                }
                elt = None;
            }
            XmlEvent::Characters(text) => {
                if elt.as_deref() == Some("name") {
                    key = Some(text);
                } else if elt.as_deref() == Some("value") {
                    val = Some(text);
                }
            }
            _ => {}
        }
    }

    Ok(res)
}

/**
 * Find the NameNode's HTTP address.  The plain
 * `dfs.namenode.http-address` wins; otherwise the first namenode of
 * the first HA nameservice is used.
 */
pub fn find_http_address(conf: &HashMap<String, String>) -> Option<&str> {
    if let Some(addr) = conf.get(HTTP_ADDRESS_KEY) {
        return Some(addr.as_str());
    }

    let nameservice = conf.get("dfs.nameservices")?.split(',').next()?.trim();
    conf.get(&format!("dfs.ha.namenodes.{}", nameservice))?
        .split(',')
        .map(str::trim)
        .find_map(|namenode| {
            conf.get(&format!("{}.{}.{}", HTTP_ADDRESS_KEY, nameservice, namenode))
                .map(String::as_str)
        })
}

fn split_host_port(addr: &str) -> Option<(&str, &str)> {
    let (host, port) = addr.rsplit_once(':')?;
    if host.is_empty() || port.is_empty() {
        None
    } else {
        Some((host, port))
    }
}

/// The user WebHDFS requests are made on behalf of:
/// HADOOP_USER_NAME if set, the OS user otherwise.
pub fn default_user_name() -> Option<String> {
    match std::env::var("HADOOP_USER_NAME") {
        Ok(name) if !name.is_empty() => Some(name),
        _ => username::get_user_name()
            .map_err(|e| warn!(error = %e, "cannot get current user name"))
            .ok(),
    }
}

impl ClientConfig {
    /**
     * Build config from parsed site properties.  Anything missing or
     * malformed leaves the default in place.  Hadoop often binds the
     * HTTP server to the wildcard address; we can't connect there, so
     * it is replaced with the default host.
     */
    pub fn from_site(conf: &HashMap<String, String>) -> Self {
        let mut res = Self::default();
        match find_http_address(conf).map(|addr| (addr, split_host_port(addr))) {
            Some((_, Some((host, port)))) => {
                if host != "0.0.0.0" {
                    res.host = host.to_owned();
                }
                res.port = port.to_owned();
            }
            Some((addr, None)) => warn!(addr, "malformed namenode HTTP address, ignored"),
            None => debug!("no namenode HTTP address in the config"),
        }
        res
    }

    /// Load config from the environment's hdfs-site.xml, falling back
    /// to defaults if there is none.
    pub fn auto() -> Self {
        let path = get_config_path();
        match load_config_as_dict(&path) {
            Ok(conf) => Self::from_site(&conf),
            Err(e) => {
                debug!(error = %e, "using default config");
                Self::default()
            }
        }
    }
}
