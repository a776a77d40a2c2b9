use libwebhdfesse::{transport::ReqwestTransport, ClientConfig, WebHdfsClient};
use std::time::Duration;

pub(crate) const HADOOP_HOST: &str = "hadoop";
pub(crate) const HADOOP_HTTP_PORT: &str = "50070";
pub(crate) const HADOOP_USER: &str = "hdfs";

/** Construct default test client.  We do not use auto config for
 * tests that modify HDFS tree, as it can be harmful when run out of
 * docker container.  We use hardcoded config instead.
 */
pub(crate) fn get_client() -> Result<WebHdfsClient, Box<dyn std::error::Error>> {
    let config = ClientConfig::new(HADOOP_HOST, HADOOP_HTTP_PORT, Some(HADOOP_USER.to_owned()));
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(30))?;
    Ok(WebHdfsClient::new(config, transport))
}
