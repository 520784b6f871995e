use etcd_client::{
    Client, ConnectOptions, DeleteOptions, DeleteResponse, GetOptions, GetResponse,
    LeaseGrantResponse, LeaseRevokeResponse, PutOptions, PutResponse,
};
use log::{debug, info, warn};
use tokio::time::timeout;

use crate::config::EtcdConfig;
use crate::error::{EtcdUtilError, Result};

/// Key-value convenience wrapper around a connected [`etcd_client::Client`].
///
/// The wrapper owns the connection; dropping it releases the channel. It is
/// cheap to clone and every clone shares the same connection.
#[derive(Clone)]
pub struct EtcdClient {
    client: Client,
}

impl EtcdClient {
    /// Connect to the endpoints of an already rebuilt config.
    ///
    /// The connection is verified with a status probe, and the whole
    /// establishment is bounded by `dial_timeout`. There is no retry.
    pub async fn new(conf: &EtcdConfig) -> Result<Self> {
        let endpoints = conf.endpoints.join(", ");
        let mut opts = ConnectOptions::new().with_connect_timeout(conf.dial_timeout);
        if let Some((user, pass)) = conf.credentials() {
            opts = opts.with_user(user, pass);
        }

        let establish = async {
            let client = Client::connect(conf.endpoints.clone(), Some(opts)).await?;
            client.maintenance_client().status().await?;
            Ok::<_, etcd_client::Error>(client)
        };

        match timeout(conf.dial_timeout, establish).await {
            Ok(Ok(client)) => {
                info!("connected to etcd at [{endpoints}]");
                Ok(Self { client })
            }
            Ok(Err(e)) => {
                warn!("failed to connect to etcd at [{endpoints}]: {e}");
                Err(EtcdUtilError::Connect {
                    endpoints,
                    source: Box::new(e),
                })
            }
            Err(_) => {
                warn!(
                    "timed out after {:?} connecting to etcd at [{endpoints}]",
                    conf.dial_timeout
                );
                Err(EtcdUtilError::DialTimeout {
                    endpoints,
                    timeout: conf.dial_timeout,
                })
            }
        }
    }

    /// Wrap a client the caller has already connected.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn into_inner(self) -> Client {
        self.client
    }

    /// Put that always asks for the previous value back.
    pub async fn put(
        &self,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Result<PutResponse> {
        self.put_op(key, value, PutOptions::new().with_prev_key()).await
    }

    pub async fn put_op(
        &self,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
        options: PutOptions,
    ) -> Result<PutResponse> {
        let key = key.into();
        debug!("put {}", String::from_utf8_lossy(&key));
        let resp = self.client.kv_client().put(key, value, Some(options)).await?;
        Ok(resp)
    }

    /// Exact-key get, or a range over every key under `key` when `prefix` is set.
    /// A missing key is an empty `kvs()`, not an error.
    pub async fn get(&self, key: impl Into<Vec<u8>>, prefix: bool) -> Result<GetResponse> {
        let key = key.into();
        debug!("get {} (prefix: {prefix})", String::from_utf8_lossy(&key));
        let options = prefix.then(|| GetOptions::new().with_prefix());
        let resp = self.client.kv_client().get(key, options).await?;
        Ok(resp)
    }

    pub async fn get_op(
        &self,
        key: impl Into<Vec<u8>>,
        options: GetOptions,
    ) -> Result<GetResponse> {
        let key = key.into();
        debug!("get {}", String::from_utf8_lossy(&key));
        let resp = self.client.kv_client().get(key, Some(options)).await?;
        Ok(resp)
    }

    pub async fn delete(&self, key: impl Into<Vec<u8>>) -> Result<DeleteResponse> {
        let key = key.into();
        debug!("delete {}", String::from_utf8_lossy(&key));
        let resp = self.client.kv_client().delete(key, None).await?;
        Ok(resp)
    }

    pub async fn delete_op(
        &self,
        key: impl Into<Vec<u8>>,
        options: DeleteOptions,
    ) -> Result<DeleteResponse> {
        let key = key.into();
        debug!("delete {}", String::from_utf8_lossy(&key));
        let resp = self.client.kv_client().delete(key, Some(options)).await?;
        Ok(resp)
    }

    pub async fn lease_grant(&self, ttl_secs: i64) -> Result<LeaseGrantResponse> {
        let resp = self.client.lease_client().grant(ttl_secs, None).await?;
        debug!("granted lease {:x} with ttl {}s", resp.id(), resp.ttl());
        Ok(resp)
    }

    pub async fn lease_revoke(&self, id: i64) -> Result<LeaseRevokeResponse> {
        debug!("revoke lease {id:x}");
        let resp = self.client.lease_client().revoke(id).await?;
        Ok(resp)
    }
}
