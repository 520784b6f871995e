//! Synchronous facade over [`crate::EtcdClient`].
//!
//! Each call blocks the calling thread for one round trip to the store. The
//! client owns a current-thread tokio runtime, so it must not be created, used or
//! dropped from inside another async runtime.

use etcd_client::{
    DeleteOptions, DeleteResponse, GetOptions, GetResponse, LeaseGrantResponse,
    LeaseRevokeResponse, PutOptions, PutResponse,
};
use tokio::runtime::{Builder, Runtime};

use crate::client::EtcdClient as AsyncClient;
use crate::config::EtcdConfig;
use crate::error::Result;

pub struct EtcdClient {
    inner: AsyncClient,
    rt: Runtime,
}

impl EtcdClient {
    pub fn new(conf: &EtcdConfig) -> Result<Self> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        let inner = rt.block_on(AsyncClient::new(conf))?;
        Ok(Self { inner, rt })
    }

    pub fn inner(&self) -> &AsyncClient {
        &self.inner
    }

    pub fn put(&self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Result<PutResponse> {
        self.rt.block_on(self.inner.put(key, value))
    }

    pub fn put_op(
        &self,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
        options: PutOptions,
    ) -> Result<PutResponse> {
        self.rt.block_on(self.inner.put_op(key, value, options))
    }

    pub fn get(&self, key: impl Into<Vec<u8>>, prefix: bool) -> Result<GetResponse> {
        self.rt.block_on(self.inner.get(key, prefix))
    }

    pub fn get_op(&self, key: impl Into<Vec<u8>>, options: GetOptions) -> Result<GetResponse> {
        self.rt.block_on(self.inner.get_op(key, options))
    }

    pub fn delete(&self, key: impl Into<Vec<u8>>) -> Result<DeleteResponse> {
        self.rt.block_on(self.inner.delete(key))
    }

    pub fn delete_op(
        &self,
        key: impl Into<Vec<u8>>,
        options: DeleteOptions,
    ) -> Result<DeleteResponse> {
        self.rt.block_on(self.inner.delete_op(key, options))
    }

    pub fn lease_grant(&self, ttl_secs: i64) -> Result<LeaseGrantResponse> {
        self.rt.block_on(self.inner.lease_grant(ttl_secs))
    }

    pub fn lease_revoke(&self, id: i64) -> Result<LeaseRevokeResponse> {
        self.rt.block_on(self.inner.lease_revoke(id))
    }
}
