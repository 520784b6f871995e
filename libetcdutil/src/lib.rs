pub mod blocking;
pub mod client;
pub mod config;
pub mod error;

pub use client::EtcdClient;
pub use config::{DEFAULT_ENDPOINT, EtcdConfig, MIN_DIAL_TIMEOUT, load_config};
pub use error::{EtcdUtilError, Result};

// re-export the option builders and responses callers pass through the adapter
pub use etcd_client::{
    DeleteOptions, DeleteResponse, GetOptions, GetResponse, KeyValue, LeaseGrantResponse,
    LeaseRevokeResponse, PutOptions, PutResponse,
};
