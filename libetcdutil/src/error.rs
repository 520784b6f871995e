use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum EtcdUtilError {
    #[error("failed to connect to etcd at [{endpoints}]")]
    Connect {
        endpoints: String,
        #[source]
        source: Box<etcd_client::Error>,
    },
    #[error("timed out after {timeout:?} connecting to etcd at [{endpoints}]")]
    DialTimeout { endpoints: String, timeout: Duration },
    #[error("failed to start blocking runtime")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Etcd(#[from] Box<etcd_client::Error>),
}

impl From<etcd_client::Error> for EtcdUtilError {
    fn from(e: etcd_client::Error) -> Self {
        EtcdUtilError::Etcd(Box::new(e))
    }
}

impl EtcdUtilError {
    /// The underlying etcd client error, if this failure came from the store.
    pub fn as_etcd(&self) -> Option<&etcd_client::Error> {
        match self {
            EtcdUtilError::Connect { source, .. } => Some(&**source),
            EtcdUtilError::Etcd(e) => Some(&**e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtcdUtilError>;
