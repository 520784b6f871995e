use std::time::Duration;

use libetcdutil::{DeleteOptions, EtcdClient, EtcdConfig, GetOptions, PutOptions};
use serial_test::serial;

const ETCD_ENDPOINTS: &str = "http://127.0.0.1:2379";
const TEST_PREFIX: &str = "/etcdutil-test/";

fn endpoints() -> String {
    std::env::var("ETCD_ENDPOINTS").unwrap_or_else(|_| ETCD_ENDPOINTS.to_string())
}

async fn connect() -> EtcdClient {
    let endpoints = endpoints();
    let conf = EtcdConfig::new(endpoints.split(',').map(str::trim)).rebuilt();
    let client = EtcdClient::new(&conf)
        .await
        .unwrap_or_else(|e| panic!("Failed to connect etcd at {endpoints}: {e}"));
    client
        .delete_op(TEST_PREFIX, DeleteOptions::new().with_prefix())
        .await
        .expect("cleanup failed");
    client
}

fn test_key(name: &str) -> String {
    format!("{TEST_PREFIX}{name}")
}

#[tokio::test]
#[serial]
#[ignore = "requires a running etcd at 127.0.0.1:2379"]
async fn test_put_then_get() {
    let client = connect().await;
    let key = test_key("put-get");
    let put = client.put(key.as_str(), "v1").await.unwrap();
    assert!(put.header().map(|h| h.revision()).unwrap_or(0) > 0);
    assert!(put.prev_key().is_none());

    let got = client.get(key.as_str(), false).await.unwrap();
    assert_eq!(got.count(), 1);
    assert_eq!(got.kvs()[0].value(), b"v1");
}

#[tokio::test]
#[serial]
#[ignore = "requires a running etcd at 127.0.0.1:2379"]
async fn test_put_returns_previous_value() {
    let client = connect().await;
    let key = test_key("prev");
    client.put(key.as_str(), "old").await.unwrap();
    let resp = client.put(key.as_str(), "new").await.unwrap();
    let prev = resp.prev_key().expect("put should return prev kv");
    assert_eq!(prev.value(), b"old");

    // without with_prev_key the store sends nothing back
    let resp = client
        .put_op(key.as_str(), "newer", PutOptions::new())
        .await
        .unwrap();
    assert!(resp.prev_key().is_none());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running etcd at 127.0.0.1:2379"]
async fn test_delete_then_get_is_empty() {
    let client = connect().await;
    let key = test_key("delete");
    client.put(key.as_str(), "gone soon").await.unwrap();
    let del = client.delete(key.as_str()).await.unwrap();
    assert_eq!(del.deleted(), 1);

    let got = client.get(key.as_str(), false).await.unwrap();
    assert_eq!(got.count(), 0);
    assert!(got.kvs().is_empty());

    // deleting a missing key is not an error
    let del = client.delete(key.as_str()).await.unwrap();
    assert_eq!(del.deleted(), 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running etcd at 127.0.0.1:2379"]
async fn test_get_prefix_isolation() {
    let client = connect().await;
    for name in ["app/a", "app/b", "app/c", "apple", "other/a"] {
        client.put(test_key(name), name).await.unwrap();
    }

    let got = client.get(test_key("app/"), true).await.unwrap();
    let mut keys: Vec<String> = got
        .kvs()
        .iter()
        .map(|kv| String::from_utf8_lossy(kv.key()).to_string())
        .collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![test_key("app/a"), test_key("app/b"), test_key("app/c")]
    );

    let exact = client.get(test_key("app/"), false).await.unwrap();
    assert_eq!(exact.count(), 0);

    let count = client
        .get_op(test_key("app"), GetOptions::new().with_prefix().with_count_only())
        .await
        .unwrap();
    assert_eq!(count.count(), 4);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running etcd at 127.0.0.1:2379"]
async fn test_delete_op_prefix_with_prev_kv() {
    let client = connect().await;
    client.put(test_key("batch/1"), "one").await.unwrap();
    client.put(test_key("batch/2"), "two").await.unwrap();
    client.put(test_key("keep"), "stay").await.unwrap();

    let del = client
        .delete_op(
            test_key("batch/"),
            DeleteOptions::new().with_prefix().with_prev_key(),
        )
        .await
        .unwrap();
    assert_eq!(del.deleted(), 2);
    assert_eq!(del.prev_kvs().len(), 2);

    let left = client.get(TEST_PREFIX, true).await.unwrap();
    assert_eq!(left.count(), 1);
    assert_eq!(left.kvs()[0].value(), b"stay");
}

#[tokio::test]
#[serial]
#[ignore = "requires a running etcd at 127.0.0.1:2379"]
async fn test_leased_write_expires() {
    let client = connect().await;
    let key = test_key("leased");
    let lease = client.lease_grant(3).await.unwrap();
    client
        .put_op(key.as_str(), "short lived", PutOptions::new().with_lease(lease.id()))
        .await
        .unwrap();

    let got = client.get(key.as_str(), false).await.unwrap();
    assert_eq!(got.count(), 1);
    assert_eq!(got.kvs()[0].lease(), lease.id());

    tokio::time::sleep(Duration::from_secs(6)).await;
    let got = client.get(key.as_str(), false).await.unwrap();
    assert_eq!(got.count(), 0, "leased key should be gone after expiry");
}

#[tokio::test]
#[serial]
#[ignore = "requires a running etcd at 127.0.0.1:2379"]
async fn test_lease_revoke_removes_keys() {
    let client = connect().await;
    let key = test_key("revoked");
    let lease = client.lease_grant(60).await.unwrap();
    client
        .put_op(key.as_str(), "v", PutOptions::new().with_lease(lease.id()))
        .await
        .unwrap();
    client.lease_revoke(lease.id()).await.unwrap();

    let got = client.get(key.as_str(), false).await.unwrap();
    assert!(got.kvs().is_empty());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running etcd at 127.0.0.1:2379"]
async fn test_clones_share_connection() {
    let client = connect().await;
    let writer = client.clone();
    let key = test_key("shared");
    let task_key = key.clone();
    let handle = tokio::spawn(async move { writer.put(task_key, "from task").await });
    handle.await.unwrap().unwrap();

    let got = client.get(key.as_str(), false).await.unwrap();
    assert_eq!(got.kvs()[0].value(), b"from task");
}

#[tokio::test]
async fn test_connect_unreachable_fails() {
    let conf = EtcdConfig::new(["http://127.0.0.1:1"]).rebuilt();
    let res = EtcdClient::new(&conf).await;
    assert!(res.is_err());
}
