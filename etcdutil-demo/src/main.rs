mod cli;

use anyhow::Context;
use chrono::{DateTime, Local};
use clap::Parser;
use cli::Cli;
use etcd_client::{KeyValue, PutOptions};
use libetcdutil::blocking::EtcdClient;
use libetcdutil::{EtcdConfig, load_config};
use log::info;
use std::thread;
use std::time::Duration;

fn genmd5(s: &str) -> String {
    format!("{:x}", md5::compute(s.as_bytes()))
}

/// Keys only change once per second, so rounds within the same second reuse a key.
fn round_key(prefix: &str, now: DateTime<Local>) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        genmd5(&now.format("%Y%m%d%H%M%S").to_string())
    )
}

fn print_kvs(kvs: &[KeyValue]) {
    for (i, kv) in kvs.iter().enumerate() {
        info!(
            "{i}: key: {}, value: {}, lease: {:x}, mod_revision: {}",
            String::from_utf8_lossy(kv.key()),
            String::from_utf8_lossy(kv.value()),
            kv.lease(),
            kv.mod_revision()
        );
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<EtcdConfig> {
    let mut conf = match &cli.config {
        Some(path) => {
            let path = path
                .to_str()
                .with_context(|| format!("config path {path:?} is not valid UTF-8"))?;
            load_config(path)?
        }
        None => EtcdConfig::default(),
    };
    if !cli.endpoints.is_empty() {
        conf.endpoints = cli.endpoints.clone();
    }
    conf.rebuild();
    Ok(conf)
}

fn run(cli: &Cli, client: &EtcdClient) -> anyhow::Result<()> {
    let mut round = 0u64;
    loop {
        round += 1;
        let now = Local::now();
        let key = round_key(&cli.prefix, now);

        let put = client.put(key.as_str(), genmd5(&now.to_rfc3339()))?;
        info!("round {round} put {key} at revision {}", revision(put.header()));
        info!("--------");

        let got = client.get(key.as_str(), false)?;
        print_kvs(got.kvs());
        info!("--------");

        let listed = client.get(cli.prefix.as_str(), true)?;
        print_kvs(listed.kvs());
        info!("--------");

        let deleted = client.delete(key.as_str())?;
        info!("delete num: {}", deleted.deleted());
        print_kvs(deleted.prev_kvs());
        info!("--------");

        let lease = client.lease_grant(cli.lease_ttl)?;
        let leased = client.put_op(
            key.as_str(),
            genmd5(&key),
            PutOptions::new().with_lease(lease.id()),
        )?;
        info!(
            "leased put {key} (lease {:x}, ttl {}s) at revision {}",
            lease.id(),
            lease.ttl(),
            revision(leased.header())
        );
        info!("--------");

        let listed = client.get(cli.prefix.as_str(), true)?;
        if listed.count() == 0 {
            info!("prefix {} is empty, leased write expired", cli.prefix);
            return Ok(());
        }
        print_kvs(listed.kvs());
        info!("--------");

        if cli.max_rounds.is_some_and(|max| round >= max) {
            info!("stopping after {round} rounds");
            return Ok(());
        }
        thread::sleep(Duration::from_secs(cli.interval));
    }
}

fn revision(header: Option<&etcd_client::ResponseHeader>) -> i64 {
    header.map_or(0, |h| h.revision())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
    let cli = Cli::parse();

    let conf = build_config(&cli)?;
    info!("connecting to {:?} (dial timeout {:?})", conf.endpoints, conf.dial_timeout);
    let client = EtcdClient::new(&conf).context("failed to create etcd client")?;
    run(&cli, &client)
}
