use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::application::{dispatch::GatePolicy, todo_service::StoreMode};

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Runtime settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub mode: StoreMode,
    pub policy: GatePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = lookup("TODO_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("invalid TODO_ADDR")?;
        let mode = match lookup("TODO_MODE") {
            Some(raw) => raw.parse::<StoreMode>().context("invalid TODO_MODE")?,
            None => StoreMode::default(),
        };
        let conceal_foreign_records = match lookup("TODO_CONCEAL_FOREIGN") {
            Some(raw) => parse_flag(&raw).context("invalid TODO_CONCEAL_FOREIGN")?,
            None => false,
        };
        Ok(Self { addr, mode, policy: GatePolicy { conceal_foreign_records } })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got `{other}`"),
    }
}
