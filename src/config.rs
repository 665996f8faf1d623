/// 환경 변수 기반 설정
// region:    --- Imports
use crate::bidding::model::BidPolicy;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
// endregion: --- Imports

// region:    --- Config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// 입찰 처리 설정
#[derive(Debug, Clone, Copy)]
pub struct BiddingConfig {
    /// 조건부 커밋 재시도 횟수
    pub max_retries: u32,
    /// 재시도 루프 전체 제한 시간
    pub timeout: Duration,
    pub policy: BidPolicy,
}

impl Default for BiddingConfig {
    fn default() -> Self {
        Self {
            max_retries: 16,
            timeout: Duration::from_millis(5000),
            policy: BidPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// 없으면 메모리 저장소를 사용
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub bidding: BiddingConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 조회 함수로부터 설정 구성
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = BiddingConfig::default();
        let bidding = BiddingConfig {
            max_retries: parse(&lookup, "BID_MAX_RETRIES", defaults.max_retries)?,
            timeout: Duration::from_millis(parse(
                &lookup,
                "BID_TIMEOUT_MS",
                defaults.timeout.as_millis() as u64,
            )?),
            policy: BidPolicy {
                allow_self_outbid: parse(
                    &lookup,
                    "ALLOW_SELF_OUTBID",
                    defaults.policy.allow_self_outbid,
                )?,
                allow_seller_bids: parse(
                    &lookup,
                    "ALLOW_SELLER_BIDS",
                    defaults.policy.allow_seller_bids,
                )?,
            },
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            bind_addr: parse(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            bidding,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
// endregion: --- Config
