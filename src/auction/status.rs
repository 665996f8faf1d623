/// 경매 상태 판정
/// 현재 시각과 경매 시간 창만으로 상태를 계산한다. 부수 효과 없음.
/// 한 페이지를 구성하는 레코드 묶음은 같은 `now`로 판정해야 한다.
// region:    --- Imports
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::model::AuctionWindow;
// endregion: --- Imports

// region:    --- Auction Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuctionStatus {
    Upcoming,
    Live,
    EndingSoon,
    Ended,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Upcoming => "upcoming",
            AuctionStatus::Live => "live",
            AuctionStatus::EndingSoon => "ending-soon",
            AuctionStatus::Ended => "ended",
        }
    }

    /// 입찰을 받을 수 있는 상태인지
    pub fn is_open(&self) -> bool {
        matches!(self, AuctionStatus::Live | AuctionStatus::EndingSoon)
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 종료 임박 기준 (1시간)
pub fn ending_soon_threshold() -> Duration {
    Duration::hours(1)
}

/// 상태 계산
pub fn status(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> AuctionStatus {
    if now >= end {
        return AuctionStatus::Ended;
    }
    if now < start {
        return AuctionStatus::Upcoming;
    }
    if end - now <= ending_soon_threshold() {
        AuctionStatus::EndingSoon
    } else {
        AuctionStatus::Live
    }
}

pub fn window_status(now: DateTime<Utc>, window: &AuctionWindow) -> AuctionStatus {
    status(now, window.start_time, window.end_time)
}
// endregion: --- Auction Status
