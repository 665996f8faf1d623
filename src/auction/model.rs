use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ListingId = i64;
pub type UserId = String;

/// 매물 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Trending,
    Rooms,
    IconicCities,
    Mountain,
    Castles,
    Pools,
    Camping,
    Farms,
    Arctic,
    #[default]
    NewListings,
    Apartments,
    Villas,
    Luxury,
    Beachfront,
    GardenHomes,
    Penthouses,
    FamilyFriendly,
    Commercial,
    Plots,
}

impl Category {
    pub const ALL: [Category; 19] = [
        Category::Trending,
        Category::Rooms,
        Category::IconicCities,
        Category::Mountain,
        Category::Castles,
        Category::Pools,
        Category::Camping,
        Category::Farms,
        Category::Arctic,
        Category::NewListings,
        Category::Apartments,
        Category::Villas,
        Category::Luxury,
        Category::Beachfront,
        Category::GardenHomes,
        Category::Penthouses,
        Category::FamilyFriendly,
        Category::Commercial,
        Category::Plots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trending => "trending",
            Category::Rooms => "rooms",
            Category::IconicCities => "iconic-cities",
            Category::Mountain => "mountain",
            Category::Castles => "castles",
            Category::Pools => "pools",
            Category::Camping => "camping",
            Category::Farms => "farms",
            Category::Arctic => "arctic",
            Category::NewListings => "new-listings",
            Category::Apartments => "apartments",
            Category::Villas => "villas",
            Category::Luxury => "luxury",
            Category::Beachfront => "beachfront",
            Category::GardenHomes => "garden-homes",
            Category::Penthouses => "penthouses",
            Category::FamilyFriendly => "family-friendly",
            Category::Commercial => "commercial",
            Category::Plots => "plots",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub filename: String,
}

/// 경매 시간 창. start < end 가 항상 성립한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionWindow {
    #[serde(rename = "auctionStartTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "auctionEndTime")]
    pub end_time: DateTime<Utc>,
}

impl AuctionWindow {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Option<Self> {
        (start_time < end_time).then_some(Self {
            start_time,
            end_time,
        })
    }
}

/// 입찰 이력 항목 (append-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidEntry {
    pub bidder: UserId,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// 경매 상태. 매물이 경매일 때만 존재한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    #[serde(flatten)]
    pub window: AuctionWindow,
    pub current_bid: f64,
    pub total_bids: u32,
    pub highest_bidder: Option<UserId>,
    pub bid_history: Vec<BidEntry>,
}

impl Auction {
    /// 입찰이 없는 새 경매. 현재 입찰가는 시작가로 초기화된다.
    pub fn open(window: AuctionWindow, starting_price: f64) -> Self {
        Self {
            window,
            current_bid: starting_price,
            total_bids: 0,
            highest_bidder: None,
            bid_history: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> BidSnapshot {
        BidSnapshot {
            current_bid: self.current_bid,
            total_bids: self.total_bids,
        }
    }

    pub fn last_bid_at(&self) -> Option<DateTime<Utc>> {
        self.bid_history.last().map(|entry| entry.timestamp)
    }

    /// 입찰 반영. 호출 측에서 검증과 조건 확인을 끝낸 뒤에만 호출한다.
    pub fn apply(&mut self, entry: BidEntry) {
        self.current_bid = entry.amount;
        self.total_bids += 1;
        self.highest_bidder = Some(entry.bidder.clone());
        self.bid_history.push(entry);
    }
}

/// 조건부 커밋에 사용하는 관측값
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BidSnapshot {
    pub current_bid: f64,
    pub total_bids: u32,
}

/// 매물 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub image: Option<Image>,
    /// 시작가. 생성 후 변경되지 않는다.
    pub price: f64,
    pub location: String,
    pub country: Option<String>,
    pub category: Category,
    pub owner: UserId,
    pub auction: Option<Auction>,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_auction(&self) -> bool {
        self.auction.is_some()
    }

    /// 입찰 하한. max(currentBid, startingPrice)
    pub fn bid_floor(&self) -> f64 {
        match &self.auction {
            Some(auction) => auction.current_bid.max(self.price),
            None => self.price,
        }
    }
}

/// 매물 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<Image>,
    pub price: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub is_auction: bool,
    #[serde(default)]
    pub auction_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auction_end_time: Option<DateTime<Utc>>,
}

impl NewListing {
    /// 경매 매물이고 시간 창이 올바를 때의 시간 창
    pub fn window(&self) -> Option<AuctionWindow> {
        if !self.is_auction {
            return None;
        }
        AuctionWindow::new(self.auction_start_time?, self.auction_end_time?)
    }
}
