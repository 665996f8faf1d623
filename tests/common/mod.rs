#![allow(dead_code)]

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use listing_auction::auction::model::{Auction, AuctionWindow, Category, Listing, NewListing};
use listing_auction::clock::Clock;
use listing_auction::config::BiddingConfig;
use listing_auction::handlers::{self, AppState};
use listing_auction::store::{ListingStore, MemoryListingStore};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const SELLER: &str = "seller-1";
pub const BUYER_1: &str = "buyer-1";
pub const BUYER_2: &str = "buyer-2";
pub const BUYER_3: &str = "buyer-3";

/// 경매 시작 시각 T
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
}

/// 테스트용 시계
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// 인증 헤더 값
pub fn auth(user_id: &str) -> String {
    general_purpose::STANDARD.encode(format!(r#"{{"sub":"{}","name":"{}"}}"#, user_id, user_id))
}

pub fn new_listing(title: &str, price: f64) -> NewListing {
    NewListing {
        title: title.to_string(),
        description: format!("{} description", title),
        image: None,
        price,
        location: "Seoul".to_string(),
        country: Some("Korea".to_string()),
        category: Category::Villas,
        is_auction: false,
        auction_start_time: None,
        auction_end_time: None,
    }
}

pub fn new_auction(title: &str, price: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> NewListing {
    NewListing {
        is_auction: true,
        auction_start_time: Some(start),
        auction_end_time: Some(end),
        ..new_listing(title, price)
    }
}

/// 시작가 100, [T, T+3600s] 경매
pub async fn hour_auction(store: &dyn ListingStore) -> Listing {
    store
        .insert(
            &SELLER.to_string(),
            new_auction("hour auction", 100.0, t0(), t0() + Duration::seconds(3600)),
        )
        .await
        .unwrap()
}

/// 저장소를 거치지 않은 경매 레코드
pub fn auction_record(price: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> Listing {
    let window = AuctionWindow::new(start, end).unwrap();
    Listing {
        id: 1,
        title: "record".to_string(),
        description: String::new(),
        image: None,
        price,
        location: String::new(),
        country: None,
        category: Category::NewListings,
        owner: SELLER.to_string(),
        auction: Some(Auction::open(window, price)),
        created_at: start - Duration::days(1),
    }
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryListingStore>,
    pub clock: Arc<ManualClock>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// 메모리 저장소로 서버를 띄운다 (임의 포트)
pub async fn spawn_app(now: DateTime<Utc>) -> TestApp {
    let clock = ManualClock::new(now);
    let store = Arc::new(MemoryListingStore::new(clock.clone()));
    let state = AppState::new(store.clone(), clock.clone(), BiddingConfig::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    let app = handlers::router(state);
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    TestApp {
        address,
        store,
        clock,
        client: reqwest::Client::new(),
    }
}
