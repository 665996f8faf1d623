/// 진행 중 경매 페이지 렌더링
use crate::query::model::LiveAuction;
use std::fmt::Write;

pub fn render_live_auctions(auctions: &[LiveAuction]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Live Auctions</title></head>\n<body>\n<h1>Live Auctions</h1>\n",
    );

    if auctions.is_empty() {
        html.push_str("<p class=\"empty\">No live auctions right now.</p>\n");
    } else {
        html.push_str("<ul class=\"auctions\">\n");
        for auction in auctions {
            let listing = &auction.listing;
            let (current_bid, total_bids) = listing
                .auction
                .as_ref()
                .map_or((listing.price, 0), |a| (listing.bid_floor(), a.total_bids));
            // String에 쓰는 write!는 실패하지 않는다
            let _ = writeln!(
                html,
                "<li class=\"auction {status}\" data-id=\"{id}\"><h2>{title}</h2><p>{location}</p>\
                 <p>Current bid: {current_bid:.2}</p><p>Bids: {total_bids}</p>\
                 <p>Time left: {minutes} min</p></li>",
                status = auction.status,
                id = listing.id,
                title = escape(&listing.title),
                location = escape(&listing.location),
                minutes = auction.time_left_ms / 60_000,
            );
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
