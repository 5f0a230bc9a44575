//! Status aggregation across every mechanism, driven through a real market.

use chrono::{DateTime, Duration, Utc};
use gavel_market::Marketplace;
use gavel_query::{full_status, human_summary};
use gavel_types::mock::{MemoryRegistry, TableRoyalties, TableSplits};
use gavel_types::{Address, AssetId, AssetRegistry, FeeConfig};

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 20])
}

const MARKET: Address = Address([0xa0; 20]);
const TREASURY: Address = Address([0xfe; 20]);
const ADMIN: Address = Address([0xad; 20]);
const SELLER: Address = Address([1; 20]);
const ASSET: AssetId = AssetId(7);

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn market() -> Marketplace {
    Marketplace::new(MARKET, FeeConfig::new(TREASURY), ADMIN)
}

#[test]
fn unlisted_asset_reads_owner_from_registry() {
    let m = market();
    let mut registry = MemoryRegistry::new();
    registry.set_owner(ASSET, SELLER);
    let royalties = TableRoyalties::new();
    let splits = TableSplits::new();

    let status = full_status(&m, &registry, &royalties, &splits, None, ASSET, base_time());
    assert_eq!(status.owner, Some(SELLER));
    assert!(!status.in_escrow);
    assert!(status.buy_price.is_none());
    assert!(status.fees.is_none());

    let summary = human_summary(&status, base_time());
    assert!(summary.contains("not listed"), "{summary}");
}

#[test]
fn unknown_asset_has_no_owner() {
    let m = market();
    let registry = MemoryRegistry::new();
    let royalties = TableRoyalties::new();
    let splits = TableSplits::new();

    let status = full_status(&m, &registry, &royalties, &splits, None, ASSET, base_time());
    assert_eq!(status.owner, None);
    assert!(human_summary(&status, base_time()).contains("owner unknown"));
}

#[test]
fn buy_price_status_includes_fee_preview() {
    let mut m = market();
    let mut registry = MemoryRegistry::new();
    registry.set_owner(ASSET, SELLER);
    m.set_buy_price(&registry, ASSET, SELLER, 1_000_000, 3).unwrap();
    let royalties = TableRoyalties::new();
    let splits = TableSplits::new();

    let status = full_status(&m, &registry, &royalties, &splits, None, ASSET, base_time());
    assert_eq!(status.buy_price, Some(1_000_000));
    assert_eq!(status.remaining_editions, Some(3));
    assert_eq!(status.owner, Some(SELLER));

    // No creator rows: 5% treasury, rest to the owner.
    let fees = status.fees.unwrap();
    assert_eq!(fees.treasury_fee, 50_000);
    assert_eq!(fees.creator_revenue, 0);
    assert_eq!(fees.owner_revenue, 950_000);

    let summary = human_summary(&status, base_time());
    assert!(summary.contains("3 editions remaining"), "{summary}");
}

#[test]
fn escrowed_auction_reports_seller_as_owner() {
    let mut m = market();
    let mut registry = MemoryRegistry::new();
    registry.set_owner(ASSET, SELLER);
    let now = base_time();
    m.create_auction(&mut registry, ASSET, SELLER, 100_000, Duration::hours(24), now)
        .unwrap();
    let royalties = TableRoyalties::new();
    let splits = TableSplits::new();

    // The registry says the market holds it; the status says the seller.
    assert_eq!(registry.owner_of(ASSET), Ok(MARKET));
    let status = full_status(&m, &registry, &royalties, &splits, None, ASSET, now);
    assert_eq!(status.owner, Some(SELLER));
    assert!(status.in_escrow);

    let auction = status.auction.unwrap();
    assert_eq!(auction.reserve_price, 100_000);
    assert!(!auction.ended);
    assert_eq!(auction.high_bidder, None);

    // With no bids, the fee preview uses the reserve price.
    assert_eq!(status.fees.unwrap().treasury_fee, 5_000);

    let summary = human_summary(&status, now);
    assert!(summary.contains("no bids yet"), "{summary}");
    assert!(summary.contains("ending in 1d 0h"), "{summary}");

    // After the end time the same status reads as ended.
    let later = now + Duration::hours(25);
    let status = full_status(&m, &registry, &royalties, &splits, None, ASSET, later);
    assert!(status.auction.unwrap().ended);
    assert!(human_summary(&status, later).contains("ended"));
}

#[test]
fn full_status_serde_roundtrip() {
    let mut m = market();
    let mut registry = MemoryRegistry::new();
    registry.set_owner(ASSET, SELLER);
    m.set_buy_price(&registry, ASSET, SELLER, 1_000_000, 2).unwrap();
    let royalties = TableRoyalties::new();
    let splits = TableSplits::new();

    let status = full_status(&m, &registry, &royalties, &splits, None, ASSET, base_time());
    let json = serde_json::to_string(&status).unwrap();
    let back: gavel_query::FullStatus = serde_json::from_str(&json).unwrap();
    assert_eq!(status, back);
}

#[test]
fn preview_matches_settlement_exactly() {
    let mut m = market();
    let mut registry = MemoryRegistry::new();
    registry.set_owner(ASSET, SELLER);
    m.set_buy_price(&registry, ASSET, SELLER, 999_999, 1).unwrap();

    let mut royalties = TableRoyalties::new();
    royalties.set_info(ASSET, vec![addr(2), addr(3)], vec![7_000, 3_000]);
    royalties.set_creator(ASSET, addr(2));
    let splits = TableSplits::new();

    let status = full_status(&m, &registry, &royalties, &splits, None, ASSET, base_time());
    let preview = status.fees.unwrap();
    let resolved = m
        .fees()
        .resolve_fees(&royalties, &splits, None, ASSET, 999_999, SELLER);
    assert_eq!(preview, resolved.breakdown);
    assert_eq!(preview.total(), 999_999);
}
