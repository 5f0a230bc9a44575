//! Property-style tests for fee resolution and escrow-fallback payout.
//!
//! These exercise the documented guarantees end to end:
//! - the three buckets always sum to the sale price exactly
//! - share normalization loses at most (recipient count − 1) smallest units
//! - nested split flattening distributes the same total as an equivalent
//!   pre-flattened recipient list
//! - hostile recipients are escrowed in full without affecting anyone else

use gavel_payout::{FeeEngine, flatten_recipients};
use gavel_types::constants::BASIS_POINTS;
use gavel_types::mock::{MemoryLedger, MemoryRegistry, MockBank, TableRoyalties, TableSplits};
use gavel_types::{Address, AssetId, Collaborators, EscrowLedger, FeeConfig};

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 20])
}

const TREASURY: u8 = 0xfe;
const ASSET: AssetId = AssetId(1);

fn engine() -> FeeEngine {
    FeeEngine::new(FeeConfig::new(addr(TREASURY)))
}

// =============================================================================
// Property: conservation across prices and share sets
// =============================================================================
#[test]
fn buckets_always_sum_to_price() {
    let prices: [u128; 9] = [
        1,
        7,
        19,
        999,
        1_000_000,
        123_456_789,
        u128::from(u64::MAX),
        u128::MAX - 1,
        u128::MAX,
    ];
    let share_sets: [&[u64]; 5] = [
        &[],
        &[10_000],
        &[1, 1, 1],
        &[3_333, 3_333, 3_334],
        &[17, 4_000, 9, 974],
    ];

    for &price in &prices {
        for shares in share_sets {
            let mut royalties = TableRoyalties::new();
            let recipients: Vec<Address> =
                (0..shares.len()).map(|i| addr(10 + i as u8)).collect();
            royalties.set_info(ASSET, recipients, shares.to_vec());
            let splits = TableSplits::new();

            let res = engine().resolve_fees(&royalties, &splits, None, ASSET, price, addr(1));
            assert_eq!(
                res.breakdown.total(),
                price,
                "leak at price={price} shares={shares:?}"
            );
            let share_total: u128 = res.shares.iter().map(|s| s.amount).sum();
            assert_eq!(share_total, res.breakdown.creator_revenue);
        }
    }
}

// =============================================================================
// Property: normalization tolerance bounded by recipient count
// =============================================================================
#[test]
fn normalized_shares_lose_at_most_count_minus_one() {
    let splits = TableSplits::new();
    for shares in [&[7u64, 7, 7][..], &[1, 2, 3, 4, 5], &[9_999, 1]] {
        let recipients: Vec<Address> = (0..shares.len()).map(|i| addr(20 + i as u8)).collect();
        let leaves = flatten_recipients(&splits, &recipients, shares);
        let sum: u64 = leaves.iter().map(|l| l.share_bp).sum();
        assert!(sum <= BASIS_POINTS);
        assert!(
            BASIS_POINTS - sum <= (leaves.len() as u64 - 1),
            "tolerance exceeded for {shares:?}: sum={sum}"
        );
    }
}

// =============================================================================
// Property: flattening a nested split distributes the same total as a
// manually pre-flattened equivalent list
// =============================================================================
#[test]
fn nested_flattening_matches_preflattened_totals() {
    let seller = addr(1);
    let price = 1_000_003; // deliberately indivisible

    // Nested: creator pool = [a 50%, split 50%], split = [b 60%, c 40%].
    let mut nested_royalties = TableRoyalties::new();
    nested_royalties.set_info(ASSET, vec![addr(2), addr(9)], vec![5_000, 5_000]);
    let mut nested_splits = TableSplits::new();
    nested_splits.set_split(addr(9), vec![addr(3), addr(4)], vec![6_000, 4_000]);

    // Pre-flattened equivalent: [a 50%, b 30%, c 20%].
    let mut flat_royalties = TableRoyalties::new();
    flat_royalties.set_info(
        ASSET,
        vec![addr(2), addr(3), addr(4)],
        vec![5_000, 3_000, 2_000],
    );
    let flat_splits = TableSplits::new();

    let eng = engine();
    let nested = eng.resolve_fees(&nested_royalties, &nested_splits, None, ASSET, price, seller);
    let flat = eng.resolve_fees(&flat_royalties, &flat_splits, None, ASSET, price, seller);

    assert_eq!(nested.breakdown, flat.breakdown);
    let nested_total: u128 = nested.shares.iter().map(|s| s.amount).sum();
    let flat_total: u128 = flat.shares.iter().map(|s| s.amount).sum();
    assert_eq!(nested_total, flat_total);
    assert_eq!(nested.shares.len(), flat.shares.len());
}

// =============================================================================
// Property: share amounts stay proportional at prices near u128::MAX, where
// naive basis-point multiplication would wrap
// =============================================================================
#[test]
fn huge_price_share_math_does_not_wrap() {
    let seller = addr(1);
    let creator = addr(2);
    let mut royalties = TableRoyalties::new();
    royalties.set_info(
        ASSET,
        vec![creator, addr(3), addr(4)],
        vec![5_000, 3_000, 2_000],
    );
    royalties.set_creator(ASSET, creator);
    let splits = TableSplits::new();

    let price = u128::MAX;
    let res = engine().resolve_fees(&royalties, &splits, None, ASSET, price, seller);
    assert_eq!(res.breakdown.total(), price);
    assert_eq!(res.breakdown.creator_revenue, price / 10);

    let share_total: u128 = res.shares.iter().map(|s| s.amount).sum();
    assert_eq!(share_total, res.breakdown.creator_revenue);
    // The 50% row really is half the pool, not a wrapped sliver.
    assert_eq!(res.shares[0].recipient, creator);
    assert_eq!(res.shares[0].amount, res.breakdown.creator_revenue / 2);
    assert!(res.shares.iter().all(|s| s.absolute_share_bp <= 10_000));
}

// =============================================================================
// Scenario: price=1,000,000; no creator recipients; platform-member seller
// =============================================================================
#[test]
fn member_seller_no_creators_keeps_everything() {
    let seller = addr(1);
    let royalties = TableRoyalties::new();
    let splits = TableSplits::new();
    let mut membership = MemoryRegistry::new();
    membership.credit(seller, 1);

    let res = engine().resolve_fees(
        &royalties,
        &splits,
        Some(&membership),
        ASSET,
        1_000_000,
        seller,
    );
    assert_eq!(res.breakdown.treasury_fee, 0);
    assert_eq!(res.breakdown.owner_revenue, 1_000_000);
}

// =============================================================================
// Scenario: single creator recipient equal to seller
// =============================================================================
#[test]
fn self_sale_passes_through_to_creator_bucket() {
    let seller = addr(1);
    let mut royalties = TableRoyalties::new();
    royalties.set_info(ASSET, vec![seller], vec![10_000]);
    let splits = TableSplits::new();

    let res = engine().resolve_fees(&royalties, &splits, None, ASSET, 1_000_000, seller);
    assert_eq!(res.breakdown.treasury_fee, 1_000_000 / 20);
    assert_eq!(res.breakdown.creator_revenue, 1_000_000 - 50_000);
    assert_eq!(res.breakdown.owner_revenue, 0);

    // Same seller with membership: no treasury fee at all.
    let mut membership = MemoryRegistry::new();
    membership.credit(seller, 1);
    let res = engine().resolve_fees(
        &royalties,
        &splits,
        Some(&membership),
        ASSET,
        1_000_000,
        seller,
    );
    assert_eq!(res.breakdown.treasury_fee, 0);
    assert_eq!(res.breakdown.creator_revenue, 1_000_000);
}

// =============================================================================
// Scenario: secondary sale by a non-creator owner
// =============================================================================
#[test]
fn secondary_sale_scenario_numbers() {
    let seller = addr(1);
    let creator = addr(2);
    let mut royalties = TableRoyalties::new();
    royalties.set_info(ASSET, vec![creator], vec![10_000]);
    royalties.set_creator(ASSET, creator);
    let splits = TableSplits::new();

    let res = engine().resolve_fees(&royalties, &splits, None, ASSET, 1_000_000, seller);
    assert_eq!(res.breakdown.treasury_fee, 50_000);
    assert_eq!(res.breakdown.creator_revenue, 100_000);
    assert_eq!(res.breakdown.owner_revenue, 850_000);
    assert_eq!(res.shares.len(), 1);
    assert_eq!(res.shares[0].amount, 100_000);
    assert_eq!(res.shares[0].absolute_share_bp, 1_000);
}

// =============================================================================
// Scenario: distribution with a recipient that always rejects value
// =============================================================================
#[test]
fn hostile_recipient_cannot_starve_others() {
    let seller = addr(1);
    let hostile = addr(2);
    let friendly = addr(3);
    let mut royalties = TableRoyalties::new();
    royalties.set_info(ASSET, vec![hostile, friendly], vec![5_000, 5_000]);
    let splits = TableSplits::new();
    let mut registry = MemoryRegistry::new();
    let mut bank = MockBank::new();
    bank.reject(hostile);
    let mut ledger = MemoryLedger::new();

    let receipt = {
        let mut collab = Collaborators {
            registry: &mut registry,
            royalties: &royalties,
            splits: &splits,
            membership: None,
            bank: &mut bank,
            ledger: &mut ledger,
        };
        engine().distribute(&mut collab, ASSET, 1_000_000, seller)
    };

    // Hostile half is escrowed in full; friendly half delivered in full.
    assert_eq!(ledger.balance_of(hostile), 50_000);
    assert_eq!(bank.delivered_to(hostile), 0);
    assert_eq!(bank.delivered_to(friendly), 50_000);
    assert_eq!(receipt.escrowed.len(), 1);

    // Delivered + escrowed still equals the full price.
    let delivered: u128 = bank.deliveries().iter().map(|(_, a)| a).sum();
    let escrowed: u128 = receipt.escrowed.iter().map(|(_, a)| a).sum();
    assert_eq!(delivered + escrowed, 1_000_000);
}
