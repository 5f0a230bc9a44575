//! Royalty-recipient normalization and percent-split flattening.
//!
//! Recipient share vectors are untrusted: they need not sum to 10000 and
//! may be malformed. Shares are always renormalized against their own
//! total, and each recipient is opportunistically probed for the
//! percent-split capability. A split's sub-recipients are flattened
//! recursively, multiplying sub-shares into the parent share, down to
//! leaf-level `(recipient, basis-point)` rows. Anything malformed — length
//! mismatch, zero total, oversized list, nesting past the depth cap — is
//! treated as a plain address or absent info, never an error.

use gavel_types::constants::{BASIS_POINTS, MAX_ROYALTY_RECIPIENTS, MAX_SPLIT_DEPTH};
use gavel_types::{Address, SplitProbe, SplitShares};

/// One leaf-level recipient row, share normalized to basis points of 10000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafShare {
    pub recipient: Address,
    pub share_bp: u64,
}

/// Normalize a royalty recipient set and flatten nested percent-splits.
///
/// Returns an empty vector when the set is absent or malformed — the fee
/// policy then treats the sale as having no creator recipients. A single
/// recipient with no explicit share is assigned 100%.
#[must_use]
pub fn flatten_recipients(
    splits: &dyn SplitProbe,
    recipients: &[Address],
    shares_bp: &[u64],
) -> Vec<LeafShare> {
    if recipients.is_empty() || recipients.len() > MAX_ROYALTY_RECIPIENTS {
        return Vec::new();
    }
    let implied_full = [BASIS_POINTS];
    let shares_bp = if shares_bp.is_empty() && recipients.len() == 1 {
        &implied_full[..]
    } else {
        shares_bp
    };
    if shares_bp.len() != recipients.len() {
        return Vec::new();
    }
    let total: u128 = shares_bp.iter().map(|&s| u128::from(s)).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut leaves = Vec::new();
    for (recipient, &share) in recipients.iter().zip(shares_bp) {
        #[allow(clippy::cast_possible_truncation)] // result is <= BASIS_POINTS
        let parent_bp = (u128::from(share) * u128::from(BASIS_POINTS) / total) as u64;
        expand(splits, *recipient, parent_bp, 0, &mut leaves);
    }
    leaves
}

/// Recursively expand one recipient into leaf rows.
fn expand(
    splits: &dyn SplitProbe,
    recipient: Address,
    share_bp: u64,
    depth: usize,
    out: &mut Vec<LeafShare>,
) {
    if depth < MAX_SPLIT_DEPTH {
        if let Some(sub) = splits.probe_split(recipient) {
            if is_well_formed(&sub) {
                let total: u128 = sub.shares_bp.iter().map(|&s| u128::from(s)).sum();
                for (r, &s) in sub.recipients.iter().zip(&sub.shares_bp) {
                    #[allow(clippy::cast_possible_truncation)] // result is <= share_bp
                    let child_bp = (u128::from(share_bp) * u128::from(s) / total) as u64;
                    expand(splits, *r, child_bp, depth + 1, out);
                }
                return;
            }
        }
    }
    out.push(LeafShare {
        recipient,
        share_bp,
    });
}

fn is_well_formed(split: &SplitShares) -> bool {
    !split.recipients.is_empty()
        && split.recipients.len() == split.shares_bp.len()
        && split.recipients.len() <= MAX_ROYALTY_RECIPIENTS
        && split.shares_bp.iter().any(|&s| s > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_types::mock::TableSplits;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    #[test]
    fn empty_set_flattens_to_nothing() {
        let splits = TableSplits::new();
        assert!(flatten_recipients(&splits, &[], &[]).is_empty());
    }

    #[test]
    fn single_recipient_without_share_gets_full() {
        let splits = TableSplits::new();
        let leaves = flatten_recipients(&splits, &[addr(1)], &[]);
        assert_eq!(
            leaves,
            vec![LeafShare {
                recipient: addr(1),
                share_bp: BASIS_POINTS
            }]
        );
    }

    #[test]
    fn shares_renormalize_against_own_total() {
        // 1 + 3 = 4, not 10000: renormalized to 25% / 75%.
        let splits = TableSplits::new();
        let leaves = flatten_recipients(&splits, &[addr(1), addr(2)], &[1, 3]);
        assert_eq!(leaves[0].share_bp, 2_500);
        assert_eq!(leaves[1].share_bp, 7_500);
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let splits = TableSplits::new();
        assert!(flatten_recipients(&splits, &[addr(1), addr(2)], &[10_000]).is_empty());
    }

    #[test]
    fn zero_total_is_malformed() {
        let splits = TableSplits::new();
        assert!(flatten_recipients(&splits, &[addr(1), addr(2)], &[0, 0]).is_empty());
    }

    #[test]
    fn nested_split_is_flattened_proportionally() {
        let mut splits = TableSplits::new();
        // addr(9) is a 50/50 split between addr(3) and addr(4).
        splits.set_split(addr(9), vec![addr(3), addr(4)], vec![5_000, 5_000]);

        let leaves = flatten_recipients(&splits, &[addr(1), addr(9)], &[5_000, 5_000]);
        assert_eq!(leaves.len(), 3);
        assert_eq!(leaves[0], LeafShare { recipient: addr(1), share_bp: 5_000 });
        assert_eq!(leaves[1], LeafShare { recipient: addr(3), share_bp: 2_500 });
        assert_eq!(leaves[2], LeafShare { recipient: addr(4), share_bp: 2_500 });
    }

    #[test]
    fn malformed_split_is_treated_as_plain_address() {
        let mut splits = TableSplits::new();
        // Length mismatch inside the probed split.
        splits.set_split(addr(9), vec![addr(3), addr(4)], vec![5_000]);

        let leaves = flatten_recipients(&splits, &[addr(9)], &[10_000]);
        assert_eq!(
            leaves,
            vec![LeafShare {
                recipient: addr(9),
                share_bp: BASIS_POINTS
            }]
        );
    }

    #[test]
    fn self_referencing_split_stops_at_depth_cap() {
        let mut splits = TableSplits::new();
        // addr(9) fans out to itself — recursion must terminate.
        splits.set_split(addr(9), vec![addr(9)], vec![10_000]);

        let leaves = flatten_recipients(&splits, &[addr(9)], &[10_000]);
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].recipient, addr(9));
        assert_eq!(leaves[0].share_bp, BASIS_POINTS);
    }

    #[test]
    fn normalization_tolerance_is_bounded() {
        // Three equal shares of 10000/3: floors lose at most count-1 bp.
        let splits = TableSplits::new();
        let leaves = flatten_recipients(&splits, &[addr(1), addr(2), addr(3)], &[7, 7, 7]);
        let sum: u64 = leaves.iter().map(|l| l.share_bp).sum();
        assert!(sum <= BASIS_POINTS);
        assert!(BASIS_POINTS - sum <= 2);
    }
}
