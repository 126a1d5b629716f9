//! Bounty comment detection and amount extraction
//!
//! A bounty comment carries the `/bounty` trigger somewhere in the body,
//! followed by a dollar amount, e.g. `/bounty $50` or `/bounty $12.50`.

use lazy_static::lazy_static;
use regex::Regex;

/// Textual trigger an admin uses to award a bounty.
const BOUNTY_TRIGGER: &str = "/bounty";

lazy_static! {
    /// First dollar amount in the comment: integer or up to two decimals.
    static ref AMOUNT_RE: Regex =
        Regex::new(r"\$\s*([0-9]+(?:\.[0-9]{1,2})?)").expect("valid amount regex");
}

/// Check whether a comment body contains the bounty trigger.
pub fn is_bounty_comment(body: &str) -> bool {
    body.contains(BOUNTY_TRIGGER)
}

/// Extract the bounty amount from a comment body.
///
/// Returns `None` when the trigger is absent or no dollar amount parses.
pub fn extract_amount(body: &str) -> Option<f64> {
    if !is_bounty_comment(body) {
        return None;
    }
    let caps = AMOUNT_RE.captures(body)?;
    caps[1].parse().ok()
}
