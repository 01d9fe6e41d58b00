//! Mobile number validation and masking utilities
//!
//! RideLink accounts are keyed by local 10-digit mobile numbers; the
//! country prefix is applied by the notifier at delivery time.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regular expression for a local 10-digit mobile number
static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").unwrap());

/// Validates a local 10-digit mobile number
///
/// # Examples
///
/// ```
/// use rl_shared::utils::phone::is_valid_mobile;
///
/// assert!(is_valid_mobile("9876543210"));
/// assert!(!is_valid_mobile("98765"));
/// assert!(!is_valid_mobile("98765432101"));
/// assert!(!is_valid_mobile("98765abc10"));
/// ```
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_REGEX.is_match(mobile)
}

/// Masks a mobile number for logging, keeping only the last four digits
///
/// # Examples
///
/// ```
/// use rl_shared::utils::phone::mask_mobile;
///
/// assert_eq!(mask_mobile("9876543210"), "******3210");
/// assert_eq!(mask_mobile("987"), "****");
/// ```
pub fn mask_mobile(mobile: &str) -> String {
    if mobile.len() <= 4 {
        "****".to_string()
    } else {
        let visible = &mobile[mobile.len() - 4..];
        format!("{}{}", "*".repeat(mobile.len() - 4), visible)
    }
}
