//! Unit conversion and display formatting for raw wireless values.
//!
//! Provides helpers for turning the integer values the kernel reports into
//! human-meaningful units: milliwatt power to dBm, bit rates to scaled
//! strings, transmit-power parameters to their display form.

use crate::constants::units;
use crate::models::{TxPower, TxPowerFlags};

/// Converts a power value in milliwatts to dBm, rounding up.
///
/// Equivalent to `ceil(10 * log10(mwatt))`, computed iteratively: powers of
/// ten are stripped first so rounding error cannot accumulate across the
/// fractional loop. The caller must pass a positive value.
pub fn mwatt_to_dbm(mwatt: i32) -> i32 {
    let mut value = f64::from(mwatt);
    let mut dbm = 0;

    while value > 10.0 {
        dbm += 10;
        value /= 10.0;
    }
    while value > units::DBM_CEIL_EPSILON {
        dbm += 1;
        value /= units::LOG10_MAGIC;
    }
    dbm
}

/// Formats a bit rate in bits per second with a magnitude-appropriate
/// prefix: `"1 kb/s"`, `"54 Mb/s"`, `"1 Gb/s"`.
pub fn format_bitrate(bps: u64) -> String {
    let rate = bps as f64;
    let (divisor, scale) = if rate >= units::GIGA {
        (units::GIGA, 'G')
    } else if rate >= units::MEGA {
        (units::MEGA, 'M')
    } else {
        (units::KILO, 'k')
    };
    format!("{} {}b/s", rate / divisor, scale)
}

/// Formats a transmit-power parameter.
///
/// Disabled radios render as `"off"`. Relative values have no unit and
/// render as the bare number. Everything else is normalized to dBm,
/// converting from milliwatts when the parameter is milliwatt-encoded.
pub fn format_txpower(txpower: &TxPower) -> String {
    if txpower.disabled {
        return "off".to_string();
    }
    if txpower.flags.contains(TxPowerFlags::RELATIVE) {
        return txpower.value.to_string();
    }

    let dbm = if txpower.flags.contains(TxPowerFlags::MWATT) {
        mwatt_to_dbm(txpower.value)
    } else {
        txpower.value
    };
    format!("{dbm} dBm")
}
