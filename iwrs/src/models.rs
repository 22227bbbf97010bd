use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::io;
use thiserror::Error;

use crate::constants::units;

bitflags! {
    /// Validity bits attached to a [`LinkQuality`] sample.
    ///
    /// Drivers set the `*_UPDATED` bits for fields refreshed since the last
    /// read and the `*_INVALID` bits for fields they cannot measure at all.
    /// A field whose invalid bit is set carries no meaning and must not be
    /// reported as a number.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct QualityUpdate: u8 {
        const QUAL_UPDATED = 0x01;
        const LEVEL_UPDATED = 0x02;
        const NOISE_UPDATED = 0x04;
        const DBM = 0x08;
        const QUAL_INVALID = 0x10;
        const LEVEL_INVALID = 0x20;
        const NOISE_INVALID = 0x40;
        const RCPI = 0x80;
    }
}

bitflags! {
    /// Encoding flags of a [`TxPower`] parameter.
    ///
    /// dBm encoding is the absence of `MWATT`; `RELATIVE` values carry no
    /// unit at all.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TxPowerFlags: u16 {
        const MWATT = 0x0001;
        const RELATIVE = 0x0002;
        const RANGE = 0x1000;
    }
}

/// One link-quality sample: relative quality plus raw signal and noise.
///
/// `level` and `noise` are the raw byte values as reported by the driver;
/// use [`signal_dbm`](Self::signal_dbm) and [`noise_dbm`](Self::noise_dbm)
/// to obtain calibrated dBm readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkQuality {
    /// Relative quality, scale bounded by the device's reported range.
    pub quality: u8,
    /// Raw signal level.
    pub level: u8,
    /// Raw noise level.
    pub noise: u8,
    /// Which of the three fields are valid for this sample.
    pub updated: QualityUpdate,
}

impl LinkQuality {
    /// Returns the quality value, or `None` if the driver marked it invalid.
    pub fn quality_reported(&self) -> Option<u8> {
        (!self.updated.contains(QualityUpdate::QUAL_INVALID)).then_some(self.quality)
    }

    /// Returns the signal level in dBm, or `None` if marked invalid.
    ///
    /// Raw values sit above the true reading by 256 so they fit a byte;
    /// the shift is undone here.
    pub fn signal_dbm(&self) -> Option<i32> {
        (!self.updated.contains(QualityUpdate::LEVEL_INVALID))
            .then_some(i32::from(self.level) - units::DBM_OFFSET)
    }

    /// Returns the noise level in dBm, or `None` if marked invalid.
    pub fn noise_dbm(&self) -> Option<i32> {
        (!self.updated.contains(QualityUpdate::NOISE_INVALID))
            .then_some(i32::from(self.noise) - units::DBM_OFFSET)
    }
}

/// Receive/transmit discard counters for one interface.
///
/// All counters are monotonically non-decreasing over the device's uptime;
/// a snapshot carries totals, not rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardCounters {
    /// Frames dropped for a wrong network id.
    pub nwid: u32,
    /// Frames dropped because decryption failed.
    pub crypt: u32,
    /// Frames dropped during reassembly.
    pub fragment: u32,
    /// Transmissions abandoned after excessive retries.
    pub retries: u32,
    /// Everything else the driver discarded.
    pub misc: u32,
}

/// Point-in-time statistics snapshot for a wireless interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessStats {
    /// Opaque vendor-defined status word.
    pub status: u16,
    /// Current link quality sample.
    pub quality: LinkQuality,
    /// Discard counters.
    pub discard: DiscardCounters,
    /// Missed beacon count.
    pub missed_beacons: u32,
}

/// Hardware capability bounds: the best and typical quality the device can
/// report. These are limits, not live values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityRange {
    pub max_quality: LinkQuality,
    pub avg_quality: LinkQuality,
}

/// Transmit-power parameter as reported by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPower {
    /// Power value; interpretation depends on `flags`.
    pub value: i32,
    /// Radio transmit disabled.
    pub disabled: bool,
    /// Encoding of `value`.
    pub flags: TxPowerFlags,
}

/// A 6-byte link-layer address with the sentinel values some drivers report
/// in place of a real access point address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HardwareAddr([u8; 6]);

impl HardwareAddr {
    const ZERO: [u8; 6] = [0x00; 6];
    const BROADCAST: [u8; 6] = [0xFF; 6];
    // Orinoco/PrismII firmware reports all-0x44 when there is no AP.
    const NONE: [u8; 6] = [0x44; 6];

    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Whether this is one of the sentinel patterns rather than a real
    /// station address.
    pub fn is_sentinel(&self) -> bool {
        matches!(self.0, Self::ZERO | Self::BROADCAST | Self::NONE)
    }
}

impl Display for HardwareAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Self::ZERO => write!(f, "Not-Associated"),
            Self::BROADCAST => write!(f, "Invalid"),
            Self::NONE => write!(f, "None"),
            [a, b, c, d, e, g] => {
                write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
            }
        }
    }
}

/// One entry from the local interface listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    /// Kernel interface name.
    pub name: String,
    /// Whether the interface answered the wireless protocol probe.
    pub is_wireless: bool,
    /// Protocol name, populated only for wireless interfaces.
    pub protocol: Option<String>,
}

/// Errors that can occur during wireless query operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query socket could not be opened.
    #[error("failed to open query socket: {0}")]
    Socket(#[source] io::Error),

    /// The interface exists but does not answer wireless queries. This is
    /// the expected outcome of probing a wired or virtual interface.
    #[error("no wireless extensions")]
    NotWireless,

    /// A single query failed; other queries for the same interface may
    /// still succeed.
    #[error("{context}: {source}")]
    Ioctl {
        context: String,
        source: io::Error,
    },

    /// The local interface listing itself failed. Nothing can be reported.
    #[error("failed to enumerate network interfaces: {0}")]
    Enumeration(#[source] io::Error),

    /// Invalid UTF-8 in an ESSID or protocol name.
    #[error("invalid UTF-8 in string from driver: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardware_addr_not_associated() {
        let addr = HardwareAddr::new([0x00; 6]);
        assert_eq!(format!("{addr}"), "Not-Associated");
        assert!(addr.is_sentinel());
    }

    #[test]
    fn hardware_addr_invalid() {
        let addr = HardwareAddr::new([0xFF; 6]);
        assert_eq!(format!("{addr}"), "Invalid");
        assert!(addr.is_sentinel());
    }

    #[test]
    fn hardware_addr_none() {
        let addr = HardwareAddr::new([0x44; 6]);
        assert_eq!(format!("{addr}"), "None");
        assert!(addr.is_sentinel());
    }

    #[test]
    fn hardware_addr_hex() {
        let addr = HardwareAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(format!("{addr}"), "00:11:22:33:44:55");
        assert!(!addr.is_sentinel());
    }

    #[test]
    fn hardware_addr_hex_uppercase_fixed_width() {
        let addr = HardwareAddr::new([0xAB, 0x0C, 0x01, 0xDE, 0xF0, 0x9A]);
        assert_eq!(format!("{addr}"), "AB:0C:01:DE:F0:9A");
    }

    #[test]
    fn quality_reported_when_valid() {
        let qual = LinkQuality {
            quality: 70,
            level: 216,
            noise: 161,
            updated: QualityUpdate::QUAL_UPDATED | QualityUpdate::LEVEL_UPDATED,
        };
        assert_eq!(qual.quality_reported(), Some(70));
    }

    #[test]
    fn quality_gated_when_invalid() {
        let qual = LinkQuality {
            quality: 70,
            level: 0,
            noise: 0,
            updated: QualityUpdate::QUAL_INVALID,
        };
        assert_eq!(qual.quality_reported(), None);
    }

    #[test]
    fn signal_dbm_applies_offset() {
        // 216 - 256 = -40 dBm
        let qual = LinkQuality {
            quality: 0,
            level: 216,
            noise: 0,
            updated: QualityUpdate::empty(),
        };
        assert_eq!(qual.signal_dbm(), Some(-40));
    }

    #[test]
    fn noise_dbm_applies_offset() {
        // 161 - 256 = -95 dBm
        let qual = LinkQuality {
            quality: 0,
            level: 0,
            noise: 161,
            updated: QualityUpdate::empty(),
        };
        assert_eq!(qual.noise_dbm(), Some(-95));
    }

    #[test]
    fn signal_and_noise_gated_when_invalid() {
        let qual = LinkQuality {
            quality: 0,
            level: 216,
            noise: 161,
            updated: QualityUpdate::LEVEL_INVALID | QualityUpdate::NOISE_INVALID,
        };
        assert_eq!(qual.signal_dbm(), None);
        assert_eq!(qual.noise_dbm(), None);
    }

    #[test]
    fn range_quality_uses_same_gating() {
        let range = QualityRange {
            max_quality: LinkQuality {
                quality: 70,
                level: 0,
                noise: 0,
                updated: QualityUpdate::LEVEL_INVALID,
            },
            avg_quality: LinkQuality::default(),
        };
        assert_eq!(range.max_quality.quality_reported(), Some(70));
        assert_eq!(range.max_quality.signal_dbm(), None);
    }

    #[test]
    fn txpower_flags_from_raw_bits() {
        let flags = TxPowerFlags::from_bits_retain(0x0002);
        assert!(flags.contains(TxPowerFlags::RELATIVE));
        assert!(!flags.contains(TxPowerFlags::MWATT));
    }

    #[test]
    fn query_error_display() {
        assert_eq!(format!("{}", QueryError::NotWireless), "no wireless extensions");

        let err = QueryError::Ioctl {
            context: "failed to read bit rate for wlan0".to_string(),
            source: io::Error::from_raw_os_error(libc::EPERM),
        };
        let text = format!("{err}");
        assert!(text.starts_with("failed to read bit rate for wlan0: "));
    }
}
