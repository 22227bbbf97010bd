//! Per-interface wireless report: query aggregation and rendering.
//!
//! [`survey`] drives the full query sequence for one interface. Queries are
//! independent: a driver that answers the probe but implements only part of
//! the query set still yields a report, with the failed fields carried as
//! errors and rendered as skip notices.

use log::warn;
use std::fmt::{self, Display, Formatter};

use crate::Result;
use crate::convert::{format_bitrate, format_txpower};
use crate::models::{HardwareAddr, QualityRange, TxPower, WirelessStats};
use crate::wext::KernelQueries;

/// Everything one query cycle produced for a wireless interface.
///
/// Fields hold per-query outcomes; a failed query keeps its error so the
/// rendered report can say which value is missing and why.
#[derive(Debug)]
pub struct InterfaceReport {
    pub name: String,
    pub protocol: String,
    pub essid: Result<String>,
    pub access_point: Result<HardwareAddr>,
    pub bitrate: Result<u64>,
    pub txpower: Result<TxPower>,
    pub statistics: Result<WirelessStats>,
    pub range: Result<QualityRange>,
}

/// Result of surveying one interface during a full enumeration run.
#[derive(Debug)]
pub enum InterfaceSurvey {
    Wireless(InterfaceReport),
    NotWireless { name: String },
}

/// Surveys one interface.
///
/// The protocol probe runs first; a refusal classifies the interface as
/// non-wireless and nothing else is queried. On success the remaining six
/// queries are each attempted exactly once, failures logged and recorded
/// without stopping the rest.
pub fn survey<Q: KernelQueries + ?Sized>(queries: &Q, name: &str) -> Result<InterfaceReport> {
    let protocol = queries.protocol_name(name)?;
    Ok(survey_wireless(queries, name, protocol))
}

pub(crate) fn survey_wireless<Q: KernelQueries + ?Sized>(
    queries: &Q,
    name: &str,
    protocol: String,
) -> InterfaceReport {
    InterfaceReport {
        name: name.to_string(),
        protocol,
        essid: noted(queries.essid(name), name, "ESSID"),
        access_point: noted(queries.access_point(name), name, "access point"),
        bitrate: noted(queries.bitrate(name), name, "bit rate"),
        txpower: noted(queries.txpower(name), name, "transmit power"),
        statistics: noted(queries.statistics(name), name, "statistics"),
        range: noted(queries.range(name), name, "quality range"),
    }
}

fn noted<T>(result: Result<T>, name: &str, what: &str) -> Result<T> {
    if let Err(e) = &result {
        warn!("{name}: {what} query failed: {e}");
    }
    result
}

impl Display for InterfaceReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Interface {} is wireless: {}", self.name, self.protocol)?;

        match &self.essid {
            Ok(essid) => writeln!(f, "ESSID: {essid}")?,
            Err(e) => writeln!(f, "Could not get ESSID: {e}")?,
        }
        match &self.access_point {
            Ok(addr) => writeln!(f, "Access Point: {addr}")?,
            Err(e) => writeln!(f, "Could not get access point: {e}")?,
        }
        match &self.bitrate {
            Ok(bps) => writeln!(f, "Bit Rate: {}", format_bitrate(*bps))?,
            Err(e) => writeln!(f, "Could not get bit rate: {e}")?,
        }
        match &self.txpower {
            Ok(txpower) => writeln!(f, "Transmit Power: {}", format_txpower(txpower))?,
            Err(e) => writeln!(f, "Could not get transmit power: {e}")?,
        }
        writeln!(f, "--------")?;

        match &self.statistics {
            Ok(stats) => fmt_statistics(f, stats)?,
            Err(e) => writeln!(f, "Could not get statistics: {e}")?,
        }
        writeln!(f, "--------")?;

        match &self.range {
            Ok(range) => fmt_range(f, range),
            Err(e) => write!(f, "Could not get quality range: {e}"),
        }
    }
}

fn fmt_quality_line(
    f: &mut Formatter<'_>,
    label: &str,
    value: Option<impl Display>,
    unit: &str,
) -> fmt::Result {
    match value {
        Some(v) => writeln!(f, "{label}: {v}{unit}"),
        None => writeln!(f, "{label} not reported"),
    }
}

fn fmt_statistics(f: &mut Formatter<'_>, stats: &WirelessStats) -> fmt::Result {
    writeln!(f, "Status: {:x}", stats.status)?;
    fmt_quality_line(f, "Quality", stats.quality.quality_reported(), "")?;
    fmt_quality_line(f, "Signal Level", stats.quality.signal_dbm(), " dBm")?;
    fmt_quality_line(f, "Noise Level", stats.quality.noise_dbm(), " dBm")?;
    writeln!(f, "Rx invalid nwid: {}", stats.discard.nwid)?;
    writeln!(f, "Rx invalid crypt: {}", stats.discard.crypt)?;
    writeln!(f, "Rx invalid frag: {}", stats.discard.fragment)?;
    writeln!(f, "Tx excessive retries: {}", stats.discard.retries)?;
    writeln!(f, "Invalid misc: {}", stats.discard.misc)?;
    writeln!(f, "Missed beacon: {}", stats.missed_beacons)?;
    writeln!(f, "Updated: {:x}", stats.quality.updated.bits())
}

fn fmt_range(f: &mut Formatter<'_>, range: &QualityRange) -> fmt::Result {
    fmt_quality_line(f, "Max Quality", range.max_quality.quality_reported(), "")?;
    fmt_quality_line(f, "Avg Quality", range.avg_quality.quality_reported(), "")?;
    fmt_quality_line(f, "Max Signal Level", range.max_quality.signal_dbm(), " dBm")?;
    last_quality_line(f, "Max Noise Level", range.max_quality.noise_dbm(), " dBm")
}

fn last_quality_line(
    f: &mut Formatter<'_>,
    label: &str,
    value: Option<impl Display>,
    unit: &str,
) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{label}: {v}{unit}"),
        None => write!(f, "{label} not reported"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiscardCounters, LinkQuality, QualityUpdate};

    fn sample_stats() -> WirelessStats {
        WirelessStats {
            status: 0,
            quality: LinkQuality {
                quality: 70,
                level: 216,
                noise: 161,
                updated: QualityUpdate::QUAL_UPDATED
                    | QualityUpdate::LEVEL_UPDATED
                    | QualityUpdate::NOISE_UPDATED,
            },
            discard: DiscardCounters {
                nwid: 1,
                crypt: 2,
                fragment: 3,
                retries: 4,
                misc: 5,
            },
            missed_beacons: 6,
        }
    }

    fn sample_report() -> InterfaceReport {
        InterfaceReport {
            name: "wlp3s0".to_string(),
            protocol: "IEEE 802.11".to_string(),
            essid: Ok("corp-net".to_string()),
            access_point: Ok(HardwareAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55])),
            bitrate: Ok(54_000_000),
            txpower: Ok(TxPower::default()),
            statistics: Ok(sample_stats()),
            range: Ok(QualityRange {
                max_quality: LinkQuality {
                    quality: 70,
                    level: 0,
                    noise: 0,
                    updated: QualityUpdate::LEVEL_INVALID | QualityUpdate::NOISE_INVALID,
                },
                avg_quality: LinkQuality {
                    quality: 35,
                    level: 0,
                    noise: 0,
                    updated: QualityUpdate::empty(),
                },
            }),
        }
    }

    #[test]
    fn report_renders_labeled_block() {
        let text = format!("{}", sample_report());
        assert!(text.starts_with("Interface wlp3s0 is wireless: IEEE 802.11\n"));
        assert!(text.contains("ESSID: corp-net\n"));
        assert!(text.contains("Access Point: 00:11:22:33:44:55\n"));
        assert!(text.contains("Bit Rate: 54 Mb/s\n"));
        assert!(text.contains("Signal Level: -40 dBm\n"));
        assert!(text.contains("Noise Level: -95 dBm\n"));
        assert!(text.contains("Tx excessive retries: 4\n"));
        assert_eq!(text.matches("--------\n").count(), 2);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn report_gates_invalid_range_levels() {
        let text = format!("{}", sample_report());
        assert!(text.contains("Max Quality: 70\n"));
        assert!(text.contains("Avg Quality: 35\n"));
        assert!(text.contains("Max Signal Level not reported\n"));
        assert!(text.ends_with("Max Noise Level not reported"));
    }

    #[test]
    fn report_renders_gated_statistics_as_not_reported() {
        let mut report = sample_report();
        let mut stats = sample_stats();
        stats.quality.updated = QualityUpdate::QUAL_INVALID
            | QualityUpdate::LEVEL_INVALID
            | QualityUpdate::NOISE_INVALID;
        report.statistics = Ok(stats);

        let text = format!("{report}");
        assert!(text.contains("\nQuality not reported\n"));
        assert!(text.contains("\nSignal Level not reported\n"));
        assert!(text.contains("\nNoise Level not reported\n"));
        assert!(!text.contains("\nQuality: "));
        assert!(!text.contains("\nSignal Level: "));
    }

    #[test]
    fn report_renders_failure_notice_per_field() {
        let mut report = sample_report();
        report.bitrate = Err(crate::models::QueryError::Ioctl {
            context: "failed to read bit rate for wlp3s0".to_string(),
            source: std::io::Error::from_raw_os_error(libc::EOPNOTSUPP),
        });

        let text = format!("{report}");
        assert!(text.contains("Could not get bit rate: failed to read bit rate for wlp3s0"));
        // The failure must not swallow neighbouring fields.
        assert!(text.contains("Transmit Power: "));
    }
}
