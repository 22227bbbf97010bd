//! A Rust library for reading wireless interface parameters from the Linux kernel.
//!
//! This crate provides a synchronous API over the wireless-extensions ioctl
//! surface:
//!
//! - Enumerating network interfaces and detecting wireless ones
//! - Reading operating parameters (protocol, ESSID, access point, bit rate,
//!   transmit power)
//! - Reading live statistics and hardware capability ranges, with gating of
//!   fields the driver marked invalid
//! - Converting raw kernel values into display units (dBm, scaled bit rates)
//!
//! # Example
//!
//! ```no_run
//! use iwrs::{InterfaceSurvey, WirelessInfo};
//!
//! # fn example() -> iwrs::Result<()> {
//! let wi = WirelessInfo::new()?;
//!
//! // Report every interface on the host
//! for survey in wi.survey_all()? {
//!     match survey {
//!         InterfaceSurvey::Wireless(report) => println!("{report}"),
//!         InterfaceSurvey::NotWireless { name } => println!("{name}: not wireless"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, QueryError>`. `NotWireless` is the
//! expected outcome of probing a non-wireless interface, not a failure.
//! Per-query ioctl failures are reported as `Ioctl` with the failing
//! operation named; a failure on one query never aborts the others for the
//! same interface, since drivers commonly implement only a subset of the
//! query set.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To
//! see log output, add a logging implementation like `env_logger`.

// Internal implementation modules
mod constants;
mod enumerate;

// Public API modules
pub mod convert;
pub mod models;
pub mod report;
pub mod wext;
pub mod wireless_info;

// Re-exported public API
pub use convert::{format_bitrate, format_txpower, mwatt_to_dbm};
pub use models::{
    DiscardCounters, HardwareAddr, InterfaceDescriptor, LinkQuality, QualityRange, QualityUpdate,
    QueryError, TxPower, TxPowerFlags, WirelessStats,
};
pub use report::{InterfaceReport, InterfaceSurvey, survey};
pub use wext::{KernelQueries, WirelessSocket};
pub use wireless_info::WirelessInfo;

/// A specialized `Result` type for wireless query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
