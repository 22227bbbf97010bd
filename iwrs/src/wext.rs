//! Bindings to the kernel's wireless-extensions ioctl surface.
//!
//! This is the only module that talks to the kernel. Each SIOCGIW* read
//! request gets one method on [`WirelessSocket`]; the [`KernelQueries`]
//! trait abstracts the set so higher layers can be exercised against a
//! stub. All requests go through a single datagram socket that lives for
//! the duration of the run.
#![allow(unsafe_code)]

use std::io;
use std::mem;
use std::os::fd::{AsRawFd, OwnedFd};
use std::ptr;
use std::str;

use libc::{c_ulong, c_void, sockaddr};
use nix::sys::socket::{AddressFamily, SockFlag, SockType, socket};

use crate::Result;
use crate::constants::{limits, requests};
use crate::models::{
    DiscardCounters, HardwareAddr, LinkQuality, QualityRange, QualityUpdate, QueryError, TxPower,
    TxPowerFlags, WirelessStats,
};

/// The read-only query set of the wireless-extensions interface.
///
/// [`WirelessSocket`] is the live implementation; tests substitute stubs.
/// Every method takes the kernel interface name and performs exactly one
/// query attempt, blocking until the kernel answers.
pub trait KernelQueries {
    /// Probes for the wireless protocol name. Any refusal means the
    /// interface has no wireless extensions; that outcome is
    /// [`QueryError::NotWireless`], not a failure.
    fn protocol_name(&self, name: &str) -> Result<String>;

    /// Reads the current ESSID.
    fn essid(&self, name: &str) -> Result<String>;

    /// Reads the associated access point address.
    fn access_point(&self, name: &str) -> Result<HardwareAddr>;

    /// Reads the current bit rate in bits per second.
    fn bitrate(&self, name: &str) -> Result<u64>;

    /// Reads the transmit-power parameter.
    fn txpower(&self, name: &str) -> Result<TxPower>;

    /// Reads the statistics snapshot.
    fn statistics(&self, name: &str) -> Result<WirelessStats>;

    /// Reads the quality capability range.
    fn range(&self, name: &str) -> Result<QualityRange>;
}

// C ABI mirrors of the wireless.h structures the queries exchange with the
// kernel. Field names follow the kernel's.

#[repr(C)]
#[derive(Clone, Copy, Default)]
#[allow(dead_code)]
struct IwParam {
    value: i32,
    fixed: u8,
    disabled: u8,
    flags: u16,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
struct IwQuality {
    qual: u8,
    level: u8,
    noise: u8,
    updated: u8,
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
struct IwPoint {
    pointer: *mut c_void,
    length: u16,
    flags: u16,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
struct IwDiscarded {
    nwid: u32,
    code: u32,
    fragment: u32,
    retries: u32,
    misc: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
struct IwMissed {
    beacon: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
struct IwStatistics {
    status: u16,
    qual: IwQuality,
    discard: IwDiscarded,
    miss: IwMissed,
}

/// Leading fields of `struct iw_range`; the kernel reply is larger but
/// everything past `avg_qual` is channel/encoding capability data this
/// crate does not consume.
#[repr(C)]
#[derive(Clone, Copy, Default)]
#[allow(dead_code)]
struct IwRangePrefix {
    throughput: u32,
    min_nwid: u32,
    max_nwid: u32,
    old_num_channels: u16,
    old_num_frequency: u8,
    scan_capa: u8,
    event_capa: [u32; 6],
    sensitivity: i32,
    max_qual: IwQuality,
    avg_qual: IwQuality,
}

#[repr(C)]
#[allow(dead_code)]
union IwReqData {
    name: [u8; limits::IFNAMSIZ],
    essid: IwPoint,
    bitrate: IwParam,
    txpower: IwParam,
    ap_addr: sockaddr,
    data: IwPoint,
}

#[repr(C)]
struct IwReq {
    ifr_name: [u8; limits::IFNAMSIZ],
    u: IwReqData,
}

impl IwReq {
    /// Zeroed request with the interface name copied into the fixed name
    /// slot. Oversized names are truncated, never overflowed; a byte is
    /// always left for the trailing NUL.
    fn for_interface(name: &str) -> Self {
        let mut req: IwReq = unsafe { mem::zeroed() };
        let bytes = name.as_bytes();
        let len = bytes.len().min(limits::IFNAMSIZ - 1);
        req.ifr_name[..len].copy_from_slice(&bytes[..len]);
        req
    }
}

impl From<IwQuality> for LinkQuality {
    fn from(qual: IwQuality) -> Self {
        Self {
            quality: qual.qual,
            level: qual.level,
            noise: qual.noise,
            updated: QualityUpdate::from_bits_retain(qual.updated),
        }
    }
}

/// Owned query socket for wireless-extensions ioctls.
///
/// The kernel routes these requests by interface name, so one socket
/// serves every interface; it is closed when the value drops.
pub struct WirelessSocket {
    fd: OwnedFd,
}

impl WirelessSocket {
    /// Opens the query socket.
    pub fn new() -> Result<Self> {
        let fd = socket(
            AddressFamily::Inet,
            SockType::Datagram,
            SockFlag::empty(),
            None,
        )
        .map_err(|e| QueryError::Socket(e.into()))?;
        Ok(Self { fd })
    }

    fn request(&self, cmd: c_ulong, req: &mut IwReq, context: &str, name: &str) -> Result<()> {
        let ret = unsafe { libc::ioctl(self.fd.as_raw_fd(), cmd, ptr::from_mut(req)) };
        if ret < 0 {
            return Err(QueryError::Ioctl {
                context: format!("{context} for {name}"),
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

impl KernelQueries for WirelessSocket {
    fn protocol_name(&self, name: &str) -> Result<String> {
        let mut req = IwReq::for_interface(name);
        let ret = unsafe {
            libc::ioctl(
                self.fd.as_raw_fd(),
                requests::SIOCGIWNAME,
                ptr::from_mut(&mut req),
            )
        };
        if ret < 0 {
            return Err(QueryError::NotWireless);
        }
        let raw = unsafe { req.u.name };
        Ok(nul_terminated_str(&raw)?.to_string())
    }

    fn essid(&self, name: &str) -> Result<String> {
        let mut buf = [0u8; limits::ESSID_MAX_SIZE + 2];
        let mut req = IwReq::for_interface(name);
        req.u.essid = IwPoint {
            pointer: buf.as_mut_ptr().cast(),
            length: buf.len() as u16,
            flags: 0,
        };
        self.request(requests::SIOCGIWESSID, &mut req, "failed to read ESSID", name)?;

        // The kernel rewrites length to the number of bytes it produced.
        let len = usize::from(unsafe { req.u.essid.length }).min(buf.len());
        let mut bytes = &buf[..len];
        while let [head @ .., 0] = bytes {
            bytes = head;
        }
        Ok(str::from_utf8(bytes)?.to_string())
    }

    fn access_point(&self, name: &str) -> Result<HardwareAddr> {
        let mut req = IwReq::for_interface(name);
        self.request(
            requests::SIOCGIWAP,
            &mut req,
            "failed to read access point address",
            name,
        )?;

        let sa_data = unsafe { req.u.ap_addr.sa_data };
        let mut octets = [0u8; 6];
        for (dst, src) in octets.iter_mut().zip(sa_data.iter()) {
            *dst = *src as u8;
        }
        Ok(HardwareAddr::new(octets))
    }

    fn bitrate(&self, name: &str) -> Result<u64> {
        let mut req = IwReq::for_interface(name);
        self.request(
            requests::SIOCGIWRATE,
            &mut req,
            "failed to read bit rate",
            name,
        )?;

        let param = unsafe { req.u.bitrate };
        Ok(param.value.max(0) as u64)
    }

    fn txpower(&self, name: &str) -> Result<TxPower> {
        let mut req = IwReq::for_interface(name);
        self.request(
            requests::SIOCGIWTXPOW,
            &mut req,
            "failed to read transmit power",
            name,
        )?;

        let param = unsafe { req.u.txpower };
        Ok(TxPower {
            value: param.value,
            disabled: param.disabled != 0,
            flags: TxPowerFlags::from_bits_retain(param.flags),
        })
    }

    fn statistics(&self, name: &str) -> Result<WirelessStats> {
        let mut stats = IwStatistics::default();
        let mut req = IwReq::for_interface(name);
        req.u.data = IwPoint {
            pointer: ptr::from_mut(&mut stats).cast(),
            length: mem::size_of::<IwStatistics>() as u16,
            flags: 1,
        };
        self.request(
            requests::SIOCGIWSTATS,
            &mut req,
            "failed to read statistics",
            name,
        )?;

        Ok(WirelessStats {
            status: stats.status,
            quality: stats.qual.into(),
            discard: DiscardCounters {
                nwid: stats.discard.nwid,
                crypt: stats.discard.code,
                fragment: stats.discard.fragment,
                retries: stats.discard.retries,
                misc: stats.discard.misc,
            },
            missed_beacons: stats.miss.beacon,
        })
    }

    fn range(&self, name: &str) -> Result<QualityRange> {
        let mut buf = [0u8; limits::RANGE_BUF_SIZE];
        let mut req = IwReq::for_interface(name);
        req.u.data = IwPoint {
            pointer: buf.as_mut_ptr().cast(),
            length: buf.len() as u16,
            flags: 0,
        };
        self.request(
            requests::SIOCGIWRANGE,
            &mut req,
            "failed to read quality range",
            name,
        )?;

        let prefix = unsafe { ptr::read_unaligned(buf.as_ptr().cast::<IwRangePrefix>()) };
        Ok(QualityRange {
            max_quality: prefix.max_qual.into(),
            avg_quality: prefix.avg_qual.into(),
        })
    }
}

fn nul_terminated_str(raw: &[u8]) -> Result<&str> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    Ok(str::from_utf8(&raw[..end])?)
}
