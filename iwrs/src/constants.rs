//! Constants for the Linux wireless-extensions ioctl interface.
//!
//! These values correspond to the request numbers and protocol limits
//! published by the kernel's wireless-extensions ABI (`linux/wireless.h`).

/// Wireless-extensions ioctl request numbers (the SIOCGIW* read family).
pub mod requests {
    use libc::c_ulong;

    pub const SIOCGIWNAME: c_ulong = 0x8B01;
    pub const SIOCGIWRANGE: c_ulong = 0x8B0B;
    pub const SIOCGIWSTATS: c_ulong = 0x8B0F;
    pub const SIOCGIWAP: c_ulong = 0x8B15;
    pub const SIOCGIWESSID: c_ulong = 0x8B1B;
    pub const SIOCGIWRATE: c_ulong = 0x8B21;
    pub const SIOCGIWTXPOW: c_ulong = 0x8B27;
}

/// Fixed buffer limits of the wireless-extensions ABI.
pub mod limits {
    /// Kernel interface name slot, including the trailing NUL.
    pub const IFNAMSIZ: usize = 16;

    /// Maximum ESSID length in bytes.
    pub const ESSID_MAX_SIZE: usize = 32;

    /// Scratch space for the SIOCGIWRANGE reply; the kernel fills at most
    /// `sizeof(struct iw_range)`, which is well under this.
    pub const RANGE_BUF_SIZE: usize = 2048;
}

/// Unit conversion constants.
pub mod units {
    pub const KILO: f64 = 1e3;
    pub const MEGA: f64 = 1e6;
    pub const GIGA: f64 = 1e9;

    /// The 10th root of 10, for log10 approximation without a math library.
    pub const LOG10_MAGIC: f64 = 1.25892541179;

    /// Convergence bound for the dBm ceiling loop.
    pub const DBM_CEIL_EPSILON: f64 = 1.000001;

    /// Drivers report signal/noise dBm shifted up by this amount so the
    /// value fits an unsigned byte.
    pub const DBM_OFFSET: i32 = 0x100;
}
