//! High-level entry point for wireless interface reporting.

use crate::Result;
use crate::enumerate;
use crate::models::InterfaceDescriptor;
use crate::report::{self, InterfaceReport, InterfaceSurvey};
use crate::wext::{KernelQueries, WirelessSocket};

/// High-level interface to the kernel's wireless query facility.
///
/// Owns the query socket for the lifetime of the value; all queries are
/// synchronous and blocking, one kernel round-trip each.
pub struct WirelessInfo {
    sock: WirelessSocket,
}

impl WirelessInfo {
    /// Opens the query socket.
    pub fn new() -> Result<Self> {
        Ok(Self {
            sock: WirelessSocket::new()?,
        })
    }

    /// Lists local network interfaces, one entry per distinct name with a
    /// link-layer address, each classified by the wireless probe.
    pub fn list_interfaces(&self) -> Result<Vec<InterfaceDescriptor>> {
        enumerate::list_interfaces(&self.sock)
    }

    /// Returns the wireless protocol name of one interface.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::NotWireless` if the interface is missing or
    /// has no wireless extensions.
    pub fn protocol_name(&self, name: &str) -> Result<String> {
        self.sock.protocol_name(name)
    }

    /// Surveys one interface: probe, then the full query set.
    pub fn survey(&self, name: &str) -> Result<InterfaceReport> {
        report::survey(&self.sock, name)
    }

    /// Surveys every local interface in listing order.
    ///
    /// Wireless interfaces get a full report; others are recorded by name.
    /// Interfaces are processed one at a time, fully, in sequence.
    pub fn survey_all(&self) -> Result<Vec<InterfaceSurvey>> {
        let mut surveys = Vec::new();
        for descriptor in self.list_interfaces()? {
            surveys.push(match descriptor.protocol {
                Some(protocol) => InterfaceSurvey::Wireless(report::survey_wireless(
                    &self.sock,
                    &descriptor.name,
                    protocol,
                )),
                None => InterfaceSurvey::NotWireless {
                    name: descriptor.name,
                },
            });
        }
        Ok(surveys)
    }
}
