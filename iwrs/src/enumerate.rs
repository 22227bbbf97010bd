//! Local network interface enumeration and wireless classification.
//!
//! Walks the OS interface listing, keeps one entry per distinct name that
//! exposes a link-layer address, and classifies each by the wireless
//! protocol probe. Listing order is whatever the OS yields; callers must
//! not assume one.

use log::debug;
use nix::ifaddrs::getifaddrs;

use crate::Result;
use crate::models::{InterfaceDescriptor, QueryError};
use crate::wext::KernelQueries;

/// Lists local interfaces, probing each for wireless support.
///
/// Failure to obtain the listing at all is fatal
/// ([`QueryError::Enumeration`]); there is nothing to report without it.
pub(crate) fn list_interfaces<Q: KernelQueries + ?Sized>(
    queries: &Q,
) -> Result<Vec<InterfaceDescriptor>> {
    let addrs = getifaddrs().map_err(|e| QueryError::Enumeration(e.into()))?;

    let link_names = addrs
        .filter(|ifaddr| {
            ifaddr
                .address
                .as_ref()
                .is_some_and(|addr| addr.as_link_addr().is_some())
        })
        .map(|ifaddr| ifaddr.interface_name);

    let mut interfaces = Vec::new();
    for name in first_seen(link_names) {
        let descriptor = match queries.protocol_name(&name) {
            Ok(protocol) => InterfaceDescriptor {
                name,
                is_wireless: true,
                protocol: Some(protocol),
            },
            Err(QueryError::NotWireless) => {
                debug!("{name}: no wireless extensions");
                InterfaceDescriptor {
                    name,
                    is_wireless: false,
                    protocol: None,
                }
            }
            Err(e) => return Err(e),
        };
        interfaces.push(descriptor);
    }
    Ok(interfaces)
}

/// First occurrence of each name, listing order preserved.
fn first_seen(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}
