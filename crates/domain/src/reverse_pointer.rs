//! `in-addr.arpa` reverse pointer names.

use crate::errors::DomainError;
use std::net::Ipv4Addr;

pub const REVERSE_SUFFIX: &str = ".in-addr.arpa";

/// Canonical reverse pointer for `address`, without the trailing root dot.
///
/// `10.0.0.1` becomes `1.0.0.10.in-addr.arpa`.
pub fn to_reverse_pointer(address: Ipv4Addr) -> String {
    let [a, b, c, d] = address.octets();
    format!("{}.{}.{}.{}{}", d, c, b, a, REVERSE_SUFFIX)
}

/// Parses a PTR query name back into the address it points at.
///
/// The name must be the exact canonical form produced by
/// [`to_reverse_pointer`]; a trailing root dot is accepted. Anything else
/// (missing or extra labels, leading zeros, a different suffix) is rejected so
/// a sloppy name can never be looked up as the wrong address.
pub fn parse_reverse_pointer(name: &str) -> Result<Ipv4Addr, DomainError> {
    let name = name.strip_suffix('.').unwrap_or(name);

    let prefix = name.strip_suffix(REVERSE_SUFFIX).ok_or_else(|| {
        DomainError::InvalidReversePointer(format!("'{}' is not under in-addr.arpa", name))
    })?;

    let mut labels: Vec<&str> = prefix.split('.').collect();
    labels.reverse();
    let candidate = labels.join(".");

    let address: Ipv4Addr = candidate.parse().map_err(|_| {
        DomainError::InvalidReversePointer(format!("'{}' does not encode an IPv4 address", name))
    })?;

    let canonical = to_reverse_pointer(address);
    if canonical != name {
        return Err(DomainError::InvalidReversePointer(format!(
            "provided pointer doesn't match real pointer ({} != {})",
            name, canonical
        )));
    }

    Ok(address)
}
