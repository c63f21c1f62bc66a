//! Fake address pool
//!
//! Owns an IPv4 network and the set of host addresses that are currently
//! free to hand out. The pool never consults the record store itself: the
//! owner regenerates it from the store's view of active bindings.

use crate::errors::DomainError;
use ipnetwork::Ipv4Network;
use std::collections::{BTreeSet, HashSet};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Longest prefix that still leaves two usable hosts.
pub const MAX_PREFIX_LEN: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: u32,
    pub free: u32,
}

/// Free hosts are tracked lazily: a cursor walks the range once, addresses
/// handed back below the cursor sit in `released`, and bound addresses the
/// cursor has not reached yet sit in `excluded`. Memory stays proportional to
/// the number of bindings, not to the size of the network.
#[derive(Debug, Clone)]
pub struct AddressPool {
    network: Ipv4Network,
    cursor: u64,
    released: BTreeSet<Ipv4Addr>,
    excluded: BTreeSet<Ipv4Addr>,
}

impl AddressPool {
    /// Builds a pool with every usable host free.
    pub fn new(cidr: &str) -> Result<Self, DomainError> {
        let network = parse_subnet(cidr)?;
        Ok(Self::fresh(network))
    }

    fn fresh(network: Ipv4Network) -> Self {
        Self {
            network,
            cursor: first_host(network),
            released: BTreeSet::new(),
            excluded: BTreeSet::new(),
        }
    }

    pub fn network(&self) -> Ipv4Network {
        self.network
    }

    /// Number of usable host addresses (network and broadcast excluded).
    pub fn capacity(&self) -> u32 {
        host_count(self.network)
    }

    pub fn free_count(&self) -> u32 {
        let unwalked = (last_host(self.network) + 1).saturating_sub(self.cursor);
        let free = self.released.len() as u64 + unwalked - self.excluded.len() as u64;
        free as u32
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity(),
            free: self.free_count(),
        }
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        address != self.network.network()
            && address != self.network.broadcast()
            && self.network.contains(address)
    }

    pub fn is_exhausted(&self) -> bool {
        self.free_count() == 0
    }

    /// Takes the lowest free address out of the pool.
    pub fn allocate(&mut self) -> Option<Ipv4Addr> {
        if let Some(address) = self.released.pop_first() {
            return Some(address);
        }

        let last = last_host(self.network);
        while self.cursor <= last {
            let address = Ipv4Addr::from(self.cursor as u32);
            self.cursor += 1;
            if !self.excluded.remove(&address) {
                return Some(address);
            }
        }
        None
    }

    /// Puts an address back. Addresses outside the usable range are ignored.
    pub fn release(&mut self, address: Ipv4Addr) {
        if !self.contains(address) {
            return;
        }
        if u64::from(u32::from(address)) < self.cursor {
            self.released.insert(address);
        } else {
            self.excluded.remove(&address);
        }
    }

    /// Resets the free set to every usable host minus `active`.
    pub fn regenerate(&mut self, active: &HashSet<Ipv4Addr>) {
        let mut pool = Self::fresh(self.network);
        pool.excluded = active
            .iter()
            .copied()
            .filter(|address| self.contains(*address))
            .collect();
        *self = pool;
    }

    /// Swaps the network. The free set is rebuilt from scratch, so callers
    /// must `regenerate` against live bindings before trusting it.
    pub fn reconfigure(&mut self, cidr: &str) -> Result<(), DomainError> {
        let network = parse_subnet(cidr)?;
        *self = Self::fresh(network);
        Ok(())
    }
}

/// Parses and validates a pool subnet.
///
/// Host bits are masked off, so `10.0.0.7/30` yields `10.0.0.4/30`.
pub fn parse_subnet(cidr: &str) -> Result<Ipv4Network, DomainError> {
    let trimmed = cidr.trim();
    if trimmed.contains(':') {
        return Err(DomainError::InvalidNetworkConfiguration(format!(
            "'{}' is not an IPv4 network",
            trimmed
        )));
    }

    let parsed = Ipv4Network::from_str(trimmed).map_err(|e| {
        DomainError::InvalidNetworkConfiguration(format!("'{}': {}", trimmed, e))
    })?;

    if parsed.prefix() > MAX_PREFIX_LEN {
        return Err(DomainError::InvalidNetworkConfiguration(format!(
            "address pool too small: /{} has fewer than two usable hosts, prefix must be /{} or shorter",
            parsed.prefix(),
            MAX_PREFIX_LEN
        )));
    }

    Ipv4Network::new(parsed.network(), parsed.prefix())
        .map_err(|e| DomainError::InvalidNetworkConfiguration(format!("'{}': {}", trimmed, e)))
}

fn host_count(network: Ipv4Network) -> u32 {
    let first = u32::from(network.network());
    let last = u32::from(network.broadcast());
    (last - first).saturating_sub(1)
}

fn first_host(network: Ipv4Network) -> u64 {
    u64::from(u32::from(network.network())) + 1
}

fn last_host(network: Ipv4Network) -> u64 {
    u64::from(u32::from(network.broadcast())) - 1
}
