//! Read-only host inventory.
//!
//! Host ids arrive as text from callers. The inventory turns them into
//! [`HostTarget`]s or a [`HostResolutionError`]; how hosts are stored is
//! behind the [`HostInventory`] trait.

use std::collections::HashMap;

use tracing::warn;

use crate::mcp::error::HostResolutionError;
use crate::mcp::types::HostTarget;

/// Lookup interface for the hosts logs may be fetched from.
///
/// Implementations must be thread-safe (`Send + Sync`) so a single inventory
/// can back concurrent fetches.
pub trait HostInventory: Send + Sync {
    /// Resolve a caller-supplied host id.
    fn resolve_host(&self, id: &str) -> Result<HostTarget, HostResolutionError>;

    /// All known hosts, ordered by id.
    fn hosts(&self) -> Vec<HostTarget>;
}

/// In-memory inventory, typically built from the `hosts:` list of the
/// configuration document.
#[derive(Debug, Default)]
pub struct StaticInventory {
    hosts: HashMap<u32, HostTarget>,
}

impl StaticInventory {
    /// Build an inventory. When ids repeat, the first entry wins.
    pub fn new(hosts: impl IntoIterator<Item = HostTarget>) -> Self {
        let mut map = HashMap::new();
        for host in hosts {
            if let Some(existing) = map.get(&host.id) {
                warn!(
                    "Duplicate host id {} in inventory, keeping {} and ignoring {}",
                    host.id, existing, host
                );
                continue;
            }
            map.insert(host.id, host);
        }
        Self { hosts: map }
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl HostInventory for StaticInventory {
    fn resolve_host(&self, id: &str) -> Result<HostTarget, HostResolutionError> {
        let parsed = id
            .trim()
            .parse::<u32>()
            .map_err(|_| HostResolutionError::Invalid(id.to_string()))?;

        self.hosts
            .get(&parsed)
            .cloned()
            .ok_or(HostResolutionError::NotFound(parsed))
    }

    fn hosts(&self) -> Vec<HostTarget> {
        let mut hosts: Vec<HostTarget> = self.hosts.values().cloned().collect();
        hosts.sort_by_key(|h| h.id);
        hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> StaticInventory {
        StaticInventory::new([
            HostTarget::new(2, "db", "10.0.0.2"),
            HostTarget::new(1, "web", "10.0.0.1:2222"),
        ])
    }

    #[test]
    fn test_resolves_known_id() {
        let host = inventory().resolve_host("1").unwrap();
        assert_eq!(host, HostTarget::new(1, "web", "10.0.0.1:2222"));
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(inventory().resolve_host(" 2 ").unwrap().name, "db");
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        assert_eq!(
            inventory().resolve_host("7"),
            Err(HostResolutionError::NotFound(7))
        );
    }

    #[test]
    fn test_non_numeric_id_is_invalid() {
        assert_eq!(
            inventory().resolve_host("web"),
            Err(HostResolutionError::Invalid("web".to_string()))
        );
        assert!(matches!(
            inventory().resolve_host("-1"),
            Err(HostResolutionError::Invalid(_))
        ));
        assert!(matches!(
            inventory().resolve_host(""),
            Err(HostResolutionError::Invalid(_))
        ));
    }

    #[test]
    fn test_hosts_are_sorted_by_id() {
        let ids: Vec<u32> = inventory().hosts().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let inv = StaticInventory::new([
            HostTarget::new(1, "first", "10.0.0.1"),
            HostTarget::new(1, "second", "10.0.0.9"),
        ]);
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.resolve_host("1").unwrap().name, "first");
    }

    #[test]
    fn test_empty_inventory() {
        let inv = StaticInventory::default();
        assert!(inv.is_empty());
        assert!(inv.hosts().is_empty());
    }
}
