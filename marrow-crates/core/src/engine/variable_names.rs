use crate::containers::HashMap;
use crate::engine::variables::DomainId;

/// The optional names of domains, in both directions.
#[derive(Debug, Default, Clone)]
pub(crate) struct VariableNames {
    names: HashMap<DomainId, String>,
    domain_by_name: HashMap<String, DomainId>,
}

impl VariableNames {
    /// Get the name associated with a domain id.
    pub(crate) fn get_name(&self, domain_id: DomainId) -> Option<&str> {
        self.names.get(&domain_id).map(|name| name.as_str())
    }

    /// Get the [`DomainId`] associated with the given name.
    pub(crate) fn get_domain_by_name(&self, name: &str) -> Option<DomainId> {
        self.domain_by_name.get(name).copied()
    }

    /// Name the domain, replacing any earlier name it had.
    pub(crate) fn add(&mut self, domain_id: DomainId, name: &str) {
        if let Some(previous) = self.names.insert(domain_id, name.to_owned()) {
            let _ = self.domain_by_name.remove(&previous);
        }
        let _ = self.domain_by_name.insert(name.to_owned(), domain_id);
    }
}
