//! The authoritative name → requirement mapping.

use std::collections::HashMap;

use indexmap::IndexMap;

use reqpin_core::requirement::{PackageName, Requirement};

/// One live requirement per package name, in first-insertion order, plus
/// the unnamed link requirements that can never be merged.
///
/// Names keep the casing of their first declaration. Lookups also try the
/// lowercase form and the alias table, so `Django` and `django` share an
/// entry.
#[derive(Debug, Default, Clone)]
pub struct RequirementRegistry {
    by_name: IndexMap<PackageName, Requirement>,
    aliases: HashMap<String, PackageName>,
    unnamed: Vec<Requirement>,
}

impl RequirementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The key under which `name` is stored, if any.
    pub fn resolve_key(&self, name: &PackageName) -> Option<&PackageName> {
        if let Some((key, _)) = self.by_name.get_key_value(name.as_str()) {
            return Some(key);
        }
        let folded = name.folded();
        if let Some((key, _)) = self.by_name.get_key_value(folded.as_str()) {
            return Some(key);
        }
        self.aliases.get(&folded)
    }

    pub fn get(&self, name: &PackageName) -> Option<&Requirement> {
        let key = self.resolve_key(name)?;
        self.by_name.get(key)
    }

    /// Mutable access together with the stored key.
    pub fn lookup_mut(&mut self, name: &PackageName) -> Option<(&PackageName, &mut Requirement)> {
        let index = {
            let key = self.resolve_key(name)?;
            self.by_name.get_index_of(key)?
        };
        self.by_name
            .get_index_mut(index)
            .map(|(key, requirement)| (&*key, requirement))
    }

    pub fn contains(&self, name: &PackageName) -> bool {
        self.resolve_key(name).is_some()
    }

    /// Add a new entry at the end of the insertion order.
    ///
    /// Callers check [`contains`](Self::contains) first; an existing entry
    /// under the same key would be overwritten in place.
    pub fn insert(&mut self, name: PackageName, requirement: Requirement) {
        let folded = name.folded();
        if folded != name.as_str() {
            self.aliases.insert(folded, name.clone());
        }
        self.by_name.insert(name, requirement);
    }

    pub fn push_unnamed(&mut self, requirement: Requirement) {
        self.unnamed.push(requirement);
    }

    /// Named entries in insertion order, constraints included.
    pub fn iter(&self) -> impl Iterator<Item = (&PackageName, &Requirement)> {
        self.by_name.iter()
    }

    pub fn unnamed(&self) -> &[Requirement] {
        &self.unnamed
    }

    /// Requirements that will be installed: activated named entries in
    /// insertion order, followed by the unnamed ones in theirs. Constraints
    /// are left out of both.
    pub fn to_install(&self) -> impl Iterator<Item = &Requirement> {
        self.by_name
            .values()
            .chain(self.unnamed.iter())
            .filter(|requirement| !requirement.is_constraint())
    }

    /// Number of named entries.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.unnamed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqpin_core::requirement::Provenance;

    fn name(s: &str) -> PackageName {
        PackageName::parse(s).unwrap()
    }

    fn req(s: &str) -> Requirement {
        Requirement::named(name(s), Provenance::CommandLine)
    }

    #[test]
    fn mixed_case_first_is_found_through_alias() {
        let mut registry = RequirementRegistry::new();
        registry.insert(name("Django"), req("Django"));

        assert_eq!(registry.resolve_key(&name("django")), Some(&name("Django")));
        assert_eq!(registry.resolve_key(&name("DJANGO")), Some(&name("Django")));
        assert!(registry.contains(&name("Django")));
    }

    #[test]
    fn lowercase_first_is_found_by_folding() {
        let mut registry = RequirementRegistry::new();
        registry.insert(name("django"), req("django"));

        assert_eq!(registry.resolve_key(&name("Django")), Some(&name("django")));
    }

    #[test]
    fn lookup_mut_returns_stored_key() {
        let mut registry = RequirementRegistry::new();
        registry.insert(name("Pkg"), req("Pkg").with_constraint(true));

        let (key, entry) = registry.lookup_mut(&name("pkg")).unwrap();
        assert_eq!(key.as_str(), "Pkg");
        entry.activate(Provenance::CommandLine);
        assert!(!registry.get(&name("PKG")).unwrap().is_constraint());
    }

    #[test]
    fn to_install_skips_constraints_and_appends_unnamed() {
        let mut registry = RequirementRegistry::new();
        registry.insert(name("a"), req("a"));
        registry.insert(name("b"), req("b").with_constraint(true));
        registry.insert(name("c"), req("c"));
        let link = reqpin_core::link::SourceLink::parse("./local").unwrap();
        registry.push_unnamed(Requirement::from_link(link.clone(), Provenance::CommandLine));
        registry.push_unnamed(Requirement::from_link(link, Provenance::CommandLine).with_constraint(true));

        let installed: Vec<String> = registry.to_install().map(Requirement::identity).collect();
        assert_eq!(installed, vec!["a", "c", "./local"]);
        assert_eq!(registry.len(), 3);
    }
}
