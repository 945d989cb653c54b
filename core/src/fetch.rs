use compact_str::CompactString;
use tessera_types::SortDirection;

use crate::qualifier::Qualifier;

/// One entry of an ORDER BY list, by property name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortOrdering {
    pub property: CompactString,
    pub direction: SortDirection,
}

impl SortOrdering {
    pub fn asc(property: impl Into<CompactString>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(property: impl Into<CompactString>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// What to fetch: an entity, an optional qualifier, sort orderings and a limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSpecification {
    entity: CompactString,
    qualifier: Option<Qualifier>,
    sort_orderings: Vec<SortOrdering>,
    fetch_limit: Option<u32>,
}

impl FetchSpecification {
    pub fn new(entity: impl Into<CompactString>) -> Self {
        Self {
            entity: entity.into(),
            qualifier: None,
            sort_orderings: Vec::new(),
            fetch_limit: None,
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    #[must_use]
    pub fn order_by(mut self, ordering: SortOrdering) -> Self {
        self.sort_orderings.push(ordering);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.fetch_limit = Some(limit);
        self
    }

    #[inline]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[inline]
    pub const fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    #[inline]
    pub fn sort_orderings(&self) -> &[SortOrdering] {
        &self.sort_orderings
    }

    #[inline]
    pub const fn fetch_limit(&self) -> Option<u32> {
        self.fetch_limit
    }
}
