use crate::domain::Alias;

/// Read-only alias lookup capability.
///
/// Both [`Category`](crate::Category) and
/// [`CategoryCollection`](crate::CategoryCollection) implement this trait:
/// a category answers for its own FAQ entries, the collection cascades
/// through every category. The capability is passed explicitly at call
/// sites instead of being stored as a parent back-reference, so ownership
/// stays strictly top-down.
pub trait AliasRegistry {
    /// Returns whether a FAQ entry with the given alias is already known.
    fn contains_faq_alias(&self, alias: &Alias) -> bool;
}

/// Error returned when a mutation would violate an alias-uniqueness
/// invariant, or names an alias that does not exist. The rejected
/// operation leaves all state untouched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A category with this alias already exists in the collection.
    #[error("a category with alias '{0}' already exists")]
    DuplicateCategoryAlias(Alias),

    /// A FAQ entry with this alias already exists in scope.
    #[error("a FAQ entry with alias '{0}' already exists")]
    DuplicateFaqAlias(Alias),

    /// No entity with this alias exists to operate on.
    #[error("no entity with alias '{0}' exists")]
    UnknownAlias(Alias),
}
