//! Search targets, sources and the selections built from them.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use super::error::DomainError;

/// What kind of thing is being searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Locations,
    Stops,
    Routes,
    CurrentPosition,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Locations => "Locations",
            Target::Stops => "Stops",
            Target::Routes => "Routes",
            Target::CurrentPosition => "CurrentPosition",
        }
    }
}

impl FromStr for Target {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Locations" => Ok(Target::Locations),
            "Stops" => Ok(Target::Stops),
            "Routes" => Ok(Target::Routes),
            "CurrentPosition" => Ok(Target::CurrentPosition),
            other => Err(DomainError::UnknownTarget(other.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where candidate results come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Favourite places and stops.
    Favourite,
    /// The geocoding backend.
    Datasource,
    /// Previous searches.
    History,
    /// Favourite routes.
    Favourites,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Favourite => "Favourite",
            Source::Datasource => "Datasource",
            Source::History => "History",
            Source::Favourites => "Favourites",
        }
    }
}

impl FromStr for Source {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Favourite" => Ok(Source::Favourite),
            "Datasource" => Ok(Source::Datasource),
            "History" => Ok(Source::History),
            "Favourites" => Ok(Source::Favourites),
            other => Err(DomainError::UnknownSource(other.to_string())),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of targets or sources.
///
/// An empty list of names selects everything. Unknown names are dropped, but
/// still make the list non-empty: `["Bogus"]` selects nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T: Eq + Hash> {
    /// `None` means "all".
    members: Option<HashSet<T>>,
}

impl<T: Eq + Hash + Copy> Selection<T> {
    /// Select everything.
    pub fn all() -> Self {
        Self { members: None }
    }

    /// Select exactly the given members.
    pub fn only(members: impl IntoIterator<Item = T>) -> Self {
        Self {
            members: Some(members.into_iter().collect()),
        }
    }

    /// Build a selection from caller-supplied names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        T: FromStr,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut any = false;
        let mut members = HashSet::new();
        for name in names {
            any = true;
            if let Ok(member) = name.as_ref().parse::<T>() {
                members.insert(member);
            }
        }

        if any { Self::only(members) } else { Self::all() }
    }

    /// Whether this selection is the "everything" wildcard.
    pub fn is_all(&self) -> bool {
        self.members.is_none()
    }

    /// Membership test, with the wildcard matching everything.
    pub fn includes(&self, member: T) -> bool {
        match &self.members {
            None => true,
            Some(members) => members.contains(&member),
        }
    }

    /// Membership test ignoring the wildcard: only explicitly named members
    /// match.
    pub fn names_explicitly(&self, member: T) -> bool {
        self.members
            .as_ref()
            .is_some_and(|members| members.contains(&member))
    }
}

impl<T: Eq + Hash + Copy> Default for Selection<T> {
    fn default() -> Self {
        Self::all()
    }
}
