//! Resolve a user supplied ID or name to a single resource

use crate::api_client::types::{Firewall, Network, ObjectStore};
use crate::error::ApiError;

/// Resources that can be looked up by ID or name
pub trait Named {
    /// Resource ID
    fn id(&self) -> &str;

    /// Resource name
    fn name(&self) -> &str;
}

impl Named for ObjectStore {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Firewall {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Network {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Pick the single item matching `search`.
///
/// An exact ID or (case-insensitive) name match wins. Otherwise the search
/// must be a unique ID prefix or name substring. A blank search matches nothing.
pub fn find_match<'a, T: Named>(
    items: &'a [T],
    kind: &'static str,
    search: &str,
) -> Result<&'a T, ApiError> {
    let search = search.trim();
    if search.is_empty() {
        return Err(ApiError::ZeroMatches {
            kind,
            search: search.to_string(),
        });
    }

    if let Some(exact) = items
        .iter()
        .find(|item| item.id() == search || item.name().eq_ignore_ascii_case(search))
    {
        return Ok(exact);
    }

    let needle = search.to_lowercase();
    let partial: Vec<&T> = items
        .iter()
        .filter(|item| {
            item.id().starts_with(search) || item.name().to_lowercase().contains(&needle)
        })
        .collect();

    match partial.as_slice() {
        [single] => Ok(*single),
        [] => Err(ApiError::ZeroMatches {
            kind,
            search: search.to_string(),
        }),
        many => Err(ApiError::MultipleMatches {
            kind,
            search: search.to_string(),
            count: many.len(),
        }),
    }
}
