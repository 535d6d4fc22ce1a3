use crate::api::{DirectoryEntry, PageErrorPolicy, PagedLister, TokenSource, list_entries};
use crate::error::Result;
use log::debug;

/// Acquire a token, walk every page and hand each entry to `report`.
///
/// Returns the number of entries reported.
pub fn list_users(
    tokens: &dyn TokenSource,
    lister: &dyn PagedLister,
    policy: PageErrorPolicy,
    mut report: impl FnMut(&DirectoryEntry),
) -> Result<usize> {
    let token = tokens.acquire_token()?;
    debug!("Listing users (page error policy: {})", policy);

    let mut count = 0;
    for entry in list_entries(lister, &token, policy) {
        report(&entry?);
        count += 1;
    }
    Ok(count)
}
