//! Shared helpers for command handlers.

use std::time::Duration;

use rolodex_core::{Contact, ContactOrder, LiveContacts};

/// How long a command waits for a fire-and-forget write to show up in the
/// live view before giving up.
const LIVE_WAIT: Duration = Duration::from_secs(2);

/// Wait until the live view satisfies the predicate.
pub async fn wait_for_live<F>(live: &mut LiveContacts, pred: F) -> anyhow::Result<Vec<Contact>>
where
    F: Fn(&[Contact]) -> bool,
{
    loop {
        let current = live.current();
        if pred(&current) {
            return Ok(current);
        }
        tokio::time::timeout(LIVE_WAIT, live.changed())
            .await
            .map_err(|_| anyhow::anyhow!("Timed out waiting for the address book to update"))??;
    }
}

pub fn parse_sort_field(raw: Option<&str>) -> anyhow::Result<ContactOrder> {
    match raw {
        None | Some("first") => Ok(ContactOrder::FirstName),
        Some("last") => Ok(ContactOrder::LastName),
        Some("phone") => Ok(ContactOrder::Phone),
        Some(other) => Err(anyhow::anyhow!(
            "Unknown sort field \"{}\" (expected first, last, or phone)",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_field_defaults_to_first_name() {
        assert_eq!(parse_sort_field(None).unwrap(), ContactOrder::FirstName);
        assert_eq!(
            parse_sort_field(Some("phone")).unwrap(),
            ContactOrder::Phone
        );
        assert!(parse_sort_field(Some("zip")).is_err());
    }
}
