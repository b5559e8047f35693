use parking_lot::RwLock;

/// Shared slot for the current `Authorization` header value.
///
/// The auth layer writes it on login/restore and clears it on logout; the
/// HTTP wrapper only ever reads. Both sides hold the same `Arc`, which keeps
/// the wrapper decoupled from session storage and state transitions.
#[derive(Debug, Default)]
pub struct CredentialCell {
    header: RwLock<Option<String>>,
}

impl CredentialCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current `Authorization` header value, if a session is active.
    pub fn authorization(&self) -> Option<String> {
        self.header.read().clone()
    }

    pub fn set(&self, header_value: impl Into<String>) {
        *self.header.write() = Some(header_value.into());
    }

    pub fn clear(&self) {
        *self.header.write() = None;
    }

    pub fn is_set(&self) -> bool {
        self.header.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_round_trips() {
        let cell = CredentialCell::new();
        assert_eq!(cell.authorization(), None);

        cell.set("Basic bWFydDptYXJ0MTIz");
        assert!(cell.is_set());
        assert_eq!(
            cell.authorization().as_deref(),
            Some("Basic bWFydDptYXJ0MTIz")
        );

        cell.clear();
        assert_eq!(cell.authorization(), None);
    }
}
