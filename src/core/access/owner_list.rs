// Owner allow-list for administration commands.
//
// The list is fixed at startup (see infra::config). There is no runtime way to
// add or remove owners; an empty list disables every admin command.

use std::collections::HashSet;

pub const DENIED_MESSAGE: &str = "You don't have required permissions to do that.";
pub const DISABLED_MESSAGE: &str = "Admin commands have been disabled.";

#[derive(Debug, Clone, Default)]
pub struct OwnerList {
    ids: HashSet<u64>,
}

impl OwnerList {
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        self.ids.contains(&user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// What a non-owner is told when an admin command refuses to run.
    pub fn denial_message(&self) -> &'static str {
        if self.is_empty() {
            DISABLED_MESSAGE
        } else {
            DENIED_MESSAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_lookup() {
        let owners = OwnerList::new([10, 20]);
        assert!(owners.is_owner(10));
        assert!(owners.is_owner(20));
        assert!(!owners.is_owner(30));
        assert_eq!(owners.len(), 2);
    }

    #[test]
    fn test_empty_list_disables_admin_commands() {
        let owners = OwnerList::default();
        assert!(owners.is_empty());
        assert!(!owners.is_owner(10));
        assert_eq!(owners.denial_message(), DISABLED_MESSAGE);
    }

    #[test]
    fn test_non_owner_gets_permission_message() {
        let owners = OwnerList::new([1]);
        assert_eq!(owners.denial_message(), DENIED_MESSAGE);
    }
}
