//! Authorization.
//!
//! The composer does not know about users or roles. It asks an
//! [`AccessPolicy`] before each guarded operation and treats a denial as a
//! no-op plus a notification.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Operations a policy can guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Open a stored document
    ViewDocuments,
    /// Save a document for the first time
    CreateDocument,
    /// Change a document and save it again
    EditDocument,
}

impl Permission {
    pub fn name(self) -> &'static str {
        match self {
            Permission::ViewDocuments => "view_documents",
            Permission::CreateDocument => "create_document",
            Permission::EditDocument => "edit_document",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Decides whether the session may perform an operation.
pub trait AccessPolicy: Send + Sync {
    fn authorize(&self, permission: Permission) -> Access;
}

/// Permits everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn authorize(&self, _permission: Permission) -> Access {
        Access::Allow
    }
}

/// Permits exactly the permissions it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    granted: HashSet<Permission>,
}

impl PermissionSet {
    pub fn new(granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
        }
    }

    /// A set that can open documents but not change them.
    pub fn viewer() -> Self {
        Self::new([Permission::ViewDocuments])
    }

    /// A set with every permission.
    pub fn editor() -> Self {
        Self::new([
            Permission::ViewDocuments,
            Permission::CreateDocument,
            Permission::EditDocument,
        ])
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }
}

impl AccessPolicy for PermissionSet {
    fn authorize(&self, permission: Permission) -> Access {
        if self.contains(permission) {
            Access::Allow
        } else {
            Access::Deny
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        assert_eq!(AllowAll.authorize(Permission::EditDocument), Access::Allow);
    }

    #[test]
    fn test_viewer_cannot_edit() {
        let viewer = PermissionSet::viewer();
        assert_eq!(viewer.authorize(Permission::ViewDocuments), Access::Allow);
        assert_eq!(viewer.authorize(Permission::EditDocument), Access::Deny);
        assert_eq!(viewer.authorize(Permission::CreateDocument), Access::Deny);
    }

    #[test]
    fn test_permission_names() {
        assert_eq!(Permission::CreateDocument.to_string(), "create_document");
        let parsed: Permission = serde_json::from_str("\"edit_document\"").unwrap();
        assert_eq!(parsed, Permission::EditDocument);
    }
}
