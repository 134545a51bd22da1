use crate::models::{Action, CmsUser, Permission, Resource, Role};

/// Decides whether `user` may perform `action` on `resource`.
///
/// Resolution order: no user denies everything; an admin is allowed
/// everything; explicit per-user overrides, when present, are consulted
/// before role defaults (boolean OR across overrides); otherwise the static
/// role defaults apply. Pure function, no side effects.
pub fn has_permission(user: Option<&CmsUser>, resource: Resource, action: Action) -> bool {
    let user = match user {
        Some(user) => user,
        None => return false,
    };

    if user.role == Role::Admin {
        return true;
    }

    if let Some(overrides) = &user.permissions {
        return overrides
            .iter()
            .any(|p| p.resource == resource && p.actions.contains(&action));
    }

    match user.role {
        Role::Admin => true,
        Role::Editor => {
            matches!(resource, Resource::Posts | Resource::Projects | Resource::Media)
                && matches!(
                    action,
                    Action::Create | Action::Read | Action::Update | Action::Publish
                )
        }
        Role::Author => {
            matches!(resource, Resource::Posts | Resource::Media)
                && matches!(action, Action::Create | Action::Read | Action::Update)
        }
        Role::User => resource == Resource::Posts && action == Action::Read,
    }
}

// Convenience gates used by the CMS views; fixed (resource, action) pairs
// through the resolver above.

pub fn can_manage_posts(user: Option<&CmsUser>) -> bool {
    has_permission(user, Resource::Posts, Action::Update)
}

pub fn can_manage_projects(user: Option<&CmsUser>) -> bool {
    has_permission(user, Resource::Projects, Action::Update)
}

pub fn can_manage_users(user: Option<&CmsUser>) -> bool {
    has_permission(user, Resource::Users, Action::Update)
}

pub fn can_publish(user: Option<&CmsUser>) -> bool {
    has_permission(user, Resource::Posts, Action::Publish)
}

/// True only for the admin role.
pub fn is_admin(user: &CmsUser) -> bool {
    user.role == Role::Admin
}

/// True for editors and anyone above them (admin).
pub fn is_editor(user: &CmsUser) -> bool {
    matches!(user.role, Role::Admin | Role::Editor)
}

/// True for authors and anyone above them (editor, admin).
pub fn is_author(user: &CmsUser) -> bool {
    matches!(user.role, Role::Admin | Role::Editor | Role::Author)
}

/// The fixed permission set seeded at CMS initialization. These are the
/// grants the user-management view offers as per-user overrides: one entry
/// per resource covering its full action set.
pub fn default_permissions() -> Vec<Permission> {
    let full = vec![
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Publish,
    ];
    let crud = vec![Action::Create, Action::Read, Action::Update, Action::Delete];
    vec![
        Permission {
            id: "perm-posts".to_string(),
            name: "Manage Posts".to_string(),
            description: "Full control over blog posts".to_string(),
            resource: Resource::Posts,
            actions: full.clone(),
        },
        Permission {
            id: "perm-projects".to_string(),
            name: "Manage Projects".to_string(),
            description: "Full control over projects".to_string(),
            resource: Resource::Projects,
            actions: full,
        },
        Permission {
            id: "perm-users".to_string(),
            name: "Manage Users".to_string(),
            description: "Create, edit, and remove CMS users".to_string(),
            resource: Resource::Users,
            actions: crud.clone(),
        },
        Permission {
            id: "perm-settings".to_string(),
            name: "Manage Settings".to_string(),
            description: "Read and change site settings".to_string(),
            resource: Resource::Settings,
            actions: vec![Action::Read, Action::Update],
        },
        Permission {
            id: "perm-media".to_string(),
            name: "Manage Media".to_string(),
            description: "Upload and remove media files".to_string(),
            resource: Resource::Media,
            actions: crud,
        },
    ]
}
