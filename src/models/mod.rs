use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse role determining default permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Author,
    User,
}

// Unrecognized role strings collapse to `User`, the most restrictive role.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "admin" => Role::Admin,
            "editor" => Role::Editor,
            "author" => Role::Author,
            _ => Role::User,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Posts,
    Projects,
    Users,
    Settings,
    Media,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Publish,
}

/// A per-user grant of specific actions on one resource. Attached to a
/// `CmsUser` it supersedes that user's role defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub description: String,
    pub resource: Resource,
    /// Must be non-empty; the seeded defaults always are.
    pub actions: Vec<Action>,
}

/// A CMS user record: the identity the permission resolver reasons about.
/// Also the shape stored as the current session identity (password never
/// lives here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Explicit overrides; `None` means role defaults apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
}

/// A registered demo account. Stored separately from `CmsUser` records and,
/// faithfully to the original, with the password in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Denormalized author snapshot embedded in posts and projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
    Archived,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub category: String,
    pub status: PostStatus,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Stamped when the post first enters `published`; kept on later
    /// status changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoMetadata>,
}

/// Creation payload: the store assigns id, slug, and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub category: String,
    pub status: PostStatus,
    pub author: AuthorRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoMetadata>,
}

/// Partial update; only the supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub status: Option<PostStatus>,
    pub seo: Option<SeoMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub long_description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<String>>,
    pub technologies: Vec<String>,
    pub category: String,
    pub status: ProjectStatus,
    pub featured: bool,
    #[serde(default)]
    pub links: ProjectLinks,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<String>>,
    pub technologies: Vec<String>,
    pub category: String,
    pub status: ProjectStatus,
    pub featured: bool,
    #[serde(default)]
    pub links: ProjectLinks,
    pub author: AuthorRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub image: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
    pub category: Option<String>,
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    pub links: Option<ProjectLinks>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_deserializes_to_user() {
        let role: Role = serde_json::from_str("\"superuser\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn role_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(role, Role::Editor);
    }

    #[test]
    fn post_serializes_camel_case() {
        let post = BlogPost {
            id: "1".into(),
            title: "T".into(),
            slug: "t".into(),
            content: String::new(),
            excerpt: String::new(),
            tags: vec![],
            category: "general".into(),
            status: PostStatus::Draft,
            author: AuthorRef {
                id: "1".into(),
                name: "Admin".into(),
                email: "admin@portfolio.com".into(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
            published_at: None,
            seo: None,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("publishedAt").is_none());
    }
}
