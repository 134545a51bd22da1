use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::helper::slug_helpers::slugify;
use crate::models::{BlogPost, BlogPostPatch, NewBlogPost, NewProject, PostStatus, Project, ProjectPatch};
use crate::storage::{keys, Storage, StorageError};

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Item not found in content store: {0}")]
    NotFound(String),
}

/// Persisted store for blog posts and projects. Every mutation rewrites the
/// whole collection under its key before returning, so callers re-read after
/// a mutation instead of trusting a stale copy.
pub struct ContentStore {
    storage: Arc<dyn Storage>,
    last_id: AtomicI64,
}

impl ContentStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            last_id: AtomicI64::new(0),
        }
    }

    /// Time-based id, bumped past the previously issued one so two creates
    /// in the same millisecond stay distinct and ids grow monotonically
    /// within a session.
    fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last_id.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last_id
                .compare_exchange(prev, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return candidate.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, ContentError> {
        match self.storage.load(key)? {
            None => Ok(Vec::new()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(items) => Ok(items),
                Err(e) => {
                    log::warn!("Discarding corrupt '{}' collection: {}", key, e);
                    Ok(Vec::new())
                }
            },
        }
    }

    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), ContentError> {
        let json = serde_json::to_string(items)?;
        self.storage.save(key, &json)?;
        Ok(())
    }

    // ====================================================================
    // ============================ POSTS =================================
    // ====================================================================

    pub fn list_posts(&self) -> Result<Vec<BlogPost>, ContentError> {
        self.load_collection(keys::POSTS)
    }

    pub fn get_post(&self, id: &str) -> Result<Option<BlogPost>, ContentError> {
        Ok(self.list_posts()?.into_iter().find(|p| p.id == id))
    }

    pub fn create_post(&self, new_post: NewBlogPost) -> Result<BlogPost, ContentError> {
        let now = Utc::now();
        let post = BlogPost {
            id: self.next_id(),
            slug: slugify(&new_post.title),
            title: new_post.title,
            content: new_post.content,
            excerpt: new_post.excerpt,
            tags: new_post.tags,
            category: new_post.category,
            status: new_post.status,
            author: new_post.author,
            created_at: now,
            updated_at: now,
            published_at: (new_post.status == PostStatus::Published).then_some(now),
            seo: new_post.seo,
        };

        let mut posts = self.list_posts()?;
        posts.push(post.clone());
        self.save_collection(keys::POSTS, &posts)?;
        Ok(post)
    }

    /// Merges `patch` over the post with `id`. The slug follows the title
    /// when it changes, and `published_at` is stamped on each transition
    /// into `published`; reverting to draft leaves it in place.
    pub fn update_post(&self, id: &str, patch: BlogPostPatch) -> Result<BlogPost, ContentError> {
        let mut posts = self.list_posts()?;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ContentError::NotFound(format!("post {}", id)))?;

        if let Some(title) = patch.title {
            post.slug = slugify(&title);
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(tags) = patch.tags {
            post.tags = tags;
        }
        if let Some(category) = patch.category {
            post.category = category;
        }
        if let Some(status) = patch.status {
            if status == PostStatus::Published && post.status != PostStatus::Published {
                post.published_at = Some(Utc::now());
            }
            post.status = status;
        }
        if let Some(seo) = patch.seo {
            post.seo = Some(seo);
        }
        post.updated_at = Utc::now();

        let updated = post.clone();
        self.save_collection(keys::POSTS, &posts)?;
        Ok(updated)
    }

    /// Removing an id that is already gone is a no-op, not an error.
    pub fn delete_post(&self, id: &str) -> Result<(), ContentError> {
        let mut posts = self.list_posts()?;
        posts.retain(|p| p.id != id);
        self.save_collection(keys::POSTS, &posts)
    }

    // ====================================================================
    // =========================== PROJECTS ===============================
    // ====================================================================

    pub fn list_projects(&self) -> Result<Vec<Project>, ContentError> {
        self.load_collection(keys::PROJECTS)
    }

    pub fn get_project(&self, id: &str) -> Result<Option<Project>, ContentError> {
        Ok(self.list_projects()?.into_iter().find(|p| p.id == id))
    }

    pub fn create_project(&self, new_project: NewProject) -> Result<Project, ContentError> {
        let now = Utc::now();
        let project = Project {
            id: self.next_id(),
            slug: slugify(&new_project.title),
            title: new_project.title,
            description: new_project.description,
            long_description: new_project.long_description,
            image: new_project.image,
            gallery: new_project.gallery,
            technologies: new_project.technologies,
            category: new_project.category,
            status: new_project.status,
            featured: new_project.featured,
            links: new_project.links,
            author: new_project.author,
            created_at: now,
            updated_at: now,
            start_date: new_project.start_date,
            end_date: new_project.end_date,
        };

        let mut projects = self.list_projects()?;
        projects.push(project.clone());
        self.save_collection(keys::PROJECTS, &projects)?;
        Ok(project)
    }

    pub fn update_project(&self, id: &str, patch: ProjectPatch) -> Result<Project, ContentError> {
        let mut projects = self.list_projects()?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ContentError::NotFound(format!("project {}", id)))?;

        if let Some(title) = patch.title {
            project.slug = slugify(&title);
            project.title = title;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(long_description) = patch.long_description {
            project.long_description = long_description;
        }
        if let Some(image) = patch.image {
            project.image = image;
        }
        if let Some(gallery) = patch.gallery {
            project.gallery = Some(gallery);
        }
        if let Some(technologies) = patch.technologies {
            project.technologies = technologies;
        }
        if let Some(category) = patch.category {
            project.category = category;
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        if let Some(featured) = patch.featured {
            project.featured = featured;
        }
        if let Some(links) = patch.links {
            project.links = links;
        }
        if let Some(start_date) = patch.start_date {
            project.start_date = Some(start_date);
        }
        if let Some(end_date) = patch.end_date {
            project.end_date = Some(end_date);
        }
        project.updated_at = Utc::now();

        let updated = project.clone();
        self.save_collection(keys::PROJECTS, &projects)?;
        Ok(updated)
    }

    pub fn delete_project(&self, id: &str) -> Result<(), ContentError> {
        let mut projects = self.list_projects()?;
        projects.retain(|p| p.id != id);
        self.save_collection(keys::PROJECTS, &projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorRef, ProjectStatus};
    use crate::storage::MemoryStorage;

    fn store() -> ContentStore {
        ContentStore::new(Arc::new(MemoryStorage::new()))
    }

    fn author() -> AuthorRef {
        AuthorRef {
            id: "1".to_string(),
            name: "Admin".to_string(),
            email: "admin@portfolio.com".to_string(),
        }
    }

    fn draft_post(title: &str) -> NewBlogPost {
        NewBlogPost {
            title: title.to_string(),
            content: "body".to_string(),
            excerpt: "excerpt".to_string(),
            tags: vec!["rust".to_string()],
            category: "general".to_string(),
            status: PostStatus::Draft,
            author: author(),
            seo: None,
        }
    }

    #[test]
    fn create_then_list_round_trips() {
        let store = store();
        let created = store.create_post(draft_post("Hello, World! 2024")).unwrap();
        assert_eq!(created.slug, "hello-world-2024");
        assert!(created.published_at.is_none());

        let posts = store.list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, created.id);
        assert_eq!(posts[0].title, "Hello, World! 2024");
        assert_eq!(posts[0].content, "body");
    }

    #[test]
    fn empty_store_lists_empty() {
        assert!(store().list_posts().unwrap().is_empty());
        assert!(store().list_projects().unwrap().is_empty());
    }

    #[test]
    fn corrupt_collection_recovers_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.save(keys::POSTS, "{not json").unwrap();
        let store = ContentStore::new(storage);
        assert!(store.list_posts().unwrap().is_empty());
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let store = store();
        let a: i64 = store.create_post(draft_post("A")).unwrap().id.parse().unwrap();
        let b: i64 = store.create_post(draft_post("B")).unwrap().id.parse().unwrap();
        let c: i64 = store.create_post(draft_post("C")).unwrap().id.parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn publishing_stamps_published_at() {
        let store = store();
        let created = store.create_post(draft_post("Draft")).unwrap();

        let published = store
            .update_post(
                &created.id,
                BlogPostPatch {
                    status: Some(PostStatus::Published),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(published.published_at.is_some());

        // Reverting to draft keeps the first publication timestamp.
        let reverted = store
            .update_post(
                &created.id,
                BlogPostPatch {
                    status: Some(PostStatus::Draft),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(reverted.published_at, published.published_at);
    }

    #[test]
    fn creating_as_published_stamps_published_at() {
        let store = store();
        let mut new_post = draft_post("Live");
        new_post.status = PostStatus::Published;
        let created = store.create_post(new_post).unwrap();
        assert!(created.published_at.is_some());
    }

    #[test]
    fn update_merges_and_rederives_slug() {
        let store = store();
        let created = store.create_post(draft_post("Old Title")).unwrap();
        let updated = store
            .update_post(
                &created.id,
                BlogPostPatch {
                    title: Some("New Title!".to_string()),
                    excerpt: Some("new excerpt".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.slug, "new-title");
        assert_eq!(updated.excerpt, "new excerpt");
        // Untouched fields survive the merge.
        assert_eq!(updated.content, "body");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn update_unknown_id_reports_not_found() {
        let store = store();
        let err = store.update_post("12345", BlogPostPatch::default()).unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[test]
    fn delete_is_idempotent() {
        let store = store();
        let created = store.create_post(draft_post("Gone")).unwrap();
        store.create_post(draft_post("Stays")).unwrap();

        store.delete_post(&created.id).unwrap();
        assert_eq!(store.list_posts().unwrap().len(), 1);

        // Deleting again changes nothing and is not an error.
        store.delete_post(&created.id).unwrap();
        assert_eq!(store.list_posts().unwrap().len(), 1);
    }

    #[test]
    fn project_crud_follows_the_same_pattern() {
        let store = store();
        let created = store
            .create_project(NewProject {
                title: "Portfolio Site".to_string(),
                description: "short".to_string(),
                long_description: "long".to_string(),
                image: "/img/site.png".to_string(),
                gallery: None,
                technologies: vec!["rust".to_string()],
                category: "web".to_string(),
                status: ProjectStatus::Active,
                featured: true,
                links: Default::default(),
                author: author(),
                start_date: None,
                end_date: None,
            })
            .unwrap();
        assert_eq!(created.slug, "portfolio-site");

        let updated = store
            .update_project(
                &created.id,
                ProjectPatch {
                    status: Some(ProjectStatus::Completed),
                    featured: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::Completed);
        assert!(!updated.featured);

        store.delete_project(&created.id).unwrap();
        assert!(store.list_projects().unwrap().is_empty());
        store.delete_project(&created.id).unwrap();
    }
}
