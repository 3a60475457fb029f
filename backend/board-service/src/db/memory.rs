use super::Store;
use crate::error::{AppError, Result};
use crate::models::{Comment, LikeStatus, Post, User};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    users_by_email: HashMap<String, i64>,
    posts: BTreeMap<i64, Post>,
    /// `(post_id, user_id)`; the set enforces one like per pair
    likes: BTreeSet<(i64, i64)>,
    comments: BTreeMap<i64, Comment>,
    next_user_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn like_count(&self, post_id: i64) -> i64 {
        self.likes
            .range((post_id, i64::MIN)..=(post_id, i64::MAX))
            .count() as i64
    }

    /// Writes by an account that no longer exists are unauthenticated.
    fn require_user(&self, user_id: i64) -> Result<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(AppError::Unauthenticated)
        }
    }
}

/// Store that keeps every table in process memory.
///
/// Each operation holds the lock for its full duration, which makes it as
/// atomic as a single database transaction. Data is lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| AppError::Internal(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| AppError::Internal(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User> {
        let mut tables = self.write()?;
        if tables.users_by_email.contains_key(email) {
            return Err(AppError::EmailAlreadyRegistered);
        }

        let user = User {
            id: Tables::next_id(&mut tables.next_user_id),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        tables.users_by_email.insert(user.email.clone(), user.id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.read()?;
        Ok(tables
            .users_by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create_post(&self, owner_id: i64, title: &str, content: &str) -> Result<Post> {
        let mut tables = self.write()?;
        tables.require_user(owner_id)?;

        let post = Post {
            id: Tables::next_id(&mut tables.next_post_id),
            title: title.to_string(),
            content: content.to_string(),
            owner_id,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<Post>> {
        Ok(self.read()?.posts.get(&post_id).cloned())
    }

    async fn list_posts(&self, skip: i64, limit: i64) -> Result<Vec<Post>> {
        let tables = self.read()?;
        Ok(tables
            .posts
            .values()
            .rev()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update_post(
        &self,
        post_id: i64,
        owner_id: i64,
        title: &str,
        content: &str,
    ) -> Result<Option<Post>> {
        let mut tables = self.write()?;
        Ok(tables
            .posts
            .get_mut(&post_id)
            .filter(|post| post.owner_id == owner_id)
            .map(|post| {
                post.title = title.to_string();
                post.content = content.to_string();
                post.clone()
            }))
    }

    async fn delete_post(&self, post_id: i64, owner_id: i64) -> Result<bool> {
        let mut tables = self.write()?;
        let owned = tables
            .posts
            .get(&post_id)
            .is_some_and(|post| post.owner_id == owner_id);
        if !owned {
            return Ok(false);
        }

        tables.posts.remove(&post_id);
        tables.likes.retain(|(liked_post, _)| *liked_post != post_id);
        tables.comments.retain(|_, comment| comment.post_id != post_id);
        Ok(true)
    }

    async fn toggle_like(&self, user_id: i64, post_id: i64) -> Result<LikeStatus> {
        let mut tables = self.write()?;
        if !tables.posts.contains_key(&post_id) {
            return Err(AppError::PostNotFound);
        }
        tables.require_user(user_id)?;

        let liked = if tables.likes.remove(&(post_id, user_id)) {
            false
        } else {
            tables.likes.insert((post_id, user_id))
        };

        Ok(LikeStatus {
            likes: tables.like_count(post_id),
            liked,
        })
    }

    async fn count_likes(&self, post_id: i64) -> Result<i64> {
        Ok(self.read()?.like_count(post_id))
    }

    async fn has_liked(&self, user_id: i64, post_id: i64) -> Result<bool> {
        Ok(self.read()?.likes.contains(&(post_id, user_id)))
    }

    async fn create_comment(&self, user_id: i64, post_id: i64, content: &str) -> Result<Comment> {
        let mut tables = self.write()?;
        if !tables.posts.contains_key(&post_id) {
            return Err(AppError::PostNotFound);
        }
        tables.require_user(user_id)?;

        let comment = Comment {
            id: Tables::next_id(&mut tables.next_comment_id),
            content: content.to_string(),
            user_id,
            post_id,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        Ok(self
            .read()?
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryStore, User, Post) {
        let store = InMemoryStore::new();
        let user = store.create_user("a@x.com", "hash").await.unwrap();
        let post = store.create_post(user.id, "P1", "body").await.unwrap();
        (store, user, post)
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryStore::new();
        store.create_user("a@x.com", "hash").await.unwrap();

        let err = store.create_user("a@x.com", "other").await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyRegistered));
    }

    #[tokio::test]
    async fn test_list_posts_newest_first_with_paging() {
        let (store, user, _) = seeded().await;
        for n in 2..=4 {
            store
                .create_post(user.id, &format!("P{}", n), "body")
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .list_posts(1, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["P3", "P2"]);
    }

    #[tokio::test]
    async fn test_update_scoped_to_owner() {
        let (store, user, post) = seeded().await;

        assert!(store
            .update_post(post.id, user.id + 1, "hijack", "x")
            .await
            .unwrap()
            .is_none());

        let updated = store
            .update_post(post.id, user.id, "P1 edited", "new body")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "P1 edited");
        assert_eq!(updated.owner_id, user.id);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let (store, user, post) = seeded().await;
        store.toggle_like(user.id, post.id).await.unwrap();
        store.create_comment(user.id, post.id, "hi").await.unwrap();

        assert!(store.delete_post(post.id, user.id).await.unwrap());
        assert_eq!(store.count_likes(post.id).await.unwrap(), 0);
        assert!(store.list_comments(post.id).await.unwrap().is_empty());
        assert!(!store.delete_post(post.id, user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_flips_and_counts() {
        let (store, user, post) = seeded().await;
        let other = store.create_user("b@x.com", "hash").await.unwrap();

        let first = store.toggle_like(other.id, post.id).await.unwrap();
        assert_eq!(first, LikeStatus { likes: 1, liked: true });

        store.toggle_like(user.id, post.id).await.unwrap();
        assert_eq!(store.count_likes(post.id).await.unwrap(), 2);

        let undone = store.toggle_like(other.id, post.id).await.unwrap();
        assert_eq!(undone, LikeStatus { likes: 1, liked: false });
        assert!(!store.has_liked(other.id, post.id).await.unwrap());
        assert!(store.has_liked(user.id, post.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_like_counts_are_per_post() {
        let (store, user, first) = seeded().await;
        let second = store.create_post(user.id, "P2", "body").await.unwrap();

        store.toggle_like(user.id, second.id).await.unwrap();
        assert_eq!(store.count_likes(first.id).await.unwrap(), 0);
        assert_eq!(store.count_likes(second.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_post_errors() {
        let (store, user, _) = seeded().await;

        assert!(matches!(
            store.toggle_like(user.id, 999).await.unwrap_err(),
            AppError::PostNotFound
        ));
        assert!(matches!(
            store.create_comment(user.id, 999, "hi").await.unwrap_err(),
            AppError::PostNotFound
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_cannot_write() {
        let (store, user, post) = seeded().await;
        let ghost = user.id + 100;

        assert!(matches!(
            store.toggle_like(ghost, post.id).await.unwrap_err(),
            AppError::Unauthenticated
        ));
        assert!(matches!(
            store.create_comment(ghost, post.id, "boo").await.unwrap_err(),
            AppError::Unauthenticated
        ));
        assert!(matches!(
            store.create_post(ghost, "P2", "body").await.unwrap_err(),
            AppError::Unauthenticated
        ));

        assert_eq!(store.count_likes(post.id).await.unwrap(), 0);
        assert!(store.list_comments(post.id).await.unwrap().is_empty());
    }
}
