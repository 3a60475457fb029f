use crate::db::Store;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::middleware::permissions::{check_post_deletion, check_post_update};
use crate::models::{Post, PostInput, PostListQuery, User};
use std::sync::Arc;
use tracing::{info, warn};

pub struct PostService {
    store: Arc<dyn Store>,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_post(&self, author: &User, input: PostInput) -> Result<Post> {
        let post = self
            .store
            .create_post(author.id, &input.title, &input.content)
            .await?;

        metrics::record_post_mutation("create", "ok");
        info!(post_id = post.id, user_id = author.id, "Post created");
        Ok(post)
    }

    pub async fn list_posts(&self, query: PostListQuery) -> Result<Vec<Post>> {
        let (skip, limit) = query.normalized();
        self.store.list_posts(skip, limit).await
    }

    /// Missing posts report `PostNotFound` before ownership is considered,
    /// and a payload error only surfaces once the actor owns the post.
    pub async fn update_post(
        &self,
        actor: &User,
        post_id: i64,
        input: Result<PostInput>,
    ) -> Result<Post> {
        let post = self.load(post_id).await?;
        self.guard("update", check_post_update(actor, &post))?;
        let input = input?;

        let updated = self
            .store
            .update_post(post_id, actor.id, &input.title, &input.content)
            .await?
            .ok_or(AppError::PostNotFound)?;

        metrics::record_post_mutation("update", "ok");
        info!(post_id, user_id = actor.id, "Post updated");
        Ok(updated)
    }

    pub async fn delete_post(&self, actor: &User, post_id: i64) -> Result<()> {
        let post = self.load(post_id).await?;
        self.guard("delete", check_post_deletion(actor, &post))?;

        if !self.store.delete_post(post_id, actor.id).await? {
            return Err(AppError::PostNotFound);
        }

        metrics::record_post_mutation("delete", "ok");
        info!(post_id, user_id = actor.id, "Post deleted");
        Ok(())
    }

    async fn load(&self, post_id: i64) -> Result<Post> {
        self.store
            .find_post(post_id)
            .await?
            .ok_or(AppError::PostNotFound)
    }

    fn guard(&self, action: &'static str, check: Result<()>) -> Result<()> {
        check.map_err(|e| {
            metrics::record_post_mutation(action, "forbidden");
            warn!(action, "Rejected post mutation by non-owner");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;

    fn input(title: &str) -> PostInput {
        PostInput {
            title: title.into(),
            content: "body".into(),
        }
    }

    async fn setup() -> (PostService, User, User) {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let owner = store.create_user("a@x.com", "hash").await.unwrap();
        let stranger = store.create_user("b@x.com", "hash").await.unwrap();
        (PostService::new(store), owner, stranger)
    }

    #[tokio::test]
    async fn test_owner_can_update_and_delete() {
        let (posts, owner, _) = setup().await;
        let post = posts.create_post(&owner, input("P1")).await.unwrap();
        assert_eq!(post.owner_id, owner.id);

        let updated = posts
            .update_post(&owner, post.id, Ok(input("P1 v2")))
            .await
            .unwrap();
        assert_eq!(updated.title, "P1 v2");

        posts.delete_post(&owner, post.id).await.unwrap();
        assert!(posts
            .list_posts(PostListQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden_regardless_of_payload() {
        let (posts, owner, stranger) = setup().await;
        let post = posts.create_post(&owner, input("P1")).await.unwrap();

        let empty = PostInput {
            title: String::new(),
            content: String::new(),
        };
        assert!(matches!(
            posts.update_post(&stranger, post.id, Ok(empty)).await.unwrap_err(),
            AppError::Forbidden
        ));
        assert!(matches!(
            posts
                .update_post(
                    &stranger,
                    post.id,
                    Err(AppError::Validation("missing field `content`".into()))
                )
                .await
                .unwrap_err(),
            AppError::Forbidden
        ));
        assert!(matches!(
            posts.delete_post(&stranger, post.id).await.unwrap_err(),
            AppError::Forbidden
        ));

        let unchanged = posts.list_posts(PostListQuery::default()).await.unwrap();
        assert_eq!(unchanged, vec![post]);
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found_before_forbidden() {
        let (posts, _, stranger) = setup().await;

        assert!(matches!(
            posts.delete_post(&stranger, 404).await.unwrap_err(),
            AppError::PostNotFound
        ));
        assert!(matches!(
            posts
                .update_post(&stranger, 404, Ok(input("x")))
                .await
                .unwrap_err(),
            AppError::PostNotFound
        ));
    }

    #[tokio::test]
    async fn test_owner_payload_error_surfaces_after_guard() {
        let (posts, owner, _) = setup().await;
        let post = posts.create_post(&owner, input("P1")).await.unwrap();

        let err = posts
            .update_post(&owner, post.id, Err(AppError::Validation("bad body".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "bad body"));

        let listed = posts.list_posts(PostListQuery::default()).await.unwrap();
        assert_eq!(listed[0].title, "P1");
    }

    #[tokio::test]
    async fn test_listing_defaults_to_five_newest() {
        let (posts, owner, _) = setup().await;
        for n in 1..=7 {
            posts
                .create_post(&owner, input(&format!("P{}", n)))
                .await
                .unwrap();
        }

        let titles: Vec<String> = posts
            .list_posts(PostListQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["P7", "P6", "P5", "P4", "P3"]);
    }
}
