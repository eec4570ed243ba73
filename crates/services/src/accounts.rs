//! # AccountService
//!
//! Registration, login and account removal. Posts survive their author's
//! removal with a null author; the store drops the author's interactions.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    CredentialHasher, DomainError, RequestContext, Result, SessionTokens, User, UserId,
    UserRepository, Viewer,
};
use tracing::info;

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const USERNAME_CHARS: std::ops::RangeInclusive<usize> = 3..=32;

/// A successful login: who signed in and the token that proves it.
#[derive(Debug, Clone)]
pub struct Session {
    pub viewer: Viewer,
    pub token: String,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn SessionTokens>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn SessionTokens>,
    ) -> Self {
        Self { users, hasher, tokens }
    }

    /// Creates an account and signs it in.
    pub async fn register(&self, username: &str, password: &str) -> Result<Session> {
        let username = username.trim();
        validate_username(username)?;
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(DomainError::Validation(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }

        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: self.hasher.hash(password)?,
            created_at: Utc::now(),
        };
        self.users.insert(&user).await?;

        info!(user_id = %user.id, "account registered");
        self.session_for(user)
    }

    /// Checks credentials and issues a session token.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .filter(|u| self.hasher.verify(password, &u.password_hash))
            .ok_or(DomainError::Unauthenticated)?;

        let session = self.session_for(user)?;
        info!(user_id = %session.viewer.id, "signed in");
        Ok(session)
    }

    fn session_for(&self, user: User) -> Result<Session> {
        let viewer = Viewer { id: user.id, username: user.username };
        let token = self.tokens.issue(&viewer)?;
        Ok(Session { viewer, token })
    }

    /// Resolves a session token into a request context.
    ///
    /// Bad tokens, and tokens whose account no longer exists, yield an anonymous
    /// context. Only storage failures are errors.
    pub async fn context_from_token(&self, token: Option<&str>) -> Result<RequestContext> {
        let Some(token) = token else {
            return Ok(RequestContext::anonymous());
        };
        let claimed = match self.tokens.verify(token) {
            Ok(viewer) => viewer,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid session token");
                return Ok(RequestContext::anonymous());
            }
        };

        match self.users.find(claimed.id).await? {
            Some(user) => Ok(RequestContext::authenticated(Viewer { id: user.id, username: user.username })),
            None => {
                tracing::debug!(user_id = %claimed.id, "session token for a removed account");
                Ok(RequestContext::anonymous())
            }
        }
    }

    pub async fn delete_account(&self, ctx: &RequestContext) -> Result<()> {
        let viewer = ctx.require_viewer()?;
        if !self.users.delete(viewer.id).await? {
            return Err(DomainError::not_found("user", viewer.id));
        }
        info!(user_id = %viewer.id, "account deleted");
        Ok(())
    }
}

fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !USERNAME_CHARS.contains(&len) {
        return Err(DomainError::Validation(format!(
            "username must be {} to {} characters",
            USERNAME_CHARS.start(),
            USERNAME_CHARS.end()
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(DomainError::Validation(
            "username may only contain letters, digits, '_', '-' and '.'".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockCredentialHasher, MockSessionTokens, MockUserRepository};

    fn stored(name: &str) -> User {
        User {
            id: UserId::new(),
            username: name.into(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
        }
    }

    fn service(users: MockUserRepository, hasher: MockCredentialHasher, tokens: MockSessionTokens) -> AccountService {
        AccountService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
    }

    #[tokio::test]
    async fn register_hashes_password_before_storing() {
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().returning(|_| Ok("hash".into()));
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .withf(|u| u.username == "carol" && u.password_hash == "hash")
            .times(1)
            .returning(|_| Ok(()));
        let mut tokens = MockSessionTokens::new();
        tokens
            .expect_issue()
            .withf(|v| v.username == "carol")
            .times(1)
            .returning(|_| Ok("tok".into()));

        let svc = service(users, hasher, tokens);
        let session = svc.register("  carol ", "correct horse").await.unwrap();
        assert_eq!(session.viewer.username, "carol");
        assert_eq!(session.token, "tok");
    }

    #[tokio::test]
    async fn register_issues_token_without_reading_the_user_back() {
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().returning(|_| Ok("hash".into()));
        hasher.expect_verify().never();
        let mut users = MockUserRepository::new();
        users.expect_insert().returning(|_| Ok(()));
        users.expect_find_by_username().never();
        let mut tokens = MockSessionTokens::new();
        tokens.expect_issue().times(1).returning(|_| Ok("tok".into()));

        assert!(service(users, hasher, tokens).register("frank", "long enough").await.is_ok());
    }

    #[tokio::test]
    async fn register_rejects_bad_input() {
        let svc = service(MockUserRepository::new(), MockCredentialHasher::new(), MockSessionTokens::new());
        for (name, pass) in [("ab", "longenough"), ("bad name", "longenough"), ("carol", "short")] {
            let err = svc.register(name, pass).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{name}/{pass}");
        }
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthenticated() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|n| Ok(Some(stored(n))));
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify().returning(|_, _| false);
        let mut tokens = MockSessionTokens::new();
        tokens.expect_issue().never();

        let err = service(users, hasher, tokens).login("dave", "nope").await.unwrap_err();
        assert_eq!(err, DomainError::Unauthenticated);
    }

    #[tokio::test]
    async fn login_issues_token_for_viewer() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|n| Ok(Some(stored(n))));
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify().returning(|_, _| true);
        let mut tokens = MockSessionTokens::new();
        tokens
            .expect_issue()
            .withf(|v| v.username == "erin")
            .returning(|_| Ok("tok".into()));

        let session = service(users, hasher, tokens).login("erin", "pw").await.unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.viewer.username, "erin");
    }

    #[tokio::test]
    async fn invalid_token_yields_anonymous_context() {
        let mut tokens = MockSessionTokens::new();
        tokens.expect_verify().returning(|_| Err(DomainError::Unauthenticated));
        let mut users = MockUserRepository::new();
        users.expect_find().never();
        let svc = service(users, MockCredentialHasher::new(), tokens);

        assert!(!svc.context_from_token(Some("garbage")).await.unwrap().is_authenticated());
        assert!(!svc.context_from_token(None).await.unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn token_of_existing_account_authenticates_with_stored_name() {
        let user = stored("grace");
        let id = user.id;
        let mut tokens = MockSessionTokens::new();
        tokens
            .expect_verify()
            .returning(move |_| Ok(Viewer { id, username: "old-name".into() }));
        let mut users = MockUserRepository::new();
        users.expect_find().withf(move |u| *u == id).returning(move |_| Ok(Some(user.clone())));

        let ctx = service(users, MockCredentialHasher::new(), tokens)
            .context_from_token(Some("tok"))
            .await
            .unwrap();
        assert_eq!(ctx.viewer_id(), Some(id));
        assert_eq!(ctx.viewer.map(|v| v.username), Some("grace".into()));
    }

    #[tokio::test]
    async fn token_of_removed_account_is_anonymous() {
        let mut tokens = MockSessionTokens::new();
        tokens
            .expect_verify()
            .returning(|_| Ok(Viewer { id: UserId::new(), username: "gone".into() }));
        let mut users = MockUserRepository::new();
        users.expect_find().returning(|_| Ok(None));

        let ctx = service(users, MockCredentialHasher::new(), tokens)
            .context_from_token(Some("tok"))
            .await
            .unwrap();
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn storage_failure_while_resolving_token_is_reported() {
        let mut tokens = MockSessionTokens::new();
        tokens
            .expect_verify()
            .returning(|_| Ok(Viewer { id: UserId::new(), username: "x".into() }));
        let mut users = MockUserRepository::new();
        users.expect_find().returning(|_| Err(DomainError::Internal("db down".into())));

        let err = service(users, MockCredentialHasher::new(), tokens)
            .context_from_token(Some("tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn delete_account_requires_login() {
        let mut users = MockUserRepository::new();
        users.expect_delete().never();
        let svc = service(users, MockCredentialHasher::new(), MockSessionTokens::new());
        let err = svc.delete_account(&RequestContext::anonymous()).await.unwrap_err();
        assert_eq!(err, DomainError::Unauthenticated);
    }
}
