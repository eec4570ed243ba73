use chrono::{Duration, Utc};
use domains::{DomainError, Result, SessionTokens, UserId, Viewer};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    name: String,
    iat: i64,
    exp: i64,
}

/// HS256-signed session tokens carrying the viewer's id and username.
pub struct JwtSessions {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtSessions {
    pub fn new(secret: &SecretString, ttl_secs: i64) -> Self {
        let key = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            ttl: Duration::seconds(ttl_secs),
        }
    }
}

impl SessionTokens for JwtSessions {
    fn issue(&self, viewer: &Viewer) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: viewer.id.0,
            name: viewer.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| DomainError::Internal(format!("token signing failed: {e}")))
    }

    fn verify(&self, token: &str) -> Result<Viewer> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected session token");
            DomainError::Unauthenticated
        })?;
        Ok(Viewer { id: UserId(data.claims.sub), username: data.claims.name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions(secret: &str, ttl: i64) -> JwtSessions {
        JwtSessions::new(&SecretString::from(secret.to_string()), ttl)
    }

    #[test]
    fn issued_token_verifies_to_same_viewer() {
        let s = sessions("s3cret", 3600);
        let viewer = Viewer { id: UserId::new(), username: "gus".into() };
        let token = s.issue(&viewer).unwrap();
        assert_eq!(s.verify(&token).unwrap(), viewer);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let viewer = Viewer { id: UserId::new(), username: "gus".into() };
        let token = sessions("one", 3600).issue(&viewer).unwrap();
        assert_eq!(sessions("two", 3600).verify(&token), Err(DomainError::Unauthenticated));
    }

    #[test]
    fn expired_token_is_rejected() {
        let s = sessions("s3cret", -120);
        let token = s.issue(&Viewer { id: UserId::new(), username: "gus".into() }).unwrap();
        assert_eq!(s.verify(&token), Err(DomainError::Unauthenticated));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(sessions("s3cret", 60).verify("not.a.jwt").is_err());
    }
}
