use crate::{ActorId, AuthzResult, CredentialVerifier, ResolveError, VerifiedCredential};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshClaims {
    pub iss: String,
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub super_admin: bool,
}

/// Mints HS256 session tokens for actors.
pub struct JwtCredentialIssuer {
    issuer: String,
    ttl: Duration,
    encoding_key: EncodingKey,
}

impl JwtCredentialIssuer {
    pub fn new(issuer: impl Into<String>, secret: &[u8], ttl: Duration) -> Self {
        Self {
            issuer: issuer.into(),
            ttl,
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    pub fn mint(&self, actor_id: &ActorId, admin: bool, super_admin: bool) -> AuthzResult<String> {
        let now = now_epoch_seconds();
        let claims = MeshClaims {
            iss: self.issuer.clone(),
            sub: actor_id.to_string(),
            exp: now + self.ttl.as_secs() as i64,
            iat: now,
            admin,
            super_admin,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }
}

/// Verifies HS256 session tokens against a shared secret and pinned issuer.
pub struct JwtCredentialVerifier {
    issuer: String,
    leeway: u64,
    decoding_key: DecodingKey,
}

impl JwtCredentialVerifier {
    pub fn new(issuer: impl Into<String>, secret: &[u8], leeway: u64) -> Self {
        Self {
            issuer: issuer.into(),
            leeway,
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    pub fn decode(&self, token: &str) -> AuthzResult<MeshClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway;
        let token = jsonwebtoken::decode::<MeshClaims>(token, &self.decoding_key, &validation)?;
        if token.claims.sub.is_empty() {
            return Err(ResolveError::Unauthorized("token subject is empty".into()).into());
        }
        Ok(token.claims)
    }
}

impl CredentialVerifier for JwtCredentialVerifier {
    fn verify(&self, token: &str) -> AuthzResult<VerifiedCredential> {
        let claims = self.decode(token)?;
        Ok(VerifiedCredential {
            actor_id: ActorId::new(claims.sub),
            admin: claims.admin,
            super_admin: claims.super_admin,
        })
    }
}

fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs() as i64
}
