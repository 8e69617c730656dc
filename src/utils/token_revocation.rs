use moka::future::Cache;
use std::time::Duration;

/// Token ids revoked by logout. Entries only need to outlive the access
/// token itself, so the TTL matches the token lifetime.
#[derive(Clone)]
pub struct TokenRevocations {
    revoked: Cache<String, ()>,
}

impl TokenRevocations {
    pub fn new(token_ttl: Duration) -> Self {
        Self {
            revoked: Cache::builder()
                .max_capacity(500_000)
                .time_to_live(token_ttl)
                .build(),
        }
    }

    pub async fn revoke(&self, jti: &str) {
        self.revoked.insert(jti.to_string(), ()).await;
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn revoked_ids_are_remembered() {
        let revocations = TokenRevocations::new(Duration::from_secs(60));
        assert!(!revocations.is_revoked("jti-1"));
        revocations.revoke("jti-1").await;
        assert!(revocations.is_revoked("jti-1"));
        assert!(!revocations.is_revoked("jti-2"));
    }
}
