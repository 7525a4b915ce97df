//! HS256 bearer-token verification.
//!
//! Tokens are minted by the platform's login endpoint (outside this crate)
//! with claims `{userId, role, iat, exp}`; this gate only verifies them.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, Identity, IdentityGate, Role, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    pub user_id: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtIdentityGate {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityGate {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl IdentityGate for JwtIdentityGate {
    fn verify(&self, credential: &str) -> Result<Identity, AuthError> {
        if credential.trim().is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let data = decode::<JwtClaims>(credential, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token verification failed: {}", e);
                AuthError::InvalidCredential(e.to_string())
            })?;

        let user_id = UserId::new(data.claims.user_id)
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))?;
        Ok(Identity::new(user_id, data.claims.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token(user_id: &str, role: Role, exp_offset_secs: i64, secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            user_id: user_id.to_string(),
            role,
            iat: now,
            exp: now + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        // テスト項目: 正しい署名のトークンから ID とロールを取得できる
        // given (前提条件):
        let gate = JwtIdentityGate::new(SECRET);
        let credential = token("investor-1", Role::Investor, 3600, SECRET);

        // when (操作):
        let identity = gate.verify(&credential).unwrap();

        // then (期待する結果):
        assert_eq!(identity.user_id.as_str(), "investor-1");
        assert_eq!(identity.role, Role::Investor);
    }

    #[test]
    fn test_verify_wrong_secret_fails() {
        // テスト項目: 異なる秘密鍵で署名されたトークンは拒否される
        let gate = JwtIdentityGate::new(SECRET);
        let credential = token("investor-1", Role::Investor, 3600, "other-secret");

        assert!(matches!(
            gate.verify(&credential),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_verify_expired_token_fails() {
        // テスト項目: 期限切れのトークンは拒否される
        let gate = JwtIdentityGate::new(SECRET);
        let credential = token("founder-1", Role::Entrepreneur, -3600, SECRET);

        assert!(matches!(
            gate.verify(&credential),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_verify_empty_credential() {
        // テスト項目: 空のクレデンシャルは MissingCredential
        let gate = JwtIdentityGate::new(SECRET);
        assert_eq!(gate.verify(""), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_verify_garbage_fails() {
        // テスト項目: JWT 形式でない文字列は拒否される
        let gate = JwtIdentityGate::new(SECRET);
        assert!(gate.verify("not-a-jwt").is_err());
    }
}
