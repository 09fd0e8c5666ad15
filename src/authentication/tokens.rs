use anyhow::anyhow;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const REFRESH_TOKEN_LENGTH: usize = 43;

/// Issues and checks the bearer tokens handed out at `/adminlogin`.
///
/// Access tokens are stateless: `base64url(claims).base64url(hmac)` where the
/// claims are `<admin id>:<expiry as unix seconds>`. Refresh tokens are random
/// strings; only their SHA-256 digest is persisted.
#[derive(Clone)]
pub struct TokenIssuer {
    mac: HmacSha256,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

pub struct IssuedToken {
    pub token: Secret<String>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct AccessClaims {
    pub admin_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("The access token is malformed.")]
    Malformed,
    #[error("The access token signature does not match.")]
    BadSignature,
    #[error("The access token has expired.")]
    Expired,
}

impl TokenIssuer {
    pub fn new(
        signing_key: Secret<String>,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Result<TokenIssuer, anyhow::Error> {
        if signing_key.expose_secret().is_empty() {
            return Err(anyhow!("The token signing key must not be empty."));
        }
        let mac = HmacSha256::new_from_slice(signing_key.expose_secret().as_bytes())
            .map_err(|e| anyhow!("Invalid token signing key: {}", e))?;
        Ok(Self {
            mac,
            access_token_ttl,
            refresh_token_ttl,
        })
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn issue_access_token(&self, admin_id: Uuid, now: DateTime<Utc>) -> IssuedToken {
        let expires_at = now + self.access_token_ttl;
        let claims = format!("{}:{}", admin_id, expires_at.timestamp());
        let mut mac = self.mac.clone();
        mac.update(claims.as_bytes());
        let signature = mac.finalize().into_bytes();
        let token = format!(
            "{}.{}",
            base64::encode_config(claims.as_bytes(), base64::URL_SAFE_NO_PAD),
            base64::encode_config(signature, base64::URL_SAFE_NO_PAD)
        );
        IssuedToken {
            token: Secret::new(token),
            expires_at,
        }
    }

    pub fn verify_access_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessClaims, TokenError> {
        let (claims, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let claims = base64::decode_config(claims, base64::URL_SAFE_NO_PAD)
            .map_err(|_| TokenError::Malformed)?;
        let signature = base64::decode_config(signature, base64::URL_SAFE_NO_PAD)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac.clone();
        mac.update(&claims);
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims = String::from_utf8(claims).map_err(|_| TokenError::Malformed)?;
        let (admin_id, expires_at) = claims.split_once(':').ok_or(TokenError::Malformed)?;
        let admin_id = Uuid::parse_str(admin_id).map_err(|_| TokenError::Malformed)?;
        let expires_at = expires_at
            .parse::<i64>()
            .ok()
            .and_then(|seconds| Utc.timestamp_opt(seconds, 0).single())
            .ok_or(TokenError::Malformed)?;

        if expires_at <= now {
            return Err(TokenError::Expired);
        }
        Ok(AccessClaims {
            admin_id,
            expires_at,
        })
    }

    pub fn issue_refresh_token(&self, now: DateTime<Utc>) -> IssuedToken {
        let mut rng = rand::thread_rng();
        let token: String = std::iter::repeat_with(|| rng.sample(Alphanumeric))
            .map(char::from)
            .take(REFRESH_TOKEN_LENGTH)
            .collect();
        IssuedToken {
            token: Secret::new(token),
            expires_at: now + self.refresh_token_ttl,
        }
    }
}

/// The value stored in `refresh_tokens.token_hash`.
pub fn hash_refresh_token(token: &Secret<String>) -> String {
    format!("{:x}", Sha256::digest(token.expose_secret().as_bytes()))
}
