use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::Claims;
use super::errors::JwtError;

/// Authorization scheme expected in front of the token.
pub const BEARER_SCHEME: &str = "Bearer";

/// JWT codec for issuing and validating bearer tokens.
///
/// Tokens are signed with HS256. Validation accepts only the HMAC family and
/// rejects every other signing method before the signature is checked.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: Option<String>,
    audience: Option<String>,
}

impl JwtHandler {
    /// Create a new JWT handler with a shared secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: None,
            audience: None,
        }
    }

    /// Require validated tokens to carry this issuer.
    pub fn with_issuer(mut self, issuer: impl ToString) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    /// Require validated tokens to carry this audience.
    pub fn with_audience(mut self, audience: impl ToString) -> Self {
        self.audience = Some(audience.to_string());
        self
    }

    /// Sign claims into a compact JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate an `Authorization` header value and return its claims.
    ///
    /// # Arguments
    /// * `authorization` - Raw header value, `Bearer <token>`
    ///
    /// # Errors
    /// * `InvalidAuthHeader` - Header is not exactly the scheme plus one token
    /// * `InvalidSigningMethod` - Token is not HMAC-signed
    /// * `InvalidToken` - Token is malformed or the signature does not verify
    /// * `ExpiredToken` - Token expiry is at or before now
    pub fn validate_header(&self, authorization: &str) -> Result<Claims, JwtError> {
        self.validate_header_at(authorization, Utc::now().timestamp())
    }

    /// Same as [`JwtHandler::validate_header`], evaluated at a given Unix time.
    pub fn validate_header_at(&self, authorization: &str, now: i64) -> Result<Claims, JwtError> {
        let token = extract_bearer_token(authorization)?;
        self.decode_at(token, now)
    }

    /// Decode and validate a bare token at a given Unix time.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let alg = raw_algorithm(token)?;
        if !HMAC_ALGORITHMS.contains(&alg.as_str()) {
            return Err(JwtError::InvalidSigningMethod(alg));
        }

        let header = decode_header(token).map_err(|e| JwtError::InvalidToken(e.to_string()))?;
        let validation = self.validation(header.alg);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidAlgorithm => JwtError::InvalidSigningMethod(e.to_string()),
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        let claims = token_data.claims;
        if claims.is_expired(now) {
            return Err(JwtError::ExpiredToken);
        }

        Ok(claims)
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        // Expiry is checked against the caller's clock in `decode_at`.
        validation.validate_exp = false;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        validation
    }
}

const HMAC_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Read `alg` as written, so names outside the crate's algorithm set still
/// count as a signing method rather than a malformed token.
fn raw_algorithm(token: &str) -> Result<String, JwtError> {
    let segment = token
        .split('.')
        .next()
        .ok_or_else(|| JwtError::InvalidToken("missing header".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;
    let header: RawHeader =
        serde_json::from_slice(&bytes).map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(header.alg)
}

fn extract_bearer_token(authorization: &str) -> Result<&str, JwtError> {
    let mut parts = authorization.split(' ');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(JwtError::InvalidAuthHeader),
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use chrono::Duration;
    use jsonwebtoken::EncodingKey;

    use super::*;

    fn claims_from(now: DateTime<Utc>) -> Claims {
        Claims::new("u1", "user", now, now + Duration::hours(1))
            .with_issuer("app")
            .with_audience("app")
    }

    #[test]
    fn test_issue_and_validate() {
        let handler = JwtHandler::new(b"s");
        let token = handler.issue(&claims_from(Utc::now())).expect("Failed to issue");

        let claims = handler
            .validate_header(&format!("Bearer {}", token))
            .expect("Failed to validate");

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_validate_with_expected_issuer_and_audience() {
        let issuer = JwtHandler::new(b"s");
        let token = issuer.issue(&claims_from(Utc::now())).unwrap();

        let strict = JwtHandler::new(b"s").with_issuer("app").with_audience("app");
        assert!(strict.validate_header(&format!("Bearer {}", token)).is_ok());

        let other_audience = JwtHandler::new(b"s").with_audience("elsewhere");
        assert!(matches!(
            other_audience.validate_header(&format!("Bearer {}", token)),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = JwtHandler::new(b"s").issue(&claims_from(Utc::now())).unwrap();

        let result = JwtHandler::new(b"other").validate_header(&format!("Bearer {}", token));
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let issued_at = Utc::now();
        let handler = JwtHandler::new(b"s");
        let token = handler.issue(&claims_from(issued_at)).unwrap();

        let one_hour_one_second_later = (issued_at + Duration::seconds(3601)).timestamp();
        let result = handler.validate_header_at(&format!("Bearer {}", token), one_hour_one_second_later);
        assert_eq!(result, Err(JwtError::ExpiredToken));
    }

    #[test]
    fn test_validate_expiry_boundary_is_expired() {
        let issued_at = Utc::now();
        let handler = JwtHandler::new(b"s");
        let claims = claims_from(issued_at);
        let token = handler.issue(&claims).unwrap();

        let result = handler.validate_header_at(&format!("Bearer {}", token), claims.exp);
        assert_eq!(result, Err(JwtError::ExpiredToken));
    }

    #[test]
    fn test_validate_already_expired_against_wall_clock() {
        let issued_at = Utc::now() - Duration::hours(2);
        let handler = JwtHandler::new(b"s");
        let token = handler.issue(&claims_from(issued_at)).unwrap();

        let result = handler.validate_header(&format!("Bearer {}", token));
        assert_eq!(result, Err(JwtError::ExpiredToken));
    }

    #[test]
    fn test_invalid_auth_header_shapes() {
        let handler = JwtHandler::new(b"s");
        let token = handler.issue(&claims_from(Utc::now())).unwrap();

        for header in [
            String::new(),
            token.clone(),
            format!("Basic {}", token),
            format!("Bearer  {}", token),
            format!("Bearer {} extra", token),
            "Bearer ".to_string(),
        ] {
            assert_eq!(
                handler.validate_header(&header),
                Err(JwtError::InvalidAuthHeader),
                "header {:?} should be rejected",
                header
            );
        }
    }

    #[test]
    fn test_reject_non_hmac_signing_method() {
        // Header {"alg":"RS256","typ":"JWT"} with an arbitrary payload and signature
        let header = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";
        let token = format!("{}.eyJzdWIiOiJ1MSJ9.c2lnbmF0dXJl", header);

        let result = JwtHandler::new(b"s").validate_header(&format!("Bearer {}", token));
        assert!(matches!(result, Err(JwtError::InvalidSigningMethod(_))));
    }

    #[test]
    fn test_reject_alg_none() {
        // Header {"alg":"none","typ":"JWT"}, unsigned
        let header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let token = format!("{}.eyJzdWIiOiJ1MSJ9.", header);

        let result = JwtHandler::new(b"s").validate_header(&format!("Bearer {}", token));
        assert_eq!(
            result,
            Err(JwtError::InvalidSigningMethod("none".to_string()))
        );
    }

    #[test]
    fn test_reject_malformed_token() {
        let result = JwtHandler::new(b"s").validate_header("Bearer invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_accept_other_hmac_variants() {
        let now = Utc::now();
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims_from(now),
            &EncodingKey::from_secret(b"s"),
        )
        .unwrap();

        let claims = JwtHandler::new(b"s")
            .validate_header(&format!("Bearer {}", token))
            .expect("HS512 should be accepted");
        assert_eq!(claims.sub, "u1");
    }
}
