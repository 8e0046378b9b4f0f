use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashSet;

/// The only claim we look at on the client. `exp` is a NumericDate, which may
/// have a fractional part.
#[derive(Debug, Deserialize)]
struct Claims {
    exp: f64,
}

/// Read the expiry claim out of a JWT without checking the signature. Only the
/// server can check signatures, so this is for deciding whether a stored
/// session is worth keeping, never for trusting the token.
///
/// ## Errors
///
/// Fails if the token isn't a well-formed JWT or doesn't have a numeric `exp`
/// claim.
pub fn expiry(token: &str) -> jsonwebtoken::errors::Result<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;

    from_numeric_date(data.claims.exp)
        .ok_or_else(|| jsonwebtoken::errors::ErrorKind::InvalidToken.into())
}

/// Seconds since the epoch, possibly fractional, as a timestamp. `None` if it
/// doesn't fit in a `DateTime`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn from_numeric_date(exp: f64) -> Option<DateTime<Utc>> {
    if !exp.is_finite() {
        return None;
    }

    let secs = exp.floor();
    if secs < i64::MIN as f64 || secs >= i64::MAX as f64 {
        return None;
    }

    let nanos = ((exp - secs) * 1e9) as u32;

    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
}

/// Is this token still good at the given time? Malformed tokens are never good.
pub fn is_valid_at(token: &str, now: DateTime<Utc>) -> bool {
    match expiry(token) {
        Ok(exp) => exp > now,
        Err(err) => {
            tracing::trace!(?err, "could not decode token");
            false
        }
    }
}

/// Is this token still good right now?
pub fn is_token_valid(token: &str) -> bool {
    is_valid_at(token, Utc::now())
}
