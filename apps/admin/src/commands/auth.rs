//! # Auth Commands

use std::time::Duration;

use chrono::{DateTime, Utc};
use optica_api::Claims;
use tokio::time::Instant;
use tracing::debug;

use super::Outcome;
use crate::error::AppResult;
use crate::notify::Notice;
use crate::state::AppState;

pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<Outcome> {
    debug!("login command");
    let claims = state.client.auth().login(email, password).await?;
    Ok(Outcome::notice(Notice::success(format!(
        "Logged in as {} (token valid until {})",
        claims.sub,
        expiry(&claims)
    ))))
}

pub async fn logout(state: &AppState) -> AppResult<Outcome> {
    debug!("logout command");
    let was_active = state.client.session().is_active().await;
    state.client.auth().logout().await?;
    let notice = if was_active {
        Notice::success("Logged out")
    } else {
        Notice::warning("No session was active")
    };
    Ok(Outcome::notice(notice))
}

pub async fn whoami(state: &AppState) -> AppResult<Outcome> {
    let claims = state.require_login().await?;
    let idle_left = state
        .client
        .session()
        .deadline()
        .await
        .map(|deadline| deadline.saturating_duration_since(Instant::now()))
        .unwrap_or_default();
    Ok(Outcome::output(describe_session(&claims, idle_left)))
}

/// Operator, role and session limits.
pub fn describe_session(claims: &Claims, session_left: Duration) -> String {
    let mut out = format!("User      {}\n", claims.sub);
    if let Some(role) = &claims.role {
        out.push_str(&format!("Role      {role}\n"));
    }
    out.push_str(&format!("Token     valid until {}\n", expiry(claims)));
    out.push_str(&format!("Session   ends in {} min without activity\n", session_left.as_secs().div_ceil(60)));
    out
}

fn expiry(claims: &Claims) -> String {
    DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| claims.exp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Option<&str>) -> Claims {
        Claims {
            sub: "ana@otica.com".into(),
            exp: 1_792_425_600,
            iat: None,
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_describe_session() {
        let text = describe_session(&claims(Some("ADMIN")), Duration::from_secs(14 * 60 + 1));
        assert!(text.contains("User      ana@otica.com"));
        assert!(text.contains("Role      ADMIN"));
        assert!(text.contains("UTC"));
        assert!(text.contains("ends in 15 min"));
    }

    #[test]
    fn test_describe_session_without_role() {
        let text = describe_session(&claims(None), Duration::ZERO);
        assert!(!text.contains("Role"));
        assert!(text.contains("ends in 0 min"));
    }
}
