// Role checks for the restricted commands.
//
// A configured role ID wins. Without one, the Administrator permission is
// required instead.

use crate::discord::{Context, Error};

/// Whether a member with `roles` may run a command gated on `required_role`.
pub fn is_authorized(roles: &[u64], is_admin: bool, required_role: Option<u64>) -> bool {
    match required_role {
        Some(role_id) => roles.contains(&role_id),
        None => is_admin,
    }
}

async fn author_authorized(ctx: Context<'_>, required_role: Option<u64>) -> bool {
    let Some(member) = ctx.author_member().await else {
        return false;
    };
    let roles: Vec<u64> = member.roles.iter().map(|r| r.get()).collect();
    let is_admin = member
        .permissions
        .map(|p| p.administrator())
        .unwrap_or(false);
    is_authorized(&roles, is_admin, required_role)
}

/// poise check for `/setup`.
pub async fn admin_role(ctx: Context<'_>) -> Result<bool, Error> {
    Ok(author_authorized(ctx, ctx.data().config.admin_role_id).await)
}

/// poise check for the data-management commands.
pub async fn privacy_role(ctx: Context<'_>) -> Result<bool, Error> {
    Ok(author_authorized(ctx, ctx.data().config.privacy_role_id).await)
}

/// Whether the author may see the restricted section of `/help`.
pub async fn has_restricted_access(ctx: Context<'_>) -> bool {
    let config = &ctx.data().config;
    author_authorized(ctx, config.admin_role_id).await
        || author_authorized(ctx, config.privacy_role_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_role_is_required() {
        assert!(is_authorized(&[1, 2, 3], false, Some(2)));
        assert!(!is_authorized(&[1, 3], false, Some(2)));
        // Administrator alone isn't enough once a role is configured
        assert!(!is_authorized(&[], true, Some(2)));
    }

    #[test]
    fn test_falls_back_to_administrator() {
        assert!(is_authorized(&[], true, None));
        assert!(!is_authorized(&[1, 2], false, None));
    }
}
