//! Role entitlement checks.

use crate::claims::Claims;
use setsisaw_core::Role;

/// Check whether the token holder's role meets `required`.
#[must_use]
pub fn is_entitled(claims: &Claims, required: Role) -> bool {
    claims.role.satisfies(required)
}

/// Check entitlement for a role given by name.
///
/// Unknown role names are denied and logged.
#[must_use]
pub fn is_role_name_entitled(role: &str, required: Role) -> bool {
    match role.parse::<Role>() {
        Ok(role) => role.satisfies(required),
        Err(e) => {
            tracing::warn!(role = %e.value, required = %required, "Entitlement check for unknown role");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with(role: Role) -> Claims {
        Claims::builder().username("u").role(role).build()
    }

    #[test]
    fn test_user_requirement_satisfied_by_all() {
        for role in Role::ALL {
            assert!(is_entitled(&claims_with(role), Role::User));
        }
    }

    #[test]
    fn test_editor_requirement() {
        assert!(!is_entitled(&claims_with(Role::User), Role::Editor));
        assert!(is_entitled(&claims_with(Role::Editor), Role::Editor));
        assert!(is_entitled(&claims_with(Role::Admin), Role::Editor));
    }

    #[test]
    fn test_admin_requirement() {
        assert!(!is_entitled(&claims_with(Role::User), Role::Admin));
        assert!(!is_entitled(&claims_with(Role::Editor), Role::Admin));
        assert!(is_entitled(&claims_with(Role::Admin), Role::Admin));
    }

    #[test]
    fn test_role_names() {
        assert!(is_role_name_entitled("EDITOR", Role::User));
        assert!(is_role_name_entitled("admin", Role::Admin));
        assert!(!is_role_name_entitled("USER", Role::Editor));
    }

    #[test]
    fn test_unknown_role_name_denied() {
        for required in Role::ALL {
            assert!(!is_role_name_entitled("SUPERUSER", required));
            assert!(!is_role_name_entitled("", required));
        }
    }
}
