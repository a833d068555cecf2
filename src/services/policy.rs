// src/services/policy.rs

// Política de autorização pura: decide, sem IO, o que um principal pode fazer.
// Tudo que toca banco (carregar o alvo, efetivar a troca de contexto) fica nos
// serviços; aqui só entra valor e sai decisão.

use uuid::Uuid;

use crate::models::auth::{Role, User};

/// Capacidades delegáveis a uma sub-conta.
pub const PERMISSION_SLUGS: [&str; 5] = ["quotations", "invoices", "clients", "items", "companies"];

pub fn is_known_permission(slug: &str) -> bool {
    PERMISSION_SLUGS.contains(&slug)
}

/// Troca de contexto (cabeçalho x-context-id): quem pode agir como quem.
/// Admin troca para qualquer tenant; sub-conta só para o próprio pai;
/// owner só para si mesmo.
pub fn can_switch_context(identity: &User, target_id: Uuid) -> bool {
    match identity.role {
        Role::Admin => true,
        Role::SubAccount => identity.parent_owner_id == Some(target_id),
        Role::Owner => identity.id == target_id,
    }
}

/// Capacidade de módulo. Admin e Owner têm todas; sub-conta sem lista
/// explícita também tem todas, e com lista só o que foi delegado.
pub fn has_capability(identity: &User, slug: &str) -> bool {
    match identity.role {
        Role::Admin | Role::Owner => true,
        Role::SubAccount => match &identity.granted_permissions {
            None => true,
            Some(granted) => granted.iter().any(|g| g == slug),
        },
    }
}

/// Gestão de principals nunca é delegável: sub-conta é barrada
/// independente do que houver em granted_permissions.
pub fn can_list_principals(identity: &User) -> bool {
    matches!(identity.role, Role::Admin | Role::Owner)
}

pub fn can_create_principal(identity: &User, new_role: Role) -> bool {
    match identity.role {
        Role::Admin => true,
        // Owner só cria sub-contas debaixo de si
        Role::Owner => new_role == Role::SubAccount,
        Role::SubAccount => false,
    }
}

/// Ver/alterar/excluir um principal existente. Owner só alcança sub-contas
/// do próprio tenant; acesso cruzado de owner é negado, não escondido.
pub fn can_manage_principal(identity: &User, target: &User) -> bool {
    match identity.role {
        Role::Admin => true,
        Role::Owner => {
            target.role == Role::SubAccount && target.parent_owner_id == Some(identity.id)
        }
        Role::SubAccount => false,
    }
}

/// Ninguém exclui nem desativa a própria conta.
pub fn is_self_target(identity: &User, target_id: Uuid) -> bool {
    identity.id == target_id
}

/// Rebaixar o próprio papel também é proibido, para qualquer papel.
pub fn is_self_demotion(identity: &User, target_id: Uuid, new_role: Role) -> bool {
    identity.id == target_id && new_role != identity.role
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserStatus;
    use chrono::Utc;

    fn user(role: Role, parent: Option<Uuid>, granted: Option<Vec<String>>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "teste".to_string(),
            password_hash: "x".to_string(),
            role,
            status: UserStatus::Active,
            parent_owner_id: parent,
            granted_permissions: granted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn sub_account_only_switches_to_its_own_parent() {
        let parent_id = Uuid::new_v4();
        let sub = user(Role::SubAccount, Some(parent_id), None);

        assert!(can_switch_context(&sub, parent_id));
        // Qualquer outro alvo é negado, inclusive a própria sub-conta
        assert!(!can_switch_context(&sub, sub.id));
        assert!(!can_switch_context(&sub, Uuid::new_v4()));
    }

    #[test]
    fn owner_only_switches_to_itself() {
        let owner = user(Role::Owner, None, None);
        assert!(can_switch_context(&owner, owner.id));
        assert!(!can_switch_context(&owner, Uuid::new_v4()));
    }

    #[test]
    fn admin_switches_anywhere() {
        let admin = user(Role::Admin, None, None);
        assert!(can_switch_context(&admin, Uuid::new_v4()));
    }

    #[test]
    fn capability_defaults_to_everything_without_a_grant_list() {
        let sub = user(Role::SubAccount, Some(Uuid::new_v4()), None);
        for slug in PERMISSION_SLUGS {
            assert!(has_capability(&sub, slug));
        }
    }

    #[test]
    fn grant_list_is_a_whitelist() {
        let sub = user(
            Role::SubAccount,
            Some(Uuid::new_v4()),
            Some(vec!["quotations".to_string()]),
        );
        assert!(has_capability(&sub, "quotations"));
        assert!(!has_capability(&sub, "invoices"));

        // Lista vazia = nenhuma capacidade
        let locked = user(Role::SubAccount, Some(Uuid::new_v4()), Some(vec![]));
        assert!(!has_capability(&locked, "quotations"));
    }

    #[test]
    fn owner_and_admin_hold_every_capability() {
        let owner = user(Role::Owner, None, Some(vec![]));
        let admin = user(Role::Admin, None, None);
        assert!(has_capability(&owner, "invoices"));
        assert!(has_capability(&admin, "invoices"));
    }

    #[test]
    fn sub_account_never_manages_principals() {
        let parent_id = Uuid::new_v4();
        let sub = user(Role::SubAccount, Some(parent_id), None);
        let sibling = user(Role::SubAccount, Some(parent_id), None);

        assert!(!can_list_principals(&sub));
        assert!(!can_create_principal(&sub, Role::SubAccount));
        assert!(!can_manage_principal(&sub, &sibling));
    }

    #[test]
    fn owner_manages_only_its_own_sub_accounts() {
        let owner = user(Role::Owner, None, None);
        let own_sub = user(Role::SubAccount, Some(owner.id), None);
        let foreign_sub = user(Role::SubAccount, Some(Uuid::new_v4()), None);
        let other_owner = user(Role::Owner, None, None);

        assert!(can_manage_principal(&owner, &own_sub));
        assert!(!can_manage_principal(&owner, &foreign_sub));
        assert!(!can_manage_principal(&owner, &other_owner));

        assert!(can_create_principal(&owner, Role::SubAccount));
        assert!(!can_create_principal(&owner, Role::Owner));
        assert!(!can_create_principal(&owner, Role::Admin));
    }

    #[test]
    fn admin_manages_everyone() {
        let admin = user(Role::Admin, None, None);
        let owner = user(Role::Owner, None, None);
        assert!(can_manage_principal(&admin, &owner));
        assert!(can_create_principal(&admin, Role::Owner));
    }

    #[test]
    fn self_protection_holds_for_every_role() {
        for role in [Role::Admin, Role::Owner] {
            let me = user(role, None, None);
            assert!(is_self_target(&me, me.id));
            assert!(is_self_demotion(&me, me.id, Role::SubAccount));
            // Manter o próprio papel não é rebaixamento
            assert!(!is_self_demotion(&me, me.id, role));
            // Alvo diferente nunca é auto-proteção
            assert!(!is_self_target(&me, Uuid::new_v4()));
        }
    }
}
