use sea_orm::ActiveValue::{Set, Unchanged};

use super::entity::{team, tenant, user};
use super::store::StoredEntity;
use crate::domain::model::{Record, Team, Tenant, User};

impl StoredEntity for tenant::Entity {
    type Data = Tenant;

    fn into_record(m: tenant::Model) -> Record<Tenant> {
        Record {
            id: m.id,
            version: m.version,
            created_at: m.created_at,
            created_by: m.created_by,
            updated_at: m.updated_at,
            updated_by: m.updated_by,
            data: Tenant {
                name: m.name,
                description: m.description,
                is_default: m.is_default,
                is_active: m.is_active,
                domain: m.domain,
                is_system: m.is_system,
            },
        }
    }

    fn new_row(t: Tenant) -> tenant::ActiveModel {
        tenant::ActiveModel {
            name: Set(t.name),
            description: Set(t.description),
            is_default: Set(t.is_default),
            is_active: Set(t.is_active),
            domain: Set(t.domain),
            is_system: Set(t.is_system),
            ..Default::default()
        }
    }

    fn changed_row(r: Record<Tenant>) -> tenant::ActiveModel {
        tenant::ActiveModel {
            id: Unchanged(r.id),
            version: Unchanged(r.version),
            ..Self::new_row(r.data)
        }
    }
}

impl StoredEntity for team::Entity {
    type Data = Team;

    fn into_record(m: team::Model) -> Record<Team> {
        Record {
            id: m.id,
            version: m.version,
            created_at: m.created_at,
            created_by: m.created_by,
            updated_at: m.updated_at,
            updated_by: m.updated_by,
            data: Team {
                tenant_id: m.tenant_id,
                name: m.name,
                description: m.description,
                is_default: m.is_default,
                is_active: m.is_active,
                is_system: m.is_system,
            },
        }
    }

    fn new_row(t: Team) -> team::ActiveModel {
        team::ActiveModel {
            tenant_id: Set(t.tenant_id),
            name: Set(t.name),
            description: Set(t.description),
            is_default: Set(t.is_default),
            is_active: Set(t.is_active),
            is_system: Set(t.is_system),
            ..Default::default()
        }
    }

    fn changed_row(r: Record<Team>) -> team::ActiveModel {
        team::ActiveModel {
            id: Unchanged(r.id),
            version: Unchanged(r.version),
            ..Self::new_row(r.data)
        }
    }
}

impl StoredEntity for user::Entity {
    type Data = User;

    fn into_record(m: user::Model) -> Record<User> {
        Record {
            id: m.id,
            version: m.version,
            created_at: m.created_at,
            created_by: m.created_by,
            updated_at: m.updated_at,
            updated_by: m.updated_by,
            data: User {
                username: m.username,
                password_hash: m.password_hash,
                current_tenant_id: m.current_tenant_id,
                current_team_id: m.current_team_id,
                is_super_admin: m.is_super_admin,
                is_active: m.is_active,
                last_login_at: m.last_login_at,
                name: m.name,
                email: m.email,
                is_system: m.is_system,
            },
        }
    }

    fn new_row(u: User) -> user::ActiveModel {
        user::ActiveModel {
            username: Set(u.username),
            password_hash: Set(u.password_hash),
            current_tenant_id: Set(u.current_tenant_id),
            current_team_id: Set(u.current_team_id),
            is_super_admin: Set(u.is_super_admin),
            is_active: Set(u.is_active),
            last_login_at: Set(u.last_login_at),
            name: Set(u.name),
            email: Set(u.email),
            is_system: Set(u.is_system),
            ..Default::default()
        }
    }

    fn changed_row(r: Record<User>) -> user::ActiveModel {
        user::ActiveModel {
            id: Unchanged(r.id),
            version: Unchanged(r.version),
            ..Self::new_row(r.data)
        }
    }
}
