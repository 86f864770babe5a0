//! Lifecycle walkthrough: provisioning, versioned edits, a lost update and soft delete.

use anyhow::Result;
use lifecycle_db::lifecycle::{LifecycleConn, SecurityContext};
use tenant_admin::{DomainError, Record, ServiceConfig, Team, Tenant, User, build_service};
use tracing::info;
use uuid::Uuid;

pub async fn run(db: &LifecycleConn) -> Result<()> {
    let service = build_service(db, ServiceConfig::default());
    let system = SecurityContext::system();

    let (tenant, team) = service
        .provision_tenant(
            &system,
            Tenant {
                name: format!("acme-{}", short_id()),
                is_active: true,
                ..Default::default()
            },
            "everyone".to_owned(),
        )
        .await?;
    show("tenant provisioned", &tenant);
    show("default team", &team);

    let admin = service
        .register_user(
            &system,
            User {
                username: format!("admin-{}", short_id()),
                password_hash: "!".to_owned(),
                is_active: true,
                ..Default::default()
            },
        )
        .await?;
    show("user registered", &admin);

    let as_admin = SecurityContext::for_user(tenant.id, admin.id);
    let admin = service
        .switch_tenant(&as_admin, admin.id, tenant.id, None)
        .await?;
    show("user moved into tenant", &admin);

    let ops = service
        .create_team(
            &as_admin,
            Team {
                tenant_id: tenant.id,
                name: "ops".to_owned(),
                is_active: true,
                ..Default::default()
            },
        )
        .await?;
    show("team created", &ops);

    // Two editors start from the same version; the second save must be rejected.
    let loaded = service.user(admin.id).await?;
    let first = service
        .update_user(&as_admin, loaded.clone(), |u| {
            u.email = Some("admin@acme.test".to_owned());
        })
        .await?;
    show("first edit saved", &first);
    match service
        .update_user(&system, loaded, |u| u.name = Some("Administrator".to_owned()))
        .await
    {
        Err(err @ DomainError::Conflict { .. }) => info!(error = %err, "second edit rejected"),
        Err(err) => return Err(err.into()),
        Ok(_) => anyhow::bail!("stale edit was accepted"),
    }

    service.remove_team(&as_admin, ops.id).await?;
    let remaining = service.teams_of(tenant.id).await?;
    info!(
        tenant_id = %tenant.id,
        teams = remaining.len(),
        "team soft-deleted; default reads no longer see it"
    );

    println!("Demo finished: tenant {} with {} team(s)", tenant.id, remaining.len());
    Ok(())
}

fn show<T: std::fmt::Debug>(what: &str, record: &Record<T>) {
    info!(
        id = %record.id,
        version = record.version,
        created_at = %record.created_at,
        created_by = ?record.created_by,
        updated_at = %record.updated_at,
        updated_by = ?record.updated_by,
        data = ?record.data,
        "{what}"
    );
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string().chars().take(8).collect()
}
