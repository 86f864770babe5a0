use uuid::Uuid;

use crate::constants::ROOT_TENANT_ID;
use crate::subject::Subject;

/// `SecurityContext` carries the identity information for a single request or operation.
///
/// Both the subject and the tenant are optional: background jobs and anonymous calls
/// are legitimate callers, and the audit layer leaves actor columns unset for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SecurityContext {
    tenant_id: Option<Uuid>,
    subject: Option<Subject>,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Create an anonymous `SecurityContext` with no tenant and no subject
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// Context for bootstrap and maintenance work: root subject in the root tenant.
    #[must_use]
    pub fn system() -> Self {
        Self::builder()
            .tenant_id(ROOT_TENANT_ID)
            .subject(Subject::root())
            .build()
    }

    /// Shorthand for a user acting inside a tenant.
    #[must_use]
    pub fn for_user(tenant_id: Uuid, user_id: Uuid) -> Self {
        Self::builder()
            .tenant_id(tenant_id)
            .subject(Subject::new(user_id))
            .build()
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }

    #[must_use]
    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    #[must_use]
    pub fn subject_id(&self) -> Option<Uuid> {
        self.subject.map(|s| s.id)
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.subject.is_none()
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    tenant_id: Option<Uuid>,
    subject: Option<Subject>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn subject_id(self, subject_id: Uuid) -> Self {
        self.subject(Subject::new(subject_id))
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            tenant_id: self.tenant_id,
            subject: self.subject,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::subject::SubjectKind;

    #[test]
    fn test_security_context_builder_full() {
        let tenant_id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let subject_id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();

        let ctx = SecurityContext::builder()
            .tenant_id(tenant_id)
            .subject_id(subject_id)
            .build();

        assert_eq!(ctx.tenant_id(), Some(tenant_id));
        assert_eq!(ctx.subject_id(), Some(subject_id));
        assert_eq!(ctx.subject().map(|s| s.kind), Some(SubjectKind::User));
        assert!(!ctx.is_anonymous());
    }

    #[test]
    fn test_anonymous_has_no_subject() {
        let ctx = SecurityContext::anonymous();

        assert!(ctx.is_anonymous());
        assert_eq!(ctx.tenant_id(), None);
        assert_eq!(ctx.subject_id(), None);
    }

    #[test]
    fn test_system_context_uses_root_subject() {
        let ctx = SecurityContext::system();

        assert_eq!(ctx.tenant_id(), Some(ROOT_TENANT_ID));
        let subject = ctx.subject().unwrap();
        assert_eq!(subject.kind, SubjectKind::System);
        assert_eq!(subject.id, crate::constants::ROOT_SUBJECT_ID);
    }

    #[test]
    fn test_security_context_serde_roundtrip() {
        let ctx = SecurityContext::for_user(Uuid::new_v4(), Uuid::new_v4());

        let json = serde_json::to_string(&ctx).unwrap();
        let back: SecurityContext = serde_json::from_str(&json).unwrap();

        assert_eq!(back, ctx);
    }
}
