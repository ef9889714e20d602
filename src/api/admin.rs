use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};

use crate::api::Api;
use crate::audit::AuditLogger;
use crate::auth::Authenticator;
use crate::errors::auth::AuthError;
use crate::stores::AuditStore;
use crate::types::db::user::Role;
use crate::types::dto::admin::{AuditEventListResponse, AuditEventView};

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 200;

/// Administrative API endpoints, admin role only
pub struct AdminApi {
    authenticator: Arc<Authenticator>,
    audit_store: Arc<AuditStore>,
    audit_logger: Arc<AuditLogger>,
}

impl AdminApi {
    pub fn new(
        authenticator: Arc<Authenticator>,
        audit_store: Arc<AuditStore>,
        audit_logger: Arc<AuditLogger>,
    ) -> Self {
        Self {
            authenticator,
            audit_store,
            audit_logger,
        }
    }
}

impl Api for AdminApi {}

/// API tags for administrative endpoints
#[derive(Tags)]
enum AdminTags {
    /// Administration endpoints
    Administration,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// List recent audit events, newest first
    #[oai(
        path = "/audit-events",
        method = "get",
        tag = "AdminTags::Administration"
    )]
    async fn audit_events(
        &self,
        req: &Request,
        limit: Query<Option<u64>>,
    ) -> Result<Json<AuditEventListResponse>, AuthError> {
        let user = self
            .authenticator
            .authenticate(req.header("Authorization"))
            .await?;

        if let Err(denied) = self.authenticator.require_admin(&user) {
            self.audit_logger
                .log_access_denied(
                    &user,
                    "admin/audit-events",
                    &[Role::Admin],
                    self.extract_ip_address(req),
                )
                .await;
            return Err(denied);
        }

        let limit = limit.0.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let events = self
            .audit_store
            .recent(limit)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(AuditEventListResponse {
            events: events.into_iter().map(AuditEventView::from).collect(),
        }))
    }
}
