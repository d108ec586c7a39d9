use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::dashboard::DashboardQuery;
use crate::models::users::entities::UserRole;
use crate::services::DashboardService;

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn stats(req: HttpRequest, query: web::Query<DashboardQuery>) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.stats(query.into_inner(), &req).await
}

pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/stats", web::get().to(stats)),
    );
}
