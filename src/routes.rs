use crate::{
    api::{attendance, hostel, leave_request, qr_code, user},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        // burst_size(0) is unbuildable, so a zero rate means "at least one"
        let requests_per_min = requests_per_min.max(1);
        let per_ms = 60_000 / requests_per_min as u64;
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    // Login gets a tighter limiter than the rest of the API.
    cfg.service(
        web::scope(&format!("{}/auth", config.api_prefix)).service(
            web::resource("/login")
                .wrap(build_limiter(config.rate_login_per_min))
                .route(web::post().to(handlers::login)),
        ),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_api_per_min))
            .service(
                web::resource("/attendance")
                    .route(web::get().to(attendance::list_attendance))
                    .route(web::post().to(attendance::mark_attendance)),
            )
            .service(
                web::resource("/leave-requests")
                    .route(web::get().to(leave_request::list_leave_requests))
                    .route(web::post().to(leave_request::create_leave_request))
                    .route(web::put().to(leave_request::update_leave_request)),
            )
            .service(
                web::resource("/qr-codes")
                    .route(web::get().to(qr_code::list_qr_codes))
                    .route(web::post().to(qr_code::issue_qr_code)),
            )
            .service(
                web::resource("/users")
                    .route(web::get().to(user::list_users))
                    .route(web::post().to(user::create_user)),
            )
            .service(
                web::resource("/hostels")
                    .route(web::get().to(hostel::list_hostels))
                    .route(web::post().to(hostel::create_hostel)),
            ),
    );
}
