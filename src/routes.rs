use crate::{
    api::{attendance, location, page, settings, student},
    auth::{
        handlers,
        middleware::{admin_middleware, student_middleware},
    },
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

/// Upper bound for a check-in photo body.
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = 60_000 / requests_per_min as u64;
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(per_ms.max(1))
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("period and burst are non-zero");
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Session-driven entry point and the browser location script
    cfg.service(web::resource("/").route(web::get().to(page::index)))
        .service(web::resource("/geolocation.js").route(web::get().to(location::bridge_script)));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login/mahasiswa")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login_mahasiswa)),
            )
            .service(
                web::resource("/login/admin")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login_admin)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/student")
                    .wrap(from_fn(student_middleware))
                    // /student/dashboard
                    .service(web::resource("/dashboard").route(web::get().to(attendance::dashboard)))
                    // /student/settings
                    .service(web::resource("/settings").route(web::get().to(settings::get_settings)))
                    // /student/attendance
                    .service(
                        web::resource("/attendance")
                            .app_data(web::PayloadConfig::new(MAX_PHOTO_BYTES))
                            .route(web::post().to(attendance::check_in))
                            .route(web::get().to(attendance::my_history)),
                    )
                    // /student/location
                    .service(
                        web::resource("/location")
                            .route(web::get().to(location::location_state))
                            .route(web::post().to(location::report_location)),
                    )
                    // /student/location/request
                    .service(
                        web::resource("/location/request")
                            .route(web::post().to(location::request_location)),
                    ),
            )
            .service(
                web::scope("/admin")
                    .wrap(from_fn(admin_middleware))
                    // /admin/attendance
                    .service(
                        web::resource("/attendance").route(web::get().to(attendance::list_records)),
                    )
                    // /admin/attendance/{id}
                    .service(
                        web::resource("/attendance/{id}")
                            .route(web::delete().to(attendance::delete_record)),
                    )
                    // /admin/students
                    .service(
                        web::resource("/students")
                            .route(web::get().to(student::list_students))
                            .route(web::post().to(student::add_student)),
                    )
                    // /admin/students/{nim}
                    .service(
                        web::resource("/students/{nim}")
                            .route(web::delete().to(student::delete_student)),
                    )
                    // /admin/settings
                    .service(
                        web::resource("/settings")
                            .route(web::get().to(settings::get_admin_settings))
                            .route(web::put().to(settings::update_settings)),
                    ),
            ),
    );
}

// LOGIN (mahasiswa | admin)
//  └─ access_token carries role + profile
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// LOGOUT
//  └─ token id revoked until it would have expired
