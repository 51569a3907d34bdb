use crate::{
    api::{attendance, employee, location, record},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

// Per-scope limiter. Both the replenish interval and the burst are clamped
// to at least one: the governor rejects zero values, and rates above one
// request per millisecond would otherwise truncate the interval to zero.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = (60_000 / u64::from(requests_per_min.max(1))).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let work_limiter = build_limiter(config.rate_work_per_min);
    let admin_limiter = build_limiter(config.rate_admin_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/work")
                    .wrap(work_limiter)
                    .service(
                        web::resource("/clock-in").route(web::post().to(attendance::clock_in)),
                    )
                    .service(
                        web::resource("/clock-out").route(web::post().to(attendance::clock_out)),
                    )
                    .service(web::resource("/status").route(web::post().to(attendance::status))),
            )
            .service(
                web::scope("/admin")
                    .wrap(admin_limiter)
                    .service(web::resource("/users").route(web::get().to(employee::list_users)))
                    .service(
                        web::resource("/users/by-location/{location}")
                            .route(web::get().to(employee::users_by_location)),
                    )
                    .service(
                        web::resource("/users/{id}")
                            .route(web::put().to(employee::update_user))
                            .route(web::delete().to(employee::delete_user)),
                    )
                    .service(
                        web::resource("/users/{id}/wage")
                            .route(web::put().to(employee::change_wage)),
                    )
                    .service(
                        web::resource("/locations")
                            .route(web::get().to(location::list_locations))
                            .route(web::post().to(location::create_location)),
                    )
                    .service(
                        web::resource("/locations/{id}")
                            .route(web::delete().to(location::delete_location)),
                    )
                    .service(
                        web::resource("/work-summary").route(web::get().to(record::work_summary)),
                    )
                    .service(
                        web::resource("/records").route(web::post().to(record::insert_record)),
                    )
                    .service(
                        web::resource("/records/{id}")
                            .route(web::put().to(record::update_record))
                            .route(web::delete().to(record::delete_record)),
                    ),
            ),
    );
}
