use actix_web::middleware::Logger;
use actix_web::web::{delete, get, post, put, resource, scope, Data};
use actix_web::{App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use survey_forms::config::Config;
use survey_forms::core::services::user::ensure_admin;
use survey_forms::database::sqlx::PgSqlxManager;
use survey_forms::error::Error;
use survey_forms::handlers;
use survey_forms::middlewares::jwt::JWTMiddleware;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("actix_web=info,survey_forms=info")).init();
    let config = Config::from_env()?;
    let pool = PgPoolOptions::new().max_connections(config.max_connections).connect(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;
    let manager = PgSqlxManager::new(pool);
    if let Some((email, password)) = &config.admin {
        let mut store = manager.acquire().await?;
        ensure_admin(&mut store, email, password).await?;
    }
    let bind_address = config.bind_address.clone();
    log::info!("listening on {}", bind_address);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(Data::new(manager.clone()))
            .app_data(Data::new(config.clone()))
            .service(resource("login").route(post().to(handlers::login)))
            .service(resource("logout").route(post().to(handlers::logout)))
            .service(
                scope("public")
                    .route("forms/{id}", get().to(handlers::form::public))
                    .route("responses", post().to(handlers::response::submit)),
            )
            .service(
                scope("")
                    .wrap(JWTMiddleware::new(config.jwt_secret.clone()))
                    .route("me", get().to(handlers::user::me))
                    .service(
                        scope("surveys")
                            .route("", get().to(handlers::survey::list))
                            .route("", post().to(handlers::survey::create))
                            .route("{id}", get().to(handlers::survey::detail))
                            .route("{id}", put().to(handlers::survey::update))
                            .route("{id}", delete().to(handlers::survey::delete))
                            .route("{id}/apply-template", post().to(handlers::survey::apply)),
                    )
                    .service(
                        scope("forms")
                            .route("", get().to(handlers::form::list))
                            .route("", post().to(handlers::form::create))
                            .route("{id}", get().to(handlers::form::detail))
                            .route("{id}", put().to(handlers::form::update))
                            .route("{id}", delete().to(handlers::form::delete)),
                    )
                    .service(
                        scope("questions")
                            .route("", get().to(handlers::question::list))
                            .route("", post().to(handlers::question::create))
                            .route("{id}", get().to(handlers::question::detail))
                            .route("{id}", put().to(handlers::question::update))
                            .route("{id}", delete().to(handlers::question::delete)),
                    )
                    .service(
                        scope("templates")
                            .route("", get().to(handlers::template::list))
                            .route("", post().to(handlers::template::create))
                            .route("{id}", get().to(handlers::template::detail))
                            .route("{id}", put().to(handlers::template::update))
                            .route("{id}", delete().to(handlers::template::delete))
                            .route("{id}/questions", post().to(handlers::template::add_question))
                            .route("{id}/questions/{question_id}", delete().to(handlers::template::delete_question)),
                    )
                    .service(
                        scope("responses")
                            .route("", get().to(handlers::response::list))
                            .route("{id}", delete().to(handlers::response::delete)),
                    )
                    .service(
                        scope("reports")
                            .route("", get().to(handlers::report::report))
                            .route("daily", get().to(handlers::report::daily)),
                    )
                    .service(
                        scope("users")
                            .route("", get().to(handlers::user::list))
                            .route("", post().to(handlers::user::create))
                            .route("{id}", put().to(handlers::user::update))
                            .route("{id}", delete().to(handlers::user::delete)),
                    ),
            )
    })
    .bind(bind_address)?
    .run()
    .await?;
    Ok(())
}
