use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use social_api::middleware::AuthMiddleware;
use social_api::{handlers, jobs, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("info,sqlx=warn,actix_web=info")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tokio::spawn(jobs::scheduled_posts::start_scheduled_post_publisher(
        pool.clone(),
        config.jobs.publish_interval_secs,
    ));

    let bind_addr = (config.app.host.clone(), config.app.port);
    tracing::info!(
        host = %config.app.host,
        port = config.app.port,
        env = %config.app.env,
        "Starting social-api"
    );

    let app_config = config.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in app_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::health::configure)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(handlers::auth::configure)
                    .configure(handlers::profiles::configure)
                    .configure(handlers::follows::configure)
                    .configure(handlers::blocks::configure)
                    .configure(handlers::posts::configure)
                    .configure(handlers::likes::configure)
                    .configure(handlers::comments::configure),
            )
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping server");
        handle.stop(true).await;
    });

    server.await.context("HTTP server failed")?;
    tracing::info!("Server stopped");

    Ok(())
}
