use actix_cors::Cors;
use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpResponse, HttpServer};
use blog_service::db::{run_migrations, Repositories};
use blog_service::dto::GroupWrite;
use blog_service::handlers;
use blog_service::middleware::{JwtAuthMiddleware, JwtValidator};
use blog_service::{AppState, Config};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "blog-service"
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn to_io(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{context}: {err}"))
}

async fn connect(config: &Config) -> io::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database.url)
        .await
        .map_err(|e| to_io("Failed to connect to database", e))?;

    run_migrations(&pool)
        .await
        .map_err(|e| to_io("Failed to run migrations", e))?;

    Ok(pool)
}

/// Administrative subcommands. Returns `None` when `cmd` is not one.
async fn run_admin_command(cmd: &str, args: &[String]) -> Option<io::Result<()>> {
    match cmd {
        "create-group" | "delete-user" => {}
        _ => return None,
    }

    let result: io::Result<()> = async {
        let config = Config::from_env().map_err(|e| to_io("Failed to load configuration", e))?;
        let pool = connect(&config).await?;
        let state = AppState::new(Repositories::postgres(pool), config.pagination.max_limit);

        match (cmd, args) {
            ("create-group", [slug, title, rest @ ..]) => {
                let group = state
                    .groups
                    .create(GroupWrite {
                        title: title.clone(),
                        slug: slug.clone(),
                        description: rest.join(" "),
                    })
                    .await
                    .map_err(|e| to_io("Failed to create group", e))?;
                println!("{}\t{}\t{}", group.id, group.slug, group.title);
                Ok(())
            }
            ("delete-user", [username]) => {
                let user = state
                    .users
                    .delete_by_username(username)
                    .await
                    .map_err(|e| to_io("Failed to delete user", e))?;
                println!("deleted {}\t{}", user.id, user.username);
                Ok(())
            }
            ("create-group", _) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "usage: blog-service create-group <slug> <title> [description]",
            )),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "usage: blog-service delete-user <username>",
            )),
        }
    }
    .await;

    Some(result)
}

/// Blog Service
///
/// Posts, groups, comments and follows over a JSON API.
///
/// # Routes
///
/// - `/api/v1/posts/*` - posts and their comments
/// - `/api/v1/groups/*` - read-only groups
/// - `/api/v1/follow/*` - the caller's follows
///
/// Subcommands: `healthcheck`, `create-group <slug> <title> [description]`,
/// `delete-user <username>`.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    // Support container healthchecks via CLI subcommand
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(cmd) = args.first() {
        if cmd == "healthcheck" {
            let port = std::env::var("BLOG_SERVICE_PORT").unwrap_or_else(|_| "8080".into());
            let url = format!("http://127.0.0.1:{}/api/v1/health", port);
            return match reqwest::Client::new().get(&url).send().await {
                Ok(resp) if resp.status().is_success() => Ok(()),
                Ok(resp) => {
                    eprintln!("healthcheck HTTP status: {}", resp.status());
                    Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
                }
                Err(e) => {
                    eprintln!("healthcheck HTTP error: {}", e);
                    Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
                }
            };
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(cmd) = args.first() {
        if let Some(result) = run_admin_command(cmd, &args[1..]).await {
            if let Err(e) = &result {
                eprintln!("ERROR: {}", e);
            }
            return result;
        }
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let validator = match config.auth.jwt_public_key_pem.as_deref() {
        Some(pem) => Some(Arc::new(
            JwtValidator::from_rsa_pem(pem).map_err(|e| to_io("Failed to load JWT key", e))?,
        )),
        None => {
            tracing::warn!(
                "JWT_PUBLIC_KEY_PEM not configured; authentication middleware will fail requests"
            );
            None
        }
    };

    let db_pool = connect(&config).await?;
    tracing::info!("Connected to database, migrations applied");

    let state = web::Data::new(AppState::new(
        Repositories::postgres(db_pool.clone()),
        config.pagination.max_limit,
    ));
    let pool_data = web::Data::new(db_pool);

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(pool_data.clone())
            .wrap(NormalizePath::trim())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(blog_service::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .configure(handlers::configure(JwtAuthMiddleware::new(validator.clone())))
    })
    .bind(&http_bind_address)?
    .workers(config.app.workers)
    .shutdown_timeout(30)
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            match result {
                Ok(Ok(())) => tracing::info!("HTTP server stopped"),
                Ok(Err(e)) => {
                    tracing::error!("HTTP server error: {}", e);
                    return Err(e);
                }
                Err(e) => return Err(to_io("HTTP server task failed", e)),
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
        }
    }

    tracing::info!("Blog-service shutting down");
    Ok(())
}
