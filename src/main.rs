use std::{process, sync::Arc};

use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;
use vetrina::{
    application::{catalog::CatalogService, error::AppError},
    config,
    domain::keywords::KeywordStore,
    infra::{
        error::InfraError,
        http::{HttpState, build_router},
        remote::{DisabledRemoteCatalog, HttpRemoteCatalog, RemoteCatalog},
        telemetry,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Keywords(args) => run_keywords(settings, args).await,
    }
}

fn build_catalog_service(settings: &config::Settings) -> Result<CatalogService, AppError> {
    let remote: Arc<dyn RemoteCatalog> = match settings.remote.base_url.clone() {
        Some(endpoint) => {
            info!(
                target = "vetrina::startup",
                endpoint = %endpoint,
                "remote catalog enabled"
            );
            Arc::new(
                HttpRemoteCatalog::new(endpoint, settings.remote.timeout)
                    .map_err(|err| AppError::unexpected(format!("remote catalog client: {err}")))?,
            )
        }
        None => {
            info!(target = "vetrina::startup", "remote catalog disabled");
            Arc::new(DisabledRemoteCatalog)
        }
    };

    Ok(CatalogService::new(remote, settings.remote.merge_order))
}

/// Load the keyword store from the configured file, falling back to the
/// built-in defaults when the file does not exist.
fn load_keyword_store(settings: &config::Settings) -> Result<KeywordStore, AppError> {
    let path = settings.keywords.file.as_path();
    if !path.exists() {
        info!(
            target = "vetrina::startup",
            path = %path.display(),
            "keyword file not found, using built-in defaults"
        );
        return Ok(KeywordStore::with_defaults());
    }

    KeywordStore::load_from_file(path)
        .map_err(|err| AppError::unexpected(format!("failed to load keyword store: {err}")))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let catalog = build_catalog_service(&settings)?;
    let keywords = Arc::new(load_keyword_store(&settings)?);
    let site = Arc::new(settings.blog.site.clone());

    report_slug_collisions(&catalog).await;

    let state = HttpState {
        catalog,
        keywords,
        site,
        page_size: settings.blog.page_size,
        page_scheme: settings.blog.page_scheme,
        injection_cap: settings.blog.injection_cap,
    };

    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "vetrina::startup",
        addr = %settings.server.addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

/// Slug collisions resolve first-match-wins at request time; surface them once
/// at startup so operators notice shadowed posts.
async fn report_slug_collisions(catalog: &CatalogService) {
    let unified = catalog.load().await;
    for collision in unified.validate_unique_slugs() {
        warn!(
            target = "vetrina::startup",
            slug = %collision.slug,
            count = collision.count,
            "duplicate slug in catalog, later entries are unreachable"
        );
    }
}

async fn run_keywords(
    settings: config::Settings,
    args: config::KeywordsArgs,
) -> Result<(), AppError> {
    match args.command {
        config::KeywordsCommand::Export(export) => {
            let store = load_keyword_store(&settings)?;
            match export.file {
                Some(path) => {
                    store.save_to_file(&path).map_err(|err| {
                        AppError::unexpected(format!("failed to write keyword file: {err}"))
                    })?;
                    info!(
                        target = "vetrina::keywords",
                        path = %path.display(),
                        entries = store.len(),
                        "exported keyword store"
                    );
                }
                None => println!("{}", store.export_json()),
            }
            Ok(())
        }
        config::KeywordsCommand::Import(import) => {
            let document = std::fs::read_to_string(&import.file)
                .map_err(|err| AppError::from(InfraError::Io(err)))?;

            let mut store = KeywordStore::empty();
            let count = store
                .import_json(&document)
                .map_err(|err| AppError::validation(format!("import rejected: {err}")))?;

            store.save_to_file(&settings.keywords.file).map_err(|err| {
                AppError::unexpected(format!("failed to write keyword file: {err}"))
            })?;

            info!(
                target = "vetrina::keywords",
                entries = count,
                path = %settings.keywords.file.display(),
                "imported keyword store"
            );
            Ok(())
        }
        config::KeywordsCommand::Validate => {
            let store = load_keyword_store(&settings)?;
            let catalog = build_catalog_service(&settings)?;
            let unified = catalog.load().await;

            let report = store.validate(&unified.slugs());
            if report.valid {
                println!("ok: {} keywords, all targets resolve", store.len());
                return Ok(());
            }

            for issue in &report.issues {
                println!("issue: {issue}");
            }
            Err(AppError::validation(format!(
                "{} keyword issue(s) found",
                report.issues.len()
            )))
        }
        config::KeywordsCommand::List => {
            let store = load_keyword_store(&settings)?;
            for (keyword, slug) in store.list_all() {
                println!("{keyword} -> /blogs/{slug}");
            }
            Ok(())
        }
    }
}
