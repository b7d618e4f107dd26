use clap::{Parser, Subcommand};
use pinfocus_core::catalog::{Catalog, CatalogProvider, FileCatalog};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

#[derive(Debug, Parser)]
#[command(name = "pinfocus")]
struct Args {
    /// Catalog JSON file. Defaults to PINFOCUS_CATALOG_PATH, then the embedded sample data.
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the catalog and run fixture validation.
    Validate,

    /// Filter and sort products.
    Products {
        #[arg(long, short, default_value = "")]
        query: String,

        /// Category label, or 전체/all.
        #[arg(long, short, default_value = "전체")]
        category: String,

        /// latest, return-desc, return-asc, risk-asc, risk-desc.
        #[arg(long, short, default_value = "latest")]
        sort: String,
    },

    /// Filter articles.
    Articles {
        #[arg(long, short, default_value = "")]
        query: String,

        #[arg(long, short, default_value = "전체")]
        category: String,
    },

    /// Compare up to four products.
    Compare {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show one product or article by id.
    Show { id: String },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pinfocus_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = run(&args, &settings);
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

fn run(args: &Args, settings: &pinfocus_core::config::Settings) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref(), settings)?;
    let out = match &args.command {
        Command::Validate => report::validated(&catalog, args.json)?,
        Command::Products {
            query,
            category,
            sort,
        } => report::products(&catalog, query, category, sort, args.json)?,
        Command::Articles { query, category } => {
            report::articles(&catalog, query, category, args.json)?
        }
        Command::Compare { ids } => report::compare(&catalog, ids, args.json)?,
        Command::Show { id } => report::show(&catalog, id, args.json)?,
    };
    println!("{out}");
    Ok(())
}

fn load_catalog(
    path_arg: Option<&str>,
    settings: &pinfocus_core::config::Settings,
) -> anyhow::Result<Catalog> {
    let provider: Box<dyn CatalogProvider> = match path_arg {
        Some(path) => Box::new(FileCatalog::new(path)),
        None => pinfocus_core::catalog::provider_from_settings(settings),
    };
    pinfocus_core::catalog::load(provider.as_ref())
}

fn init_sentry(settings: &pinfocus_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
