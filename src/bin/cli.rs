//! Price board CLI
//!
//! Text front end over the page read models, for local use and smoke
//! testing against the hosted table.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use precos::{
    config,
    error::Result,
    pipeline::{self, SubmissionState, SubmitOutcome},
    services::{best_offers, filter_and_sort, CategoryClassifier, PriceFilter, SortOrder},
    store::{MemoryStore, PriceStore, RestStore},
    ui::{ThemeMode, ThemeState},
    utils::format::{format_price, relative_time},
};

/// precos - Montes Claros community price board
#[derive(Parser, Debug)]
#[command(
    name = "precos",
    version,
    about = "Community price board for Montes Claros-MG"
)]

struct Cli {
    /// Path to storage directory containing config files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Run against an in-memory store with sample data
    #[arg(long)]
    demo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recent prices with optional filters
    Recent {
        /// Maximum records to show (default: configured recent limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Filter by city
        #[arg(long)]
        cidade: Option<String>,

        /// Filter by neighborhood
        #[arg(long)]
        bairro: Option<String>,

        /// Filter by category label (e.g., Alimentos)
        #[arg(long)]
        categoria: Option<String>,

        /// Sort order: recentes, antigos, menor-preco, maior-preco
        #[arg(long, default_value = "recentes")]
        ordem: String,
    },

    /// Show the cheapest record per product, ranked by price
    Deals {
        /// Maximum products to show (default: configured featured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the detail page for one product slug (e.g., arroz-5kg)
    Product { slug: String },

    /// Submit one new price
    Add {
        #[arg(long)]
        produto: String,
        /// Price, comma or dot decimals (e.g., 5,89)
        #[arg(long)]
        preco: String,
        #[arg(long, default_value = "")]
        loja: String,
        #[arg(long, default_value = "")]
        bairro: String,
        #[arg(long, default_value = "")]
        cidade: String,
    },

    /// List the known neighborhoods, stores and cities
    Places,

    /// Show or toggle the persisted theme preference
    Theme {
        /// Flip between light and dark
        #[arg(long)]
        toggle: bool,
    },

    /// Validate configuration files
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

/// Build the store backend the current invocation asked for.
fn make_store(demo: bool, config: &precos::models::Config) -> Result<Box<dyn PriceStore>> {
    if demo {
        log::info!("Demo mode: using the in-memory store");
        Ok(Box::new(MemoryStore::with_sample_data()))
    } else {
        Ok(Box::new(RestStore::new(&config.store)?))
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (config, catalog) = config::load_all(&cli.storage_dir)?;

    match cli.command {
        Command::Recent {
            limit,
            cidade,
            bairro,
            categoria,
            ordem,
        } => {
            let ordem: SortOrder = ordem.parse()?;
            let store = make_store(cli.demo, &config)?;
            let mut page = pipeline::load_listing(store.as_ref(), &config).await?;
            if let Some(limit) = limit {
                page.precos.truncate(limit);
            }

            let filter = PriceFilter {
                cidade,
                bairro,
                categoria,
            };
            let classifier = CategoryClassifier::from_config(&config);
            let precos = filter_and_sort(&page.precos, &filter, &classifier, ordem);

            if precos.is_empty() {
                println!("Nenhum preço encontrado com os filtros selecionados.");
                return Ok(());
            }

            let agora = chrono::Utc::now();
            println!("{} resultado(s) encontrado(s)\n", precos.len());
            for preco in &precos {
                println!(
                    "{:>12}  {} [{}]  {} • {}, {} ({})",
                    format_price(preco.preco),
                    preco.produto,
                    classifier.classify(&preco.produto),
                    preco.loja,
                    preco.bairro,
                    preco.cidade,
                    relative_time(preco.data, agora),
                );
            }
        }

        Command::Deals { limit } => {
            let store = make_store(cli.demo, &config)?;
            let precos = store.list_recent(config.site.recent_limit).await?;
            let offers = best_offers(&precos, limit.unwrap_or(config.site.featured_limit));

            if offers.is_empty() {
                println!("Nenhum produto em destaque disponível no momento.");
                return Ok(());
            }

            println!("Produtos em Destaque (Melhores Preços)\n");
            for (i, offer) in offers.iter().enumerate() {
                println!(
                    "{:>2}. {:>12}  {}  {} • {}",
                    i + 1,
                    format_price(offer.preco),
                    offer.produto,
                    offer.loja,
                    offer.bairro,
                );
            }
        }

        Command::Product { slug } => {
            let store = make_store(cli.demo, &config)?;
            let page = pipeline::load_product(store.as_ref(), &catalog, &config, &slug).await?;

            println!("Preços de {}\n", page.nome);
            if page.precos.is_empty() {
                println!(
                    "Nenhum preço encontrado para {}. Seja o primeiro a adicionar!",
                    page.nome
                );
            } else {
                let agora = chrono::Utc::now();
                for preco in &page.precos {
                    println!(
                        "{:>12}  {}  {} • {} ({})",
                        format_price(preco.preco),
                        preco.produto,
                        preco.loja,
                        preco.bairro,
                        relative_time(preco.data, agora),
                    );
                }
                if let Some(resumo) = &page.resumo {
                    println!(
                        "\n{} oferta(s), de {} a {}",
                        resumo.total,
                        format_price(resumo.menor),
                        format_price(resumo.maior),
                    );
                }
            }

            if !page.similares.is_empty() {
                println!("\nProdutos similares:");
                for produto in &page.similares {
                    println!("  - {} ({})", produto.nome, produto.id);
                }
            }
        }

        Command::Add {
            produto,
            preco,
            loja,
            bairro,
            cidade,
        } => {
            let store = make_store(cli.demo, &config)?;
            let mut flow = pipeline::SubmissionFlow::new(&config);
            flow.draft.produto = produto;
            flow.draft.preco = preco;
            flow.draft.loja = loja;
            flow.draft.bairro = bairro;
            flow.draft.cidade = cidade;

            match flow.submit(store.as_ref(), &config.site).await {
                SubmitOutcome::Saved(record) => {
                    println!("Preço cadastrado com sucesso!");
                    println!(
                        "  #{} {}  {} ({})",
                        record.id,
                        record.produto,
                        format_price(record.preco),
                        record.bairro,
                    );
                }
                SubmitOutcome::Invalid => {
                    let message = flow.inline_error.as_deref().unwrap_or("Dados inválidos.");
                    eprintln!("{}", message);
                    std::process::exit(1);
                }
                SubmitOutcome::Failed => {
                    if let SubmissionState::Error { message } = &flow.state {
                        eprintln!("{}", message);
                    }
                    std::process::exit(1);
                }
                SubmitOutcome::Ignored => {}
            }
        }

        Command::Places => {
            let store = make_store(cli.demo, &config)?;
            let options = pipeline::load_form_options(store.as_ref(), &config).await?;

            println!("Bairros ({}):", options.bairros.len());
            for bairro in &options.bairros {
                println!("  - {}", bairro);
            }
            println!("\nEstabelecimentos ({}):", options.lojas.len());
            for loja in &options.lojas {
                println!("  - {}", loja);
            }
            println!("\nCidades ({}):", options.cidades.len());
            for cidade in &options.cidades {
                println!("  - {}", cidade);
            }
        }

        Command::Theme { toggle } => {
            let mut theme = ThemeState::init(&cli.storage_dir, false);
            if toggle {
                theme.toggle()?;
            }
            let label = match theme.mode() {
                ThemeMode::Light => "claro",
                ThemeMode::Dark => "escuro",
            };
            println!("Tema atual: {}", label);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            config.validate()?;
            log::info!("✓ Config OK ({} category rules)", config.categories.len());

            catalog.validate()?;
            log::info!("✓ Catalog OK ({} products)", catalog.produtos.len());

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
