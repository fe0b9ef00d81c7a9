use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use shopwise::models::{
    ActionResponse, BuyingGuideRequest, CompareRequest, DisplayPrefs, RecommendationRequest, ReviewsRequest,
};
use shopwise::{build_assistant, create_router, utils::init_logger, AppState, Config, ShoppingAssistant};

#[derive(Parser, Debug)]
#[command(name = "shopwise")]
#[command(about = "AI shopping assistant: recommendations, reviews, guides, comparisons, trends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server and web UI (default)
    Serve,
    /// Recommend products for a shopping list within a budget
    Recommend {
        /// Comma-separated products
        shopping_list: String,
        #[arg(long, default_value_t = 15000)]
        budget: i64,
        /// Best Value, Premium Quality, Budget Conscious or Latest Technology
        #[arg(long, default_value = "Best Value")]
        priority: String,
    },
    /// Analyze the reviews on one product page
    Reviews { product_url: String },
    /// Explain what to look for in a product type
    Guide { product_type: String },
    /// Compare one product across Amazon India, Flipkart and Reliance Digital
    Compare { product_name: String },
    /// List trending products under ₹1000
    Trending,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_logger();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    let assistant = build_assistant(&config)?;

    let prefs = DisplayPrefs::default();
    let (title, content) = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => return serve(config, assistant).await,
        Commands::Recommend {
            shopping_list,
            budget,
            priority,
        } => {
            let input = RecommendationRequest {
                shopping_list,
                budget,
                priority: Some(priority),
                display: prefs.clone(),
            }
            .validate()?;
            ("Product Recommendations".to_string(), assistant.recommend(&input).await)
        }
        Commands::Reviews { product_url } => {
            let url = ReviewsRequest {
                product_url,
                display: prefs.clone(),
            }
            .validate()?;
            ("Review Analysis Results".to_string(), assistant.analyze_reviews(&url).await)
        }
        Commands::Guide { product_type } => {
            let product_type = BuyingGuideRequest {
                product_type,
                display: prefs.clone(),
            }
            .validate()?;
            let content = assistant.buying_guide(&product_type).await;
            (format!("Buying Guide: {}", product_type), content)
        }
        Commands::Compare { product_name } => {
            let product_name = CompareRequest {
                product_name,
                display: prefs.clone(),
            }
            .validate()?;
            ("Product Comparison Results".to_string(), assistant.compare(&product_name).await)
        }
        Commands::Trending => ("Trending Products".to_string(), assistant.trending().await),
    };

    let rendered = ActionResponse::render(title, &content, &prefs, &config.display);
    println!("### {}\n\n{}", rendered.title, rendered.content);
    Ok(())
}

async fn serve(config: Config, assistant: ShoppingAssistant) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState {
        assistant: Arc::new(assistant),
        config,
    };
    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
