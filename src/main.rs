use std::io::Write;

use anyhow::{Context, Result};

use newstalk::config::OpenAiConfig;
use newstalk::engine::{ConsoleInput, ConsoleOutput, Engine, EngineConfig};
use newstalk::plan::PlanFormat;
use newstalk::services::OpenAiClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    // Missing credentials abort here, before any dialogue starts.
    let config = OpenAiConfig::from_env().context("startup configuration")?;
    let client = OpenAiClient::new(config);

    let article = read_article()?;

    tracing::info!("requesting utterance plan");
    let raw_plan = client.generate_plan(&article).await?;
    println!("\n生成された発話計画:\n{}", raw_plan);

    let plan = PlanFormat::default().parse(&raw_plan);
    tracing::info!(turns = plan.len(), "plan parsed");

    let mut engine = Engine::new(
        EngineConfig::default(),
        client.clone(),
        client,
        ConsoleInput::new(),
        ConsoleOutput,
    );
    engine.run(&plan).await;

    Ok(())
}

fn read_article() -> Result<String> {
    print!("ニュース記事を入力してください：");
    std::io::stdout().flush().ok();
    let mut article = String::new();
    std::io::stdin()
        .read_line(&mut article)
        .context("could not read article")?;
    Ok(article.trim().to_string())
}
