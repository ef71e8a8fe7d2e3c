use anyhow::Result;
use clap::Parser;

use viral_scout::analyst::AnalystService;
use viral_scout::cli::{Args, Command};
use viral_scout::config::Config;
use viral_scout::types::SearchParams;
use viral_scout::ui::{
    Dashboard, DirectSource, HttpSource, ReportSource, ServiceSource, ViewState, terminal,
};
use viral_scout::{bake, logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let command = args.command.clone();
    let config = args.into_config()?;
    logging::init(config.verbose);

    match command {
        Command::Serve { .. } => server::serve(config).await,
        Command::Scout {
            days,
            max_price,
            endpoint,
            json,
            ..
        } => scout(&config, SearchParams::new(days, max_price), endpoint, json).await,
        Command::Bake { .. } => {
            let outcome = bake::run(&config, |msg| eprintln!("{}", msg)).await?;
            for path in &outcome.written {
                println!("✅ Report saved to {}", path.display());
            }
            Ok(())
        }
    }
}

async fn scout(
    config: &Config,
    params: SearchParams,
    endpoint: Option<String>,
    json: bool,
) -> Result<()> {
    let credential = config.client_api_key.trim().to_string();
    let source: Box<dyn ReportSource> = if let Some(endpoint) = endpoint {
        Box::new(HttpSource::new(endpoint))
    } else if !credential.is_empty() {
        Box::new(DirectSource::new(config.llm.clone()))
    } else {
        Box::new(ServiceSource::new(AnalystService::new(&config.llm)?))
    };

    let mut dashboard = Dashboard::new();
    dashboard
        .submit(source.as_ref(), &credential, params, &|msg: &str| {
            eprintln!("⏳ {}", msg)
        })
        .await?;

    match dashboard.state() {
        ViewState::Ready(response) if json => {
            println!("{}", serde_json::to_string_pretty(response)?)
        }
        state => println!("{}", terminal::render_state(state)),
    }
    Ok(())
}
