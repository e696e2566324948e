use clap::{Parser, Subcommand, ValueEnum};
use futures_util::StreamExt;
use serde_json::Value;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Parser)]
#[command(name = "status-cli")]
#[command(about = "Management CLI for the status aggregator", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8090")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current snapshot
    Status,
    /// Print one service's record
    Service { identity: String },
    /// Show or set the capture-mode toggle
    Capture { state: Option<Toggle> },
    /// Follow snapshot updates as they are published
    Watch,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/api/status", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Service { identity } => {
            let res = client
                .get(format!("{}/api/status/{}", base, identity))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Capture { state: None } => {
            let res = client.get(format!("{}/api/capture", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Capture { state: Some(toggle) } => {
            let enabled = matches!(toggle, Toggle::On);
            let res = client
                .put(format!("{}/api/capture", base))
                .json(&serde_json::json!({ "enabled": enabled }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Watch => watch(base).await?,
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn watch(base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ws_url = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}/api/stream", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}/api/stream", rest)
    } else {
        format!("{}/api/stream", base)
    };

    let (mut stream, _) = connect_async(ws_url.as_str()).await?;

    while let Some(message) = stream.next().await {
        match message? {
            Message::Text(text) => {
                let snapshot: Value = serde_json::from_str(text.as_str())?;
                print_summary(&snapshot);
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}

fn print_summary(snapshot: &Value) {
    let services: Vec<String> = snapshot["records"]
        .as_array()
        .map(|records| {
            records
                .iter()
                .map(|r| {
                    format!(
                        "{}={}",
                        r["identity"].as_str().unwrap_or("?"),
                        r["status"].as_str().unwrap_or("?")
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    println!(
        "#{} overall={} capture={} [{}]",
        snapshot["sequence"],
        snapshot["signals"]["overall"].as_str().unwrap_or("?"),
        snapshot["signals"]["capture"].as_str().unwrap_or("?"),
        services.join(" ")
    );
}
