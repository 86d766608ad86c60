use std::io::{IsTerminal, Read};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use openrouter_playground::{
    ApiKey, CallFailure, CompletionClient, DEFAULT_SYSTEM_MESSAGE, GenerationRequest,
    GenerationResult, KNOWN_MODELS, ModelTier, OpenRouterConfig, ResponseBody,
};

#[derive(Parser)]
#[command(name = "openrouter-playground")]
#[command(author, version, about = "Send a prompt to an OpenRouter model", long_about = None)]
struct Cli {
    /// Prompt text. Read from stdin when omitted.
    prompt: Option<String>,

    /// Model tier: `cheap` or `top-tier`.
    #[arg(short, long, default_value_t = ModelTier::Cheap)]
    tier: ModelTier,

    /// Explicit model id, overrides --tier.
    #[arg(short, long)]
    model: Option<String>,

    /// Creativity of the answer.
    #[arg(long, default_value_t = 0.2, value_parser = parse_temperature)]
    temperature: f32,

    /// Maximum response length in tokens.
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(64..=4000))]
    max_tokens: u32,

    /// System message sent ahead of the prompt.
    #[arg(long, default_value = DEFAULT_SYSTEM_MESSAGE, conflicts_with = "no_system")]
    system: String,

    /// Send the prompt without a system message.
    #[arg(long)]
    no_system: bool,

    /// Print the raw response payload.
    #[arg(long)]
    debug: bool,

    /// List model tiers and known models, then exit.
    #[arg(long)]
    list_models: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn parse_temperature(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("temperature must be between 0.0 and 1.0, got {value}"))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.list_models {
        print_models();
        return Ok(ExitCode::SUCCESS);
    }

    dotenv::dotenv().ok();
    let api_key = ApiKey::Default.resolve()?;

    let prompt = read_prompt(cli.prompt.as_deref())?;
    let (tier_label, model) = match &cli.model {
        Some(model) => ("custom", model.clone()),
        None => (cli.tier.label(), cli.tier.model().to_string()),
    };

    let mut request = GenerationRequest::new(&model, prompt)
        .with_temperature(cli.temperature)
        .with_max_tokens(cli.max_tokens);
    if !cli.no_system {
        request = request.with_system_message(cli.system);
    }

    let client = CompletionClient::new(OpenRouterConfig::new(api_key))?;
    info!(%model, "calling model");

    match client.complete(&request).await {
        Ok(result) => {
            print_result(tier_label, &model, &result, cli.debug)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            print_failure(&failure)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Take the prompt from the argument or stdin; blank prompts are refused.
fn read_prompt(arg: Option<&str>) -> Result<String> {
    let raw = match arg {
        Some(prompt) => prompt.to_string(),
        None => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                eprintln!("Your prompt (end with Ctrl-D):");
            }
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("failed to read prompt from stdin")?;
            buf
        }
    };

    let prompt = raw.trim();
    if prompt.is_empty() {
        bail!("Please enter a prompt");
    }
    Ok(prompt.to_string())
}

fn print_models() {
    println!("Model tiers:");
    for tier in ModelTier::ALL {
        println!("  {:<9} {:<30} {}", tier, tier.model(), tier.notes());
    }
    println!();
    println!("Known models:");
    for model in KNOWN_MODELS {
        println!("  {model}");
    }
}

fn print_result(tier: &str, model: &str, result: &GenerationResult, debug: bool) -> Result<()> {
    println!("Response");
    println!("{}", result.text);
    println!();

    let meta = json!({
        "tier": tier,
        "model": model,
        "seconds": (result.elapsed_seconds() * 100.0).round() / 100.0,
        "usage": result.usage,
    });
    println!("Meta");
    println!("{}", serde_json::to_string_pretty(&meta)?);

    if debug {
        println!();
        println!("Raw response (debug)");
        println!("{}", serde_json::to_string_pretty(&result.raw_payload)?);
    }
    Ok(())
}

fn print_failure(failure: &CallFailure) -> Result<()> {
    match failure {
        CallFailure::Http { status_code, body } => {
            eprintln!("HTTP Error: {status_code}");
            match body {
                ResponseBody::Json(value) => eprintln!("{}", serde_json::to_string_pretty(value)?),
                ResponseBody::Text(text) if text.is_empty() => eprintln!("No response body."),
                ResponseBody::Text(text) => eprintln!("{text}"),
            }
        }
        CallFailure::Transport { .. } | CallFailure::MalformedResponse { .. } => {
            eprintln!("Error: {failure}");
        }
    }
    Ok(())
}
