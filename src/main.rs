use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use newsverify::bootstrap::load_verifier;
use newsverify::config::{ArtifactLayout, Config};
use newsverify::corpus::{DEFAULT_SEED, train_test_split};
use newsverify::{Corpus, NewsClassifier, NewsVerifier, TrainParams, server};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "newsverify", version, about = "Fake news classifier")]
struct Cli {
    /// Configuration file (defaults to ./newsverify.toml when present)
    #[arg(long, global = true, env = "NEWSVERIFY_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    artifacts: ArtifactArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ArtifactArgs {
    /// Directory holding the model artifacts
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Zip archive to download when the model directory is absent
    #[arg(long, global = true)]
    archive_url: Option<String>,

    /// How to find the artifacts inside the model directory
    #[arg(long, global = true, value_enum)]
    layout: Option<ArtifactLayout>,
}

#[derive(Subcommand)]
enum Command {
    /// Fit the vectorizer and classifier and write both artifacts
    Train {
        #[command(flatten)]
        data: DataArgs,

        /// Shuffle and split seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Share of each class held out for evaluation (0 trains on everything)
        #[arg(long, default_value_t = 0.0)]
        test_ratio: f64,
    },
    /// Report accuracy of the saved artifacts on labeled CSVs
    Evaluate {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Classify TEXT, or read lines interactively when omitted
    Check { text: Option<String> },
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct DataArgs {
    /// CSV of fake articles (class 0)
    #[arg(long, default_value = "dataset/Fake.csv")]
    fake: PathBuf,

    /// CSV of real articles (class 1)
    #[arg(long, default_value = "dataset/True.csv")]
    real: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("newsverify=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.artifacts.model_dir {
        config.artifacts.model_dir = dir;
    }
    if let Some(url) = cli.artifacts.archive_url {
        config.artifacts.archive_url = Some(url);
    }
    if let Some(layout) = cli.artifacts.layout {
        config.artifacts.layout = layout;
    }

    match cli.command {
        Command::Train {
            data,
            seed,
            test_ratio,
        } => {
            config.validate()?;
            train(&config, &data, seed, test_ratio)
        }
        Command::Evaluate { data } => {
            config.validate()?;
            let verifier = load(&config).await?;
            let corpus = Corpus::from_csv(&data.fake, &data.real)?;
            let all = corpus.shuffled(DEFAULT_SEED);
            let acc = verifier.classifier().evaluate_on(&all);
            println!("✅ Accuracy on {} articles: {:.2}%", all.len(), acc * 100.0);
            Ok(())
        }
        Command::Check { text } => {
            config.validate()?;
            let verifier = load(&config).await?;
            match text {
                Some(text) => print_verdict(&verifier, &text),
                None => prompt_loop(&verifier)?,
            }
            Ok(())
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            let verifier = Arc::new(load(&config).await?);
            server::serve(&config.server, verifier)
                .await
                .context("serving HTTP")
        }
    }
}

async fn load(config: &Config) -> anyhow::Result<NewsVerifier> {
    load_verifier(&config.artifacts).await.with_context(|| {
        format!(
            "loading artifacts from {}",
            config.artifacts.model_dir.display()
        )
    })
}

fn train(config: &Config, data: &DataArgs, seed: u64, test_ratio: f64) -> anyhow::Result<()> {
    if !(0.0..1.0).contains(&test_ratio) {
        anyhow::bail!("--test-ratio must be in [0, 1), got {test_ratio}");
    }

    println!("🧠 Training model...");
    let corpus = Corpus::from_csv(&data.fake, &data.real)
        .with_context(|| format!("reading {:?} and {:?}", data.fake, data.real))?;

    let fake = train_test_split(&corpus.fake, test_ratio, seed);
    let real = train_test_split(&corpus.real, test_ratio, seed);
    let train_corpus = Corpus {
        fake: fake.train,
        real: real.train,
    };
    let params = TrainParams {
        seed,
        ..TrainParams::default()
    };
    let model = NewsClassifier::train(&train_corpus, &params)?;

    let held_out: Vec<_> = fake.test.into_iter().chain(real.test).collect();
    if !held_out.is_empty() {
        let acc = model.evaluate_on(&held_out);
        tracing::info!(articles = held_out.len(), accuracy = acc, "Hold-out evaluation");
        println!("✅ Hold-out accuracy: {:.2}%", acc * 100.0);
    }

    let a = &config.artifacts;
    println!("💾 Saving model to {:?}", a.model_dir);
    save(&model, &a.model_dir, &a.model_file, &a.vectorizer_file)
}

fn save(
    model: &NewsClassifier,
    dir: &Path,
    model_file: &str,
    vectorizer_file: &str,
) -> anyhow::Result<()> {
    model
        .save(dir, model_file, vectorizer_file)
        .with_context(|| format!("writing artifacts to {}", dir.display()))?;
    println!("✅ Model trained & saved successfully");
    Ok(())
}

fn print_verdict(verifier: &NewsVerifier, text: &str) {
    let verdict = verifier.verify(text);
    println!("{} (confidence = {}%)", verdict.result, verdict.confidence);
}

fn prompt_loop(verifier: &NewsVerifier) -> io::Result<()> {
    loop {
        print!("Enter news text to verify (or 'exit'): ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();

        if line.eq_ignore_ascii_case("exit") {
            return Ok(());
        }
        print_verdict(verifier, line);
    }
}
