//! Trigram name generator binary.
//!
//! Trains the model on a list of names, one per line, and prints one loss
//! value per step to stdout. After training it prints a blank line followed
//! by the generated names, one per line. Diagnostics go to stderr through
//! `tracing`; `RUST_LOG` overrides the default `info` filter.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trigram::data::{load_words, Dataset, Vocabulary};
use trigram::{sample_names, train, Config, Model};

#[derive(Parser, Debug)]
#[command(
    name = "trigram",
    about = "Train a character trigram model on names and sample new ones"
)]
struct Args {
    /// Corpus file, one word per line
    #[arg(long, default_value = "names.txt")]
    words: PathBuf,

    /// Number of full-batch gradient-descent steps
    #[arg(long, default_value_t = 100)]
    iterations: usize,

    /// Gradient-descent step size
    #[arg(long, default_value_t = 10.0)]
    learning_rate: f32,

    /// Weight of the mean(W^2) penalty
    #[arg(long, default_value_t = 0.01)]
    reg_strength: f32,

    /// Number of names to generate
    #[arg(long, default_value_t = 20)]
    num_samples: usize,

    /// Seed for weight initialisation (default: OS entropy)
    #[arg(long)]
    init_seed: Option<u64>,

    /// Seed for sampling (default: OS entropy)
    #[arg(long)]
    sample_seed: Option<u64>,

    /// Optional JSONL file receiving per-step metrics
    #[arg(long)]
    metrics_file: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            iterations: self.iterations,
            learning_rate: self.learning_rate,
            reg_strength: self.reg_strength,
            num_samples: self.num_samples,
            init_seed: self.init_seed,
            sample_seed: self.sample_seed,
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn open_metrics(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Train on `words` and sample names, writing the stdout format to `out`.
///
/// `out` receives one loss per step, a blank line, then one name per line.
/// When `metrics` is set it receives the JSONL event stream.
fn run<W: Write>(
    words: &[String],
    config: &Config,
    out: &mut W,
    mut metrics: Option<&mut dyn Write>,
) -> Result<()> {
    let vocab = Vocabulary::from_words(words);
    let dataset = Dataset::from_words(words, &vocab)?;
    let inputs = dataset.encode_inputs(&vocab)?;
    info!(
        words = words.len(),
        vocab_size = vocab.size(),
        examples = dataset.len(),
        "corpus loaded"
    );

    if let Some(m) = metrics.as_mut() {
        let event = serde_json::json!({
            "type": "run_start",
            "config": config,
            "vocab_size": vocab.size(),
            "examples": dataset.len(),
        });
        writeln!(m, "{event}").context("failed to write metrics")?;
    }

    let mut model = Model::new(vocab.size(), &mut config.init_rng());

    let mut write_err: Option<io::Error> = None;
    let report = train(&mut model, &inputs, &dataset.labels, config, |step, loss| {
        if write_err.is_some() {
            return;
        }
        let mut emit = || -> io::Result<()> {
            writeln!(out, "{loss}")?;
            if let Some(m) = metrics.as_mut() {
                let event = serde_json::json!({ "type": "step", "step": step, "loss": loss });
                writeln!(m, "{event}")?;
            }
            Ok(())
        };
        if let Err(e) = emit() {
            write_err = Some(e);
        }
    })?;
    if let Some(e) = write_err {
        return Err(e).context("failed to write training progress");
    }

    writeln!(out)?;

    let names = sample_names(&model, &vocab, config.num_samples, &mut config.sample_rng())?;
    for name in &names {
        writeln!(out, "{name}")?;
    }
    out.flush()?;

    if let Some(m) = metrics {
        for name in &names {
            let event = serde_json::json!({ "type": "sample", "name": name });
            writeln!(m, "{event}").context("failed to write metrics")?;
        }
        let event = serde_json::json!({
            "type": "run_complete",
            "final_loss": report.final_loss,
            "final_nll": report.final_nll,
        });
        writeln!(m, "{event}").context("failed to write metrics")?;
        m.flush().context("failed to write metrics")?;
    }

    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.config();
    config.validate()?;

    info!(path = %args.words.display(), "reading corpus");
    let words = load_words(&args.words)?;
    let mut metrics = args.metrics_file.as_deref().map(open_metrics).transpose()?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    run(
        &words,
        &config,
        &mut stdout,
        metrics.as_mut().map(|m| m as &mut dyn Write),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        Config {
            iterations: 3,
            num_samples: 4,
            init_seed: Some(1),
            sample_seed: Some(2),
            ..Config::default()
        }
    }

    fn words() -> Vec<String> {
        vec!["ab".to_string(), "ba".to_string(), "abba".to_string()]
    }

    #[test]
    fn test_stdout_layout() {
        let mut out = Vec::new();
        run(&words(), &small_config(), &mut out, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // 3 losses, a blank separator, 4 names
        assert_eq!(lines.len(), 3 + 1 + 4);
        for line in &lines[..3] {
            assert!(line.parse::<f32>().is_ok(), "not a loss: {line:?}");
        }
        assert_eq!(lines[3], "");
        for name in &lines[4..] {
            assert!(name.chars().all(|c| c == 'a' || c == 'b'), "bad name: {name:?}");
        }
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        run(&words(), &small_config(), &mut a, None).unwrap();
        run(&words(), &small_config(), &mut b, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_metrics_events() {
        let mut out = Vec::new();
        let mut metrics = Vec::new();
        run(&words(), &small_config(), &mut out, Some(&mut metrics)).unwrap();

        let events: Vec<serde_json::Value> = String::from_utf8(metrics)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        let kinds: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
        let mut expected = vec!["run_start"];
        expected.extend(["step"; 3]);
        expected.extend(["sample"; 4]);
        expected.push("run_complete");
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_empty_corpus_prints_empty_names() {
        let mut out = Vec::new();
        run(&[], &small_config(), &mut out, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3 + 1 + 4);
        assert!(lines[3..].iter().all(|l| l.is_empty()));
    }
}
