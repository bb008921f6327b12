use anyhow::{Context, Result, bail};
use desens_config::{Config, RecognizerKind};
use desens_core::RedactionStatus;
use desens_engine::{Job, JobEvent, JobHandle, Pipeline, PipelineOptions};
use desens_ner::{HttpRecognizer, LexiconRecognizer, Recognizer};
use desens_sources::FileEnumerator;
use desens_storage::{Cipher, EncryptedSink, KeyFile, OutputWriter, PlainSink, Sink};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::{RecognizerArg, RunArgs};

pub async fn handle(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    apply_overrides(&mut config, &args);
    config.validate()?;

    let pipeline = Pipeline::new(build_recognizer(&config)?, pipeline_options(&config))?;
    let sink = build_sink(&config)?;
    let enumerator = FileEnumerator::new(&config.input.extensions)
        .with_exclude(&config.input.exclude)
        .with_recursive(config.input.recursive);
    let writer = OutputWriter::new(&args.output).with_basename(config.output.keep_basename);

    let (handle, mut events) =
        Job::new(pipeline, enumerator, sink, writer).spawn(&args.input);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => print_event(&event),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => interrupt(&handle)?,
        }
    }

    let report = handle.wait().await?;
    if !report.success {
        bail!("{}", report.message);
    }

    Ok(())
}

/// First Ctrl-C stops the job gracefully; a second one abandons it
fn interrupt(handle: &JobHandle) -> Result<()> {
    if handle.is_stopped() {
        bail!("Interrupted; the file in progress was not written");
    }

    eprintln!("Stopping after the current paragraph (Ctrl-C again to quit now)...");
    handle.stop();
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(passes) = args.passes {
        config.redaction.passes = passes;
    }
    if let Some(max_length) = args.max_length {
        config.chunking.max_length = max_length;
    }
    if let Some(labels) = &args.labels {
        config.redaction.labels = labels.iter().map(|l| l.trim().to_string()).collect();
    }
    if let Some(mask) = &args.mask {
        config.redaction.mask = mask.clone();
    }
    if args.encrypt {
        config.output.encrypt = true;
    }
    if let Some(key_file) = &args.key_file {
        config.output.key_file = key_file.clone();
    }
    if let Some(lexicon) = &args.lexicon {
        config.recognizer.lexicon.path = Some(lexicon.clone());
        // A lexicon path alone selects the lexicon recognizer
        if args.recognizer.is_none() {
            config.recognizer.kind = RecognizerKind::Lexicon;
        }
    }
    match args.recognizer {
        Some(RecognizerArg::Http) => config.recognizer.kind = RecognizerKind::Http,
        Some(RecognizerArg::Lexicon) => config.recognizer.kind = RecognizerKind::Lexicon,
        None => {}
    }
    if let Some(token) = &args.token {
        config.recognizer.http.token = token.clone();
    }
    if args.no_basename {
        config.output.keep_basename = false;
    }
}

fn pipeline_options(config: &Config) -> PipelineOptions {
    PipelineOptions {
        max_chunk_length: config.chunking.max_length,
        overflow: config.chunking.overflow,
        passes: config.redaction.passes,
        mask: config.redaction.mask.clone(),
        allowed_labels: config.labels(),
        unit_suffixes: config.redaction.unit_suffixes.clone(),
        supplementary: config.redaction.supplementary,
    }
}

fn build_recognizer(config: &Config) -> Result<Arc<dyn Recognizer>> {
    match config.recognizer.kind {
        RecognizerKind::Http => {
            let http = &config.recognizer.http;
            if http.token.is_empty() {
                tracing::warn!("No NER API token configured (use --token or DESENS_NER_TOKEN)");
            }

            let recognizer = if http.timeout_secs > 0 {
                HttpRecognizer::with_timeout(
                    &http.url,
                    &http.token,
                    Duration::from_secs(http.timeout_secs),
                )?
            } else {
                HttpRecognizer::new(&http.url, &http.token)?
            };

            Ok(Arc::new(recognizer.entities_key(&http.entities_key)))
        }
        RecognizerKind::Lexicon => {
            let path = config
                .recognizer
                .lexicon
                .path
                .as_deref()
                .context("recognizer.lexicon.path is not set")?;
            let lexicon = LexiconRecognizer::from_path(path)
                .with_context(|| format!("Failed to load lexicon {}", path.display()))?;
            tracing::info!(path = %path.display(), entries = lexicon.len(), "Loaded lexicon");

            Ok(Arc::new(lexicon))
        }
    }
}

fn build_sink(config: &Config) -> Result<Arc<dyn Sink>> {
    if !config.output.encrypt {
        return Ok(Arc::new(PlainSink));
    }

    let key_file = KeyFile::new(&config.output.key_file);
    let generated = !key_file.exists();
    let key = key_file
        .load_or_generate()
        .with_context(|| format!("Failed to load key {}", key_file.path().display()))?;
    if generated {
        println!(
            "Generated key {} (keep it; outputs cannot be decrypted without it)",
            key_file.path().display()
        );
    }

    Ok(Arc::new(EncryptedSink::new(Cipher::new(&key)?)))
}

fn print_event(event: &JobEvent) {
    match event {
        JobEvent::Started { total } => println!("Found {} file(s)", total),
        JobEvent::FileDone {
            path,
            status,
            output,
            completed,
            total,
        } => {
            let note = if *status == RedactionStatus::Partial {
                " (partial: some chunks left unredacted)"
            } else {
                ""
            };
            println!(
                "[{}/{}] {} -> {}{}",
                completed,
                total,
                path.display(),
                output.display(),
                note
            );
        }
        JobEvent::FileSkipped {
            path,
            reason,
            completed,
            total,
        } => println!("[{}/{}] skipped {}: {}", completed, total, path.display(), reason),
        // Failures are reported through the returned error
        JobEvent::Finished { message, success } => {
            if *success {
                println!("✓ {}", message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use desens_core::EntityLabel;

    fn run_args(args: &[&str]) -> RunArgs {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Run(args) => *args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_overrides_applied() {
        let args = run_args(&[
            "desens",
            "run",
            "in",
            "-o",
            "out",
            "--passes",
            "3",
            "--max-length",
            "64",
            "--labels",
            "NR, NS",
            "--mask",
            "X",
            "--no-basename",
        ]);
        let mut config = Config::default();
        apply_overrides(&mut config, &args);

        assert_eq!(config.redaction.passes, 3);
        assert_eq!(config.chunking.max_length, 64);
        assert_eq!(config.labels(), vec![EntityLabel::Person, EntityLabel::Location]);
        assert_eq!(config.redaction.mask, "X");
        assert!(!config.output.keep_basename);

        let options = pipeline_options(&config);
        assert_eq!(options.passes, 3);
        assert_eq!(options.mask, "X");
    }

    #[test]
    fn test_lexicon_flag_selects_recognizer() {
        let args = run_args(&["desens", "run", "in", "-o", "out", "--lexicon", "names.toml"]);
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.recognizer.kind, RecognizerKind::Lexicon);

        let args = run_args(&[
            "desens",
            "run",
            "in",
            "-o",
            "out",
            "--lexicon",
            "names.toml",
            "--recognizer",
            "http",
        ]);
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.recognizer.kind, RecognizerKind::Http);
    }

    #[test]
    fn test_lexicon_recognizer_built_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.toml");
        std::fs::write(&path, "[[entries]]\ntext = \"孙中山\"\nlabel = \"PERSON\"\n").unwrap();

        let mut config = Config::default();
        config.recognizer.kind = RecognizerKind::Lexicon;
        config.recognizer.lexicon.path = Some(path);

        let recognizer = build_recognizer(&config).unwrap();
        assert_eq!(recognizer.name(), "lexicon");
    }

    #[tokio::test]
    async fn test_second_interrupt_quits() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("a.txt"), "孙中山").unwrap();

        let recognizer: Arc<dyn Recognizer> =
            Arc::new(LexiconRecognizer::from_toml_str("").unwrap());
        let job = Job::new(
            Pipeline::new(recognizer, PipelineOptions::default()).unwrap(),
            FileEnumerator::new(["txt"]),
            Arc::new(PlainSink),
            OutputWriter::new(out.path()),
        );
        let (handle, _events) = job.spawn(input.path());

        assert!(interrupt(&handle).is_ok());
        assert!(handle.is_stopped());
        assert!(interrupt(&handle).is_err());

        let report = handle.wait().await.unwrap();
        assert!(report.cancelled);
    }

    #[test]
    fn test_encrypted_sink_generates_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.output.encrypt = true;
        config.output.key_file = dir.path().join("desens.key");

        let sink = build_sink(&config).unwrap();
        assert_eq!(sink.extension(), "enc");
        assert!(config.output.key_file.exists());

        // An existing key is reused, not replaced
        let key = std::fs::read(&config.output.key_file).unwrap();
        build_sink(&config).unwrap();
        assert_eq!(std::fs::read(&config.output.key_file).unwrap(), key);

        config.output.encrypt = false;
        assert_eq!(build_sink(&config).unwrap().extension(), "txt");
    }
}
