use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use logos_parser::{sentences, Sentence};
use logos_propositions::Extractor;
use logos_protocol::{Configuration, Lexicon};
use rkyv::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Extracts propositions from CoNLL-X dependency parses")]
struct Cli {
    /// CoNLL-X input; stdin when omitted
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON configuration; missing fields take their defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Lexicon archive written by lexicon-compiler, replacing the configured word lists
    #[arg(short, long, value_name = "FILE")]
    lexicon: Option<PathBuf>,

    /// Take sentence ids from `# id = N` comments instead of counting sentences
    #[arg(long)]
    ids: bool,

    /// Echo every sentence as a comment line before its propositions
    #[arg(long)]
    print_sentence: bool,

    /// Comment lines with the configuration, the parse and the detected clauses
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Configuration> {
    let Some(path) = path else {
        return Ok(Configuration::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {:?}", path))
}

fn load_lexicon(path: &Path) -> anyhow::Result<Lexicon> {
    let bytes = fs::read(path).with_context(|| format!("reading {:?}", path))?;
    // archives must be read from aligned memory
    let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(&bytes);

    let archived = rkyv::check_archived_root::<Lexicon>(&aligned)
        .map_err(|e| anyhow!("{:?} is not a valid lexicon archive: {}", path, e))?;
    let lexicon: Lexicon = archived.deserialize(&mut rkyv::Infallible)?;
    Ok(lexicon)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {:?}", path)),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("reading stdin")?;
            Ok(text)
        }
    }
}

/// `<id>\t"field"\t"field"...`
fn format_proposition(id: u32, fields: &[String]) -> String {
    let mut line = id.to_string();
    for field in fields {
        line.push_str("\t\"");
        line.push_str(field);
        line.push('"');
    }
    line
}

/// Output lines for one sentence, built in full before anything is written.
fn process(
    extractor: &Extractor,
    sentence: &Sentence,
    id: u32,
    cli: &Cli,
) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    if cli.print_sentence || cli.verbose {
        lines.push(format!("# Line {}: {}", id, sentence.text()));
    }
    if cli.verbose {
        lines.push("#   Dependency parse:".to_string());
        lines.extend(sentence.graph.to_string().lines().map(|edge| format!("#     {}", edge)));
    }

    let clauses = extractor.detect(&sentence.graph)?;
    if cli.verbose {
        lines.push(format!("#   Detected {} clause(s).", clauses.len()));
        for clause in &clauses {
            lines.push(format!("#   - {}", clause.describe(Some(extractor.config()))));
        }
    }

    let propositions = extractor.generate(&clauses)?;
    lines.extend(
        propositions
            .iter()
            .map(|proposition| format_proposition(id, proposition.fields())),
    );
    Ok(lines)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = &cli.lexicon {
        config.lexicon = load_lexicon(path)?;
    }
    let extractor = Extractor::new(config).context("invalid configuration")?;
    let input = read_input(cli.input.as_deref())?;

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if cli.verbose {
        writeln!(out, "# Configuration:")?;
        for line in serde_json::to_string_pretty(extractor.config())?.lines() {
            writeln!(out, "#   {}", line)?;
        }
    }

    let mut processed = 0usize;
    let mut failed = 0usize;
    for (index, parsed) in sentences(&input).enumerate() {
        let counter = index as u32 + 1;
        let sentence = match parsed {
            Ok(sentence) => sentence,
            Err(error) => {
                warn!(target: "logos::extract", id = counter, %error, "skipping unreadable sentence");
                failed += 1;
                continue;
            }
        };
        let id = match sentence.id {
            Some(id) if cli.ids => id.get(),
            _ => counter,
        };

        match process(&extractor, &sentence, id, &cli) {
            Ok(lines) => {
                for line in lines {
                    writeln!(out, "{}", line)?;
                }
                processed += 1;
            }
            Err(error) => {
                warn!(
                    target: "logos::extract",
                    id,
                    line = sentence.line,
                    error = %error,
                    "sentence failed"
                );
                failed += 1;
            }
        }
    }
    out.flush()?;

    info!(target: "logos::extract", processed, failed, "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_proposition() {
        let fields = vec!["Bell".to_string(), "makes".to_string(), "products".to_string()];
        assert_eq!(format_proposition(3, &fields), "3\t\"Bell\"\t\"makes\"\t\"products\"");
    }

    #[test]
    fn test_verbose_lines() {
        let cli = Cli::parse_from(["logos-extract", "--verbose"]);
        let sentence = logos_parser::parse_sentence(
            "1\tBell\tBell\tNNP\tNNP\t_\t2\tnsubj\n\
             2\tslept\tsleep\tVBD\tVBD\t_\t0\troot\n",
        )
        .unwrap();

        let lines = process(&Extractor::default(), &sentence, 7, &cli).unwrap();
        assert_eq!(
            lines,
            vec![
                "# Line 7: Bell slept",
                "#   Dependency parse:",
                "#     nsubj(slept-2, Bell-1)",
                "#   Detected 1 clause(s).",
                "#   - SV (V: slept@2, S: Bell@1)",
                "7\t\"Bell\"\t\"slept\"",
            ]
        );
    }
}
