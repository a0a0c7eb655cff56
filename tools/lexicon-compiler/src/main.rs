use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use logos_protocol::{Configuration, Lexicon};
use rkyv::ser::{serializers::AllocSerializer, Serializer};

#[derive(Parser)]
#[command(author, version, about = "Compiles the word lists of a JSON configuration to an rkyv lexicon")]
struct Cli {
    /// A full configuration, or a bare lexicon object
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
}

/// Top-level keys that mark a bare lexicon object.
const LEXICON_KEYS: [&str; 7] = [
    "copular",
    "extensible_copular",
    "non_extensible_copular",
    "complex_transitive",
    "adverbs_ignore",
    "adverbs_include",
    "adverbs_conj",
];

fn parse_lexicon(text: &str) -> anyhow::Result<Lexicon> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let bare = value
        .as_object()
        .is_some_and(|map| LEXICON_KEYS.iter().any(|key| map.contains_key(*key)));
    if bare {
        Ok(serde_json::from_value(value)?)
    } else {
        let config: Configuration = serde_json::from_value(value)?;
        Ok(config.lexicon)
    }
}

fn read_lexicon(path: &Path) -> anyhow::Result<Lexicon> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    parse_lexicon(&text).with_context(|| format!("parsing {:?}", path))
}

fn compile(mut lexicon: Lexicon) -> anyhow::Result<Vec<u8>> {
    lexicon.normalize();
    if lexicon.copular.is_empty() {
        return Err(anyhow!("the copular verb list is empty"));
    }

    let mut serializer = AllocSerializer::<4096>::default();
    serializer
        .serialize_value(&lexicon)
        .map_err(|e| anyhow!("rkyv serialization failed: {:?}", e))?;
    let bytes = serializer.into_serializer().into_inner();

    // what logos-extract will do on load
    rkyv::check_archived_root::<Lexicon>(&bytes)
        .map_err(|e| anyhow!("archive failed validation: {}", e))?;
    Ok(bytes.to_vec())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    println!("📖 Reading JSON from {:?}...", cli.input);
    let lexicon = read_lexicon(&cli.input)?;

    println!(
        "⚙️  Compiling lexicon: {} copular, {} complex-transitive, {} adverbs...",
        lexicon.copular.len(),
        lexicon.complex_transitive.len(),
        lexicon.adverbs_ignore.len() + lexicon.adverbs_include.len() + lexicon.adverbs_conj.len()
    );
    let bytes = compile(lexicon)?;

    fs::write(&cli.output, &bytes).with_context(|| format!("writing {:?}", cli.output))?;

    println!("✅ Success! {} bytes written to {:?}", bytes.len(), cli.output);
    Ok(())
}
