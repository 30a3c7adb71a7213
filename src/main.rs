use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use codegini::app::progressive::{DEFAULT_CHARS_PER_CHUNK, DEFAULT_CHUNK_DELAY};
use codegini::app::{
    LineSelection, ProcessedText, Resolved, SnippetSource, SuggestionConfig, SuggestionService,
    TextPostProcessor, render_progressively,
};
use codegini::domain::{GenerationResult, Provider};
use codegini::infra::secrets::{EnvSecretStore, FileSecretStore, SecretStore};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "codegini",
    version,
    about = "codegini: code suggestions from hosted LLM providers"
)]
struct Cli {
    /// JSON file holding provider API keys (default: ~/.codegini/secrets.json).
    #[arg(long, global = true, value_name = "PATH", env = "CODEGINI_SECRETS_FILE")]
    secrets_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a provider for a suggestion on a snippet.
    Suggest {
        /// Provider name (huggingface / cohere / openai / aws_llama / azure_ai).
        /// Prompted for when omitted; required when the snippet comes from stdin.
        #[arg(short, long)]
        provider: Option<Provider>,
        /// Source file; stdin is read when omitted.
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
        /// Restrict the snippet to a 1-based line range, e.g. `3:7`.
        #[arg(short, long, value_name = "N|START:END")]
        lines: Option<LineSelection>,
        /// Replace the selection in FILE instead of printing the suggestion.
        #[arg(long, requires = "file")]
        in_place: bool,
        /// Override CODEGINI_MAX_TOKENS.
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Override CODEGINI_TEMPERATURE.
        #[arg(long)]
        temperature: Option<f64>,
        /// Print only the Mermaid source when the suggestion contains a diagram.
        #[arg(long)]
        diagram: bool,
        /// Render the suggestion progressively.
        #[arg(long, conflicts_with = "in_place")]
        typewriter: bool,
    },
    /// Store an API key for a provider.
    SetKey { provider: Provider },
    /// Remove the stored API key for a provider.
    DeleteKey {
        provider: Provider,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// List providers, their endpoints and where their key comes from.
    Providers,
}

struct SuggestArgs {
    provider: Option<Provider>,
    file: Option<PathBuf>,
    lines: Option<LineSelection>,
    in_place: bool,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    diagram: bool,
    typewriter: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = SuggestionConfig::from_env().map_err(|e| anyhow!("config error: {e}"))?;
    let secrets = FileSecretStore::new(secrets_path(cli.secrets_file, &config)?);

    match cli.command {
        Commands::Suggest {
            provider,
            file,
            lines,
            in_place,
            max_tokens,
            temperature,
            diagram,
            typewriter,
        } => cmd_suggest(
            config,
            &secrets,
            SuggestArgs {
                provider,
                file,
                lines,
                in_place,
                max_tokens,
                temperature,
                diagram,
                typewriter,
            },
        ),
        Commands::SetKey { provider } => cmd_set_key(provider, &secrets),
        Commands::DeleteKey { provider, yes } => cmd_delete_key(provider, yes, &secrets),
        Commands::Providers => cmd_providers(&config, &secrets),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn secrets_path(flag: Option<PathBuf>, config: &SuggestionConfig) -> Result<PathBuf> {
    flag.or_else(|| config.secrets_file.clone())
        .or_else(FileSecretStore::default_path)
        .context("cannot locate a home directory; pass --secrets-file")
}

fn cmd_suggest(
    mut config: SuggestionConfig,
    secrets: &FileSecretStore,
    args: SuggestArgs,
) -> Result<()> {
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }

    let input = SnippetSource::from_path(args.file);
    let provider = match input.resolve_provider(args.provider)? {
        Resolved::Ready(provider) => provider,
        Resolved::NeedsPrompt => pick_provider(&mut DefaultEditor::new()?)?,
    };
    let credential = resolve_credential(&input, provider, secrets)?;

    let source = input.read()?;
    let snippet = match args.lines {
        Some(selection) => selection.slice(&source)?,
        None => source.as_str(),
    };

    let service = SuggestionService::from_config(&config)?;
    let text = match service.generate(provider, &credential, config.request(snippet)) {
        GenerationResult::Success { text } => text,
        GenerationResult::Empty { reason } => {
            eprintln!("No suggestion received ({reason}).");
            return Ok(());
        }
        GenerationResult::Failure { kind, message } if kind.is_retryable() => {
            bail!("{message} (temporary failure; try again)")
        }
        GenerationResult::Failure { message, .. } => bail!("{message}"),
    };

    if args.diagram
        && let ProcessedText::Diagram { source } = TextPostProcessor::new().process(&text)
    {
        println!("{source}");
        return Ok(());
    }

    if args.in_place {
        let path = input.path().context("--in-place requires --file")?;
        let updated = match args.lines {
            Some(selection) => selection.replace(&source, &text)?,
            None => text,
        };
        fs::write(path, updated).with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Updated {}", path.display());
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    if args.typewriter {
        render_progressively(&mut stdout, &text, DEFAULT_CHARS_PER_CHUNK, DEFAULT_CHUNK_DELAY)?;
    } else {
        stdout.write_all(text.as_bytes())?;
    }
    if !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

fn cmd_set_key(provider: Provider, secrets: &FileSecretStore) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let credential = prompt_credential(provider, &mut editor)?;
    secrets.store(provider, credential)?;
    eprintln!("API key for {provider} saved to {}", secrets.path().display());
    Ok(())
}

fn cmd_delete_key(provider: Provider, yes: bool, secrets: &FileSecretStore) -> Result<()> {
    if !yes {
        let mut editor = DefaultEditor::new()?;
        if !confirm(&mut editor, &format!("Delete the API key for {provider}?"))? {
            eprintln!("Kept the API key for {provider}.");
            return Ok(());
        }
    }
    secrets.delete(provider)?;
    eprintln!("API key for {provider} deleted.");
    Ok(())
}

fn cmd_providers(config: &SuggestionConfig, secrets: &FileSecretStore) -> Result<()> {
    let registry = config.registry()?;
    let env = EnvSecretStore::new();

    for provider in registry.providers() {
        let endpoint = registry.lookup(provider)?;
        let key_source = if env.get(provider)?.is_some() {
            "env"
        } else if secrets.get(provider)?.is_some() {
            "file"
        } else {
            "-"
        };
        println!(
            "{:<12} {:<14} {:<5} {}",
            provider.id(),
            provider.label(),
            key_source,
            endpoint.url()
        );
    }
    Ok(())
}

/// Environment first, then the secrets file, then ask and remember when the
/// terminal is free for prompts.
fn resolve_credential(
    input: &SnippetSource,
    provider: Provider,
    secrets: &FileSecretStore,
) -> Result<SecretString> {
    let env = EnvSecretStore::new();
    let stores: [&dyn SecretStore; 2] = [&env, secrets];
    if let Resolved::Ready(credential) = input.resolve_credential(&stores, provider)? {
        return Ok(credential);
    }

    let credential = prompt_credential(provider, &mut DefaultEditor::new()?)?;
    secrets.store(provider, credential)?;
    secrets
        .get(provider)?
        .with_context(|| format!("API key for {provider} was not persisted"))
}

fn prompt_credential(provider: Provider, editor: &mut DefaultEditor) -> Result<SecretString> {
    let key = read_line(editor, &format!("Enter your {provider} API key: "))?;
    if key.trim().is_empty() {
        bail!("No API key provided for {provider}.");
    }
    Ok(SecretString::from(key.trim().to_string()))
}

fn pick_provider(editor: &mut DefaultEditor) -> Result<Provider> {
    for (index, provider) in Provider::ALL.iter().enumerate() {
        eprintln!("  {}) {}", index + 1, provider.label());
    }
    let answer = read_line(editor, "Select an LLM provider: ")?;
    let answer = answer.trim();

    if let Ok(number) = answer.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| Provider::ALL.get(index).copied())
            .with_context(|| format!("no provider numbered {number}"));
    }
    Ok(answer.parse::<Provider>()?)
}

fn confirm(editor: &mut DefaultEditor, question: &str) -> Result<bool> {
    let answer = read_line(editor, &format!("{question} [y/N] "))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn read_line(editor: &mut DefaultEditor, prompt: &str) -> Result<String> {
    match editor.readline(prompt) {
        Ok(line) => Ok(line),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => bail!("cancelled"),
        Err(err) => Err(err.into()),
    }
}
