use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskform_engine::{
  EngineConfig, FormSource, HostContext, SubmissionDraft, classify, interpret, submit,
};
use taskform_variables::VariableStore;

/// Taskform - interpret workflow task forms
#[derive(Parser)]
#[command(name = "taskform")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.taskform)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Engine config file (default: <data-dir>/config.json when present)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Log filter, e.g. "debug" or "taskform_engine=trace" (overrides RUST_LOG)
  #[arg(long, global = true)]
  log_level: Option<String>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Group a variable map into naming-convention buckets
  Classify {
    /// Path to the variables file (engine variable map JSON)
    variables_file: PathBuf,
  },

  /// Render a form definition
  Render {
    /// Path to the definition file: a component tree or a variable map
    definition_file: PathBuf,

    /// Variables used for templates (default: the definition's own variables)
    #[arg(long)]
    variables: Option<PathBuf>,

    /// Render as a signed-in user
    #[arg(long)]
    session: bool,

    /// Wallet address of the user; may be repeated
    #[arg(long = "wallet")]
    wallets: Vec<String>,

    /// Block explorer base url
    #[arg(long)]
    explorer_url: Option<String>,
  },

  /// Reconcile a submission draft against the original variables
  Submit {
    /// Path to the original variables file
    #[arg(long)]
    variables: PathBuf,

    /// Path to the submission draft file
    #[arg(long)]
    draft: PathBuf,

    /// Business key to submit with the variables
    #[arg(long)]
    business_key: Option<String>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  init_tracing(cli.log_level.as_deref());

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".taskform"),
  };
  let config = load_config(cli.config.as_deref(), &data_dir)?;

  match cli.command {
    Some(Commands::Classify { variables_file }) => classify_variables(&variables_file)?,
    Some(Commands::Render {
      definition_file,
      variables,
      session,
      wallets,
      explorer_url,
    }) => {
      let host = HostContext {
        has_session: session,
        wallets,
        explorer_url,
      };
      render_form(&definition_file, variables.as_deref(), &host, &config)?;
    }
    Some(Commands::Submit {
      variables,
      draft,
      business_key,
    }) => submit_draft(&variables, &draft, business_key, &config)?,
    None => {
      println!("taskform - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_tracing(log_level: Option<&str>) {
  let filter = match log_level {
    Some(level) => EnvFilter::new(level),
    None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

fn load_config(path: Option<&Path>, data_dir: &Path) -> Result<EngineConfig> {
  let path = match path {
    Some(path) => path.to_path_buf(),
    None => {
      let default = data_dir.join("config.json");
      if !default.exists() {
        return Ok(EngineConfig::default());
      }
      default
    }
  };

  let config = serde_json::from_value(read_json(&path)?)
    .with_context(|| format!("invalid config file: {}", path.display()))?;
  tracing::debug!(path = %path.display(), "loaded config");
  Ok(config)
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read file: {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {}", path.display()))
}

fn read_variables(path: &Path) -> Result<VariableStore> {
  VariableStore::from_json(read_json(path)?)
    .with_context(|| format!("invalid variables file: {}", path.display()))
}

fn classify_variables(variables_file: &Path) -> Result<()> {
  let store = read_variables(variables_file)?;
  let buckets = classify(&store);

  eprintln!(
    "Classified {} variables into {} buckets",
    store.len(),
    buckets.len()
  );
  println!("{}", serde_json::to_string_pretty(&buckets)?);

  Ok(())
}

fn render_form(
  definition_file: &Path,
  variables_file: Option<&Path>,
  host: &HostContext,
  config: &EngineConfig,
) -> Result<()> {
  let source = FormSource::from_json(read_json(definition_file)?)
    .with_context(|| format!("invalid form definition: {}", definition_file.display()))?;

  let store = match variables_file {
    Some(path) => read_variables(path)?,
    None => source.variables().cloned().unwrap_or_default(),
  };

  let definition = source
    .into_definition()
    .context("failed to resolve form definition")?;
  let form = interpret(&definition, &store, host, config);

  println!("{}", serde_json::to_string_pretty(&form)?);

  Ok(())
}

fn submit_draft(
  variables_file: &Path,
  draft_file: &Path,
  business_key: Option<String>,
  config: &EngineConfig,
) -> Result<()> {
  let store = read_variables(variables_file)?;
  let draft: SubmissionDraft = serde_json::from_value(read_json(draft_file)?)
    .with_context(|| format!("invalid submission draft: {}", draft_file.display()))?;

  let submission = submit(&draft, Some(&store), business_key, &config.reconcile_options())
    .context("submission rejected")?;

  if !submission.warnings.is_empty() {
    eprintln!("{} values could not be coerced", submission.warnings.len());
  }
  println!("{}", serde_json::to_string_pretty(&submission)?);

  Ok(())
}
