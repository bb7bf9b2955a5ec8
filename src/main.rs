use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use voxprep::app::run_batch_command;
use voxprep::cli::{Cli, Commands, ModelsAction};
use voxprep::config::Config;
use voxprep::models::catalog::list_models;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let Some(ref input_dir) = cli.input_dir else {
                eprintln!("{}", "Error: no input directory given".red());
                eprintln!("Usage: voxprep <INPUT_DIR>  (see --help)");
                std::process::exit(2);
            };

            let config = load_config(&cli)?;
            if let Err(e) = run_batch_command(config, input_dir, cli.quiet, cli.no_download).await {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        }
        Some(Commands::Models { ref action }) => {
            let config = load_config(&cli)?;
            handle_models_command(action, &config).await?;
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. CLI flags
/// 2. Environment variables (VOXPREP_*)
/// 3. Config file (--config path, or ~/.config/voxprep/config.toml)
/// 4. Built-in defaults
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(ref path) = cli.config {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    }
    .with_env_overrides();

    if let Some(ref model) = cli.model {
        config.stt.model = model.clone();
    }
    if let Some(ref language) = cli.language {
        config.stt.language = language.clone();
    }
    if let Some(ref dir) = cli.model_dir {
        config.stt.model_dir = Some(dir.clone());
    }
    if let Some(threads) = cli.threads {
        config.stt.threads = Some(threads);
    }
    if cli.demucs {
        config.stt.demucs = true;
    }
    if let Some(rate) = cli.resample {
        config.dataset.target_sample_rate = Some(rate);
    }
    if let Some(pad) = cli.pad {
        config.dataset.end_pad_secs = pad;
    }

    config.validate()?;
    Ok(config)
}

/// Handle model management commands.
async fn handle_models_command(action: &ModelsAction, config: &Config) -> Result<()> {
    let override_dir = config.stt.model_dir.as_deref();

    match action {
        ModelsAction::List => {
            println!("Available models:");
            for model in list_models() {
                #[cfg(feature = "model-download")]
                println!(
                    "  {}",
                    voxprep::models::download::format_model_info(model, override_dir)
                );
                #[cfg(not(feature = "model-download"))]
                {
                    let status = if voxprep::models::is_model_installed(model.name, override_dir) {
                        "[installed]"
                    } else {
                        "[not installed]"
                    };
                    println!("  {:16} {:5} MB   {}", model.name, model.size_mb, status);
                }
            }
        }
        ModelsAction::Install { name } => {
            #[cfg(feature = "model-download")]
            {
                let path =
                    voxprep::models::download::download_model(name, override_dir, true).await?;
                println!("{}", format!("Model '{name}' installed successfully").green());
                println!("Location: {}", path.display());
            }
            #[cfg(not(feature = "model-download"))]
            {
                eprintln!(
                    "{}",
                    format!(
                        "Error: this build cannot download models. Place ggml-{name}.bin in {} manually.",
                        voxprep::models::models_dir(override_dir).display()
                    )
                    .red()
                );
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
