use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vision_playground::app::App;
use vision_playground::image::ImagePayload;
use vision_playground::models::{Config, ModelName, PersonaSpec};
use vision_playground::ollama::OllamaClient;
use vision_playground::prompts;

#[derive(Debug, Parser)]
#[command(name = "vision-playground")]
#[command(about = "Caption, question, and persona-chat images through a local Ollama model")]
struct CliArgs {
    /// Base vision model to use (overrides VISION_MODEL).
    #[arg(long, global = true, value_parser = parse_model_name)]
    model: Option<ModelName>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Describe an image.
    Caption {
        /// Path to the image file.
        image: PathBuf,

        /// Prompt sent along with the image.
        #[arg(long, default_value = prompts::CAPTION_PROMPT)]
        prompt: String,
    },
    /// Ask a question about an image.
    Vqa {
        /// Path to the image file.
        image: PathBuf,

        /// Question about the image.
        #[arg(long, default_value = prompts::VQA_PROMPT)]
        question: String,
    },
    /// Derive a persona model from the base model, then query it.
    Persona {
        /// Path to the image file.
        image: PathBuf,

        /// Name for the derived model.
        #[arg(long, default_value = prompts::PERSONA_NAME, value_parser = parse_model_name)]
        name: ModelName,

        /// System prompt baked into the persona.
        #[arg(long, default_value = prompts::PERSONA_SYSTEM)]
        system: String,

        /// Question for the persona.
        #[arg(long, default_value = prompts::PERSONA_PROMPT)]
        prompt: String,
    },
}

fn parse_model_name(input: &str) -> std::result::Result<ModelName, String> {
    input
        .parse()
        .map_err(|e: vision_playground::Error| e.to_string())
}

async fn run(args: CliArgs) -> Result<()> {
    let config = Config::from_env()?;
    let base_model = args.model.unwrap_or_else(|| config.vision_model.clone());

    let mut app = App::with_backend(Box::new(OllamaClient::new(config.host.clone())));
    info!("Using Ollama at {}", config.host);

    info!("Preparing model {}", base_model);
    let metadata = app.ensure_model(&base_model).await?;
    if let Some(family) = &metadata.details.family {
        info!("Model {} ready (family: {})", base_model, family);
    } else {
        info!("Model {} ready", base_model);
    }

    match args.action {
        Action::Caption { image, prompt } => {
            let payload = ImagePayload::from_path(&image)?;
            app.caption(&base_model, &prompt, &payload).await?;
        }
        Action::Vqa { image, question } => {
            let payload = ImagePayload::from_path(&image)?;
            app.vqa(&base_model, &question, &payload).await?;
        }
        Action::Persona {
            image,
            name,
            system,
            prompt,
        } => {
            let payload = ImagePayload::from_path(&image)?;
            let spec = PersonaSpec::new(name, base_model.clone(), system)?;
            app.run_persona(&spec, &prompt, &payload).await?;
        }
    }

    println!("{}", app.session().to_json()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vision_playground=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Workflow failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_model_name;

    #[test]
    fn test_parse_model_name_valid() {
        let parsed = parse_model_name("llava:7b").unwrap();
        assert_eq!(parsed.as_str(), "llava:7b");
    }

    #[test]
    fn test_parse_model_name_invalid() {
        let err = parse_model_name("  ").unwrap_err();
        assert!(err.contains("Invalid model name"));
    }
}
