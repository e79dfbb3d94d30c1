//! CLI command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Read};
use std::path::Path;

use crate::cli::args::{ConfigCommand, GenerateArgs};
use crate::config::{
    ConnectionConfig, SamplingSettings, Settings, ENV_API_KEY, ENV_API_VERSION, ENV_DEPLOYMENT,
    ENV_ENDPOINT,
};
use crate::summary::{ConsultationInput, SummaryBuilder};

/// Generate the patient-education document and emit the output record
pub async fn generate_document(settings: &Settings, args: GenerateArgs) -> Result<()> {
    let input = read_input(&args.input)?;

    let sampling = apply_sampling_overrides(settings.sampling, &args);
    sampling.validate()?;

    let connection = ConnectionConfig::from_settings(settings)?;
    let builder = SummaryBuilder::from_connection(connection)?.with_sampling(sampling);

    let output = builder.build_summary(&input).await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", json))
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            tracing::info!("Document written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Print the rendered prompt for an input file
pub fn show_prompt(input: &Path) -> Result<()> {
    let input = read_input(input)?;
    let prompt = crate::llm::build_patient_education_prompt(&input)?;
    println!("{}", prompt);
    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = settings.clone();
            if !shown.azure.api_key.is_empty() {
                shown.azure.api_key = "<redacted>".to_string();
            }
            let toml = toml::to_string_pretty(&shown)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct DoctorReport {
    checks: Vec<DoctorCheck>,
    sampling: SamplingSettings,
    connection: String,
}

/// Report connection readiness without contacting the service.
pub fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("patient-guide doctor");
    println!();

    for check in &report.checks {
        println!("{:<24} {:<8} {}", check.name, check.status, check.detail);
    }

    println!();
    println!(
        "sampling: max_tokens={} temperature={} top_p={}",
        report.sampling.max_tokens, report.sampling.temperature, report.sampling.top_p
    );
    println!("connection: {}", report.connection);

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> DoctorReport {
    let azure = &settings.azure;

    let checks = vec![
        doctor_check(ENV_API_KEY, &azure.api_key, true),
        doctor_check(ENV_API_VERSION, &azure.api_version, false),
        doctor_check(ENV_ENDPOINT, &azure.endpoint, false),
        doctor_check(ENV_DEPLOYMENT, &azure.deployment, false),
    ];

    let connection = match ConnectionConfig::from_settings(settings) {
        Ok(config) => match config.chat_completions_url() {
            Ok(url) => format!("ready ({})", url),
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    };

    DoctorReport {
        checks,
        sampling: settings.sampling,
        connection,
    }
}

fn doctor_check(name: &'static str, value: &str, secret: bool) -> DoctorCheck {
    let value = value.trim();
    if value.is_empty() {
        return DoctorCheck {
            name,
            status: "missing",
            detail: format!("set {} or the [azure] config section", name),
        };
    }

    DoctorCheck {
        name,
        status: "ok",
        detail: if secret {
            "<redacted>".to_string()
        } else {
            value.to_string()
        },
    }
}

fn apply_sampling_overrides(base: SamplingSettings, args: &GenerateArgs) -> SamplingSettings {
    SamplingSettings {
        max_tokens: args.max_tokens.unwrap_or(base.max_tokens),
        temperature: args.temperature.unwrap_or(base.temperature),
        top_p: args.top_p.unwrap_or(base.top_p),
    }
}

fn read_input(path: &Path) -> Result<ConsultationInput> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read input from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    };

    Ok(ConsultationInput::from_json_str(&content)?)
}
