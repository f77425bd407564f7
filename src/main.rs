use std::{fs, path::PathBuf};

use anyhow::{Context, Error, Result};
use bulk_sender::{
    cli::{Cli, Command, ContactsArgs, RunArgs, TemplateArgs},
    clients::zapi::ZapiClient,
    config::{Config, RECOMMENDED_MIN_DELAY_SECONDS},
    dispatch::{Payload, run_rows},
    error::DispatchError,
    models::template::MessageTemplate,
    report::summarize,
    sheet,
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command {
        Command::Sample { output } => {
            init_tracing(false);
            sheet::save_sample(&output)?;
            println!("Sample contact sheet written to {}", output.display());
            Ok(())
        }
        Command::Preview { contacts, template } => {
            init_tracing(false);
            preview(&contacts, &template)
        }
        Command::Text {
            contacts,
            template,
            run,
        } => {
            let template = load_template(&template)?;
            send(&contacts, Payload::Text(template), &run).await
        }
        Command::Image {
            contacts,
            image_url,
            caption,
            run,
        } => send(&contacts, Payload::Image { image_url, caption }, &run).await,
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn load_template(args: &TemplateArgs) -> Result<MessageTemplate, Error> {
    let source = match (&args.template, &args.template_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file {}", path.display()))?,
        (None, None) => return Err(DispatchError::Config("no template given".to_string()).into()),
    };

    Ok(MessageTemplate::parse(&source)?)
}

fn preview(contacts: &ContactsArgs, template: &TemplateArgs) -> Result<(), Error> {
    let template = load_template(template)?;
    let sheet = sheet::load_contacts(&contacts.contacts)?;

    let placeholders: Vec<String> = sheet.columns.iter().map(|c| format!("{{{}}}", c)).collect();
    println!("Available placeholders: {}", placeholders.join(", "));

    let missing = template.missing_placeholders(&sheet.columns);
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(", "),
            "Template placeholders not found in the contact sheet"
        );
    }

    match sheet.contacts().next() {
        None => println!("Contact sheet has no usable contacts, nothing to preview"),
        Some(contact) => match template.render(contact) {
            Ok(rendered) => println!("Preview for {}:\n\n{}", contact.display_name(), rendered),
            Err(e) => warn!(error = %e, "Template could not be rendered for the first contact"),
        },
    }

    Ok(())
}

async fn send(contacts: &ContactsArgs, payload: Payload, run: &RunArgs) -> Result<(), Error> {
    let config = Config::load()?;
    init_tracing(config.json_logs());

    let delay = run.delay.unwrap_or(config.send_delay_seconds);
    if delay < RECOMMENDED_MIN_DELAY_SECONDS {
        warn!(
            delay_seconds = delay,
            recommended_min = RECOMMENDED_MIN_DELAY_SECONDS,
            "Short delays between messages may get the number blocked"
        );
    }

    let sheet = sheet::load_contacts(&contacts.contacts)?;
    let gateway = ZapiClient::new(&config.credentials())?;
    let pacing = config.pacing(run.delay);

    let campaign = run_rows(&sheet.rows, &payload, pacing.as_ref(), &gateway).await?;
    let summary = summarize(&campaign.results);

    info!(campaign_id = %campaign.id, summary = %summary, "Campaign summary");
    println!("{}", summary);

    let report_path = run
        .report
        .clone()
        .unwrap_or_else(|| PathBuf::from(campaign.default_report_name()));
    sheet::save_report(&report_path, &campaign.report_rows())?;
    println!("Report written to {}", report_path.display());

    Ok(())
}
