use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bulk_sender")]
#[command(about = "Send personalized messages to a contact sheet through the Z-API gateway")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a personalized text message to every contact
    Text {
        #[command(flatten)]
        contacts: ContactsArgs,
        #[command(flatten)]
        template: TemplateArgs,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Send the same image and caption to every contact
    Image {
        #[command(flatten)]
        contacts: ContactsArgs,
        /// Publicly reachable URL of the image
        #[arg(long)]
        image_url: String,
        /// Caption sent with the image
        #[arg(long, default_value = "")]
        caption: String,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Render the template against the first contact without sending anything
    Preview {
        #[command(flatten)]
        contacts: ContactsArgs,
        #[command(flatten)]
        template: TemplateArgs,
    },
    /// Write an example contact sheet
    Sample {
        #[arg(long, short, default_value = "contacts_template.csv")]
        output: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct ContactsArgs {
    /// CSV file with a header row and a `phone` column
    #[arg(long, short)]
    pub contacts: PathBuf,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct TemplateArgs {
    /// Message text, e.g. "Hi {name}"
    #[arg(long, short)]
    pub template: Option<String>,
    /// File containing the message text
    #[arg(long)]
    pub template_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Seconds to wait between messages (overrides SEND_DELAY_SECONDS)
    #[arg(long, short)]
    pub delay: Option<u64>,
    /// Where to write the CSV report
    #[arg(long, short)]
    pub report: Option<PathBuf>,
}
