pub mod args;
pub mod commands;

pub use args::{OutputFormat, TransformArgs};
use crate::core::ConfigLoader;
use clap::Parser;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\n{all-args}\n\
{after-help}\n";

#[derive(Parser, Debug)]
#[command(name = "ducatify")]
#[command(version = crate::VERSION)]
#[command(about = "Graft the ducati networking subsystem onto a Diego deployment manifest")]
#[command(help_template = HELP_TEMPLATE)]
#[command(after_help = after_help())]
pub struct Args {
    #[command(flatten)]
    pub transform: TransformArgs,
}

fn after_help() -> String {
    let mut text = String::from(
        "Example:\n    ducatify --diego diego.yml --cf-creds cf_creds.yml > diego-ducati.yml\n\nEnvironment:\n",
    );
    for line in ConfigLoader::env_var_documentation() {
        text.push_str("    ");
        text.push_str(line);
        text.push('\n');
    }
    text.push_str("    DUCATIFY_LOG_OUTPUT - Console log destination: stderr or none\n");
    text.push_str("    DUCATIFY_LOG - Tracing filter directive (falls back to RUST_LOG)");
    text
}

pub fn run(args: Args) -> crate::Result<()> {
    commands::transform(args.transform)
}
