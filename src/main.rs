use clap::Parser;
use log::{error, info};

use rust_optics::io::{read_session, write_output};
use rust_optics::{conversions_for, convertible_fields, Converter, ConverterError};

#[derive(Parser, Debug)]
#[command(version, about = "Convert linear response functions of crystals", long_about = None)]
struct Args {
    /// YAML session file with converter settings, operation and input field
    #[arg(short, long, default_value = "session.yml")]
    config: String,

    /// List the conversions available for a field (e.g. epsTen) and exit
    #[arg(short, long)]
    list: Option<String>,
}

fn list_conversions(field: &str) {
    match conversions_for(field) {
        Some(catalog) => {
            println!("{} ({}):", catalog.name, catalog.field);
            for entry in &catalog.converters {
                println!(
                    "  {:<32} key = {:<16} output = {:<10} flags = {:?}",
                    entry.output_name,
                    entry.operation.key(),
                    entry.output_field,
                    entry.flags
                );
            }
        }
        None => {
            let known: Vec<&str> = convertible_fields().collect();
            println!("No conversion available for {}; known fields: {}", field, known.join(", "));
        }
    }
}

fn run(args: &Args) -> Result<(), ConverterError> {
    let session = read_session(&args.config)?;
    let converter = Converter::from_config(session.converter.clone())?;
    let field = session.tensor_field();
    info!("running {} on {} frequencies", session.operation, field.len());
    let output = converter.convert_by_key(&session.operation, &field)?;
    write_output(std::io::stdout().lock(), &output)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Some(field) = &args.list {
        list_conversions(field);
        return;
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
