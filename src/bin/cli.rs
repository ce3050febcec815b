//! productd CLI
//!
//! Offline administration of a product data file. Each subcommand runs the
//! same operation the HTTP route does.

use clap::{Parser, Subcommand};
use productd::service::{parse_create_body, parse_json_body};
use productd::{JsonFileStore, ProductError, ProductService, Reply, Result};

/// productd CLI
#[derive(Parser, Debug)]
#[command(name = "productd-cli")]
#[command(about = "Inspect and edit a productd data file")]
#[command(version)]
struct Args {
    /// JSON data file holding the product collection
    #[arg(short, long, default_value = "product.json")]
    file: String,

    /// Serialize concurrent mutations from this process
    #[arg(long)]
    serialize_mutations: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty data file if none exists
    Init,

    /// Print every product
    List,

    /// Print one product
    Get {
        /// Product id
        id: String,
    },

    /// Append a product (JSON object with id, name, description)
    Create {
        /// Product as JSON
        json: String,
    },

    /// Replace a product wholesale
    Replace {
        /// Product id
        id: String,

        /// Replacement product as JSON
        json: String,
    },

    /// Merge fields into a product
    Patch {
        /// Product id
        id: String,

        /// Fields to merge as JSON
        json: String,
    },

    /// Remove a product
    Delete {
        /// Product id
        id: String,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(match e {
            ProductError::NotFound(_) => 2,
            ProductError::Validation => 3,
            _ => 1,
        });
    }
}

fn run(args: Args) -> Result<()> {
    let store = JsonFileStore::new(&args.file);
    let service = ProductService::new(store, args.serialize_mutations);

    let reply = match args.command {
        Commands::Init => {
            let store = service.store();
            if store.init()? {
                println!("Created {}", store.path().display());
            } else {
                println!("{} already exists", store.path().display());
            }
            return Ok(());
        }
        Commands::List => Reply::Collection(service.list()?),
        Commands::Get { id } => Reply::Record(service.get(&id)?),
        Commands::Create { json } => service.create(parse_create_body(json.as_bytes())?)?,
        Commands::Replace { id, json } => service.replace(&id, parse_json_body(json.as_bytes())?)?,
        Commands::Patch { id, json } => service.patch(&id, parse_json_body(json.as_bytes())?)?,
        Commands::Delete { id } => service.delete(&id)?,
    };

    print_reply(&reply)
}

fn print_reply(reply: &Reply) -> Result<()> {
    let to_text = |e: serde_json::Error| ProductError::Io(e.into());

    match reply {
        Reply::Collection(collection) => {
            println!("{}", serde_json::to_string_pretty(collection).map_err(to_text)?)
        }
        Reply::Record(record) => {
            println!("{}", serde_json::to_string_pretty(record).map_err(to_text)?)
        }
        Reply::Created { location } => println!("Created {}", location),
        Reply::Updated => println!("Updated"),
        Reply::Deleted => println!("Deleted"),
    }
    Ok(())
}
