use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;

use crate::{
  app::App,
  catalog::WooCommerceCatalog,
  cli::Cli,
  config::Config,
  error::Error,
  field::{FieldStore, FileFieldStore, MemoryFieldStore},
  picker::ProductPicker,
  utils::{initialize_logging, initialize_panic_handler},
};

pub mod action;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod field;
pub mod mode;
pub mod picker;
pub mod tui;
pub mod utils;

fn build_app(cli: &Cli) -> Result<(App, Arc<dyn FieldStore>)> {
  let mut config = Config::new()?;
  cli.apply_to(&mut config);

  let catalog = WooCommerceCatalog::new(&config.catalog)?;
  let field: Arc<dyn FieldStore> = if cli.ephemeral {
    Arc::new(MemoryFieldStore::new(None))
  } else {
    Arc::new(FileFieldStore::open(config.field_path())?)
  };
  let picker = ProductPicker::new(Arc::new(catalog), field.clone());
  Ok((App::new(config, picker, cli.tick_rate, cli.frame_rate), field))
}

async fn tokio_main() -> Result<()> {
  initialize_logging()?;
  initialize_panic_handler()?;

  let cli = Cli::parse();

  match build_app(&cli) {
    Ok((mut app, field)) => {
      app.run().await?;
      if cli.print_selection {
        println!("{}", field.get_value().unwrap_or_default());
      }
    },
    Err(e) => {
      if let Some(Error::Config(message)) = e.downcast_ref::<Error>() {
        eprintln!("Error: {}", message);
        eprintln!("Set the catalog credentials with --api-url/--api-key/--api-secret or WOO_API_URL/WOO_API_KEY/WOO_API_SECRET.");
        std::process::exit(1);
      }
      return Err(e);
    },
  }

  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  if let Err(e) = tokio_main().await {
    eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
    Err(e)
  } else {
    Ok(())
  }
}
