//! # Command Dispatch
//!
//! 1. **Argument Parsing**: clap turns shell arguments into [`Commands`]
//! 2. **Logging**: a `tracing-subscriber` writing to stderr
//! 3. **Context Setup**: [`initialize`] loads config, catalog and store
//! 4. **Dispatch**: one function per command, all going through the API
//! 5. **Output**: text from `render.rs`, or JSON for `show --json`

use super::render::{render_items, render_validity, render_view};
use super::setup::{Cli, Commands};
use anyhow::{bail, Context, Result};
use clap::Parser;
use curatorapp::api::CuratorApi;
use curatorapp::attributes::ViewMode;
use curatorapp::error::CuratorError;
use curatorapp::init::{initialize, CuratorContext};
use curatorapp::model::ItemKind;
use curatorapp::store::fs::FileStore;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CURATOR_LOG";

type Api = CuratorApi<FileStore>;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let CuratorContext { mut api, .. } =
        initialize(cli.data.clone()).context("could not open the data directory")?;

    match cli.command {
        Commands::Items => cmd_items(&api),
        Commands::Show {
            item,
            mode,
            path,
            json,
        } => cmd_show(&api, &item, mode, path.as_deref(), json),
        Commands::Validate { item } => cmd_validate(&api, &item),
        Commands::Set { item, path, value } => cmd_set(&mut api, &item, &path, &value),
        Commands::New { kind, name } => cmd_new(&mut api, kind, &name),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_items(api: &Api) -> Result<()> {
    let items = api.list_items()?;
    print!("{}", render_items(&items));
    Ok(())
}

fn cmd_show(
    api: &Api,
    selector: &str,
    mode: Option<ViewMode>,
    path: Option<&str>,
    json: bool,
) -> Result<()> {
    let uid = api.resolve_item(selector)?;
    let mut session = api.open_session(&uid)?;
    if let Some(path) = path {
        session.open_path(path)?;
    }

    let mode = mode.unwrap_or(api.options().default_view_mode);
    // The first render registers lookups; answer them before the real one.
    session.view(mode)?;
    api.resolve_lookups(&session);
    let view = session.view(mode)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_view(session.item(), &view));
    }
    Ok(())
}

fn cmd_validate(api: &Api, selector: &str) -> Result<()> {
    let uid = api.resolve_item(selector)?;
    let item = api.get_item(&uid)?;
    let validity = api.validate_item(&uid)?;
    print!("{}", render_validity(&item, &validity));
    if !validity.is_valid() {
        bail!("{} is invalid", item.name);
    }
    Ok(())
}

fn cmd_set(api: &mut Api, selector: &str, path: &str, value: &str) -> Result<()> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some((leaf, parents)) = segments.split_last() else {
        bail!("the path is empty");
    };

    let uid = api.resolve_item(selector)?;
    let mut session = api.open_session(&uid)?;
    for segment in parents {
        session.open_segment(segment)?;
    }
    if value.is_empty() {
        session.set_leaf(leaf, None)?;
    } else {
        session.set_leaf_text(leaf, value)?;
    }

    match api.save_session(&mut session) {
        Ok(saved) => {
            println!("Saved {}", saved.name);
            Ok(())
        }
        Err(CuratorError::ValidationFailed(validity)) => {
            print!("{}", render_validity(session.item(), &validity));
            bail!("{} was not saved", session.item().name)
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_new(api: &mut Api, kind: ItemKind, name: &str) -> Result<()> {
    let item = api.create_item(kind, name)?;
    println!("Created {} {} ({})", item.kind, item.name, item.uid);
    Ok(())
}
