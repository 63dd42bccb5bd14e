use anyhow::Context;
use bookshelf_app::client::{BooksClient, CategoriesClient, Shelf};
use bookshelf_app::{BookFields, CategoryFields, ResourceId};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

/// Manage the book catalog through the bookshelf gateway.
#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about)]
struct Cli {
    /// Gateway root URL; defaults to `client.gateway_url` from settings
    #[arg(long, global = true)]
    gateway: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List, show, add, edit and remove books
    #[command(subcommand)]
    Books(BookCommand),
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Debug, Subcommand)]
enum BookCommand {
    List,
    Show { id: ResourceId },
    Add(BookArgs),
    Edit {
        id: ResourceId,
        #[command(flatten)]
        fields: BookArgs,
    },
    Remove { id: ResourceId },
}

#[derive(Debug, Args)]
struct BookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long)]
    category: Option<String>,
}

impl From<BookArgs> for BookFields {
    fn from(args: BookArgs) -> Self {
        let fields = BookFields::new(args.title, args.author);
        match args.category {
            Some(category) => fields.with_category(category),
            None => fields,
        }
    }
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    List,
    Add { name: String },
    Rename { id: ResourceId, name: String },
    Remove { id: ResourceId },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_books(gateway: &str, command: BookCommand) -> anyhow::Result<()> {
    let client = BooksClient::new(gateway).context("failed to build HTTP client")?;

    match command {
        BookCommand::List => print_json(&client.list().await?),
        BookCommand::Show { id } => print_json(&client.get(id).await?),
        BookCommand::Add(args) => print_json(&client.create(&args.into()).await?),
        BookCommand::Edit { id, fields } => print_json(&client.update(id, &fields.into()).await?),
        BookCommand::Remove { id } => {
            let mut shelf = Shelf::new(client);
            shelf.remove(id).await?;
            print_json(&shelf.items())
        }
    }
}

async fn run_categories(gateway: &str, command: CategoryCommand) -> anyhow::Result<()> {
    let client = CategoriesClient::new(gateway).context("failed to build HTTP client")?;

    match command {
        CategoryCommand::List => print_json(&client.list().await?),
        CategoryCommand::Add { name } => {
            print_json(&client.create(&CategoryFields::new(name)).await?)
        }
        CategoryCommand::Rename { id, name } => {
            print_json(&client.update(id, &CategoryFields::new(name)).await?)
        }
        CategoryCommand::Remove { id } => {
            let mut shelf = Shelf::new(client);
            shelf.remove(id).await?;
            print_json(&shelf.items())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = bookshelf_kernel::settings::Settings::load()
        .with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry).ok();

    let gateway = cli
        .gateway
        .unwrap_or_else(|| settings.client.gateway_url.clone());
    tracing::debug!(%gateway, "bookshelf-cli starting");

    match cli.command {
        Command::Books(command) => run_books(&gateway, command).await,
        Command::Categories(command) => run_categories(&gateway, command).await,
    }
}
