use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scan_service_tables::loader;
use scan_service_tables::server::{self, AppState, TableView};
use scan_service_tables::{ServiceName, ServiceNameTable, ServiceRecordTable, SortOrder, TabularModel};

/// scan-service-tables: render, sort and serve scanned service records as tables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scan-service-tables",
    version,
    about = "Render, sort and serve scanned service records as tables.",
    long_about = None
)]
struct Cli {
    /// JSON file with an array of service records.
    #[arg(long)]
    services: PathBuf,

    /// JSON file with an array of {"name": ...} records. Derived from the services if omitted.
    #[arg(long)]
    names: Option<PathBuf>,

    /// Column to sort the services table by before printing. The names table is
    /// sorted by name with the same --order.
    #[arg(long = "sort-column")]
    sort_column: Option<usize>,

    /// Header sort indicator passed along with --sort-column.
    #[arg(long, value_enum, default_value_t = Order::Descending)]
    order: Order,

    /// Write the rendered services table as pretty JSON to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Serve both tables over HTTP instead of exiting after printing.
    #[arg(long = "serve-ui", default_value_t = false)]
    serve_ui: bool,

    /// Bind address for --serve-ui.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    Ascending,
    Descending,
}

impl From<Order> for SortOrder {
    fn from(o: Order) -> Self {
        match o {
            Order::Ascending => SortOrder::Ascending,
            Order::Descending => SortOrder::Descending,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scan_service_tables=info")),
        )
        .init();

    let cli = Cli::parse();

    let records = loader::load_services_from_path(&cli.services)?;
    let names = match cli.names.as_deref() {
        Some(path) => loader::load_service_names_from_path(path)?,
        None => ServiceName::distinct_from(&records),
    };

    let mut services = ServiceRecordTable::with_default_headers(records);
    let mut name_table = ServiceNameTable::with_default_headers(names);

    if let Some(column) = cli.sort_column {
        services.sort_by(column, cli.order.into());
        name_table.sort_by(0, cli.order.into());
    }

    print_table(&services);
    println!();
    print_table(&name_table);

    if let Some(path) = cli.output.as_deref() {
        match write_view_json(path, &server::render(&services)) {
            Ok(()) => info!(path = %path.display(), "wrote JSON table"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write JSON"),
        }
    }

    if cli.serve_ui {
        let state = AppState::new(services, name_table);
        println!("Serving tables at http://{}/api (Ctrl+C to stop)", cli.bind);
        tokio::select! {
            res = server::spawn_server(&cli.bind, state) => res?,
            _ = tokio::signal::ctrl_c() => info!("shutting down"),
        }
    }

    Ok(())
}

fn print_table<M: TabularModel>(model: &M) {
    let headers = model.headers();
    let rows = model.rows();
    if headers.is_empty() {
        println!("(no rows)");
        return;
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, h)| {
            rows.iter()
                .map(|r| r[col].chars().count().min(40))
                .max()
                .unwrap_or(0)
                .max(h.chars().count())
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| {
                let mut c = c.clone();
                if c.chars().count() > *w {
                    c = c.chars().take(*w).collect();
                }
                format!("{:<w$}", c, w = *w)
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(&headers));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", rule.join("  "));
    for row in &rows {
        println!("{}", line(row));
    }
}

fn write_view_json(path: &std::path::Path, view: &TableView) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, view)?;
    Ok(())
}
