mod script;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use folio_core::{
    CardTarget, CatalogController, Document, ElementId, GalleryModal, GridGesture, GridState,
    KeyPress, Mount, PageTarget, Paint, ProjectCatalog, VirtualScheduler, paint_catalog,
    paint_gallery,
};
use folio_store::EngineConfig;

#[derive(Parser)]
#[command(name = "folio", about = "Project catalog and gallery engine CLI")]
struct Cli {
    /// Catalog data file (JSON). Falls back to $FOLIO_DATA
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Engine config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List filter categories with their project counts
    Filters,

    /// Print one catalog page
    Page {
        /// Category key to filter by
        #[arg(long, default_value = "all")]
        filter: String,

        /// Page moves applied in order: a number, `prev` or `next`
        #[arg(long = "page")]
        pages: Vec<PageTarget>,
    },

    /// Show the gallery view of one project
    Show {
        /// Project id
        id: String,
    },

    /// Paint catalog markup into the mount points and print it
    Render {
        #[arg(long, default_value = "all")]
        filter: String,

        #[arg(long = "page")]
        pages: Vec<PageTarget>,

        /// Activate this project's card and paint the gallery modal
        #[arg(long)]
        open: Option<String>,

        /// Activate the card with a key (`enter`, `space`) instead of a click
        #[arg(long, requires = "open")]
        key: Option<KeyPress>,

        /// Focus sat in the filter bar before the repaint
        #[arg(long)]
        focus_filters: bool,
    },

    /// Replay a scripted gallery session against virtual time
    Play {
        /// Project id
        id: String,

        /// Steps: next prev goto:N wait:MS press release leave hide show key:NAME close open
        #[arg(required = true)]
        script: Vec<String>,
    },
}

fn data_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.data {
        return Ok(path.clone());
    }
    match std::env::var("FOLIO_DATA") {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => bail!("no data file: pass --data or set FOLIO_DATA"),
    }
}

fn load(cli: &Cli) -> Result<(Rc<ProjectCatalog>, EngineConfig)> {
    let config = EngineConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let path = data_path(cli)?;
    let mut catalog = folio_store::load_catalog(&path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    config.apply(&mut catalog);
    Ok((Rc::new(catalog), config))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Filters => cmd_filters(&cli),
        Commands::Page { filter, pages } => cmd_page(&cli, filter, pages),
        Commands::Show { id } => cmd_show(&cli, id),
        Commands::Render {
            filter,
            pages,
            open,
            key,
            focus_filters,
        } => {
            let activation = open.as_deref().map(|id| {
                let gesture = key.map_or(GridGesture::Click, |k| GridGesture::Key(k.key));
                (id, gesture)
            });
            cmd_render(&cli, filter, pages, activation, *focus_filters)
        }
        Commands::Play { id, script } => cmd_play(&cli, id, script),
    }
}

fn controller(
    catalog: Rc<ProjectCatalog>,
    config: &EngineConfig,
    filter: &str,
    pages: &[PageTarget],
) -> CatalogController {
    let mut controller = CatalogController::with_page_size(catalog, config.page_size);
    if !controller.catalog().is_known_filter(filter) {
        tracing::warn!(filter, "unknown filter key");
    }
    controller.set_filter(filter);
    for target in pages {
        controller.set_page(*target);
    }
    controller
}

fn cmd_filters(cli: &Cli) -> Result<()> {
    let (catalog, config) = load(cli)?;
    let mut controller = CatalogController::with_page_size(catalog.clone(), config.page_size);
    for category in catalog.filters() {
        controller.set_filter(&category.key);
        println!(
            "{:<12} {:<16} {}",
            category.key,
            category.label,
            controller.filtered_count()
        );
    }
    Ok(())
}

fn cmd_page(cli: &Cli, filter: &str, pages: &[PageTarget]) -> Result<()> {
    let (catalog, config) = load(cli)?;
    let mut controller = controller(catalog, &config, filter, pages);
    let pagination = controller.pagination();

    println!("filter:  {}", controller.active_filter());
    println!("page:    {}/{}", pagination.current_page, pagination.page_count);
    println!("matches: {}", controller.filtered_count());

    let records = controller.page_records();
    if records.is_empty() {
        println!("no projects in this category");
    }
    for record in records {
        let badges: Vec<&str> = record.badges().iter().map(|b| b.key()).collect();
        if badges.is_empty() {
            println!("  {:<24} {}", record.id, record.display_title());
        } else {
            println!(
                "  {:<24} {} [{}]",
                record.id,
                record.display_title(),
                badges.join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_show(cli: &Cli, id: &str) -> Result<()> {
    let (catalog, config) = load(cli)?;
    let mut modal = GalleryModal::new(catalog, VirtualScheduler::new(), config.gallery_config());
    if !modal.open_by_id(id, None) {
        bail!("no project with id {id:?}");
    }
    let view = modal.view().context("gallery did not open")?;

    println!("title:    {}", view.title);
    for paragraph in &view.paragraphs {
        println!("          {paragraph}");
    }
    if !view.tags.is_empty() {
        println!("tags:     {}", view.tags.join(", "));
    }
    println!("live:     {}", view.live.as_deref().unwrap_or("-"));
    println!("repo:     {}", view.repo.as_deref().unwrap_or("-"));
    println!("autoplay: {}", if view.autoplay_active { "on" } else { "off" });
    println!("images:   {}", view.total);
    for thumb in &view.thumbs {
        println!("  {:>3}  {}", thumb.index + 1, thumb.src);
    }
    modal.close();
    Ok(())
}

fn print_mount(doc: &Document, mount: Mount) {
    let Some(slot) = doc.slot(mount) else {
        return;
    };
    if slot.hidden {
        println!("<!-- {} (hidden) -->", mount.name());
    } else {
        println!("<!-- {} -->", mount.name());
    }
    if !slot.html.is_empty() {
        println!("{}", slot.html);
    }
}

fn cmd_render(
    cli: &Cli,
    filter: &str,
    pages: &[PageTarget],
    activation: Option<(&str, GridGesture)>,
    focus_filters: bool,
) -> Result<()> {
    let (catalog, config) = load(cli)?;
    let mut controller = controller(catalog.clone(), &config, filter, pages);
    let mut doc = Document::new();

    let opened = match activation {
        Some((id, gesture)) => match controller.activate_card(CardTarget::Card(id), gesture) {
            Some(record) => Some(record.id.clone()),
            None => bail!("card {id:?} cannot be activated on this page"),
        },
        None => None,
    };

    let render = controller.render_focused(focus_filters);
    if matches!(render.grid, GridState::Empty) {
        tracing::info!(filter, "empty state");
    }
    if paint_catalog(&mut doc, &render, &catalog.defaults) == Paint::Abandoned {
        bail!("catalog paint abandoned");
    }

    if let Some(id) = opened {
        let mut modal =
            GalleryModal::new(catalog.clone(), VirtualScheduler::new(), config.gallery_config());
        let opener = ElementId::new(format!("card-{id}"));
        if !modal.open_by_id(&id, Some(opener)) {
            bail!("no project with id {id:?}");
        }
        paint_gallery(&mut doc, modal.view().as_ref());
    } else {
        paint_gallery(&mut doc, None);
    }

    for mount in Mount::ALL {
        print_mount(&doc, mount);
    }
    if let Some(key) = doc.focused_filter() {
        println!("<!-- focus filter={key} -->");
    }
    Ok(())
}

fn cmd_play(cli: &Cli, id: &str, script: &[String]) -> Result<()> {
    let steps = script::parse_script(script)?;
    let (catalog, config) = load(cli)?;
    if catalog.find(id).is_none() {
        bail!("no project with id {id:?}");
    }
    let mut modal = GalleryModal::new(catalog, VirtualScheduler::new(), config.gallery_config());
    for line in script::replay(&mut modal, id, &steps) {
        println!("{line}");
    }
    Ok(())
}
