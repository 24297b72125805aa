use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
    sync::Arc,
};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use cli_table::{print_stdout, Table, WithTitle};
use fluent_bundle::{FluentArgs, FluentValue};
use indexmap::IndexMap;
use log::{debug, warn};
use tsundoku_types::{NyaaIndividualResult, Show, WebhookBase};
use tsundoku_ux::{
    Dialog, Form, HttpClient, Injector, L10nConfig, ShowToggle, ToggleProps, Translations,
    WebhookEvent, WebhookModals,
};

use crate::{
    config::{Config, Settings},
    view::TerminalView,
};

mod config;
mod view;

/// Terminal front end for a tsundoku server
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// If set, overrides env var (TSUNDOKU_API) and config file lookup for the tsundoku server (default is http://localhost:6439/)
    #[clap(short, long)]
    api: Option<String>,
    /// If set, overrides env var (TSUNDOKU_TOKEN) and config file lookup for the API key
    #[clap(short, long)]
    token: Option<String>,
    /// If set, overrides env var (TSUNDOKU_LOCALE) and config file lookup for the display locale (default is en)
    #[clap(short, long)]
    locale: Option<String>,
    /// Directory of <locale>/<resource>.ftl files, bundled translations are used if unset (TSUNDOKU_LOCALES)
    #[clap(long)]
    locales: Option<String>,
    /// Increases log level
    #[clap(short, long)]
    verbose: bool,

    #[clap(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    Webhook {
        #[clap(subcommand)]
        mode: WebhookMode,
    },
    Show {
        #[clap(subcommand)]
        mode: ShowMode,
    },
    Nyaa {
        #[clap(subcommand)]
        mode: NyaaMode,
    },
}

#[derive(Subcommand, Debug)]
enum WebhookMode {
    List,
    /// Creates a webhook, fields are edited in $EDITOR
    Add,
    Edit {
        /// Base ID of webhook to edit
        base_id: u64,
    },
    Delete {
        /// Base ID of webhook to delete
        base_id: u64,
        /// Skips the confirmation prompt
        #[clap(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ShowMode {
    List,
    /// Flips a boolean attribute of a show
    Toggle {
        /// ID of show to update
        id: u64,
        /// Boolean attribute to flip
        #[clap(possible_values = ["watch", "post_process"])]
        attribute: String,
    },
}

#[derive(Subcommand, Debug)]
enum NyaaMode {
    Search {
        #[clap(required = true)]
        query: Vec<String>,
    },
}

const RESOURCES: &[&str] = &["base", "webhooks"];

#[tokio::main]
async fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_env(
            env_logger::Env::default().default_filter_or(if args.verbose {
                "debug"
            } else {
                "info"
            }),
        )
        .init();

    if let Err(e) = run(args).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let flags = Config {
        api: args.api,
        token: args.token,
        locale: args.locale,
        locales: args.locales,
    };
    let settings = Settings::resolve(flags, Config::load()?)?;
    debug!("using tsundoku server at {}", settings.api);

    let translations = match &settings.locales {
        Some(dir) => Translations::load_dir(dir)?,
        None => bundled_translations(),
    };
    let injector = Injector::new(&L10nConfig::new(settings.locale, translations), RESOURCES);
    let client = HttpClient::new(settings.api, settings.token);
    execute_mode(&args.mode, &client, &injector).await
}

fn bundled_translations() -> Translations {
    let mut translations = Translations::new();
    translations.insert("en", "base", include_str!("../../locales/en/base.ftl"));
    translations.insert("en", "webhooks", include_str!("../../locales/en/webhooks.ftl"));
    translations.insert("es", "base", include_str!("../../locales/es/base.ftl"));
    translations.insert("es", "webhooks", include_str!("../../locales/es/webhooks.ftl"));
    translations
}

#[derive(Table)]
struct WebhookTable {
    #[table(title = "Base ID")]
    base_id: u64,
    #[table(title = "Name")]
    name: String,
    #[table(title = "Service")]
    service: String,
    #[table(title = "URL")]
    url: String,
    #[table(title = "Valid")]
    valid: bool,
}

impl From<WebhookBase> for WebhookTable {
    fn from(value: WebhookBase) -> Self {
        Self {
            base_id: value.base_id,
            name: value.name,
            service: value.service,
            url: value.url,
            valid: value.valid,
        }
    }
}

#[derive(Table)]
struct ShowTable {
    #[table(title = "Id")]
    id: u64,
    #[table(title = "Title")]
    title: String,
    #[table(title = "Season")]
    season: u32,
    #[table(title = "Episode Offset")]
    episode_offset: i32,
    #[table(title = "Latest Episode")]
    latest_episode: String,
    #[table(title = "Status")]
    status: String,
    #[table(title = "Webhooks")]
    webhooks: usize,
}

impl From<Show> for ShowTable {
    fn from(value: Show) -> Self {
        Self {
            id: value.id_,
            latest_episode: value
                .latest_episode()
                .map(|x| x.to_string())
                .unwrap_or_default(),
            title: value.title,
            season: value.season,
            episode_offset: value.episode_offset,
            status: value.metadata.status.unwrap_or_default(),
            webhooks: value.webhooks.len(),
        }
    }
}

#[derive(Table)]
struct NyaaTable {
    #[table(title = "Title")]
    title: String,
    #[table(title = "Size")]
    size: String,
    #[table(title = "Published")]
    published: String,
    #[table(title = "Seeders")]
    seeders: u64,
    #[table(title = "Leechers")]
    leechers: u64,
    #[table(title = "Torrent")]
    torrent_link: String,
}

impl From<NyaaIndividualResult> for NyaaTable {
    fn from(value: NyaaIndividualResult) -> Self {
        Self {
            title: value.title,
            size: value.size,
            published: value.published,
            seeders: value.seeders,
            leechers: value.leechers,
            torrent_link: value.torrent_link,
        }
    }
}

type Events = Rc<RefCell<Vec<WebhookEvent>>>;

fn dialogs<'a>(
    client: &HttpClient,
    injector: &'a Injector,
) -> (Events, WebhookModals<TerminalView<'a>, HttpClient>) {
    let events = Events::default();
    let sink = events.clone();
    let modals = WebhookModals::new(TerminalView::new(injector), client.clone(), move |event| {
        sink.borrow_mut().push(event)
    })
    .with_failure_message(injector.get("request-failed"));
    (events, modals)
}

/// Closes the dialogs and reports what the server accepted.
fn finish(
    modals: &mut WebhookModals<TerminalView<'_>, HttpClient>,
    events: &Events,
    injector: &Injector,
) -> Result<()> {
    modals.close_all();
    if let Some(alert) = modals.view_mut().take_alert() {
        bail!("{alert}");
    }
    for event in events.borrow().iter() {
        let message = match event {
            WebhookEvent::Created => injector.get("webhook-created"),
            WebhookEvent::Updated(id) => injector.format("webhook-updated", Some(&id_args(*id))),
            WebhookEvent::Deleted(id) => injector.format("webhook-deleted", Some(&id_args(*id))),
        };
        println!("{message}");
    }
    Ok(())
}

fn id_args(id: u64) -> FluentArgs<'static> {
    let mut args = FluentArgs::new();
    args.set("id", FluentValue::from(id));
    args
}

/// Round-trips the form's fields through $EDITOR as YAML.
fn edit_fields(form: &mut Form) -> Result<()> {
    let current = serde_yaml::to_string(form.fields())?;
    let output = scrawl::with(&current).map_err(|e| anyhow!("{e}"))?;
    let output = output.to_string().map_err(|e| anyhow!("{e}"))?;
    let edited: IndexMap<String, String> = serde_yaml::from_str(&output)?;
    for (name, value) in edited {
        if !form.set(&name, value) {
            warn!("ignoring unknown field '{name}'");
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn execute_mode(mode: &Mode, client: &HttpClient, injector: &Injector) -> Result<()> {
    match mode {
        Mode::Webhook { mode } => match mode {
            WebhookMode::List => {
                let list = client.list_webhooks().await?;
                let list: Vec<WebhookTable> = list.into_iter().map(Into::into).collect();
                print_stdout(list.with_title())?;
            }
            WebhookMode::Add => {
                let (events, mut modals) = dialogs(client, injector);
                modals.open_add();
                let form = modals
                    .form_mut(Dialog::Add)
                    .ok_or_else(|| anyhow!("add dialog has no form"))?;
                edit_fields(form)?;
                modals.submit(Dialog::Add).await;
                finish(&mut modals, &events, injector)?;
            }
            WebhookMode::Edit { base_id } => {
                let current = client.get_webhook(*base_id).await?;
                let (events, mut modals) = dialogs(client, injector);
                modals.open_edit(&current);
                let form = modals
                    .form_mut(Dialog::Edit)
                    .ok_or_else(|| anyhow!("edit dialog has no form"))?;
                edit_fields(form)?;
                modals.submit(Dialog::Edit).await;
                finish(&mut modals, &events, injector)?;
            }
            WebhookMode::Delete { base_id, yes } => {
                let current = client.get_webhook(*base_id).await?;
                let (events, mut modals) = dialogs(client, injector);
                modals.open_delete(&current);
                let mut args = FluentArgs::new();
                args.set(
                    "name",
                    FluentValue::from(modals.view().delete_label().unwrap_or_default().to_string()),
                );
                if *yes || confirm(&injector.format("delete-confirm", Some(&args)))? {
                    modals.confirm_delete().await;
                } else {
                    println!("{}", injector.get("cancelled"));
                }
                finish(&mut modals, &events, injector)?;
            }
        },
        Mode::Show { mode } => match mode {
            ShowMode::List => {
                let list = client.list_shows().await?;
                let list: Vec<ShowTable> = list.into_iter().map(Into::into).collect();
                print_stdout(list.with_title())?;
            }
            ShowMode::Toggle { id, attribute } => {
                let show = Arc::new(client.get_show(*id).await?);
                let toggled: Rc<RefCell<Option<bool>>> = Default::default();
                let sink = toggled.clone();
                let props = ToggleProps {
                    attribute: attribute.clone(),
                    on_icon: "checkmark-circle".to_string(),
                    off_icon: "ellipse-outline".to_string(),
                    on_tooltip: injector.get(&format!("{attribute}-on")),
                    off_tooltip: injector.get(&format!("{attribute}-off")),
                    additional_classes: String::new(),
                    disabled: false,
                };
                let mut toggle =
                    ShowToggle::new(props, Some(show.clone()), move |_, value| {
                        *sink.borrow_mut() = Some(value)
                    });
                toggle.click();
                let value = *toggled.borrow();
                let Some(value) = value else {
                    bail!("{attribute} was not toggled");
                };
                let mut body = serde_json::Map::new();
                body.insert(attribute.clone(), value.into());
                client.update_show(*id, &body).await?;
                println!("{}: {}", show.title, toggle.render().title);
            }
        },
        Mode::Nyaa { mode } => match mode {
            NyaaMode::Search { query } => {
                let list = client.search_nyaa(&query.join(" ")).await?;
                let list: Vec<NyaaTable> = list.into_iter().map(Into::into).collect();
                print_stdout(list.with_title())?;
            }
        },
    }
    Ok(())
}
