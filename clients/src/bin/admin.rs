//! `folio-admin`: Edits pages and reads forms and submissions from the
//! command line.
//!
//! **Usage:**
//! ```text
//! folio-admin [--content DIR | --api URL] <COMMAND>
//! ```
//!
//! With `--content` the directory is loaded, edited in memory and written
//! back after a successful edit. Against the API, set `FOLIO_TOKEN` to the
//! token printed by `folio-admin login`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use folio_clients::{env_config, init_tracing, SourceArgs, Store};
use folio_editor::fields::find;
use folio_editor::{
    describe, fields_for, AdminSession, BlockEdit, Direction, FieldValue, InputKind, Operation,
    PageEditor,
};
use folio_gateway::documents::{fetch_form, list_forms, list_pages, list_submissions};
use folio_model::{Block, BlockId, BlockType, Document, Lang, LocalizedText};

/// Edit Folio content.
#[derive(Parser)]
#[command(name = "folio-admin", about = "Edit Folio pages and read form submissions")]
struct Args {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List pages.
    Pages,
    /// Show a page and the fields of its blocks.
    Show {
        /// Page slug or id.
        page: String,
        /// Print the stored record as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add a block with default fields.
    AddBlock {
        /// Page slug or id.
        page: String,
        /// Block type, such as `hero` or `text`.
        block_type: BlockType,
        /// Position to insert at (default: the end).
        #[arg(long)]
        at: Option<usize>,
    },
    /// Remove a block.
    RemoveBlock {
        /// Page slug or id.
        page: String,
        /// Block id.
        block: String,
    },
    /// Move a block one place up or down.
    MoveBlock {
        /// Page slug or id.
        page: String,
        /// Block id.
        block: String,
        /// `up` or `down`.
        direction: Direction,
    },
    /// Set a text, localized, toggle or number field of a block.
    SetField {
        /// Page slug or id.
        page: String,
        /// Block id.
        block: String,
        /// Field name, such as `title`.
        field: String,
        /// New value.
        value: String,
        /// Language of a localized field.
        #[arg(long, default_value = "ru")]
        lang: Lang,
    },
    /// List forms.
    Forms,
    /// List form submissions, oldest first.
    Submissions {
        /// Only submissions of this form (slug or id).
        #[arg(long)]
        form: Option<String>,
    },
    /// Log in and print the session token.
    Login {
        /// Admin user name.
        #[arg(long)]
        username: String,
        /// Admin password.
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let store = args.source.open(&env_config())?;
    let mut session = AdminSession::new();

    if run(&store, &mut session, args.command)? {
        store.persist()?;
    }
    Ok(())
}

/// Runs one command. Returns true when content was changed.
fn run(store: &Store, session: &mut AdminSession, command: Command) -> Result<bool> {
    let gateway = store.gateway();
    let auth = store.authenticator();
    match command {
        Command::Pages => {
            let pages = session.guard(auth, Operation::Load, list_pages(gateway))?;
            for page in pages {
                println!(
                    "{:<24} {:<32} {} block(s)",
                    page.slug,
                    page.title.resolve(Lang::Ru),
                    page.blocks.len()
                );
            }
            Ok(false)
        }
        Command::Show { page, json } => {
            let editor = open_page(store, session, &page)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&editor.page().to_record())?);
            } else {
                print_page(&editor);
            }
            Ok(false)
        }
        Command::AddBlock {
            page,
            block_type,
            at,
        } => edit_page(store, session, &page, |editor| {
            let id = match at {
                Some(index) => editor.insert_block(index, block_type),
                None => editor.add_block(block_type),
            };
            Ok(format!("Added {block_type} block {id}"))
        }),
        Command::RemoveBlock { page, block } => edit_page(store, session, &page, |editor| {
            let id = BlockId::new(block);
            editor
                .remove_block(&id)
                .with_context(|| format!("No block `{id}` on this page"))?;
            Ok(format!("Removed block {id}"))
        }),
        Command::MoveBlock {
            page,
            block,
            direction,
        } => edit_page(store, session, &page, |editor| {
            let id = BlockId::new(block);
            if editor.page().block(&id).is_none() {
                bail!("No block `{id}` on this page");
            }
            if !editor.move_block(&id, direction) {
                bail!("Block {id} cannot move {direction}");
            }
            Ok(format!("Moved block {id} {direction}"))
        }),
        Command::SetField {
            page,
            block,
            field,
            value,
            lang,
        } => edit_page(store, session, &page, |editor| {
            let id = BlockId::new(block);
            let target = editor
                .page()
                .block(&id)
                .with_context(|| format!("No block `{id}` on this page"))?;
            let edit = field_edit(target, &field, &value, lang)?;
            editor.apply_edit(&id, &edit)?;
            Ok(format!("Set {field} of block {id}"))
        }),
        Command::Forms => {
            let forms = session.guard(auth, Operation::Load, list_forms(gateway))?;
            for form in forms {
                println!(
                    "{:<24} {:<32} {} field(s)",
                    form.slug,
                    form.title.resolve(Lang::Ru),
                    form.fields.len()
                );
            }
            Ok(false)
        }
        Command::Submissions { form } => {
            let form_id = match form {
                Some(key) => {
                    let found = session.guard(auth, Operation::Load, fetch_form(gateway, &key))?;
                    Some(found.and_then(|f| f.id).unwrap_or(key))
                }
                None => None,
            };
            let mut submissions = session.guard(
                auth,
                Operation::Load,
                list_submissions(gateway, form_id.as_deref()),
            )?;
            submissions.sort_by_key(|s| s.created_at);
            for submission in submissions {
                println!("{}  {}", submission.created_at.to_rfc3339(), submission.form_id);
                for (field, value) in &submission.payload {
                    println!("    {field}: {value}");
                }
            }
            Ok(false)
        }
        Command::Login { username, password } => {
            session.login(auth, &username, &password)?;
            if let Some(token) = session.token() {
                println!("{token}");
            }
            Ok(false)
        }
    }
}

fn open_page(store: &Store, session: &mut AdminSession, key: &str) -> Result<PageEditor> {
    let opened = PageEditor::open(store.gateway(), key);
    session
        .guard(store.authenticator(), Operation::Load, opened)?
        .with_context(|| format!("No page `{key}`"))
}

/// Opens a page, applies `edit`, saves, and prints the edit's message.
fn edit_page(
    store: &Store,
    session: &mut AdminSession,
    key: &str,
    edit: impl FnOnce(&mut PageEditor) -> Result<String>,
) -> Result<bool> {
    let mut editor = open_page(store, session, key)?;
    let message = edit(&mut editor)?;
    let saved = editor.save(store.gateway());
    session.guard(store.authenticator(), Operation::Save, saved)?;
    println!("{message}");
    Ok(true)
}

/// The edit that sets `field` of `block` from a command-line value.
fn field_edit(block: &Block, field: &str, value: &str, lang: Lang) -> Result<BlockEdit> {
    let block_type = block
        .block_type()
        .with_context(|| format!("Blocks of type `{}` cannot be edited", block.type_name()))?;
    let spec = find(fields_for(block_type), field)
        .with_context(|| format!("`{field}` is not a field of {block_type} blocks"))?;
    let name = field.to_string();
    let edit = match spec.input {
        input if input.is_plain_text() => BlockEdit::SetText {
            field: name,
            value: value.to_string(),
        },
        input if input.is_localized() => BlockEdit::SetLocalized {
            field: name,
            lang,
            value: value.to_string(),
        },
        InputKind::Toggle => BlockEdit::SetFlag {
            field: name,
            value: value
                .parse()
                .with_context(|| format!("`{value}` is not true or false"))?,
        },
        InputKind::Number => BlockEdit::SetNumber {
            field: name,
            value: value
                .parse()
                .with_context(|| format!("`{value}` is not a whole number"))?,
        },
        other => bail!(
            "`{field}` is a {} field and cannot be set from the command line",
            other.name()
        ),
    };
    Ok(edit)
}

fn print_page(editor: &PageEditor) {
    let page = editor.page();
    println!("{} (/{})", page.title.resolve(Lang::Ru), page.slug);
    if let Some(id) = &page.id {
        println!("id: {id}");
    }
    for (index, block) in page.blocks.iter().enumerate() {
        println!();
        println!("{index}. {} [{}]", block.id(), block.type_name());
        let Ok(fields) = describe(block) else {
            println!("    (read-only)");
            continue;
        };
        for (spec, value) in fields {
            if let Some(summary) = summarize(&value) {
                println!("    {}: {summary}", spec.name);
            }
        }
    }
}

/// One-line rendering of a field value; `None` for empty values.
fn summarize(value: &FieldValue) -> Option<String> {
    let summary = match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Localized(text) => localized(text),
        FieldValue::Flag(flag) => return Some(flag.to_string()),
        FieldValue::Number(number) => return Some(number.to_string()),
        FieldValue::List(items) => items.join(", "),
        FieldValue::Items(items) if items.is_empty() => String::new(),
        FieldValue::Items(items) => format!("{} item(s)", items.len()),
        FieldValue::Tuning(keys) => keys
            .as_map()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" "),
    };
    (!summary.trim().is_empty()).then_some(summary)
}

fn localized(text: &LocalizedText) -> String {
    if text.is_empty() {
        return String::new();
    }
    Lang::ALL
        .iter()
        .map(|&lang| format!("{}: {}", lang.as_str(), text.get(lang)))
        .collect::<Vec<_>>()
        .join(" | ")
}
