//! Command implementations for the CLI interface.
//!
//! Every handler resolves the session's account, talks to the store and
//! prints its result. Task creation is driven through `TaskDraft` exactly as
//! an interactive form would drive it, one edit at a time.

use std::collections::BTreeMap;

use chrono::Local;
use clap::{Args, Subcommand};
use clap_complete::{generate, Shell};

use crate::db::*;
use crate::draft::{TaskDraft, TaskField};
use crate::error::{DraftError, SubmitError};
use crate::fields::*;
use crate::paths::tasks_path;
use crate::session::{Account, Session};
use crate::store::{list_tasks, list_themes, load_themes_with_tasks, DocumentStore};
use crate::submit::prepare_for_submission;
use crate::task::{Task, INBOX_THEME};
use crate::theme_form::ThemeForm;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add(AddArgs),

    /// List tasks in the inbox or in one theme.
    List {
        /// Theme ID. Defaults to the inbox.
        #[arg(long)]
        theme: Option<String>,
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
    },

    /// List themes.
    Themes {
        /// Also list each theme's tasks.
        #[arg(long)]
        with_tasks: bool,
    },

    /// Create a new theme.
    ThemeAdd {
        /// Display name of the theme.
        name: String,
    },

    /// List all distinct tags with their usage counts.
    Tags,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Short title for the task.
    pub title: String,
    /// Longer free-text content.
    #[arg(long, default_value = "")]
    pub content: String,
    /// Priority: low | normal | high | critical.
    #[arg(long, value_enum, default_value_t = Priority::Normal)]
    pub priority: Priority,
    /// State: undone | done.
    #[arg(long, value_enum, default_value_t = TaskState::Undone)]
    pub state: TaskState,
    /// Theme ID. Defaults to the inbox.
    #[arg(long, default_value = INBOX_THEME)]
    pub theme: String,
    /// Comma-separated tags. May be repeated.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Repeat type: day | week | month | year | custom.
    #[arg(long, value_enum)]
    pub repeat: Option<RepeatType>,
    /// Repeat every N units (interval repeats only).
    #[arg(long, requires = "repeat")]
    pub interval: Option<u32>,
    /// First day of a custom repeat (YYYY-MM-DD).
    #[arg(long, requires = "repeat")]
    pub from: Option<String>,
    /// Last day of a custom repeat (YYYY-MM-DD).
    #[arg(long, requires = "repeat")]
    pub to: Option<String>,
    /// Due: "now", "today", "tomorrow", "in Nh|Nd|Nw", YYYY-MM-DD or YYYY-MM-DDTHH:MM.
    #[arg(long)]
    pub due: Option<String>,
    /// Print where the task would be stored instead of storing it.
    #[arg(long)]
    pub dry_run: bool,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn require_account(session: &Session) -> &Account {
    session.account().unwrap_or_else(|| fail(SubmitError::MissingAccount))
}

fn check_draft<T>(result: Result<T, DraftError>) -> T {
    result.unwrap_or_else(|e| fail(e))
}

fn parse_date_arg(flag: &str, value: &str) -> chrono::NaiveDate {
    parse_date_input(value)
        .unwrap_or_else(|| fail(format!("Invalid --{flag} date '{value}'. Use YYYY-MM-DD.")))
}

/// Apply the command-line options to a fresh draft, in form order.
pub fn build_draft(args: &AddArgs) -> TaskDraft {
    let mut draft = TaskDraft::new(args.theme.clone());
    draft.set_field(TaskField::Title(args.title.clone()));
    draft.set_field(TaskField::Content(args.content.clone()));
    draft.set_field(TaskField::Priority(args.priority));
    draft.set_field(TaskField::State(args.state));
    draft.set_field(TaskField::Tags(split_and_normalise_tags(&args.tags)));

    if let Some(kind) = args.repeat {
        draft.set_repeat(true);
        check_draft(draft.set_repeat_type(kind));
        if let Some(n) = args.interval {
            check_draft(draft.set_repeat_interval(n));
        }
        if args.from.is_some() || args.to.is_some() {
            let (cur_from, cur_to) = draft
                .task()
                .repeat_data
                .and_then(|r| r.range())
                .unwrap_or_else(|| fail(DraftError::RangeOnIntervalRepeat));
            let from = args.from.as_deref().map_or(cur_from, |v| parse_date_arg("from", v));
            let to = args.to.as_deref().map_or(cur_to, |v| parse_date_arg("to", v));
            check_draft(draft.set_repeat_range(from, to));
        }
    }

    if let Some(due) = args.due.as_deref() {
        let at = parse_due_input(due, Local::now())
            .unwrap_or_else(|| fail(format!("Invalid --due value '{due}'")));
        draft.toggle_due_at();
        draft.set_due_at_value(at);
    }

    draft
}

/// Add a new task to the store.
pub async fn cmd_add(store: &dyn DocumentStore, session: &Session, args: AddArgs) {
    let mut draft = build_draft(&args);

    if args.dry_run {
        let submission = prepare_for_submission(draft.task(), session).unwrap_or_else(|e| fail(e));
        println!("Path: {}", submission.path);
        match serde_json::to_string_pretty(&submission.payload) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(format!("Failed to encode task: {e}")),
        }
        return;
    }

    if let Some(account) = session.account() {
        if !draft.task().is_inbox() {
            let themes = list_themes(store, account).await.unwrap_or_else(|e| fail(e));
            if !themes.iter().any(|t| t.id == draft.task().theme) {
                fail(format!("Theme '{}' not found", draft.task().theme));
            }
        }
    }

    let title = draft.task().title.clone();
    match draft.submit(store, session).await {
        Ok(id) => println!("Added task {id}: {title}"),
        Err(e) => fail(e),
    }
}

/// List tasks in one collection, ordered by due date.
pub async fn cmd_list(store: &dyn DocumentStore, session: &Session, theme: Option<String>, all: bool) {
    let account = require_account(session);
    let theme = theme.unwrap_or_else(|| INBOX_THEME.to_string());
    let mut tasks = list_tasks(store, &tasks_path(account, &theme))
        .await
        .unwrap_or_else(|e| fail(e));

    if !all {
        tasks.retain(|t| t.state != TaskState::Done);
    }
    sort_tasks(&mut tasks);

    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    print_table(&tasks);
}

/// Tasks with a due date first (earliest first), then by creation time.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| match (a.due_at, b.due_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.created_at.cmp(&b.created_at),
    });
}

/// List the inbox and every theme the account owns.
pub async fn cmd_themes(store: &dyn DocumentStore, session: &Session, with_tasks: bool) {
    let account = require_account(session);
    let mut themes = load_themes_with_tasks(store, account)
        .await
        .unwrap_or_else(|e| fail(e));
    // Inbox stays first; real themes by name.
    themes[1..].sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    if with_tasks {
        for theme in &mut themes {
            println!("== {} ({})", theme.name, theme.id);
            if theme.tasks.is_empty() {
                println!("No tasks.");
            } else {
                sort_tasks(&mut theme.tasks);
                print_table(&theme.tasks);
            }
            println!();
        }
        return;
    }

    println!("{:<34} {:<6} {}", "ID", "Tasks", "Name");
    for theme in &themes {
        println!("{:<34} {:<6} {}", theme.id, theme.tasks.len(), theme.name);
    }
}

/// Create a theme through the theme form.
pub async fn cmd_theme_add(store: &dyn DocumentStore, session: &Session, name: String) {
    let mut form = ThemeForm::new();
    form.toggle_visibility();
    form.set_name(name);

    match form.submit(store, session).await {
        Ok(Some(theme)) => println!("Added theme {}: {}", theme.id, theme.name),
        Ok(None) => fail(format!(
            "Theme '{}' was not saved. Please try again.",
            form.new_theme_name
        )),
        Err(e) => fail(e),
    }
}

/// List all distinct tags with their usage counts.
pub async fn cmd_tags(store: &dyn DocumentStore, session: &Session) {
    let account = require_account(session);
    let themes = load_themes_with_tasks(store, account)
        .await
        .unwrap_or_else(|e| fail(e));

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for tag in themes.iter().flat_map(|th| th.tasks.iter()).flat_map(|t| t.tags.iter()) {
        *counts.entry(tag.clone()).or_default() += 1;
    }
    println!("{:<16} {}", "Tag", "Count");
    for (tag, c) in counts {
        println!("{:<16} {}", truncate(&tag, 16), c);
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
