use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use chatcanvas_application::{ChatCanvas, ChatCanvasBuilder};
use chatcanvas_application::session::{AgentCardState, Outgoing, SessionOutbox};
use chatcanvas_core::message::{Role, UiMessage};
use chatcanvas_core::renderer::RenderedContent;
use chatcanvas_core::surface::UserAction;
use chatcanvas_infrastructure::logging::{self, LogConfig};
use chatcanvas_infrastructure::ConfigStorage;
use chatcanvas_interaction::HttpA2aService;

const COMMANDS: &[&str] = &["/cancel", "/turns", "/canvas", "/surfaces", "/card", "/action"];

/// Terminal chat client for A2A agents that answer with A2UI surfaces.
#[derive(Parser, Debug)]
#[command(name = "chatcanvas", version, about)]
struct Args {
    /// Agent base URL, overriding `[agent] endpoint`
    #[arg(long)]
    endpoint: Option<String>,

    /// Path to config.toml (defaults to ~/.config/chatcanvas/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Flattens rendered output into printable lines.
fn rendered_lines(content: &RenderedContent, lines: &mut Vec<String>) {
    match content {
        RenderedContent::Html(html) => {
            lines.extend(html.lines().map(|line| line.bright_blue().to_string()));
        }
        RenderedContent::Surface {
            surface_id,
            surface,
        } => {
            lines.push(
                format!(
                    "[surface {surface_id}: {} components, root {:?}]",
                    surface.components.len(),
                    surface.root
                )
                .bright_black()
                .to_string(),
            );
        }
        RenderedContent::Empty => {}
        RenderedContent::Group {
            header,
            footer,
            inner,
        } => {
            if let Some(header) = header {
                lines.push(header.bright_magenta().to_string());
            }
            for child in inner {
                rendered_lines(child, lines);
            }
            if let Some(footer) = footer {
                lines.push(footer.bright_black().to_string());
            }
        }
    }
}

async fn print_message(app: &ChatCanvas, message: &UiMessage) {
    let Role::Agent(agent) = &message.role else {
        return;
    };

    let context = app.session.rendering_context();
    match app.renderer.render_message(message, &context).await {
        Ok(rendered) => {
            println!("{}", format!("[{}]", agent.display_name()).bright_magenta());
            let mut lines = Vec::new();
            rendered_lines(&rendered, &mut lines);
            for line in lines {
                println!("{line}");
            }
            println!();
        }
        Err(e) => eprintln!("{}", format!("Render failed: {e}").red()),
    }
}

/// Prints agent messages as they settle.
async fn watch_history(app: Arc<ChatCanvas>) {
    let mut history = app.session.subscribe_history();
    let mut printed: HashMap<String, DateTime<Utc>> = HashMap::new();

    while history.changed().await.is_ok() {
        let snapshot = history.borrow_and_update().clone();
        for message in snapshot.iter().filter(|m| !m.is_pending()) {
            if printed.get(&message.id) == Some(&message.last_updated) {
                continue;
            }
            printed.insert(message.id.clone(), message.last_updated);
            print_message(&app, message).await;
        }
    }
}

fn print_turns(app: &ChatCanvas) {
    let turns = app.session.turns();
    if turns.is_empty() {
        println!("{}", "No messages yet".bright_black());
    }
    for (index, turn) in turns.iter().enumerate() {
        let first = turn.first();
        let opener = match &first.role {
            Role::User => "user".to_string(),
            Role::Agent(agent) => agent.display_name().to_string(),
        };
        println!(
            "{}",
            format!(
                "Turn {}: {} message(s), opened by {}, {} thought(s)",
                index + 1,
                turn.len(),
                opener,
                turn.agent_thoughts().len()
            )
            .yellow()
        );
    }
}

fn print_canvas(app: &ChatCanvas) {
    let state = app.canvas.snapshot();
    match (state.surface_id.as_deref(), state.open_contents()) {
        (Some(surface_id), Some(contents)) => {
            println!("{}", format!("Canvas open on {surface_id}").yellow());
            for node in contents {
                println!("  {}", format!("- {}", node.id).yellow());
            }
        }
        _ => println!("{}", "Canvas closed".bright_black()),
    }
}

fn print_surfaces(app: &ChatCanvas) {
    let surfaces = app.session.surfaces();
    if surfaces.is_empty() {
        println!("{}", "No surfaces".bright_black());
    }
    let mut ids: Vec<_> = surfaces.keys().collect();
    ids.sort();
    for id in ids {
        let surface = &surfaces[id];
        let state = if surface.is_renderable() {
            "renderable"
        } else {
            "waiting for root"
        };
        println!(
            "{}",
            format!("{id}: {} component(s), {state}", surface.components.len()).yellow()
        );
    }
}

fn print_card(app: &ChatCanvas) {
    match app.session.agent_card().state() {
        AgentCardState::Pending => println!("{}", "Agent card loading".bright_black()),
        AgentCardState::Failed => println!("{}", "Agent card unavailable".red()),
        AgentCardState::Loaded(card) => {
            println!("{}", card.name.bright_magenta());
            if let Some(description) = card.description {
                println!("{}", description.bright_black());
            }
        }
    }
}

/// `/action <name> <surfaceId> <componentId>`
fn parse_action(args: &str) -> Option<UserAction> {
    let mut words = args.split_whitespace();
    let name = words.next()?;
    let surface_id = words.next()?;
    let source_component_id = words.next()?;
    Some(UserAction {
        name: name.to_string(),
        surface_id: surface_id.to_string(),
        source_component_id: source_component_id.to_string(),
        timestamp: Utc::now(),
        context: Default::default(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Configuration =====
    let storage = match args.config {
        Some(path) => ConfigStorage::new(path),
        None => ConfigStorage::default_location()?,
    };
    let mut config = storage
        .load()
        .await
        .with_context(|| format!("Failed to load {}", storage.path().display()))?;
    if let Some(endpoint) = args.endpoint {
        config.agent.endpoint = endpoint;
    }

    let _log_guard = logging::init(&LogConfig::from_config(&config.logging))?;
    tracing::info!(endpoint = %config.agent.endpoint, "Starting chatcanvas");

    // ===== Backend Initialization =====
    let service = Arc::new(HttpA2aService::from_config(&config.agent)?);
    let app = Arc::new(ChatCanvasBuilder::from_config(service, &config.agent).build());

    let printer = tokio::spawn(watch_history(Arc::clone(&app)));
    let outbox = SessionOutbox::spawn(Arc::clone(&app.session));

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== ChatCanvas ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message, '/cancel' to stop the agent, '/turns', '/canvas', '/surfaces', '/card', or 'quit' to exit."
            .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let (command, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
                match command {
                    "/cancel" => {
                        outbox.send(Outgoing::Cancel);
                    }
                    "/turns" => print_turns(&app),
                    "/canvas" => print_canvas(&app),
                    "/surfaces" => print_surfaces(&app),
                    "/card" => print_card(&app),
                    "/action" => match parse_action(rest) {
                        Some(action) => {
                            outbox.send(Outgoing::Action(action));
                        }
                        None => println!(
                            "{}",
                            "Usage: /action <name> <surfaceId> <componentId>".bright_black()
                        ),
                    },
                    _ if command.starts_with('/') => {
                        println!("{}", "Unknown command".bright_black());
                    }
                    _ => {
                        println!("{}", format!("> {trimmed}").green());
                        if app.session.is_stream_open() {
                            println!("{}", "(cancelling previous request)".bright_black());
                        }
                        outbox.send(Outgoing::Message(trimmed.to_string()));
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                if app.session.is_stream_open() {
                    outbox.send(Outgoing::Cancel);
                } else {
                    println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                }
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    outbox.shutdown().await;
    printer.abort();

    Ok(())
}
