//! Interactive editing session.
//!
//! `folio edit` drives an [`EditorAdapter`] from a line prompt. Each line is
//! one editor command; the session listens to change events to know when
//! the document differs from what was last saved.

use crate::config::{folio_dir, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use anyhow::Context;
use folio_domain::{BlockKind, ListKind, Position, Selection, TextFormat};
use folio_editor::{EditorAdapter, MemorySurface};
use folio_extractor::TextExtractor;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Leave; `force` discards unsaved changes
    Exit {
        /// Quit even with unsaved changes
        force: bool,
    },
    /// Print the command list
    Help,
    /// Act on the document
    Edit(EditCommand),
}

/// A command applied to the editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Insert text at the selection
    Type(String),
    /// Move the caret or select a range
    Select(Selection),
    /// Toggle inline formatting
    Format(TextFormat),
    /// Toggle a list
    List(ListKind),
    /// Change the block kind
    Block(BlockKind),
    /// Split the block
    Enter,
    /// Hard line break
    Break,
    /// Delete backward
    Backspace,
    /// Link (`Some`) or unlink (`None`) the selection
    Link(Option<String>),
    /// Undo one step
    Undo,
    /// Redo one step
    Redo,
    /// Print the preview text
    Show,
    /// Print the selected text
    Selected,
    /// Print the canonical JSON
    Json,
    /// Write the canonical JSON to a file
    Save(Option<PathBuf>),
}

/// Parse a prompt line.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim_start();
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match name {
        "exit" | "quit" | "q" => return Ok(ReplCommand::Exit { force: false }),
        "exit!" | "quit!" | "q!" => return Ok(ReplCommand::Exit { force: true }),
        "help" | "?" => return Ok(ReplCommand::Help),
        "type" | "t" => {
            if rest.is_empty() {
                return Err(usage("type <text>"));
            }
            EditCommand::Type(rest.to_string())
        }
        "select" | "sel" => parse_select(&args)?,
        "bold" | "italic" | "underline" | "strike" | "strikethrough" | "code" => {
            let format = TextFormat::parse(name)
                .ok_or_else(|| CliError::InvalidInput(format!("Unknown format: {}", name)))?;
            EditCommand::Format(format)
        }
        "bullet" | "ul" => EditCommand::List(ListKind::Bullet),
        "number" | "ol" => EditCommand::List(ListKind::Number),
        "heading" | "h" => {
            let level = args
                .first()
                .and_then(|s| s.parse::<u8>().ok())
                .ok_or_else(|| usage("heading <1-6>"))?;
            EditCommand::Block(BlockKind::Heading(level))
        }
        "paragraph" | "p" => EditCommand::Block(BlockKind::Paragraph),
        "quote" => EditCommand::Block(BlockKind::Quote),
        "codeblock" => EditCommand::Block(BlockKind::Code),
        "enter" => EditCommand::Enter,
        "break" | "br" => EditCommand::Break,
        "backspace" | "bs" => EditCommand::Backspace,
        "link" => {
            let url = args.first().ok_or_else(|| usage("link <url>"))?;
            EditCommand::Link(Some(url.to_string()))
        }
        "unlink" => EditCommand::Link(None),
        "undo" | "u" => EditCommand::Undo,
        "redo" | "r" => EditCommand::Redo,
        "show" => EditCommand::Show,
        "selected" => EditCommand::Selected,
        "json" => EditCommand::Json,
        "save" | "w" => EditCommand::Save(args.first().map(PathBuf::from)),
        _ => {
            return Err(CliError::InvalidInput(format!(
                "Unknown command: {}. Type 'help' for available commands.",
                name
            )))
        }
    };

    Ok(ReplCommand::Edit(command))
}

fn parse_select(args: &[&str]) -> Result<EditCommand> {
    let anchor = args
        .first()
        .and_then(|s| parse_position(s))
        .ok_or_else(|| usage("select <block:offset> [block:offset]"))?;
    let focus = match args.get(1) {
        Some(s) => parse_position(s).ok_or_else(|| usage("select <block:offset> [block:offset]"))?,
        None => anchor,
    };
    Ok(EditCommand::Select(Selection::range(anchor, focus)))
}

fn parse_position(s: &str) -> Option<Position> {
    let (block, offset) = s.split_once(':')?;
    Some(Position::new(block.parse().ok()?, offset.parse().ok()?))
}

fn usage(text: &str) -> CliError {
    CliError::InvalidInput(format!("Usage: {}", text))
}

/// Editor state behind the prompt.
pub struct EditSession {
    editor: EditorAdapter<MemorySurface>,
    extractor: TextExtractor,
    latest: Rc<RefCell<String>>,
    saved: String,
    target: Option<PathBuf>,
}

impl EditSession {
    /// Open a session on `initial` content; `save` without a path writes to `target`.
    pub fn new(initial: Option<&str>, target: Option<PathBuf>, config: &Config) -> Result<Self> {
        let mut editor =
            EditorAdapter::with_content(MemorySurface::new(), config.editor.clone(), initial)?;
        let extractor = TextExtractor::new(config.extractor.clone())?;

        let saved = editor.content();
        let latest = Rc::new(RefCell::new(saved.clone()));
        let sink = Rc::clone(&latest);
        editor.subscribe(move |event| {
            *sink.borrow_mut() = event.content.clone();
        });

        Ok(Self {
            editor,
            extractor,
            latest,
            saved,
            target,
        })
    }

    /// The editor being driven.
    pub fn editor(&self) -> &EditorAdapter<MemorySurface> {
        &self.editor
    }

    /// Whether the document changed since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        *self.latest.borrow() != self.saved
    }

    /// Apply one command and return what should be printed.
    pub fn execute(&mut self, command: EditCommand, formatter: &Formatter) -> Result<String> {
        match command {
            EditCommand::Type(text) => self.editor.insert_text(&text)?,
            EditCommand::Select(selection) => self.editor.select(selection)?,
            EditCommand::Format(format) => self.editor.toggle_format(format)?,
            EditCommand::List(kind) => self.editor.toggle_list(kind)?,
            EditCommand::Block(kind) => self.editor.set_block(kind)?,
            EditCommand::Enter => self.editor.enter()?,
            EditCommand::Break => self.editor.line_break()?,
            EditCommand::Backspace => self.editor.backspace()?,
            EditCommand::Link(url) => self.editor.set_link(url.as_deref())?,
            EditCommand::Undo => {
                if !self.editor.undo()? {
                    return Ok(formatter.warning("Nothing to undo"));
                }
            }
            EditCommand::Redo => {
                if !self.editor.redo()? {
                    return Ok(formatter.warning("Nothing to redo"));
                }
            }
            EditCommand::Show => return Ok(self.extractor.preview(&self.editor.content())),
            EditCommand::Selected => return Ok(self.editor.selected_text()),
            EditCommand::Json => return Ok(self.editor.content()),
            EditCommand::Save(path) => {
                let path = self.save(path)?;
                return Ok(formatter.success(&format!("Saved {}", path.display())));
            }
        }
        Ok(String::new())
    }

    /// Write the canonical JSON to `path`, or to the session target.
    pub fn save(&mut self, path: Option<PathBuf>) -> Result<PathBuf> {
        let path = path
            .or_else(|| self.target.clone())
            .ok_or_else(|| usage("save <path> (no file was given)"))?;

        let content = self.editor.content();
        std::fs::write(&path, &content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Saved {} bytes to {}", content.len(), path.display());

        self.saved = content;
        if self.target.is_none() {
            self.target = Some(path.clone());
        }
        Ok(path)
    }

    fn prompt(&self) -> String {
        let marker = if self.is_dirty() { "*" } else { "" };
        format!("folio [{}]{}> ", self.editor.selection(), marker)
    }
}

/// Run the interactive editing session.
pub fn run_edit_session(
    initial: Option<&str>,
    target: Option<PathBuf>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let mut session = EditSession::new(initial, target, config)?;

    println!("{}", formatter.info("Folio editor - Type 'help' for commands, 'exit' to quit"));
    println!();

    let readline_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .context("invalid history size")?
        .build();
    let mut editor = DefaultEditor::with_config(readline_config).context("failed to initialize editor")?;

    let history_path = folio_dir()?.join("history.txt");
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline(&session.prompt()) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str()).ok();

                match parse_repl_command(&line) {
                    Ok(ReplCommand::Exit { force }) => {
                        if session.is_dirty() && !force {
                            println!(
                                "{}",
                                formatter.warning("Unsaved changes. Use 'save' or 'exit!' to discard them")
                            );
                            continue;
                        }
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(ReplCommand::Edit(command)) => match session.execute(command, formatter) {
                        Ok(output) if !output.is_empty() => println!("{}", output),
                        Ok(_) => {}
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    editor.save_history(&history_path).ok();

    Ok(())
}

/// Print REPL help.
fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  Text:");
    println!("    type <text>                 Insert text at the caret");
    println!("    select <b:o> [b:o]          Move the caret or select a range");
    println!("    enter                       Split the block");
    println!("    break                       Insert a line break");
    println!("    backspace                   Delete backward");
    println!();
    println!("  Formatting:");
    println!("    bold | italic | underline | strike | code");
    println!("    link <url> | unlink");
    println!();
    println!("  Blocks:");
    println!("    bullet | number             Toggle a list");
    println!("    heading <1-6> | paragraph | quote | codeblock");
    println!();
    println!("  Session:");
    println!("    undo | redo");
    println!("    show                        Print the preview text");
    println!("    selected                    Print the selected text");
    println!("    json                        Print the canonical JSON");
    println!("    save [path]                 Write the canonical JSON");
    println!("    help                        Show this help");
    println!("    exit | exit!                Quit (exit! discards changes)");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    fn run(session: &mut EditSession, line: &str) -> String {
        match parse_repl_command(line).unwrap() {
            ReplCommand::Edit(command) => session.execute(command, &formatter()).unwrap(),
            other => panic!("not an edit command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_type_keeps_spacing() {
        assert_eq!(
            parse_repl_command("type Hello  world").unwrap(),
            ReplCommand::Edit(EditCommand::Type("Hello  world".to_string()))
        );
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            parse_repl_command("select 0:6 1:2").unwrap(),
            ReplCommand::Edit(EditCommand::Select(Selection::range(
                Position::new(0, 6),
                Position::new(1, 2)
            )))
        );
        assert_eq!(
            parse_repl_command("select 2:0").unwrap(),
            ReplCommand::Edit(EditCommand::Select(Selection::caret(Position::new(2, 0))))
        );
        assert!(parse_repl_command("select nowhere").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_repl_command("exit").unwrap(), ReplCommand::Exit { force: false });
        assert_eq!(parse_repl_command("q!").unwrap(), ReplCommand::Exit { force: true });
        assert_eq!(
            parse_repl_command("heading 2").unwrap(),
            ReplCommand::Edit(EditCommand::Block(BlockKind::Heading(2)))
        );
        assert_eq!(
            parse_repl_command("strike").unwrap(),
            ReplCommand::Edit(EditCommand::Format(TextFormat::STRIKETHROUGH))
        );
        assert!(parse_repl_command("heading").is_err());
        assert!(parse_repl_command("frobnicate").is_err());
    }

    #[test]
    fn test_session_edits_and_tracks_changes() {
        let mut session = EditSession::new(None, None, &Config::default()).unwrap();
        assert!(!session.is_dirty());

        run(&mut session, "type Hello world");
        assert!(session.is_dirty());
        run(&mut session, "select 0:6 0:11");
        run(&mut session, "bold");
        assert_eq!(run(&mut session, "selected"), "world");
        // Preview joins the runs of a block with a space, so the space that
        // ends "Hello " is followed by the separator
        assert_eq!(run(&mut session, "show"), "Hello  world");

        let json = run(&mut session, "json");
        assert!(json.contains(r#""text":"world""#));
        assert!(json.contains(r#""format":1"#));
    }

    #[test]
    fn test_undo_with_empty_history_warns() {
        let mut session = EditSession::new(None, None, &Config::default()).unwrap();
        assert_eq!(run(&mut session, "undo"), "⚠ Nothing to undo");
    }

    #[test]
    fn test_undo_restores_saved_state() {
        let mut session = EditSession::new(Some("<p>Start</p>"), None, &Config::default()).unwrap();
        run(&mut session, "select 0:5");
        run(&mut session, "type !");
        assert!(session.is_dirty());
        run(&mut session, "undo");
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_save_writes_canonical_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("body.json");
        let mut session =
            EditSession::new(Some("<h1>Title</h1>"), Some(path.clone()), &Config::default()).unwrap();
        run(&mut session, "select 0:5");
        run(&mut session, "enter");
        run(&mut session, "type Body");

        let message = run(&mut session, "save");
        assert!(message.contains("body.json"));
        assert!(!session.is_dirty());

        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(saved, session.editor().content());
        assert!(saved.contains(r#""tag":"h1""#));
    }

    #[test]
    fn test_save_without_target_fails() {
        let mut session = EditSession::new(None, None, &Config::default()).unwrap();
        let err = session
            .execute(EditCommand::Save(None), &formatter())
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_heading_reports_error() {
        let mut session = EditSession::new(None, None, &Config::default()).unwrap();
        let command = match parse_repl_command("heading 9").unwrap() {
            ReplCommand::Edit(command) => command,
            other => panic!("unexpected: {:?}", other),
        };
        assert!(session.execute(command, &formatter()).is_err());
    }
}
