//! Interactive terminal session around a [CourseViewLoader].

use std::{
    cell::RefCell,
    io::{BufRead, Write},
    rc::Rc,
};

use colored::Colorize;
use itertools::Itertools;

use crate::{
    format::{CodeStyle, CodeTagFormatter},
    gate::Answer,
    loader::{CourseViewLoader, CourseViewLoaderBuilder, LoadReport, LoaderState},
    projector::BulletList,
    store::ContentStore,
    str_res::{CODIUM, HELP},
    validator::Verdict,
};

use self::widgets::{Console, CourseViewDropdown, GameView, Instructions, ModalPanel};

pub mod widgets;

/// Marker drawn at the caret position in the editor.
const CARET_MARK: &str = "│";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Code(String),
    Check,
    Reset,
    Solution,
    Answer(Answer),
    Goto(usize),
    Next,
    Prev,
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        // Typed code may contain escaped newlines and tabs.
        let text = rest.replace("\\n", "\n").replace("\\t", "\t");

        match word {
            "type" => Self::Type(text),
            "code" => Self::Code(text),
            "check" => Self::Check,
            "reset" => Self::Reset,
            "solution" => Self::Solution,
            "yes" | "y" => Self::Answer(Answer::Yes),
            "no" | "n" => Self::Answer(Answer::No),
            "goto" => match rest.trim().parse::<usize>() {
                Ok(lesson) if lesson > 0 => Self::Goto(lesson - 1),
                _ => Self::Unknown(line.to_string()),
            },
            "next" => Self::Next,
            "prev" => Self::Prev,
            "show" | "" => Self::Show,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

pub struct Session {
    loader: CourseViewLoader,
    instructions: Rc<RefCell<Instructions>>,
    console: Rc<RefCell<Console>>,
    game_view: Rc<RefCell<GameView>>,
    modal: Rc<RefCell<ModalPanel>>,
    dropdown: Rc<RefCell<CourseViewDropdown>>,
}

impl Session {
    /// Wires the terminal widgets to a loader reading from `store`. Inline code
    /// is shown in `style`.
    pub fn new<S: ContentStore + 'static>(store: S, style: CodeStyle) -> Self {
        let instructions = Rc::new(RefCell::new(Instructions::default()));
        let console = Rc::new(RefCell::new(Console::default()));
        let game_view = Rc::new(RefCell::new(GameView::default()));
        let modal = Rc::new(RefCell::new(ModalPanel::default()));
        let dropdown = Rc::new(RefCell::new(CourseViewDropdown::default()));

        let loader = CourseViewLoaderBuilder::new()
            .store(store)
            .formatter(CodeTagFormatter::new(style))
            .steps(instructions.clone())
            .environment(console.clone())
            .scene(game_view.clone())
            .modal(modal.clone())
            .selector(dropdown.clone())
            .build();

        Self { loader, instructions, console, game_view, modal, dropdown }
    }

    /// Reads commands from `input` until it runs dry or the learner quits.
    pub fn run<R, W>(&mut self, input: R, out: &mut W) -> std::io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "{}", *CODIUM)?;

        let report = self.loader.load_current_course_view();
        self.print_report(&report, out)?;
        self.render(out)?;

        for line in input.lines() {
            let command = Command::parse(&line?);
            log::debug!("Command: {command:?}");

            if command == Command::Quit {
                break;
            }
            self.handle(command, out)?;
        }

        self.loader.unload();
        Ok(())
    }

    pub fn handle<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> std::io::Result<()> {
        // Anything but an answer closes the pending question.
        if let Some(ticket) = self.loader.pending_confirmation() {
            if !matches!(command, Command::Answer(_)) {
                self.loader.answer(ticket, Answer::Dismissed);
            }
        }

        match command {
            Command::Type(text) => {
                self.loader.editor_mut().insert(&text);
                self.render_editor(out)
            }
            Command::Code(text) => {
                self.loader.editor_mut().set_text(&text);
                self.render_editor(out)
            }
            Command::Check => self.check(out),
            Command::Reset => {
                self.loader.reset_code();
                self.render_modal(out)
            }
            Command::Solution => {
                self.loader.show_solution();
                self.render_modal(out)
            }
            Command::Answer(answer) => match self.loader.pending_confirmation() {
                Some(ticket) => {
                    self.loader.answer(ticket, answer);
                    self.render(out)
                }
                None => writeln!(out, "nothing to answer"),
            },
            Command::Goto(index) => self.goto(index, out),
            Command::Next => match self.loader.state() {
                LoaderState::Loaded { index } => self.goto(index + 1, out),
                _ => self.goto(0, out),
            },
            Command::Prev => match self.loader.state() {
                LoaderState::Loaded { index } if index > 0 => {
                    self.goto(index - 1, out)
                }
                _ => writeln!(out, "already at the first lesson"),
            },
            Command::Show => self.render(out),
            Command::Help => writeln!(out, "{}", *HELP),
            Command::Quit => Ok(()),
            Command::Unknown(line) => {
                writeln!(out, "unknown command '{line}', try 'help'")
            }
        }
    }

    fn goto<W: Write>(&mut self, index: usize, out: &mut W) -> std::io::Result<()> {
        let report = self.loader.select_view(index);
        self.print_report(&report, out)?;
        self.render(out)
    }

    fn check<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        match self.loader.check() {
            Verdict::Pass => {
                if let Some((_, index)) = self.loader.current() {
                    self.dropdown.borrow_mut().mark_completed(index);
                    self.loader.refresh_selector();
                }
                writeln!(out, "{}", "✅ lesson complete".green().bold())
            }
            Verdict::Fail(reason) => {
                writeln!(out, "{} {}", "❌ not yet:".red().bold(), reason)
            }
            Verdict::Pending => {
                writeln!(out, "{}", "⏳ nothing to check".white().dimmed())
            }
        }
    }

    fn print_report<W: Write>(
        &self,
        report: &LoadReport,
        out: &mut W,
    ) -> std::io::Result<()> {
        if report.is_clean() {
            return Ok(());
        }

        for issue in report.issues.iter() {
            let prefix = if issue.is_error() {
                "⚠ error:".red().bold()
            } else {
                "⚠ warning:".yellow().bold()
            };
            writeln!(out, "{prefix} {issue}")?;
        }

        if report.errors().next().is_some() {
            writeln!(out, "{}", "some parts of this lesson did not load".dimmed())?;
        }
        Ok(())
    }

    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let panel = self.loader.panel();

        writeln!(out, "\n{}", panel.title.bold().italic())?;
        writeln!(out, "{}", panel.subject.green().bold())?;
        writeln!(out, "{}", panel.explanation)?;

        render_bullets(&panel.code_desc, out)?;
        render_bullets(&panel.examples, out)?;

        writeln!(out, "\n{}", self.instructions.borrow().render())?;
        writeln!(
            out,
            "{}  {}",
            self.console.borrow().render(),
            self.game_view.borrow().render()
        )?;

        self.render_editor(out)?;

        let dropdown = self.dropdown.borrow();
        if dropdown.len() > 0 {
            writeln!(out, "\n{}", dropdown.lines().iter().join("\n"))?;
        }
        drop(dropdown);

        self.render_modal(out)
    }

    fn render_editor<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let editor = self.loader.editor();
        let (before, after): (String, String) = (
            editor.text().chars().take(editor.caret()).collect(),
            editor.text().chars().skip(editor.caret()).collect(),
        );

        // The caret is only drawn once a lesson has given the editor focus.
        let caret = if editor.is_focused() {
            CARET_MARK.cyan().to_string()
        } else {
            String::new()
        };

        writeln!(out, "╭─[ editor ]")?;
        for line in format!("{before}{caret}{after}").lines() {
            writeln!(out, "│ {line}")?;
        }
        writeln!(out, "╰─")
    }

    fn render_modal<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        match self.modal.borrow().render() {
            Some(question) => writeln!(out, "\n{question}"),
            None => Ok(()),
        }
    }
}

fn render_bullets<W: Write>(list: &BulletList, out: &mut W) -> std::io::Result<()> {
    if list.is_visible() {
        writeln!(out, "{}", list.items().iter().join("\n"))?;
    }
    Ok(())
}
