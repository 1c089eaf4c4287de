//! Interactive browse session driven by line commands

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use tracing::debug;

use ab_core::{NavigationController, ReadinessGate};
use ab_data::ContentReader;

pub const HELP: &str = "\
commands:
  cd PATH        enter a directory
  up             enter the parent directory
  back, forward  move through history
  search TEXT    filter entries by name (no text clears)
  select N       select entry N of the listing
  hidden on|off  show or hide hidden entries
  filter [N]     list type filters or activate filter N
  reload         list the current directory again
  ls             print the listing
  pwd            print the current directory
  ready          check the arena2 root, validating if needed
  refresh        validate the arena2 root again
  root [PATH]    show or change the arena2 root
  help           show this text
  quit           leave the session";

/// One parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Cd(String),
    Up,
    Back,
    Forward,
    Search(String),
    Select(usize),
    Hidden(bool),
    Filter(Option<usize>),
    Reload,
    Ls,
    Pwd,
    Ready,
    Refresh,
    Root(Option<String>),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        let command = match word {
            "cd" => match argument {
                Some(path) => Command::Cd(path),
                None => bail!("cd needs a path"),
            },
            "up" => Command::Up,
            "back" => Command::Back,
            "forward" => Command::Forward,
            "search" => Command::Search(rest.to_string()),
            "select" => Command::Select(parse_index(rest)?),
            "hidden" => match rest {
                "on" => Command::Hidden(true),
                "off" => Command::Hidden(false),
                _ => bail!("usage: hidden on|off"),
            },
            "filter" => match argument {
                Some(index) => Command::Filter(Some(parse_index(&index)?)),
                None => Command::Filter(None),
            },
            "reload" => Command::Reload,
            "ls" => Command::Ls,
            "pwd" => Command::Pwd,
            "ready" => Command::Ready,
            "refresh" => Command::Refresh,
            "root" => Command::Root(argument),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command '{other}', try 'help'"),
        };
        Ok(Some(command))
    }
}

fn parse_index(text: &str) -> Result<usize> {
    text.parse()
        .with_context(|| format!("'{text}' is not an entry number"))
}

/// A browse session over a controller and a readiness gate
pub struct Session<'a, W: Write> {
    controller: &'a NavigationController,
    gate: &'a ReadinessGate<ContentReader>,
    out: W,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(
        controller: &'a NavigationController,
        gate: &'a ReadinessGate<ContentReader>,
        out: W,
    ) -> Self {
        Self {
            controller,
            gate,
            out,
        }
    }

    /// Read commands until `quit` or end of input
    ///
    /// Command failures are printed and the session carries on.
    pub fn run(&mut self, input: impl BufRead) -> Result<()> {
        self.print_listing()?;

        for line in input.lines() {
            let line = line.context("failed to read command")?;
            self.gate.tick();

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(self.out, "error: {e:#}")?;
                    continue;
                }
            };

            debug!(?command, "Session command");
            match self.execute(&command) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => writeln!(self.out, "error: {e:#}")?,
            }
        }
        Ok(())
    }

    /// Run one command. Returns `false` when the session should end.
    pub fn execute(&mut self, command: &Command) -> Result<bool> {
        match command {
            Command::Cd(path) => {
                self.controller.set_path(path)?;
                self.print_listing()?;
            }
            Command::Up => {
                if self.controller.go_up()?.is_none() {
                    writeln!(self.out, "already at the top")?;
                }
                self.print_listing()?;
            }
            Command::Back => {
                if self.controller.go_back()?.is_none() {
                    writeln!(self.out, "no earlier directory")?;
                }
                self.print_listing()?;
            }
            Command::Forward => {
                if self.controller.go_forward()?.is_none() {
                    writeln!(self.out, "no later directory")?;
                }
                self.print_listing()?;
            }
            Command::Search(text) => {
                self.controller.set_search(text);
                self.print_listing()?;
            }
            Command::Select(index) => match self.controller.select_at(*index) {
                Some(_) => {
                    let path = self
                        .controller
                        .selected_path()
                        .context("selection has no path")?;
                    writeln!(self.out, "selected {}", path.display())?;
                }
                None => writeln!(self.out, "no entry {index}")?,
            },
            Command::Hidden(show) => {
                self.controller.set_show_hidden(*show);
                self.print_listing()?;
            }
            Command::Filter(None) => self.print_filters()?,
            Command::Filter(Some(index)) => {
                if !self.controller.set_active_filter(*index)
                    && self.controller.active_filter() != *index
                {
                    bail!("cannot activate filter {index}");
                }
                self.print_listing()?;
            }
            Command::Reload => {
                self.controller.reload()?;
                self.print_listing()?;
            }
            Command::Ls => self.print_listing()?,
            Command::Pwd => match self.controller.current() {
                Some(path) => writeln!(self.out, "{path}")?,
                None => writeln!(self.out, "no directory open")?,
            },
            Command::Ready => {
                let result = self.gate.ensure_ready();
                self.print_readiness(result)?;
            }
            Command::Refresh => {
                let result = self.gate.refresh();
                self.print_readiness(result)?;
            }
            Command::Root(None) => match self.gate.root() {
                Some(root) => writeln!(self.out, "root {} ({:?})", root.display(), self.gate.state())?,
                None => writeln!(self.out, "no root configured")?,
            },
            Command::Root(Some(path)) => {
                self.gate.set_root(path.as_str());
                writeln!(self.out, "root set to {path}")?;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn print_listing(&mut self) -> Result<()> {
        let Some(current) = self.controller.current() else {
            writeln!(self.out, "no directory open")?;
            return Ok(());
        };

        let search = self.controller.search();
        if search.is_empty() {
            writeln!(self.out, "{current}")?;
        } else {
            writeln!(self.out, "{current} (search: {search})")?;
        }

        let selected = self.controller.selected_position();
        for (index, entry) in self.controller.valid_entries().iter().enumerate() {
            let marker = if selected == Some(index) { '*' } else { ' ' };
            let suffix = if entry.is_directory { "/" } else { "" };
            writeln!(self.out, "{marker}{index:>4}  {}{suffix}", entry.name)?;
        }
        Ok(())
    }

    fn print_filters(&mut self) -> Result<()> {
        let active = self.controller.active_filter();
        for (index, label) in self.controller.filter_labels().iter().enumerate() {
            let marker = if index == active { '*' } else { ' ' };
            writeln!(self.out, "{marker}{index:>4}  {label}")?;
        }
        Ok(())
    }

    fn print_readiness(
        &mut self,
        result: Result<std::sync::Arc<ContentReader>, ab_core::ReadinessError>,
    ) -> Result<()> {
        match result {
            Ok(reader) => writeln!(
                self.out,
                "ready: {} archives in {}",
                reader.archive_names().len(),
                reader.root().display()
            )?,
            Err(e) => writeln!(self.out, "not ready: {e}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_data::{build_controller, build_gate, BrowserConfig, Owners, REQUIRED_ARCHIVES};
    use std::fs;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  ").unwrap(), None);
        assert_eq!(
            Command::parse("cd /games/arena 2").unwrap(),
            Some(Command::Cd("/games/arena 2".to_string()))
        );
        assert_eq!(Command::parse("search").unwrap(), Some(Command::Search(String::new())));
        assert_eq!(Command::parse("select 3").unwrap(), Some(Command::Select(3)));
        assert_eq!(Command::parse("hidden on").unwrap(), Some(Command::Hidden(true)));
        assert_eq!(Command::parse("filter").unwrap(), Some(Command::Filter(None)));
        assert_eq!(Command::parse("root").unwrap(), Some(Command::Root(None)));
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("cd").is_err());
        assert!(Command::parse("select two").is_err());
        assert!(Command::parse("hidden maybe").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn test_scripted_session() {
        let install = tempfile::tempdir().unwrap();
        let arena2 = install.path().join("arena2");
        fs::create_dir(&arena2).unwrap();
        for archive in REQUIRED_ARCHIVES {
            fs::write(arena2.join(archive), b"").unwrap();
        }
        fs::write(arena2.join("TEXTURE.000"), b"").unwrap();

        let config = BrowserConfig {
            root_path: Some(arena2.clone()),
            ..Default::default()
        };
        let owners = Owners::default();
        let controller = build_controller(&config, &owners.controllers);
        let gate = build_gate(&config, &owners.gates);
        controller.open(Some(install.path())).unwrap();

        let script = "cd arena2-missing\ncd arena2\nsearch maps\nselect 0\nready\nback\npwd\nquit\nls\n";
        let script = script.replace("arena2", &arena2.to_string_lossy());

        let mut out = Vec::new();
        Session::new(&controller, &gate, &mut out)
            .run(script.as_bytes())
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("error: Not an existing directory"));
        assert!(text.contains(&format!("selected {}", arena2.join("MAPS.BSA").display())));
        assert!(text.contains("ready: 6 archives"));
        assert!(text.trim_end().ends_with(&install.path().display().to_string()));
    }
}
