use std::io::Write;
use std::path::PathBuf;

use crate::engine::{ExecutionOutcome, path::expand_home};

/// One recorded command. Ids are 1-based and stay compact: removing an
/// entry renumbers everything after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub id: usize,
    pub command: String,
}

/// A list of commands that completed successfully, auto-recorded through
/// [`observe`](Favorites::observe) and managed with the `favs` subcommands.
///
/// The list lives in memory; `save`/`load` exchange it with the favorites
/// file chosen by `favs create`, whose path is remembered across sessions
/// in `~/.mishell_favs_path`.
pub struct Favorites {
    entries: Vec<Favorite>,
    file: Option<PathBuf>,
}

/// What the read loop should do after a `favs` subcommand.
pub enum FavsAction {
    /// Nothing further; prompt for the next line.
    Done,
    /// Re-dispatch this stored command through the ordinary execution path.
    Execute(String),
}

impl Favorites {
    pub fn new() -> Self {
        Favorites {
            entries: Vec::new(),
            file: None,
        }
    }

    /// Start-of-session state: an empty list pointing at the favorites file
    /// from the previous session, if one was ever chosen.
    pub fn restore() -> Self {
        let mut favorites = Self::new();
        if let Some(pointer) = Self::pointer_path() {
            if let Ok(contents) = std::fs::read_to_string(&pointer) {
                if let Some(line) = contents.lines().next() {
                    if !line.trim().is_empty() {
                        favorites.file = Some(PathBuf::from(line.trim()));
                    }
                }
            }
        }
        favorites
    }

    /// Return the path of the file remembering where favorites are kept.
    fn pointer_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".mishell_favs_path"))
    }

    /// See one executed command together with its aggregate outcome, and
    /// record the text when it is worth keeping: overall success only,
    /// never the management commands themselves, no duplicates.
    pub fn observe(&mut self, command: &str, outcome: &ExecutionOutcome) {
        if !outcome.is_success() {
            return;
        }
        if command == "favs" || command.starts_with("favs ") {
            return;
        }
        if self.entries.iter().any(|f| f.command == command) {
            return;
        }
        let id = self.entries.len() + 1;
        self.entries.push(Favorite {
            id,
            command: command.to_string(),
        });
    }

    // ── Subcommand dispatch ────────────────────────────────────────────────

    /// Handle the text after the `favs` directive.
    pub fn handle(&mut self, rest: &str) -> FavsAction {
        let mut words = rest.split_whitespace();
        let Some(sub) = words.next() else {
            usage();
            return FavsAction::Done;
        };
        let arg = words.collect::<Vec<_>>().join(" ");

        match sub {
            "create" => self.create(&arg),
            "list" => self.list(),
            "remove" => self.remove(&arg),
            "find" => self.find(&arg),
            "clear" => self.clear(),
            "save" => self.save(),
            "load" => self.load(),
            "exec" => return self.exec(&arg),
            _ => {
                eprintln!("mishell: favs: unknown subcommand: {}", sub);
                usage();
            }
        }
        FavsAction::Done
    }

    /// `favs create <path>`: choose (and truncate) the favorites file and
    /// remember its path for future sessions.
    fn create(&mut self, arg: &str) {
        if arg.is_empty() {
            eprintln!("usage: favs create <path>");
            return;
        }
        let path = expand_home(arg);
        match std::fs::File::create(&path) {
            Ok(_) => {
                println!("favorites file created at: {}", path.display());
                self.attach(path);
            }
            Err(e) => eprintln!("mishell: favs: cannot create {}: {}", path.display(), e),
        }
    }

    fn attach(&mut self, path: PathBuf) {
        if let Some(pointer) = Self::pointer_path() {
            if let Err(e) = std::fs::write(&pointer, format!("{}\n", path.display())) {
                eprintln!("mishell: favs: cannot remember favorites path: {}", e);
            }
        }
        self.file = Some(path);
    }

    fn list(&self) {
        for fav in &self.entries {
            println!("{}: {}", fav.id, fav.command);
        }
    }

    /// `favs remove <id[,id…]>`: drop the given entries and renumber the
    /// rest compactly.
    fn remove(&mut self, arg: &str) {
        let ids: Vec<usize> = arg
            .split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect();
        if ids.is_empty() {
            eprintln!("usage: favs remove <id[,id...]>");
            return;
        }
        self.entries.retain(|f| !ids.contains(&f.id));
        self.renumber();
    }

    fn find(&self, arg: &str) {
        if arg.is_empty() {
            eprintln!("usage: favs find <text>");
            return;
        }
        for fav in self.entries.iter().filter(|f| f.command.contains(arg)) {
            println!("{}: {}", fav.id, fav.command);
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        println!("all favorites removed");
    }

    /// `favs save`: append to the favorites file every in-memory entry it
    /// does not already contain.
    fn save(&self) {
        let Some(file) = &self.file else {
            eprintln!("mishell: favs: no favorites file set (use favs create <path>)");
            return;
        };
        let existing: Vec<String> = match std::fs::read_to_string(file) {
            Ok(contents) => contents.lines().map(str::to_string).collect(),
            Err(e) => {
                eprintln!("mishell: favs: cannot read {}: {}", file.display(), e);
                return;
            }
        };
        let result = std::fs::OpenOptions::new()
            .append(true)
            .open(file)
            .and_then(|mut f| {
                for fav in &self.entries {
                    if !existing.contains(&fav.command) {
                        writeln!(f, "{}", fav.command)?;
                    }
                }
                Ok(())
            });
        match result {
            Ok(()) => println!("favorites saved to: {}", file.display()),
            Err(e) => eprintln!("mishell: favs: cannot write {}: {}", file.display(), e),
        }
    }

    /// `favs load`: replace the in-memory list with the file's contents and
    /// print what was loaded.
    fn load(&mut self) {
        let Some(file) = &self.file else {
            eprintln!("mishell: favs: no favorites file set (use favs create <path>)");
            return;
        };
        match std::fs::read_to_string(file) {
            Ok(contents) => {
                self.entries = contents
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .enumerate()
                    .map(|(i, line)| Favorite {
                        id: i + 1,
                        command: line.to_string(),
                    })
                    .collect();
                println!("favorites loaded from: {}", file.display());
                self.list();
            }
            Err(e) => eprintln!("mishell: favs: cannot read {}: {}", file.display(), e),
        }
    }

    /// `favs exec <id>`: hand the stored command text back to the read loop
    /// so it runs through the ordinary dispatch path (and is observed with
    /// the outcome it actually produces).
    fn exec(&mut self, arg: &str) -> FavsAction {
        let Ok(id) = arg.trim().parse::<usize>() else {
            eprintln!("usage: favs exec <id>");
            return FavsAction::Done;
        };
        match self.entries.iter().find(|f| f.id == id) {
            Some(fav) => FavsAction::Execute(fav.command.clone()),
            None => {
                eprintln!("mishell: favs: no favorite with id {}", id);
                FavsAction::Done
            }
        }
    }

    fn renumber(&mut self) {
        for (i, fav) in self.entries.iter_mut().enumerate() {
            fav.id = i + 1;
        }
    }
}

fn usage() {
    eprintln!("usage: favs <create|list|remove|find|clear|save|load|exec> [args]");
}

// ── Tests ──────────────────────────────────────────────────────────────────
