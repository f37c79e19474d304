mod engine;
mod favorites;
mod parser;
mod reminder;
mod signals;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::env;

use engine::ShellState;
use favorites::FavsAction;
use parser::ParseError;

fn get_prompt() -> String {
    let cwd = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));

    let path_str = match dirs::home_dir() {
        Some(home) if cwd.starts_with(&home) => {
            let relative = cwd.strip_prefix(&home).unwrap();
            if relative.as_os_str().is_empty() {
                "~".to_string()
            } else {
                format!("~/{}", relative.display())
            }
        }
        _ => cwd.display().to_string(),
    };

    format!("msh {} $ ", path_str)
}

fn main() -> rustyline::Result<()> {
    signals::init();
    let mut rl = DefaultEditor::new()?;
    let mut state = ShellState::new();

    loop {
        let prompt = get_prompt();
        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);

                if input == "exit" {
                    break;
                }

                if input == "remind" || input.starts_with("remind ") {
                    reminder::schedule(input.strip_prefix("remind").unwrap_or(""));
                    continue;
                }

                if input == "favs" || input.starts_with("favs ") {
                    let rest = input.strip_prefix("favs").unwrap_or("");
                    match state.favorites.handle(rest) {
                        FavsAction::Execute(command) => dispatch(&command, &mut state),
                        FavsAction::Done => {}
                    }
                    continue;
                }

                dispatch(input, &mut state);
            }
            Err(ReadlineError::Interrupted) => {
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

/// Run one ordinary line: split it into a pipeline, execute it, and let the
/// favorites collaborator see the text that actually ran together with the
/// aggregate outcome.
fn dispatch(line: &str, state: &mut ShellState) {
    match parser::parse_line(line) {
        Ok(pipeline) => {
            let outcome = engine::execute(&pipeline);
            state.favorites.observe(line, &outcome);
        }
        // Blank after trimming: silently prompt again.
        Err(ParseError::EmptyCommand) => {}
        Err(err) => eprintln!("mishell: {}", err),
    }
}
