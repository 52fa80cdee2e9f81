use clap::{ArgAction, Parser};
use std::{
    io::{self, BufRead, Write},
    ops::ControlFlow,
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

use cfg_workbench::session::Session;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grammar file to open at startup
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Raise log verbosity, can be repeated
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

const HELP: &str = "\
The following commands are supported:
open <file> - Opens a file
close - Closes the currently opened file
save - Saves the currently open file
saveas <file> - Saves the currently open file with a new name
list - Lists all grammars
print <id> - Prints a grammar
save <id> <file> - Saves grammar to file
addRule <id> <L> -> <R> - Adds a rule to a grammar
removeRule <id> <number> - Removes a rule from a grammar
union <id1> <id2> - Performs union of two grammars and creates a new one
concat <id1> <id2> - Performs concatenation of two grammars and creates a new one
chomsky <id> - Checks if a grammar is in Chomsky normal form
cyk <id> [word] - Checks if a word is in the language of a grammar (CYK algorithm)
iter <id> - Performs Kleene star operation on a grammar
empty <id> - Checks if a grammar's language is empty
chomskify <id> - Converts a grammar to Chomsky normal form
help - Prints this information
exit - Exits the program";

type Outcome = Result<ControlFlow<()>, String>;

fn usage(text: &str) -> String {
    format!("Usage: {}", text)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Split `S -> aB` into its left symbol and right side.
fn parse_rule(tokens: &[&str]) -> Result<(char, String), String> {
    let definition = tokens.join(" ");
    let (lhs, rhs) = definition.split_once("->").ok_or("Invalid rule format. Expected format: <L> -> <R>")?;

    let mut lhs = lhs.trim().chars();
    let lhs = match (lhs.next(), lhs.next()) {
        (Some(c), None) => c,
        _ => return Err("Left side must be a single variable".to_string()),
    };

    let rhs: String = rhs.chars().filter(|c| !c.is_whitespace()).collect();
    if rhs.is_empty() {
        return Err("Right side is empty".to_string());
    }

    Ok((lhs, rhs))
}

fn execute(session: &mut Session, tokens: &[&str]) -> Outcome {
    let err = |e: cfg_workbench::error::Error| e.to_string();

    match tokens {
        ["open", file] => {
            let count = session.open(file).map_err(err)?;
            println!("Successfully opened {} ({} grammar(s))", file, count);
        },
        ["close"] => {
            let path = session.close().map_err(err)?;
            println!("Successfully closed {}", path.display());
        },
        ["save"] => {
            let path = session.save().map_err(err)?;
            println!("Successfully saved {}", path.display());
        },
        ["save", id, file] => {
            session.save_grammar(id, file).map_err(err)?;
            println!("Saved grammar {} to {}", id, file);
        },
        ["saveas", file] => {
            session.save_as(file).map_err(err)?;
            println!("Successfully saved {}", file);
        },
        ["list"] => {
            let ids = session.list();
            if ids.is_empty() {
                println!("No grammars loaded.");
            }
            for id in ids {
                println!("{}", id);
            }
        },
        ["print", id] => print!("{}", session.print(id).map_err(err)?),
        ["addRule", id, rule @ ..] if !rule.is_empty() => {
            let (lhs, rhs) = parse_rule(rule)?;
            let rule_id = session.add_rule(id, lhs, &rhs).map_err(err)?;
            println!("Added rule {} to grammar {}", rule_id, id);
        },
        ["removeRule", id, number] => {
            let number = number.parse::<usize>().map_err(|_| format!("Invalid rule number: {}", number))?;
            let rule = session.remove_rule(id, number).map_err(err)?;
            println!("Removed rule {}", rule);
        },
        ["union", first, second] => {
            let id = session.union(first, second).map_err(err)?;
            println!("Created grammar {}", id);
        },
        ["concat", first, second] => {
            let id = session.concat(first, second).map_err(err)?;
            println!("Created grammar {}", id);
        },
        ["chomsky", id] => {
            if session.chomsky(id).map_err(err)? {
                println!("Grammar {} is in Chomsky normal form", id);
            } else {
                println!("Grammar {} is not in Chomsky normal form", id);
            }
        },
        ["chomskify", id] => match session.chomskify(id).map_err(err)? {
            Some(new_id) => println!("Created grammar {}", new_id),
            None => println!("Grammar {} is already in Chomsky normal form", id),
        },
        ["cyk", id, word @ ..] if word.len() <= 1 => {
            let word = word.first().copied().unwrap_or("");
            let outcome = session.cyk(id, word).map_err(err)?;

            if let Some(table) = outcome.table() {
                print!("{}", table);
            }

            if outcome.accepted() {
                println!("The word '{}' is in the language of {}", word, id);
            } else {
                println!("The word '{}' is not in the language of {}", word, id);
            }
        },
        ["iter", id] => {
            let new_id = session.iter(id).map_err(err)?;
            println!("Created grammar {}", new_id);
        },
        ["empty", id] => {
            let report = session.empty(id).map_err(err)?;

            if report.empty {
                println!("The language of {} is empty", id);
            } else {
                println!("The language of {} is not empty", id);
            }

            if !report.useless.is_empty() {
                let useless: Vec<String> = report.useless.iter().map(char::to_string).collect();
                println!("Useless variables: {}", useless.join(", "));
            }
        },
        ["help"] => println!("{}", HELP),
        ["exit"] => {
            println!("Exiting program...");
            return Ok(ControlFlow::Break(()));
        },
        ["open", ..] => return Err(usage("open <file>")),
        ["save", ..] => return Err(usage("save | save <id> <file>")),
        ["saveas", ..] => return Err(usage("saveas <file>")),
        ["print", ..] => return Err(usage("print <id>")),
        ["addRule", ..] => return Err(usage("addRule <id> <L> -> <R>")),
        ["removeRule", ..] => return Err(usage("removeRule <id> <number>")),
        ["union", ..] | ["concat", ..] => return Err(usage(&format!("{} <id1> <id2>", tokens[0]))),
        ["chomsky", ..] | ["chomskify", ..] | ["iter", ..] | ["empty", ..] => {
            return Err(usage(&format!("{} <id>", tokens[0])));
        },
        ["cyk", ..] => return Err(usage("cyk <id> [word]")),
        _ => return Err("Invalid command. Type 'help' to view all commands.".to_string()),
    }

    Ok(ControlFlow::Continue(()))
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut session = Session::new();

    if let Some(file) = &args.file {
        match session.open(file) {
            Ok(count) => println!("Successfully opened {} ({} grammar(s))", file.display(), count),
            Err(e) => eprintln!("{}", e),
        }
    }

    println!("Type 'help' to view all commands.");

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("-> ");
        let _ = io::stdout().flush();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {},
            Err(e) => {
                eprintln!("{}", e);
                break;
            },
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        match execute(&mut session, &tokens) {
            Ok(ControlFlow::Continue(())) => {},
            Ok(ControlFlow::Break(())) => break,
            Err(e) => println!("{}", e),
        }
    }
}
