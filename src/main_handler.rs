use crate::*;

use ansi_term::Color::*;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn write_file(path: PathBuf, s: &str) -> Result<(), String> {
    match File::create(path) {
        Ok(mut file) => write!(file, "{}", s).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn pretty_error(title: &str, e: typecheck::Error) -> String {
    format!(
        "{} {}{}",
        Red.bold().paint(format!("{}:", title)),
        ansi_term::Style::new().bold().paint(e.message),
        e.context
            .into_iter()
            .map(|ctx| format!("\n    - in {}", ctx))
            .collect::<Vec<_>>()
            .join("")
    )
}

fn error_title(e: &typecheck::Error) -> &'static str {
    match e.kind {
        typecheck::ErrorKind::Type => "type error",
        typecheck::ErrorKind::Scope => "scope error",
        typecheck::ErrorKind::Format => "format error",
    }
}

fn lift(e: typecheck::Error) -> String {
    pretty_error(error_title(&e), e)
}

pub fn config(path: Option<PathBuf>) -> Result<config::Config, String> {
    match path {
        None => Ok(config::Config::default()),
        Some(path) => {
            let src =
                std::fs::read_to_string(path).map_err(|e| e.to_string())?;
            parse::config(&src).map_err(|e| pretty_error("config error", e))
        }
    }
}

pub fn interact(
    config: config::Config,
    assignment: usize,
    variant: usize,
    json: Option<PathBuf>,
) -> Result<(), String> {
    if let Some(path) = &json {
        let ok = match path.parent() {
            Some(parent) => parent.exists(),
            None => false,
        };
        if !ok {
            return Err(format!(
                "{} invalid json path '{}'",
                Red.bold().paint("error:"),
                path.display()
            ));
        }
    }

    let mut session = session::Session::new(config);
    session.load_starter_code(assignment, variant).map_err(lift)?;
    session.load_unit_tests(assignment).map_err(lift)?;

    let mut controller = session.controller().map_err(lift)?;

    let mut round = 0;
    while !controller.valid() {
        round += 1;

        let options = controller.provide().map_err(lift)?;

        let state = controller.working_expression();
        let banner = format!("══ Round {} {}", round, "═".repeat(40));
        println!(
            "{}\n\n{}\n\n{}\n\n{}\n",
            Fixed(8).paint(banner),
            Cyan.bold().paint("Working expression:"),
            render::tree(&state.zipper.to_expr(), state.zipper.cursor_index()),
            Cyan.bold().paint("Possible next steps:"),
        );

        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}", i + 1, Yellow.paint(option.to_string()));
        }

        let idx = loop {
            print!(
                "\n{} {}\n\n> ",
                Purple.bold().paint("Which step would you like to take?"),
                Fixed(8).paint("('q' to quit, 'u' to undo)"),
            );
            std::io::stdout().flush().map_err(|e| e.to_string())?;

            let mut input = String::new();
            std::io::stdin()
                .read_line(&mut input)
                .map_err(|e| e.to_string())?;
            let input = input.trim();

            if input == "q" {
                return Ok(());
            }

            if input == "u" {
                break None;
            }

            match input.parse::<usize>() {
                Ok(choice) if 1 <= choice && choice <= options.len() => {
                    break Some(choice - 1)
                }
                _ => continue,
            };
        };

        match idx {
            Some(idx) => {
                controller.decide(options[idx]);
            }
            None => {
                controller.undo();
            }
        }
    }

    let state = controller.working_expression().clone();
    session.commit(&state).map_err(lift)?;

    println!(
        "\n{}\n\n{}",
        Green.bold().paint("All unit tests pass! Final program:"),
        render::tree(&state.zipper.to_expr(), state.zipper.cursor_index())
    );

    if let Some(json) = json {
        let contents = unparse::exp(&state.zipper.to_expr()).map_err(lift)?;
        match write_file(json, &contents) {
            Ok(()) => (),
            Err(e) => eprintln!("file write error: {}\njson:\n{}", e, contents),
        };
    }

    Ok(())
}

pub fn check(
    config: config::Config,
    assignment: usize,
    program: PathBuf,
) -> Result<(), String> {
    let src = std::fs::read_to_string(program).map_err(|e| e.to_string())?;
    let e = parse::exp(&src).map_err(lift)?;

    let mut session = session::Session::new(config);
    session.load_unit_tests(assignment).map_err(lift)?;
    session.load_program(e, Some(assignment)).map_err(lift)?;

    if session.check_unit_tests(0).map_err(lift)? {
        println!("{}", Green.bold().paint("All unit tests pass"));
    } else {
        println!("{}", Red.bold().paint("Some unit tests fail"));
    }

    Ok(())
}

pub fn observe(
    config: config::Config,
    assignment: usize,
    variant: usize,
) -> Result<(), String> {
    let mut session = session::Session::new(config);
    session.load_starter_code(assignment, variant).map_err(lift)?;
    session.load_unit_tests(assignment).map_err(lift)?;
    let obs = session.observe().map_err(lift)?;
    println!("{}", unparse::observation(&obs).map_err(lift)?);
    Ok(())
}
