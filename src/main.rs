//! The bitchess command line: perft counts, move lists, diagrams and perft suites.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]
#![warn(clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::fs::File;
use std::path::PathBuf;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand, crate_version};
use log::info;
use simplelog::{WriteLogger, LevelFilter, Config};
use chess::{variations, Position, Side};
use bitchess::{notation, suite};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let fen_arg = || {
        Arg::with_name("fen")
            .value_name("FEN_STRING")
            .default_value(START_FEN)
            .hide_default_value(true)
            .help("Position in Forsyth-Edwards Notation (FEN)")
    };

    let matches =
        App::new("bitchess")
            .version(crate_version!())
            .author("Mike Leany")
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .global(true)
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .global(true)
                .value_name("LOG_FILE")
                .takes_value(true)
                .default_value("bitchess.log")
                .help("Sets the log file if logging is turned on"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .takes_value(true)
                .default_value("info")
                .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
                .help("Sets the log level if logging is turned on"))
            .subcommand(SubCommand::with_name("counts")
                .about("Counts the number of variations from a given starting position \
                        to a specified\ndepth. Defaults to the standard starting position.")
                .arg(Arg::with_name("depth")
                    .long("depth")
                    .short("d")
                    .value_name("DEPTH")
                    .takes_value(true)
                    .required(true)
                    .help("Depth to search the position"))
                .arg(fen_arg().multiple(true)))
            .subcommand(SubCommand::with_name("moves")
                .about("Lists the legal moves in a position, after playing any given moves")
                .arg(Arg::with_name("play")
                    .long("play")
                    .short("p")
                    .value_name("MOVE")
                    .takes_value(true)
                    .multiple(true)
                    .help("Moves to play first, in coordinate notation (e2e4, e7e8q)"))
                .arg(fen_arg()))
            .subcommand(SubCommand::with_name("show")
                .about("Shows a diagram of a position")
                .arg(Arg::with_name("black")
                    .long("black")
                    .short("b")
                    .help("Shows the board from black's side"))
                .arg(Arg::with_name("unicode")
                    .long("unicode")
                    .short("u")
                    .help("Uses chess symbols instead of letters"))
                .arg(Arg::with_name("fill")
                    .long("fill")
                    .short("f")
                    .help("Marks empty squares with a dot"))
                .arg(fen_arg()))
            .subcommand(SubCommand::with_name("suite")
                .about("Checks variation counts against a YAML perft suite")
                .arg(Arg::with_name("init")
                    .long("init")
                    .help("Writes the reference suite to FILE instead of running it"))
                .arg(Arg::with_name("max-depth")
                    .long("max-depth")
                    .short("d")
                    .value_name("DEPTH")
                    .takes_value(true)
                    .help("Skips depths greater than DEPTH"))
                .arg(Arg::with_name("file")
                    .value_name("FILE")
                    .required(true)
                    .help("The suite file")))
            .get_matches();

    init_logging(&matches)?;

    match matches.subcommand() {
        ("counts", Some(matches)) => {
            let depth = parse_depth(matches.value_of("depth").expect("INFALLIBLE"))?;

            println!();
            for fen in matches.values_of("fen").expect("INFALLIBLE") {
                let pos = parse_position(fen)?;
                info!("counting variations of depth {} from {}", depth, fen);
                println!("{}", fen);
                let count = variations::print(&pos, depth);
                println!("Depth {} total:\t{:12}\n", depth, count);
            }
        },
        ("moves", Some(matches)) => {
            let mut pos = parse_position(matches.value_of("fen").expect("INFALLIBLE"))?;
            if let Some(moves) = matches.values_of("play") {
                notation::play(&mut pos, moves)
                    .map_err(|m| Error(format!("{}: illegal move", m)))?;
            }

            let moves: Vec<_> = pos.legal_moves().iter().map(|m| m.to_string()).collect();
            println!("{}", pos);
            println!("Check:\t{}", if pos.is_check() { "yes" } else { "no" });
            println!("Moves:\t{}\t{}", moves.len(), moves.join(" "));
        },
        ("show", Some(matches)) => {
            let pos = parse_position(matches.value_of("fen").expect("INFALLIBLE"))?;
            let side = if matches.is_present("black") { Side::Black } else { Side::White };
            let diagram = pos.diagram()
                .orientation(side)
                .unicode(matches.is_present("unicode"))
                .fill_empty(matches.is_present("fill"));
            println!("{}", diagram);
        },
        ("suite", Some(matches)) => {
            let file = PathBuf::from(matches.value_of_os("file").expect("INFALLIBLE"));

            if matches.is_present("init") {
                if file.exists() {
                    return Err(Error(format!("'{}' already exists", file.display())));
                }
                println!("Creating '{}'.", file.display());
                suite::write_file(&file, &suite::reference())?;
            } else {
                let max_depth = matches.value_of("max-depth").map(parse_depth).transpose()?;
                let entries = suite::read(&file)?;
                let report = suite::run(&entries, max_depth, &mut std::io::stdout())?;

                println!("\n{}", report);
                for failure in &report.failures {
                    println!("\t{}", failure);
                }
                if !report.passed() {
                    return Err(Error(format!("{} counts did not match", report.failures.len())));
                }
            }
        },
        _ => unreachable!(),
    }

    Ok(())
}

fn init_logging(matches: &ArgMatches<'_>) -> Result<(), Error> {
    let log_file = PathBuf::from(matches.value_of_os("log-file").expect("INFALLIBLE"));
    let log_level = match matches.value_of("log-level") {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some(level) => return Err(Error(format!("{}: invalid log level", level))),
        None => unreachable!(),
    };

    let _logger = if matches.is_present("log") {
        WriteLogger::init(
            log_level,
            Config::default(),
            File::create(&log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink())
    };

    Ok(())
}

fn parse_depth(s: &str) -> Result<usize, Error> {
    s.parse().map_err(|_| Error("depth must be numeric".to_owned()))
}

fn parse_position(fen: &str) -> Result<Position, Error> {
    fen.parse().map_err(|err| Error(format!("{}: {}", fen, err)))
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

impl From<suite::Error> for Error {
    fn from(err: suite::Error) -> Self {
        Error(err.to_string())
    }
}
