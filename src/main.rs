use clap::{App, Arg};
use flexi_logger::Logger;
use log::debug;

use echeance::{
    cli::{self, table::Table},
    load::{self, error::Record},
    Instant,
};

fn main() {
    let matches = App::new("echeance")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Due dates and reminder slots for recurring bills")
        .arg(
            Arg::with_name("FILE")
                .help("Rule file to read")
                .index(1)
                .default_value("reminders.ech"),
        )
        .arg(
            Arg::with_name("now")
                .long("now")
                .takes_value(true)
                .value_name("YYYY-MM-DD HH:MM")
                .help("Plan as if it were this instant instead of the local clock"),
        )
        .arg(
            Arg::with_name("count")
                .long("count")
                .short("n")
                .takes_value(true)
                .default_value("1")
                .help("Number of upcoming reminders to show per bill"),
        )
        .arg(
            Arg::with_name("all")
                .long("all")
                .short("a")
                .help("Also list bills that have no reminder"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more, repeat for more details"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _logger = match Logger::try_with_env_or_str(level).and_then(|logger| logger.start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("logging disabled: {}", e);
            None
        }
    };

    let mut errs = Record::new();
    let now = match matches.value_of("now") {
        Some(raw) => cli::read_now(raw, &mut errs),
        None => Some(Instant::from(chrono::Local::now().naive_local())),
    };
    let count = cli::read_count(matches.value_of("count").unwrap_or("1"), &mut errs);
    let (now, count) = match (now, count) {
        (Some(now), Some(count)) => (now, count),
        _ => {
            eprint!("{}", errs);
            std::process::exit(2);
        }
    };
    debug!("planning reminders after {}", now);

    let filename = matches.value_of("FILE").unwrap_or("reminders.ech");
    let bills = load::read_rules(filename, &mut errs);
    eprint!("{}", errs);
    let bills = match bills {
        Some(bills) => bills,
        None => std::process::exit(1),
    };

    let lines = cli::agenda(&bills, now, count, matches.is_present("all"));
    print!(
        "{}",
        Table::from(&lines).with_title(format!("Reminders after {}", now))
    );
}
