#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod report;

use bootstrap::{AppConfig, init_logging};
use divvy_application::{GroupId, LedgerScope, LedgerService};
use divvy_infrastructure::{GreedySettlementOptimizer, LedgerFile};
use report::ReportPresenter;
use std::{borrow::Cow, env, path::PathBuf, process};

type CliResult<T> = Result<T, Cow<'static, str>>;

const USAGE: &str = "Usage: divvy <ledger.json> [--group <id>] [--check]";

#[derive(Debug, PartialEq)]
enum Invocation {
    Run(CliArgs),
    Help,
}

#[derive(Debug, PartialEq)]
struct CliArgs {
    ledger: PathBuf,
    scope: LedgerScope,
    check: bool,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> CliResult<Invocation> {
        let mut ledger = None;
        let mut scope = LedgerScope::All;
        let mut check = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--check" => check = true,
                "--group" => {
                    let Some(id) = args.next() else {
                        return Err(format!("--group needs a group id\n{USAGE}").into());
                    };
                    scope = LedgerScope::Group(GroupId::new(id));
                }
                "-h" | "--help" => return Ok(Invocation::Help),
                flag if flag.starts_with("--") => {
                    return Err(format!("Unknown option '{flag}'\n{USAGE}").into());
                }
                _ if ledger.is_some() => {
                    return Err(format!("Unexpected argument '{arg}'\n{USAGE}").into());
                }
                _ => ledger = Some(PathBuf::from(arg)),
            }
        }

        let Some(ledger) = ledger else {
            return Err(USAGE.into());
        };
        Ok(Invocation::Run(Self {
            ledger,
            scope,
            check,
        }))
    }
}

fn main() {
    init_logging();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let args = match CliArgs::parse(env::args().skip(1))? {
        Invocation::Run(args) => args,
        Invocation::Help => {
            println!("{USAGE}");
            return Ok(());
        }
    };
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;

    let ledger = LedgerFile::load(&args.ledger).map_err(|err| err.to_string())?;
    let optimizer = GreedySettlementOptimizer;
    let service = LedgerService::new(&ledger, &ledger, &optimizer, config.context);

    let result = service
        .settle(&args.scope)
        .map_err(|err| err.to_string())?;
    print!("{}", ReportPresenter::render(&result, service.context()));

    if args.check {
        let issues = service
            .audit(&args.scope)
            .map_err(|err| err.to_string())?;
        println!();
        print!("{}", ReportPresenter::render_issues(&issues));
    }

    Ok(())
}
