//! Run one query against a nodes file without Telegram, printing what the
//! bot would answer. Handy for checking a file before uploading it.

use nodebot::{answer_query, bot::replies, dataset, SchemaVariant};
use std::{env, process::exit};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <NODES_FILE> <QUERY> [legacy|current|SCHEMA.yaml]", args[0]);
        exit(2);
    }

    let variant = match SchemaVariant::resolve(args.get(3).map(String::as_str).unwrap_or("current")) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(2);
        }
    };

    let table = match dataset::load(&args[1], &variant) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let answers = answer_query(&table, &variant, &args[2]);
    let matched = answers.len();
    if answers.is_empty() {
        println!("{}", replies::NO_MATCHES);
        return;
    }
    for answer in answers {
        match answer {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("skipped: {}", e),
        }
    }
    eprintln!("{} of {} records matched", matched, table.len());
}
