//! roster-cli: headless duty-roster tools.
//!
//! Usage:
//!   roster-cli --db plan.db init
//!   roster-cli --db plan.db preview --file vorplanung.xlsx --year 2026 [--month 3]
//!   roster-cli --db plan.db import  --file vorplanung.xlsx --year 2026 [--month 3]
//!   roster-cli --db plan.db quota   --year 2026 [--month 3] [--json]

use anyhow::{bail, Context, Result};
use roster_core::{
    config::{self, CoreSettings},
    importer,
    quota::QuotaEngine,
    store::RosterStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = str_arg(&args, "--db").unwrap_or_else(|| "roster.db".to_string());
    let Some(command) = find_command(&args) else {
        bail!("no command given (expected init, preview, import or quota)");
    };

    log::debug!("opening database '{db}'");
    let store = RosterStore::open(&db).with_context(|| format!("opening database '{db}'"))?;
    store.migrate()?;
    let settings = CoreSettings::load(&store)?;

    let json = args.iter().any(|a| a == "--json");
    let year = int_arg(&args, "--year").unwrap_or(settings.year);
    let month = int_arg(&args, "--month").map(|m| m as u32);

    match command.as_str() {
        "init" => {
            settings.save(&store)?;
            println!("initialized database '{db}' (department {})", settings.department);
        }
        "preview" => {
            let file = require_file(&args, &settings)?;
            let preview = importer::preview_duty_roster(&store, &file, year, month)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                println!("rows:       {}", preview.total);
                println!("matched:    {}", preview.matched);
                println!("overwrites: {}", preview.overwrites);
                for name in &preview.unmatched_names {
                    println!("unmatched:  {name}");
                }
            }
        }
        "import" => {
            let file = require_file(&args, &settings)?;
            let report = importer::import_duty_roster(
                &store,
                &file,
                year,
                month,
                &Default::default(),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.message);
            }
            if !report.success {
                std::process::exit(1);
            }
        }
        "quota" => {
            let classifier = config::load_classifier(&store)?;
            let engine = QuotaEngine::new(&store, classifier, settings.department);
            match month {
                Some(m) => {
                    let report = engine.month_report(year, m)?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        println!(
                            "{year}-{m:02}: demand {} over {} active staff (avg load {:.2})",
                            report.position_demand, report.active_staff,
                            report.average_combined_load
                        );
                        for t in &report.targets {
                            println!(
                                "  {:<25} load {:>2}  target {:>3}  (weighted {:>3})",
                                format!("{}, {}", t.surname, t.given_name),
                                t.combined_load,
                                t.target,
                                t.target_heavy_weighted
                            );
                        }
                    }
                }
                None => {
                    let report = engine.year_report(year)?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        println!("{year}: yearly targets");
                        for s in &report.staff {
                            println!(
                                "  {:<25} target {:>3}  driven {:>3}  remaining {:>4}",
                                format!("{}, {}", s.surname, s.given_name),
                                s.yearly_target,
                                s.yearly_driven,
                                s.remaining
                            );
                        }
                    }
                }
            }
        }
        other => bail!("unknown command '{other}'"),
    }

    Ok(())
}

/// First positional argument, skipping flags and their values.
fn find_command(args: &[String]) -> Option<String> {
    const VALUE_FLAGS: [&str; 4] = ["--db", "--file", "--year", "--month"];
    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        if VALUE_FLAGS.contains(&arg.as_str()) {
            i += 2;
        } else if arg.starts_with("--") {
            i += 1;
        } else {
            return Some(arg.clone());
        }
    }
    None
}

fn str_arg(args: &[String], name: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].clone())
}

fn int_arg(args: &[String], name: &str) -> Option<i32> {
    str_arg(args, name).and_then(|v| v.parse().ok())
}

fn require_file(args: &[String], settings: &CoreSettings) -> Result<String> {
    str_arg(args, "--file")
        .or_else(|| settings.roster_import_path.clone())
        .context("no --file given and no rosterImportPath configured")
}
