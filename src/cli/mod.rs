//! CLI module for zxip-rs
//!
//! This module handles command line argument parsing and query logic.

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::entity::{formatter, parser};
use crate::error::Result;
use crate::ip::{Address, AddressRange};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zxip-rs")]
#[command(version, about = "Offline IP location lookup against ZX IPDB databases (qqwry.db / ipv6wry.db)")]
#[command(long_about = "zxip-rs looks up IPv4 and IPv6 addresses in the ZX IPDB flat-file\n\
    databases, from command line arguments, a pipe or an interactive prompt.\n\n\
    Examples:\n  \
    $ zxip-rs 1.2.3.4\n  \
    $ zxip-rs 2001:da8::1 ::ffff:8.8.8.8\n  \
    $ echo \"Server IP: 8.8.8.8\" | zxip-rs\n  \
    $ zxip-rs --json 1.2.3.4\n  \
    $ zxip-rs --range 10.0.0.0/8 10.1.2.3 11.0.0.1\n  \
    $ zxip-rs --db-version")]
pub struct Cli {
    /// Addresses or text to look up (read from standard input if none are given)
    #[arg(value_name = "QUERY")]
    pub queries: Vec<String>,

    /// Output JSON
    #[arg(short, long)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// IPv4 database file (qqwry.db)
    #[arg(long, value_name = "PATH")]
    pub ipv4_db: Option<PathBuf>,

    /// IPv6 database file (ipv6wry.db)
    #[arg(long, value_name = "PATH")]
    pub ipv6_db: Option<PathBuf>,

    /// Print the version text of each loaded database
    #[arg(long)]
    pub db_version: bool,

    /// Report whether each QUERY falls inside RANGE (a/len, a-b or a single address)
    #[arg(long, value_name = "RANGE")]
    pub range: Option<String>,
}

impl Cli {
    /// Apply CLI options to config
    pub fn apply(&self, config: &mut AppConfig) {
        if self.json {
            config.output.json = true;
        }
        if self.no_color || !atty::is(atty::Stream::Stdout) {
            config.output.enable_colors = false;
        }
        if self.verbose {
            config.global.verbose = true;
        }
        if let Some(ref path) = self.ipv4_db {
            config.database.ipv4_path = Some(path.to_string_lossy().into_owned());
        }
        if let Some(ref path) = self.ipv6_db {
            config.database.ipv6_path = Some(path.to_string_lossy().into_owned());
        }
    }

    pub fn run(&self, mut config: AppConfig) -> Result<()> {
        self.apply(&mut config);
        let stdout = io::stdout();
        let mut out = stdout.lock();

        // Range checks never touch a database
        if let Some(ref range) = self.range {
            return self.check_range(range, &mut out);
        }

        let db_manager = DatabaseManager::open(&config)?;
        if db_manager.loaded() == 0 {
            log::warn!("No database loaded; every lookup will fail");
        }

        if self.db_version {
            return print_versions(&db_manager, &mut out);
        }

        if !self.queries.is_empty() {
            // Query from command line arguments
            for query in &self.queries {
                process_query(query, &db_manager, &config, &mut out)?;
            }
        } else if atty::is(atty::Stream::Stdin) {
            self.interactive(&db_manager, &config, &mut out)?;
        } else {
            // Pipe mode - annotate each line of stdin
            for line in io::stdin().lock().lines() {
                let line = line?;
                writeln!(out, "{}", annotate_line(&line, &db_manager, &config)?)?;
            }
        }

        out.flush()?;
        Ok(())
    }

    fn interactive<W: Write>(
        &self,
        db_manager: &DatabaseManager,
        config: &AppConfig,
        out: &mut W,
    ) -> Result<()> {
        writeln!(out, "zxip-rs interactive mode (type quit or press Ctrl+D to exit)")?;
        out.flush()?;

        for line in io::stdin().lock().lines() {
            let line = line?;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }
            if trimmed == "quit" || trimmed == "exit" {
                break;
            }

            process_query(trimmed, db_manager, config, out)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Print `RANGE` with its size, then inside/outside for each query
    fn check_range<W: Write>(&self, text: &str, out: &mut W) -> Result<()> {
        let range = AddressRange::parse(text)?;
        writeln!(out, "{} (size: {})", range, range.size())?;

        for query in &self.queries {
            match query.trim().parse::<Address>() {
                Ok(addr) => {
                    let verdict = if range.contains(&addr) { "inside" } else { "outside" };
                    writeln!(out, "{} -> {}", query, verdict)?;
                }
                Err(e) => eprintln!("{} -> {}", query, e),
            }
        }
        Ok(())
    }
}

/// Look up one argument: a bare address prints its record, anything else is
/// annotated like a piped line
pub fn process_query<W: Write>(
    query: &str,
    db_manager: &DatabaseManager,
    config: &AppConfig,
    out: &mut W,
) -> Result<()> {
    let addr = match query.trim().parse::<Address>() {
        Ok(addr) => addr,
        Err(_) => {
            writeln!(out, "{}", annotate_line(query, db_manager, config)?)?;
            return Ok(());
        }
    };

    match db_manager.query(&addr) {
        Ok(record) if config.output.json => writeln!(out, "{}", serde_json::to_string(&record)?)?,
        Ok(record) => writeln!(
            out,
            "{}",
            formatter::format_record(&record, config.output.enable_colors)
        )?,
        Err(e) => eprintln!("{} -> {}", query, e),
    }
    Ok(())
}

/// Annotate every address literal in `line` with its location
///
/// Addresses that cannot be resolved are left as they are.
pub fn annotate_line(line: &str, db_manager: &DatabaseManager, config: &AppConfig) -> Result<String> {
    let mut entities = parser::parse_line(line);

    for entity in entities.ips_mut() {
        let Some(addr) = entity.address else { continue };
        match db_manager.query(&addr) {
            Ok(record) => entity.record = Some(record),
            Err(e) => log::debug!("Lookup of {} failed: {}", entity.text, e),
        }
    }

    // Build complete entities with plain text segments
    let complete = parser::build_complete_entities(line, entities);

    if config.output.json {
        Ok(formatter::format_json(&complete)?)
    } else {
        Ok(formatter::format_text(&complete, config.output.enable_colors))
    }
}

/// Print `name: version` for every loaded database
fn print_versions<W: Write>(db_manager: &DatabaseManager, out: &mut W) -> Result<()> {
    for (name, version) in db_manager.versions() {
        match version {
            Ok(text) => writeln!(out, "{}: {}", name, text)?,
            Err(e) => eprintln!("{} -> {}", name, e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("zxip-rs").chain(args.iter().copied()))
    }

    fn range_output(args: &[&str]) -> String {
        let cli = cli(args);
        let mut out = Vec::new();
        cli.check_range(cli.range.as_deref().unwrap(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_args() {
        let cli = cli(&["--json", "--no-color", "--ipv4-db", "/tmp/q.db", "1.2.3.4", "::1"]);
        assert!(cli.json);
        assert_eq!(cli.queries, vec!["1.2.3.4", "::1"]);

        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert!(config.output.json);
        assert!(!config.output.enable_colors);
        assert_eq!(config.database.ipv4_path.as_deref(), Some("/tmp/q.db"));
        assert!(config.database.ipv6_path.is_none());
    }

    #[test]
    fn test_range_inside_outside() {
        let output = range_output(&["--range", "10.0.0.0/8", "10.1.2.3", "11.0.0.1", "::1"]);
        assert_eq!(
            output,
            "10.0.0.0 - 10.255.255.255 (size: 16777216)\n\
             10.1.2.3 -> inside\n\
             11.0.0.1 -> outside\n\
             ::1 -> outside\n"
        );
    }

    #[test]
    fn test_range_skips_bad_queries() {
        let output = range_output(&["--range", "1.2.3.4-1.2.3.4", "not-an-ip", "1.2.3.4"]);
        assert_eq!(output, "1.2.3.4 - 1.2.3.4 (size: 1)\n1.2.3.4 -> inside\n");
    }

    #[test]
    fn test_bad_range_is_an_error() {
        let cli = cli(&["--range", "1.2.3.4/33"]);
        let mut out = Vec::new();
        assert!(cli.check_range("1.2.3.4/33", &mut out).is_err());
    }
}
