use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sprig_template::format_error;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Template files to compile
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Config file (defaults to sprig.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd, args.config.as_deref())?;
    let compiler = config.compiler()?;

    let mut error_count = 0;

    for file in &args.files {
        let path = PathBuf::from(cwd).join(file);
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "✗".red(), file.display(), e.to_string().red());
                continue;
            }
        };

        match compiler.compile(&source) {
            Ok(_) => println!("  {} {}", "✓".green(), file.display()),
            Err(e) => {
                error_count += 1;
                let at = e.pos().map(|pos| format!(" at byte {}", pos)).unwrap_or_default();
                eprintln!("  {} {}{} - {}", "✗".red(), file.display(), at, e.to_string().red());
                eprintln!("{}", format_error(&source, &file.display().to_string(), &e));
            }
        }
    }

    println!();
    if error_count == 0 {
        println!("{} Checked {} files", "✅".green(), args.files.len());
        Ok(())
    } else {
        anyhow::bail!("{} of {} files failed to compile", error_count, args.files.len())
    }
}
