use std::path::PathBuf;
use std::process;

use getopts::Options;

pub struct Args {
    pub pdf_path: PathBuf,
    pub output_dir: PathBuf,
    pub revision: u32,
    pub dry_run: bool,
    pub json: bool,
    pub verbose: bool,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "o",
        "output-dir",
        "Directory the .ics file is written to [Default: output]",
        "DIR",
    );
    opts.optopt(
        "r",
        "revision",
        "Sequence number stamped on every event, bump it to push updates [Default: 0]",
        "N",
    );
    opts.optflag(
        "n",
        "dry-run",
        "Print the extracted slots without writing the .ics file",
    );
    opts.optflag(
        "j",
        "json",
        "Print the extracted slots as JSON instead of generating the .ics",
    );
    opts.optflag("v", "verbose", "Enable debug output of parsing details");
    opts
}

fn usage(opts: &Options) -> String {
    opts.usage(&format!(
        "Usage: {} <planning.pdf> [options]",
        env!("CARGO_PKG_NAME")
    ))
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", usage(&opts));
        process::exit(0);
    }

    let Some(pdf_path) = matches.free.first() else {
        eprintln!("{}", usage(&opts));
        process::exit(1);
    };

    let output_dir = match matches.opt_get_default("output-dir", PathBuf::from("output")) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("Provided value for option 'output-dir' is invalid: {err}");
            process::exit(1);
        }
    };

    let revision = match matches.opt_get_default("revision", 0) {
        Ok(revision) => revision,
        Err(err) => {
            eprintln!("Provided value for option 'revision' is invalid: {err}");
            process::exit(1);
        }
    };

    Args {
        pdf_path: PathBuf::from(pdf_path),
        output_dir,
        revision,
        dry_run: matches.opt_present("dry-run"),
        json: matches.opt_present("json"),
        verbose: matches.opt_present("verbose"),
    }
}
