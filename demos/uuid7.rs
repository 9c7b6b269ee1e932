//! Simple command that prints one or '-n count' UUID strings, version 7 unless '-4' is given

use std::{env, io, io::Write, process::ExitCode};

fn main() -> io::Result<ExitCode> {
    let mut args = env::args();
    let program = args.next();
    let opts = match parse_args(args) {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!(
                "Usage: {} [-4] [-n count]",
                program.as_deref().unwrap_or("uuid7")
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    let generate = if opts.v4 {
        subms_uuid7::try_uuid4
    } else {
        subms_uuid7::try_uuid7
    };

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..opts.count.unwrap_or(1) {
        match generate() {
            Ok(uuid) => writeln!(buf, "{}", uuid)?,
            Err(err) => {
                buf.flush()?;
                eprintln!("Error: {}", err);
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    buf.flush()?;

    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Default)]
struct Opts {
    count: Option<usize>,
    v4: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Opts, String> {
    let mut opts = Opts::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-4" => opts.v4 = true,
            "-n" => {
                if opts.count.is_some() {
                    return Err("option 'n' given more than once".to_owned());
                }
                let Some(n_arg) = args.next() else {
                    return Err("argument to option 'n' missing".to_owned());
                };
                let Ok(c) = n_arg.parse() else {
                    return Err(format!("invalid argument to option 'n': '{}'", n_arg));
                };
                opts.count.replace(c);
            }
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        }
    }
    Ok(opts)
}
