use std::io::Write;

use optparser::{Opt, OptParser};

use crate::error::Result;

const USAGE: &str = "Usage: optdemo -a VALUE [OPTION]... [ARG]...
Parse the command line and print the options and arguments found.

Options:
";

#[derive(Debug, Clone, PartialEq)]
pub struct Cmdline {
    pub a: String,
    pub b: bool,
    pub count: i32,
    pub ratio: f64,
    pub args: Vec<String>,
}

/// What the command line asks for.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// `--help`: the usage text to print on stdout.
    Help(String),
    Run(Cmdline),
    /// Bad command line: diagnostics followed by the usage text.
    Invalid(String),
}

fn build_parser() -> Result<OptParser> {
    let parser = OptParser::named("optdemo")
        .with_option(Opt::value("a", "long-a").help("option a"))?
        .with_option(Opt::trigger("b", "long-b").optional().help("option b"))?
        .with_option(
            Opt::value("n", "count")
                .optional()
                .help("repeat count")
                .default_val(1),
        )?
        .with_option(
            Opt::value("x", "ratio")
                .optional()
                .help("scale ratio")
                .default_val(0.5),
        )?
        .with_option(Opt::trigger("h", "help").optional().help("print this help"))?;
    Ok(parser)
}

fn usage(parser: &OptParser) -> String {
    format!("{}{}", USAGE, parser)
}

pub fn parse_arguments<I, S>(args: I) -> Result<Outcome>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parser = build_parser()?;

    // Held back so that --help is not drowned in complaints about -a.
    let mut diagnostics = Vec::new();
    let ok = parser.parse_to(args, &mut diagnostics);

    if parser.got_option("help")? {
        return Ok(Outcome::Help(usage(&parser)));
    }
    if !ok {
        let mut text = String::from_utf8_lossy(&diagnostics).into_owned();
        text.push_str(&usage(&parser));
        return Ok(Outcome::Invalid(text));
    }

    Ok(Outcome::Run(Cmdline {
        a: parser.value("a")?,
        b: parser.got_option("b")?,
        count: parser.value("count")?,
        ratio: parser.value("ratio")?,
        args: parser.args().to_vec(),
    }))
}

impl Cmdline {
    pub fn print<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "a = {}", self.a)?;
        writeln!(out, "b = {}", self.b)?;
        writeln!(out, "count = {}", self.count)?;
        writeln!(out, "ratio = {}", self.ratio)?;
        for (i, arg) in self.args.iter().enumerate() {
            writeln!(out, "arg[{}] = {}", i, arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Cmdline {
        match parse_arguments(args.iter().copied()).unwrap() {
            Outcome::Run(cmd) => cmd,
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn defaults() {
        let cmd = run(&["-afoo"]);
        assert_eq!(
            cmd,
            Cmdline {
                a: "foo".to_string(),
                b: false,
                count: 1,
                ratio: 0.5,
                args: vec![],
            }
        );
    }

    #[test]
    fn all_options() {
        let cmd = run(&["--long-a", "x", "-b", "-n", "4", "--ratio=2.5", "p1", "p2"]);
        assert_eq!(cmd.a, "x");
        assert!(cmd.b);
        assert_eq!(cmd.count, 4);
        assert_eq!(cmd.ratio, 2.5);
        assert_eq!(cmd.args, ["p1", "p2"]);
    }

    #[test]
    fn malformed_count_is_zero() {
        assert_eq!(run(&["-a", "v", "--count=many"]).count, 0);
    }

    #[test]
    fn help_wins_over_missing_mandatory() {
        match parse_arguments(["--help"]).unwrap() {
            Outcome::Help(text) => {
                assert!(text.starts_with("Usage: optdemo"));
                assert!(text.contains("-n/--count=: repeat count (default: 1)\n"));
                assert!(!text.contains("warning"));
            }
            other => panic!("expected Help, got {:?}", other),
        }
    }

    #[test]
    fn missing_mandatory_is_invalid() {
        match parse_arguments(["-b"]).unwrap() {
            Outcome::Invalid(text) => {
                assert!(text.starts_with(
                    "optdemo: warning: mandatory option -a/--long-a= is missing\n"
                ));
                assert!(text.contains("Usage: optdemo"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn unknown_option_is_invalid() {
        assert!(matches!(
            parse_arguments(["-afoo", "-z"]).unwrap(),
            Outcome::Invalid(_)
        ));
    }

    #[test]
    fn print_cmdline() {
        let cmd = run(&["-a", "v", "one", "two"]);
        let mut out = Vec::new();
        cmd.print(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a = v\nb = false\ncount = 1\nratio = 0.5\narg[0] = one\narg[1] = two\n"
        );
    }
}
