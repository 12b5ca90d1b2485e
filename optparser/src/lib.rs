//! Small command-line option parser.
//!
//! Options are registered up front, the argument vector is parsed in a
//! single pass, and results are queried by short or long name:
//! - `Opt::value("o", "output")` / `Opt::trigger("v", "verbose")` describe options
//! - `parser.parse(args)` returns `false` if anything was wrong with the input,
//!   after reporting every problem on stderr
//! - `parser.value::<T>("o")` and `parser.got_option("verbose")` read results
//! - `parser.args()` returns the positional arguments
//!
//! ```
//! use optparser::{Opt, OptParser};
//!
//! let mut parser = OptParser::new()
//!     .with_option(Opt::value("n", "count").optional().default_val(1))?
//!     .with_option(Opt::trigger("v", "verbose").optional())?;
//!
//! assert!(parser.parse(["-n3", "input.txt"]));
//! assert_eq!(parser.value::<i32>("count")?, 3);
//! assert!(!parser.got_option("v")?);
//! assert_eq!(parser.args(), ["input.txt"]);
//! # Ok::<(), optparser::Error>(())
//! ```

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, trace};

mod convert;
pub mod token;

pub use convert::FromOptValue;
use token::Token;

// ============================================================================
// Result and Error types
// ============================================================================

pub type Result<T> = std::result::Result<T, Error>;

/// Misuse of the parser by the hosting program.
///
/// Problems with the parsed input itself are [`Warning`]s, not errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate option {0}")]
    DuplicateOption(String),

    #[error("invalid option: {0}")]
    InvalidName(String),

    #[error("options not parsed")]
    NotParsed,

    #[error("no option with name '{0}'")]
    UnknownName(String),

    #[error("invalid value '{value}' for type {target}")]
    BadValue { value: String, target: &'static str },
}

/// A problem found in the arguments during [`OptParser::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A value option got no value, either because another option followed
    /// it (`got`) or because the arguments ran out.
    MissingValue { option: String, got: Option<String> },
    /// An option token that matches no registered option.
    UnknownOption(String),
    /// A mandatory option that never appeared.
    MissingMandatoryOption(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingValue { option, got: None } => {
                write!(f, "expected value for option {}", option)
            }
            Warning::MissingValue {
                option,
                got: Some(got),
            } => write!(
                f,
                "expected value for option {}, got option '{}' instead",
                option, got
            ),
            Warning::UnknownOption(arg) => write!(f, "unknown option '{}'", arg),
            Warning::MissingMandatoryOption(option) => {
                write!(f, "mandatory option {} is missing", option)
            }
        }
    }
}

// ============================================================================
// Opt — option description
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptKind {
    /// Takes a value, inline (`-ofile`, `--output=file`) or as the next argument.
    Value,
    /// Boolean flag; only its presence is recorded.
    Trigger,
}

/// Description of one option. Options are mandatory unless `.optional()`
/// is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opt {
    short_name: String,
    long_name: String,
    kind: OptKind,
    optional: bool,
    help: String,
    default_value: String,
}

impl Opt {
    /// Either name may be empty, but not both.
    pub fn new(short_name: &str, long_name: &str, kind: OptKind) -> Self {
        Opt {
            short_name: short_name.to_string(),
            long_name: long_name.to_string(),
            kind,
            optional: false,
            help: String::new(),
            default_value: String::new(),
        }
    }

    pub fn value(short_name: &str, long_name: &str) -> Self {
        Self::new(short_name, long_name, OptKind::Value)
    }

    pub fn trigger(short_name: &str, long_name: &str) -> Self {
        Self::new(short_name, long_name, OptKind::Trigger)
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.optional = false;
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = text.to_string();
        self
    }

    /// Value reported when the option is not given on the command line.
    pub fn default_val<T: fmt::Display>(mut self, v: T) -> Self {
        self.default_value = v.to_string();
        self
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn kind(&self) -> OptKind {
        self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn help_text(&self) -> &str {
        &self.help
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    fn takes_value(&self) -> bool {
        self.kind == OptKind::Value
    }

    /// `-s/--long=` style name used in help and diagnostics. The trailing
    /// `=` marks a value option with a long name.
    pub fn display_name(&self) -> String {
        let mut res = String::new();
        if !self.short_name.is_empty() {
            res.push('-');
            res.push_str(&self.short_name);
            if !self.long_name.is_empty() {
                res.push('/');
            }
        }
        if !self.long_name.is_empty() {
            res.push_str("--");
            res.push_str(&self.long_name);
            if self.takes_value() {
                res.push('=');
            }
        }
        res
    }

    /// `-s/--long` without the value marker.
    fn names(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if !self.short_name.is_empty() {
            parts.push(format!("-{}", self.short_name));
        }
        if !self.long_name.is_empty() {
            parts.push(format!("--{}", self.long_name));
        }
        parts.join("/")
    }

    fn conflicts_with(&self, other: &Opt) -> bool {
        (!self.short_name.is_empty() && self.short_name == other.short_name)
            || (!self.long_name.is_empty() && self.long_name == other.long_name)
    }

    fn validate(&self) -> Result<()> {
        if self.short_name.is_empty() && self.long_name.is_empty() {
            return Err(Error::InvalidName(
                "option needs a short or a long name".to_string(),
            ));
        }
        if self.short_name.chars().count() > 1 {
            return Err(Error::InvalidName(format!(
                "short name '{}' must be a single character",
                self.short_name
            )));
        }
        Ok(())
    }
}

// ============================================================================
// OptParser
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct OptResult {
    value: String,
    present: bool,
}

/// Option registry plus the results of the last parse.
#[derive(Debug, Default)]
pub struct OptParser {
    name: Option<String>,
    options: Vec<Opt>,
    results: Vec<OptResult>,
    args: Vec<String>,
    warnings: Vec<Warning>,
}

impl OptParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser whose diagnostics are prefixed with `name: `.
    pub fn named(name: &str) -> Self {
        OptParser {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Register an option. Fails if either of its names is already taken.
    ///
    /// Registering after a parse invalidates the results until the next
    /// parse.
    pub fn add_option(&mut self, opt: Opt) -> Result<()> {
        opt.validate()?;
        if let Some(existing) = self.options.iter().find(|o| opt.conflicts_with(o)) {
            return Err(Error::DuplicateOption(existing.names()));
        }
        trace!(option = %opt.display_name(), "registered option");
        self.options.push(opt);
        Ok(())
    }

    pub fn with_option(mut self, opt: Opt) -> Result<Self> {
        self.add_option(opt)?;
        Ok(self)
    }

    /// Registered options, in registration order.
    pub fn options(&self) -> &[Opt] {
        &self.options
    }

    /// Index of the option whose short or long name is `name`.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.options
            .iter()
            .position(|o| o.short_name == name || o.long_name == name)
    }

    fn find_by_short(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|o| o.short_name == name)
    }

    fn find_by_long(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|o| o.long_name == name)
    }

    // ------------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------------

    /// Parse `args` (without the program name), reporting problems on stderr.
    ///
    /// Returns `true` if no warning was raised. Parsing never stops early:
    /// every problem in the input is reported once.
    pub fn parse<I, S>(&mut self, args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stderr = io::stderr();
        let mut out = stderr.lock();
        self.parse_to(args, &mut out)
    }

    /// Parse the arguments of the current process.
    pub fn parse_env(&mut self) -> bool {
        self.parse(std::env::args().skip(1))
    }

    /// Like [`parse`](Self::parse), writing diagnostics to `out`.
    pub fn parse_to<I, S, W>(&mut self, args: I, out: &mut W) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        W: Write,
    {
        self.run(args);
        for warning in &self.warnings {
            let _ = match &self.name {
                Some(name) => writeln!(out, "{}: warning: {}", name, warning),
                None => writeln!(out, "warning: {}", warning),
            };
        }
        self.warnings.is_empty()
    }

    fn run<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.results = self
            .options
            .iter()
            .map(|o| OptResult {
                value: o.default_value.clone(),
                present: false,
            })
            .collect();
        self.args.clear();
        self.warnings.clear();

        // Value option still waiting for its value.
        let mut expecting: Option<usize> = None;

        for arg in args {
            let arg: String = arg.into();

            let (found, inline) = match token::classify(&arg) {
                Token::Short { name, inline } => (self.find_by_short(name), inline),
                Token::Long { name, inline } => (self.find_by_long(name), inline),
                Token::Text => {
                    match expecting.take() {
                        Some(idx) => {
                            debug!(option = %self.options[idx].display_name(), value = %arg, "bound value");
                            self.results[idx].value = arg;
                        }
                        None => {
                            debug!(arg = %arg, "positional argument");
                            self.args.push(arg);
                        }
                    }
                    continue;
                }
            };

            if let Some(pending) = expecting.take() {
                self.warnings.push(Warning::MissingValue {
                    option: self.options[pending].display_name(),
                    got: Some(arg.clone()),
                });
            }

            let Some(idx) = found else {
                debug!(arg = %arg, "unknown option");
                self.warnings.push(Warning::UnknownOption(arg.clone()));
                continue;
            };

            self.results[idx].present = true;
            if self.options[idx].takes_value() {
                match inline {
                    Some(value) => {
                        debug!(option = %self.options[idx].display_name(), value, "bound inline value");
                        self.results[idx].value = value.to_string();
                    }
                    None => expecting = Some(idx),
                }
            } else {
                debug!(option = %self.options[idx].display_name(), "trigger set");
            }
        }

        if let Some(pending) = expecting {
            self.warnings.push(Warning::MissingValue {
                option: self.options[pending].display_name(),
                got: None,
            });
        }

        self.warnings.extend(
            self.options
                .iter()
                .zip(&self.results)
                .filter(|(opt, res)| !opt.optional && !res.present)
                .map(|(opt, _)| Warning::MissingMandatoryOption(opt.display_name())),
        );
    }

    // ------------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------------

    fn result_index(&self, name: &str) -> Result<usize> {
        if self.results.len() != self.options.len() {
            return Err(Error::NotParsed);
        }
        self.lookup(name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    /// Whether the option was given in the last parse.
    pub fn got_option(&self, name: &str) -> Result<bool> {
        let idx = self.result_index(name)?;
        Ok(self.results[idx].present)
    }

    /// Value of the option after the last parse, or its default.
    ///
    /// Conversion is permissive: a malformed number converts to zero.
    /// Use [`value_strict`](Self::value_strict) to reject it instead.
    pub fn value<T: FromOptValue>(&self, name: &str) -> Result<T> {
        let idx = self.result_index(name)?;
        Ok(T::from_opt_value(&self.results[idx].value))
    }

    pub fn value_strict<T: FromOptValue>(&self, name: &str) -> Result<T> {
        let idx = self.result_index(name)?;
        T::try_from_opt_value(&self.results[idx].value)
    }

    pub fn raw_value(&self, name: &str) -> Result<&str> {
        let idx = self.result_index(name)?;
        Ok(&self.results[idx].value)
    }

    /// Positional arguments of the last parse, in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Warnings raised by the last parse.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    // ------------------------------------------------------------------------
    // Help
    // ------------------------------------------------------------------------

    /// Write the option table, one line per option.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)
    }
}

impl fmt::Display for OptParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for opt in &self.options {
            write!(f, "{:>20}: {}", opt.display_name(), opt.help)?;
            if !opt.default_value.is_empty() {
                write!(f, " (default: {})", opt.default_value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
