//! Command-line option parsing.
//!
//! Options are numbered by their position in an [`OptSpec`] table. Parsing
//! sets one bit of a mask per supplied option and stores its argument;
//! handlers consume the options they act on, and whatever is still set
//! afterwards is reported in a single [`CliError::UnexpectedOptions`].
//!
//! Accepted forms are `--name`, `--name=value` and `--name value`.

use crate::error::CliError;

/// Most options a table may declare, one mask bit each.
pub const MAX_OPTIONS: usize = u32::BITS as usize;

/// Option accepted by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptSpec {
    /// Name without the leading `--`.
    pub name: &'static str,
    pub has_arg: bool,
}

impl OptSpec {
    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            has_arg: false,
        }
    }

    pub const fn with_arg(name: &'static str) -> Self {
        Self {
            name,
            has_arg: true,
        }
    }
}

/// Options found on the command line for one option table.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    specs: &'static [OptSpec],
    mask: u32,
    args: Vec<Option<String>>,
}

impl OptionSet {
    pub fn new(specs: &'static [OptSpec]) -> Self {
        debug_assert!(specs.len() <= MAX_OPTIONS, "too many options");
        Self {
            specs,
            mask: 0,
            args: vec![None; specs.len()],
        }
    }

    /// Parses the options at the front of `args` and returns the arguments
    /// after them.
    pub fn parse_leading<'a>(&mut self, args: &'a [String]) -> Result<&'a [String], CliError> {
        let mut i = 0;
        while let Some(arg) = args.get(i).filter(|arg| arg.starts_with("--")) {
            i += self.parse_one(arg, args.get(i + 1))?;
        }
        Ok(&args[i..])
    }

    /// Parses options anywhere in `args` and returns the positional
    /// arguments, in order.
    pub fn parse(&mut self, args: &[String]) -> Result<Vec<String>, CliError> {
        let mut positional = Vec::new();
        let mut i = 0;
        while let Some(arg) = args.get(i) {
            if arg.starts_with("--") {
                i += self.parse_one(arg, args.get(i + 1))?;
            } else {
                positional.push(arg.clone());
                i += 1;
            }
        }
        Ok(positional)
    }

    /// Records one option; returns how many arguments it used.
    fn parse_one(&mut self, arg: &str, next: Option<&String>) -> Result<usize, CliError> {
        let body = arg.strip_prefix("--").unwrap_or(arg);
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let index = self
            .specs
            .iter()
            .position(|spec| spec.name == name)
            .ok_or_else(|| CliError::InvalidOption(arg.to_owned()))?;
        let spec = self.specs[index];

        let (value, used) = match (spec.has_arg, value) {
            (true, Some(value)) => (Some(value.to_owned()), 1),
            (true, None) => match next {
                Some(value) if !value.starts_with("--") => (Some(value.clone()), 2),
                _ => return Err(CliError::MissingArgument(spec.name)),
            },
            (false, None) => (None, 1),
            (false, Some(_)) => return Err(CliError::UnexpectedArgument(spec.name)),
        };

        self.mask |= 1 << index;
        self.args[index] = value;
        Ok(used)
    }

    /// Returns whether option `index` was supplied and not consumed yet.
    #[inline]
    pub fn is_set(&self, index: usize) -> bool {
        self.mask & (1 << index) != 0
    }

    /// Consumes option `index`. Returns whether it was supplied.
    pub fn take(&mut self, index: usize) -> bool {
        let set = self.is_set(index);
        self.mask &= !(1 << index);
        set
    }

    /// Consumes option `index` and returns its argument.
    pub fn take_arg(&mut self, index: usize) -> Option<String> {
        if self.take(index) {
            self.args[index].take()
        } else {
            None
        }
    }

    /// Names of the supplied options nobody consumed.
    pub fn remaining(&self) -> impl Iterator<Item = &'static str> {
        let mask = self.mask;
        self.specs
            .iter()
            .enumerate()
            .filter(move |(i, _)| mask & (1 << *i) != 0)
            .map(|(_, spec)| spec.name)
    }

    /// Fails if any supplied option was left unconsumed.
    pub fn finish(&self) -> Result<(), CliError> {
        if self.mask == 0 {
            return Ok(());
        }
        Err(CliError::UnexpectedOptions(self.remaining().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: &[OptSpec] = &[
        OptSpec::flag("a"),
        OptSpec::flag("b"),
        OptSpec::flag("c"),
        OptSpec::with_arg("value"),
    ];

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unconsumed_options_are_aggregated() {
        let mut options = OptionSet::new(SPECS);
        options.parse(&args(&["--a", "--b", "--c"])).unwrap();
        assert!(options.take(0));

        let err = options.finish().unwrap_err();
        assert!(matches!(&err, CliError::UnexpectedOptions(names) if names == &["b", "c"]));
        assert_eq!(err.to_string(), "unexpected option(s): --b, --c");
    }

    #[test]
    fn test_all_consumed() {
        let mut options = OptionSet::new(SPECS);
        options.parse(&args(&["--c"])).unwrap();
        assert!(!options.take(0));
        assert!(options.take(2));
        options.finish().unwrap();
    }

    #[test]
    fn test_argument_forms() {
        for form in [&["--value=7"][..], &["--value", "7"][..]] {
            let mut options = OptionSet::new(SPECS);
            let positional = options.parse(&args(form)).unwrap();
            assert!(positional.is_empty());
            assert_eq!(options.take_arg(3).as_deref(), Some("7"));
            assert_eq!(options.take_arg(3), None);
        }
    }

    #[test]
    fn test_positionals_between_options() {
        let mut options = OptionSet::new(SPECS);
        let positional = options
            .parse(&args(&["--a", "dpbp.1", "--value=x", "extra"]))
            .unwrap();
        assert_eq!(positional, ["dpbp.1", "extra"]);
    }

    #[test]
    fn test_invalid_options() {
        let mut options = OptionSet::new(SPECS);
        assert!(matches!(
            options.parse(&args(&["--d"])),
            Err(CliError::InvalidOption(opt)) if opt == "--d"
        ));
        assert!(matches!(
            options.parse(&args(&["--value"])),
            Err(CliError::MissingArgument("value"))
        ));
        assert!(matches!(
            options.parse(&args(&["--value", "--a"])),
            Err(CliError::MissingArgument("value"))
        ));
        assert!(matches!(
            options.parse(&args(&["--a=1"])),
            Err(CliError::UnexpectedArgument("a"))
        ));
    }

    #[test]
    fn test_parse_leading_stops_at_positional() {
        let mut options = OptionSet::new(SPECS);
        let list = args(&["--a", "dpbp", "--b"]);
        let rest = options.parse_leading(&list).unwrap();
        assert_eq!(rest, ["dpbp", "--b"]);
        assert!(options.is_set(0));
        assert!(!options.is_set(1));
    }
}
