//! State machine turning an argument vector into [`ResolvedArgs`].

use super::{ARGS_KEY, ArgvGrammar, Arity, DASH_KEY, OptionSpec, ResolvedArgs, kebab_to_camel};
use crate::{PropsError, PropsResult};

const FLAG_VALUES: [&str; 2] = ["true", "false"];

/// Tokenizer bound to one grammar.
///
/// Scanning stops at the first `--`; every later token is positional.
/// The tokenizer either returns the complete result or fails without a
/// partial one.
#[derive(Clone, Copy, Debug)]
pub struct ArgvTokenizer<'g> {
    grammar: &'g ArgvGrammar,
    preset_flags: bool,
}

impl<'g> ArgvTokenizer<'g> {
    /// Tokenizer for `grammar`.
    #[must_use]
    pub const fn new(grammar: &'g ArgvGrammar) -> Self {
        Self {
            grammar,
            preset_flags: false,
        }
    }

    /// Record `false` for every declared flag before scanning, so absent
    /// flags still produce a value.
    #[must_use]
    pub const fn preset_flags(mut self, preset: bool) -> Self {
        self.preset_flags = preset;
        self
    }

    /// Tokenize `argv`.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::IllegalArgumentSyntax`] when an option token
    /// starts with `=`, or when a bundle of single-character flags contains
    /// a declared non-flag option.
    pub fn tokenize<S: AsRef<str>>(&self, argv: &[S]) -> PropsResult<ResolvedArgs> {
        let args: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
        let stop = args.iter().position(|arg| *arg == "--").unwrap_or(args.len());
        let mut out = ResolvedArgs::default();

        if self.preset_flags {
            for spec in self.grammar.specs().filter(|s| s.arity() == Arity::Flag) {
                out.slot(spec.name()).push(Some("false".to_owned()));
            }
        }

        let mut idx = 0;
        while let Some(&arg) = args.get(idx).filter(|_| idx < stop) {
            idx += 1;
            if arg == "-" {
                self.add(&mut out, DASH_KEY, Some("true"));
                continue;
            }
            let (body, double) = match arg.strip_prefix("--") {
                Some(body) => (body, true),
                None => match arg.strip_prefix('-') {
                    Some(body) => (body, false),
                    None => {
                        self.add(&mut out, ARGS_KEY, Some(arg));
                        continue;
                    }
                },
            };

            if let Some(eq) = body.find('=') {
                if eq == 0 {
                    return Err(PropsError::argument(arg, "option name is empty"));
                }
                let (name, assigned) = body.split_at(eq);
                let value = assigned.strip_prefix('=').filter(|v| !v.is_empty());
                self.add(&mut out, &kebab_to_camel(name), value);
                continue;
            }

            let name = kebab_to_camel(body);
            let declared = self.grammar.resolve(&name);
            if !double && declared.is_none() {
                self.single_dash(&mut out, arg, body)?;
                continue;
            }

            let next = args
                .get(idx)
                .copied()
                .filter(|next| idx < stop && !next.starts_with('-'));
            let value = if declared.is_some_and(|s| s.arity() == Arity::Flag) {
                match next {
                    Some(flag) if FLAG_VALUES.contains(&flag) => {
                        idx += 1;
                        Some(flag)
                    }
                    _ => Some("true"),
                }
            } else {
                if next.is_some() {
                    idx += 1;
                }
                next
            };
            self.add(&mut out, &name, value);
        }

        for arg in args.iter().skip(stop).copied().filter(|arg| *arg != "--") {
            self.add(&mut out, ARGS_KEY, Some(arg));
        }
        Ok(out)
    }

    /// Handle a single-dash token that is not a declared option: either
    /// `-oVALUE` for a declared non-flag `o`, or a bundle of flags.
    fn single_dash(&self, out: &mut ResolvedArgs, arg: &str, body: &str) -> PropsResult<()> {
        let mut chars = body.chars();
        let Some(first) = chars.next() else {
            return Ok(());
        };
        let head = first.to_string();
        if self.grammar.resolve(&head).is_some_and(takes_value) {
            self.add(out, &head, Some(chars.as_str()));
            return Ok(());
        }
        for ch in body.chars() {
            let name = ch.to_string();
            if let Some(spec) = self.grammar.resolve(&name).filter(|s| takes_value(s)) {
                return Err(PropsError::argument(
                    arg,
                    format!(
                        "Opt `{ch}` must be a flag option, but is `{}`",
                        spec.arity().marker()
                    ),
                ));
            }
            self.add(out, &name, Some("true"));
        }
        Ok(())
    }

    fn add(&self, out: &mut ResolvedArgs, name: &str, value: Option<&str>) {
        let spec = self.grammar.resolve(name);
        let key = spec.map_or(name, OptionSpec::name);
        let resolved = value
            .or_else(|| spec.and_then(OptionSpec::default_value))
            .map(str::to_owned);
        let slot = out.slot(key);
        if spec.is_some_and(|s| s.arity() == Arity::Flag) {
            slot.clear();
        }
        slot.push(resolved);
    }
}

fn takes_value(spec: &OptionSpec) -> bool {
    spec.arity() != Arity::Flag
}
