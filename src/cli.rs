//! Clap adapter for clapini.
//!
//! Compiled only with the `clap` Cargo feature (on by default). The reader
//! itself knows nothing about clap; this module turns a result table into
//! argument defaults, so config files sit below the command line:
//!
//! ```ignore
//! let defaults = reader.read_config()?;
//! let matches = apply_default_map(Cli::command(), &defaults).get_matches();
//! ```
//!
//! Root-level values become defaults of the args with the same id. A nested
//! table whose key names a subcommand is applied to that subcommand.
//! Anything else is ignored. [`apply_schema_help`] lends param help texts
//! to args that have none of their own.

use clap::Command;
use toml::{Table, Value};

use crate::schema::SectionSchema;

/// Install `defaults` as default values on `cmd` and its subcommands.
pub fn apply_default_map(mut cmd: Command, defaults: &Table) -> Command {
    for (key, value) in defaults {
        match value {
            Value::Table(nested) => {
                if cmd.find_subcommand(key).is_some() {
                    cmd = cmd.mut_subcommand(key, |sub| apply_default_map(sub, nested));
                } else {
                    log::trace!("no subcommand '{key}' for nested defaults, ignoring");
                }
            }
            _ if has_arg(&cmd, key) => {
                let values = default_strings(value);
                cmd = cmd.mut_arg(key, |arg| arg.default_values(values));
            }
            _ => log::trace!("no argument '{key}' on '{}', ignoring", cmd.get_name()),
        }
    }
    cmd
}

/// Use each param's help text for the root arg with the param's name, when
/// that arg has no help yet.
pub fn apply_schema_help<'a, I>(mut cmd: Command, schemas: I) -> Command
where
    I: IntoIterator<Item = &'a SectionSchema>,
{
    for schema in schemas {
        for (key, param) in schema.params() {
            let Some(help) = param.help_text() else {
                continue;
            };
            let id = param.name().unwrap_or(key);
            let needs_help = cmd
                .get_arguments()
                .any(|a| a.get_id().as_str() == id && a.get_help().is_none());
            if needs_help {
                let help = help.to_string();
                cmd = cmd.mut_arg(id, |arg| arg.help(help));
            }
        }
    }
    cmd
}

fn has_arg(cmd: &Command, id: &str) -> bool {
    cmd.get_arguments().any(|a| a.get_id().as_str() == id)
}

fn default_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().flat_map(default_strings).collect(),
        Value::String(s) => vec![s.clone()],
        other => vec![other.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction, value_parser};

    fn hello_command() -> Command {
        Command::new("hello")
            .arg(Arg::new("name").long("name"))
            .arg(
                Arg::new("number")
                    .long("number")
                    .value_parser(value_parser!(i64)),
            )
            .subcommand(
                Command::new("foo").arg(
                    Arg::new("numbers")
                        .long("numbers")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(i64)),
                ),
            )
    }

    fn defaults(toml: &str) -> Table {
        toml.parse().unwrap()
    }

    #[test]
    fn root_values_become_arg_defaults() {
        let cmd = apply_default_map(hello_command(), &defaults("name = \"Alice\"\nnumber = 2\n"));
        let m = cmd.try_get_matches_from(["hello"]).unwrap();
        assert_eq!(m.get_one::<String>("name").map(String::as_str), Some("Alice"));
        assert_eq!(m.get_one::<i64>("number"), Some(&2));
    }

    #[test]
    fn command_line_overrides_defaults() {
        let cmd = apply_default_map(hello_command(), &defaults("name = \"Alice\"\n"));
        let m = cmd.try_get_matches_from(["hello", "--name", "Bob"]).unwrap();
        assert_eq!(m.get_one::<String>("name").map(String::as_str), Some("Bob"));
    }

    #[test]
    fn nested_table_targets_subcommand() {
        let cmd = apply_default_map(hello_command(), &defaults("[foo]\nnumbers = [1, 2, 3]\n"));
        let m = cmd.try_get_matches_from(["hello", "foo"]).unwrap();
        let sub = m.subcommand_matches("foo").unwrap();
        let numbers: Vec<i64> = sub.get_many::<i64>("numbers").unwrap().copied().collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cmd = apply_default_map(
            hello_command(),
            &defaults("unknown = 1\n[\"hello.more.bar\"]\nnumbers = [1]\n"),
        );
        let m = cmd.try_get_matches_from(["hello"]).unwrap();
        assert_eq!(m.get_one::<String>("name"), None);
    }

    fn help_of(cmd: &Command, id: &str) -> Option<String> {
        cmd.get_arguments()
            .find(|a| a.get_id().as_str() == id)
            .and_then(|a| a.get_help())
            .map(|h| h.to_string())
    }

    #[test]
    fn schema_help_fills_missing_arg_help() {
        use crate::param::Param;

        let schema = SectionSchema::builder("Hello")
            .matches_section("hello")
            .param("name", Param::string().help("Who to greet."))
            .param("number", Param::integer().help("How many times."))
            .build()
            .unwrap();
        let cmd = hello_command().mut_arg("name", |a| a.help("Given name."));

        let cmd = apply_schema_help(cmd, [&schema]);
        assert_eq!(help_of(&cmd, "name").as_deref(), Some("Given name."));
        assert_eq!(help_of(&cmd, "number").as_deref(), Some("How many times."));
    }

    #[test]
    fn scalar_values_are_stringified() {
        let values = default_strings(&Value::Boolean(true));
        assert_eq!(values, vec!["true"]);
        let values = default_strings(&Value::Float(1.5));
        assert_eq!(values, vec!["1.5"]);
    }
}
