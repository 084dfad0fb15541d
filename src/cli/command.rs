//! Console command parsing and dispatch.

use super::terminal::{format_cached, menu};
use crate::error::MatcherError;
use crate::matcher::Matcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    All,
    Cache,
    Add { network: String, netmask: String },
    Del { network: String },
    Exists { network: String, netmask: String },
    Match { address: String },
}

/// Parse one console line. Unknown commands and wrong argument counts give `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_lowercase();
    let args: Vec<&str> = line.split_whitespace().collect();
    let command = match args.as_slice() {
        ["?"] => Command::Help,
        ["q"] => Command::Quit,
        ["all"] => Command::All,
        ["cache"] => Command::Cache,
        ["add", network, netmask] => Command::Add {
            network: network.to_string(),
            netmask: netmask.to_string(),
        },
        ["del", network] => Command::Del {
            network: network.to_string(),
        },
        ["exists", network, netmask] => Command::Exists {
            network: network.to_string(),
            netmask: netmask.to_string(),
        },
        ["match", address] => Command::Match {
            address: address.to_string(),
        },
        _ => return None,
    };
    Some(command)
}

/// Run `command` against the matcher and return the lines to show the user.
pub fn execute(matcher: &Matcher, command: &Command) -> Result<Vec<String>, MatcherError> {
    let lines = match command {
        Command::Help => menu(),
        Command::Quit => vec![],
        Command::All => {
            let all = matcher.all();
            if all.is_empty() {
                vec!["(none)".to_string()]
            } else {
                all.iter().map(|a| format!("  {a}")).collect()
            }
        }
        Command::Cache => {
            let cached = matcher.cached();
            if cached.is_empty() {
                vec!["(none)".to_string()]
            } else {
                cached.iter().map(|(a, t)| format_cached(*a, t)).collect()
            }
        }
        Command::Add { network, netmask } => {
            matcher.add(network, netmask)?;
            vec![]
        }
        Command::Del { network } => {
            matcher.remove(network)?;
            vec![]
        }
        Command::Exists { network, netmask } => {
            if matcher.exists(network, netmask)? {
                vec![format!("{network} {netmask} exists")]
            } else {
                vec![format!("{network} {netmask} does not exist")]
            }
        }
        Command::Match { address } => {
            if matcher.match_exists(address)? {
                vec![format!("{address} matches")]
            } else {
                vec![format!("{address} does not match")]
            }
        }
    };
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("?"), Some(Command::Help));
        assert_eq!(parse_command("  Q  "), Some(Command::Quit));
        assert_eq!(parse_command("ALL"), Some(Command::All));
        assert_eq!(
            parse_command("add 192.168.1.0   255.255.255.0"),
            Some(Command::Add {
                network: "192.168.1.0".to_string(),
                netmask: "255.255.255.0".to_string()
            })
        );
        assert_eq!(
            parse_command("match 10.0.0.1"),
            Some(Command::Match {
                address: "10.0.0.1".to_string()
            })
        );
    }

    #[test]
    fn test_parse_command_wrong_arity() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("add 10.0.0.0"), None);
        assert_eq!(parse_command("del"), None);
        assert_eq!(parse_command("del 10.0.0.0 255.0.0.0"), None);
        assert_eq!(parse_command("match"), None);
        assert_eq!(parse_command("frobnicate"), None);
    }

    #[test]
    fn test_execute_session() {
        let matcher = Matcher::new();
        assert_eq!(execute(&matcher, &Command::All).unwrap(), vec!["(none)"]);

        let add = parse_command("add 192.168.1.10 255.255.255.0").unwrap();
        assert!(execute(&matcher, &add).unwrap().is_empty());
        assert_eq!(
            execute(&matcher, &Command::All).unwrap(),
            vec!["  192.168.1.0/255.255.255.0"]
        );

        let matched = parse_command("match 192.168.1.36").unwrap();
        assert_eq!(execute(&matcher, &matched).unwrap(), vec!["192.168.1.36 matches"]);
        assert_eq!(execute(&matcher, &Command::Cache).unwrap().len(), 1);

        let exists = parse_command("exists 192.168.1.0 255.255.255.0").unwrap();
        assert_eq!(
            execute(&matcher, &exists).unwrap(),
            vec!["192.168.1.0 255.255.255.0 exists"]
        );

        let del = parse_command("del 192.168.1.0").unwrap();
        execute(&matcher, &del).unwrap();
        assert_eq!(
            execute(&matcher, &matched).unwrap(),
            vec!["192.168.1.36 does not match"]
        );
        assert_eq!(execute(&matcher, &Command::Cache).unwrap(), vec!["(none)"]);
    }

    #[test]
    fn test_execute_invalid_address() {
        let matcher = Matcher::new();
        let cmd = parse_command("match 10.0.0.999").unwrap();
        assert_eq!(
            execute(&matcher, &cmd).unwrap_err(),
            MatcherError::invalid_address("10.0.0.999")
        );
    }
}
