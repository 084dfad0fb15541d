//! Terminal output helpers for the console.

use chrono::{DateTime, Local};
use std::net::Ipv4Addr;

/// Prompt shown before each command.
pub const PROMPT: &str = "Command [? for help] > ";

/// Help text, one entry per line.
pub fn menu() -> Vec<String> {
    [
        "Commands:",
        "",
        "  ?                            show this menu",
        "  q                            quit",
        "  all                          retrieve all stored addresses and netmasks",
        "  add <network> <netmask>      add a network to the match list",
        "                               ex: add 192.168.1.0 255.255.255.0",
        "  del <network>                remove a network from the match list",
        "                               ex: del 192.168.1.0",
        "  exists <network> <netmask>   check if network exists in match list",
        "                               ex: exists 192.168.1.0 255.255.255.0",
        "  match <address>              test if an address matches something",
        "                               ex: match 192.168.1.36",
        "  cache                        list cached matches and when they matched",
        "",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Format a cached hit as a left-aligned address followed by its timestamp.
pub fn format_cached(addr: Ipv4Addr, at: &DateTime<Local>) -> String {
    let addr = addr.to_string();
    format!("  {addr:<15}  {}", at.format("%Y-%m-%d %H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_cached() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            format_cached(Ipv4Addr::new(10, 0, 0, 9), &at),
            "  10.0.0.9         2024-03-09 07:05:01"
        );
    }

    #[test]
    fn test_format_cached_wide_address() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            format_cached(Ipv4Addr::new(192, 168, 100, 200), &at),
            "  192.168.100.200  2024-03-09 07:05:01"
        );
    }

    #[test]
    fn test_menu_lists_commands() {
        let menu = menu();
        for cmd in ["all", "add", "del", "exists", "match", "cache"] {
            assert!(menu.iter().any(|l| l.trim_start().starts_with(cmd)), "{cmd} missing");
        }
    }
}
