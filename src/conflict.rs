use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;

use tracing::{debug, info, warn};

use crate::cmd::Runner;
use crate::error::{LaunchError, LaunchResult};

/// Ports in `range` that appear as a local listening address in a
/// `netstat -tuln` / `ss -tuln` listing.
#[must_use]
pub fn busy_ports(listing: &str, range: &RangeInclusive<u16>) -> BTreeSet<u16> {
    let mut busy = BTreeSet::new();

    for line in listing.lines() {
        for field in line.split_whitespace() {
            let Some((_, port)) = field.rsplit_once(':') else {
                continue;
            };
            if let Ok(port) = port.parse::<u16>()
                && range.contains(&port)
            {
                busy.insert(port);
            }
        }
    }

    busy
}

/// Query the system for bound ports. The check is advisory, so any
/// failure of the status tools counts as "nothing bound".
pub fn scan(runner: &dyn Runner, range: &RangeInclusive<u16>) -> BTreeSet<u16> {
    for program in ["netstat", "ss"] {
        match runner.capture(program, &["-tuln"], None) {
            Ok(listing) => return busy_ports(&listing, range),
            Err(e) => debug!("{program} unavailable: {e}"),
        }
    }
    BTreeSet::new()
}

/// Show the busy ports and ask whether to continue. Only `y` or `yes`
/// counts as consent; EOF declines.
pub fn confirm(
    ports: &BTreeSet<u16>,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> LaunchResult<bool> {
    writeln!(output, "Ports in use: {ports:?}")?;
    writeln!(output, "Some services may fail to start due to port conflicts.")?;
    writeln!(output, "Consider stopping conflicting services or changing ports.")?;
    write!(output, "Continue anyway? (y/N): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();

    Ok(answer == "y" || answer == "yes")
}

/// Scan `range` and, when anything is bound, require confirmation
/// unless `assume_yes` is set. Returns the busy ports.
pub fn check(
    runner: &dyn Runner,
    range: &RangeInclusive<u16>,
    assume_yes: bool,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> LaunchResult<BTreeSet<u16>> {
    info!(
        "Checking for port conflicts in range {}-{}...",
        range.start(),
        range.end()
    );

    let busy = scan(runner, range);
    if busy.is_empty() {
        info!("No port conflicts detected");
        return Ok(busy);
    }

    warn!("Ports in use: {busy:?}");
    if assume_yes || confirm(&busy, input, output)? {
        Ok(busy)
    } else {
        Err(LaunchError::ConflictDeclined(busy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETSTAT: &str = "\
Active Internet connections (only servers)
Proto Recv-Q Send-Q Local Address           Foreign Address         State
tcp        0      0 0.0.0.0:8000            0.0.0.0:*               LISTEN
tcp        0      0 127.0.0.1:5432          0.0.0.0:*               LISTEN
tcp6       0      0 :::8022                 :::*                    LISTEN
udp        0      0 0.0.0.0:68              0.0.0.0:*
";

    #[test]
    fn finds_ports_inside_range() {
        let busy = busy_ports(NETSTAT, &(8000..=8099));
        assert_eq!(busy, BTreeSet::from([8000, 8022]));
    }

    #[test]
    fn ignores_prefix_matches() {
        let listing = "tcp 0 0 0.0.0.0:80001 0.0.0.0:* LISTEN\ntcp 0 0 0.0.0.0:800 0.0.0.0:* LISTEN";
        assert!(busy_ports(listing, &(8000..=8099)).is_empty());
    }
}
