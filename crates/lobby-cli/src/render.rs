//! Plain-text rendering of reveal state for the terminal.

use lobby_core::policy::{RevealReport, RevealState, ThresholdCountdown};

/// One aligned line: label, stage, and when it next changes.
pub fn line(label: &str, state: RevealState, next: Option<&ThresholdCountdown>) -> String {
  let stage = if state.is_unknown() {
    "not yet scheduled".to_owned()
  } else {
    state.to_string()
  };
  match next {
    Some(t) => format!("{label:<14} {stage:<18} next change in {}", t.countdown),
    None => format!("{label:<14} {stage}"),
  }
}

/// Every line of a report, ticket first.
pub fn report(report: &RevealReport) -> Vec<String> {
  let mut lines = vec![
    format!("as of {} ({})", report.as_of.format("%Y-%m-%d %H:%M:%S UTC"), report.role),
    line("ticket", report.ticket, report.ticket_next.as_ref()),
    line("destination", report.destination, report.destination_next.as_ref()),
  ];
  for (i, activity) in report.activities.iter().enumerate() {
    lines.push(line(&format!("activity {}", i + 1), activity.state, activity.next.as_ref()));
  }
  lines
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use lobby_core::{
    countdown::Countdown,
    reveal::{RevealKind, TicketStage},
  };

  use super::*;

  #[test]
  fn unknown_reads_as_not_yet_scheduled() {
    let l = line("ticket", RevealState::Unknown(RevealKind::Departure), None);
    assert!(l.ends_with("not yet scheduled"), "{l}");
  }

  #[test]
  fn countdown_is_appended_when_a_change_is_coming() {
    let at = Utc.with_ymd_and_hms(2026, 1, 15, 13, 0, 0).unwrap();
    let next = ThresholdCountdown {
      kind:      RevealKind::Departure,
      at,
      countdown: Countdown::Remaining { hours: 1, minutes: 30, seconds: 0 },
    };
    let l = line("ticket", RevealState::Departure(TicketStage::QrOnly), Some(&next));
    assert!(l.contains("qr_only"), "{l}");
    assert!(l.ends_with("next change in 1h 30m 0s"), "{l}");
  }
}
