//! Clock time helpers used by the availability scheduler

/// Converts an `"H:MM"` or `"HH:MM"` clock time into minutes since midnight
///
/// The components are not range checked: `"25:70"` yields `1570`. Callers are
/// expected to validate the format beforehand. Anything that does not produce
/// a number (a missing `:`, a non-numeric component, overflow) yields `None`.
/// An empty component such as the minutes of `"09:"` has no value either.
///
/// # Example
///
/// ```
/// use ignitecall::utils::time_in_minutes;
///
/// assert_eq!(time_in_minutes("09:30"), Some(570));
/// assert_eq!(time_in_minutes("nine thirty"), None);
/// ```
pub fn time_in_minutes(time: &str) -> Option<i64> {
  let mut parts = time.split(':');
  let hours = parts.next()?.trim().parse::<i64>().ok()?;
  let minutes = parts.next()?.trim().parse::<i64>().ok()?;

  hours.checked_mul(60)?.checked_add(minutes)
}
