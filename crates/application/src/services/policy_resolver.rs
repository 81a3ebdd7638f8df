//! Per-call policy resolution
//!
//! Merges a method's static fault-injection policy with overrides carried in
//! the call's metadata. Malformed overrides are ignored, never fatal.

use std::borrow::Cow;
use std::time::Duration;

use domain::{FaultInjectionPolicy, MaxFaults, StatusCode};
use tracing::debug;

use crate::ports::MetadataView;

/// Longest delay a header override may request; longer values are ignored
pub const MAX_DELAY_OVERRIDE: Duration = Duration::from_secs(60 * 60);

/// Produce the effective policy for one call
///
/// Returns `None` only when no static policy is configured. The static policy
/// is borrowed as-is unless at least one override header applies, in which
/// case an owned copy carries the overridden values.
pub fn resolve<'p, M>(
    policy: Option<&'p FaultInjectionPolicy>,
    metadata: &M,
) -> Option<Cow<'p, FaultInjectionPolicy>>
where
    M: MetadataView + ?Sized,
{
    let policy = policy?;
    let headers = &policy.headers;
    let mut resolved = Cow::Borrowed(policy);
    if headers.is_empty() {
        return Some(resolved);
    }

    if let Some(code) = lookup(metadata, headers.abort_code.as_deref(), parse_status_code) {
        resolved.to_mut().abort_code = code;
    }
    if let Some(numerator) = lookup(metadata, headers.abort_percentage.as_deref(), parse_u32) {
        let target = resolved.to_mut();
        target.abort_percentage = target.abort_percentage.with_numerator(numerator);
    }
    if let Some(delay) = lookup(metadata, headers.delay.as_deref(), parse_millis) {
        resolved.to_mut().delay = delay;
    }
    if let Some(numerator) = lookup(metadata, headers.delay_percentage.as_deref(), parse_u32) {
        let target = resolved.to_mut();
        target.delay_percentage = target.delay_percentage.with_numerator(numerator);
    }
    if let Some(max) = lookup(metadata, headers.max_faults.as_deref(), parse_u32) {
        resolved.to_mut().max_faults = MaxFaults::limited(max);
    }

    Some(resolved)
}

fn lookup<M, T>(metadata: &M, header: Option<&str>, parse: fn(&str) -> Option<T>) -> Option<T>
where
    M: MetadataView + ?Sized,
{
    let header = header?;
    let raw = metadata.get(header)?;
    let parsed = parse(raw);
    if parsed.is_none() {
        debug!(
            header = header,
            value = raw,
            "Ignoring malformed fault-injection override"
        );
    }
    parsed
}

fn parse_status_code(raw: &str) -> Option<StatusCode> {
    raw.parse().ok()
}

fn parse_u32(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

fn parse_millis(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse()
        .ok()
        .map(Duration::from_millis)
        .filter(|delay| *delay <= MAX_DELAY_OVERRIDE)
}
