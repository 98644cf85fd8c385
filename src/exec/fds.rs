// src/exec/fds.rs

//! Descriptor hygiene: close everything above the standard streams.
//!
//! Planning ([`plan_fd_closure`]) is pure and decides *which* numbers to
//! close; [`close_inherited_fds`] asks the platform for its view of the
//! descriptor table, plans, and closes. Closing is best effort: a number that
//! is not open is simply skipped.

use tracing::{debug, info, warn};

use crate::sys::Platform;
use crate::types::{FIRST_NON_STD_FD, Fd, FdStrategy, MAX_SCAN_FD};

/// How the candidate set was actually produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FdScanMethod {
    /// Exactly the descriptors the platform reported as open.
    Enumerated,
    /// `3..=max_fd`.
    Range { max_fd: Fd },
    /// `3..limit`, with `limit` already capped at [`MAX_SCAN_FD`].
    Limit { limit: Fd },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdPlan {
    pub method: FdScanMethod,
    pub candidates: Vec<Fd>,
}

/// Result of one hygiene pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdReport {
    pub method: FdScanMethod,
    /// Numbers a `close` was attempted on.
    pub scanned: usize,
    /// Numbers that were actually open and got closed.
    pub closed: usize,
}

/// Choose the descriptors to close.
///
/// `listed` is the platform's enumeration (if any), `limit` its soft
/// descriptor limit (if any). Fallback order when the requested source is
/// unavailable: enumeration, then limit, then the fixed range.
pub fn plan_fd_closure(
    strategy: FdStrategy,
    max_fd: Fd,
    listed: Option<Vec<Fd>>,
    limit: Option<u64>,
) -> FdPlan {
    match strategy {
        FdStrategy::Range => range_plan(max_fd),
        FdStrategy::Limit => match limit {
            Some(limit) => limit_plan(limit),
            None => {
                warn!("descriptor limit unavailable; using fixed range");
                range_plan(max_fd)
            }
        },
        FdStrategy::Enumerate | FdStrategy::Auto => match listed {
            Some(fds) => enumerated_plan(fds),
            None => {
                if strategy == FdStrategy::Enumerate {
                    warn!("descriptor enumeration unavailable; falling back");
                } else {
                    debug!("descriptor enumeration unavailable; falling back");
                }
                match limit {
                    Some(limit) => limit_plan(limit),
                    None => range_plan(max_fd),
                }
            }
        },
    }
}

fn enumerated_plan(mut fds: Vec<Fd>) -> FdPlan {
    fds.retain(|fd| *fd >= FIRST_NON_STD_FD);
    fds.sort_unstable();
    fds.dedup();
    FdPlan {
        method: FdScanMethod::Enumerated,
        candidates: fds,
    }
}

fn range_plan(max_fd: Fd) -> FdPlan {
    FdPlan {
        method: FdScanMethod::Range { max_fd },
        candidates: (FIRST_NON_STD_FD..=max_fd).collect(),
    }
}

fn limit_plan(limit: u64) -> FdPlan {
    let limit = Fd::try_from(limit).unwrap_or(MAX_SCAN_FD).min(MAX_SCAN_FD);
    FdPlan {
        method: FdScanMethod::Limit { limit },
        candidates: (FIRST_NON_STD_FD..limit).collect(),
    }
}

/// Close every inherited descriptor above the standard streams.
pub fn close_inherited_fds<P: Platform>(
    platform: &mut P,
    strategy: FdStrategy,
    max_fd: Fd,
) -> FdReport {
    let listed = match strategy {
        FdStrategy::Auto | FdStrategy::Enumerate => platform.list_open_fds(),
        FdStrategy::Range | FdStrategy::Limit => None,
    };
    let plan = plan_fd_closure(strategy, max_fd, listed, platform.fd_limit());

    let mut closed = 0;
    for fd in plan.candidates.iter().copied() {
        if platform.close_fd(fd) {
            debug!(fd, "closed inherited descriptor");
            closed += 1;
        }
    }

    let report = FdReport {
        method: plan.method,
        scanned: plan.candidates.len(),
        closed,
    };
    info!(
        method = ?report.method,
        scanned = report.scanned,
        closed = report.closed,
        "descriptor hygiene finished"
    );
    report
}
