//! Taskbar reconciliation.
//!
//! Merges the fixed list of pinned apps with the live window set into the
//! ordered list of [`DockEntry`]s for one redraw.  The list is recomputed
//! from scratch every time; it is `O(entries × windows)`, which is fine
//! for a handful of windows.

use crate::app::{DockEntry, MatchPolicy, MatchStrategy, PinnedApp};
use crate::command::WindowInfo;
use log::trace;

/// Produce the dock content for `pinned` apps and the live `windows`.
///
/// 1. Every pinned app starts as one unbound entry, in configured order.
/// 2. Each window (in host order) is matched against the pinned entries
///    of the working list according to `policy`.
/// 3. If the matched entry is already bound, a new copy of the same app is
///    inserted right after it and bound to the window; otherwise the entry
///    is bound directly.
/// 4. Windows that match nothing are appended as unpinned entries.
pub fn reconcile(
    pinned: &[PinnedApp],
    windows: &[WindowInfo],
    policy: &MatchPolicy,
) -> Vec<DockEntry> {
    let mut entries: Vec<DockEntry> = (0..pinned.len())
        .map(|pinned| DockEntry::Pinned {
            pinned,
            window: None,
        })
        .collect();

    for window in windows {
        match find_match(&entries, pinned, window, policy) {
            Some(pos) => {
                let DockEntry::Pinned { pinned: app, window: bound } = &mut entries[pos] else {
                    continue;
                };
                if bound.is_some() {
                    let app = *app;
                    trace!("{} joins group of {}", window.id, pinned[app].key);
                    entries.insert(
                        pos + 1,
                        DockEntry::Pinned {
                            pinned: app,
                            window: Some(window.id.clone()),
                        },
                    );
                } else {
                    trace!("{} bound to {}", window.id, pinned[*app].key);
                    *bound = Some(window.id.clone());
                }
            }
            None => {
                trace!("{} is unpinned", window.id);
                entries.push(DockEntry::Unpinned {
                    window: window.id.clone(),
                });
            }
        }
    }

    entries
}

/// Position of the entry `window` belongs to, if any.
fn find_match(
    entries: &[DockEntry],
    pinned: &[PinnedApp],
    window: &WindowInfo,
    policy: &MatchPolicy,
) -> Option<usize> {
    let candidates = || {
        entries
            .iter()
            .enumerate()
            .filter_map(|(pos, e)| e.pinned_index().map(|i| (pos, &pinned[i])))
    };

    match policy.strategy {
        MatchStrategy::EntryFirst => candidates()
            .find(|(_, app)| policy.matches(app, window))
            .map(|(pos, _)| pos),
        MatchStrategy::RuleFirst => policy.rules.iter().find_map(|rule| {
            candidates()
                .find(|(_, app)| rule.matches(app, window))
                .map(|(pos, _)| pos)
        }),
    }
}
