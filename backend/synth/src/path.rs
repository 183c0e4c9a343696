//! Selector path assembly.

use crate::fragment::Fragment;

/// Join a root-to-target fragment path into one selector.
///
/// Paths within `max_depth` keep every level and use child combinators.
/// Longer paths keep the head, at most `max_depth - 2` informative middle
/// fragments (nearest the head first) and the target, joined with descendant
/// combinators since intermediate levels are skipped.
pub fn assemble(path: &[Fragment], max_depth: usize) -> String {
    if path.len() <= max_depth {
        return join(path.iter(), " > ");
    }

    let Some((head, rest)) = path.split_first() else {
        return String::new();
    };
    let Some((tail, middle)) = rest.split_last() else {
        return head.to_string();
    };
    let kept = middle
        .iter()
        .filter(|fragment| fragment.is_informative())
        .take(max_depth.saturating_sub(2));

    join(std::iter::once(head).chain(kept).chain(std::iter::once(tail)), " ")
}

fn join<'a>(fragments: impl Iterator<Item = &'a Fragment>, separator: &str) -> String {
    fragments
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
