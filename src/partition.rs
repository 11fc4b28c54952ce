//! Balanced partitioning of item lengths into lines.
//!
//! Given the visible lengths of items to be joined (words or larger
//! fragments, with a one-unit separator between items on the same line),
//! pick the break indices that make the resulting line lengths as even as
//! possible. Small line counts are solved exactly; larger ones, or very
//! long texts, fall back to a halving approximation that stays fast.

/// Upper line count and joined-length bound for the exact search.
const EXACT_MAX_LINES: usize = 5;
const EXACT_LENGTH_FACTOR: usize = 5;

/// Break indices (an index `i` means a line break before item `i`) that
/// split `lengths` into at most `max_lines` lines of even visible length.
pub(crate) fn balanced_breaks(lengths: &[usize], max_lines: usize, max_length: usize) -> Vec<usize> {
    let lines = max_lines.min(lengths.len());
    match lines {
        0 | 1 => Vec::new(),
        2 => split_in_two(lengths).into_iter().collect(),
        _ if lines <= EXACT_MAX_LINES
            && joined_length(lengths) <= EXACT_LENGTH_FACTOR * max_length =>
        {
            exact_breaks(lengths, lines)
        }
        _ => halved_breaks(lengths, lines, max_length),
    }
}

/// Visible length of the items joined on one line.
fn joined_length(lengths: &[usize]) -> usize {
    lengths.iter().sum::<usize>() + lengths.len().saturating_sub(1)
}

/// The single break index that divides `lengths` into the two most even
/// lines, or `None` for fewer than two items.
///
/// The left side only grows while scanning, so the first candidate where
/// the right side is the shorter one is past the minimum and ends the scan.
fn split_in_two(lengths: &[usize]) -> Option<usize> {
    if lengths.len() < 2 {
        return None;
    }
    let total = joined_length(lengths);
    let mut best = (usize::MAX, 1);
    let mut left = 0;
    for index in 1..lengths.len() {
        left += lengths[index - 1] + usize::from(index > 1);
        let right = total - left - 1;
        let diff = left.abs_diff(right);
        if diff < best.0 {
            best = (diff, index);
        }
        if right < left {
            break;
        }
    }
    Some(best.1)
}

/// Bounded brute force: try every viable first break, solve the remainder
/// for one line less, and keep the split with the least spread around the
/// mean line length. First segments longer than the mean line are not
/// scanned; a longer first line cannot even the split out (a speed
/// heuristic, not a guarantee).
fn exact_breaks(lengths: &[usize], lines: usize) -> Vec<usize> {
    if lines <= 1 || lengths.len() <= 1 {
        return Vec::new();
    }
    if lines == 2 {
        return split_in_two(lengths).into_iter().collect();
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = (joined_length(lengths) - (lines - 1)) as f64 / lines as f64;
    let mut best: Option<(f64, Vec<usize>)> = None;
    for index in 1..=lengths.len() - (lines - 1) {
        let mut breaks = vec![index];
        breaks.extend(
            exact_breaks(&lengths[index..], lines - 1)
                .into_iter()
                .map(|b| b + index),
        );
        let spread = squared_deviation(lengths, &breaks);
        if best.as_ref().is_none_or(|(s, _)| spread < *s) {
            best = Some((spread, breaks));
        }
        #[allow(clippy::cast_precision_loss)]
        if joined_length(&lengths[..index]) as f64 > mean {
            break;
        }
    }
    best.map_or_else(Vec::new, |(_, breaks)| breaks)
}

/// Approximation for many lines or long texts: solve the halved line count
/// first, then split each of those segments in two. Odd line counts round
/// down to even.
fn halved_breaks(lengths: &[usize], lines: usize, max_length: usize) -> Vec<usize> {
    let halves = lines / 2;
    let coarse = if halves <= 1 {
        Vec::new()
    } else if halves == 2 {
        split_in_two(lengths).into_iter().collect()
    } else if halves <= EXACT_MAX_LINES {
        exact_breaks(lengths, halves)
    } else {
        halved_breaks(lengths, halves, max_length)
    };
    let mut breaks = Vec::new();
    let mut start = 0;
    for end in coarse.iter().copied().chain(std::iter::once(lengths.len())) {
        if let Some(mid) = split_in_two(&lengths[start..end]) {
            breaks.push(start + mid);
        }
        if end < lengths.len() {
            breaks.push(end);
        }
        start = end;
    }
    breaks
}

/// Per-line visible lengths for `lengths` split at `breaks`.
fn line_lengths(lengths: &[usize], breaks: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(breaks.len() + 1);
    let mut start = 0;
    for end in breaks.iter().copied().chain(std::iter::once(lengths.len())) {
        out.push(joined_length(&lengths[start..end]));
        start = end;
    }
    out
}

/// Sum of squared deviations of the line lengths from their mean.
#[allow(clippy::cast_precision_loss)]
fn squared_deviation(lengths: &[usize], breaks: &[usize]) -> f64 {
    let lines = line_lengths(lengths, breaks);
    let mean = lines.iter().sum::<usize>() as f64 / lines.len() as f64;
    lines
        .iter()
        .map(|&len| (len as f64 - mean).powi(2))
        .sum()
}
