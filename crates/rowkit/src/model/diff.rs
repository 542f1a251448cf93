//! Snapshot differ.
//!
//! [`diff`] compares two item sequences and produces an [`EditScript`]: the
//! removals, moves, insertions and content changes that turn the old
//! sequence into the new one. Rows are matched with the old item's
//! [`Item::same_identity`](super::Item::same_identity) predicate using the
//! linear-space variant of Myers' O((N+M)D) algorithm. Unmatched rows that
//! still share an identity with a row on the other side are reported as
//! moves when move detection is on.
//!
//! Script operations are ordered so that applying them one after the other
//! to the old rows yields the new rows:
//!
//! 1. removals, from the back of the list to the front,
//! 2. moves, in ascending order of their final position,
//! 3. insertions, from the front to the back,
//! 4. content changes, at final positions.
//!
//! ```
//! use rowkit::model::{EditOp, diff_by};
//!
//! let old = ["a", "b", "c"];
//! let new = ["a", "c", "d"];
//! let script = diff_by(&old, &new, true, |x, y| x == y, |x, y| x == y);
//!
//! let mut rows = old.to_vec();
//! script.apply(&mut rows, &new);
//! assert_eq!(rows, new);
//! assert_eq!(script.ops()[0], EditOp::Remove { index: 1, count: 1 });
//! ```

use std::ops::{Index, IndexMut, Range};

use rowkit_core::PerfSpan;

use super::event::ChangeEvent;
use super::item::ItemRef;

/// One step of an [`EditScript`]. Indices refer to the list as it stands
/// after every preceding step has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditOp {
    /// Remove `count` rows starting at `index`.
    Remove { index: usize, count: usize },
    /// Take the row at `from` out and re-insert it so it ends up at `to`.
    Move { from: usize, to: usize },
    /// Insert the new rows `index..index + count` at `index`.
    Insert { index: usize, count: usize },
    /// The rows `index..index + count` kept their identity but not their
    /// content.
    Change { index: usize, count: usize },
}

impl EditOp {
    /// The change notification describing this step.
    pub fn to_event(self) -> ChangeEvent {
        match self {
            Self::Remove { index, count } => ChangeEvent::removed(index, count),
            Self::Move { from, to } => ChangeEvent::ItemMoved { from, to },
            Self::Insert { index, count } => ChangeEvent::inserted(index, count),
            Self::Change { index, count } => ChangeEvent::changed(index, count),
        }
    }
}

/// The result of diffing two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditScript {
    ops: Vec<EditOp>,
    old_len: usize,
    new_len: usize,
}

impl EditScript {
    /// The steps, in application order.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if the snapshots were equivalent.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Length of the old snapshot.
    pub fn old_len(&self) -> usize {
        self.old_len
    }

    /// Length of the new snapshot.
    pub fn new_len(&self) -> usize {
        self.new_len
    }

    /// Total number of inserted rows.
    pub fn insertions(&self) -> usize {
        self.count_rows(|op| match op {
            EditOp::Insert { count, .. } => *count,
            _ => 0,
        })
    }

    /// Total number of removed rows.
    pub fn removals(&self) -> usize {
        self.count_rows(|op| match op {
            EditOp::Remove { count, .. } => *count,
            _ => 0,
        })
    }

    /// Number of moved rows.
    pub fn moves(&self) -> usize {
        self.count_rows(|op| matches!(op, EditOp::Move { .. }) as usize)
    }

    /// Total number of rows whose content changed.
    pub fn changes(&self) -> usize {
        self.count_rows(|op| match op {
            EditOp::Change { count, .. } => *count,
            _ => 0,
        })
    }

    fn count_rows(&self, f: impl Fn(&EditOp) -> usize) -> usize {
        self.ops.iter().map(f).sum()
    }

    /// The change notifications for this script, in dispatch order.
    pub fn events(&self) -> impl Iterator<Item = ChangeEvent> + '_ {
        self.ops.iter().map(|op| op.to_event())
    }

    /// Replay the script on `list` (a copy of the old snapshot), taking
    /// inserted and changed rows from `new`.
    ///
    /// # Panics
    ///
    /// Panics if `list` or `new` do not have the lengths the script was
    /// computed for.
    pub fn apply<T: Clone>(&self, list: &mut Vec<T>, new: &[T]) {
        assert_eq!(list.len(), self.old_len, "list is not the diffed old snapshot");
        assert_eq!(new.len(), self.new_len, "rows are not the diffed new snapshot");
        for op in &self.ops {
            match *op {
                EditOp::Remove { index, count } => {
                    list.drain(index..index + count);
                }
                EditOp::Move { from, to } => {
                    let row = list.remove(from);
                    list.insert(to, row);
                }
                EditOp::Insert { index, count } => {
                    list.splice(index..index, new[index..index + count].iter().cloned());
                }
                EditOp::Change { index, count } => {
                    list[index..index + count].clone_from_slice(&new[index..index + count]);
                }
            }
        }
    }
}

/// Diff two item snapshots using the items' identity and content predicates.
pub fn diff(old: &[ItemRef], new: &[ItemRef], detect_moves: bool) -> EditScript {
    diff_by(
        old,
        new,
        detect_moves,
        |a, b| a.same_identity(b.as_ref()),
        |a, b| a.same_content(b.as_ref()),
    )
}

/// Diff two sequences with caller-supplied predicates.
///
/// `same_identity(old, new)` decides whether two rows are the same row;
/// `same_content(old, new)` is only asked for rows that are.
pub fn diff_by<T, I, C>(
    old: &[T],
    new: &[T],
    detect_moves: bool,
    same_identity: I,
    same_content: C,
) -> EditScript
where
    I: Fn(&T, &T) -> bool,
    C: Fn(&T, &T) -> bool,
{
    let _span = PerfSpan::with_sizes("diff", old.len(), new.len());
    let matcher = Matcher {
        old,
        new,
        eq: &same_identity,
    };

    let mut old_to_new: Vec<Option<usize>> = vec![None; old.len()];
    let mut new_to_old: Vec<Option<usize>> = vec![None; new.len()];
    for (i, j) in matcher.common_subsequence() {
        old_to_new[i] = Some(j);
        new_to_old[j] = Some(i);
    }

    let mut moved = vec![false; new.len()];
    if detect_moves {
        let mut unmatched_old: Vec<usize> =
            (0..old.len()).filter(|&i| old_to_new[i].is_none()).collect();
        for j in 0..new.len() {
            if new_to_old[j].is_some() {
                continue;
            }
            if let Some(pos) = unmatched_old.iter().position(|&i| matcher.matches(i, j)) {
                let i = unmatched_old.remove(pos);
                old_to_new[i] = Some(j);
                new_to_old[j] = Some(i);
                moved[j] = true;
            }
        }
    }

    let mut ops = Vec::new();

    // Removals, back to front so earlier indices stay valid.
    let mut run: Option<(usize, usize)> = None;
    for i in (0..old.len()).rev().filter(|&i| old_to_new[i].is_none()) {
        run = match run {
            Some((start, count)) if start == i + 1 => Some((i, count + 1)),
            Some((start, count)) => {
                ops.push(EditOp::Remove { index: start, count });
                Some((i, 1))
            }
            None => Some((i, 1)),
        };
    }
    if let Some((index, count)) = run {
        ops.push(EditOp::Remove { index, count });
    }

    // Moves. Kept rows start in old order; rows matched by the common
    // subsequence are already sorted by final position, each moved row is
    // placed right after the last settled row that precedes it.
    let mut current: Vec<usize> = (0..old.len()).filter(|&i| old_to_new[i].is_some()).collect();
    let mut settled: Vec<bool> = (0..old.len())
        .map(|i| old_to_new[i].is_some_and(|j| !moved[j]))
        .collect();
    for j in (0..new.len()).filter(|&j| moved[j]) {
        let Some(i) = new_to_old[j] else { continue };
        let Some(from) = current.iter().position(|&row| row == i) else {
            continue;
        };
        current.remove(from);
        let to = current
            .iter()
            .rposition(|&row| settled[row] && old_to_new[row].is_some_and(|t| t < j))
            .map_or(0, |p| p + 1);
        current.insert(to, i);
        settled[i] = true;
        if from != to {
            ops.push(EditOp::Move { from, to });
        }
    }

    // Insertions, front to back.
    push_runs(&mut ops, (0..new.len()).filter(|&j| new_to_old[j].is_none()), |index, count| {
        EditOp::Insert { index, count }
    });

    // Content changes at final positions.
    push_runs(
        &mut ops,
        (0..new.len()).filter(|&j| new_to_old[j].is_some_and(|i| !same_content(&old[i], &new[j]))),
        |index, count| EditOp::Change { index, count },
    );

    let script = EditScript {
        ops,
        old_len: old.len(),
        new_len: new.len(),
    };
    tracing::debug!(
        target: "rowkit::diff",
        old_len = script.old_len,
        new_len = script.new_len,
        removed = script.removals(),
        inserted = script.insertions(),
        moved = script.moves(),
        changed = script.changes(),
        "computed edit script"
    );
    script
}

/// Push ascending index runs as coalesced operations.
fn push_runs(
    ops: &mut Vec<EditOp>,
    indices: impl Iterator<Item = usize>,
    make: impl Fn(usize, usize) -> EditOp,
) {
    let mut run: Option<(usize, usize)> = None;
    for index in indices {
        run = match run {
            Some((start, count)) if start + count == index => Some((start, count + 1)),
            Some((start, count)) => {
                ops.push(make(start, count));
                Some((index, 1))
            }
            None => Some((index, 1)),
        };
    }
    if let Some((start, count)) = run {
        ops.push(make(start, count));
    }
}

/// Furthest-reaching x per diagonal, indexed by signed diagonal number.
struct V {
    offset: isize,
    v: Vec<usize>,
}

impl V {
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize,
            v: vec![0; 2 * max_d + 1],
        }
    }
}

impl Index<isize> for V {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for V {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

fn max_d(n: usize, m: usize) -> usize {
    (n + m + 1) / 2 + 1
}

struct Matcher<'a, T, I> {
    old: &'a [T],
    new: &'a [T],
    eq: &'a I,
}

impl<T, I> Matcher<'_, T, I>
where
    I: Fn(&T, &T) -> bool,
{
    fn matches(&self, i: usize, j: usize) -> bool {
        (self.eq)(&self.old[i], &self.new[j])
    }

    /// Matched `(old, new)` index pairs in ascending order.
    fn common_subsequence(&self) -> Vec<(usize, usize)> {
        let max = max_d(self.old.len(), self.new.len());
        let mut vf = V::new(max);
        let mut vb = V::new(max);
        let mut pairs = Vec::new();
        self.conquer(0..self.old.len(), 0..self.new.len(), &mut vf, &mut vb, &mut pairs);
        pairs
    }

    fn common_prefix(&self, old: Range<usize>, new: Range<usize>) -> usize {
        old.zip(new).take_while(|&(i, j)| self.matches(i, j)).count()
    }

    fn common_suffix(&self, old: Range<usize>, new: Range<usize>) -> usize {
        old.rev()
            .zip(new.rev())
            .take_while(|&(i, j)| self.matches(i, j))
            .count()
    }

    fn conquer(
        &self,
        mut old: Range<usize>,
        mut new: Range<usize>,
        vf: &mut V,
        vb: &mut V,
        pairs: &mut Vec<(usize, usize)>,
    ) {
        let prefix = self.common_prefix(old.clone(), new.clone());
        pairs.extend((0..prefix).map(|d| (old.start + d, new.start + d)));
        old.start += prefix;
        new.start += prefix;

        let suffix = self.common_suffix(old.clone(), new.clone());
        let suffix_start = (old.end - suffix, new.end - suffix);
        old.end -= suffix;
        new.end -= suffix;

        if !old.is_empty() && !new.is_empty() {
            if let Some((x, y)) = self.find_middle_snake(old.clone(), new.clone(), vf, vb) {
                let splits = (x, y) != (old.start, new.start) && (x, y) != (old.end, new.end);
                if splits {
                    self.conquer(old.start..x, new.start..y, vf, vb, pairs);
                    self.conquer(x..old.end, y..new.end, vf, vb, pairs);
                }
            }
        }

        pairs.extend((0..suffix).map(|d| (suffix_start.0 + d, suffix_start.1 + d)));
    }

    /// Find the start of the middle snake of the optimal path through
    /// `old` x `new`, searching forward and backward at once.
    fn find_middle_snake(
        &self,
        old: Range<usize>,
        new: Range<usize>,
        vf: &mut V,
        vb: &mut V,
    ) -> Option<(usize, usize)> {
        let n = old.len();
        let m = new.len();
        let delta = n as isize - m as isize;
        let odd = delta & 1 == 1;
        vf[1] = 0;
        vb[1] = 0;

        let d_max = max_d(n, m) as isize;
        for d in 0..d_max {
            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && vf[k - 1] < vf[k + 1]) {
                    vf[k + 1]
                } else {
                    vf[k - 1] + 1
                };
                let y0 = x as isize - k;
                let x0 = x;
                if x < n && y0 >= 0 && (y0 as usize) < m {
                    x += self.common_prefix(old.start + x..old.end, new.start + y0 as usize..new.end);
                }
                vf[k] = x;
                let y = x as isize - k;
                let in_grid = x <= n && y0 >= 0 && y >= 0 && y as usize <= m;
                if odd && in_grid && (k - delta).abs() < d && vf[k] + vb[-(k - delta)] >= n {
                    return Some((old.start + x0, new.start + y0 as usize));
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && vb[k - 1] < vb[k + 1]) {
                    vb[k + 1]
                } else {
                    vb[k - 1] + 1
                };
                let mut y = x as isize - k;
                if x < n && y >= 0 && (y as usize) < m {
                    let advance = self.common_suffix(
                        old.start..old.start + n - x,
                        new.start..new.start + m - y as usize,
                    );
                    x += advance;
                    y += advance as isize;
                }
                vb[k] = x;
                let in_grid = x <= n && y >= 0 && y as usize <= m;
                if !odd && in_grid && (k - delta).abs() <= d && vb[k] + vf[-(k - delta)] >= n {
                    return Some((old.start + n - x, new.start + m - y as usize));
                }
            }
        }
        None
    }
}
