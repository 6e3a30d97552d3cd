use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::foundation::core::{
    BindingId, MediaId, Orientation, SchedulerScopeId, SelectionScopeId, SlotId,
};
use crate::visibility::token::Token;

/// Upper bound on how many bindings one selection scope may play at once.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Never play anything.
    NoPlayer,
    /// Play at most one binding.
    #[default]
    SinglePlayer,
    /// Play every binding the selector returns.
    MultiPlayer,
}

impl Strategy {
    fn limit(self) -> usize {
        match self {
            Self::NoPlayer => 0,
            Self::SinglePlayer => 1,
            Self::MultiPlayer => usize::MAX,
        }
    }
}

/// Picks among the sorted automatic candidates of a scope.
#[derive(Clone, Default)]
pub enum Selector {
    /// The best candidate by the scope comparator.
    #[default]
    First,
    /// Every candidate, best first.
    All,
    /// Caller-provided choice over the sorted candidates.
    Custom(Rc<dyn Fn(&[Candidate]) -> Vec<BindingId>>),
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("First"),
            Self::All => f.write_str("All"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Kind of host container a selection scope stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Recycling list; slots may stay registered while detached.
    List(Orientation),
    /// Paged container.
    Pager(Orientation),
    /// Vertically scrolling container without recycling.
    NestedScroll,
    /// Plain layout group.
    Group,
}

impl Default for ContainerKind {
    fn default() -> Self {
        Self::List(Orientation::Vertical)
    }
}

impl ContainerKind {
    /// Orientation used to order the candidates of this container.
    pub fn orientation(self) -> Orientation {
        match self {
            Self::List(o) | Self::Pager(o) => o,
            Self::NestedScroll => Orientation::Vertical,
            Self::Group => Orientation::BothAxis,
        }
    }

    fn requires_attached_slot(self) -> bool {
        matches!(self, Self::List(_))
    }
}

/// Options of a selection scope.
#[derive(Clone, Debug, Default)]
pub struct SelectionScopeOpts {
    /// Container kind, which fixes the comparator and the admission rule.
    pub kind: ContainerKind,
    /// How many candidates may play.
    pub strategy: Strategy,
    /// How automatic candidates are chosen.
    pub selector: Selector,
}

/// One binding as seen by candidate selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// The binding.
    pub binding: BindingId,
    /// Its media item.
    pub media: MediaId,
    /// Its slot.
    pub slot: SlotId,
    /// Token from the current cycle.
    pub token: Token,
    /// Whether the binding state is attached.
    pub attached: bool,
    /// Whether the binding carries a manual controller.
    pub manual: bool,
    /// Whether its media was started by the user, or has a pending user play.
    pub user_started: bool,
}

#[derive(Debug)]
pub(crate) struct SelectionScope {
    pub(crate) id: SelectionScopeId,
    pub(crate) scheduler: SchedulerScopeId,
    pub(crate) opts: SelectionScopeOpts,
    pub(crate) lock: bool,
    pub(crate) slots: Vec<SlotId>,
}

impl SelectionScope {
    pub(crate) fn new(
        id: SelectionScopeId,
        scheduler: SchedulerScopeId,
        opts: SelectionScopeOpts,
        lock: bool,
    ) -> Self {
        Self {
            id,
            scheduler,
            opts,
            lock,
            slots: Vec::new(),
        }
    }

    pub(crate) fn add_slot(&mut self, slot: SlotId) -> bool {
        if self.slots.contains(&slot) {
            return false;
        }
        self.slots.push(slot);
        true
    }

    pub(crate) fn remove_slot(&mut self, slot: SlotId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| *s != slot);
        before != self.slots.len()
    }

    /// Admission predicate applied before selection.
    pub(crate) fn allow_to_play(&self, candidate: &Candidate) -> bool {
        if self.opts.kind.requires_attached_slot() && !candidate.attached {
            return false;
        }
        candidate.token.should_play()
    }

    /// Choose what this scope wants to play among admitted candidates.
    pub(crate) fn select_to_play(&self, candidates: &[Candidate]) -> SmallVec<[BindingId; 2]> {
        if self.lock || self.opts.strategy == Strategy::NoPlayer {
            return SmallVec::new();
        }

        let sorted = sort_candidates(candidates, self.opts.kind.orientation());
        let (manual, automatic): (Vec<Candidate>, Vec<Candidate>) =
            sorted.into_iter().partition(|c| c.manual);

        if let Some(first) = manual.first() {
            let pick = manual.iter().find(|c| c.user_started).unwrap_or(first);
            return SmallVec::from_elem(pick.binding, 1);
        }

        let chosen: SmallVec<[BindingId; 2]> = match &self.opts.selector {
            Selector::First => automatic.first().map(|c| c.binding).into_iter().collect(),
            Selector::All => automatic.iter().map(|c| c.binding).collect(),
            Selector::Custom(select) => select(&automatic)
                .into_iter()
                .filter(|b| automatic.iter().any(|c| c.binding == *b))
                .collect(),
        };
        chosen.into_iter().take(self.opts.strategy.limit()).collect()
    }
}

/// Order two tokens: smaller projected center first, larger visible area first on ties.
pub(crate) fn compare_tokens(a: &Token, b: &Token, orientation: Orientation) -> Ordering {
    let (ca, cb) = (a.rect.center(), b.rect.center());
    let by_y = ca.y.total_cmp(&cb.y);
    let by_x = ca.x.total_cmp(&cb.x);
    let primary = match orientation {
        Orientation::Vertical => by_y,
        Orientation::Horizontal => by_x,
        Orientation::BothAxis => by_y.max(by_x),
    };
    primary.then_with(|| b.area_offset.total_cmp(&a.area_offset))
}

/// Stable insertion sort. The both-axis comparator is not a total order, which the std sorts may
/// reject; insertion sort only ever asks "does `b` go before `a`".
pub(crate) fn sort_candidates(candidates: &[Candidate], orientation: Orientation) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for c in candidates {
        let at = out
            .iter()
            .rposition(|placed| compare_tokens(&placed.token, &c.token, orientation) != Ordering::Greater)
            .map_or(0, |i| i + 1);
        out.insert(at, *c);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/scope/selection.rs"]
mod tests;
