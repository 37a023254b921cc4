//! View derivation over a finding set
//!
//! Pure functions: given the full finding sequence and the current view
//! state, compute the ordered display subset and the status breakdown the
//! presentation layer renders. Nothing here mutates the store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{Finding, FindingStatus, SeverityCategory};

/// Which column the list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    ById,
    ByStatus,
}

/// Severity-category filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    CatOne,
    CatTwo,
    CatThree,
}

impl CategoryFilter {
    fn matches(self, category: &SeverityCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::CatOne => *category == SeverityCategory::CatOne,
            CategoryFilter::CatTwo => *category == SeverityCategory::CatTwo,
            CategoryFilter::CatThree => *category == SeverityCategory::CatThree,
        }
    }
}

/// Per-status visibility toggles. Defaults to everything visible.
///
/// Only the four canonical statuses have toggles; any other status (the
/// `"Unknown"` sentinel included) has no entry and is therefore never
/// visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusVisibility {
    pub open: bool,
    pub not_reviewed: bool,
    pub not_a_finding: bool,
    pub not_applicable: bool,
}

impl Default for StatusVisibility {
    fn default() -> Self {
        Self {
            open: true,
            not_reviewed: true,
            not_a_finding: true,
            not_applicable: true,
        }
    }
}

impl StatusVisibility {
    pub fn only(status: &FindingStatus) -> Self {
        let mut visibility = Self::none();
        visibility.set(status, true);
        visibility
    }

    pub fn none() -> Self {
        Self {
            open: false,
            not_reviewed: false,
            not_a_finding: false,
            not_applicable: false,
        }
    }

    pub fn set(&mut self, status: &FindingStatus, visible: bool) {
        match status {
            FindingStatus::Open => self.open = visible,
            FindingStatus::NotReviewed => self.not_reviewed = visible,
            FindingStatus::NotAFinding => self.not_a_finding = visible,
            FindingStatus::NotApplicable => self.not_applicable = visible,
            FindingStatus::Other(_) => {}
        }
    }

    /// Lookup miss (non-canonical status) means not visible.
    pub fn is_visible(&self, status: &FindingStatus) -> bool {
        match status {
            FindingStatus::Open => self.open,
            FindingStatus::NotReviewed => self.not_reviewed,
            FindingStatus::NotAFinding => self.not_a_finding,
            FindingStatus::NotApplicable => self.not_applicable,
            FindingStatus::Other(_) => false,
        }
    }
}

/// Whether a finding must match every keyword or any of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLogic {
    #[default]
    Any,
    All,
}

/// Keyword search over the findings' descriptive text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    pub keywords: Vec<String>,
    pub logic: MatchLogic,
}

impl SearchSpec {
    /// Split raw search input on commas, trimming and dropping empty
    /// tokens.
    pub fn from_input(input: &str, logic: MatchLogic) -> Self {
        let keywords = input
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect();
        Self { keywords, logic }
    }

    fn matches(&self, finding: &Finding) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let haystack = [
            finding.id.as_str(),
            finding.title.as_str(),
            finding.discussion.as_str(),
            finding.check_text.as_str(),
            finding.fix_text.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        let mut matches = self
            .keywords
            .iter()
            .map(|keyword| haystack.contains(&keyword.to_lowercase()));
        match self.logic {
            MatchLogic::All => matches.all(|matched| matched),
            MatchLogic::Any => matches.any(|matched| matched),
        }
    }
}

/// Filter/sort/search configuration for one open document. UI-session
/// state, never persisted into the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub sort_key: SortKey,
    pub category_filter: CategoryFilter,
    pub status_visibility: StatusVisibility,
    pub search: SearchSpec,
}

/// Fixed by-status ordering; non-canonical statuses sort after all
/// recognized ones.
fn status_rank(status: &FindingStatus) -> usize {
    match status {
        FindingStatus::Open => 0,
        FindingStatus::NotReviewed => 1,
        FindingStatus::NotAFinding => 2,
        FindingStatus::NotApplicable => 3,
        FindingStatus::Other(_) => 4,
    }
}

/// Compute the ordered display subset for the given view state.
///
/// Never mutates the input; ties keep their original (parse) order because
/// the sort is stable.
pub fn compute_view<'a>(findings: &'a [Finding], view: &ViewState) -> Vec<&'a Finding> {
    let mut visible: Vec<&Finding> = findings
        .iter()
        .filter(|finding| view.status_visibility.is_visible(&finding.status))
        .filter(|finding| view.category_filter.matches(&finding.severity_category()))
        .filter(|finding| view.search.matches(finding))
        .collect();

    match view.sort_key {
        SortKey::ById => visible.sort_by(|a, b| a.id.cmp(&b.id)),
        SortKey::ByStatus => visible.sort_by_key(|finding| status_rank(&finding.status)),
    }
    visible
}

/// Count findings per status, in first-seen order. This is the aggregate
/// the presentation collaborator turns into the status breakdown chart.
pub fn status_counts<'a, I>(findings: I) -> IndexMap<FindingStatus, usize>
where
    I: IntoIterator<Item = &'a Finding>,
{
    let mut counts: IndexMap<FindingStatus, usize> = IndexMap::new();
    for finding in findings {
        *counts.entry(finding.status.clone()).or_insert(0) += 1;
    }
    counts
}
